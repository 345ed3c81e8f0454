//! Injectable randomness for refills, enemy targeting and damage rolls.

// ── Trait ───────────────────────────────────────────────────

pub trait RandomSource {
    /// Uniform integer in `0..bound`. `bound == 0` yields 0.
    fn below(&mut self, bound: u32) -> u32;

    /// Uniform integer in `lo..=hi`. Arguments are swapped if reversed.
    /// The full `0..=u32::MAX` span draws from `0..u32::MAX`.
    fn range(&mut self, lo: u32, hi: u32) -> u32 {
        let (lo, hi) = if lo <= hi { (lo, hi) } else { (hi, lo) };
        lo + self.below((hi - lo).saturating_add(1))
    }
}

/// Uniform choice from `items`; `None` only for an empty slice.
pub fn pick<T: Copy>(rng: &mut dyn RandomSource, items: &[T]) -> Option<T> {
    if items.is_empty() {
        return None;
    }
    let i = rng.below(items.len() as u32) as usize;
    items.get(i).copied()
}

// ── LCG ─────────────────────────────────────────────────────

fn next_rng(seed: u64) -> u64 {
    seed.wrapping_mul(6364136223846793005)
        .wrapping_add(1442695040888963407)
}

/// 64-bit LCG; the default source in the browser.
#[derive(Clone, Debug)]
pub struct Lcg {
    seed: u64,
}

impl Lcg {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    /// Seed from the wall clock in the browser, a fixed value elsewhere.
    pub fn from_clock() -> Self {
        #[cfg(target_arch = "wasm32")]
        let seed = js_sys::Date::now() as u64;
        #[cfg(not(target_arch = "wasm32"))]
        let seed = 0x5eed_0f_ba77;
        Self::new(seed)
    }
}

impl RandomSource for Lcg {
    fn below(&mut self, bound: u32) -> u32 {
        if bound == 0 {
            return 0;
        }
        self.seed = next_rng(self.seed);
        ((self.seed >> 33) % bound as u64) as u32
    }
}

// ── Scripted ────────────────────────────────────────────────

/// Replays a fixed list of values (each taken modulo the bound), cycling
/// when exhausted. An empty list always yields 0.
#[derive(Clone, Debug, Default)]
pub struct SequenceRng {
    values: Vec<u32>,
    next: usize,
}

impl SequenceRng {
    pub fn new(values: Vec<u32>) -> Self {
        Self { values, next: 0 }
    }

    /// Number of values drawn so far.
    pub fn draws(&self) -> usize {
        self.next
    }
}

impl RandomSource for SequenceRng {
    fn below(&mut self, bound: u32) -> u32 {
        if bound == 0 || self.values.is_empty() {
            self.next += 1;
            return 0;
        }
        let v = self.values[self.next % self.values.len()];
        self.next += 1;
        v % bound
    }
}
