//! Frame clock for the render loop.
//!
//! `draw_web()` calls at ~60fps with variable delta. FrameClock turns the
//! wall-clock timestamps into clamped per-frame deltas that drive
//! presentation timers and held-button repeat.

/// Largest delta handed out for one frame, in milliseconds.
pub const MAX_DELTA_MS: f64 = 250.0;

#[derive(Debug, Default)]
pub struct FrameClock {
    /// Timestamp of the last update (ms), None before the first frame
    last_timestamp: Option<f64>,
    /// Sum of all deltas handed out so far
    pub total_ms: f64,
    pub frames: u64,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed wall-clock timestamp (from `performance.now()` or similar).
    /// Returns the milliseconds to advance this frame.
    pub fn update(&mut self, now_ms: f64) -> f64 {
        let delta = match self.last_timestamp {
            // Clamp so a backgrounded tab does not skip whole animations
            Some(prev) => (now_ms - prev).clamp(0.0, MAX_DELTA_MS),
            None => 0.0,
        };
        self.last_timestamp = Some(now_ms);
        self.total_ms += delta;
        self.frames += 1;
        delta
    }
}

/// Current time in milliseconds from `performance.now()`.
pub fn now_ms() -> f64 {
    web_sys::window()
        .and_then(|w| w.performance())
        .map(|p| p.now())
        .unwrap_or_else(js_sys::Date::now)
}
