//! Party/enemy status, stock counters and turn resolution.

use serde::Serialize;

use super::grid::SphereType;
use super::rng::{pick, RandomSource};
use crate::config::BattleConfig;

pub const STOCK_CAP: u32 = 40;

// ── Roster ──────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum Character {
    Rojo,
    Blue,
    Midori,
}

/// Fixed iteration order for action choice and turn resolution.
pub const CHARACTERS: [Character; 3] = [Character::Rojo, Character::Blue, Character::Midori];

impl Character {
    pub fn index(self) -> usize {
        match self {
            Character::Rojo => 0,
            Character::Blue => 1,
            Character::Midori => 2,
        }
    }

    /// Elemental affinity; this stock buffs the character's attack and defense.
    pub fn sphere_type(self) -> SphereType {
        match self {
            Character::Rojo => SphereType::Red,
            Character::Blue => SphereType::Cyan,
            Character::Midori => SphereType::Green,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Character::Rojo => "Rojo",
            Character::Blue => "Blue",
            Character::Midori => "Midori",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum BattleAction {
    Attack,
    Defend,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct PartyMemberStatus {
    pub hp: u32,
    pub max_hp: u32,
    pub atk: u32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct EnemyStatus {
    pub hp: u32,
    pub max_hp: u32,
}

// ── Stock ───────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct StockCounts {
    counts: [u32; 5],
    #[serde(skip)]
    cap: u32,
}

impl Default for StockCounts {
    fn default() -> Self {
        Self::with_cap(STOCK_CAP)
    }
}

impl StockCounts {
    pub fn with_cap(cap: u32) -> Self {
        Self { counts: [0; 5], cap }
    }

    pub fn get(&self, sphere: SphereType) -> u32 {
        self.counts[sphere.index()]
    }

    pub fn set(&mut self, sphere: SphereType, value: u32) {
        self.counts[sphere.index()] = value.min(self.cap);
    }

    /// Add cleared spheres, saturating at the cap.
    pub fn add(&mut self, sphere: SphereType, amount: u32) {
        let slot = &mut self.counts[sphere.index()];
        *slot = slot.saturating_add(amount).min(self.cap);
    }

    /// Fold a per-type clear count (indexed by [`SphereType::index`]).
    pub fn add_all(&mut self, cleared: &[u32; 5]) {
        for sphere in super::grid::SPHERE_TYPES {
            self.add(sphere, cleared[sphere.index()]);
        }
    }

    pub fn cap(&self) -> u32 {
        self.cap
    }

    pub fn as_array(&self) -> [u32; 5] {
        self.counts
    }
}

// ── Turn inputs / results ───────────────────────────────────

/// One chosen action per character, filled during action choice.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TurnInputs([Option<BattleAction>; 3]);

impl TurnInputs {
    pub fn set(&mut self, character: Character, action: BattleAction) {
        self.0[character.index()] = Some(action);
    }

    pub fn get(&self, character: Character) -> Option<BattleAction> {
        self.0[character.index()]
    }

    pub fn clear(&mut self) {
        self.0 = [None; 3];
    }

    /// Characters with a recorded action, in roster order.
    pub fn entries(&self) -> impl Iterator<Item = (Character, BattleAction)> + '_ {
        CHARACTERS
            .into_iter()
            .filter_map(|c| self.get(c).map(|a| (c, a)))
    }

    /// True when exactly the characters in `active` have an entry.
    pub fn covers_exactly(&self, active: &[Character]) -> bool {
        CHARACTERS
            .iter()
            .all(|c| self.get(*c).is_some() == active.contains(c))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "action")]
pub enum PartyActionResult {
    Attack {
        character: Character,
        damage: u32,
        death: bool,
    },
    Defend {
        character: Character,
    },
}

impl PartyActionResult {
    pub fn character(&self) -> Character {
        match *self {
            PartyActionResult::Attack { character, .. } => character,
            PartyActionResult::Defend { character } => character,
        }
    }

    pub fn is_attack(&self) -> bool {
        matches!(self, PartyActionResult::Attack { .. })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct EnemyActionResult {
    pub target: Character,
    pub damage: u32,
    pub death: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TurnResult {
    /// Indexed by [`Character::index`]; `None` for characters without input.
    pub party: [Option<PartyActionResult>; 3],
    pub enemy: Option<EnemyActionResult>,
    pub stock: StockCounts,
}

impl TurnResult {
    pub fn any_attack(&self) -> bool {
        self.party.iter().flatten().any(PartyActionResult::is_attack)
    }

    pub fn total_damage_to_enemy(&self) -> u32 {
        self.party
            .iter()
            .flatten()
            .map(|r| match r {
                PartyActionResult::Attack { damage, .. } => *damage,
                PartyActionResult::Defend { .. } => 0,
            })
            .fold(0, u32::saturating_add)
    }
}

// ── Battle state ────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BattleState {
    pub party: [PartyMemberStatus; 3],
    pub enemy: EnemyStatus,
    pub stock: StockCounts,
    /// Inclusive range of the enemy's base damage roll.
    pub enemy_damage: (u32, u32),
}

impl Default for BattleState {
    fn default() -> Self {
        Self::from_config(&BattleConfig::default())
    }
}

impl BattleState {
    pub fn from_config(config: &BattleConfig) -> Self {
        let member = |c: Character| {
            let stats = config.party_member(c);
            PartyMemberStatus {
                hp: stats.hp.unwrap_or(stats.max_hp).min(stats.max_hp),
                max_hp: stats.max_hp,
                atk: stats.atk,
            }
        };
        Self {
            party: CHARACTERS.map(member),
            enemy: EnemyStatus {
                hp: config.enemy.hp.unwrap_or(config.enemy.max_hp).min(config.enemy.max_hp),
                max_hp: config.enemy.max_hp,
            },
            stock: StockCounts::with_cap(config.stock_cap),
            enemy_damage: (config.enemy_damage_min, config.enemy_damage_max),
        }
    }

    pub fn member(&self, character: Character) -> &PartyMemberStatus {
        &self.party[character.index()]
    }

    pub fn member_mut(&mut self, character: Character) -> &mut PartyMemberStatus {
        &mut self.party[character.index()]
    }

    /// Characters with HP left, in roster order.
    pub fn active_characters(&self) -> Vec<Character> {
        CHARACTERS
            .into_iter()
            .filter(|c| self.member(*c).hp > 0)
            .collect()
    }

    pub fn is_victory(&self) -> bool {
        self.enemy.hp < 1
    }

    pub fn is_game_over(&self) -> bool {
        self.party.iter().all(|m| m.hp < 1)
    }

    /// Resolve party actions, then the enemy's counterattack.
    pub fn execute_turn(&mut self, inputs: &TurnInputs, rng: &mut dyn RandomSource) -> TurnResult {
        let mut party = [None; 3];
        let mut clear_key = false;

        for (character, action) in inputs.entries() {
            let sphere = character.sphere_type();
            let result = if action == BattleAction::Attack && self.enemy.hp > 0 {
                let damage = self
                    .member(character)
                    .atk
                    .saturating_add(self.stock.get(sphere))
                    .saturating_add(self.stock.get(SphereType::Key));
                self.enemy.hp = self.enemy.hp.saturating_sub(damage);
                self.stock.set(sphere, 0);
                clear_key = true;
                PartyActionResult::Attack {
                    character,
                    damage,
                    death: self.enemy.hp < 1,
                }
            } else {
                PartyActionResult::Defend { character }
            };
            party[character.index()] = Some(result);
        }

        if clear_key {
            self.stock.set(SphereType::Key, 0);
        }

        let mut enemy = None;
        if self.enemy.hp > 0 {
            if let Some(target) = pick(rng, &self.active_characters()) {
                let (lo, hi) = self.enemy_damage;
                let mut damage = rng.range(lo, hi);
                if inputs.get(target) == Some(BattleAction::Defend) {
                    let sphere = target.sphere_type();
                    let guard = self.stock.get(sphere).saturating_add(self.stock.get(SphereType::Yellow));
                    self.stock.set(sphere, 0);
                    self.stock.set(SphereType::Yellow, 0);
                    damage = damage.saturating_sub(guard);
                }
                let status = self.member_mut(target);
                status.hp = status.hp.saturating_sub(damage);
                enemy = Some(EnemyActionResult {
                    target,
                    damage,
                    death: status.hp == 0,
                });
            }
        }

        TurnResult {
            party,
            enemy,
            stock: self.stock,
        }
    }
}
