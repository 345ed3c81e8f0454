//! Battle tuning: party stats, enemy stats, damage roll and stock cap.
//!
//! Every field has a default, so a JSON override only needs the keys it
//! changes. The web build reads an override from localStorage and applies
//! query-string switches on top.

use serde::{Deserialize, Serialize};

use crate::battle::combat::{Character, STOCK_CAP};
use crate::error::ConfigError;

/// localStorage key for a JSON config override.
pub const STORAGE_KEY: &str = "rbg_battle_config";

/// Upper bound for HP, attack and enemy damage overrides.
pub const MAX_STAT: u32 = 9999;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberConfig {
    pub max_hp: u32,
    /// Starting HP; `None` starts at `max_hp`.
    #[serde(default)]
    pub hp: Option<u32>,
    pub atk: u32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnemyConfig {
    pub max_hp: u32,
    #[serde(default)]
    pub hp: Option<u32>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BattleConfig {
    pub rojo: MemberConfig,
    pub blue: MemberConfig,
    pub midori: MemberConfig,
    pub enemy: EnemyConfig,
    pub enemy_damage_min: u32,
    pub enemy_damage_max: u32,
    pub stock_cap: u32,
    /// Fixed RNG seed; `None` seeds from the clock.
    pub seed: Option<u64>,
}

impl Default for BattleConfig {
    fn default() -> Self {
        Self {
            rojo: MemberConfig { max_hp: 101, hp: None, atk: 70 },
            blue: MemberConfig { max_hp: 93, hp: None, atk: 25 },
            midori: MemberConfig { max_hp: 123, hp: None, atk: 35 },
            enemy: EnemyConfig { max_hp: 500, hp: None },
            enemy_damage_min: 30,
            enemy_damage_max: 54,
            stock_cap: STOCK_CAP,
            seed: None,
        }
    }
}

impl BattleConfig {
    /// Parse and validate a (possibly partial) JSON override.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: BattleConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, m) in [("rojo", &self.rojo), ("blue", &self.blue), ("midori", &self.midori)] {
            if m.max_hp == 0 {
                return Err(ConfigError::Invalid(format!("{name}.max_hp must be positive")));
            }
            if m.max_hp > MAX_STAT || m.atk > MAX_STAT {
                return Err(ConfigError::Invalid(format!(
                    "{name}.max_hp and {name}.atk must be at most {MAX_STAT}"
                )));
            }
        }
        if self.enemy.max_hp == 0 || self.enemy.max_hp > MAX_STAT {
            return Err(ConfigError::Invalid(format!(
                "enemy.max_hp must be in 1..={MAX_STAT}"
            )));
        }
        if self.enemy_damage_max > MAX_STAT {
            return Err(ConfigError::Invalid(format!(
                "enemy_damage_max must be at most {MAX_STAT}"
            )));
        }
        if self.enemy_damage_min > self.enemy_damage_max {
            return Err(ConfigError::Invalid(format!(
                "enemy_damage_min ({}) exceeds enemy_damage_max ({})",
                self.enemy_damage_min, self.enemy_damage_max
            )));
        }
        Ok(())
    }

    pub fn party_member(&self, character: Character) -> &MemberConfig {
        match character {
            Character::Rojo => &self.rojo,
            Character::Blue => &self.blue,
            Character::Midori => &self.midori,
        }
    }

    /// Apply debug switches from a URL query string (`?lowhp`, `?seed=42`).
    pub fn apply_query(&mut self, query: &str) {
        for pair in query.trim_start_matches('?').split('&') {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            match key {
                "lowhp" => {
                    for m in [&mut self.rojo, &mut self.blue, &mut self.midori] {
                        m.hp = Some(1);
                    }
                    self.enemy.hp = Some(1);
                }
                "seed" => {
                    if let Ok(seed) = value.parse() {
                        self.seed = Some(seed);
                    }
                }
                _ => {}
            }
        }
    }
}

// ── Browser loading ─────────────────────────────────────────

#[cfg(target_arch = "wasm32")]
fn get_storage() -> Option<web_sys::Storage> {
    web_sys::window()?.local_storage().ok()?
}

/// Build the config from localStorage and the page query string.
/// Broken overrides are logged and ignored.
#[cfg(target_arch = "wasm32")]
pub fn load_config() -> BattleConfig {
    let mut config = BattleConfig::default();

    if let Some(json) = get_storage().and_then(|s| s.get_item(STORAGE_KEY).ok().flatten()) {
        match BattleConfig::from_json(&json) {
            Ok(c) => {
                crate::console::log(&format!("config: loaded override from {STORAGE_KEY}"));
                config = c;
            }
            Err(e) => crate::console::warn(&format!("config: ignoring {STORAGE_KEY}: {e}")),
        }
    }

    if let Some(query) = web_sys::window().and_then(|w| w.location().search().ok()) {
        config.apply_query(&query);
    }

    config
}

#[cfg(not(target_arch = "wasm32"))]
pub fn load_config() -> BattleConfig {
    BattleConfig::default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let config = BattleConfig::from_json(r#"{"enemy": {"max_hp": 200}, "seed": 7}"#).unwrap();
        assert_eq!(config.enemy.max_hp, 200);
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.rojo, BattleConfig::default().rojo);
        assert_eq!(config.enemy_damage_max, 54);
    }

    #[test]
    fn bad_json_is_json_error() {
        let err = BattleConfig::from_json("{not json").unwrap_err();
        assert!(matches!(err, ConfigError::Json(_)));
    }

    #[test]
    fn reversed_damage_range_is_invalid() {
        let err = BattleConfig::from_json(r#"{"enemy_damage_min": 60}"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn zero_hp_is_invalid() {
        let err = BattleConfig::from_json(r#"{"blue": {"max_hp": 0, "atk": 1}}"#).unwrap_err();
        assert!(err.to_string().contains("blue.max_hp"));
    }

    #[test]
    fn oversized_damage_range_is_invalid() {
        let err =
            BattleConfig::from_json(r#"{"enemy_damage_min": 0, "enemy_damage_max": 4294967295}"#)
                .unwrap_err();
        assert!(err.to_string().contains("enemy_damage_max"));
        assert!(BattleConfig::from_json(r#"{"enemy_damage_max": 9999}"#).is_ok());
    }

    #[test]
    fn oversized_attack_is_invalid() {
        let err = BattleConfig::from_json(r#"{"rojo": {"max_hp": 101, "atk": 4294967295}}"#)
            .unwrap_err();
        assert!(err.to_string().contains("rojo.atk"));
    }

    #[test]
    fn oversized_enemy_hp_is_invalid() {
        let err = BattleConfig::from_json(r#"{"enemy": {"max_hp": 10000}}"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn lowhp_sets_everyone_to_one() {
        let mut config = BattleConfig::default();
        config.apply_query("?lowhp");
        assert_eq!(config.rojo.hp, Some(1));
        assert_eq!(config.midori.hp, Some(1));
        assert_eq!(config.enemy.hp, Some(1));
        assert_eq!(config.rojo.max_hp, 101);
    }

    #[test]
    fn query_seed_and_unknown_keys() {
        let mut config = BattleConfig::default();
        config.apply_query("?foo=bar&seed=99&seed=x");
        assert_eq!(config.seed, Some(99));
        assert_eq!(config.rojo.hp, None);
    }
}
