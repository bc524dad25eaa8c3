//! Tunable rule constants.
//!
//! Every field has a default, so a config file only needs the values it
//! changes:
//!
//! ```json
//! { "combat": { "crit_chance": 0.2 }, "progression": { "xp_per_level": 80 } }
//! ```

use crate::error::GameError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Errors from loading a config file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid config: {0}")]
    Invalid(#[from] GameError),
}

/// Damage formula and encounter constants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CombatConfig {
    /// Fraction of the defender's defense subtracted from attack.
    pub defense_factor: f64,
    /// Lower bound of the damage variance multiplier.
    pub variance_low: f64,
    /// Upper bound of the damage variance multiplier.
    pub variance_high: f64,
    /// Probability of a critical hit.
    pub crit_chance: f64,
    pub crit_multiplier: f64,
    /// Damage multiplier applied to a defending target.
    pub defend_multiplier: f64,
    /// Rounds after which an undecided fight ends in a draw.
    pub max_rounds: u32,
    /// Whether the winner loots the loser's inventory.
    pub loot_on_defeat: bool,
    /// Experience granted per level of the defeated actor.
    pub experience_per_level: u32,
}

impl Default for CombatConfig {
    fn default() -> Self {
        Self {
            defense_factor: 0.05,
            variance_low: 0.8,
            variance_high: 1.2,
            crit_chance: 0.1,
            crit_multiplier: 2.0,
            defend_multiplier: 0.5,
            max_rounds: 500,
            loot_on_defeat: true,
            experience_per_level: 50,
        }
    }
}

impl CombatConfig {
    pub fn validate(&self) -> Result<(), GameError> {
        let finite = [
            self.defense_factor,
            self.variance_low,
            self.variance_high,
            self.crit_chance,
            self.crit_multiplier,
            self.defend_multiplier,
        ];
        if finite.iter().any(|v| !v.is_finite()) {
            return Err(GameError::invalid("combat values must be finite numbers"));
        }
        if self.defense_factor < 0.0 {
            return Err(GameError::invalid("defense_factor must not be negative"));
        }
        if self.variance_low < 0.0 || self.variance_low > self.variance_high {
            return Err(GameError::invalid(format!(
                "variance range {}..{} is invalid",
                self.variance_low, self.variance_high
            )));
        }
        if !(0.0..=1.0).contains(&self.crit_chance) {
            return Err(GameError::invalid("crit_chance must be within 0..=1"));
        }
        if self.crit_multiplier < 1.0 {
            return Err(GameError::invalid("crit_multiplier must be at least 1"));
        }
        if !(0.0..=1.0).contains(&self.defend_multiplier) {
            return Err(GameError::invalid("defend_multiplier must be within 0..=1"));
        }
        if self.max_rounds == 0 {
            return Err(GameError::invalid("max_rounds must be at least 1"));
        }
        Ok(())
    }
}

/// Experience and level-up constants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProgressionConfig {
    /// Experience needed to leave level L is `xp_per_level * L`.
    pub xp_per_level: u32,
    /// Refill pools on level-up.
    pub restore_on_level_up: bool,
}

impl Default for ProgressionConfig {
    fn default() -> Self {
        Self {
            xp_per_level: 100,
            restore_on_level_up: true,
        }
    }
}

impl ProgressionConfig {
    /// Experience required to advance from `level` to the next.
    pub fn threshold(&self, level: u32) -> u32 {
        self.xp_per_level.saturating_mul(level.max(1))
    }

    pub fn validate(&self) -> Result<(), GameError> {
        if self.xp_per_level == 0 {
            return Err(GameError::invalid("xp_per_level must be at least 1"));
        }
        Ok(())
    }
}

/// All rule configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub combat: CombatConfig,
    pub progression: ProgressionConfig,
}

impl GameConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_crit_chance(mut self, chance: f64) -> Self {
        self.combat.crit_chance = chance;
        self
    }

    pub fn with_max_rounds(mut self, rounds: u32) -> Self {
        self.combat.max_rounds = rounds;
        self
    }

    pub fn with_looting(mut self, enabled: bool) -> Self {
        self.combat.loot_on_defeat = enabled;
        self
    }

    pub fn with_experience_per_level(mut self, amount: u32) -> Self {
        self.combat.experience_per_level = amount;
        self
    }

    pub fn with_xp_per_level(mut self, amount: u32) -> Self {
        self.progression.xp_per_level = amount;
        self
    }

    pub fn validate(&self) -> Result<(), GameError> {
        self.combat.validate()?;
        self.progression.validate()
    }

    /// Parse and validate a JSON config.
    pub fn from_json_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a JSON config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }
}
