//! Stat names and the additive stat block.
//!
//! A [`StatBlock`] holds base values and an ordered list of additive
//! modifiers. Effective values are always derived:
//!
//! `effective(stat) = base[stat] + sum(modifiers for stat)`
//!
//! Nothing ever writes an effective value directly. Equipment and class
//! bonuses are applied by clearing the modifier list and re-adding them.

use crate::error::GameError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

// ============================================================================
// Stat Names
// ============================================================================

/// Every stat an actor or item can reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatName {
    Health,
    Mana,
    Stamina,
    Attack,
    Defense,
    Speed,
    Strength,
    Agility,
    Intelligence,
}

impl StatName {
    pub fn name(&self) -> &'static str {
        match self {
            StatName::Health => "health",
            StatName::Mana => "mana",
            StatName::Stamina => "stamina",
            StatName::Attack => "attack",
            StatName::Defense => "defense",
            StatName::Speed => "speed",
            StatName::Strength => "strength",
            StatName::Agility => "agility",
            StatName::Intelligence => "intelligence",
        }
    }

    pub fn all() -> [StatName; 9] {
        [
            StatName::Health,
            StatName::Mana,
            StatName::Stamina,
            StatName::Attack,
            StatName::Defense,
            StatName::Speed,
            StatName::Strength,
            StatName::Agility,
            StatName::Intelligence,
        ]
    }

    /// Stats that back a depletable resource pool.
    pub fn is_pool(&self) -> bool {
        matches!(self, StatName::Health | StatName::Mana | StatName::Stamina)
    }
}

impl fmt::Display for StatName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for StatName {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        StatName::all()
            .into_iter()
            .find(|stat| stat.name() == lower)
            .ok_or_else(|| GameError::invalid(format!("unknown stat: {s}")))
    }
}

// ============================================================================
// Stat Block
// ============================================================================

/// A single additive modifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatModifier {
    pub stat: StatName,
    pub amount: i32,
}

/// Base stat values plus the active additive modifiers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatBlock {
    base: BTreeMap<StatName, i32>,
    #[serde(default)]
    modifiers: Vec<StatModifier>,
}

impl StatBlock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a block from `(stat, base)` pairs.
    pub fn from_base(values: impl IntoIterator<Item = (StatName, i32)>) -> Self {
        Self {
            base: values.into_iter().collect(),
            modifiers: Vec::new(),
        }
    }

    /// Overwrite the base value for `stat`.
    pub fn set_base(&mut self, stat: StatName, value: i32) {
        self.base.insert(stat, value);
    }

    /// Overwrite a base value given a textual stat name.
    pub fn set_base_named(&mut self, stat: &str, value: i32) -> Result<(), GameError> {
        let stat: StatName = stat.parse()?;
        self.set_base(stat, value);
        Ok(())
    }

    /// Base value for `stat`, or 0 if it was never set.
    pub fn base(&self, stat: StatName) -> i32 {
        self.base.get(&stat).copied().unwrap_or(0)
    }

    pub fn base_values(&self) -> &BTreeMap<StatName, i32> {
        &self.base
    }

    /// Append a modifier. Duplicates are kept.
    pub fn add_modifier(&mut self, stat: StatName, amount: i32) {
        self.modifiers.push(StatModifier { stat, amount });
    }

    pub fn clear_modifiers(&mut self) {
        self.modifiers.clear();
    }

    pub fn modifiers(&self) -> &[StatModifier] {
        &self.modifiers
    }

    /// Effective value of one stat.
    pub fn effective_value(&self, stat: StatName) -> i32 {
        let bonus: i32 = self
            .modifiers
            .iter()
            .filter(|m| m.stat == stat)
            .map(|m| m.amount)
            .sum();
        self.base(stat) + bonus
    }

    /// Fresh map of every known stat to its effective value.
    ///
    /// A stat is known if it has a base value or at least one modifier.
    pub fn effective(&self) -> EffectiveStats {
        let mut values: BTreeMap<StatName, i32> = self.base.clone();
        for modifier in &self.modifiers {
            *values.entry(modifier.stat).or_insert(0) += modifier.amount;
        }
        EffectiveStats { values }
    }
}

/// Snapshot of effective stat values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EffectiveStats {
    values: BTreeMap<StatName, i32>,
}

impl EffectiveStats {
    /// Effective value, 0 for unknown stats.
    pub fn get(&self, stat: StatName) -> i32 {
        self.values.get(&stat).copied().unwrap_or(0)
    }

    pub fn contains(&self, stat: StatName) -> bool {
        self.values.contains_key(&stat)
    }

    pub fn iter(&self) -> impl Iterator<Item = (StatName, i32)> + '_ {
        self.values.iter().map(|(stat, value)| (*stat, *value))
    }

    pub fn as_map(&self) -> &BTreeMap<StatName, i32> {
        &self.values
    }
}
