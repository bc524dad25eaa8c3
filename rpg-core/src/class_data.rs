//! Character classes: base stat lines, class bonuses, level growth and
//! starting kits.

use crate::error::GameError;
use crate::stats::StatName;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Playable character classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CharacterClass {
    Warrior,
    Rogue,
    Mage,
}

/// Static data for one class.
pub struct ClassData {
    /// Base values a fresh level 1 character starts with.
    pub base_stats: &'static [(StatName, i32)],
    /// Modifiers reapplied on every stat recompute.
    pub bonuses: &'static [(StatName, i32)],
    /// Base stat increases granted per level gained.
    pub growth: &'static [(StatName, i32)],
    /// Item type names handed out by the character builder.
    pub starting_kit: &'static [&'static str],
}

/// Growth for actors without a class.
pub const DEFAULT_GROWTH: &[(StatName, i32)] = &[
    (StatName::Health, 10),
    (StatName::Attack, 1),
    (StatName::Defense, 1),
];

impl CharacterClass {
    pub fn name(&self) -> &'static str {
        match self {
            CharacterClass::Warrior => "Warrior",
            CharacterClass::Rogue => "Rogue",
            CharacterClass::Mage => "Mage",
        }
    }

    pub fn all() -> &'static [CharacterClass] {
        &[
            CharacterClass::Warrior,
            CharacterClass::Rogue,
            CharacterClass::Mage,
        ]
    }

    pub fn data(&self) -> ClassData {
        match self {
            CharacterClass::Warrior => ClassData {
                base_stats: &[
                    (StatName::Health, 120),
                    (StatName::Mana, 20),
                    (StatName::Stamina, 100),
                    (StatName::Attack, 14),
                    (StatName::Defense, 12),
                    (StatName::Speed, 8),
                    (StatName::Strength, 14),
                    (StatName::Agility, 8),
                    (StatName::Intelligence, 6),
                ],
                bonuses: &[(StatName::Health, 10), (StatName::Defense, 3)],
                growth: &[
                    (StatName::Health, 12),
                    (StatName::Stamina, 5),
                    (StatName::Attack, 2),
                    (StatName::Defense, 2),
                    (StatName::Strength, 1),
                ],
                starting_kit: &["sword", "shield", "chain_mail", "health_potion"],
            },
            CharacterClass::Rogue => ClassData {
                base_stats: &[
                    (StatName::Health, 90),
                    (StatName::Mana, 30),
                    (StatName::Stamina, 110),
                    (StatName::Attack, 12),
                    (StatName::Defense, 8),
                    (StatName::Speed, 14),
                    (StatName::Strength, 9),
                    (StatName::Agility, 15),
                    (StatName::Intelligence, 9),
                ],
                bonuses: &[(StatName::Attack, 2), (StatName::Speed, 2)],
                growth: &[
                    (StatName::Health, 8),
                    (StatName::Stamina, 6),
                    (StatName::Attack, 2),
                    (StatName::Speed, 1),
                    (StatName::Agility, 1),
                ],
                starting_kit: &["dagger", "dagger", "leather_armor", "boots", "health_potion"],
            },
            CharacterClass::Mage => ClassData {
                base_stats: &[
                    (StatName::Health, 70),
                    (StatName::Mana, 120),
                    (StatName::Stamina, 60),
                    (StatName::Attack, 10),
                    (StatName::Defense, 6),
                    (StatName::Speed, 10),
                    (StatName::Strength, 6),
                    (StatName::Agility, 9),
                    (StatName::Intelligence, 16),
                ],
                bonuses: &[(StatName::Mana, 20), (StatName::Intelligence, 2)],
                growth: &[
                    (StatName::Health, 6),
                    (StatName::Mana, 15),
                    (StatName::Attack, 1),
                    (StatName::Intelligence, 2),
                ],
                starting_kit: &["staff", "robe", "ring", "mana_potion"],
            },
        }
    }
}

impl fmt::Display for CharacterClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for CharacterClass {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "warrior" | "fighter" => Ok(CharacterClass::Warrior),
            "rogue" | "thief" => Ok(CharacterClass::Rogue),
            "mage" | "wizard" => Ok(CharacterClass::Mage),
            _ => Err(GameError::invalid(format!(
                "unknown class: {s}. Valid classes: warrior, rogue, mage"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::items::ItemRegistry;

    #[test]
    fn test_every_class_has_full_stat_line() {
        for class in CharacterClass::all() {
            let data = class.data();
            for stat in StatName::all() {
                assert!(
                    data.base_stats.iter().any(|(s, _)| *s == stat),
                    "{class} missing {stat}"
                );
            }
        }
    }

    #[test]
    fn test_starting_kits_exist_in_registry() {
        let registry = ItemRegistry::standard();
        for class in CharacterClass::all() {
            for type_name in class.data().starting_kit {
                assert!(registry.contains(type_name), "{type_name} not registered");
            }
        }
    }

    #[test]
    fn test_parse_class() {
        assert_eq!("Mage".parse::<CharacterClass>().unwrap(), CharacterClass::Mage);
        assert_eq!("fighter".parse::<CharacterClass>().unwrap(), CharacterClass::Warrior);
        assert!("bard".parse::<CharacterClass>().is_err());
    }
}
