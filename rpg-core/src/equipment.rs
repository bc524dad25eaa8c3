//! Equipment slots and the per-actor slot map.

use crate::error::GameError;
use crate::items::{Equippable, Item};
use crate::stats::StatName;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Named equipment positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Slot {
    Weapon,
    Armor,
    Offhand,
    Ring,
    Amulet,
    Boots,
    Consumable,
}

impl Slot {
    pub fn name(&self) -> &'static str {
        match self {
            Slot::Weapon => "weapon",
            Slot::Armor => "armor",
            Slot::Offhand => "offhand",
            Slot::Ring => "ring",
            Slot::Amulet => "amulet",
            Slot::Boots => "boots",
            Slot::Consumable => "consumable",
        }
    }

    pub fn all() -> [Slot; 7] {
        [
            Slot::Weapon,
            Slot::Armor,
            Slot::Offhand,
            Slot::Ring,
            Slot::Amulet,
            Slot::Boots,
            Slot::Consumable,
        ]
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Slot {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "weapon" | "main_hand" => Ok(Slot::Weapon),
            "armor" => Ok(Slot::Armor),
            "offhand" | "off_hand" => Ok(Slot::Offhand),
            "ring" => Ok(Slot::Ring),
            "amulet" => Ok(Slot::Amulet),
            "boots" => Ok(Slot::Boots),
            "consumable" => Ok(Slot::Consumable),
            _ => Err(GameError::invalid(format!(
                "unknown equipment slot: {s}. Valid slots: weapon, armor, offhand, ring, amulet, boots, consumable"
            ))),
        }
    }
}

/// What an actor is currently wearing, one item per slot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Equipment {
    slots: BTreeMap<Slot, Item>,
}

impl Equipment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, slot: Slot) -> Option<&Item> {
        self.slots.get(&slot)
    }

    pub fn is_occupied(&self, slot: Slot) -> bool {
        self.slots.contains_key(&slot)
    }

    /// Put `item` in `slot`, returning whatever was there.
    pub(crate) fn insert(&mut self, slot: Slot, item: Item) -> Option<Item> {
        self.slots.insert(slot, item)
    }

    pub(crate) fn take(&mut self, slot: Slot) -> Option<Item> {
        self.slots.remove(&slot)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Slot, &Item)> {
        self.slots.iter().map(|(slot, item)| (*slot, item))
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// True when the offhand holds a weapon rather than a shield or trinket.
    pub fn is_dual_wielding(&self) -> bool {
        self.get(Slot::Offhand)
            .map(|item| item.slot() == Slot::Weapon)
            .unwrap_or(false)
    }

    /// Every stat modifier contributed by equipped items, in slot order.
    pub fn modifiers(&self) -> impl Iterator<Item = (StatName, i32)> + '_ {
        self.slots
            .values()
            .flat_map(|item| item.stat_modifiers().iter().map(|(s, v)| (*s, *v)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_slot() {
        assert_eq!("weapon".parse::<Slot>().unwrap(), Slot::Weapon);
        assert_eq!("Off_Hand".parse::<Slot>().unwrap(), Slot::Offhand);
        let err = "belt".parse::<Slot>().unwrap_err();
        assert!(matches!(err, GameError::InvalidArgument(_)));
        assert!(err.to_string().contains("belt"));
    }
}
