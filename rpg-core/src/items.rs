//! Items, the equippable capability and the standard generation tables.
//!
//! There is a single [`Item`] type. What used to be a family of weapon,
//! armor and trinket generators is a table of [`ItemTemplate`]s, each with
//! per-stat roll ranges. The [`ItemRegistry`] maps item type names to those
//! templates and rolls concrete items on request.

use crate::dice::GameRng;
use crate::equipment::Slot;
use crate::error::GameError;
use crate::stats::StatName;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

// ============================================================================
// Item Types
// ============================================================================

/// Broad category of an item. Determines its home slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemKind {
    Sword,
    Axe,
    Dagger,
    Mace,
    Bow,
    Staff,
    Shield,
    LeatherArmor,
    ChainMail,
    Robe,
    Ring,
    Amulet,
    Boots,
    HealthPotion,
    ManaPotion,
    StaminaPotion,
}

impl ItemKind {
    pub fn slot(&self) -> Slot {
        match self {
            ItemKind::Sword
            | ItemKind::Axe
            | ItemKind::Dagger
            | ItemKind::Mace
            | ItemKind::Bow
            | ItemKind::Staff => Slot::Weapon,
            ItemKind::Shield => Slot::Offhand,
            ItemKind::LeatherArmor | ItemKind::ChainMail | ItemKind::Robe => Slot::Armor,
            ItemKind::Ring => Slot::Ring,
            ItemKind::Amulet => Slot::Amulet,
            ItemKind::Boots => Slot::Boots,
            ItemKind::HealthPotion | ItemKind::ManaPotion | ItemKind::StaminaPotion => {
                Slot::Consumable
            }
        }
    }

    pub fn is_weapon(&self) -> bool {
        self.slot() == Slot::Weapon
    }
}

/// What a consumable does when used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "amount", rename_all = "snake_case")]
pub enum ConsumableEffect {
    RestoreHealth(u32),
    RestoreMana(u32),
    RestoreStamina(u32),
}

// ============================================================================
// Item
// ============================================================================

/// Anything that can be worn and contributes stat modifiers.
pub trait Equippable {
    /// The slot this item normally occupies.
    fn slot(&self) -> Slot;

    /// Additive bonuses granted to the wearer.
    fn stat_modifiers(&self) -> &BTreeMap<StatName, i32>;

    /// Whether this item may be paired with another weapon in the offhand.
    fn can_dual_wield(&self) -> bool {
        false
    }
}

/// A concrete item instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub name: String,
    pub kind: ItemKind,
    pub slot: Slot,
    #[serde(default)]
    pub stat_modifiers: BTreeMap<StatName, i32>,
    #[serde(default)]
    pub dual_wield: bool,
    #[serde(default)]
    pub effect: Option<ConsumableEffect>,
    #[serde(default)]
    pub value: u32,
}

impl Item {
    pub fn new(name: impl Into<String>, kind: ItemKind) -> Self {
        Self {
            name: name.into(),
            kind,
            slot: kind.slot(),
            stat_modifiers: BTreeMap::new(),
            dual_wield: false,
            effect: None,
            value: 0,
        }
    }

    pub fn with_modifier(mut self, stat: StatName, amount: i32) -> Self {
        *self.stat_modifiers.entry(stat).or_insert(0) += amount;
        self
    }

    pub fn with_dual_wield(mut self) -> Self {
        self.dual_wield = true;
        self
    }

    pub fn with_effect(mut self, effect: ConsumableEffect) -> Self {
        self.effect = Some(effect);
        self
    }

    pub fn with_value(mut self, value: u32) -> Self {
        self.value = value;
        self
    }

    pub fn is_consumable(&self) -> bool {
        self.effect.is_some()
    }

    /// Modifier for one stat, 0 if the item does not touch it.
    pub fn modifier(&self, stat: StatName) -> i32 {
        self.stat_modifiers.get(&stat).copied().unwrap_or(0)
    }
}

impl Equippable for Item {
    fn slot(&self) -> Slot {
        self.slot
    }

    fn stat_modifiers(&self) -> &BTreeMap<StatName, i32> {
        &self.stat_modifiers
    }

    fn can_dual_wield(&self) -> bool {
        self.dual_wield && self.kind.is_weapon()
    }
}

impl fmt::Display for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        if !self.stat_modifiers.is_empty() {
            let mods: Vec<String> = self
                .stat_modifiers
                .iter()
                .map(|(stat, amount)| format!("{amount:+} {stat}"))
                .collect();
            write!(f, " ({})", mods.join(", "))?;
        }
        Ok(())
    }
}

// ============================================================================
// Generation Tables
// ============================================================================

/// Inclusive roll range for one stat modifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatRoll {
    pub stat: StatName,
    pub min: i32,
    pub max: i32,
}

/// Data describing how to roll an item of one type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemTemplate {
    pub name: String,
    pub kind: ItemKind,
    #[serde(default)]
    pub rolls: Vec<StatRoll>,
    #[serde(default)]
    pub dual_wield: bool,
    #[serde(default)]
    pub effect: Option<ConsumableEffect>,
    #[serde(default)]
    pub value: u32,
}

impl ItemTemplate {
    pub fn new(name: impl Into<String>, kind: ItemKind) -> Self {
        Self {
            name: name.into(),
            kind,
            rolls: Vec::new(),
            dual_wield: false,
            effect: None,
            value: 0,
        }
    }

    pub fn with_roll(mut self, stat: StatName, min: i32, max: i32) -> Self {
        self.rolls.push(StatRoll { stat, min, max });
        self
    }

    pub fn with_dual_wield(mut self) -> Self {
        self.dual_wield = true;
        self
    }

    pub fn with_effect(mut self, effect: ConsumableEffect) -> Self {
        self.effect = Some(effect);
        self
    }

    pub fn with_value(mut self, value: u32) -> Self {
        self.value = value;
        self
    }

    /// Roll a concrete item from this template.
    pub fn generate<R: GameRng>(&self, rng: &mut R) -> Item {
        let mut item = Item::new(self.name.clone(), self.kind).with_value(self.value);
        for roll in &self.rolls {
            item = item.with_modifier(roll.stat, rng.roll(roll.min, roll.max));
        }
        item.dual_wield = self.dual_wield;
        item.effect = self.effect;
        item
    }
}

lazy_static::lazy_static! {
    /// Built-in item types, keyed by the name used in the registry.
    pub static ref STANDARD_TEMPLATES: Vec<(&'static str, ItemTemplate)> = vec![
        // Weapons
        ("sword", ItemTemplate::new("Sword", ItemKind::Sword)
            .with_roll(StatName::Attack, 4, 8)
            .with_roll(StatName::Strength, 0, 2)
            .with_dual_wield()
            .with_value(15)),
        ("axe", ItemTemplate::new("Axe", ItemKind::Axe)
            .with_roll(StatName::Attack, 6, 10)
            .with_roll(StatName::Speed, -2, -1)
            .with_value(12)),
        ("dagger", ItemTemplate::new("Dagger", ItemKind::Dagger)
            .with_roll(StatName::Attack, 2, 5)
            .with_roll(StatName::Speed, 1, 3)
            .with_dual_wield()
            .with_value(6)),
        ("mace", ItemTemplate::new("Mace", ItemKind::Mace)
            .with_roll(StatName::Attack, 5, 9)
            .with_value(10)),
        ("bow", ItemTemplate::new("Bow", ItemKind::Bow)
            .with_roll(StatName::Attack, 4, 7)
            .with_roll(StatName::Agility, 1, 3)
            .with_value(25)),
        ("staff", ItemTemplate::new("Staff", ItemKind::Staff)
            .with_roll(StatName::Attack, 2, 4)
            .with_roll(StatName::Intelligence, 2, 5)
            .with_roll(StatName::Mana, 5, 15)
            .with_value(20)),

        // Offhand and armor
        ("shield", ItemTemplate::new("Shield", ItemKind::Shield)
            .with_roll(StatName::Defense, 3, 6)
            .with_roll(StatName::Speed, -1, 0)
            .with_value(10)),
        ("leather_armor", ItemTemplate::new("Leather Armor", ItemKind::LeatherArmor)
            .with_roll(StatName::Defense, 2, 4)
            .with_value(10)),
        ("chain_mail", ItemTemplate::new("Chain Mail", ItemKind::ChainMail)
            .with_roll(StatName::Defense, 5, 8)
            .with_roll(StatName::Health, 5, 10)
            .with_roll(StatName::Speed, -2, -1)
            .with_value(75)),
        ("robe", ItemTemplate::new("Robe", ItemKind::Robe)
            .with_roll(StatName::Defense, 1, 2)
            .with_roll(StatName::Mana, 10, 20)
            .with_value(8)),

        // Trinkets
        ("ring", ItemTemplate::new("Ring", ItemKind::Ring)
            .with_roll(StatName::Intelligence, 0, 2)
            .with_roll(StatName::Mana, 0, 10)
            .with_value(50)),
        ("amulet", ItemTemplate::new("Amulet", ItemKind::Amulet)
            .with_roll(StatName::Health, 5, 15)
            .with_value(60)),
        ("boots", ItemTemplate::new("Boots", ItemKind::Boots)
            .with_roll(StatName::Speed, 1, 3)
            .with_roll(StatName::Stamina, 0, 10)
            .with_value(12)),

        // Consumables
        ("health_potion", ItemTemplate::new("Health Potion", ItemKind::HealthPotion)
            .with_effect(ConsumableEffect::RestoreHealth(25))
            .with_value(50)),
        ("mana_potion", ItemTemplate::new("Mana Potion", ItemKind::ManaPotion)
            .with_effect(ConsumableEffect::RestoreMana(20))
            .with_value(50)),
        ("stamina_potion", ItemTemplate::new("Stamina Potion", ItemKind::StaminaPotion)
            .with_effect(ConsumableEffect::RestoreStamina(20))
            .with_value(30)),
    ];
}

// ============================================================================
// Registry
// ============================================================================

/// Maps item type names to generation templates.
#[derive(Debug, Clone, Default)]
pub struct ItemRegistry {
    templates: BTreeMap<String, ItemTemplate>,
}

impl ItemRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry preloaded with the built-in item types.
    pub fn standard() -> Self {
        let mut registry = Self::new();
        for (type_name, template) in STANDARD_TEMPLATES.iter() {
            registry.register(*type_name, template.clone());
        }
        registry
    }

    /// Add or replace a template. Type names are case-insensitive.
    pub fn register(&mut self, type_name: impl AsRef<str>, template: ItemTemplate) {
        self.templates
            .insert(normalize_type_name(type_name.as_ref()), template);
    }

    pub fn get(&self, type_name: &str) -> Option<&ItemTemplate> {
        self.templates.get(&normalize_type_name(type_name))
    }

    pub fn contains(&self, type_name: &str) -> bool {
        self.get(type_name).is_some()
    }

    pub fn type_names(&self) -> impl Iterator<Item = &str> {
        self.templates.keys().map(String::as_str)
    }

    /// Roll a new item of the given type.
    pub fn create<R: GameRng>(&self, type_name: &str, rng: &mut R) -> Result<Item, GameError> {
        self.get(type_name)
            .map(|template| template.generate(rng))
            .ok_or_else(|| GameError::not_found(format!("item type {type_name}")))
    }
}

fn normalize_type_name(name: &str) -> String {
    name.trim().to_lowercase().replace([' ', '-'], "_")
}
