//! Actors: base stats, equipment, inventory and resource pools.
//!
//! An actor's effective stats are recomputed from scratch by
//! [`Actor::update_stats`] whenever equipment, class or base values change.
//! Health, mana and stamina are clamped into `[0, effective max]` on every
//! recompute, so a pool can never exceed its maximum.

use crate::class_data::{CharacterClass, DEFAULT_GROWTH};
use crate::config::ProgressionConfig;
use crate::equipment::{Equipment, Slot};
use crate::error::GameError;
use crate::inventory::Inventory;
use crate::items::{ConsumableEffect, Equippable, Item};
use crate::stats::{EffectiveStats, StatBlock, StatName};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

// ============================================================================
// ID Types
// ============================================================================

/// Unique identifier for actors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ActorId(pub Uuid);

impl ActorId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ActorId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ActorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// Results
// ============================================================================

/// Result of taking damage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DamageTaken {
    /// Health actually removed (never more than the actor had).
    pub applied: u32,
    pub remaining: i32,
    pub dropped_to_zero: bool,
}

/// A level gained through experience.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelUp {
    pub level: u32,
}

/// Result of using a consumable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemUsed {
    pub item_name: String,
    pub effect: ConsumableEffect,
    /// Amount actually restored after clamping.
    pub restored: u32,
}

// ============================================================================
// Actor
// ============================================================================

/// A combatant with stats, gear and resource pools.
#[derive(Debug, Clone)]
pub struct Actor {
    pub id: ActorId,
    name: String,
    level: u32,
    experience: u32,
    class: Option<CharacterClass>,
    stats: StatBlock,
    effective: EffectiveStats,
    current_health: i32,
    current_mana: i32,
    current_stamina: i32,
    equipment: Equipment,
    pub inventory: Inventory,
    defending: bool,
}

impl Actor {
    /// Create a level 1 actor with full pools.
    pub fn new(name: impl Into<String>, stats: StatBlock) -> Result<Self, GameError> {
        let name = validate_name(name.into())?;
        let mut actor = Self {
            id: ActorId::new(),
            name,
            level: 1,
            experience: 0,
            class: None,
            stats,
            effective: EffectiveStats::default(),
            current_health: 0,
            current_mana: 0,
            current_stamina: 0,
            equipment: Equipment::new(),
            inventory: Inventory::new(),
            defending: false,
        };
        actor.update_stats();
        actor.restore_all();
        Ok(actor)
    }

    /// Create a level 1 actor with the class's base stat line.
    pub fn with_class(name: impl Into<String>, class: CharacterClass) -> Result<Self, GameError> {
        let stats = StatBlock::from_base(class.data().base_stats.iter().copied());
        let mut actor = Self::new(name, stats)?;
        actor.class = Some(class);
        actor.update_stats();
        actor.restore_all();
        Ok(actor)
    }

    // ------------------------------------------------------------------------
    // Identity
    // ------------------------------------------------------------------------

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) -> Result<(), GameError> {
        self.name = validate_name(name.into())?;
        Ok(())
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    /// Set the level directly. Does not apply growth.
    pub fn set_level(&mut self, level: u32) -> Result<(), GameError> {
        if level == 0 {
            return Err(GameError::invalid("level must be at least 1"));
        }
        self.level = level;
        self.update_stats();
        Ok(())
    }

    pub fn experience(&self) -> u32 {
        self.experience
    }

    pub(crate) fn set_experience(&mut self, experience: u32) {
        self.experience = experience;
    }

    pub fn class(&self) -> Option<CharacterClass> {
        self.class
    }

    pub fn set_class(&mut self, class: Option<CharacterClass>) {
        self.class = class;
        self.update_stats();
    }

    // ------------------------------------------------------------------------
    // Stats
    // ------------------------------------------------------------------------

    pub fn stats(&self) -> &StatBlock {
        &self.stats
    }

    /// Overwrite a base stat and recompute.
    pub fn set_base_stat(&mut self, stat: StatName, value: i32) {
        self.stats.set_base(stat, value);
        self.update_stats();
    }

    pub fn effective_stats(&self) -> &EffectiveStats {
        &self.effective
    }

    /// Effective value of one stat.
    pub fn stat(&self, stat: StatName) -> i32 {
        self.effective.get(stat)
    }

    /// Rebuild modifiers from class and equipment, recompute effective
    /// stats and clamp the pools.
    pub fn update_stats(&mut self) {
        self.stats.clear_modifiers();

        if let Some(class) = self.class {
            for (stat, amount) in class.data().bonuses {
                self.stats.add_modifier(*stat, *amount);
            }
        }

        for (stat, amount) in self.equipment.modifiers() {
            self.stats.add_modifier(stat, amount);
        }

        self.effective = self.stats.effective();
        self.current_health = clamp_pool(self.current_health, self.max_health());
        self.current_mana = clamp_pool(self.current_mana, self.max_mana());
        self.current_stamina = clamp_pool(self.current_stamina, self.max_stamina());

        tracing::debug!(
            actor = %self.name,
            health = self.current_health,
            max_health = self.max_health(),
            attack = self.stat(StatName::Attack),
            defense = self.stat(StatName::Defense),
            "stats recomputed"
        );
    }

    // ------------------------------------------------------------------------
    // Resource Pools
    // ------------------------------------------------------------------------

    pub fn health(&self) -> i32 {
        self.current_health
    }

    pub fn mana(&self) -> i32 {
        self.current_mana
    }

    pub fn stamina(&self) -> i32 {
        self.current_stamina
    }

    pub fn max_health(&self) -> i32 {
        self.effective.get(StatName::Health).max(0)
    }

    pub fn max_mana(&self) -> i32 {
        self.effective.get(StatName::Mana).max(0)
    }

    pub fn max_stamina(&self) -> i32 {
        self.effective.get(StatName::Stamina).max(0)
    }

    pub fn is_alive(&self) -> bool {
        self.current_health > 0
    }

    /// Fraction of health remaining, 0.0 when max health is 0.
    pub fn health_ratio(&self) -> f64 {
        if self.max_health() == 0 {
            return 0.0;
        }
        self.current_health as f64 / self.max_health() as f64
    }

    pub fn take_damage(&mut self, amount: u32) -> DamageTaken {
        let before = self.current_health;
        self.current_health = clamp_pool(before.saturating_sub(to_i32(amount)), self.max_health());
        DamageTaken {
            applied: (before - self.current_health).max(0) as u32,
            remaining: self.current_health,
            dropped_to_zero: self.current_health == 0,
        }
    }

    /// Heal, returning the amount actually restored.
    pub fn heal(&mut self, amount: u32) -> u32 {
        let max = self.max_health();
        restore(&mut self.current_health, amount, max)
    }

    pub fn restore_mana(&mut self, amount: u32) -> u32 {
        let max = self.max_mana();
        restore(&mut self.current_mana, amount, max)
    }

    pub fn restore_stamina(&mut self, amount: u32) -> u32 {
        let max = self.max_stamina();
        restore(&mut self.current_stamina, amount, max)
    }

    /// Spend mana. Returns false and changes nothing if there is not enough.
    pub fn spend_mana(&mut self, amount: u32) -> bool {
        spend(&mut self.current_mana, amount)
    }

    /// Spend stamina. Returns false and changes nothing if there is not enough.
    pub fn spend_stamina(&mut self, amount: u32) -> bool {
        spend(&mut self.current_stamina, amount)
    }

    /// Refill every pool to its maximum.
    pub fn restore_all(&mut self) {
        self.current_health = self.max_health();
        self.current_mana = self.max_mana();
        self.current_stamina = self.max_stamina();
    }

    /// Set the current pools, clamped to their maxima.
    pub(crate) fn set_pools(&mut self, health: i32, mana: i32, stamina: i32) {
        self.current_health = clamp_pool(health, self.max_health());
        self.current_mana = clamp_pool(mana, self.max_mana());
        self.current_stamina = clamp_pool(stamina, self.max_stamina());
    }

    // ------------------------------------------------------------------------
    // Stance
    // ------------------------------------------------------------------------

    pub fn is_defending(&self) -> bool {
        self.defending
    }

    pub fn begin_defending(&mut self) {
        self.defending = true;
    }

    /// Clear the defending stance, returning whether it was set.
    pub fn stop_defending(&mut self) -> bool {
        std::mem::replace(&mut self.defending, false)
    }

    // ------------------------------------------------------------------------
    // Equipment
    // ------------------------------------------------------------------------

    pub fn equipment(&self) -> &Equipment {
        &self.equipment
    }

    pub fn equipped(&self, slot: Slot) -> Option<&Item> {
        self.equipment.get(slot)
    }

    /// Equip an item in its own slot, returning whatever it replaced.
    pub fn equip(&mut self, item: Item) -> Result<Option<Item>, GameError> {
        let slot = item.slot();
        if slot == Slot::Weapon && self.equipment.is_dual_wielding() && !item.can_dual_wield() {
            return Err(GameError::conflict(
                Slot::Offhand,
                format!(
                    "{} cannot be dual-wielded with the offhand weapon",
                    item.name
                ),
            ));
        }

        let previous = self.equipment.insert(slot, item);
        self.update_stats();
        Ok(previous)
    }

    /// `equip` that treats `None` as a no-op.
    pub fn equip_optional(&mut self, item: Option<Item>) -> Result<Option<Item>, GameError> {
        match item {
            Some(item) => self.equip(item),
            None => Ok(None),
        }
    }

    /// Equip an item only if its slot is free.
    pub fn equip_strict(&mut self, item: Item) -> Result<(), GameError> {
        let slot = item.slot();
        if let Some(current) = self.equipment.get(slot) {
            return Err(GameError::conflict(
                slot,
                format!("{} is already equipped; unequip it first", current.name),
            ));
        }
        self.equip(item).map(|_| ())
    }

    /// Equip into an explicit slot.
    ///
    /// A weapon may go in the offhand when it and the main weapon both allow
    /// dual-wielding.
    pub fn equip_to(&mut self, slot: Slot, item: Item) -> Result<Option<Item>, GameError> {
        if slot == item.slot() {
            return self.equip(item);
        }

        if slot != Slot::Offhand || item.slot() != Slot::Weapon {
            return Err(GameError::invalid(format!(
                "{} cannot be equipped in the {slot} slot",
                item.name
            )));
        }

        let main_allows = self
            .equipment
            .get(Slot::Weapon)
            .map(|main| main.can_dual_wield())
            .unwrap_or(false);
        if !item.can_dual_wield() || !main_allows {
            return Err(GameError::conflict(
                slot,
                format!(
                    "dual-wielding {} requires both weapons to allow it",
                    item.name
                ),
            ));
        }

        let previous = self.equipment.insert(Slot::Offhand, item);
        self.update_stats();
        Ok(previous)
    }

    /// Clear a slot and return what was in it.
    ///
    /// Removing the main weapon while dual-wielding moves the offhand
    /// weapon into the main hand.
    pub fn unequip(&mut self, slot: Slot) -> Option<Item> {
        let removed = self.equipment.take(slot);
        if slot == Slot::Weapon && removed.is_some() && self.equipment.is_dual_wielding() {
            if let Some(offhand) = self.equipment.take(Slot::Offhand) {
                self.equipment.insert(Slot::Weapon, offhand);
            }
        }
        self.update_stats();
        removed
    }

    /// `unequip` by slot name.
    pub fn unequip_named(&mut self, slot: &str) -> Result<Option<Item>, GameError> {
        let slot: Slot = slot.parse()?;
        Ok(self.unequip(slot))
    }

    /// Move an item from the inventory into its slot. Anything it replaces
    /// goes back into the inventory.
    pub fn equip_from_inventory(&mut self, name: &str) -> Result<(), GameError> {
        let item = self.inventory.take(name)?;
        match self.equip(item.clone()) {
            Ok(Some(previous)) => {
                self.inventory.add_one(previous);
                Ok(())
            }
            Ok(None) => Ok(()),
            Err(e) => {
                self.inventory.add_one(item);
                Err(e)
            }
        }
    }

    /// Move the item in `slot` back into the inventory.
    pub fn unequip_to_inventory(&mut self, slot: Slot) -> Result<(), GameError> {
        let item = self
            .unequip(slot)
            .ok_or_else(|| GameError::not_found(format!("item in {slot} slot")))?;
        self.inventory.add_one(item);
        Ok(())
    }

    /// Consume one item from the inventory and apply its effect.
    pub fn use_item(&mut self, name: &str) -> Result<ItemUsed, GameError> {
        let effect = match self.inventory.find(name) {
            None => return Err(GameError::not_found(format!("{name} in inventory"))),
            Some(item) => item
                .effect
                .ok_or_else(|| GameError::invalid(format!("{} is not consumable", item.name)))?,
        };

        let item = self.inventory.take(name)?;
        let restored = match effect {
            ConsumableEffect::RestoreHealth(amount) => self.heal(amount),
            ConsumableEffect::RestoreMana(amount) => self.restore_mana(amount),
            ConsumableEffect::RestoreStamina(amount) => self.restore_stamina(amount),
        };

        Ok(ItemUsed {
            item_name: item.name,
            effect,
            restored,
        })
    }

    // ------------------------------------------------------------------------
    // Progression
    // ------------------------------------------------------------------------

    /// Add experience and return every level gained.
    pub fn gain_experience(&mut self, amount: u32, progression: &ProgressionConfig) -> Vec<LevelUp> {
        self.experience = self.experience.saturating_add(amount);

        let mut gained = Vec::new();
        loop {
            let threshold = progression.threshold(self.level);
            if threshold == 0 || self.experience < threshold {
                break;
            }
            self.experience -= threshold;
            self.apply_level_growth();
            self.level += 1;
            gained.push(LevelUp { level: self.level });
        }

        if !gained.is_empty() {
            self.update_stats();
            if progression.restore_on_level_up {
                self.restore_all();
            }
            tracing::info!(actor = %self.name, level = self.level, "level up");
        }
        gained
    }

    /// Add one level's worth of growth to the base stats.
    pub(crate) fn apply_level_growth(&mut self) {
        let growth = match self.class {
            Some(class) => class.data().growth,
            None => DEFAULT_GROWTH,
        };
        for (stat, amount) in growth {
            let base = self.stats.base(*stat);
            self.stats.set_base(*stat, base + amount);
        }
    }

    pub(crate) fn set_level_unchecked(&mut self, level: u32) {
        self.level = level;
    }
}

fn validate_name(name: String) -> Result<String, GameError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(GameError::invalid("name must not be empty"));
    }
    Ok(trimmed.to_string())
}

fn clamp_pool(current: i32, max: i32) -> i32 {
    current.clamp(0, max.max(0))
}

fn to_i32(amount: u32) -> i32 {
    i32::try_from(amount).unwrap_or(i32::MAX)
}

fn restore(pool: &mut i32, amount: u32, max: i32) -> u32 {
    let before = *pool;
    *pool = clamp_pool(before.saturating_add(to_i32(amount)), max);
    (*pool - before).max(0) as u32
}

fn spend(pool: &mut i32, amount: u32) -> bool {
    let amount = to_i32(amount);
    if *pool < amount {
        return false;
    }
    *pool -= amount;
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::items::ItemKind;

    fn fighter() -> Actor {
        let stats = StatBlock::from_base([
            (StatName::Health, 100),
            (StatName::Mana, 30),
            (StatName::Stamina, 50),
            (StatName::Attack, 10),
            (StatName::Defense, 5),
            (StatName::Speed, 7),
        ]);
        Actor::new("Roland", stats).unwrap()
    }

    fn amulet() -> Item {
        Item::new("Amulet of Vigor", ItemKind::Amulet)
            .with_modifier(StatName::Health, 20)
            .with_modifier(StatName::Defense, 2)
    }

    fn assert_pools_within_bounds(actor: &Actor) {
        assert!(actor.health() >= 0 && actor.health() <= actor.max_health());
        assert!(actor.mana() >= 0 && actor.mana() <= actor.max_mana());
        assert!(actor.stamina() >= 0 && actor.stamina() <= actor.max_stamina());
    }

    #[test]
    fn test_new_actor_has_full_pools() {
        let actor = fighter();
        assert_eq!(actor.level(), 1);
        assert_eq!(actor.health(), 100);
        assert_eq!(actor.mana(), 30);
        assert_eq!(actor.stamina(), 50);
    }

    #[test]
    fn test_empty_name_rejected() {
        let err = Actor::new("   ", StatBlock::new()).unwrap_err();
        assert!(matches!(err, GameError::InvalidArgument(_)));

        let mut actor = fighter();
        assert!(actor.set_name("").is_err());
        assert_eq!(actor.name(), "Roland");
    }

    #[test]
    fn test_level_zero_rejected() {
        let mut actor = fighter();
        assert!(matches!(
            actor.set_level(0),
            Err(GameError::InvalidArgument(_))
        ));
        actor.set_level(4).unwrap();
        assert_eq!(actor.level(), 4);
    }

    #[test]
    fn test_equip_applies_modifiers() {
        let mut actor = fighter();
        assert!(actor.equip(amulet()).unwrap().is_none());
        assert_eq!(actor.max_health(), 120);
        assert_eq!(actor.stat(StatName::Defense), 7);
        // Raising the max does not refill the pool
        assert_eq!(actor.health(), 100);
    }

    #[test]
    fn test_equip_then_unequip_restores_stats() {
        let mut actor = fighter();
        let before = actor.effective_stats().clone();

        actor.equip(amulet()).unwrap();
        assert_ne!(actor.effective_stats(), &before);

        let removed = actor.unequip(Slot::Amulet).unwrap();
        assert_eq!(removed.name, "Amulet of Vigor");
        assert_eq!(actor.effective_stats(), &before);
    }

    #[test]
    fn test_unequip_clamps_pools() {
        let mut actor = fighter();
        actor.equip(amulet()).unwrap();
        actor.restore_all();
        assert_eq!(actor.health(), 120);

        actor.unequip(Slot::Amulet);
        assert_eq!(actor.health(), 100);
        assert_pools_within_bounds(&actor);
    }

    #[test]
    fn test_negative_max_clamps_to_zero() {
        let mut actor = fighter();
        let cursed = Item::new("Cursed Ring", ItemKind::Ring).with_modifier(StatName::Mana, -80);
        actor.equip(cursed).unwrap();
        assert_eq!(actor.max_mana(), 0);
        assert_eq!(actor.mana(), 0);
        assert_pools_within_bounds(&actor);
    }

    #[test]
    fn test_equip_occupied_slot_swaps() {
        let mut actor = fighter();
        let old = Item::new("Mace", ItemKind::Mace).with_modifier(StatName::Attack, 5);
        let new = Item::new("Axe", ItemKind::Axe).with_modifier(StatName::Attack, 8);

        actor.equip(old).unwrap();
        let replaced = actor.equip(new).unwrap().unwrap();
        assert_eq!(replaced.name, "Mace");
        assert_eq!(actor.stat(StatName::Attack), 18);
    }

    #[test]
    fn test_equip_strict_reports_conflict() {
        let mut actor = fighter();
        actor.equip_strict(amulet()).unwrap();
        let err = actor.equip_strict(amulet()).unwrap_err();
        assert!(matches!(err, GameError::SlotConflict { slot: Slot::Amulet, .. }));
    }

    #[test]
    fn test_equip_optional_none_is_noop() {
        let mut actor = fighter();
        let before = actor.effective_stats().clone();
        assert!(actor.equip_optional(None).unwrap().is_none());
        assert_eq!(actor.effective_stats(), &before);
    }

    #[test]
    fn test_unequip_named_rejects_unknown_slot() {
        let mut actor = fighter();
        let err = actor.unequip_named("belt").unwrap_err();
        assert!(matches!(err, GameError::InvalidArgument(_)));
        assert!(actor.unequip_named("weapon").unwrap().is_none());
    }

    #[test]
    fn test_dual_wield_requires_both_weapons() {
        let mut actor = fighter();
        let dagger = Item::new("Dagger", ItemKind::Dagger)
            .with_modifier(StatName::Attack, 3)
            .with_dual_wield();
        let axe = Item::new("Axe", ItemKind::Axe).with_modifier(StatName::Attack, 8);

        // No main weapon yet
        let err = actor.equip_to(Slot::Offhand, dagger.clone()).unwrap_err();
        assert!(matches!(err, GameError::SlotConflict { .. }));

        // Main weapon that cannot dual-wield
        actor.equip(axe.clone()).unwrap();
        assert!(actor.equip_to(Slot::Offhand, dagger.clone()).is_err());

        // Both allow it
        actor.equip(dagger.clone()).unwrap();
        actor.equip_to(Slot::Offhand, dagger).unwrap();
        assert!(actor.equipment().is_dual_wielding());
        assert_eq!(actor.stat(StatName::Attack), 16);

        // Cannot swap the main hand to a weapon that forbids it
        let err = actor.equip(axe).unwrap_err();
        assert!(matches!(err, GameError::SlotConflict { slot: Slot::Offhand, .. }));
    }

    #[test]
    fn test_unequip_main_hand_promotes_offhand_weapon() {
        let mut actor = fighter();
        let dagger = Item::new("Dagger", ItemKind::Dagger)
            .with_modifier(StatName::Attack, 3)
            .with_dual_wield();
        let dirk = Item::new("Dirk", ItemKind::Dagger)
            .with_modifier(StatName::Attack, 5)
            .with_dual_wield();
        actor.equip(dagger.clone()).unwrap();
        actor.equip_to(Slot::Offhand, dirk.clone()).unwrap();

        assert_eq!(actor.unequip(Slot::Weapon), Some(dagger));
        assert_eq!(actor.equipped(Slot::Weapon), Some(&dirk));
        assert!(actor.equipped(Slot::Offhand).is_none());
        assert!(!actor.equipment().is_dual_wielding());

        // A shield stays where it is
        let shield = Item::new("Shield", ItemKind::Shield).with_modifier(StatName::Defense, 4);
        actor.equip(shield.clone()).unwrap();
        actor.unequip(Slot::Weapon);
        assert!(actor.equipped(Slot::Weapon).is_none());
        assert_eq!(actor.equipped(Slot::Offhand), Some(&shield));
    }

    #[test]
    fn test_equip_to_wrong_slot() {
        let mut actor = fighter();
        let err = actor.equip_to(Slot::Boots, amulet()).unwrap_err();
        assert!(matches!(err, GameError::InvalidArgument(_)));
    }

    #[test]
    fn test_inventory_equip_cycle() {
        let mut actor = fighter();
        actor.inventory.add_one(amulet());

        actor.equip_from_inventory("amulet of vigor").unwrap();
        assert!(actor.inventory.stacks().is_empty());
        assert_eq!(actor.max_health(), 120);

        actor.unequip_to_inventory(Slot::Amulet).unwrap();
        assert_eq!(actor.inventory.quantity_of("Amulet of Vigor"), 1);
        assert_eq!(actor.max_health(), 100);

        assert!(matches!(
            actor.equip_from_inventory("Sword"),
            Err(GameError::NotFound(_))
        ));
        assert!(matches!(
            actor.unequip_to_inventory(Slot::Boots),
            Err(GameError::NotFound(_))
        ));
    }

    #[test]
    fn test_damage_and_heal_clamp() {
        let mut actor = fighter();
        let taken = actor.take_damage(30);
        assert_eq!(taken.applied, 30);
        assert_eq!(actor.health(), 70);

        assert_eq!(actor.heal(50), 30);
        assert_eq!(actor.health(), 100);

        let taken = actor.take_damage(500);
        assert_eq!(taken.applied, 100);
        assert!(taken.dropped_to_zero);
        assert_eq!(actor.health(), 0);
        assert!(!actor.is_alive());
    }

    #[test]
    fn test_spend_pools() {
        let mut actor = fighter();
        assert!(actor.spend_mana(20));
        assert!(!actor.spend_mana(20));
        assert_eq!(actor.mana(), 10);
        assert_eq!(actor.restore_mana(100), 20);

        assert!(actor.spend_stamina(50));
        assert_eq!(actor.stamina(), 0);
        assert_eq!(actor.restore_stamina(5), 5);
    }

    #[test]
    fn test_use_potion() {
        let mut actor = fighter();
        actor.take_damage(40);
        let potion =
            Item::new("Health Potion", ItemKind::HealthPotion).with_effect(ConsumableEffect::RestoreHealth(25));
        actor.inventory.add(potion, 2).unwrap();

        let used = actor.use_item("Health Potion").unwrap();
        assert_eq!(used.restored, 25);
        assert_eq!(actor.health(), 85);
        assert_eq!(actor.inventory.quantity_of("Health Potion"), 1);
    }

    #[test]
    fn test_use_non_consumable_keeps_item() {
        let mut actor = fighter();
        actor.inventory.add_one(amulet());
        let err = actor.use_item("Amulet of Vigor").unwrap_err();
        assert!(matches!(err, GameError::InvalidArgument(_)));
        assert_eq!(actor.inventory.quantity_of("Amulet of Vigor"), 1);
        assert!(matches!(actor.use_item("Elixir"), Err(GameError::NotFound(_))));
    }

    #[test]
    fn test_experience_levels_up() {
        let mut actor = fighter();
        let progression = ProgressionConfig::default();

        assert!(actor.gain_experience(50, &progression).is_empty());
        assert_eq!(actor.experience(), 50);

        // 50 + 280 = 330: level 1 -> 2 costs 100, level 2 -> 3 costs 200
        let gained = actor.gain_experience(280, &progression);
        assert_eq!(gained, vec![LevelUp { level: 2 }, LevelUp { level: 3 }]);
        assert_eq!(actor.level(), 3);
        assert_eq!(actor.experience(), 30);

        // Default growth: +10 health per level
        assert_eq!(actor.max_health(), 120);
        assert_eq!(actor.health(), 120);
    }

    #[test]
    fn test_class_bonuses_survive_recompute() {
        let mut actor = Actor::with_class("Brunhild", CharacterClass::Warrior).unwrap();
        // 120 base + 10 class bonus
        assert_eq!(actor.max_health(), 130);
        assert_eq!(actor.health(), 130);

        actor.equip(amulet()).unwrap();
        actor.unequip(Slot::Amulet);
        assert_eq!(actor.max_health(), 130);
        assert_eq!(actor.stat(StatName::Defense), 15);
    }

    #[test]
    fn test_pools_bounded_after_every_recompute() {
        let mut actor = Actor::with_class("Vex", CharacterClass::Rogue).unwrap();
        let items = [
            amulet(),
            Item::new("Lead Boots", ItemKind::Boots).with_modifier(StatName::Stamina, -200),
            Item::new("Robe", ItemKind::Robe).with_modifier(StatName::Health, -50),
        ];
        for item in items {
            actor.equip(item).unwrap();
            assert_pools_within_bounds(&actor);
        }
        for slot in Slot::all() {
            actor.unequip(slot);
            assert_pools_within_bounds(&actor);
        }
    }

    #[test]
    fn test_defending_stance() {
        let mut actor = fighter();
        assert!(!actor.is_defending());
        actor.begin_defending();
        assert!(actor.stop_defending());
        assert!(!actor.stop_defending());
    }
}
