//! Step-by-step construction of actors.
//!
//! The builder validates input up front and hands back a fully recomputed
//! [`Actor`] with full pools. With a class, the class stat line is the
//! starting point and levels above 1 apply that class's growth table.

use crate::actor::Actor;
use crate::class_data::CharacterClass;
use crate::dice::GameRng;
use crate::equipment::Slot;
use crate::error::GameError;
use crate::items::{Equippable, ItemRegistry};
use crate::stats::{StatBlock, StatName};

/// Builder for [`Actor`]s.
#[derive(Debug, Clone)]
pub struct CharacterBuilder {
    name: Option<String>,
    class: Option<CharacterClass>,
    level: u32,
    stat_overrides: Vec<(StatName, i32)>,
    gold: u32,
}

impl Default for CharacterBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl CharacterBuilder {
    pub fn new() -> Self {
        Self {
            name: None,
            class: None,
            level: 1,
            stat_overrides: Vec::new(),
            gold: 0,
        }
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn class(mut self, class: CharacterClass) -> Self {
        self.class = Some(class);
        self
    }

    pub fn level(mut self, level: u32) -> Self {
        self.level = level;
        self
    }

    /// Override one base stat. Applied before level growth.
    pub fn stat(mut self, stat: StatName, value: i32) -> Self {
        self.stat_overrides.push((stat, value));
        self
    }

    pub fn gold(mut self, gold: u32) -> Self {
        self.gold = gold;
        self
    }

    /// Build the actor without any gear.
    pub fn build(self) -> Result<Actor, GameError> {
        let name = self
            .name
            .ok_or_else(|| GameError::invalid("character name is required"))?;
        if self.level == 0 {
            return Err(GameError::invalid("level must be at least 1"));
        }

        let mut stats = match self.class {
            Some(class) => StatBlock::from_base(class.data().base_stats.iter().copied()),
            None => StatBlock::new(),
        };
        for (stat, value) in &self.stat_overrides {
            stats.set_base(*stat, *value);
        }

        let mut actor = Actor::new(name, stats)?;
        if let Some(class) = self.class {
            actor.set_class(Some(class));
        }
        for _ in 1..self.level {
            actor.apply_level_growth();
        }
        actor.set_level_unchecked(self.level);
        actor.update_stats();
        actor.restore_all();
        actor.inventory.add_gold(self.gold);
        Ok(actor)
    }

    /// Build the actor and hand out the class starting kit.
    ///
    /// Gear goes into free slots, a second dual-wield weapon into the
    /// offhand, and everything else (potions included) into the inventory.
    pub fn build_with_kit<R: GameRng>(
        self,
        registry: &ItemRegistry,
        rng: &mut R,
    ) -> Result<Actor, GameError> {
        let class = self.class;
        let mut actor = self.build()?;
        let Some(class) = class else {
            return Ok(actor);
        };

        for type_name in class.data().starting_kit {
            let item = registry.create(type_name, rng)?;
            let slot = item.slot();

            if item.is_consumable() {
                actor.inventory.add_one(item);
            } else if !actor.equipment().is_occupied(slot) {
                actor.equip(item)?;
            } else if slot == Slot::Weapon
                && item.can_dual_wield()
                && !actor.equipment().is_occupied(Slot::Offhand)
            {
                actor.equip_to(Slot::Offhand, item)?;
            } else {
                actor.inventory.add_one(item);
            }
        }

        actor.restore_all();
        Ok(actor)
    }
}
