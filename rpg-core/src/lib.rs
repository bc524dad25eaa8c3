//! Stat aggregation and turn-based combat engine for RPG characters.
//!
//! This crate provides:
//! - Actors with base stats, equipment modifiers and resource pools
//! - Data-driven items, a type registry and randomized generation
//! - A combat resolver with injected randomness and pluggable action choice
//! - Character persistence
//!
//! # Quick Start
//!
//! ```
//! use rpg_core::{AlwaysAttack, CharacterBuilder, CharacterClass, CombatResolver};
//! use rand::rngs::StdRng;
//! use rand::SeedableRng;
//!
//! let mut hero = CharacterBuilder::new()
//!     .name("Aria")
//!     .class(CharacterClass::Warrior)
//!     .build()
//!     .unwrap();
//! let mut rival = CharacterBuilder::new()
//!     .name("Vex")
//!     .class(CharacterClass::Rogue)
//!     .build()
//!     .unwrap();
//!
//! let mut resolver = CombatResolver::new(StdRng::seed_from_u64(7));
//! let outcome = resolver.resolve(&mut hero, &mut rival, &mut AlwaysAttack).unwrap();
//! println!("{}", outcome.message);
//! ```

pub mod actor;
pub mod character_builder;
pub mod class_data;
pub mod combat;
pub mod config;
pub mod dice;
pub mod equipment;
pub mod error;
pub mod inventory;
pub mod items;
pub mod persist;
pub mod stats;
pub mod testing;

// Primary public API
pub use actor::{Actor, ActorId, DamageTaken, ItemUsed, LevelUp};
pub use character_builder::CharacterBuilder;
pub use class_data::CharacterClass;
pub use combat::{
    turn_order, Action, ActionProvider, AlwaysAttack, CombatEvent, CombatOutcome, CombatResolver,
    CombatResult, CombatState, DamageRoll, Loot, LootedItem, RoundOutcome, Side, TacticalAi,
};
pub use config::{CombatConfig, ConfigError, GameConfig, ProgressionConfig};
pub use dice::GameRng;
pub use equipment::{Equipment, Slot};
pub use error::GameError;
pub use inventory::{Inventory, InventoryStack};
pub use items::{ConsumableEffect, Equippable, Item, ItemKind, ItemRegistry, ItemTemplate};
pub use persist::{ActorRecord, PersistError, SaveMetadata, SavedCharacter};
pub use stats::{EffectiveStats, StatBlock, StatName};
