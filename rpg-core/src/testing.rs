//! Testing utilities.
//!
//! - [`ScriptedRng`] answers random rolls from fixed values or queues, so
//!   damage and loot outcomes can be asserted exactly
//! - [`ScriptedActions`] plays back a fixed list of combat actions
//! - sample actors for quick setups

use crate::actor::Actor;
use crate::class_data::CharacterClass;
use crate::combat::{Action, ActionProvider};
use crate::dice::GameRng;
use crate::items::{ConsumableEffect, Item, ItemKind};
use crate::stats::{StatBlock, StatName};
use std::collections::VecDeque;

/// A [`GameRng`] with scripted answers.
///
/// Queued values are used first. Once a queue is empty:
/// - `uniform` returns the fixed uniform value if set, otherwise `low`
/// - `random` returns the fixed random value (1.0 by default, never a crit)
/// - `roll` returns `low`
#[derive(Debug, Clone)]
pub struct ScriptedRng {
    uniforms: VecDeque<f64>,
    randoms: VecDeque<f64>,
    rolls: VecDeque<i32>,
    fixed_uniform: Option<f64>,
    fixed_random: f64,
}

impl Default for ScriptedRng {
    fn default() -> Self {
        Self::new()
    }
}

impl ScriptedRng {
    pub fn new() -> Self {
        Self {
            uniforms: VecDeque::new(),
            randoms: VecDeque::new(),
            rolls: VecDeque::new(),
            fixed_uniform: None,
            fixed_random: 1.0,
        }
    }

    /// Always answer `uniform` with `value` once the queue is empty.
    pub fn with_uniform(mut self, value: f64) -> Self {
        self.fixed_uniform = Some(value);
        self
    }

    /// Always answer `random` with `value` once the queue is empty.
    pub fn with_random(mut self, value: f64) -> Self {
        self.fixed_random = value;
        self
    }

    pub fn with_uniforms(mut self, values: impl IntoIterator<Item = f64>) -> Self {
        self.uniforms.extend(values);
        self
    }

    pub fn with_randoms(mut self, values: impl IntoIterator<Item = f64>) -> Self {
        self.randoms.extend(values);
        self
    }

    pub fn with_rolls(mut self, values: impl IntoIterator<Item = i32>) -> Self {
        self.rolls.extend(values);
        self
    }
}

impl GameRng for ScriptedRng {
    fn uniform(&mut self, low: f64, _high: f64) -> f64 {
        self.uniforms
            .pop_front()
            .or(self.fixed_uniform)
            .unwrap_or(low)
    }

    fn random(&mut self) -> f64 {
        self.randoms.pop_front().unwrap_or(self.fixed_random)
    }

    fn roll(&mut self, low: i32, high: i32) -> i32 {
        match self.rolls.pop_front() {
            Some(value) if high >= low => value.clamp(low, high),
            _ => low,
        }
    }
}

/// Plays back scripted actions, then repeats a fallback.
#[derive(Debug, Clone)]
pub struct ScriptedActions {
    actions: VecDeque<Action>,
    fallback: Action,
}

impl ScriptedActions {
    pub fn new(actions: impl IntoIterator<Item = Action>) -> Self {
        Self {
            actions: actions.into_iter().collect(),
            fallback: Action::Attack,
        }
    }

    pub fn with_fallback(mut self, fallback: Action) -> Self {
        self.fallback = fallback;
        self
    }
}

impl ActionProvider for ScriptedActions {
    fn choose_action(&mut self, _actor: &Actor, _opponent: &Actor) -> Action {
        self.actions.pop_front().unwrap_or(self.fallback)
    }
}

/// A plain actor with the given health, attack, defense and speed.
pub fn create_sample_actor(
    name: &str,
    health: i32,
    attack: i32,
    defense: i32,
    speed: i32,
) -> Actor {
    let stats = StatBlock::from_base([
        (StatName::Health, health),
        (StatName::Mana, 20),
        (StatName::Stamina, 40),
        (StatName::Attack, attack),
        (StatName::Defense, defense),
        (StatName::Speed, speed),
    ]);
    Actor::new(name, stats).expect("sample actor needs a non-empty name")
}

/// A level 1 warrior with no gear.
pub fn create_sample_warrior(name: &str) -> Actor {
    Actor::with_class(name, CharacterClass::Warrior).expect("sample actor needs a non-empty name")
}

/// A weak goblin carrying potions, daggers and a little gold.
pub fn create_sample_goblin(name: &str) -> Actor {
    let mut goblin = create_sample_actor(name, 30, 8, 2, 9);
    let dagger = Item::new("Rusty Dagger", ItemKind::Dagger).with_modifier(StatName::Attack, 1);
    goblin.inventory.add_one(dagger.clone());
    goblin.inventory.add_one(dagger);
    goblin.inventory.add_one(
        Item::new("Health Potion", ItemKind::HealthPotion)
            .with_effect(ConsumableEffect::RestoreHealth(25)),
    );
    goblin.inventory.add_gold(7);
    goblin
}
