//! Turn-based combat between two actors.
//!
//! The resolver runs a small state machine:
//!
//! ```text
//! Idle -> TurnResolution -> Idle      (both still standing)
//!                        -> Finished  (someone dropped to 0, or the round cap hit)
//! ```
//!
//! Each round the faster actor acts first (ties go to the first actor
//! passed in). Actions come from an [`ActionProvider`], randomness from the
//! injected [`GameRng`]. The resolver never performs I/O; everything that
//! happened is returned as [`CombatEvent`]s.
//!
//! Damage:
//!
//! ```text
//! base       = max(0, attack - defense * defense_factor)
//! multiplier = uniform(variance_low, variance_high)
//! damage     = round(base * multiplier [* crit_multiplier] [* defend_multiplier])
//! ```

use crate::actor::{Actor, ActorId, LevelUp};
use crate::config::GameConfig;
use crate::dice::GameRng;
use crate::error::GameError;
use crate::stats::StatName;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ============================================================================
// Actions
// ============================================================================

/// What an actor does on its turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    Attack,
    Defend,
}

impl FromStr for Action {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "attack" | "a" => Ok(Action::Attack),
            "defend" | "d" => Ok(Action::Defend),
            _ => Err(GameError::invalid(format!(
                "unknown action: {s}. Valid actions: attack, defend"
            ))),
        }
    }
}

/// Chooses actions for actors. Supplied by the caller: console input, AI or UI.
pub trait ActionProvider {
    fn choose_action(&mut self, actor: &Actor, opponent: &Actor) -> Action;
}

impl<F> ActionProvider for F
where
    F: FnMut(&Actor, &Actor) -> Action,
{
    fn choose_action(&mut self, actor: &Actor, opponent: &Actor) -> Action {
        self(actor, opponent)
    }
}

/// Attacks every turn.
#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysAttack;

impl ActionProvider for AlwaysAttack {
    fn choose_action(&mut self, _actor: &Actor, _opponent: &Actor) -> Action {
        Action::Attack
    }
}

/// Attacks, but raises its guard when health runs low.
///
/// Never defends twice in a row, so a fight against it always progresses.
#[derive(Debug, Clone, Copy)]
pub struct TacticalAi {
    /// Health ratio below which the AI defends.
    pub defend_below: f64,
}

impl Default for TacticalAi {
    fn default() -> Self {
        Self { defend_below: 0.3 }
    }
}

impl ActionProvider for TacticalAi {
    fn choose_action(&mut self, actor: &Actor, _opponent: &Actor) -> Action {
        if actor.health_ratio() < self.defend_below && !actor.is_defending() {
            Action::Defend
        } else {
            Action::Attack
        }
    }
}

// ============================================================================
// Events and Results
// ============================================================================

/// One of the two actors handed to the resolver, by argument position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Side {
    First,
    Second,
}

/// Every number that went into one hit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DamageRoll {
    /// Attack minus scaled defense, floored at 0.
    pub base: f64,
    pub multiplier: f64,
    pub critical: bool,
    /// The defender's stance absorbed part of the hit.
    pub defended: bool,
    pub amount: u32,
}

/// Something that happened during combat.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CombatEvent {
    RoundStarted {
        round: u32,
    },
    Defended {
        actor: String,
    },
    Attacked {
        attacker: String,
        defender: String,
        roll: DamageRoll,
        remaining_health: i32,
    },
    Defeated {
        actor: String,
    },
    ItemLooted {
        winner: String,
        item_name: String,
        quantity: u32,
    },
    GoldLooted {
        winner: String,
        amount: u32,
    },
    ExperienceGained {
        actor: String,
        amount: u32,
    },
    LeveledUp {
        actor: String,
        level: u32,
    },
    Draw {
        rounds: u32,
    },
}

impl fmt::Display for CombatEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CombatEvent::RoundStarted { round } => write!(f, "-- Round {round} --"),
            CombatEvent::Defended { actor } => write!(f, "{actor} raises their guard."),
            CombatEvent::Attacked {
                attacker,
                defender,
                roll,
                remaining_health,
            } => {
                write!(f, "{attacker} hits {defender} for {}", roll.amount)?;
                if roll.critical {
                    write!(f, " (critical!)")?;
                }
                if roll.defended {
                    write!(f, " (blocked half)")?;
                }
                write!(f, ". {defender} has {remaining_health} HP left.")
            }
            CombatEvent::Defeated { actor } => write!(f, "{actor} is defeated!"),
            CombatEvent::ItemLooted {
                winner,
                item_name,
                quantity,
            } => write!(f, "{winner} loots {quantity}x {item_name}."),
            CombatEvent::GoldLooted { winner, amount } => {
                write!(f, "{winner} loots {amount} gold.")
            }
            CombatEvent::ExperienceGained { actor, amount } => {
                write!(f, "{actor} gains {amount} experience.")
            }
            CombatEvent::LeveledUp { actor, level } => {
                write!(f, "{actor} reaches level {level}!")
            }
            CombatEvent::Draw { rounds } => {
                write!(f, "The battle ends in a draw after {rounds} rounds.")
            }
        }
    }
}

/// Resolver state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CombatState {
    Idle,
    TurnResolution,
    Finished,
}

/// Result of one round.
#[derive(Debug, Clone, PartialEq)]
pub struct RoundOutcome {
    pub round: u32,
    pub events: Vec<CombatEvent>,
    /// Set once one side is down.
    pub winner: Option<Side>,
}

/// One stack taken from the loser.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LootedItem {
    pub item_name: String,
    pub quantity: u32,
    /// How many the loser held.
    pub available: u32,
}

/// Everything the winner took.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Loot {
    pub items: Vec<LootedItem>,
    pub gold: u32,
}

/// How the encounter ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CombatResult {
    Victory {
        winner: Side,
        winner_id: ActorId,
        winner_name: String,
        loser_name: String,
    },
    Draw,
}

/// Final report of a full encounter.
#[derive(Debug, Clone, PartialEq)]
pub struct CombatOutcome {
    pub result: CombatResult,
    pub rounds: u32,
    /// `"<winner> wins!"`, or a draw notice.
    pub message: String,
    pub loot: Loot,
    pub experience: u32,
    pub level_ups: Vec<LevelUp>,
    pub events: Vec<CombatEvent>,
}

impl CombatOutcome {
    pub fn winner_name(&self) -> Option<&str> {
        match &self.result {
            CombatResult::Victory { winner_name, .. } => Some(winner_name),
            CombatResult::Draw => None,
        }
    }

    pub fn is_draw(&self) -> bool {
        matches!(self.result, CombatResult::Draw)
    }
}

// ============================================================================
// Resolver
// ============================================================================

/// Who acts first: the faster actor, ties to `first`.
pub fn turn_order(first: &Actor, second: &Actor) -> Side {
    if second.stat(StatName::Speed) > first.stat(StatName::Speed) {
        Side::Second
    } else {
        Side::First
    }
}

/// Resolves encounters between two actors.
pub struct CombatResolver<R> {
    rng: R,
    config: GameConfig,
    state: CombatState,
    round: u32,
    log: Vec<CombatEvent>,
}

impl<R: GameRng> CombatResolver<R> {
    pub fn new(rng: R) -> Self {
        Self::with_config(rng, GameConfig::default())
    }

    pub fn with_config(rng: R, config: GameConfig) -> Self {
        Self {
            rng,
            config,
            state: CombatState::Idle,
            round: 0,
            log: Vec::new(),
        }
    }

    pub fn state(&self) -> CombatState {
        self.state
    }

    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Events recorded so far in the current encounter.
    pub fn log(&self) -> &[CombatEvent] {
        &self.log
    }

    /// Return to `Idle` for a new encounter.
    pub fn reset(&mut self) {
        self.state = CombatState::Idle;
        self.round = 0;
        self.log.clear();
    }

    /// Roll damage for one attack. Clears the defender's stance if it
    /// absorbed the hit; does not touch health.
    pub fn roll_damage(&mut self, attacker: &Actor, defender: &mut Actor) -> DamageRoll {
        let combat = &self.config.combat;
        let attack = attacker.stat(StatName::Attack) as f64;
        let defense = defender.stat(StatName::Defense) as f64;

        let base = (attack - defense * combat.defense_factor).max(0.0);
        let multiplier = self.rng.uniform(combat.variance_low, combat.variance_high);
        let critical = self.rng.chance(combat.crit_chance);

        let mut damage = base * multiplier;
        if critical {
            damage *= combat.crit_multiplier;
        }
        let defended = defender.stop_defending();
        if defended {
            damage *= combat.defend_multiplier;
        }

        DamageRoll {
            base,
            multiplier,
            critical,
            defended,
            amount: damage.round().max(0.0) as u32,
        }
    }

    /// Play one round: each living actor takes one action, fastest first.
    pub fn resolve_round<P: ActionProvider + ?Sized>(
        &mut self,
        first: &mut Actor,
        second: &mut Actor,
        actions: &mut P,
    ) -> Result<RoundOutcome, GameError> {
        if self.state == CombatState::Finished {
            return Err(GameError::InvalidState(
                "combat is already finished".to_string(),
            ));
        }

        match (first.is_alive(), second.is_alive()) {
            (false, false) => {
                return Err(GameError::invalid("both combatants are already defeated"));
            }
            (true, false) | (false, true) => {
                self.state = CombatState::Finished;
                let winner = if first.is_alive() {
                    Side::First
                } else {
                    Side::Second
                };
                return Ok(RoundOutcome {
                    round: self.round,
                    events: Vec::new(),
                    winner: Some(winner),
                });
            }
            (true, true) => {}
        }

        self.state = CombatState::TurnResolution;
        self.round += 1;
        let mut events = vec![CombatEvent::RoundStarted { round: self.round }];

        let (lead, trail) = match turn_order(first, second) {
            Side::First => (&mut *first, &mut *second),
            Side::Second => (&mut *second, &mut *first),
        };
        self.take_turn(lead, trail, actions, &mut events);
        if trail.is_alive() {
            self.take_turn(trail, lead, actions, &mut events);
        }

        let winner = if !second.is_alive() {
            Some(Side::First)
        } else if !first.is_alive() {
            Some(Side::Second)
        } else {
            None
        };

        self.state = if winner.is_some() {
            CombatState::Finished
        } else {
            CombatState::Idle
        };
        tracing::debug!(round = self.round, state = ?self.state, "round resolved");

        self.log.extend(events.iter().cloned());
        Ok(RoundOutcome {
            round: self.round,
            events,
            winner,
        })
    }

    /// Fight until one side drops or the round cap is reached, then hand
    /// out loot and experience.
    pub fn resolve<P: ActionProvider + ?Sized>(
        &mut self,
        first: &mut Actor,
        second: &mut Actor,
        actions: &mut P,
    ) -> Result<CombatOutcome, GameError> {
        if self.state == CombatState::Finished {
            return Err(GameError::InvalidState(
                "combat is already finished; reset the resolver first".to_string(),
            ));
        }

        let max_rounds = self.config.combat.max_rounds;
        let winner = loop {
            if self.round >= max_rounds {
                break None;
            }
            if let Some(winner) = self.resolve_round(first, second, actions)?.winner {
                break Some(winner);
            }
        };

        match winner {
            Some(Side::First) => self.conclude(Side::First, first, second),
            Some(Side::Second) => self.conclude(Side::Second, second, first),
            None => Ok(self.draw(first, second)),
        }
    }

    /// Move a random share of each of the loser's stacks, and all of their
    /// gold, to the winner. The loser's inventory ends up empty.
    pub fn loot(&mut self, winner: &mut Actor, loser: &mut Actor) -> Result<Loot, GameError> {
        let mut loot = Loot::default();

        for stack in loser.inventory.drain() {
            let available = stack.quantity;
            if available == 0 {
                continue;
            }
            let high = i32::try_from(available).unwrap_or(i32::MAX);
            let quantity = (self.rng.roll(1, high).max(1) as u32).min(available);

            loot.items.push(LootedItem {
                item_name: stack.item.name.clone(),
                quantity,
                available,
            });
            winner.inventory.add(stack.item, quantity)?;
        }

        loot.gold = loser.inventory.take_gold();
        winner.inventory.add_gold(loot.gold);
        loser.inventory.clear();

        Ok(loot)
    }

    fn take_turn<P: ActionProvider + ?Sized>(
        &mut self,
        actor: &mut Actor,
        opponent: &mut Actor,
        actions: &mut P,
        events: &mut Vec<CombatEvent>,
    ) {
        match actions.choose_action(actor, opponent) {
            Action::Defend => {
                actor.begin_defending();
                events.push(CombatEvent::Defended {
                    actor: actor.name().to_string(),
                });
            }
            Action::Attack => {
                let roll = self.roll_damage(actor, opponent);
                let taken = opponent.take_damage(roll.amount);
                events.push(CombatEvent::Attacked {
                    attacker: actor.name().to_string(),
                    defender: opponent.name().to_string(),
                    roll,
                    remaining_health: taken.remaining,
                });
                if taken.dropped_to_zero {
                    events.push(CombatEvent::Defeated {
                        actor: opponent.name().to_string(),
                    });
                }
            }
        }
    }

    fn conclude(
        &mut self,
        side: Side,
        winner: &mut Actor,
        loser: &mut Actor,
    ) -> Result<CombatOutcome, GameError> {
        let mut events = Vec::new();
        winner.stop_defending();
        loser.stop_defending();

        let loot = if self.config.combat.loot_on_defeat {
            self.loot(winner, loser)?
        } else {
            Loot::default()
        };
        for item in &loot.items {
            events.push(CombatEvent::ItemLooted {
                winner: winner.name().to_string(),
                item_name: item.item_name.clone(),
                quantity: item.quantity,
            });
        }
        if loot.gold > 0 {
            events.push(CombatEvent::GoldLooted {
                winner: winner.name().to_string(),
                amount: loot.gold,
            });
        }

        let experience = self
            .config
            .combat
            .experience_per_level
            .saturating_mul(loser.level());
        let level_ups = if experience > 0 {
            events.push(CombatEvent::ExperienceGained {
                actor: winner.name().to_string(),
                amount: experience,
            });
            winner.gain_experience(experience, &self.config.progression)
        } else {
            Vec::new()
        };
        for level_up in &level_ups {
            events.push(CombatEvent::LeveledUp {
                actor: winner.name().to_string(),
                level: level_up.level,
            });
        }

        self.state = CombatState::Finished;
        self.log.extend(events);

        let message = format!("{} wins!", winner.name());
        tracing::info!(
            winner = %winner.name(),
            loser = %loser.name(),
            rounds = self.round,
            "combat finished"
        );

        Ok(CombatOutcome {
            result: CombatResult::Victory {
                winner: side,
                winner_id: winner.id,
                winner_name: winner.name().to_string(),
                loser_name: loser.name().to_string(),
            },
            rounds: self.round,
            message,
            loot,
            experience,
            level_ups,
            events: std::mem::take(&mut self.log),
        })
    }

    fn draw(&mut self, first: &mut Actor, second: &mut Actor) -> CombatOutcome {
        first.stop_defending();
        second.stop_defending();
        tracing::warn!(rounds = self.round, "round limit reached, combat ends in a draw");
        let event = CombatEvent::Draw { rounds: self.round };
        let message = event.to_string();
        self.log.push(event);
        self.state = CombatState::Finished;

        CombatOutcome {
            result: CombatResult::Draw,
            rounds: self.round,
            message,
            loot: Loot::default(),
            experience: 0,
            level_ups: Vec::new(),
            events: std::mem::take(&mut self.log),
        }
    }
}
