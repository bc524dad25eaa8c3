//! Line-oriented duel runner.
//!
//! The player types `attack` or `defend` (or `a`/`d`) each turn. Lines
//! starting with `#` are commands:
//! - `#status` shows both combatants
//! - `#help` lists the commands
//! - `#auto` hands the rest of the fight to the AI
//!
//! End of input also switches to the AI, so the runner works when piped.

use anyhow::Context;
use rand::rngs::StdRng;
use rand::SeedableRng;
use rpg_core::{
    Action, ActionProvider, Actor, ActorId, CharacterBuilder, CharacterClass, CombatOutcome,
    CombatResolver, GameConfig, ItemRegistry, SavedCharacter, StatName, TacticalAi,
};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

/// Settings for one duel.
#[derive(Debug, Clone)]
pub struct DuelConfig {
    pub name: String,
    pub class: CharacterClass,
    pub opponent_name: String,
    pub opponent_class: CharacterClass,
    pub seed: Option<u64>,
    pub auto: bool,
    pub config_path: Option<PathBuf>,
    pub load_path: Option<PathBuf>,
    pub save_path: Option<PathBuf>,
}

/// Asks the player for their actions on stdin; the AI plays everyone else.
pub struct ConsoleActions<R> {
    player: ActorId,
    input: R,
    ai: TacticalAi,
    auto: bool,
}

impl<R: BufRead> ConsoleActions<R> {
    pub fn new(player: ActorId, input: R) -> Self {
        Self {
            player,
            input,
            ai: TacticalAi::default(),
            auto: false,
        }
    }

    pub fn is_auto(&self) -> bool {
        self.auto
    }

    fn prompt(&mut self, actor: &Actor, opponent: &Actor) -> Action {
        loop {
            print!(
                "[TURN] {} HP {}/{} vs {} HP {}/{} > ",
                actor.name(),
                actor.health(),
                actor.max_health(),
                opponent.name(),
                opponent.health(),
                opponent.max_health()
            );
            io::stdout().flush().ok();

            let mut line = String::new();
            match self.input.read_line(&mut line) {
                Ok(0) => {
                    println!();
                    println!("[AUTO] End of input, the AI takes over.");
                    self.auto = true;
                    return self.ai.choose_action(actor, opponent);
                }
                Ok(_) => {}
                Err(e) => {
                    eprintln!("Error reading input: {e}");
                    self.auto = true;
                    return self.ai.choose_action(actor, opponent);
                }
            }

            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            if let Some(command) = line.strip_prefix('#') {
                match command.trim() {
                    "status" => {
                        print_status(actor);
                        print_status(opponent);
                    }
                    "auto" => {
                        println!("[AUTO] The AI takes over.");
                        self.auto = true;
                        return self.ai.choose_action(actor, opponent);
                    }
                    "help" => print_help(),
                    _ => println!("[ERROR] Unknown command. Type #help for help."),
                }
                continue;
            }

            match line.parse::<Action>() {
                Ok(action) => return action,
                Err(e) => println!("[ERROR] {e}"),
            }
        }
    }
}

impl<R: BufRead> ActionProvider for ConsoleActions<R> {
    fn choose_action(&mut self, actor: &Actor, opponent: &Actor) -> Action {
        if actor.id != self.player || self.auto {
            return self.ai.choose_action(actor, opponent);
        }
        self.prompt(actor, opponent)
    }
}

/// Run one duel between the player and an AI opponent.
pub async fn run_duel(config: DuelConfig) -> anyhow::Result<()> {
    let rules = match &config.config_path {
        Some(path) => GameConfig::load(path)
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None => GameConfig::default(),
    };

    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let registry = ItemRegistry::standard();

    let mut player = match &config.load_path {
        Some(path) => SavedCharacter::load_json(path)
            .await
            .with_context(|| format!("failed to load character from {}", path.display()))?
            .into_actor()?,
        None => CharacterBuilder::new()
            .name(config.name.as_str())
            .class(config.class)
            .gold(20)
            .build_with_kit(&registry, &mut rng)?,
    };
    let mut opponent = CharacterBuilder::new()
        .name(config.opponent_name.as_str())
        .class(config.opponent_class)
        .gold(15)
        .build_with_kit(&registry, &mut rng)?;

    println!("=== RPG Duel ===");
    print_status(&player);
    print_status(&opponent);
    println!();

    tracing::info!(
        player = %player.name(),
        opponent = %opponent.name(),
        seed = ?config.seed,
        "duel starting"
    );

    let mut resolver = CombatResolver::with_config(rng, rules);
    let outcome = if config.auto {
        resolver.resolve(&mut player, &mut opponent, &mut TacticalAi::default())?
    } else {
        print_help();
        println!();
        let stdin = io::stdin();
        let mut actions = ConsoleActions::new(player.id, stdin.lock());
        resolver.resolve(&mut player, &mut opponent, &mut actions)?
    };

    print_outcome(&outcome);
    println!();
    print_status(&player);

    if let Some(path) = &config.save_path {
        SavedCharacter::new(&player)
            .save_json(path)
            .await
            .with_context(|| format!("failed to save character to {}", path.display()))?;
        println!("[SAVED] Character saved to {}", path.display());
    }

    Ok(())
}

fn print_outcome(outcome: &CombatOutcome) {
    println!("[LOG]");
    for event in &outcome.events {
        println!("  {event}");
    }
    println!();
    println!("[RESULT] {} ({} rounds)", outcome.message, outcome.rounds);
    if !outcome.loot.items.is_empty() || outcome.loot.gold > 0 {
        let items: Vec<String> = outcome
            .loot
            .items
            .iter()
            .map(|item| format!("{}x {}", item.quantity, item.item_name))
            .collect();
        println!(
            "[LOOT] {} gold{}{}",
            outcome.loot.gold,
            if items.is_empty() { "" } else { ", " },
            items.join(", ")
        );
    }
    if outcome.experience > 0 {
        println!("[XP] +{}", outcome.experience);
    }
    for level_up in &outcome.level_ups {
        println!("[LEVEL] Reached level {}", level_up.level);
    }
}

fn print_status(actor: &Actor) {
    let class = actor.class().map(|c| c.name()).unwrap_or("Unknown");
    println!(
        "[STATUS] {} (level {} {}) HP {}/{} MP {}/{} ATK {} DEF {} SPD {} Gold {}",
        actor.name(),
        actor.level(),
        class,
        actor.health(),
        actor.max_health(),
        actor.mana(),
        actor.max_mana(),
        actor.stat(StatName::Attack),
        actor.stat(StatName::Defense),
        actor.stat(StatName::Speed),
        actor.inventory.gold()
    );
    let gear: Vec<String> = actor
        .equipment()
        .iter()
        .map(|(slot, item)| format!("{slot}: {item}"))
        .collect();
    if !gear.is_empty() {
        println!("  Gear: {}", gear.join("; "));
    }
}

fn print_help() {
    println!("Commands:");
    println!("  attack | a   - Attack your opponent");
    println!("  defend | d   - Halve the next hit you take");
    println!("  #status      - Show both combatants");
    println!("  #auto        - Let the AI finish the fight");
    println!("  #help        - Show this help");
}

#[cfg(test)]
mod tests {
    use super::*;
    use rpg_core::testing::create_sample_actor;
    use std::io::Cursor;

    #[test]
    fn test_reads_player_actions() {
        let player = create_sample_actor("Hero", 50, 10, 0, 5);
        let foe = create_sample_actor("Foe", 50, 10, 0, 5);
        let input = Cursor::new("\nnonsense\n#status\ndefend\na\n");
        let mut actions = ConsoleActions::new(player.id, input);

        assert_eq!(actions.choose_action(&player, &foe), Action::Defend);
        assert_eq!(actions.choose_action(&player, &foe), Action::Attack);
        assert!(!actions.is_auto());
    }

    #[test]
    fn test_opponent_uses_ai() {
        let player = create_sample_actor("Hero", 50, 10, 0, 5);
        let foe = create_sample_actor("Foe", 50, 10, 0, 5);
        let mut actions = ConsoleActions::new(player.id, Cursor::new("defend\n"));

        assert_eq!(actions.choose_action(&foe, &player), Action::Attack);
        assert_eq!(actions.choose_action(&player, &foe), Action::Defend);
    }

    #[test]
    fn test_end_of_input_switches_to_ai() {
        let player = create_sample_actor("Hero", 50, 10, 0, 5);
        let foe = create_sample_actor("Foe", 50, 10, 0, 5);
        let mut actions = ConsoleActions::new(player.id, Cursor::new(""));

        assert_eq!(actions.choose_action(&player, &foe), Action::Attack);
        assert!(actions.is_auto());
    }

    #[test]
    fn test_auto_command() {
        let player = create_sample_actor("Hero", 50, 10, 0, 5);
        let foe = create_sample_actor("Foe", 50, 10, 0, 5);
        let mut actions = ConsoleActions::new(player.id, Cursor::new("#auto\ndefend\n"));

        assert_eq!(actions.choose_action(&player, &foe), Action::Attack);
        assert!(actions.is_auto());
        assert_eq!(actions.choose_action(&player, &foe), Action::Attack);
    }

    #[tokio::test]
    async fn test_auto_duel_saves_player() {
        let dir = tempfile::tempdir().unwrap();
        let save = dir.path().join("hero.json");
        let config = DuelConfig {
            name: "Hero".to_string(),
            class: CharacterClass::Warrior,
            opponent_name: "Rival".to_string(),
            opponent_class: CharacterClass::Mage,
            seed: Some(4),
            auto: true,
            config_path: None,
            load_path: None,
            save_path: Some(save.clone()),
        };

        run_duel(config).await.unwrap();
        let meta = SavedCharacter::peek_metadata(&save).await.unwrap();
        assert_eq!(meta.character_name, "Hero");
    }
}
