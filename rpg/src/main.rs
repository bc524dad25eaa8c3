//! Console duel runner.
//!
//! ```bash
//! cargo run -p rpg -- --name "Aria" --class warrior --opponent rogue
//! cargo run -p rpg -- --auto --seed 42 --save aria.json
//! ```
//!
//! Set `RUST_LOG=rpg_core=debug` to trace stat recomputes and rounds.

mod headless;

use clap::Parser;
use rpg_core::CharacterClass;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Fight a one-on-one duel against an AI opponent.
#[derive(Debug, Parser)]
#[command(name = "rpg", version, about)]
struct Args {
    /// Your character's name
    #[arg(long, default_value = "Adventurer")]
    name: String,

    /// Your class: warrior, rogue or mage
    #[arg(long, default_value = "warrior")]
    class: CharacterClass,

    /// Opponent's name
    #[arg(long, default_value = "Rival")]
    opponent_name: String,

    /// Opponent's class
    #[arg(long, default_value = "rogue")]
    opponent: CharacterClass,

    /// Seed for reproducible fights
    #[arg(long)]
    seed: Option<u64>,

    /// Let the AI choose your actions too
    #[arg(long)]
    auto: bool,

    /// JSON file overriding the rule constants
    #[arg(long)]
    config: Option<PathBuf>,

    /// Start from a saved character instead of building a new one
    #[arg(long)]
    load: Option<PathBuf>,

    /// Save your character after the duel
    #[arg(long)]
    save: Option<PathBuf>,
}

impl From<Args> for headless::DuelConfig {
    fn from(args: Args) -> Self {
        Self {
            name: args.name,
            class: args.class,
            opponent_name: args.opponent_name,
            opponent_class: args.opponent,
            seed: args.seed,
            auto: args.auto,
            config_path: args.config,
            load_path: args.load,
            save_path: args.save,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    headless::run_duel(args.into()).await
}
