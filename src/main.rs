use std::path::PathBuf;

use clap::{Parser, Subcommand};
use phaseboard::config::{ConfigError, EngineConfig};
use phaseboard::replay::{self, ReplayError, Script};
use phaseboard::seed::{self, SeedError};

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("seed error: {0}")]
    Seed(#[from] SeedError),
    #[error("replay error: {0}")]
    Replay(#[from] ReplayError),
    #[error("failed to encode output: {0}")]
    Encode(#[from] serde_json::Error),
}

#[derive(Parser, Debug)]
#[command(name = "phaseboard", about = "Phase board drag-and-drop engine")]
struct Cli {
    /// Seed JSON file replacing the bundled board.
    #[arg(long, env = "PHASEBOARD_SEED")]
    seed: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the initial board as JSON.
    Show,
    /// Play a timed event script and print the final board as JSON.
    Replay {
        script: PathBuf,
        /// Print the replay summary instead of just the board.
        #[arg(long)]
        report: bool,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), CliError> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let mut config = EngineConfig::from_env()?;
    if cli.seed.is_some() {
        config.seed_path = cli.seed;
    }
    let board = seed::load_or_bundled(config.seed_path.as_deref())?;
    tracing::debug!(phases = board.len(), cards = board.card_count(), "board loaded");

    match cli.command {
        Command::Show => {
            println!("{}", serde_json::to_string_pretty(&board)?);
        }
        Command::Replay { script, report } => {
            let script = Script::load(&script)?;
            let outcome = replay::run(&script, board, config).await?;
            let out = if report {
                serde_json::to_string_pretty(&outcome)?
            } else {
                serde_json::to_string_pretty(&outcome.board)?
            };
            println!("{out}");
        }
    }
    Ok(())
}
