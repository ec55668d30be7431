//! meteor-watch: headless runner for the meteor-guessing game.
//!
//! Usage:
//!   cargo run -p meteor-app -- --guess 3
//!   RUST_LOG=debug cargo run -p meteor-app -- --guess 3 --seed 7 --rounds 2

use std::path::PathBuf;
use std::sync::mpsc;

use anyhow::{Context, Result};
use clap::Parser;
use log::info;

use meteor_app::display::{LogDisplay, NotifyingDisplay};
use meteor_app::state::AppState;
use meteor_core::commands::RoundCommand;
use meteor_core::config::GameConfig;
use meteor_sim::round::validate_guess;
use meteor_sim::RoundController;

#[derive(Parser, Debug)]
#[command(name = "meteor-watch")]
#[command(about = "Guess how many meteors will hit the planet, then watch the round play out")]
struct Args {
    /// Number of collisions you expect during the round
    #[arg(short, long, default_value_t = 0, allow_hyphen_values = true)]
    guess: i64,

    /// Seed for the meteor field (overrides the config file)
    #[arg(long)]
    seed: Option<u64>,

    /// Path to a TOML game config
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Rounds to play with the same guess
    #[arg(long, default_value_t = 1)]
    rounds: u32,

    /// Print each outcome as JSON instead of its message
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => GameConfig::load(path)
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None => GameConfig::default(),
    };
    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    config.validate().context("invalid game config")?;
    let guess = validate_guess(args.guess, config.round.max_guess)?;

    info!(
        "Watching {} meteors for {}s (seed {})",
        config.field.count, config.round.duration_secs, config.seed
    );

    let (outcome_tx, outcome_rx) = mpsc::channel();
    let app = AppState::new();
    app.start_loop(
        RoundController::new(config),
        NotifyingDisplay::new(LogDisplay::default(), outcome_tx),
    )?;

    for round in 1..=args.rounds {
        if round > 1 {
            app.send_command(RoundCommand::Reset)?;
        }
        app.send_command(RoundCommand::SetGuess {
            guess: i64::from(guess),
        })?;
        app.send_command(RoundCommand::Start { guess: None })?;

        let outcome = outcome_rx
            .recv()
            .context("game loop stopped before the round ended")?;
        if args.json {
            println!("{}", serde_json::to_string(&outcome)?);
        } else {
            println!("{}", outcome.message);
        }
    }

    app.shutdown()?;
    Ok(())
}
