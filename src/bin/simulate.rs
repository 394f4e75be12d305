use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use ludo::{config::Config, simulation::run_games};
use tracing_subscriber::EnvFilter;

/// Play many random Ludo games and print win statistics per seat.
#[derive(Parser, Debug)]
#[command(name = "simulate")]
struct Args {
    /// YAML config file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Number of games (overrides the config).
    #[arg(long)]
    games: Option<u32>,

    /// First seed; game `i` uses `seed + i` (overrides the config).
    #[arg(long)]
    seed: Option<u64>,

    /// Write the report to this file as well.
    #[arg(long)]
    out: Option<PathBuf>,
}

fn main() -> ExitCode {
    let args = Args::parse();

    let mut config = match Config::load_or_default(args.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
    };
    if let Some(games) = args.games {
        config.simulation.games = games;
    }
    if let Some(seed) = args.seed {
        config.game.seed = Some(seed);
    }

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.filter));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let seed = config.game.seed.unwrap_or_else(rand::random);
    let start = std::time::Instant::now();
    let summary = match run_games(&config.simulation, seed) {
        Ok(summary) => summary,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
    };

    let report = summary.to_report();
    println!("{report}");
    println!("Seed: {seed}, took {:?}", start.elapsed());

    if let Some(path) = args.out {
        if let Err(e) = std::fs::write(&path, report) {
            eprintln!("error: cannot write {}: {e}", path.display());
            return ExitCode::FAILURE;
        }
    }
    ExitCode::SUCCESS
}
