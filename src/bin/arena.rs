//! Arena CLI: run bot-vs-bot experiments from the command line.
//!
//! Usage:
//!   cargo run --release --bin arena -- --games 100 --p1 hard --p2 easy
//!   cargo run --release --bin arena -- --games 50 --p1 medium --p2 medium --json

use std::collections::HashMap;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use tictactoe_engine::engine::arena::run_arena;
use tictactoe_engine::engine::bot_strategy::{BotStrategy, Difficulty};

#[derive(Parser)]
#[command(name = "arena", about = "Run bot-vs-bot arena experiments for tic-tac-toe")]
struct Cli {
    /// Number of games to play
    #[arg(long, default_value = "100")]
    games: usize,

    /// Random seed
    #[arg(long, default_value = "42")]
    seed: u64,

    /// Alternate seat positions between games
    #[arg(long, default_value = "true", action = clap::ArgAction::Set)]
    alternate_seats: bool,

    /// P1 difficulty: easy, medium or hard
    #[arg(long, default_value = "hard")]
    p1: Difficulty,

    /// P2 difficulty: easy, medium or hard
    #[arg(long, default_value = "easy")]
    p2: Difficulty,

    /// Print results as JSON instead of a summary table
    #[arg(long)]
    json: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    // Names must differ so a tier can play itself.
    let p1_name = format!("p1_{}", cli.p1);
    let p2_name = format!("p2_{}", cli.p2);

    tracing::info!(
        games = cli.games,
        seed = cli.seed,
        alternate_seats = cli.alternate_seats,
        p1 = %cli.p1,
        p2 = %cli.p2,
        "starting arena"
    );

    let mut strategies: HashMap<String, Box<dyn BotStrategy>> = HashMap::new();
    strategies.insert(p1_name, cli.p1.strategy());
    strategies.insert(p2_name, cli.p2.strategy());

    let total = cli.games;
    let json = cli.json;
    let progress_cb = move |done: usize, _total: usize| {
        if !json {
            eprint!("\r  [{}/{}] games completed", done, total);
        }
    };

    let result = run_arena(
        &strategies,
        cli.games,
        cli.seed,
        cli.alternate_seats,
        Some(&progress_cb),
    );

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        eprintln!("\r                                    "); // clear progress line
        println!("{}", result.summary());
    }
    Ok(())
}
