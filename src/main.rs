//! Terminal front end: renders the board, forwards cell numbers to the
//! engine and paces bot replies.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::thread;
use std::time::Duration;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use tictactoe_engine::engine::bot_strategy::Difficulty;
use tictactoe_engine::engine::game::{GameEngine, GameEvent, GameMode, MoveOutcome};
use tictactoe_engine::engine::models::{GameStatus, Statistics, Symbol};
use tictactoe_engine::engine::settings::{load_default_settings, load_settings, GameSettings};

#[derive(Parser)]
#[command(name = "tictactoe", about = "Play tic-tac-toe in the terminal")]
struct Cli {
    /// Path to tictactoe.toml (default: auto-discover)
    #[arg(long, env = "TICTACTOE_SETTINGS")]
    settings: Option<PathBuf>,

    /// human_vs_human or human_vs_bot
    #[arg(long)]
    mode: Option<GameMode>,

    /// Bot difficulty: easy, medium or hard
    #[arg(short, long)]
    difficulty: Option<Difficulty>,

    /// Symbol the bot plays: x or o
    #[arg(long)]
    bot_symbol: Option<Symbol>,

    /// Pause before the bot answers (ms)
    #[arg(long)]
    delay_ms: Option<u64>,

    /// Seed for the bot's random choices
    #[arg(long)]
    seed: Option<u64>,
}

enum Command {
    Play(usize),
    Restart,
    ResetStats,
    Quit,
    Unknown(String),
}

fn parse_command(line: &str) -> Command {
    let line = line.trim();
    match line {
        "q" | "quit" | "exit" => Command::Quit,
        "r" | "restart" => Command::Restart,
        "s" | "reset-stats" => Command::ResetStats,
        _ => match line.parse::<usize>() {
            Ok(index) => Command::Play(index),
            Err(_) => Command::Unknown(line.to_string()),
        },
    }
}

fn render_board(engine: &GameEngine) -> String {
    let line = engine.winning_line().unwrap_or_default();
    let highlight = engine.winning_line().is_some();
    let mut rows = Vec::new();
    for row in 0..3 {
        let cells: Vec<String> = (0..3)
            .map(|col| {
                let index = row * 3 + col;
                match engine.board().get(index).and_then(|c| c.symbol()) {
                    Some(symbol) if highlight && line.contains(&index) => format!("[{}]", symbol),
                    Some(symbol) => format!(" {} ", symbol),
                    None => format!(" {} ", index),
                }
            })
            .collect();
        rows.push(cells.join("|"));
    }
    rows.join("\n---+---+---\n")
}

fn status_text(engine: &GameEngine) -> String {
    match engine.status() {
        GameStatus::InProgress => format!("Current turn: {}", engine.current_player()),
        GameStatus::Won(symbol) => format!("Player {} wins!", symbol),
        GameStatus::Draw => "It's a draw!".to_string(),
    }
}

fn stats_text(stats: &Statistics) -> String {
    format!(
        "X: {} wins, {} draws  |  O: {} wins, {} draws",
        stats.x.wins, stats.x.draws, stats.o.wins, stats.o.draws
    )
}

fn redraw(engine: &GameEngine) {
    println!("\n{}\n\n{}", render_board(engine), status_text(engine));
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("warn".parse()?))
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    let mut settings: GameSettings = match &cli.settings {
        Some(path) => load_settings(path).map_err(|e| format!("Failed to load settings: {}", e))?,
        None => load_default_settings(),
    };
    if let Some(mode) = cli.mode {
        settings.mode = mode;
    }
    if let Some(difficulty) = cli.difficulty {
        settings.difficulty = difficulty;
    }
    if let Some(symbol) = cli.bot_symbol {
        settings.bot_symbol = symbol;
    }
    if let Some(delay) = cli.delay_ms {
        settings.bot_delay_ms = delay;
    }
    if cli.seed.is_some() {
        settings.seed = cli.seed;
    }
    settings.validate()?;

    tracing::info!(
        mode = %settings.mode,
        difficulty = %settings.difficulty,
        bot_symbol = %settings.bot_symbol,
        "starting game"
    );

    let bot_delay = Duration::from_millis(settings.bot_delay_ms);
    let mut engine = GameEngine::new(settings.game_config());
    engine.subscribe(|event| {
        if let GameEvent::StatisticsChanged(stats) = event {
            println!("{}", stats_text(stats));
        }
    });

    println!("Cells are numbered 0-8. Commands: r = restart, s = reset stats, q = quit.");
    redraw(&engine);

    let stdin = io::stdin();
    let mut pending_bot = engine.pending_bot_turn();
    loop {
        if let Some(turn) = pending_bot.take() {
            thread::sleep(bot_delay);
            let outcome = engine.play_bot_turn(turn);
            if outcome.is_applied() {
                redraw(&engine);
            }
            pending_bot = outcome.bot_turn();
            continue;
        }

        print!("> ");
        io::stdout().flush()?;
        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }

        match parse_command(&line) {
            Command::Quit => break,
            Command::Restart => {
                engine.reset();
                redraw(&engine);
                pending_bot = engine.pending_bot_turn();
            }
            Command::ResetStats => engine.reset_statistics(),
            Command::Play(index) => {
                if engine.pending_bot_turn().is_some() {
                    continue;
                }
                match engine.apply_move(index) {
                    MoveOutcome::Rejected(reason) => {
                        tracing::debug!(index, ?reason, "input ignored");
                    }
                    outcome => {
                        redraw(&engine);
                        pending_bot = outcome.bot_turn();
                    }
                }
            }
            Command::Unknown(text) if text.is_empty() => {}
            Command::Unknown(text) => println!("Unknown command '{}'", text),
        }
    }

    println!("{}", stats_text(&engine.statistics()));
    Ok(())
}
