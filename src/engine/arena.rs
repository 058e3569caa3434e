//! Bot-vs-bot arena runner.
//!
//! Each game drives a fresh `GameEngine` with two strategies. Games are
//! independent, so they run in parallel; game `i` draws its randomness from
//! `base_seed + i`, which keeps a run reproducible regardless of scheduling.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;

use rand::rngs::StdRng;
use rand::SeedableRng;
use rayon::prelude::*;
use serde::Serialize;

use crate::engine::bot_strategy::BotStrategy;
use crate::engine::game::{GameConfig, GameEngine, GameMode};
use crate::engine::models::{GameStatus, Symbol};

/// Aggregated results from an arena run.
#[derive(Debug, Clone, Serialize)]
pub struct ArenaResult {
    pub num_games: usize,
    pub wins: HashMap<String, usize>,
    pub draws: usize,
    pub games: Vec<GameRecord>,
}

/// One finished arena game.
#[derive(Debug, Clone, Serialize)]
pub struct GameRecord {
    pub x: String,
    pub o: String,
    pub status: GameStatus,
    pub moves: usize,
    pub duration_ms: f64,
}

impl GameRecord {
    pub fn winner_name(&self) -> Option<&str> {
        match self.status {
            GameStatus::Won(Symbol::X) => Some(&self.x),
            GameStatus::Won(Symbol::O) => Some(&self.o),
            _ => None,
        }
    }
}

impl ArenaResult {
    pub fn win_rate(&self, name: &str) -> f64 {
        *self.wins.get(name).unwrap_or(&0) as f64 / self.num_games.max(1) as f64
    }

    /// Games `name` took part in and lost.
    pub fn losses(&self, name: &str) -> usize {
        self.games
            .iter()
            .filter(|g| (g.x == name || g.o == name) && g.winner_name().is_some_and(|w| w != name))
            .count()
    }

    pub fn avg_moves(&self) -> f64 {
        if self.games.is_empty() {
            return 0.0;
        }
        self.games.iter().map(|g| g.moves as f64).sum::<f64>() / self.games.len() as f64
    }

    pub fn confidence_interval_95(&self, name: &str) -> (f64, f64) {
        let n = self.num_games;
        if n == 0 {
            return (0.0, 0.0);
        }
        let p = self.win_rate(name);
        let z = 1.96_f64;
        let denom = 1.0 + z * z / n as f64;
        let center = (p + z * z / (2.0 * n as f64)) / denom;
        let margin = z * ((p * (1.0 - p) + z * z / (4.0 * n as f64)) / n as f64).sqrt() / denom;
        ((center - margin).max(0.0), (center + margin).min(1.0))
    }

    pub fn summary(&self) -> String {
        let mut lines = vec![format!("Arena Results ({} games)", self.num_games)];
        lines.push("=".repeat(60));
        let mut names: Vec<&String> = self.wins.keys().collect();
        names.sort();
        for name in names {
            let wr = self.win_rate(name);
            let (ci_lo, ci_hi) = self.confidence_interval_95(name);
            lines.push(format!(
                "  {:>12}: {:3} wins ({:5.1}%)  [95% CI: {:.1}%-{:.1}%]  losses={}",
                name,
                self.wins[name],
                wr * 100.0,
                ci_lo * 100.0,
                ci_hi * 100.0,
                self.losses(name),
            ));
        }
        lines.push(format!("  {:>12}: {}", "Draws", self.draws));
        if !self.games.is_empty() {
            let total_ms = self.games.iter().map(|g| g.duration_ms).sum::<f64>();
            lines.push(format!(
                "  Avg game: {:.1} moves, {:.1}ms  |  Total: {:.2}s",
                self.avg_moves(),
                total_ms / self.games.len() as f64,
                total_ms / 1000.0,
            ));
        }
        lines.join("\n")
    }
}

/// Run `num_games` between exactly two named strategies.
///
/// Without `alternate_seats` the alphabetically first name always plays X;
/// with it, seats swap every other game.
pub fn run_arena(
    strategies: &HashMap<String, Box<dyn BotStrategy>>,
    num_games: usize,
    base_seed: u64,
    alternate_seats: bool,
    progress_callback: Option<&(dyn Fn(usize, usize) + Sync)>,
) -> ArenaResult {
    let mut names: Vec<String> = strategies.keys().cloned().collect();
    names.sort();
    assert_eq!(names.len(), 2, "arena needs exactly two strategies");

    let completed = AtomicUsize::new(0);

    let games: Vec<GameRecord> = (0..num_games)
        .into_par_iter()
        .map(|game_idx| {
            let (x_name, o_name) = if alternate_seats && game_idx % 2 == 1 {
                (&names[1], &names[0])
            } else {
                (&names[0], &names[1])
            };
            let mut rng = StdRng::seed_from_u64(base_seed + game_idx as u64);

            let t0 = Instant::now();
            let (status, moves) = play_one_game(
                strategies[x_name].as_ref(),
                strategies[o_name].as_ref(),
                &mut rng,
            );
            let duration_ms = t0.elapsed().as_secs_f64() * 1000.0;

            if let Some(cb) = progress_callback {
                let done = completed.fetch_add(1, Ordering::Relaxed) + 1;
                cb(done, num_games);
            }

            GameRecord {
                x: x_name.clone(),
                o: o_name.clone(),
                status,
                moves,
                duration_ms,
            }
        })
        .collect();

    let mut result = ArenaResult {
        num_games,
        wins: names.iter().map(|n| (n.clone(), 0)).collect(),
        draws: 0,
        games: Vec::with_capacity(num_games),
    };

    for game in games {
        match game.winner_name() {
            Some(name) => {
                if let Some(count) = result.wins.get_mut(name) {
                    *count += 1;
                }
            }
            None => result.draws += 1,
        }
        result.games.push(game);
    }

    tracing::debug!(num_games, draws = result.draws, "arena finished");
    result
}

/// Play a full game between `x` and `o`, returning the final status and move count.
pub fn play_one_game(
    x: &dyn BotStrategy,
    o: &dyn BotStrategy,
    rng: &mut StdRng,
) -> (GameStatus, usize) {
    let mut engine = GameEngine::new(GameConfig {
        mode: GameMode::HumanVsHuman,
        ..Default::default()
    });

    let mut moves = 0;
    while !engine.is_over() {
        let symbol = engine.current_player();
        let strategy = match symbol {
            Symbol::X => x,
            Symbol::O => o,
        };
        let Some(index) = strategy.select_move(engine.board(), symbol, rng) else {
            break;
        };
        let outcome = engine.apply_move(index);
        if !outcome.is_applied() {
            tracing::warn!(strategy = strategy.name(), index, ?outcome, "strategy chose an illegal move");
            break;
        }
        moves += 1;
    }

    (engine.status(), moves)
}
