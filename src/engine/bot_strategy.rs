//! Bot strategy trait and the three difficulty tiers.

use std::fmt;
use std::str::FromStr;

use rand::seq::SliceRandom;
use rand::RngCore;
use serde::{Deserialize, Serialize};

use crate::engine::minimax::negamax;
use crate::engine::models::{Board, Symbol};
use crate::engine::win_checker::would_win;

/// A bot strategy picks a cell for `symbol` on the current board.
///
/// Returns `None` only when the board has no empty cell. Randomness comes
/// from the caller so seeded runs stay reproducible.
pub trait BotStrategy: Send + Sync {
    fn name(&self) -> &str;

    fn select_move(&self, board: &Board, symbol: Symbol, rng: &mut dyn RngCore) -> Option<usize>;
}

/// Picks a uniformly random empty cell.
pub struct RandomStrategy;

impl BotStrategy for RandomStrategy {
    fn name(&self) -> &str {
        "random"
    }

    fn select_move(&self, board: &Board, _symbol: Symbol, rng: &mut dyn RngCore) -> Option<usize> {
        board.empty_cells().choose(rng).copied()
    }
}

/// Wins when it can, otherwise blocks, otherwise plays randomly.
///
/// When several cells block an opponent win the scan keeps going and the
/// highest-index block is played.
pub struct HeuristicStrategy;

impl BotStrategy for HeuristicStrategy {
    fn name(&self) -> &str {
        "heuristic"
    }

    fn select_move(&self, board: &Board, symbol: Symbol, rng: &mut dyn RngCore) -> Option<usize> {
        let opponent = symbol.opponent();
        let mut block = None;

        for index in board.empty_cells() {
            if would_win(board, index, symbol) {
                tracing::debug!(index, %symbol, "heuristic takes winning cell");
                return Some(index);
            }
            if would_win(board, index, opponent) {
                block = Some(index);
            }
        }

        if let Some(index) = block {
            tracing::debug!(index, %symbol, "heuristic blocks opponent");
            return Some(index);
        }
        RandomStrategy.select_move(board, symbol, rng)
    }
}

/// Optimal play via exhaustive negamax.
pub struct MinimaxStrategy;

impl BotStrategy for MinimaxStrategy {
    fn name(&self) -> &str {
        "minimax"
    }

    fn select_move(&self, board: &Board, symbol: Symbol, _rng: &mut dyn RngCore) -> Option<usize> {
        let best = negamax(board, symbol);
        tracing::debug!(index = ?best.index, score = best.score, %symbol, "minimax selected move");
        best.index
    }
}

/// Bot difficulty tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    #[default]
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    pub fn strategy(self) -> Box<dyn BotStrategy> {
        match self {
            Difficulty::Easy => Box::new(RandomStrategy),
            Difficulty::Medium => Box::new(HeuristicStrategy),
            Difficulty::Hard => Box::new(MinimaxStrategy),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "easy" | "random" => Ok(Difficulty::Easy),
            "medium" | "heuristic" => Ok(Difficulty::Medium),
            "hard" | "minimax" => Ok(Difficulty::Hard),
            other => Err(format!(
                "unknown difficulty '{}', expected easy, medium or hard",
                other
            )),
        }
    }
}
