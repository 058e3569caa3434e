//! Exhaustive negamax search over the 3x3 board.
//!
//! No pruning, depth limit or transposition table: the full game tree from an
//! empty board is a few hundred thousand nodes. A larger board would need
//! alpha-beta or caching here.

use crate::engine::models::{Board, Symbol};
use crate::engine::win_checker::check_win;

pub const WIN_SCORE: i32 = 10;

/// A move candidate and its value for the symbol that plays it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoredMove {
    pub index: Option<usize>,
    pub score: i32,
}

/// Best move for `to_move` on `board`, scored from `to_move`'s perspective.
///
/// Terminal boards score +10 if won by `to_move`, -10 if won by its opponent,
/// 0 when full. With O to move at the top this is O-win = +10, X-win = -10.
/// Among equal scores the lowest cell index wins.
pub fn negamax(board: &Board, to_move: Symbol) -> ScoredMove {
    debug_assert!(board.is_consistent(), "inconsistent board:\n{}", board);

    if check_win(board, to_move.opponent()).is_some() {
        return ScoredMove { index: None, score: -WIN_SCORE };
    }
    if check_win(board, to_move).is_some() {
        return ScoredMove { index: None, score: WIN_SCORE };
    }

    let mut best = ScoredMove { index: None, score: 0 };
    for index in board.empty_cells() {
        let child = negamax(&board.with_move(index, to_move), to_move.opponent());
        let score = -child.score;
        if best.index.is_none() || score > best.score {
            best = ScoredMove { index: Some(index), score };
        }
    }
    best
}

/// Number of positions `negamax` visits from `board`. Used by benchmarks and diagnostics.
pub fn count_nodes(board: &Board, to_move: Symbol) -> u64 {
    if check_win(board, Symbol::X).is_some() || check_win(board, Symbol::O).is_some() {
        return 1;
    }
    1 + board
        .empty_cells()
        .into_iter()
        .map(|i| count_nodes(&board.with_move(i, to_move), to_move.opponent()))
        .sum::<u64>()
}
