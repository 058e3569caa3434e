//! Win detection over the fixed set of 8 lines.

use crate::engine::models::{Board, Cell, Symbol, WinLine, WIN_LINES};

/// First line (rows, cols, diagonals) fully occupied by `symbol`, if any.
pub fn check_win(board: &Board, symbol: Symbol) -> Option<WinLine> {
    let target = Cell::from(symbol);
    let cells = board.cells();
    WIN_LINES
        .iter()
        .find(|line| line.iter().all(|&i| cells[i] == target))
        .copied()
}

/// Winning symbol and its line. X is checked first.
pub fn winner(board: &Board) -> Option<(Symbol, WinLine)> {
    [Symbol::X, Symbol::O]
        .into_iter()
        .find_map(|symbol| check_win(board, symbol).map(|line| (symbol, line)))
}

/// Would placing `symbol` at `index` complete a line? Works on a copy; `board` is untouched.
pub fn would_win(board: &Board, index: usize, symbol: Symbol) -> bool {
    board.is_empty_at(index) && check_win(&board.with_move(index, symbol), symbol).is_some()
}
