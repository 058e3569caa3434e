//! Core data types: symbols, cells, the 3x3 board, game status and statistics.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

pub const BOARD_CELLS: usize = 9;

/// An index-triple of cells forming a row, column or diagonal.
pub type WinLine = [usize; 3];

/// Rows, then columns, then diagonals. Win checks report the first match in this order.
pub const WIN_LINES: [WinLine; 8] = [
    [0, 1, 2], [3, 4, 5], [6, 7, 8], // rows
    [0, 3, 6], [1, 4, 7], [2, 5, 8], // cols
    [0, 4, 8], [2, 4, 6],             // diagonals
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Symbol {
    #[serde(alias = "X")]
    X,
    #[serde(alias = "O")]
    O,
}

impl Symbol {
    pub fn opponent(self) -> Symbol {
        match self {
            Symbol::X => Symbol::O,
            Symbol::O => Symbol::X,
        }
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Symbol::X => write!(f, "X"),
            Symbol::O => write!(f, "O"),
        }
    }
}

impl FromStr for Symbol {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "x" | "X" => Ok(Symbol::X),
            "o" | "O" => Ok(Symbol::O),
            other => Err(format!("unknown symbol '{}', expected 'x' or 'o'", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Cell {
    #[default]
    Empty,
    X,
    O,
}

impl Cell {
    pub fn is_empty(self) -> bool {
        self == Cell::Empty
    }

    pub fn symbol(self) -> Option<Symbol> {
        match self {
            Cell::Empty => None,
            Cell::X => Some(Symbol::X),
            Cell::O => Some(Symbol::O),
        }
    }
}

impl From<Symbol> for Cell {
    fn from(symbol: Symbol) -> Self {
        match symbol {
            Symbol::X => Cell::X,
            Symbol::O => Cell::O,
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Empty => write!(f, "."),
            Cell::X => write!(f, "X"),
            Cell::O => write!(f, "O"),
        }
    }
}

/// The 9-cell playing field, indexed row-major from the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Board {
    cells: [Cell; BOARD_CELLS],
}

impl Board {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_cells(cells: [Cell; BOARD_CELLS]) -> Self {
        Self { cells }
    }

    pub fn cells(&self) -> &[Cell; BOARD_CELLS] {
        &self.cells
    }

    /// Cell at `index`, or `None` when the index is off the board.
    pub fn get(&self, index: usize) -> Option<Cell> {
        self.cells.get(index).copied()
    }

    pub fn is_empty_at(&self, index: usize) -> bool {
        self.get(index).is_some_and(Cell::is_empty)
    }

    /// Write `symbol` into an empty cell. Returns false and leaves the board
    /// untouched when the index is off the board or the cell is taken.
    pub fn place(&mut self, index: usize, symbol: Symbol) -> bool {
        if !self.is_empty_at(index) {
            return false;
        }
        self.cells[index] = symbol.into();
        true
    }

    /// Copy of this board with `symbol` written at `index`.
    ///
    /// Panics if the cell is not empty: strategies only simulate legal moves.
    pub fn with_move(&self, index: usize, symbol: Symbol) -> Board {
        let mut next = *self;
        assert!(next.place(index, symbol), "cell {} is not available", index);
        next
    }

    pub fn empty_cells(&self) -> Vec<usize> {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, cell)| cell.is_empty())
            .map(|(i, _)| i)
            .collect()
    }

    pub fn is_full(&self) -> bool {
        self.cells.iter().all(|c| !c.is_empty())
    }

    pub fn count(&self, symbol: Symbol) -> usize {
        let target = Cell::from(symbol);
        self.cells.iter().filter(|&&c| c == target).count()
    }

    /// X always moves first, so X has as many marks as O or exactly one more.
    pub fn is_consistent(&self) -> bool {
        let xs = self.count(Symbol::X);
        let os = self.count(Symbol::O);
        xs == os || xs == os + 1
    }

    /// Whose turn it is on a consistent board.
    pub fn next_to_move(&self) -> Symbol {
        if self.count(Symbol::X) > self.count(Symbol::O) {
            Symbol::O
        } else {
            Symbol::X
        }
    }
}

impl FromStr for Board {
    type Err = String;

    /// Parses 9 cell characters, `X`/`O` for marks and `.`, `_`, `-` or a
    /// space for empty cells. Row separators (`/` and line breaks) are skipped.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut cells = [Cell::Empty; BOARD_CELLS];
        let mut count = 0;
        for ch in s.chars() {
            let cell = match ch {
                'X' | 'x' => Cell::X,
                'O' | 'o' => Cell::O,
                '.' | '_' | '-' | ' ' => Cell::Empty,
                '/' | '\n' | '\r' => continue,
                other => return Err(format!("invalid cell character '{}'", other)),
            };
            if count == BOARD_CELLS {
                return Err(format!("board has more than {} cells", BOARD_CELLS));
            }
            cells[count] = cell;
            count += 1;
        }
        if count != BOARD_CELLS {
            return Err(format!("board needs {} cells, got {}", BOARD_CELLS, count));
        }
        Ok(Board { cells })
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.cells.chunks(3) {
            writeln!(f, "{}{}{}", row[0], row[1], row[2])?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", content = "winner", rename_all = "snake_case")]
pub enum GameStatus {
    InProgress,
    Won(Symbol),
    Draw,
}

impl GameStatus {
    pub fn is_over(self) -> bool {
        self != GameStatus::InProgress
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SymbolStats {
    pub wins: u32,
    pub draws: u32,
}

/// Session counters. Survive game resets until explicitly cleared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Statistics {
    pub x: SymbolStats,
    pub o: SymbolStats,
}

impl Statistics {
    pub fn for_symbol(&self, symbol: Symbol) -> SymbolStats {
        match symbol {
            Symbol::X => self.x,
            Symbol::O => self.o,
        }
    }

    pub fn record_win(&mut self, symbol: Symbol) {
        match symbol {
            Symbol::X => self.x.wins += 1,
            Symbol::O => self.o.wins += 1,
        }
    }

    pub fn record_draw(&mut self) {
        self.x.draws += 1;
        self.o.draws += 1;
    }

    pub fn clear(&mut self) {
        *self = Statistics::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_board() {
        let board: Board = "XXXOO....".parse().unwrap();
        assert_eq!(board.get(0), Some(Cell::X));
        assert_eq!(board.get(4), Some(Cell::O));
        assert_eq!(board.get(8), Some(Cell::Empty));
        assert_eq!(board.empty_cells(), vec![5, 6, 7, 8]);

        let with_rows: Board = "X.O/.X./O..".parse().unwrap();
        assert_eq!(with_rows.count(Symbol::X), 2);
        assert_eq!(with_rows.count(Symbol::O), 2);

        assert!("XXO".parse::<Board>().is_err());
        assert!("XXOOXXOOXX".parse::<Board>().is_err());
        assert!("XXOOZXOOX".parse::<Board>().is_err());
    }

    #[test]
    fn test_place_only_on_empty_cells() {
        let mut board = Board::new();
        assert!(board.place(4, Symbol::X));
        assert!(!board.place(4, Symbol::O));
        assert!(!board.place(9, Symbol::O));
        assert_eq!(board.get(4), Some(Cell::X));
        assert_eq!(board.count(Symbol::O), 0);
    }

    #[test]
    fn test_with_move_leaves_original() {
        let board = Board::new();
        let next = board.with_move(0, Symbol::X);
        assert!(board.is_empty_at(0));
        assert_eq!(next.get(0), Some(Cell::X));
    }

    #[test]
    fn test_consistency_and_turn() {
        let board: Board = "XO.X.....".parse().unwrap();
        assert!(board.is_consistent());
        assert_eq!(board.next_to_move(), Symbol::O);

        let lopsided: Board = "XXX......".parse().unwrap();
        assert!(!lopsided.is_consistent());
    }

    #[test]
    fn test_statistics_counters() {
        let mut stats = Statistics::default();
        stats.record_win(Symbol::O);
        stats.record_draw();
        assert_eq!(stats.for_symbol(Symbol::O), SymbolStats { wins: 1, draws: 1 });
        assert_eq!(stats.for_symbol(Symbol::X), SymbolStats { wins: 0, draws: 1 });
        stats.clear();
        assert_eq!(stats, Statistics::default());
    }

    #[test]
    fn test_status_serializes_with_winner() {
        let json = serde_json::to_value(GameStatus::Won(Symbol::X)).unwrap();
        assert_eq!(json, serde_json::json!({"state": "won", "winner": "x"}));
        let back: GameStatus = serde_json::from_value(serde_json::json!({"state": "draw"})).unwrap();
        assert_eq!(back, GameStatus::Draw);
    }
}
