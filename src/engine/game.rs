//! Game engine: owns the board, turn order, terminal detection, statistics
//! and bot scheduling.
//!
//! The engine never renders. Presentation layers query it (`snapshot`,
//! accessors) and subscribe to [`GameEvent`]s. Bot moves are two-step: a move
//! that hands the turn to the bot yields a [`BotTurn`] ticket, and the caller
//! redeems it with [`GameEngine::play_bot_turn`] whenever it likes (after a
//! cosmetic delay, say). Tickets issued before a reset are refused.

use std::fmt;
use std::str::FromStr;

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use crate::engine::bot_strategy::{BotStrategy, Difficulty};
use crate::engine::models::*;
use crate::engine::win_checker::check_win;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameMode {
    HumanVsHuman,
    #[default]
    HumanVsBot,
}

impl fmt::Display for GameMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameMode::HumanVsHuman => f.write_str("human_vs_human"),
            GameMode::HumanVsBot => f.write_str("human_vs_bot"),
        }
    }
}

impl FromStr for GameMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "human_vs_human" | "pvp" | "hvh" => Ok(GameMode::HumanVsHuman),
            "human_vs_bot" | "pve" | "hvb" => Ok(GameMode::HumanVsBot),
            other => Err(format!(
                "unknown game mode '{}', expected human_vs_human or human_vs_bot",
                other
            )),
        }
    }
}

/// Inputs fixed at game start or at an explicit restart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    pub mode: GameMode,
    pub difficulty: Difficulty,
    pub bot_symbol: Symbol,
    /// Seed for the bot's random choices; entropy when absent.
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            mode: GameMode::default(),
            difficulty: Difficulty::default(),
            bot_symbol: Symbol::O,
            seed: None,
        }
    }
}

impl GameConfig {
    pub fn bot_enabled(&self) -> bool {
        self.mode == GameMode::HumanVsBot
    }
}

/// A scheduled bot move, valid only for the game it was issued in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BotTurn {
    generation: u64,
    symbol: Symbol,
}

impl BotTurn {
    pub fn symbol(&self) -> Symbol {
        self.symbol
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    GameOver,
    OutOfRange,
    CellOccupied,
    StaleBotTurn,
    NoEmptyCell,
}

/// Result of a move request. `Rejected` means nothing changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    Rejected(RejectReason),
    Continued {
        index: usize,
        symbol: Symbol,
        next: Symbol,
        bot_turn: Option<BotTurn>,
    },
    Won {
        index: usize,
        symbol: Symbol,
        line: WinLine,
    },
    Draw {
        index: usize,
        symbol: Symbol,
    },
}

impl MoveOutcome {
    pub fn is_applied(&self) -> bool {
        !matches!(self, MoveOutcome::Rejected(_))
    }

    pub fn bot_turn(&self) -> Option<BotTurn> {
        match self {
            MoveOutcome::Continued { bot_turn, .. } => *bot_turn,
            _ => None,
        }
    }
}

/// State-change notifications for subscribers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameEvent {
    MovePlayed { index: usize, symbol: Symbol },
    TurnChanged(Symbol),
    GameWon { symbol: Symbol, line: WinLine },
    GameDrawn,
    BotTurnScheduled(BotTurn),
    GameReset,
    StatisticsChanged(Statistics),
}

/// Read-only view of everything a presentation layer displays.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSnapshot {
    pub board: Board,
    pub current_player: Symbol,
    pub status: GameStatus,
    pub winning_line: Option<WinLine>,
    pub statistics: Statistics,
    pub mode: GameMode,
    pub difficulty: Difficulty,
}

type Listener = Box<dyn FnMut(&GameEvent)>;

pub struct GameEngine {
    board: Board,
    current_player: Symbol,
    status: GameStatus,
    winning_line: Option<WinLine>,
    statistics: Statistics,
    config: GameConfig,
    strategy: Box<dyn BotStrategy>,
    rng: StdRng,
    generation: u64,
    listeners: Vec<Listener>,
}

impl GameEngine {
    pub fn new(config: GameConfig) -> Self {
        Self {
            board: Board::new(),
            current_player: Symbol::X,
            status: GameStatus::InProgress,
            winning_line: None,
            statistics: Statistics::default(),
            strategy: config.difficulty.strategy(),
            rng: make_rng(config.seed),
            config,
            generation: 0,
            listeners: Vec::new(),
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn current_player(&self) -> Symbol {
        self.current_player
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn is_over(&self) -> bool {
        self.status.is_over()
    }

    pub fn winning_line(&self) -> Option<WinLine> {
        self.winning_line
    }

    pub fn statistics(&self) -> Statistics {
        self.statistics
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot {
            board: self.board,
            current_player: self.current_player,
            status: self.status,
            winning_line: self.winning_line,
            statistics: self.statistics,
            mode: self.config.mode,
            difficulty: self.config.difficulty,
        }
    }

    pub fn subscribe(&mut self, listener: impl FnMut(&GameEvent) + 'static) {
        self.listeners.push(Box::new(listener));
    }

    /// Place the current player's symbol at `index`.
    ///
    /// Requests after game over, off the board or on a taken cell are
    /// ignored and reported as `Rejected`.
    pub fn apply_move(&mut self, index: usize) -> MoveOutcome {
        if self.status.is_over() {
            tracing::debug!(index, "move ignored, game is over");
            return MoveOutcome::Rejected(RejectReason::GameOver);
        }
        if index >= BOARD_CELLS {
            tracing::debug!(index, "move ignored, index off the board");
            return MoveOutcome::Rejected(RejectReason::OutOfRange);
        }

        let symbol = self.current_player;
        if !self.board.place(index, symbol) {
            tracing::debug!(index, "move ignored, cell occupied");
            return MoveOutcome::Rejected(RejectReason::CellOccupied);
        }
        tracing::debug!(index, %symbol, "move applied");
        self.emit(GameEvent::MovePlayed { index, symbol });

        if let Some(line) = check_win(&self.board, symbol) {
            self.status = GameStatus::Won(symbol);
            self.winning_line = Some(line);
            self.statistics.record_win(symbol);
            tracing::info!(%symbol, ?line, "game won");
            self.emit(GameEvent::GameWon { symbol, line });
            self.emit(GameEvent::StatisticsChanged(self.statistics));
            return MoveOutcome::Won { index, symbol, line };
        }

        if self.board.is_full() {
            self.status = GameStatus::Draw;
            self.statistics.record_draw();
            tracing::info!("game drawn");
            self.emit(GameEvent::GameDrawn);
            self.emit(GameEvent::StatisticsChanged(self.statistics));
            return MoveOutcome::Draw { index, symbol };
        }

        let next = symbol.opponent();
        self.current_player = next;
        self.emit(GameEvent::TurnChanged(next));

        let bot_turn = self.pending_bot_turn();
        if let Some(turn) = bot_turn {
            self.emit(GameEvent::BotTurnScheduled(turn));
        }

        MoveOutcome::Continued { index, symbol, next, bot_turn }
    }

    /// Ticket for the bot if it is the bot's move right now.
    pub fn pending_bot_turn(&self) -> Option<BotTurn> {
        let bot_to_move = self.config.bot_enabled()
            && self.status == GameStatus::InProgress
            && self.current_player == self.config.bot_symbol;
        bot_to_move.then_some(BotTurn {
            generation: self.generation,
            symbol: self.config.bot_symbol,
        })
    }

    /// Let the configured strategy play the move `turn` was issued for.
    pub fn play_bot_turn(&mut self, turn: BotTurn) -> MoveOutcome {
        if self.pending_bot_turn() != Some(turn) {
            tracing::debug!(
                ticket_generation = turn.generation,
                generation = self.generation,
                "discarding stale bot turn"
            );
            return MoveOutcome::Rejected(RejectReason::StaleBotTurn);
        }

        let Some(index) = self.strategy.select_move(&self.board, turn.symbol, &mut self.rng) else {
            return MoveOutcome::Rejected(RejectReason::NoEmptyCell);
        };
        tracing::debug!(index, strategy = self.strategy.name(), "bot chose move");
        self.apply_move(index)
    }

    /// Start a fresh game with the same configuration. Statistics are kept.
    pub fn reset(&mut self) {
        self.board = Board::new();
        self.current_player = Symbol::X;
        self.status = GameStatus::InProgress;
        self.winning_line = None;
        self.generation += 1;
        tracing::info!(generation = self.generation, "game reset");
        self.emit(GameEvent::GameReset);
    }

    /// Reset and install a new mode, difficulty and bot symbol. Statistics are kept.
    pub fn restart_with(&mut self, config: GameConfig) {
        if config.seed.is_some() && config.seed != self.config.seed {
            self.rng = make_rng(config.seed);
        }
        self.strategy = config.difficulty.strategy();
        self.config = config;
        tracing::info!(mode = %config.mode, difficulty = %config.difficulty, "configuration changed");
        self.reset();
    }

    pub fn reset_statistics(&mut self) {
        self.statistics.clear();
        self.emit(GameEvent::StatisticsChanged(self.statistics));
    }

    fn emit(&mut self, event: GameEvent) {
        for listener in &mut self.listeners {
            listener(&event);
        }
    }
}

impl fmt::Debug for GameEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GameEngine")
            .field("board", &self.board)
            .field("current_player", &self.current_player)
            .field("status", &self.status)
            .field("winning_line", &self.winning_line)
            .field("statistics", &self.statistics)
            .field("config", &self.config)
            .field("generation", &self.generation)
            .finish_non_exhaustive()
    }
}

fn make_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}
