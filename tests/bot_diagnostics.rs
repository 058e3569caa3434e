//! Bot strength checks: arena matches plus exhaustive walks of the game tree.
//!
//! The larger arena run is ignored by default. Run it with:
//!     cargo test --release --test bot_diagnostics -- --ignored --nocapture

use std::collections::HashMap;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use tictactoe_engine::engine::arena::run_arena;
use tictactoe_engine::engine::bot_strategy::{
    BotStrategy, Difficulty, HeuristicStrategy, MinimaxStrategy, RandomStrategy,
};
use tictactoe_engine::engine::models::{Board, Symbol};
use tictactoe_engine::engine::win_checker::{check_win, winner, would_win};

fn pair(
    a: (&str, Box<dyn BotStrategy>),
    b: (&str, Box<dyn BotStrategy>),
) -> HashMap<String, Box<dyn BotStrategy>> {
    let mut strategies: HashMap<String, Box<dyn BotStrategy>> = HashMap::new();
    strategies.insert(a.0.into(), a.1);
    strategies.insert(b.0.into(), b.1);
    strategies
}

/// Walk every line of play for the opponent while `bot` answers with minimax.
/// Returns the number of finished games; panics if minimax ever loses.
fn walk_all_replies(board: Board, to_move: Symbol, bot: Symbol) -> usize {
    if let Some((symbol, line)) = winner(&board) {
        assert_eq!(symbol, bot, "minimax lost on\n{}line {:?}", board, line);
        return 1;
    }
    if board.is_full() {
        return 1;
    }

    let mut rng = StdRng::seed_from_u64(0);
    if to_move == bot {
        let index = MinimaxStrategy
            .select_move(&board, bot, &mut rng)
            .expect("minimax must move on a non-full board");
        walk_all_replies(board.with_move(index, bot), to_move.opponent(), bot)
    } else {
        board
            .empty_cells()
            .into_iter()
            .map(|i| walk_all_replies(board.with_move(i, to_move), to_move.opponent(), bot))
            .sum()
    }
}

#[test]
fn minimax_as_o_never_loses_to_any_line() {
    let games = walk_all_replies(Board::new(), Symbol::X, Symbol::O);
    assert!(games > 100, "only {} games explored", games);
}

#[test]
fn minimax_as_x_never_loses_to_any_line() {
    let games = walk_all_replies(Board::new(), Symbol::X, Symbol::X);
    assert!(games > 10, "only {} games explored", games);
}

#[test]
fn minimax_mirror_always_draws() {
    let strategies = pair(("hard_a", Box::new(MinimaxStrategy)), ("hard_b", Box::new(MinimaxStrategy)));
    let result = run_arena(&strategies, 2, 42, true, None);

    assert_eq!(result.draws, 2);
    assert!(result.games.iter().all(|g| g.moves == 9));
}

#[test]
fn minimax_never_loses_to_random() {
    let strategies = pair(("minimax", Box::new(MinimaxStrategy)), ("random", Box::new(RandomStrategy)));
    let result = run_arena(&strategies, 12, 42, true, None);

    println!("\n{}", result.summary());
    assert_eq!(result.losses("minimax"), 0);
    assert_eq!(result.wins["random"], 0);
}

#[test]
fn minimax_never_loses_to_heuristic() {
    let strategies = pair(("minimax", Box::new(MinimaxStrategy)), ("heuristic", Box::new(HeuristicStrategy)));
    let result = run_arena(&strategies, 12, 7, true, None);

    assert_eq!(result.wins["heuristic"], 0);
    assert_eq!(result.losses("minimax"), 0);
}

#[test]
fn heuristic_beats_random() {
    let strategies = pair(("heuristic", Box::new(HeuristicStrategy)), ("random", Box::new(RandomStrategy)));
    let result = run_arena(&strategies, 200, 42, true, None);

    println!("\n{}", result.summary());
    assert!(
        result.wins["heuristic"] > 2 * result.wins["random"],
        "heuristic {} vs random {}",
        result.wins["heuristic"],
        result.wins["random"]
    );
}

/// Random consistent positions reached by random play, not yet decided.
fn random_positions(seed: u64, count: usize) -> Vec<(Board, Symbol)> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut positions = Vec::new();
    while positions.len() < count {
        let mut board = Board::new();
        let mut to_move = Symbol::X;
        let plies = rng.gen_range(0..8);
        for _ in 0..plies {
            if winner(&board).is_some() || board.is_full() {
                break;
            }
            let index = RandomStrategy
                .select_move(&board, to_move, &mut rng)
                .expect("board not full");
            board = board.with_move(index, to_move);
            to_move = to_move.opponent();
        }
        if winner(&board).is_none() && !board.is_full() {
            positions.push((board, to_move));
        }
    }
    positions
}

#[test]
fn heuristic_always_takes_available_win() {
    let mut rng = StdRng::seed_from_u64(99);
    let mut checked = 0;
    for (board, symbol) in random_positions(1, 2000) {
        let can_win = board.empty_cells().into_iter().any(|i| would_win(&board, i, symbol));
        if !can_win {
            continue;
        }
        let index = HeuristicStrategy.select_move(&board, symbol, &mut rng).unwrap();
        assert!(
            check_win(&board.with_move(index, symbol), symbol).is_some(),
            "missed win on\n{}played {}",
            board,
            index
        );
        checked += 1;
    }
    assert!(checked > 50, "only {} winning positions sampled", checked);
}

#[test]
fn heuristic_blocks_when_it_cannot_win() {
    let mut rng = StdRng::seed_from_u64(99);
    let mut checked = 0;
    for (board, symbol) in random_positions(2, 2000) {
        let empty = board.empty_cells();
        let can_win = empty.iter().any(|&i| would_win(&board, i, symbol));
        let blocks: Vec<usize> = empty
            .iter()
            .copied()
            .filter(|&i| would_win(&board, i, symbol.opponent()))
            .collect();
        if can_win || blocks.is_empty() {
            continue;
        }
        let index = HeuristicStrategy.select_move(&board, symbol, &mut rng).unwrap();
        assert_eq!(Some(&index), blocks.last(), "wrong block on\n{}", board);
        checked += 1;
    }
    assert!(checked > 50, "only {} blocking positions sampled", checked);
}

/// Longer arena run for eyeballing win rates.
#[test]
#[ignore]
fn full_tier_ladder() {
    for (i, a) in Difficulty::ALL.iter().enumerate() {
        for b in Difficulty::ALL.iter().skip(i + 1) {
            let (a_name, b_name) = (a.as_str(), b.as_str());
            let strategies = pair((a_name, a.strategy()), (b_name, b.strategy()));
            let result = run_arena(
                &strategies,
                200,
                42,
                true,
                Some(&|done: usize, total: usize| {
                    if done % 50 == 0 {
                        eprintln!("  {} vs {}: game {}/{}", a_name, b_name, done, total);
                    }
                }),
            );
            println!("\n{} vs {}\n{}", a_name, b_name, result.summary());
        }
    }
}
