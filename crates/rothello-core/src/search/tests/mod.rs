//! 探索のテスト
//!
//! 枝刈りなしの全幅 negamax と比較して、枝刈り・置換表・反復深化が値を変えないことを確かめる。

mod engine;

use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;

use crate::eval::Evaluator;
use crate::position::{Board, Position};
use crate::types::{Depth, Square, Value};

use super::SearchConfig;

/// 時間無制限・小さい置換表の設定
pub(super) fn unlimited_config() -> SearchConfig {
    SearchConfig {
        time_budget_ms: 0,
        tt_capacity: 1 << 16,
        ..SearchConfig::default()
    }
}

/// 枝刈りなしの negamax（探索コアと同じ終局・パスの扱い）
pub(super) fn minimax<E: Evaluator>(pos: &mut Board, depth: Depth, eval: &E) -> Value {
    if depth <= 0 {
        return eval.evaluate(pos);
    }
    let moves = pos.legal_moves();
    if moves.is_empty() {
        let me = pos.current_player();
        let diff = pos.count(me) as i32 - pos.count(me.opponent()) as i32;
        pos.pass();
        let value = if pos.is_legal() {
            -minimax(pos, depth, eval)
        } else {
            Value::terminal(diff, depth)
        };
        pos.undo();
        return value;
    }
    let mut best = -Value::INFINITE;
    for mv in moves {
        pos.apply(mv);
        best = best.max(-minimax(pos, depth - 1, eval));
        pos.undo();
    }
    best
}

/// ルートの各手の全幅 negamax 値
pub(super) fn root_values<E: Evaluator>(pos: &mut Board, depth: Depth, eval: &E) -> Vec<(Square, Value)> {
    pos.legal_moves()
        .into_iter()
        .map(|mv| {
            pos.apply(mv);
            let v = -minimax(pos, depth - 1, eval);
            pos.undo();
            (mv, v)
        })
        .collect()
}

/// 乱数で打ち進めて空きマスが `empties` 以下になった局面（終局していないもの）
pub(super) fn random_position(seed: u64, empties: u32) -> Option<Board> {
    let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed);
    let mut board = Board::new();
    loop {
        if board.empty_count() <= empties {
            return (!board.is_game_over()).then_some(board);
        }
        let moves = board.legal_moves();
        if moves.is_empty() {
            if board.is_game_over() {
                return None;
            }
            board.pass();
            continue;
        }
        board.apply(moves[rng.random_range(0..moves.len())]);
    }
}

/// 条件を満たす局面を `count` 個集める
pub(super) fn sample_positions(count: usize, empties: u32) -> Vec<Board> {
    (0..)
        .filter_map(|seed| random_position(seed, empties))
        .take(count)
        .collect()
}
