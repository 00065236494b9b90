//! 反復深化ドライバのテスト

use std::time::Duration;

use super::{minimax, random_position, root_values, sample_positions, unlimited_config};
use crate::eval::{EvalKind, Material, Weighted};
use crate::position::{Board, Position};
use crate::search::{DepthSchedule, Engine, ManualClock, SearchConfig, TickClock};
use crate::types::Square;

fn sq(name: &str) -> Square {
    name.parse().unwrap()
}

/// 空きマス数によらず固定の目標深さ
fn fixed_schedule(depth: i32) -> DepthSchedule {
    DepthSchedule {
        exhaustive_empties: 0,
        tiers: Vec::new(),
        default_depth: depth,
    }
}

#[test]
fn test_startpos_depth4_material() {
    let mut board = Board::new();
    let mut engine = Engine::new(unlimited_config(), Material).unwrap();
    let outcome = engine.search_fixed_depth(&mut board, 4);

    let opening = [sq("d3"), sq("c4"), sq("f5"), sq("e6")];
    let best = outcome.best_move.unwrap();
    assert!(opening.contains(&best), "unexpected move {best}");
    assert_eq!(outcome.value, minimax(&mut board, 4, &Material));
    assert_eq!(board, Board::new());
}

#[test]
fn test_tt_on_and_off_agree() {
    let mut board = Board::new();
    let with_tt = Engine::new(unlimited_config(), Material).unwrap().search_fixed_depth(&mut board, 4);
    let config = SearchConfig {
        use_tt: false,
        ..unlimited_config()
    };
    let without_tt = Engine::new(config, Material).unwrap().search_fixed_depth(&mut board, 4);

    assert_eq!(with_tt.value, without_tt.value);
    // 手は同点の範囲で一致すればよい
    let values = root_values(&mut board, 4, &Material);
    for outcome in [&with_tt, &without_tt] {
        let v = values.iter().find(|(mv, _)| Some(*mv) == outcome.best_move).map(|(_, v)| *v);
        assert_eq!(v, Some(outcome.value));
    }
    assert_eq!(without_tt.stats.tt_probes, 0);
    assert!(with_tt.stats.tt_probes > 0);
}

#[test]
fn test_think_solves_endgame_exactly() {
    let eval = Weighted::default();
    for mut board in sample_positions(3, 8) {
        let before = board.clone();
        let mut engine = Engine::new(unlimited_config(), eval.clone()).unwrap();
        let outcome = engine.think(&mut board);

        let depth = board.empty_count() as i32 + 1;
        assert_eq!(outcome.target_depth, depth);
        assert_eq!(outcome.completed_depth, depth);
        assert!(!outcome.timed_out && !outcome.used_fallback);
        assert_eq!(outcome.value, minimax(&mut board, depth, &eval));
        assert_eq!(board, before);
    }
}

#[test]
fn test_deeper_search_never_picks_worse_move() {
    // 読み切り値で各手を比べ、深い探索の手が浅い探索の手より悪くならない
    for mut board in sample_positions(3, 8) {
        let exact_depth = board.empty_count() as i32 + 1;
        let exact = root_values(&mut board, exact_depth, &Material);
        let exact_of = |mv: Square| exact.iter().find(|(m, _)| *m == mv).map(|(_, v)| *v);

        let mut engine = Engine::new(unlimited_config(), Material).unwrap();
        let shallow = engine.search_fixed_depth(&mut board, 2).best_move.unwrap();
        engine.new_game();
        let deep = engine.search_fixed_depth(&mut board, exact_depth).best_move.unwrap();

        let best_exact = exact.iter().map(|(_, v)| *v).max().unwrap();
        assert_eq!(exact_of(deep), Some(best_exact));
        assert!(exact_of(deep) >= exact_of(shallow));
    }
}

#[test]
fn test_tiny_budget_uses_fallback() {
    // 時計を読むたびに1ms進む: 最初の深さを始める前に反復の閾値を越える
    let config = SearchConfig {
        time_budget_ms: 1,
        ..unlimited_config()
    };
    let mut engine = Engine::with_clock(config, Material, TickClock::new(Duration::from_millis(1))).unwrap();
    let mut board = Board::new();
    let outcome = engine.think(&mut board);

    let mv = outcome.best_move.unwrap();
    assert!(board.legal_moves().contains(&mv));
    assert!(outcome.used_fallback);
    assert!(outcome.timed_out);
    assert_eq!(outcome.completed_depth, 0);
}

#[test]
fn test_node_timeout_mid_iteration_still_legal() {
    // 毎ノード時計を読み、1読みごとに1ms進む。数百ノードで打ち切りになる
    let config = SearchConfig {
        time_budget_ms: 1000,
        node_check_interval: 1,
        ..unlimited_config()
    };
    for mut board in sample_positions(4, 40) {
        let before = board.clone();
        let mut engine =
            Engine::with_clock(config.clone(), Weighted::default(), TickClock::new(Duration::from_millis(1))).unwrap();
        let outcome = engine.think(&mut board);
        let mv = outcome.best_move.unwrap();
        assert!(board.legal_moves().contains(&mv));
        assert!(outcome.timed_out);
        assert_eq!(board, before);
    }
}

#[test]
fn test_frozen_clock_completes_all_depths() {
    let config = SearchConfig {
        time_budget_ms: 10,
        depth_schedule: fixed_schedule(5),
        ..unlimited_config()
    };
    let mut engine = Engine::with_clock(config, Material, ManualClock::new()).unwrap();
    let mut board = random_position(11, 44).unwrap();
    let outcome = engine.think(&mut board);
    assert!(!outcome.timed_out);
    assert_eq!(outcome.target_depth, 5);
    assert_eq!(outcome.completed_depth, 5);
    assert_eq!(outcome.value, minimax(&mut board, 5, &Material));
}

#[test]
fn test_compute_pass_when_no_moves() {
    let text = format!("{}{} O", "X".repeat(40), "O".repeat(24));
    let mut board: Board = text.parse().unwrap();
    let mut engine = Engine::new(unlimited_config(), EvalKind::Material).unwrap();
    assert_eq!(engine.compute(&mut board), None);
}

#[test]
fn test_compute_returns_corner_when_winning() {
    // a1 を取れば白を全滅させられる（b1 の白1個を a1-c1 で挟む）
    let text = format!("-OX{} X", "-".repeat(61));
    let mut board: Board = text.parse().unwrap();
    let mut engine = Engine::new(unlimited_config(), Material).unwrap();
    let outcome = engine.think(&mut board);
    assert_eq!(outcome.best_move, Some(Square::A1));
    assert!(outcome.value.is_win());
}

#[test]
fn test_fallback_tie_break_is_seeded() {
    let config = SearchConfig {
        time_budget_ms: 1,
        randomize_ties: true,
        seed: 42,
        ..unlimited_config()
    };
    let pick = |config: &SearchConfig| {
        let mut engine =
            Engine::with_clock(config.clone(), Material, TickClock::new(Duration::from_millis(1))).unwrap();
        let mut board = Board::new();
        (0..4).map(|_| engine.compute(&mut board)).collect::<Vec<_>>()
    };
    // 同じシードなら同じ選択列
    assert_eq!(pick(&config), pick(&config));
    // 初期局面の4手はすべて同点なので、どれも合法手
    let legal = Board::new().legal_moves();
    for mv in pick(&config) {
        assert!(legal.contains(&mv.unwrap()));
    }
}

#[test]
fn test_aspiration_failure_is_researched() {
    // 窓を最小にすると、値が前回と一致しない限り窓の外に出て全幅で再探索する
    let config = SearchConfig {
        aspiration_window: 1,
        depth_schedule: fixed_schedule(4),
        ..unlimited_config()
    };
    let eval = Weighted::default();
    let mut failures = 0;
    for mut board in sample_positions(4, 40) {
        let mut engine = Engine::new(config.clone(), eval.clone()).unwrap();
        let outcome = engine.think(&mut board);
        assert_eq!(outcome.completed_depth, 4);
        failures += outcome.stats.aspiration_failures;

        // 再探索後の値は全幅探索の値と一致する
        let best = root_values(&mut board, 4, &eval).iter().map(|(_, v)| *v).max();
        assert_eq!(Some(outcome.value), best);
    }
    assert!(failures > 0);
}

#[test]
fn test_huge_aspiration_window_saturates() {
    // 窓幅の上限は検証しないので、i32::MAX でも桁あふれせず全幅と同じ結果になる
    let config = SearchConfig {
        aspiration_window: i32::MAX,
        depth_schedule: fixed_schedule(4),
        ..unlimited_config()
    };
    assert!(config.validate().is_ok());
    let eval = Weighted::default();
    let mut board = random_position(11, 44).unwrap();
    let before = board.clone();
    let mut engine = Engine::new(config, eval.clone()).unwrap();
    let outcome = engine.think(&mut board);

    assert_eq!(board, before);
    assert_eq!(outcome.completed_depth, 4);
    assert_eq!(outcome.stats.aspiration_failures, 0);
    let best = root_values(&mut board, 4, &eval).iter().map(|(_, v)| *v).max();
    assert_eq!(Some(outcome.value), best);
}
