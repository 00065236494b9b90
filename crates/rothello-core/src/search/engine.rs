//! 反復深化ドライバ（Engine）
//!
//! 空きマス数から目標深さを決め、深さ 2, 4, 6, ... と探索を繰り返す。
//! 目標深さが奇数なら最後の反復は目標深さそのもの。
//!
//! - 最初の反復は全幅、以降は前回の値を中心とした aspiration window
//! - 窓の外に出たら同じ深さを全幅で再探索
//! - 持ち時間の `iteration_stop_fraction` を過ぎたら次の深さを始めない
//! - 1つも深さを終えられなかったら1手読みで手を選ぶ（合法手があれば必ず手を返す）

use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;
use serde::Serialize;

use super::alpha_beta::{RootResult, SearchWorker};
use super::config::SearchConfig;
use super::stats::SearchStats;
use super::time_manager::{Clock, SearchBudget, SystemClock};
use crate::config::ConfigError;
use crate::eval::Evaluator;
use crate::position::Position;
use crate::tt::TranspositionTable;
use crate::types::{Depth, Square, Value};

/// 1回の思考の結果
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchOutcome {
    /// 選んだ手（合法手がなければ `None`）
    pub best_move: Option<Square>,
    /// 手番側から見た値
    pub value: Value,
    /// 最後に採用した深さ（0 なら1手読みの代替手）
    pub completed_depth: Depth,
    pub target_depth: Depth,
    pub elapsed_ms: u64,
    /// 時間切れで反復を打ち切ったか
    pub timed_out: bool,
    /// 1手読みの代替手を使ったか
    pub used_fallback: bool,
    pub stats: SearchStats,
}

impl std::fmt::Display for SearchOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.best_move {
            Some(mv) => write!(f, "bestmove {mv}")?,
            None => write!(f, "bestmove pass")?,
        }
        write!(
            f,
            " value {} depth {}/{} time {}ms",
            self.value, self.completed_depth, self.target_depth, self.elapsed_ms
        )?;
        if self.timed_out {
            f.write_str(" timeout")?;
        }
        if self.used_fallback {
            f.write_str(" fallback")?;
        }
        write!(f, " ({})", self.stats)
    }
}

/// 反復深化の深さ列（2, 4, ... と、奇数なら最後に目標深さ）
pub fn depth_sequence(target: Depth) -> impl Iterator<Item = Depth> {
    let target = target.max(1);
    let evens = (2..=target).step_by(2);
    let tail = (target % 2 == 1).then_some(target);
    evens.chain(tail)
}

/// 探索エンジン
///
/// 評価関数は生成時に注入する。置換表は思考をまたいで保持し、`new_game` でクリアする。
pub struct Engine<E: Evaluator, C: Clock = SystemClock> {
    config: SearchConfig,
    eval: E,
    tt: TranspositionTable,
    clock: C,
    rng: Xoshiro256PlusPlus,
}

impl<E: Evaluator> Engine<E, SystemClock> {
    pub fn new(config: SearchConfig, eval: E) -> Result<Self, ConfigError> {
        Self::with_clock(config, eval, SystemClock::new())
    }
}

impl<E: Evaluator, C: Clock> Engine<E, C> {
    /// 時計を指定して生成（テストでは偽の時計を渡す）
    pub fn with_clock(config: SearchConfig, eval: E, clock: C) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            tt: TranspositionTable::new(config.tt_capacity),
            rng: Xoshiro256PlusPlus::seed_from_u64(config.seed),
            config,
            eval,
            clock,
        })
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    pub fn evaluator(&self) -> &E {
        &self.eval
    }

    pub fn tt(&self) -> &TranspositionTable {
        &self.tt
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// 新しい対局の準備（置換表のクリアと乱数の再初期化）
    pub fn new_game(&mut self) {
        self.tt.clear();
        self.rng = Xoshiro256PlusPlus::seed_from_u64(self.config.seed);
    }

    /// 指す手を返す（合法手がなければ `None` = パス）
    pub fn compute<P: Position + ?Sized>(&mut self, pos: &mut P) -> Option<Square> {
        self.think(pos).best_move
    }

    /// 反復深化で思考する
    pub fn think<P: Position + ?Sized>(&mut self, pos: &mut P) -> SearchOutcome {
        let target_depth = self
            .config
            .depth_schedule
            .target_depth(pos.empty_count())
            .min(self.config.max_depth)
            .max(1);

        if !pos.is_legal() {
            return SearchOutcome {
                best_move: None,
                value: self.eval.evaluate(&*pos),
                completed_depth: 0,
                target_depth,
                elapsed_ms: 0,
                timed_out: false,
                used_fallback: false,
                stats: SearchStats::default(),
            };
        }

        let budget = SearchBudget::start(&self.clock, &self.config);
        let tt = self.config.use_tt.then_some(&mut self.tt);
        let mut worker = SearchWorker::new(&self.eval, tt, &self.clock, &self.config, budget);

        let window = self.config.aspiration_window;
        let mut best: Option<(Square, Value)> = None;
        let mut completed_depth = 0;
        let mut timed_out = false;

        for depth in depth_sequence(target_depth) {
            if worker.iteration_limit_reached() {
                log::debug!("stop before depth {depth}: iteration time limit");
                timed_out = true;
                break;
            }

            let (alpha, beta) = match best {
                Some((_, prev)) if completed_depth > 0 => aspiration_bounds(prev, window),
                _ => (-Value::INFINITE, Value::INFINITE),
            };

            let mut result = worker.search_root(pos, depth, alpha, beta);
            let (mut alpha, mut beta) = (alpha, beta);
            let narrowed = alpha > -Value::INFINITE || beta < Value::INFINITE;
            if !result.aborted && narrowed && !result.is_exact(alpha, beta) {
                worker.stats_mut().aspiration_failures += 1;
                log::debug!(
                    "depth {depth}: aspiration ({alpha}, {beta}) failed with {}, re-searching full width",
                    result.value
                );
                (alpha, beta) = (-Value::INFINITE, Value::INFINITE);
                result = worker.search_root(pos, depth, alpha, beta);
            }

            if result.aborted {
                timed_out = true;
                if accept_partial(&result, alpha, beta) {
                    if let Some(mv) = result.best_move {
                        log::debug!(
                            "depth {depth}: accepting partial result {mv} ({}/{} moves)",
                            result.completed,
                            result.total
                        );
                        best = Some((mv, result.value));
                    }
                }
                break;
            }

            if let Some(mv) = result.best_move {
                best = Some((mv, result.value));
                completed_depth = depth;
                log::info!(
                    "depth {depth} bestmove {mv} value {} nodes {} time {}ms",
                    result.value,
                    worker.stats().nodes,
                    worker.elapsed().as_millis()
                );
            }
        }

        let stats = *worker.stats();
        let elapsed_ms = worker.elapsed().as_millis() as u64;
        drop(worker);

        let (best_move, value, used_fallback) = match best {
            Some((mv, value)) => (Some(mv), value, false),
            None => match self.fallback_move(pos) {
                Some((mv, value)) => {
                    log::warn!("no search depth completed, using one-ply fallback {mv}");
                    (Some(mv), value, true)
                }
                None => (None, self.eval.evaluate(&*pos), false),
            },
        };

        SearchOutcome {
            best_move,
            value,
            completed_depth,
            target_depth,
            elapsed_ms,
            timed_out,
            used_fallback,
            stats,
        }
    }

    /// 持ち時間を使わず、固定深さで1回だけ全幅のルート探索を行う
    pub fn search_fixed_depth<P: Position + ?Sized>(&mut self, pos: &mut P, depth: Depth) -> SearchOutcome {
        let depth = depth.max(1);
        let tt = self.config.use_tt.then_some(&mut self.tt);
        let mut worker = SearchWorker::new(&self.eval, tt, &self.clock, &self.config, SearchBudget::unlimited());
        let result = worker.search_root(pos, depth, -Value::INFINITE, Value::INFINITE);
        log::info!(
            "fixed depth {depth} bestmove {:?} value {} ({})",
            result.best_move.map(|m| m.to_string()),
            result.value,
            worker.stats()
        );

        SearchOutcome {
            best_move: result.best_move,
            value: result.value,
            completed_depth: depth,
            target_depth: depth,
            elapsed_ms: worker.elapsed().as_millis() as u64,
            timed_out: false,
            used_fallback: false,
            stats: *worker.stats(),
        }
    }

    /// 1手読み: 各合法手を打った直後の静的評価が最大の手
    ///
    /// `randomize_ties` のときは同点の手から乱数で選ぶ。そうでなければ列挙順で最初の手。
    fn fallback_move<P: Position + ?Sized>(&mut self, pos: &mut P) -> Option<(Square, Value)> {
        let moves = pos.legal_moves();
        let mut best_value = -Value::INFINITE;
        let mut ties: Vec<Square> = Vec::new();
        for &mv in &moves {
            pos.apply(mv);
            let value = -self.eval.evaluate(&*pos);
            pos.undo();
            if value > best_value {
                best_value = value;
                ties.clear();
                ties.push(mv);
            } else if value == best_value {
                ties.push(mv);
            }
        }
        let mv = match ties.len() {
            0 => return None,
            1 => ties[0],
            n if self.config.randomize_ties => ties[self.rng.random_range(0..n)],
            _ => ties[0],
        };
        Some((mv, best_value))
    }
}

/// 前回の値を中心とした aspiration window（`±INFINITE` に収める）
fn aspiration_bounds(prev: Value, window: i32) -> (Value, Value) {
    let alpha = Value::new(prev.raw().saturating_sub(window)).max(-Value::INFINITE);
    let beta = Value::new(prev.raw().saturating_add(window)).min(Value::INFINITE);
    (alpha, beta)
}

/// 途中で打ち切ったルート探索の結果を採用してよいか
///
/// 少なくとも1つの兄弟を探索し終えていて、その最善値が窓の内側で確定している場合に限る。
fn accept_partial(result: &RootResult, alpha: Value, beta: Value) -> bool {
    result.completed > 0 && result.best_move.is_some() && result.is_exact(alpha, beta)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_depth_sequence() {
        assert_eq!(depth_sequence(8).collect::<Vec<_>>(), vec![2, 4, 6, 8]);
        assert_eq!(depth_sequence(7).collect::<Vec<_>>(), vec![2, 4, 6, 7]);
        assert_eq!(depth_sequence(1).collect::<Vec<_>>(), vec![1]);
        assert_eq!(depth_sequence(2).collect::<Vec<_>>(), vec![2]);
        assert_eq!(depth_sequence(0).collect::<Vec<_>>(), vec![1]);
    }

    #[test]
    fn test_aspiration_bounds() {
        assert_eq!(aspiration_bounds(Value::new(50), 200), (Value::new(-150), Value::new(250)));
        assert_eq!(
            aspiration_bounds(Value::new(-50), i32::MAX),
            (-Value::INFINITE, Value::INFINITE)
        );
        assert_eq!(
            aspiration_bounds(Value::terminal(10, 3), i32::MAX),
            (-Value::INFINITE, Value::INFINITE)
        );
        // 終局スコア付近でも INFINITE を超えない
        let (_, beta) = aspiration_bounds(Value::terminal(64, 60), 9_000_000);
        assert_eq!(beta, Value::INFINITE);
    }

    #[test]
    fn test_accept_partial() {
        let (alpha, beta) = (Value::new(-100), Value::new(100));
        let mut result = RootResult {
            best_move: Some(Square::A1),
            value: Value::new(10),
            completed: 1,
            total: 5,
            aborted: true,
        };
        assert!(accept_partial(&result, alpha, beta));
        result.value = Value::new(100);
        assert!(!accept_partial(&result, alpha, beta));
        result.value = Value::new(10);
        result.completed = 0;
        assert!(!accept_partial(&result, alpha, beta));
    }
}
