//! Alpha-Beta探索の実装
//!
//! - Negascout（Principal Variation Search）: 2手目以降は null window で調べ、
//!   窓の内側に入ったときだけ全幅で再探索する
//! - 置換表による打ち切りと最善手ヒント
//! - パスは深さを消費しない。連続パスは終局として石差でスコア化する
//! - 時間切れは一定ノードごとにポーリングし、切れたら静的評価を返して巻き戻る
//!
//! どの経路で戻る場合も、子ノードで行った `apply` / `pass` は必ず `undo` してから返す。

use super::config::SearchConfig;
use super::movepicker::MovePicker;
use super::stats::SearchStats;
use super::time_manager::{Clock, SearchBudget};
use crate::eval::Evaluator;
use crate::position::Position;
use crate::tt::{Bound, TTEntry, TranspositionTable};
use crate::types::{Depth, Square, Value};

// =============================================================================
// ルート探索の結果
// =============================================================================

/// ルート探索の結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RootResult {
    /// 探索を終えた兄弟の中での最善手（合法手がなければ `None`）
    pub best_move: Option<Square>,
    /// `best_move` の値（手番側から見た値）
    pub value: Value,
    /// 最後まで探索できた兄弟の数
    pub completed: usize,
    /// ルートの合法手数
    pub total: usize,
    /// 時間切れで途中終了したか
    pub aborted: bool,
}

impl RootResult {
    /// 値が窓 `(alpha, beta)` の内側にあるか
    #[inline]
    pub fn is_exact(&self, alpha: Value, beta: Value) -> bool {
        alpha < self.value && self.value < beta
    }
}

// =============================================================================
// SearchWorker
// =============================================================================

/// 1回の思考で使う探索器
///
/// 評価関数・置換表・時計・設定を借用し、持ち時間と統計を所有する。
/// 置換表を使わない設定では `tt` は `None`。
pub struct SearchWorker<'a, E: Evaluator, C: Clock> {
    eval: &'a E,
    tt: Option<&'a mut TranspositionTable>,
    clock: &'a C,
    config: &'a SearchConfig,
    budget: SearchBudget,
    stats: SearchStats,
}

impl<'a, E: Evaluator, C: Clock> SearchWorker<'a, E, C> {
    pub fn new(
        eval: &'a E,
        tt: Option<&'a mut TranspositionTable>,
        clock: &'a C,
        config: &'a SearchConfig,
        budget: SearchBudget,
    ) -> Self {
        Self {
            eval,
            tt,
            clock,
            config,
            budget,
            stats: SearchStats::default(),
        }
    }

    #[inline]
    pub fn budget(&self) -> &SearchBudget {
        &self.budget
    }

    #[inline]
    pub fn stats(&self) -> &SearchStats {
        &self.stats
    }

    #[inline]
    pub fn stats_mut(&mut self) -> &mut SearchStats {
        &mut self.stats
    }

    /// 次の深さを始めてよい時間を過ぎたか
    pub fn iteration_limit_reached(&self) -> bool {
        self.budget.iteration_limit_reached(self.clock)
    }

    /// 開始からの経過時間
    pub fn elapsed(&self) -> std::time::Duration {
        self.budget.elapsed(self.clock)
    }

    fn probe_tt(&mut self, key: u64) -> Option<TTEntry> {
        let tt = self.tt.as_deref()?;
        self.stats.tt_probes += 1;
        let entry = tt.probe(key);
        if entry.is_some() {
            self.stats.tt_hits += 1;
        }
        entry
    }

    fn store_tt(&mut self, key: u64, value: Value, depth: Depth, bound: Bound, best_move: Option<Square>) {
        // 打ち切り後の値は途中までの推定なので残さない
        if self.budget.is_exceeded() {
            return;
        }
        if let Some(tt) = self.tt.as_deref_mut() {
            tt.store(TTEntry {
                hash: key,
                value,
                depth,
                bound,
                best_move,
            });
        }
    }

    /// 連続パスで終局した局面のスコア（`pos` は手番側のまま呼ぶ）
    fn terminal_value<P: Position + ?Sized>(pos: &P, depth: Depth) -> Value {
        let me = pos.current_player();
        let diff = pos.count(me) as i32 - pos.count(me.opponent()) as i32;
        Value::terminal(diff, depth)
    }

    // =========================================================================
    // 内部ノード
    // =========================================================================

    /// 内部ノードの探索（negamax、手番側から見た値を返す）
    pub fn search_node<P: Position + ?Sized>(
        &mut self,
        pos: &mut P,
        depth: Depth,
        alpha: Value,
        beta: Value,
    ) -> Value {
        self.stats.nodes += 1;

        if depth <= 0 {
            return self.eval.evaluate(&*pos);
        }

        if self.budget.poll(self.clock) {
            return self.eval.evaluate(&*pos);
        }

        let key = pos.key();
        let mut tt_move = None;
        if let Some(entry) = self.probe_tt(key) {
            if let Some(value) = entry.cutoff(depth, alpha, beta) {
                self.stats.tt_cutoffs += 1;
                return value;
            }
            tt_move = entry.best_move;
        }

        let moves = pos.legal_moves();
        if moves.is_empty() {
            let terminal = Self::terminal_value(&*pos, depth);
            pos.pass();
            let value = if pos.is_legal() {
                -self.search_node(pos, depth, -beta, -alpha)
            } else {
                terminal
            };
            pos.undo();
            return value;
        }

        let picker = MovePicker::new(pos, &moves, tt_move, self.config.ordering, self.eval);

        let alpha_orig = alpha;
        let mut alpha = alpha;
        let mut best_value = -Value::INFINITE;
        let mut best_move = None;

        for (i, mv) in picker.enumerate() {
            pos.apply(mv);
            let value = if i == 0 {
                -self.search_node(pos, depth - 1, -beta, -alpha)
            } else {
                let mut v = -self.search_node(pos, depth - 1, -alpha - 1, -alpha);
                if alpha < v && v < beta {
                    self.stats.researches += 1;
                    v = -self.search_node(pos, depth - 1, -beta, -alpha);
                }
                v
            };
            pos.undo();

            if value > best_value {
                best_value = value;
                best_move = Some(mv);
                if value > alpha {
                    alpha = value;
                }
            }

            if alpha >= beta {
                self.stats.beta_cutoffs += 1;
                break;
            }

            if self.budget.is_exceeded() {
                break;
            }
        }

        #[cfg(feature = "search-trace")]
        log::trace!("node depth={depth} window=({alpha_orig}, {beta}) best={best_value}");

        self.store_tt(key, best_value, depth, Bound::classify(best_value, alpha_orig, beta), best_move);
        best_value
    }

    // =========================================================================
    // ルート
    // =========================================================================

    /// ルート探索
    ///
    /// 内部ノードと同じ手順で兄弟を調べるが、最善手を保持して返す。
    /// ルートでは置換表の値で打ち切らず、最善手ヒントだけを使う。
    /// 探索中に時間切れになった兄弟の値は捨て、それまでに終えた兄弟の最善手を返す。
    pub fn search_root<P: Position + ?Sized>(
        &mut self,
        pos: &mut P,
        depth: Depth,
        alpha: Value,
        beta: Value,
    ) -> RootResult {
        let moves = pos.legal_moves();
        if moves.is_empty() {
            let value = self.search_node(pos, depth, alpha, beta);
            return RootResult {
                best_move: None,
                value,
                completed: 0,
                total: 0,
                aborted: self.budget.is_exceeded(),
            };
        }

        self.stats.nodes += 1;
        let key = pos.key();
        let tt_move = self.probe_tt(key).and_then(|entry| entry.best_move);
        let picker = MovePicker::new(pos, &moves, tt_move, self.config.ordering, self.eval);

        let alpha_orig = alpha;
        let mut alpha = alpha;
        let mut result = RootResult {
            best_move: None,
            value: -Value::INFINITE,
            completed: 0,
            total: moves.len(),
            aborted: false,
        };

        for (i, mv) in picker.enumerate() {
            if self.budget.is_exceeded() {
                result.aborted = true;
                break;
            }

            pos.apply(mv);
            let value = if i == 0 {
                -self.search_node(pos, depth - 1, -beta, -alpha)
            } else {
                let mut v = -self.search_node(pos, depth - 1, -alpha - 1, -alpha);
                if alpha < v && v < beta && !self.budget.is_exceeded() {
                    self.stats.researches += 1;
                    v = -self.search_node(pos, depth - 1, -beta, -alpha);
                }
                v
            };
            pos.undo();

            if self.budget.is_exceeded() {
                // この兄弟は途中で打ち切られた
                result.aborted = true;
                break;
            }
            result.completed += 1;

            log::debug!("root depth={depth} move={mv} value={value}");

            if value > result.value {
                result.value = value;
                result.best_move = Some(mv);
                if value > alpha {
                    alpha = value;
                }
            }

            if alpha >= beta {
                self.stats.beta_cutoffs += 1;
                break;
            }
        }

        if !result.aborted {
            self.store_tt(
                key,
                result.value,
                depth,
                Bound::classify(result.value, alpha_orig, beta),
                result.best_move,
            );
        }
        result
    }
}
