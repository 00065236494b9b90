//! MovePicker（指し手オーダリング）
//!
//! 枝刈りが効きやすいように、展開前に合法手を並べ替えて返す。
//!
//! ## 優先順位
//!
//! 1. 置換表の最善手（合法手に含まれる場合のみ）
//! 2. 隅
//! 3. 通常の手
//! 4. 対応する隅が空いている X打ち
//!
//! 同じ段の中は1手読みの指標（着手後の着手可能数の差、または静的評価）の降順。
//! 指標も同じなら合法手の列挙順を保つ（安定ソート）。

use smallvec::SmallVec;

use super::config::OrderingHeuristic;
use crate::bitboard::{flips_bb, legal_moves_bb};
use crate::eval::Evaluator;
use crate::position::{Position, occupancy};
use crate::types::Square;

/// 並べ替えの段（大きいほど先）
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug)]
#[repr(u8)]
pub enum Tier {
    RiskyXSquare = 0,
    Normal = 1,
    Corner = 2,
    TtMove = 3,
}

/// スコア付きの指し手
#[derive(Clone, Copy, Debug)]
pub struct ScoredMove {
    pub mv: Square,
    pub tier: Tier,
    pub score: i32,
}

/// 指し手オーダリング
pub struct MovePicker {
    moves: SmallVec<[ScoredMove; 32]>,
    cursor: usize,
}

impl MovePicker {
    /// 合法手 `moves` を並べ替える
    ///
    /// `Evaluator` 指標のときは各手を `apply` / `undo` して評価するため `pos` を可変で借りる。
    /// 戻るときには局面は元どおり。
    pub fn new<P, E>(
        pos: &mut P,
        moves: &[Square],
        tt_move: Option<Square>,
        heuristic: OrderingHeuristic,
        eval: &E,
    ) -> Self
    where
        P: Position + ?Sized,
        E: Evaluator,
    {
        let (me, opp) = occupancy(pos);
        let empties = !(me | opp);

        let mut scored: SmallVec<[ScoredMove; 32]> = moves
            .iter()
            .map(|&mv| {
                let tier = if Some(mv) == tt_move {
                    Tier::TtMove
                } else if mv.is_corner() {
                    Tier::Corner
                } else if mv.is_x_square() && empties & mv.nearest_corner().bit() != 0 {
                    Tier::RiskyXSquare
                } else {
                    Tier::Normal
                };
                ScoredMove { mv, tier, score: 0 }
            })
            .collect();

        // 置換表の手は無条件で先頭なので指標を計算しない
        for m in scored.iter_mut().filter(|m| m.tier != Tier::TtMove) {
            m.score = match heuristic {
                OrderingHeuristic::Mobility => mobility_after(me, opp, m.mv),
                OrderingHeuristic::Evaluator => {
                    pos.apply(m.mv);
                    let v = -eval.evaluate(&*pos);
                    pos.undo();
                    v.raw()
                }
            };
        }

        scored.sort_by(|a, b| b.tier.cmp(&a.tier).then(b.score.cmp(&a.score)));

        Self {
            moves: scored,
            cursor: 0,
        }
    }

    /// 残りの手数
    pub fn remaining(&self) -> usize {
        self.moves.len() - self.cursor
    }

    /// 並べ替え後の全手（デバッグ・テスト用）
    pub fn ordered(&self) -> &[ScoredMove] {
        &self.moves
    }
}

impl Iterator for MovePicker {
    type Item = Square;

    #[inline]
    fn next(&mut self) -> Option<Square> {
        let m = self.moves.get(self.cursor)?;
        self.cursor += 1;
        Some(m.mv)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining(), Some(self.remaining()))
    }
}

impl ExactSizeIterator for MovePicker {}

/// `mv` を打った後の着手可能数の差（自分 − 相手）
#[inline]
fn mobility_after(me: u64, opp: u64, mv: Square) -> i32 {
    let flips = flips_bb(me, opp, mv);
    let me_after = me | flips | mv.bit();
    let opp_after = opp & !flips;
    legal_moves_bb(me_after, opp_after).count_ones() as i32
        - legal_moves_bb(opp_after, me_after).count_ones() as i32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::eval::Material;
    use crate::position::Board;

    fn sq(name: &str) -> Square {
        name.parse().unwrap()
    }

    fn order(board: &mut Board, tt_move: Option<Square>, heuristic: OrderingHeuristic) -> Vec<Square> {
        let moves = board.legal_moves();
        MovePicker::new(board, &moves, tt_move, heuristic, &Material).collect()
    }

    #[test]
    fn test_tt_move_first() {
        let mut board = Board::new();
        let ordered = order(&mut board, Some(sq("e6")), OrderingHeuristic::Mobility);
        assert_eq!(ordered[0], sq("e6"));
        assert_eq!(ordered.len(), 4);
    }

    #[test]
    fn test_tt_move_not_legal_is_ignored() {
        let mut board = Board::new();
        let ordered = order(&mut board, Some(sq("a1")), OrderingHeuristic::Mobility);
        assert_eq!(ordered.len(), 4);
        assert!(!ordered.contains(&sq("a1")));
    }

    #[test]
    fn test_symmetric_moves_keep_enumeration_order() {
        // 初期局面の4手は対称なので指標が同じ → 列挙順のまま
        let mut board = Board::new();
        let moves = board.legal_moves().to_vec();
        assert_eq!(order(&mut board, None, OrderingHeuristic::Mobility), moves);
        assert_eq!(order(&mut board, None, OrderingHeuristic::Evaluator), moves);
    }

    #[test]
    fn test_corner_before_normal_and_x_square_last() {
        // 黒番: a1（隅）、g7（X打ち、h8 空き）、その他が打てる局面
        //   a1 は b2(O)-c3(X) で合法、g7 は f6(O)-e5(X) で合法
        let mut board: Board = "--------/-O------/--X-----/---OX---/---XX---/-----O--/--------/-------- X"
            .parse()
            .unwrap();
        let moves = board.legal_moves();
        assert!(moves.contains(&sq("a1")));
        assert!(moves.contains(&sq("g7")));

        let ordered = order(&mut board, None, OrderingHeuristic::Mobility);
        assert_eq!(ordered[0], sq("a1"));
        assert_eq!(*ordered.last().unwrap(), sq("g7"));

        // 置換表の手は X打ちでも先頭
        let ordered = order(&mut board, Some(sq("g7")), OrderingHeuristic::Mobility);
        assert_eq!(ordered[0], sq("g7"));
        assert_eq!(ordered[1], sq("a1"));
    }

    #[test]
    fn test_x_square_with_owned_corner_is_normal() {
        let mut board: Board = "--------/--------/--------/---OX---/---XX---/-----O--/--------/-------X X"
            .parse()
            .unwrap();
        let moves = board.legal_moves();
        let picker = MovePicker::new(&mut board, &moves, None, OrderingHeuristic::Mobility, &Material);
        let g7 = picker.ordered().iter().find(|m| m.mv == sq("g7")).unwrap();
        assert_eq!(g7.tier, Tier::Normal);
    }

    #[test]
    fn test_evaluator_ordering_restores_position() {
        let mut board = Board::new();
        board.apply(sq("d3"));
        let before = board.clone();
        let _ = order(&mut board, None, OrderingHeuristic::Evaluator);
        assert_eq!(board, before);
    }
}
