//! 重み付き評価（進行度別）
//!
//! 盤上の石数で序盤・中盤・終盤を判定し、段階ごとの重みで次の特徴量を合計する。
//!
//! - 位置評価表（マスごとの重み）
//! - 着手可能数の差
//! - 隅の数の差
//! - 隅が空いている X打ち・C打ちの数の差（通常は負の重み）
//! - 開放石（空きマスに隣接する石）の数の差
//! - 隅から辺に沿って連続する確定石の数の差
//! - 終盤の偶数理論（残り空きマスの偶奇）
//! - 石差
//!
//! すべて手番側から見た差分で、最後に `±Value::EVAL_LIMIT` にクランプする。

use serde::{Deserialize, Serialize};

use super::Evaluator;
use crate::bitboard::legal_moves_bb;
use crate::position::{Position, occupancy};
use crate::types::{Square, Value};

/// 既定の位置評価表（1行目から）
pub const DEFAULT_SQUARE_TABLE: [[i32; 8]; 8] = [
    [120, -20, 20, 5, 5, 20, -20, 120],
    [-20, -40, -5, -5, -5, -5, -40, -20],
    [20, -5, 15, 3, 3, 15, -5, 20],
    [5, -5, 3, 3, 3, 3, -5, 5],
    [5, -5, 3, 3, 3, 3, -5, 5],
    [20, -5, 15, 3, 3, 15, -5, 20],
    [-20, -40, -5, -5, -5, -5, -40, -20],
    [120, -20, 20, 5, 5, 20, -20, 120],
];

/// 段階ごとの特徴量の重み
///
/// 設定ファイルで段階を上書きする場合は全項目を書く。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseWeights {
    /// 位置評価表に掛ける倍率
    pub positional: i32,
    pub mobility: i32,
    pub corner: i32,
    pub x_square: i32,
    pub c_square: i32,
    pub frontier: i32,
    pub stability: i32,
    pub parity: i32,
    pub disc: i32,
}

impl PhaseWeights {
    pub const OPENING: PhaseWeights = PhaseWeights {
        positional: 1,
        mobility: 80,
        corner: 1000,
        x_square: -500,
        c_square: -250,
        frontier: -30,
        stability: 150,
        parity: 0,
        disc: 0,
    };

    pub const MIDGAME: PhaseWeights = PhaseWeights {
        positional: 1,
        mobility: 50,
        corner: 1000,
        x_square: -300,
        c_square: -150,
        frontier: -20,
        stability: 150,
        parity: 0,
        disc: 0,
    };

    pub const ENDGAME: PhaseWeights = PhaseWeights {
        positional: 1,
        mobility: 20,
        corner: 800,
        x_square: -100,
        c_square: -50,
        frontier: -5,
        stability: 200,
        parity: 10,
        disc: 20,
    };
}

/// `Weighted` の全パラメータ
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvalWeights {
    /// 位置評価表（`table[y][x]`）
    pub table: [[i32; 8]; 8],
    /// 盤上の石数がこの値以下なら序盤
    pub opening_until: u32,
    /// 盤上の石数がこの値以上なら終盤
    pub endgame_from: u32,
    /// 偶数理論を適用する残り空きマス数の上限
    pub parity_empties: u32,
    pub opening: PhaseWeights,
    pub midgame: PhaseWeights,
    pub endgame: PhaseWeights,
}

impl Default for EvalWeights {
    fn default() -> Self {
        Self {
            table: DEFAULT_SQUARE_TABLE,
            opening_until: 20,
            endgame_from: 44,
            parity_empties: 20,
            opening: PhaseWeights::OPENING,
            midgame: PhaseWeights::MIDGAME,
            endgame: PhaseWeights::ENDGAME,
        }
    }
}

impl EvalWeights {
    /// 盤上の石数から段階の重みを選ぶ
    pub fn phase(&self, stones: u32) -> &PhaseWeights {
        if stones <= self.opening_until {
            &self.opening
        } else if stones >= self.endgame_from {
            &self.endgame
        } else {
            &self.midgame
        }
    }
}

/// 重み付き評価
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Weighted {
    weights: EvalWeights,
}

impl Weighted {
    pub fn new(weights: EvalWeights) -> Self {
        Self { weights }
    }

    pub fn weights(&self) -> &EvalWeights {
        &self.weights
    }

    /// 重みを借用したまま評価する（`EvalKind` からの呼び出し用）
    pub fn evaluate_with<P: Position + ?Sized>(weights: &EvalWeights, pos: &P) -> Value {
        let (me, opp) = occupancy(pos);
        let empties = !(me | opp);
        let stones = (me | opp).count_ones();
        let w = weights.phase(stones);

        // 重みは設定ファイルから任意の値を受け取るため、i64 の飽和演算で合計してからクランプする
        let mut score = 0i64;
        let mut add = |weight: i32, feature: i64| {
            score = score.saturating_add(i64::from(weight).saturating_mul(feature));
        };

        add(w.positional, positional(&weights.table, me) - positional(&weights.table, opp));

        add(w.mobility, count(legal_moves_bb(me, opp)) - count(legal_moves_bb(opp, me)));

        let corners = corner_mask();
        add(w.corner, count(me & corners) - count(opp & corners));

        let (x_risky, c_risky) = risky_squares(empties);
        add(w.x_square, count(me & x_risky) - count(opp & x_risky));
        add(w.c_square, count(me & c_risky) - count(opp & c_risky));

        let frontier = neighbours(empties);
        add(w.frontier, count(me & frontier) - count(opp & frontier));

        add(w.stability, count(edge_stable(me)) - count(edge_stable(opp)));

        let empty_count = empties.count_ones();
        if empty_count <= weights.parity_empties && empty_count > 0 {
            // 残りが奇数なら手番側が最後の一手を打てる
            add(w.parity, if empty_count % 2 == 1 { 1 } else { -1 });
        }

        add(w.disc, count(me) - count(opp));

        let limit = i64::from(Value::EVAL_LIMIT.raw());
        Value::new(score.clamp(-limit, limit) as i32)
    }
}

impl Evaluator for Weighted {
    #[inline]
    fn evaluate<P: Position + ?Sized>(&self, pos: &P) -> Value {
        Self::evaluate_with(&self.weights, pos)
    }
}

#[inline]
fn count(bb: u64) -> i64 {
    i64::from(bb.count_ones())
}

fn positional(table: &[[i32; 8]; 8], bb: u64) -> i64 {
    Square::all()
        .filter(|sq| bb & sq.bit() != 0)
        .map(|sq| i64::from(table[sq.y() as usize][sq.x() as usize]))
        .sum()
}

fn corner_mask() -> u64 {
    Square::CORNERS.iter().fold(0, |acc, sq| acc | sq.bit())
}

/// 対応する隅が空いている X打ち・C打ちのマスク
fn risky_squares(empties: u64) -> (u64, u64) {
    let mut x = 0u64;
    let mut c = 0u64;
    for sq in Square::all() {
        if empties & sq.nearest_corner().bit() == 0 {
            continue;
        }
        if sq.is_x_square() {
            x |= sq.bit();
        } else if sq.is_c_square() {
            c |= sq.bit();
        }
    }
    (x, c)
}

/// `bb` のいずれかのマスに8近傍で隣接するマスのマスク
fn neighbours(bb: u64) -> u64 {
    const NOT_A: u64 = 0xfefe_fefe_fefe_fefe;
    const NOT_H: u64 = 0x7f7f_7f7f_7f7f_7f7f;
    let horizontal = bb | ((bb << 1) & NOT_A) | ((bb >> 1) & NOT_H);
    (horizontal | (horizontal << 8) | (horizontal >> 8)) & !bb
}

/// 自分の隅から辺に沿って途切れずに続く石（確定石の近似）
fn edge_stable(bb: u64) -> u64 {
    // (隅, 辺方向の x 増分, y 増分)
    const RAYS: [(u8, u8, i8, i8); 8] = [
        (0, 0, 1, 0),
        (0, 0, 0, 1),
        (7, 0, -1, 0),
        (7, 0, 0, 1),
        (0, 7, 1, 0),
        (0, 7, 0, -1),
        (7, 7, -1, 0),
        (7, 7, 0, -1),
    ];
    let mut stable = 0u64;
    for &(cx, cy, dx, dy) in &RAYS {
        let mut x = cx as i8;
        let mut y = cy as i8;
        while (0..8).contains(&x) && (0..8).contains(&y) {
            let bit = 1u64 << (y * 8 + x);
            if bb & bit == 0 {
                break;
            }
            stable |= bit;
            x += dx;
            y += dy;
        }
    }
    stable
}
