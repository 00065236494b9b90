//! ビットボードモジュール
//!
//! 64マスの盤面を `u64` で表現し、合法手生成と反転石計算をビット演算で行う。
//!
//! - ビット配置: `bit = y * 8 + x`（a1 が bit 0、h8 が bit 63）
//! - `legal_moves_bb`: 手番側の合法手マスク
//! - `flips_bb`: 指定マスに打ったときに裏返る石のマスク
//! - `BitboardIter`: 立っているビットを `Square` として列挙

use crate::types::Square;

/// a列・h列を除くマスク（横方向の回り込み防止）
const NOT_EDGE_FILES: u64 = 0x7e7e_7e7e_7e7e_7e7e;
/// 1行目・8行目を除くマスク
const NOT_EDGE_RANKS: u64 = 0x00ff_ffff_ffff_ff00;

/// 8方向（シフト量, 相手石に掛けるマスク）
///
/// 正のシフトは左シフト（x+1 / y+1 方向）、負のシフトは右シフト。
const DIRECTIONS: [(i32, u64); 8] = [
    (1, NOT_EDGE_FILES),                   // 右
    (-1, NOT_EDGE_FILES),                  // 左
    (8, NOT_EDGE_RANKS),                   // 下
    (-8, NOT_EDGE_RANKS),                  // 上
    (9, NOT_EDGE_FILES & NOT_EDGE_RANKS),  // 右下
    (7, NOT_EDGE_FILES & NOT_EDGE_RANKS),  // 左下
    (-7, NOT_EDGE_FILES & NOT_EDGE_RANKS), // 右上
    (-9, NOT_EDGE_FILES & NOT_EDGE_RANKS), // 左上
];

/// 座標差分で表した8方向（反転計算用）
const STEPS: [(i8, i8); 8] = [(1, 0), (-1, 0), (0, 1), (0, -1), (1, 1), (-1, 1), (1, -1), (-1, -1)];

#[inline]
const fn shift(bb: u64, amount: i32) -> u64 {
    if amount > 0 { bb << amount } else { bb >> (-amount) }
}

/// 手番側 `me` の合法手マスクを返す
#[inline]
pub fn legal_moves_bb(me: u64, opp: u64) -> u64 {
    let empty = !(me | opp);
    let mut moves = 0u64;
    for &(dir, mask) in &DIRECTIONS {
        let o = opp & mask;
        let mut run = o & shift(me, dir);
        // 相手石の連続は最大6個
        for _ in 0..5 {
            run |= o & shift(run, dir);
        }
        moves |= empty & shift(run, dir);
    }
    moves
}

/// `sq` に打ったときに裏返る石のマスクを返す（合法でなければ 0）
#[inline]
pub fn flips_bb(me: u64, opp: u64, sq: Square) -> u64 {
    if (me | opp) & sq.bit() != 0 {
        return 0;
    }
    let mut flipped = 0u64;
    for &(dx, dy) in &STEPS {
        let mut line = 0u64;
        let mut x = sq.x() as i8 + dx;
        let mut y = sq.y() as i8 + dy;
        while (0..8).contains(&x) && (0..8).contains(&y) {
            let bit = 1u64 << (y * 8 + x);
            if opp & bit != 0 {
                line |= bit;
            } else {
                if me & bit != 0 {
                    flipped |= line;
                }
                break;
            }
            x += dx;
            y += dy;
        }
    }
    flipped
}

/// 立っているビットを下位から `Square` として列挙するイテレータ
#[derive(Debug, Clone, Copy)]
pub struct BitboardIter(u64);

impl BitboardIter {
    #[inline]
    pub const fn new(bb: u64) -> Self {
        Self(bb)
    }
}

impl Iterator for BitboardIter {
    type Item = Square;

    #[inline]
    fn next(&mut self) -> Option<Square> {
        if self.0 == 0 {
            return None;
        }
        let index = self.0.trailing_zeros() as u8;
        self.0 &= self.0 - 1;
        Square::from_index(index)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.0.count_ones() as usize;
        (n, Some(n))
    }
}

impl ExactSizeIterator for BitboardIter {}
