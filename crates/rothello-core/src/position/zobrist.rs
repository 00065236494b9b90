//! Zobristハッシュ
//!
//! 色×マスの乱数と手番の乱数を XOR して局面キーを作る。
//! 乱数は固定シードの `Xoshiro256PlusPlus` で生成するため、実行ごとに同じキーになる。
//! 盤の対称形は畳み込まない。

use std::sync::LazyLock;

use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;

use super::Position;
use crate::types::{Color, Square};

/// 乱数テーブルのシード
const ZOBRIST_SEED: u64 = 0x5EED_0F0F_7E11_0000;

/// Zobrist乱数テーブル
pub struct Zobrist {
    /// 色×マス
    psq: [[u64; Square::NUM]; Color::NUM],
    /// 白番のときに XOR する値
    side: u64,
}

impl Zobrist {
    fn new() -> Self {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(ZOBRIST_SEED);
        let mut psq = [[0u64; Square::NUM]; Color::NUM];
        for table in psq.iter_mut() {
            for key in table.iter_mut() {
                *key = rng.random::<u64>();
            }
        }
        let side = rng.random::<u64>();
        Self { psq, side }
    }
}

/// グローバルな乱数テーブル（初回アクセス時に初期化）
pub static ZOBRIST: LazyLock<Zobrist> = LazyLock::new(Zobrist::new);

/// 色 `color` の石が `sq` にあるときのキー
#[inline]
pub fn zobrist_psq(color: Color, sq: Square) -> u64 {
    ZOBRIST.psq[color.index()][sq.index()]
}

/// 手番のキー（白番のときに XOR する）
#[inline]
pub fn zobrist_side() -> u64 {
    ZOBRIST.side
}

/// `Position` の参照系クエリから局面キーを計算する
pub fn compute_key<P: Position + ?Sized>(pos: &P) -> u64 {
    let mut key = 0u64;
    for sq in Square::all() {
        if let Some(color) = pos.cell_at(sq) {
            key ^= zobrist_psq(color, sq);
        }
    }
    if pos.current_player() == Color::White {
        key ^= zobrist_side();
    }
    key
}
