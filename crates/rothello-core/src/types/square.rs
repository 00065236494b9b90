//! マス（Square）
//!
//! 盤面の64マスを `index = y * 8 + x` で表す。`x` は列（a-h）、`y` は行（1-8）。
//! 文字列表記は列の英小文字＋行の数字（例: `d3`）。

use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::position::PositionError;

/// マス（0〜63）
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct Square(u8);

impl Square {
    /// マスの数
    pub const NUM: usize = 64;

    pub const A1: Square = Square(0);
    pub const H1: Square = Square(7);
    pub const A8: Square = Square(56);
    pub const H8: Square = Square(63);

    /// 四隅
    pub const CORNERS: [Square; 4] = [Square::A1, Square::H1, Square::A8, Square::H8];

    /// 座標から生成（範囲外は `None`）
    #[inline]
    pub const fn new(x: u8, y: u8) -> Option<Square> {
        if x < 8 && y < 8 { Some(Square(y * 8 + x)) } else { None }
    }

    /// インデックスから生成（範囲外は `None`）
    #[inline]
    pub const fn from_index(index: u8) -> Option<Square> {
        if index < 64 { Some(Square(index)) } else { None }
    }

    /// 列（0-7）
    #[inline]
    pub const fn x(self) -> u8 {
        self.0 & 7
    }

    /// 行（0-7）
    #[inline]
    pub const fn y(self) -> u8 {
        self.0 >> 3
    }

    /// インデックスとして使用
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Bitboard 上のビット
    #[inline]
    pub const fn bit(self) -> u64 {
        1u64 << self.0
    }

    /// 隅かどうか
    #[inline]
    pub const fn is_corner(self) -> bool {
        let x = self.x();
        let y = self.y();
        (x == 0 || x == 7) && (y == 0 || y == 7)
    }

    /// X打ち（隅の斜め隣）かどうか
    #[inline]
    pub const fn is_x_square(self) -> bool {
        let x = self.x();
        let y = self.y();
        (x == 1 || x == 6) && (y == 1 || y == 6)
    }

    /// C打ち（隅に辺で隣接するマス）かどうか
    #[inline]
    pub const fn is_c_square(self) -> bool {
        let x = self.x();
        let y = self.y();
        ((x == 1 || x == 6) && (y == 0 || y == 7)) || ((x == 0 || x == 7) && (y == 1 || y == 6))
    }

    /// 辺（隅を含む）かどうか
    #[inline]
    pub const fn is_edge(self) -> bool {
        let x = self.x();
        let y = self.y();
        x == 0 || x == 7 || y == 0 || y == 7
    }

    /// X打ち・C打ちに対応する隅
    ///
    /// 盤の象限で決まる（`x < 4` なら a 列側、`y < 4` なら 1 行側）。
    #[inline]
    pub const fn nearest_corner(self) -> Square {
        let cx = if self.x() < 4 { 0 } else { 7 };
        let cy = if self.y() < 4 { 0 } else { 7 };
        Square(cy * 8 + cx)
    }

    /// 全マスのイテレータ（a1, b1, ..., h8 の順）
    pub fn all() -> impl Iterator<Item = Square> {
        (0..64u8).map(Square)
    }
}

impl std::fmt::Display for Square {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", (b'a' + self.x()) as char, (b'1' + self.y()) as char)
    }
}

impl FromStr for Square {
    type Err = PositionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = s.trim().as_bytes();
        if bytes.len() != 2 {
            return Err(PositionError::InvalidSquare(s.to_string()));
        }
        let x = bytes[0].to_ascii_lowercase().wrapping_sub(b'a');
        let y = bytes[1].wrapping_sub(b'1');
        Square::new(x, y).ok_or_else(|| PositionError::InvalidSquare(s.to_string()))
    }
}

impl Serialize for Square {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Square {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
