//! ビットボード盤面（Board）

use std::fmt;
use std::str::FromStr;

use super::zobrist::{zobrist_psq, zobrist_side};
use super::{Position, PositionError};
use crate::bitboard::{BitboardIter, flips_bb, legal_moves_bb};
use crate::types::{Color, MoveList, Square};

/// 平手初期局面の盤面テキスト
///
/// 行は 1 行目から順に `/` で区切り、最後に空白と手番を置く。
pub const STARTPOS: &str = "--------/--------/--------/---OX---/---XO---/--------/--------/-------- X";

/// `undo` 用に積む局面の写し
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Snapshot {
    black: u64,
    white: u64,
    side: Color,
    key: u64,
}

/// ビットボード盤面
///
/// `history` は `apply` / `pass` のたびに直前の状態を積み、`undo` で取り出す。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    black: u64,
    white: u64,
    side: Color,
    key: u64,
    history: Vec<Snapshot>,
}

impl Board {
    /// 平手初期局面（d4/e5 白、e4/d5 黒、黒番）
    pub fn new() -> Self {
        let d4 = Square::new(3, 3).map_or(0, Square::bit);
        let e4 = Square::new(4, 3).map_or(0, Square::bit);
        let d5 = Square::new(3, 4).map_or(0, Square::bit);
        let e5 = Square::new(4, 4).map_or(0, Square::bit);
        Self::from_bitboards(e4 | d5, d4 | e5, Color::Black)
    }

    /// ビットボードから生成（重なったビットは黒を優先）
    pub fn from_bitboards(black: u64, white: u64, side: Color) -> Self {
        let mut board = Self {
            black,
            white: white & !black,
            side,
            key: 0,
            history: Vec::with_capacity(64),
        };
        board.key = super::zobrist::compute_key(&board);
        board
    }

    /// 黒石のビットボード
    #[inline]
    pub fn black(&self) -> u64 {
        self.black
    }

    /// 白石のビットボード
    #[inline]
    pub fn white(&self) -> u64 {
        self.white
    }

    /// 指定色の石のビットボード
    #[inline]
    pub fn stones(&self, color: Color) -> u64 {
        match color {
            Color::Black => self.black,
            Color::White => self.white,
        }
    }

    /// 空きマスのビットボード
    #[inline]
    pub fn empties(&self) -> u64 {
        !(self.black | self.white)
    }

    /// 指定色の合法手マスク（手番に関係なく計算する）
    #[inline]
    pub fn moves_of(&self, color: Color) -> u64 {
        legal_moves_bb(self.stones(color), self.stones(color.opponent()))
    }

    /// 指定色の合法手数
    #[inline]
    pub fn mobility(&self, color: Color) -> u32 {
        self.moves_of(color).count_ones()
    }

    /// 積まれている履歴の深さ
    #[inline]
    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    /// 合法性を検査してから着手する
    pub fn try_apply(&mut self, mv: Square) -> Result<(), PositionError> {
        if self.moves_of(self.side) & mv.bit() == 0 {
            return Err(PositionError::IllegalMove(mv));
        }
        self.apply(mv);
        Ok(())
    }

    /// 両者とも合法手がないか
    pub fn is_game_over(&self) -> bool {
        self.moves_of(Color::Black) == 0 && self.moves_of(Color::White) == 0
    }

    /// 石数で勝者を判定（同数なら `None`）
    ///
    /// 終局していない局面でも現在の石数で判定する。
    pub fn winner(&self) -> Option<Color> {
        let black = self.count(Color::Black);
        let white = self.count(Color::White);
        match black.cmp(&white) {
            std::cmp::Ordering::Greater => Some(Color::Black),
            std::cmp::Ordering::Less => Some(Color::White),
            std::cmp::Ordering::Equal => None,
        }
    }

    /// `color` から見た石差
    pub fn disc_diff(&self, color: Color) -> i32 {
        self.count(color) as i32 - self.count(color.opponent()) as i32
    }

    #[inline]
    fn push_snapshot(&mut self) {
        self.history.push(Snapshot {
            black: self.black,
            white: self.white,
            side: self.side,
            key: self.key,
        });
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Position for Board {
    fn legal_moves(&self) -> MoveList {
        BitboardIter::new(self.moves_of(self.side)).collect()
    }

    fn apply(&mut self, mv: Square) {
        let me = self.side;
        let opp = me.opponent();
        let flips = flips_bb(self.stones(me), self.stones(opp), mv);
        debug_assert!(flips != 0, "apply called with illegal move {mv}");

        self.push_snapshot();

        let mut key = self.key ^ zobrist_psq(me, mv) ^ zobrist_side();
        for sq in BitboardIter::new(flips) {
            key ^= zobrist_psq(opp, sq) ^ zobrist_psq(me, sq);
        }

        let placed = flips | mv.bit();
        match me {
            Color::Black => {
                self.black |= placed;
                self.white &= !flips;
            }
            Color::White => {
                self.white |= placed;
                self.black &= !flips;
            }
        }
        self.side = opp;
        self.key = key;
    }

    fn undo(&mut self) {
        match self.history.pop() {
            Some(snapshot) => {
                self.black = snapshot.black;
                self.white = snapshot.white;
                self.side = snapshot.side;
                self.key = snapshot.key;
            }
            None => debug_assert!(false, "undo called with empty history"),
        }
    }

    fn pass(&mut self) {
        self.push_snapshot();
        self.side = self.side.opponent();
        self.key ^= zobrist_side();
    }

    #[inline]
    fn is_legal(&self) -> bool {
        self.moves_of(self.side) != 0
    }

    #[inline]
    fn cell_at(&self, sq: Square) -> Option<Color> {
        let bit = sq.bit();
        if self.black & bit != 0 {
            Some(Color::Black)
        } else if self.white & bit != 0 {
            Some(Color::White)
        } else {
            None
        }
    }

    #[inline]
    fn count(&self, color: Color) -> u32 {
        self.stones(color).count_ones()
    }

    #[inline]
    fn current_player(&self) -> Color {
        self.side
    }

    #[inline]
    fn key(&self) -> u64 {
        self.key
    }

    #[inline]
    fn empty_count(&self) -> u32 {
        self.empties().count_ones()
    }
}

impl FromStr for Board {
    type Err = PositionError;

    /// 盤面テキストを解析する
    ///
    /// `X` が黒、`O` が白、`-` / `.` が空き。空白と `/` は読み飛ばす。
    /// 64マスの後ろに手番（`X` / `O` / `black` / `white`）を置ける。省略時は黒番。
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let chars: Vec<char> = s.chars().filter(|c| !c.is_whitespace() && *c != '/').collect();
        if chars.len() < Square::NUM {
            return Err(PositionError::InvalidLength(chars.len()));
        }

        let mut black = 0u64;
        let mut white = 0u64;
        for (sq, &c) in Square::all().zip(chars.iter()) {
            match c {
                '-' | '.' => {}
                _ => match Color::from_char(c) {
                    Some(Color::Black) => black |= sq.bit(),
                    Some(Color::White) => white |= sq.bit(),
                    None => return Err(PositionError::InvalidCell(c)),
                },
            }
        }

        let rest: String = chars[Square::NUM..].iter().collect();
        let side = match rest.to_ascii_lowercase().as_str() {
            "" | "black" => Color::Black,
            "white" => Color::White,
            other => {
                let mut it = other.chars();
                match (it.next().and_then(Color::from_char), it.next()) {
                    (Some(color), None) => color,
                    _ => return Err(PositionError::InvalidSide(rest)),
                }
            }
        };

        Ok(Self::from_bitboards(black, white, side))
    }
}

impl fmt::Display for Board {
    /// `STARTPOS` と同じ形式で出力する
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for y in 0..8u8 {
            if y > 0 {
                f.write_str("/")?;
            }
            for x in 0..8u8 {
                let c = Square::new(x, y)
                    .and_then(|sq| self.cell_at(sq))
                    .map_or('-', Color::to_char);
                write!(f, "{c}")?;
            }
        }
        write!(f, " {}", self.side.to_char())
    }
}
