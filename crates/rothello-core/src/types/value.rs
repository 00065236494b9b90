//! 評価値（Value）
//!
//! 静的評価は `[-EVAL_LIMIT, EVAL_LIMIT]` に収め、その外側を終局スコア用に予約している。
//! 終局スコアは `WIN + 石差 * DISC_UNIT + 残り深さ` の形で、
//! 石差が同じなら残り深さが大きい（＝早く決着する）勝ちほど高くなる。

use serde::{Deserialize, Serialize};

/// 評価値
///
/// 浮動小数点ではなく整数で持つ（比較の揺れを避けるため）。
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
#[repr(transparent)]
pub struct Value(i32);

impl Value {
    /// ゼロ
    pub const ZERO: Value = Value(0);
    /// 引き分け
    pub const DRAW: Value = Value(0);
    /// 静的評価の上限（評価関数の出力はこの範囲にクランプされる）
    pub const EVAL_LIMIT: Value = Value(1_000_000);
    /// 終局スコアの基準値
    pub const WIN: Value = Value(2_000_000);
    /// 終局スコアにおける石1個あたりの重み（残り深さの加算より必ず大きい）
    pub const DISC_UNIT: i32 = 1_000;
    /// 無限大
    pub const INFINITE: Value = Value(10_000_000);

    /// 値から生成
    #[inline]
    pub const fn new(v: i32) -> Value {
        Value(v)
    }

    /// 生の値を取得
    #[inline]
    pub const fn raw(self) -> i32 {
        self.0
    }

    /// 終局スコア
    ///
    /// `disc_diff` は手番側から見た石差、`remaining_depth` は終局を検出した時点の残り深さ。
    /// 負けの場合は残り深さが大きい（早く負ける）ほど低くなる。
    #[inline]
    pub const fn terminal(disc_diff: i32, remaining_depth: i32) -> Value {
        let depth_bonus = if remaining_depth > 0 { remaining_depth } else { 0 };
        if disc_diff > 0 {
            Value(Self::WIN.0 + disc_diff * Self::DISC_UNIT + depth_bonus)
        } else if disc_diff < 0 {
            Value(-Self::WIN.0 + disc_diff * Self::DISC_UNIT - depth_bonus)
        } else {
            Self::DRAW
        }
    }

    /// 勝ちが確定したスコアかどうか
    #[inline]
    pub const fn is_win(self) -> bool {
        self.0 >= Self::WIN.0
    }

    /// 負けが確定したスコアかどうか
    #[inline]
    pub const fn is_loss(self) -> bool {
        self.0 <= -Self::WIN.0
    }

    /// 終局スコア（勝ちまたは負け）かどうか
    #[inline]
    pub const fn is_terminal(self) -> bool {
        self.is_win() || self.is_loss()
    }

    /// 終局スコアから石差を復元（終局スコア以外は `None`）
    #[inline]
    pub const fn disc_diff(self) -> Option<i32> {
        if self.is_win() {
            Some((self.0 - Self::WIN.0) / Self::DISC_UNIT)
        } else if self.is_loss() {
            Some((self.0 + Self::WIN.0) / Self::DISC_UNIT)
        } else {
            None
        }
    }

    /// 静的評価の範囲にクランプ
    #[inline]
    pub const fn clamp_eval(self) -> Value {
        if self.0 > Self::EVAL_LIMIT.0 {
            Self::EVAL_LIMIT
        } else if self.0 < -Self::EVAL_LIMIT.0 {
            Value(-Self::EVAL_LIMIT.0)
        } else {
            self
        }
    }
}

impl Default for Value {
    fn default() -> Self {
        Value::ZERO
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.disc_diff() {
            Some(diff) => write!(f, "{}{:+}", if self.is_win() { "win" } else { "loss" }, diff),
            None => write!(f, "{}", self.0),
        }
    }
}

impl std::ops::Neg for Value {
    type Output = Value;

    #[inline]
    fn neg(self) -> Value {
        Value(-self.0)
    }
}

impl std::ops::Add for Value {
    type Output = Value;

    #[inline]
    fn add(self, rhs: Value) -> Value {
        Value(self.0 + rhs.0)
    }
}

impl std::ops::Sub for Value {
    type Output = Value;

    #[inline]
    fn sub(self, rhs: Value) -> Value {
        Value(self.0 - rhs.0)
    }
}

impl std::ops::Add<i32> for Value {
    type Output = Value;

    #[inline]
    fn add(self, rhs: i32) -> Value {
        Value(self.0 + rhs)
    }
}

impl std::ops::Sub<i32> for Value {
    type Output = Value;

    #[inline]
    fn sub(self, rhs: i32) -> Value {
        Value(self.0 - rhs)
    }
}

impl std::ops::Mul<i32> for Value {
    type Output = Value;

    #[inline]
    fn mul(self, rhs: i32) -> Value {
        Value(self.0 * rhs)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Value {
        Value(v)
    }
}

impl From<Value> for i32 {
    fn from(v: Value) -> i32 {
        v.0
    }
}
