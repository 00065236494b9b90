//! 置換表エントリ

use serde::{Deserialize, Serialize};

use crate::types::{Depth, Square, Value};

/// 評価値の境界の種類
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Bound {
    /// 窓の内側で確定した値
    Exact,
    /// beta 以上で打ち切った（真の値はこれ以上）
    Lower,
    /// alpha を更新できなかった（真の値はこれ以下）
    Upper,
}

impl Bound {
    /// ノード開始時の窓 `(alpha, beta)` に対する `value` の境界
    #[inline]
    pub fn classify(value: Value, alpha: Value, beta: Value) -> Bound {
        if value >= beta {
            Bound::Lower
        } else if value <= alpha {
            Bound::Upper
        } else {
            Bound::Exact
        }
    }
}

/// 置換表エントリ
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TTEntry {
    pub hash: u64,
    pub value: Value,
    pub depth: Depth,
    pub bound: Bound,
    pub best_move: Option<Square>,
}

impl TTEntry {
    /// この値で探索を打ち切れるなら、その値を返す
    ///
    /// 記録された深さが要求深さ以上で、かつ
    /// 正確値 / beta 以上の下限 / alpha 以下の上限 のいずれかである場合に限る。
    #[inline]
    pub fn cutoff(&self, depth: Depth, alpha: Value, beta: Value) -> Option<Value> {
        if self.depth < depth {
            return None;
        }
        match self.bound {
            Bound::Exact => Some(self.value),
            Bound::Lower if self.value >= beta => Some(self.value),
            Bound::Upper if self.value <= alpha => Some(self.value),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(value: i32, depth: Depth, bound: Bound) -> TTEntry {
        TTEntry {
            hash: 1,
            value: Value::new(value),
            depth,
            bound,
            best_move: None,
        }
    }

    #[test]
    fn test_classify() {
        let (a, b) = (Value::new(-10), Value::new(10));
        assert_eq!(Bound::classify(Value::new(0), a, b), Bound::Exact);
        assert_eq!(Bound::classify(Value::new(10), a, b), Bound::Lower);
        assert_eq!(Bound::classify(Value::new(50), a, b), Bound::Lower);
        assert_eq!(Bound::classify(Value::new(-10), a, b), Bound::Upper);
    }

    #[test]
    fn test_cutoff_rules() {
        let (a, b) = (Value::new(-10), Value::new(10));
        assert_eq!(entry(3, 4, Bound::Exact).cutoff(4, a, b), Some(Value::new(3)));
        // 浅いエントリは使わない
        assert_eq!(entry(3, 3, Bound::Exact).cutoff(4, a, b), None);
        assert_eq!(entry(20, 4, Bound::Lower).cutoff(4, a, b), Some(Value::new(20)));
        assert_eq!(entry(5, 4, Bound::Lower).cutoff(4, a, b), None);
        assert_eq!(entry(-20, 6, Bound::Upper).cutoff(4, a, b), Some(Value::new(-20)));
        assert_eq!(entry(-5, 6, Bound::Upper).cutoff(4, a, b), None);
    }
}
