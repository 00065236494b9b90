//! 評価関数
//!
//! - `Evaluator`: 探索コアが使う静的評価の契約（手番側から見た値を返す）
//! - `Material`: 石差のみの決定的な評価
//! - `Weighted`: 局面の進行度で重みを切り替える評価（位置・着手可能数・隅・確定石など）
//! - `EvalKind`: 設定から選ぶための列挙（動的ディスパッチではなく `match` で振り分ける）
//!
//! 出力は必ず `±Value::EVAL_LIMIT` に収める。終局スコアと取り違えないため。

pub mod material;
pub mod weighted;

pub use material::Material;
pub use weighted::{EvalWeights, PhaseWeights, Weighted};

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::position::Position;
use crate::types::Value;

/// 静的評価の契約
///
/// 任意の到達可能局面で定義され、同じ局面には常に同じ値を返すこと。
/// 局面の変更は許されない。
pub trait Evaluator {
    /// 手番側から見た評価値（正なら手番側が有利）
    fn evaluate<P: Position + ?Sized>(&self, pos: &P) -> Value;
}

impl<E: Evaluator> Evaluator for &E {
    #[inline]
    fn evaluate<P: Position + ?Sized>(&self, pos: &P) -> Value {
        (**self).evaluate(pos)
    }
}

/// 設定で選択する評価関数
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EvalKind {
    /// 石差のみ
    Material,
    /// 重み付き評価
    Weighted(EvalWeights),
}

impl Default for EvalKind {
    fn default() -> Self {
        EvalKind::Weighted(EvalWeights::default())
    }
}

impl Evaluator for EvalKind {
    #[inline]
    fn evaluate<P: Position + ?Sized>(&self, pos: &P) -> Value {
        match self {
            EvalKind::Material => Material.evaluate(pos),
            EvalKind::Weighted(weights) => Weighted::evaluate_with(weights, pos),
        }
    }
}

impl FromStr for EvalKind {
    type Err = String;

    /// `material` / `weighted`（既定の重み）を受け付ける
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "material" => Ok(EvalKind::Material),
            "weighted" => Ok(EvalKind::default()),
            other => Err(format!("unknown evaluator '{other}' (expected material|weighted)")),
        }
    }
}

impl std::fmt::Display for EvalKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EvalKind::Material => f.write_str("material"),
            EvalKind::Weighted(_) => f.write_str("weighted"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::position::Board;

    #[test]
    fn test_eval_kind_parse() {
        assert_eq!("material".parse::<EvalKind>(), Ok(EvalKind::Material));
        assert_eq!("Weighted".parse::<EvalKind>(), Ok(EvalKind::default()));
        assert!("nnue".parse::<EvalKind>().is_err());
    }

    #[test]
    fn test_eval_kind_dispatch() {
        let board = Board::new();
        assert_eq!(EvalKind::Material.evaluate(&board), Material.evaluate(&board));
        let weighted = Weighted::default();
        assert_eq!(EvalKind::default().evaluate(&board), weighted.evaluate(&board));
    }

    #[test]
    fn test_eval_kind_toml() {
        let kind: EvalKind = toml::from_str("kind = \"material\"").unwrap();
        assert_eq!(kind, EvalKind::Material);
    }
}
