//! 基本型モジュール
//!
//! - `Color`: 石の色（手番）
//! - `Square`: マス
//! - `Value`: 評価値（終局スコア帯を含む）
//! - `Depth`: 探索深さ
//! - `MoveList`: 合法手リスト

mod color;
mod square;
mod value;

pub use color::Color;
pub use square::Square;
pub use value::Value;

use smallvec::SmallVec;

/// 探索深さ（手数単位）
pub type Depth = i32;

/// 探索深さの上限（空きマス数の最大値）
pub const MAX_DEPTH: Depth = 64;

/// 合法手リスト
///
/// オセロの合法手は実戦上ほぼ 32 手以内に収まるため、通常はヒープ確保なしで済む。
pub type MoveList = SmallVec<[Square; 32]>;
