//! 置換表モジュール
//!
//! 探索結果をキャッシュする置換表（Transposition Table）。
//!
//! - `TTEntry`: エントリ（ハッシュ・評価値・深さ・境界・最善手）
//! - `Bound`: 評価値の種類（正確値・下限・上限）
//! - `TranspositionTable`: 固定容量（2の冪）のテーブル本体
//!
//! # 置換方針
//!
//! インデックスは `hash & (capacity - 1)`。書き込みは常に上書きで、深さによる優先はしない。
//! 照合は64bitハッシュのみで行い、別局面が同じハッシュを持つ衝突は検出しない。
//! これは既知の精度上の制約として受け入れている。

mod entry;
mod table;

pub use entry::{Bound, TTEntry};
pub use table::TranspositionTable;

/// 既定の容量（エントリ数）
pub const DEFAULT_TT_CAPACITY: usize = 1 << 20;
