//! 探索モジュール
//!
//! - `alpha_beta`: Negascout による内部ノード・ルートの探索（`SearchWorker`）
//! - `movepicker`: 展開前の指し手オーダリング
//! - `engine`: 反復深化ドライバ（`Engine::compute` / `think`）
//! - `time_manager`: 時計と持ち時間（`Clock`, `SearchBudget`）
//! - `config`: 探索設定
//! - `stats`: 探索統計
//!
//! 単一スレッドの深さ優先探索で、局面は探索中の呼び出しスタックだけが可変で借用する。
//! 時間切れは協調的にポーリングで検出し、例外や早期脱出ではなく通常の戻り値で巻き戻る。

pub mod alpha_beta;
pub mod config;
pub mod engine;
pub mod movepicker;
pub mod stats;
pub mod time_manager;

#[cfg(test)]
mod tests;

pub use alpha_beta::{RootResult, SearchWorker};
pub use config::{DepthSchedule, DepthTier, OrderingHeuristic, SearchConfig};
pub use engine::{Engine, SearchOutcome, depth_sequence};
pub use movepicker::MovePicker;
pub use stats::SearchStats;
pub use time_manager::{Clock, ManualClock, SearchBudget, SystemClock, TickClock};
