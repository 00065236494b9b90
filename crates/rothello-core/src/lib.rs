//! rothello-core: オセロ（リバーシ）の探索コア
//!
//! - `types`: 石の色・マス・評価値などの基本型
//! - `bitboard`: 合法手生成と反転計算のビット演算
//! - `position`: 探索コアが使う局面の契約（`Position`）とビットボード実装（`Board`）
//! - `eval`: 評価関数（`Evaluator`, `Material`, `Weighted`, `EvalKind`）
//! - `tt`: 置換表
//! - `search`: Negascout 探索と反復深化ドライバ（`Engine`）
//! - `config`: TOML 設定の読み込み

pub mod bitboard;
pub mod config;
pub mod eval;
pub mod position;
pub mod search;
pub mod tt;
pub mod types;

pub use config::{ConfigError, EngineConfig};
pub use eval::{EvalKind, Evaluator};
pub use position::{Board, Position, PositionError};
pub use search::{Engine, SearchConfig, SearchOutcome};
pub use types::{Color, Square, Value};
