//! 探索設定

use serde::{Deserialize, Serialize};

use crate::config::ConfigError;
use crate::tt::DEFAULT_TT_CAPACITY;
use crate::types::{Depth, MAX_DEPTH};

/// 手の並べ替えで使う1手読みの指標
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderingHeuristic {
    /// 着手後の着手可能数の差（自分 − 相手）
    #[default]
    Mobility,
    /// 着手後の静的評価
    Evaluator,
}

/// 空きマス数がこの値以下なら `depth` で読む
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepthTier {
    pub max_empties: u32,
    pub depth: Depth,
}

/// 空きマス数から目標深さを決める表
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DepthSchedule {
    /// 空きマス数がこの値以下なら終局まで読み切る
    pub exhaustive_empties: u32,
    /// `max_empties` の小さい順に評価する
    pub tiers: Vec<DepthTier>,
    /// どの段にも当てはまらないときの深さ
    pub default_depth: Depth,
}

impl Default for DepthSchedule {
    fn default() -> Self {
        Self {
            exhaustive_empties: 12,
            tiers: vec![
                DepthTier {
                    max_empties: 20,
                    depth: 12,
                },
                DepthTier {
                    max_empties: 40,
                    depth: 10,
                },
            ],
            default_depth: 8,
        }
    }
}

impl DepthSchedule {
    /// 目標深さ
    ///
    /// 読み切りの場合は空きマス数＋1。盤が埋まった後の連続パスまで読んで終局スコアを得るため。
    pub fn target_depth(&self, empties: u32) -> Depth {
        if empties <= self.exhaustive_empties {
            return empties as Depth + 1;
        }
        self.tiers
            .iter()
            .filter(|tier| empties <= tier.max_empties)
            .min_by_key(|tier| tier.max_empties)
            .map_or(self.default_depth, |tier| tier.depth)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.default_depth < 1 {
            return Err(ConfigError::Invalid("depth_schedule.default_depth must be >= 1".to_string()));
        }
        if let Some(tier) = self.tiers.iter().find(|tier| tier.depth < 1) {
            return Err(ConfigError::Invalid(format!(
                "depth_schedule tier for <= {} empties has depth {}",
                tier.max_empties, tier.depth
            )));
        }
        Ok(())
    }
}

/// 探索設定
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// 1手あたりの持ち時間（ミリ秒、0なら無制限）
    pub time_budget_ms: u64,
    /// 持ち時間のこの割合を過ぎたら次の深さを始めない
    pub iteration_stop_fraction: f64,
    /// 持ち時間のこの割合を過ぎたらノード内で打ち切る
    pub node_abort_fraction: f64,
    /// 時計を読む間隔（ノード数）
    pub node_check_interval: u32,
    /// aspiration window の幅
    pub aspiration_window: i32,
    /// 置換表のエントリ数（2の冪）
    pub tt_capacity: usize,
    pub use_tt: bool,
    pub ordering: OrderingHeuristic,
    pub depth_schedule: DepthSchedule,
    /// 目標深さの上限
    pub max_depth: Depth,
    /// 乱数シード
    pub seed: u64,
    /// 1手読みの代替手選択で同点の手を乱数で選ぶ
    pub randomize_ties: bool,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            time_budget_ms: 5000,
            iteration_stop_fraction: 0.6,
            node_abort_fraction: 0.95,
            node_check_interval: 1024,
            aspiration_window: 200,
            tt_capacity: DEFAULT_TT_CAPACITY,
            use_tt: true,
            ordering: OrderingHeuristic::default(),
            depth_schedule: DepthSchedule::default(),
            max_depth: 60,
            seed: 0,
            randomize_ties: false,
        }
    }
}

impl SearchConfig {
    /// 設定値の検証
    pub fn validate(&self) -> Result<(), ConfigError> {
        let (stop, abort) = (self.iteration_stop_fraction, self.node_abort_fraction);
        if !(stop > 0.0 && stop < abort && abort <= 1.0) {
            return Err(ConfigError::Invalid(format!(
                "fractions must satisfy 0 < iteration_stop_fraction ({stop}) < node_abort_fraction ({abort}) <= 1"
            )));
        }
        if self.node_check_interval == 0 {
            return Err(ConfigError::Invalid("node_check_interval must be >= 1".to_string()));
        }
        if self.aspiration_window <= 0 {
            return Err(ConfigError::Invalid(format!(
                "aspiration_window must be positive, got {}",
                self.aspiration_window
            )));
        }
        if self.tt_capacity < 2 || !self.tt_capacity.is_power_of_two() {
            return Err(ConfigError::Invalid(format!(
                "tt_capacity must be a power of two >= 2, got {}",
                self.tt_capacity
            )));
        }
        if !(1..=MAX_DEPTH).contains(&self.max_depth) {
            return Err(ConfigError::Invalid(format!(
                "max_depth must be in 1..={MAX_DEPTH}, got {}",
                self.max_depth
            )));
        }
        self.depth_schedule.validate()
    }
}
