//! エンジン設定
//!
//! TOMLファイルから `EngineConfig`（探索設定＋評価関数）を読み込む。
//! 読み込み時に `SearchConfig::validate` を通す。

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::eval::EvalKind;
use crate::search::SearchConfig;

/// 設定エラー
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 設定ファイルを読めない
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// TOMLとして解釈できない
    #[error("failed to parse config: {0}")]
    Toml(#[from] toml::de::Error),

    /// 値の範囲・組み合わせが不正
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// エンジン全体の設定
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub search: SearchConfig,
    pub eval: EvalKind,
}

impl EngineConfig {
    /// TOML文字列から読み込む
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: EngineConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// TOMLファイルから読み込む
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&text)?;
        log::debug!("loaded config from {}", path.display());
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.search.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::OrderingHeuristic;

    #[test]
    fn test_empty_toml_is_default() {
        let config = EngineConfig::from_toml_str("").unwrap();
        assert_eq!(config, EngineConfig::default());
    }

    #[test]
    fn test_toml_overrides() {
        let text = r#"
[search]
time_budget_ms = 250
aspiration_window = 64
ordering = "evaluator"

[search.depth_schedule]
exhaustive_empties = 8
default_depth = 4
tiers = [{ max_empties = 30, depth = 6 }]

[eval]
kind = "material"
"#;
        let config = EngineConfig::from_toml_str(text).unwrap();
        assert_eq!(config.search.time_budget_ms, 250);
        assert_eq!(config.search.aspiration_window, 64);
        assert_eq!(config.search.ordering, OrderingHeuristic::Evaluator);
        assert_eq!(config.search.depth_schedule.target_depth(30), 6);
        assert_eq!(config.search.depth_schedule.target_depth(50), 4);
        assert_eq!(config.eval, EvalKind::Material);
    }

    #[test]
    fn test_invalid_values_rejected() {
        let err = EngineConfig::from_toml_str("[search]\ntt_capacity = 1000\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));

        let err = EngineConfig::from_toml_str("[search]\niteration_stop_fraction = 0.99\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_syntax_error() {
        let err = EngineConfig::from_toml_str("[search\n").unwrap_err();
        assert!(matches!(err, ConfigError::Toml(_)));
    }

    #[test]
    fn test_missing_file() {
        let err = EngineConfig::load("/nonexistent/rothello.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
