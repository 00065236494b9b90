//! 探索統計
//!
//! 1回の思考で発生した各種イベントの回数を記録する。チューニングやデバッグに使う。

use serde::{Deserialize, Serialize};

/// 探索統計カウンタ
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchStats {
    /// 総ノード数（探索関数の呼び出し回数）
    pub nodes: u64,
    /// 置換表の参照回数
    pub tt_probes: u64,
    /// ハッシュが一致した回数
    pub tt_hits: u64,
    /// 置換表の値で打ち切った回数
    pub tt_cutoffs: u64,
    /// beta カット回数
    pub beta_cutoffs: u64,
    /// null window で窓内に入り全幅で再探索した回数
    pub researches: u64,
    /// aspiration window の外に出て全幅で再探索した回数
    pub aspiration_failures: u64,
}

impl SearchStats {
    /// 置換表のヒット率（%）
    pub fn tt_hit_rate(&self) -> f64 {
        if self.tt_probes == 0 {
            0.0
        } else {
            self.tt_hits as f64 * 100.0 / self.tt_probes as f64
        }
    }
}

impl std::fmt::Display for SearchStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "nodes={} tt_hit={:.1}% tt_cut={} beta_cut={} research={} asp_fail={}",
            self.nodes,
            self.tt_hit_rate(),
            self.tt_cutoffs,
            self.beta_cutoffs,
            self.researches,
            self.aspiration_failures
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hit_rate() {
        let stats = SearchStats {
            tt_probes: 200,
            tt_hits: 50,
            ..SearchStats::default()
        };
        assert!((stats.tt_hit_rate() - 25.0).abs() < 1e-9);
        assert_eq!(SearchStats::default().tt_hit_rate(), 0.0);
        assert!(stats.to_string().contains("tt_hit=25.0%"));
    }
}
