//! 時間管理
//!
//! - `Clock`: 経過時間の取得元（テストでは偽の時計を差し込む）
//! - `SystemClock`: `Instant` による実時間
//! - `ManualClock`: 手動で進める時計
//! - `TickClock`: 読むたびに一定量進む時計
//! - `SearchBudget`: 1回の思考の持ち時間と打ち切りフラグ
//!
//! 持ち時間に対して2つの閾値を持つ。反復深化の次の深さを始めない閾値
//! （`iteration_stop_fraction`）と、ノード内で打ち切りを立てる閾値（`node_abort_fraction`）。
//! 後者の方が遅いので、内部ノードで打ち切った後もルートの後処理は終えられる。

use std::cell::Cell;
use std::rc::Rc;
use std::time::{Duration, Instant};

use super::config::SearchConfig;

/// 単調増加する経過時間の取得元
pub trait Clock {
    /// 任意の基準点からの経過時間
    fn now(&self) -> Duration;
}

/// 実時間の時計
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    #[inline]
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }
}

/// 手動で進める時計
///
/// クローンは同じ時刻を共有する。
#[derive(Debug, Clone, Default)]
pub struct ManualClock(Rc<Cell<Duration>>);

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// 時刻を進める
    pub fn advance(&self, by: Duration) {
        self.0.set(self.0.get() + by);
    }

    /// 時刻を設定する
    pub fn set(&self, at: Duration) {
        self.0.set(at);
    }
}

impl Clock for ManualClock {
    #[inline]
    fn now(&self) -> Duration {
        self.0.get()
    }
}

/// `now()` を呼ぶたびに `step` だけ進む時計
#[derive(Debug, Clone, Default)]
pub struct TickClock {
    step: Duration,
    ticks: Cell<u32>,
}

impl TickClock {
    pub fn new(step: Duration) -> Self {
        Self {
            step,
            ticks: Cell::new(0),
        }
    }

    /// これまでに読まれた回数
    pub fn reads(&self) -> u32 {
        self.ticks.get()
    }
}

impl Clock for TickClock {
    fn now(&self) -> Duration {
        let t = self.ticks.get();
        self.ticks.set(t.saturating_add(1));
        self.step * t
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    #[inline]
    fn now(&self) -> Duration {
        (**self).now()
    }
}

/// 1回の思考の持ち時間
///
/// `exceeded` は一度立てたら同じ思考の間は下ろさない。
#[derive(Debug, Clone)]
pub struct SearchBudget {
    start: Duration,
    iteration_deadline: Option<Duration>,
    node_deadline: Option<Duration>,
    check_interval: u32,
    countdown: u32,
    exceeded: bool,
}

impl SearchBudget {
    /// 設定の持ち時間で開始（`time_budget_ms == 0` なら無制限）
    pub fn start<C: Clock + ?Sized>(clock: &C, config: &SearchConfig) -> Self {
        let start = clock.now();
        let limit = (config.time_budget_ms > 0).then(|| Duration::from_millis(config.time_budget_ms));
        let interval = config.node_check_interval.max(1);
        Self {
            start,
            iteration_deadline: limit.map(|l| start + l.mul_f64(config.iteration_stop_fraction)),
            node_deadline: limit.map(|l| start + l.mul_f64(config.node_abort_fraction)),
            check_interval: interval,
            countdown: interval,
            exceeded: false,
        }
    }

    /// 無制限
    pub fn unlimited() -> Self {
        Self {
            start: Duration::ZERO,
            iteration_deadline: None,
            node_deadline: None,
            check_interval: u32::MAX,
            countdown: u32::MAX,
            exceeded: false,
        }
    }

    /// 時間切れが確定しているか
    #[inline]
    pub fn is_exceeded(&self) -> bool {
        self.exceeded
    }

    /// ノードごとに呼ぶ。`check_interval` 回に1回だけ時計を読む。
    #[inline]
    pub fn poll<C: Clock + ?Sized>(&mut self, clock: &C) -> bool {
        if self.exceeded {
            return true;
        }
        self.countdown -= 1;
        if self.countdown > 0 {
            return false;
        }
        self.countdown = self.check_interval;
        self.check_now(clock)
    }

    /// 時計を読んでノード打ち切りの閾値を判定する
    pub fn check_now<C: Clock + ?Sized>(&mut self, clock: &C) -> bool {
        if self.exceeded {
            return true;
        }
        if self.node_deadline.is_some_and(|deadline| clock.now() >= deadline) {
            log::debug!("node deadline reached");
            self.exceeded = true;
        }
        self.exceeded
    }

    /// 次の深さを始めてよい時間を過ぎたか
    pub fn iteration_limit_reached<C: Clock + ?Sized>(&self, clock: &C) -> bool {
        self.exceeded || self.iteration_deadline.is_some_and(|deadline| clock.now() >= deadline)
    }

    /// 開始からの経過時間
    pub fn elapsed<C: Clock + ?Sized>(&self, clock: &C) -> Duration {
        clock.now().saturating_sub(self.start)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(budget_ms: u64, interval: u32) -> SearchConfig {
        SearchConfig {
            time_budget_ms: budget_ms,
            node_check_interval: interval,
            ..SearchConfig::default()
        }
    }

    #[test]
    fn test_manual_clock_shared() {
        let clock = ManualClock::new();
        let handle = clock.clone();
        handle.advance(Duration::from_millis(30));
        assert_eq!(clock.now(), Duration::from_millis(30));
        handle.set(Duration::from_millis(5));
        assert_eq!(clock.now(), Duration::from_millis(5));
    }

    #[test]
    fn test_tick_clock() {
        let clock = TickClock::new(Duration::from_millis(2));
        assert_eq!(clock.now(), Duration::ZERO);
        assert_eq!(clock.now(), Duration::from_millis(2));
        assert_eq!(clock.reads(), 2);
    }

    #[test]
    fn test_iteration_threshold_before_node_threshold() {
        let clock = ManualClock::new();
        let mut budget = SearchBudget::start(&clock, &config(1000, 1));

        clock.set(Duration::from_millis(599));
        assert!(!budget.iteration_limit_reached(&clock));
        clock.set(Duration::from_millis(601));
        assert!(budget.iteration_limit_reached(&clock));
        assert!(!budget.check_now(&clock));

        clock.set(Duration::from_millis(951));
        assert!(budget.check_now(&clock));
        assert!(budget.is_exceeded());

        // 一度立てたら下ろさない
        clock.set(Duration::ZERO);
        assert!(budget.poll(&clock));
        assert!(budget.iteration_limit_reached(&clock));
    }

    #[test]
    fn test_poll_interval() {
        let clock = TickClock::new(Duration::ZERO);
        let mut budget = SearchBudget::start(&clock, &config(1000, 4));
        let before = clock.reads();
        for _ in 0..3 {
            assert!(!budget.poll(&clock));
        }
        assert_eq!(clock.reads(), before);
        assert!(!budget.poll(&clock));
        assert_eq!(clock.reads(), before + 1);
    }

    #[test]
    fn test_unlimited_budget() {
        let clock = ManualClock::new();
        let mut budget = SearchBudget::start(&clock, &config(0, 1));
        clock.set(Duration::from_secs(1_000_000));
        assert!(!budget.check_now(&clock));
        assert!(!budget.iteration_limit_reached(&clock));

        let mut unlimited = SearchBudget::unlimited();
        assert!(!unlimited.poll(&clock));
    }

    #[test]
    fn test_elapsed() {
        let clock = ManualClock::new();
        clock.set(Duration::from_millis(100));
        let budget = SearchBudget::start(&clock, &config(1000, 1));
        clock.advance(Duration::from_millis(40));
        assert_eq!(budget.elapsed(&clock), Duration::from_millis(40));
    }
}
