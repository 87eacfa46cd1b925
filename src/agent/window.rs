//! Sample window and SLO evaluation.
//!
//! # Design Decisions
//! - `attempts` counts every attempt for the process lifetime and drives the
//!   evaluation cadence in both modes
//! - Cumulative mode keeps three counters only
//! - Sliding mode keeps at most `size` outcomes

use std::collections::VecDeque;
use std::fmt;
use std::time::Duration;

use crate::config::WindowMode;

/// Sliding buffers grow on demand past this many slots.
const PREALLOCATED_SLOTS: usize = 1024;

/// Why a synthetic request failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// No usable HTTP response: timeout, refused connection, DNS.
    Transport,
    /// The service answered, but not with a usable success.
    Upstream,
}

impl FailureKind {
    pub fn as_str(self) -> &'static str {
        match self {
            FailureKind::Transport => "transport",
            FailureKind::Upstream => "upstream",
        }
    }
}

/// Result of one attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Success(Duration),
    Failure(FailureKind),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Pass,
    Breach,
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::Pass => f.write_str("PASS"),
            Verdict::Breach => f.write_str("SLO BREACH"),
        }
    }
}

/// One evaluation of the window against the SLO threshold.
#[derive(Debug, Clone, PartialEq)]
pub struct SloReport {
    /// Lifetime attempts when the report was produced.
    pub attempts: u64,
    /// Attempts inside the window.
    pub total: u64,
    /// Failed attempts inside the window.
    pub failed: u64,
    pub error_rate: f64,
    /// `None` when no attempt in the window succeeded.
    pub avg_latency: Option<Duration>,
    pub verdict: Verdict,
}

impl SloReport {
    pub fn error_rate_pct(&self) -> f64 {
        self.error_rate * 100.0
    }

    pub fn avg_latency_secs(&self) -> f64 {
        self.avg_latency.map_or(0.0, |d| d.as_secs_f64())
    }
}

impl fmt::Display for SloReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "SLO Status: {} | Error Rate: {:.2}% | Avg Latency: {:.4}s",
            self.verdict,
            self.error_rate_pct(),
            self.avg_latency_secs()
        )
    }
}

/// Outcome counters for SLO evaluation.
#[derive(Debug, Clone)]
pub struct SampleWindow {
    mode: WindowMode,
    attempts: u64,
    total: u64,
    failed: u64,
    latency_sum: Duration,
    recent: VecDeque<Outcome>,
}

impl SampleWindow {
    pub fn new(mode: WindowMode) -> Self {
        let recent = match mode {
            WindowMode::Cumulative => VecDeque::new(),
            WindowMode::Sliding { size } => VecDeque::with_capacity(size.min(PREALLOCATED_SLOTS)),
        };
        Self {
            mode,
            attempts: 0,
            total: 0,
            failed: 0,
            latency_sum: Duration::ZERO,
            recent,
        }
    }

    pub fn record(&mut self, outcome: Outcome) {
        self.attempts += 1;
        self.apply(outcome, true);

        if let WindowMode::Sliding { size } = self.mode {
            self.recent.push_back(outcome);
            while self.recent.len() > size {
                if let Some(evicted) = self.recent.pop_front() {
                    self.apply(evicted, false);
                }
            }
        }
    }

    fn apply(&mut self, outcome: Outcome, add: bool) {
        if add {
            self.total += 1;
        } else {
            self.total -= 1;
        }
        match outcome {
            Outcome::Success(latency) if add => self.latency_sum += latency,
            Outcome::Success(latency) => self.latency_sum = self.latency_sum.saturating_sub(latency),
            Outcome::Failure(_) if add => self.failed += 1,
            Outcome::Failure(_) => self.failed -= 1,
        }
    }

    /// Lifetime attempts, independent of the window mode.
    pub fn attempts(&self) -> u64 {
        self.attempts
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn failed(&self) -> u64 {
        self.failed
    }

    /// True when `attempts` is a positive multiple of `every`.
    pub fn is_due(&self, every: u64) -> bool {
        every > 0 && self.attempts > 0 && self.attempts % every == 0
    }

    pub fn evaluate(&self, threshold: f64) -> SloReport {
        let error_rate = if self.total == 0 {
            0.0
        } else {
            self.failed as f64 / self.total as f64
        };

        let succeeded = self.total - self.failed;
        let avg_latency = match u32::try_from(succeeded) {
            Ok(0) => None,
            Ok(n) => Some(self.latency_sum / n),
            Err(_) => Some(Duration::from_secs_f64(self.latency_sum.as_secs_f64() / succeeded as f64)),
        };

        SloReport {
            attempts: self.attempts,
            total: self.total,
            failed: self.failed,
            error_rate,
            avg_latency,
            verdict: if error_rate > threshold { Verdict::Breach } else { Verdict::Pass },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const THRESHOLD: f64 = 0.001;

    fn ok(ms: u64) -> Outcome {
        Outcome::Success(Duration::from_millis(ms))
    }

    #[test]
    fn test_all_successes_pass() {
        let mut window = SampleWindow::new(WindowMode::Cumulative);
        for _ in 0..10 {
            window.record(ok(100));
        }

        assert!(window.is_due(10));
        let report = window.evaluate(THRESHOLD);
        assert_eq!(report.error_rate, 0.0);
        assert_eq!(report.verdict, Verdict::Pass);
        assert_eq!(report.avg_latency, Some(Duration::from_millis(100)));
    }

    #[test]
    fn test_two_failures_in_ten_breach() {
        let mut window = SampleWindow::new(WindowMode::Cumulative);
        for i in 0..10 {
            if i < 2 {
                window.record(Outcome::Failure(FailureKind::Transport));
            } else {
                window.record(ok(50));
            }
        }

        let report = window.evaluate(THRESHOLD);
        assert!((report.error_rate - 0.2).abs() < f64::EPSILON);
        assert_eq!(report.verdict, Verdict::Breach);
        assert_eq!(report.avg_latency, Some(Duration::from_millis(50)));
        assert_eq!(report.to_string(), "SLO Status: SLO BREACH | Error Rate: 20.00% | Avg Latency: 0.0500s");
    }

    #[test]
    fn test_all_failures_report_zero_latency() {
        let mut window = SampleWindow::new(WindowMode::Cumulative);
        for _ in 0..10 {
            window.record(Outcome::Failure(FailureKind::Upstream));
        }

        let report = window.evaluate(THRESHOLD);
        assert_eq!(report.error_rate, 1.0);
        assert_eq!(report.avg_latency, None);
        assert_eq!(report.avg_latency_secs(), 0.0);
    }

    #[test]
    fn test_empty_window_does_not_divide_by_zero() {
        let window = SampleWindow::new(WindowMode::Cumulative);
        assert!(!window.is_due(10));
        let report = window.evaluate(THRESHOLD);
        assert_eq!(report.error_rate, 0.0);
        assert_eq!(report.verdict, Verdict::Pass);
    }

    #[test]
    fn test_failed_requests_never_add_latency() {
        let mut window = SampleWindow::new(WindowMode::Cumulative);
        window.record(ok(10));
        window.record(Outcome::Failure(FailureKind::Transport));
        window.record(ok(30));

        assert_eq!(window.evaluate(THRESHOLD).avg_latency, Some(Duration::from_millis(20)));
        assert!(window.failed() <= window.total());
    }

    #[test]
    fn test_cadence() {
        let mut window = SampleWindow::new(WindowMode::Cumulative);
        let mut due = Vec::new();
        for _ in 0..25 {
            window.record(ok(1));
            if window.is_due(10) {
                due.push(window.attempts());
            }
        }
        assert_eq!(due, vec![10, 20]);
    }

    #[test]
    fn test_sliding_window_forgets_old_failures() {
        let mut window = SampleWindow::new(WindowMode::Sliding { size: 10 });
        for _ in 0..5 {
            window.record(Outcome::Failure(FailureKind::Transport));
        }
        for _ in 0..10 {
            window.record(ok(20));
        }

        assert_eq!(window.attempts(), 15);
        assert_eq!(window.total(), 10);
        let report = window.evaluate(THRESHOLD);
        assert_eq!(report.failed, 0);
        assert_eq!(report.verdict, Verdict::Pass);
        assert_eq!(report.avg_latency, Some(Duration::from_millis(20)));
    }

    #[test]
    fn test_cumulative_window_remembers_old_failures() {
        let mut window = SampleWindow::new(WindowMode::Cumulative);
        window.record(Outcome::Failure(FailureKind::Transport));
        for _ in 0..1999 {
            window.record(ok(1));
        }

        let report = window.evaluate(THRESHOLD);
        assert_eq!(report.failed, 1);
        assert!((report.error_rate - 0.0005).abs() < 1e-12);
        assert_eq!(report.verdict, Verdict::Pass);
    }

    #[test]
    fn test_large_sliding_window_allocates_lazily() {
        let mut window = SampleWindow::new(WindowMode::Sliding { size: usize::MAX });
        window.record(ok(5));
        window.record(Outcome::Failure(FailureKind::Upstream));

        let report = window.evaluate(THRESHOLD);
        assert_eq!(report.total, 2);
        assert_eq!(report.failed, 1);
    }
}
