//! Success-rate and latency aggregation

use colored::Colorize;
use std::time::Duration;

/// Merged result of one load run. Latencies cover successful requests only;
/// failures (errors, timeouts, unexpected statuses) are just counted.
pub struct Summary {
    total: usize,
    failed: usize,
    latencies: Vec<Duration>,
}

impl Summary {
    pub fn new(total: usize, failed: usize, mut latencies: Vec<Duration>) -> Self {
        latencies.sort_unstable();
        Self {
            total,
            failed,
            latencies,
        }
    }

    pub fn success(&self) -> usize {
        self.total - self.failed
    }

    pub fn success_rate(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.success() as f64 / self.total as f64 * 100.0
    }

    pub fn min(&self) -> Option<Duration> {
        self.latencies.first().copied()
    }

    pub fn max(&self) -> Option<Duration> {
        self.latencies.last().copied()
    }

    pub fn mean(&self) -> Option<Duration> {
        if self.latencies.is_empty() {
            return None;
        }
        let total: Duration = self.latencies.iter().sum();
        Some(total / self.latencies.len() as u32)
    }

    /// Nearest-rank percentile over the sorted successful latencies.
    pub fn percentile(&self, p: f64) -> Option<Duration> {
        if self.latencies.is_empty() {
            return None;
        }
        let rank = (p / 100.0 * (self.latencies.len() - 1) as f64).round() as usize;
        self.latencies.get(rank).copied()
    }

    pub fn print(&self) {
        println!("Total requests: {}", self.total);
        println!("Success: {}", self.success());
        println!("Fail: {}", self.failed);

        let rate = format!("{:.2}%", self.success_rate());
        if self.failed == 0 {
            println!("Success rate: {}", rate.green());
        } else {
            println!("Success rate: {}", rate.red());
        }

        if let (Some(min), Some(mean), Some(max)) = (self.min(), self.mean(), self.max()) {
            println!("Latency: min {min:.2?} / mean {mean:.2?} / max {max:.2?}");
            for p in [50.0, 95.0, 99.0] {
                if let Some(value) = self.percentile(p) {
                    println!("  p{p:.0}: {value:.2?}");
                }
            }
        }
    }
}

/// Splits a request budget across workers, spreading the remainder over the
/// first workers so the shares sum to the total.
pub fn worker_share(total: usize, workers: usize, index: usize) -> usize {
    let base = total / workers;
    if index < total % workers {
        base + 1
    } else {
        base
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn millis(values: &[u64]) -> Vec<Duration> {
        values.iter().map(|v| Duration::from_millis(*v)).collect()
    }

    #[test]
    fn percentiles_over_known_latencies() {
        // 1..=100 ms, shuffled order on input does not matter.
        let mut input: Vec<u64> = (1..=100).rev().collect();
        input.swap(3, 77);
        let summary = Summary::new(100, 0, millis(&input));

        assert_eq!(summary.min(), Some(Duration::from_millis(1)));
        assert_eq!(summary.max(), Some(Duration::from_millis(100)));
        assert_eq!(summary.percentile(50.0), Some(Duration::from_millis(51)));
        assert_eq!(summary.percentile(99.0), Some(Duration::from_millis(99)));
        assert_eq!(summary.mean(), Some(Duration::from_micros(50_500)));
    }

    #[test]
    fn success_rate_counts_failures() {
        let summary = Summary::new(200, 5, millis(&[10; 195]));
        assert_eq!(summary.success(), 195);
        assert!((summary.success_rate() - 97.5).abs() < f64::EPSILON);
    }

    #[test]
    fn empty_summary_has_no_latency_stats() {
        let summary = Summary::new(0, 0, Vec::new());
        assert_eq!(summary.success_rate(), 0.0);
        assert_eq!(summary.mean(), None);
        assert_eq!(summary.percentile(95.0), None);
    }

    #[test]
    fn worker_shares_sum_to_the_budget() {
        for (total, workers) in [(10_000, 20), (7, 3), (5, 8)] {
            let sum: usize = (0..workers).map(|i| worker_share(total, workers, i)).sum();
            assert_eq!(sum, total);
        }
        assert_eq!(worker_share(7, 3, 0), 3);
        assert_eq!(worker_share(7, 3, 2), 2);
    }
}
