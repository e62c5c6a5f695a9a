//! Debug statistics

use std::collections::VecDeque;
use std::time::Duration;

/// Rolling statistics over recent interval durations.
///
/// Used for both ticks per second and frames per second.
#[derive(Debug)]
pub struct RateStats {
    samples: VecDeque<Duration>,
    max_samples: usize,
    rate: f32,
    avg_ms: f32,
    min_ms: f32,
    max_ms: f32,
    total: u64,
}

impl RateStats {
    /// Keep the latest `max_samples` intervals
    #[must_use]
    pub fn new(max_samples: usize) -> Self {
        let max_samples = max_samples.max(1);
        Self {
            samples: VecDeque::with_capacity(max_samples),
            max_samples,
            rate: 0.0,
            avg_ms: 0.0,
            min_ms: 0.0,
            max_ms: 0.0,
            total: 0,
        }
    }

    /// Record one interval
    pub fn record(&mut self, delta: Duration) {
        self.total += 1;
        if self.samples.len() >= self.max_samples {
            self.samples.pop_front();
        }
        self.samples.push_back(delta);
        self.recompute();
    }

    fn recompute(&mut self) {
        let mut sum = Duration::ZERO;
        let mut min = Duration::MAX;
        let mut max = Duration::ZERO;
        for &dt in &self.samples {
            sum += dt;
            min = min.min(dt);
            max = max.max(dt);
        }

        let count = self.samples.len() as f32;
        let secs = sum.as_secs_f32();
        if secs > 0.0 {
            self.avg_ms = secs / count * 1000.0;
            self.rate = count / secs;
        } else {
            self.avg_ms = 0.0;
            self.rate = 0.0;
        }
        self.min_ms = min.as_secs_f32() * 1000.0;
        self.max_ms = max.as_secs_f32() * 1000.0;
    }

    /// Intervals per second over the window
    #[must_use]
    pub fn rate(&self) -> f32 {
        self.rate
    }

    #[must_use]
    pub fn avg_ms(&self) -> f32 {
        self.avg_ms
    }

    #[must_use]
    pub fn min_ms(&self) -> f32 {
        self.min_ms
    }

    #[must_use]
    pub fn max_ms(&self) -> f32 {
        self.max_ms
    }

    /// Intervals recorded since creation
    #[must_use]
    pub fn total(&self) -> u64 {
        self.total
    }

    /// One-line summary prefixed with `label`
    #[must_use]
    pub fn format(&self, label: &str) -> String {
        format!(
            "{label}: {:.1} | {:.2}ms (min: {:.2}, max: {:.2})",
            self.rate, self.avg_ms, self.min_ms, self.max_ms
        )
    }
}

impl Default for RateStats {
    fn default() -> Self {
        Self::new(120)
    }
}

/// Diagnostics collected by the engine
#[derive(Debug, Default)]
pub struct DebugInfo {
    /// Whether the overlay should be composed
    pub enabled: bool,
    /// Update loop rate
    pub tick_stats: RateStats,
    /// Render rate
    pub frame_stats: RateStats,
    custom_lines: Vec<String>,
}

impl DebugInfo {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn toggle(&mut self) {
        self.enabled = !self.enabled;
    }

    pub fn record_tick(&mut self, delta: Duration) {
        self.tick_stats.record(delta);
    }

    pub fn record_frame(&mut self, delta: Duration) {
        self.frame_stats.record(delta);
    }

    /// Add a line shown under the built-in statistics
    pub fn add_line(&mut self, line: impl Into<String>) {
        self.custom_lines.push(line.into());
    }

    pub fn clear_lines(&mut self) {
        self.custom_lines.clear();
    }

    #[must_use]
    pub fn custom_lines(&self) -> &[String] {
        &self.custom_lines
    }

    /// Statistics summaries followed by custom lines
    #[must_use]
    pub fn get_all_lines(&self) -> Vec<String> {
        let mut lines = vec![
            self.tick_stats.format("TPS"),
            self.frame_stats.format("FPS"),
        ];
        lines.extend(self.custom_lines.iter().cloned());
        lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_from_fixed_intervals() {
        let mut stats = RateStats::new(10);
        for _ in 0..5 {
            stats.record(Duration::from_millis(10));
        }
        assert!((stats.rate() - 100.0).abs() < 0.1);
        assert!((stats.avg_ms() - 10.0).abs() < 0.01);
        assert_eq!(stats.total(), 5);
    }

    #[test]
    fn test_window_drops_old_samples() {
        let mut stats = RateStats::new(2);
        stats.record(Duration::from_millis(100));
        stats.record(Duration::from_millis(10));
        stats.record(Duration::from_millis(10));
        assert!((stats.max_ms() - 10.0).abs() < 0.01);
        assert_eq!(stats.total(), 3);
    }

    #[test]
    fn test_zero_intervals() {
        let mut stats = RateStats::default();
        stats.record(Duration::ZERO);
        assert_eq!(stats.rate(), 0.0);
    }

    #[test]
    fn test_debug_lines() {
        let mut debug = DebugInfo::new();
        debug.add_line("entities: 3");
        let lines = debug.get_all_lines();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("TPS"));
        assert_eq!(lines[2], "entities: 3");

        debug.clear_lines();
        assert!(debug.custom_lines().is_empty());
        debug.toggle();
        assert!(debug.enabled);
    }
}
