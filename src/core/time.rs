//! Tick timing

use std::time::{Duration, Instant};

/// Wall-clock bookkeeping for the tick driver
#[derive(Debug, Clone)]
pub struct Time {
    startup: Instant,
    last_tick: Instant,
    delta: Duration,
    elapsed: Duration,
    tick_count: u64,
}

impl Time {
    #[must_use]
    pub fn new() -> Self {
        let now = Instant::now();
        Self {
            startup: now,
            last_tick: now,
            delta: Duration::ZERO,
            elapsed: Duration::ZERO,
            tick_count: 0,
        }
    }

    /// Restart delta measurement from now, e.g. just before the loop starts
    pub fn reset_clock(&mut self) {
        self.last_tick = Instant::now();
    }

    /// Measure the time since the previous tick and record it
    pub fn tick(&mut self) -> Duration {
        let now = Instant::now();
        let delta = now.duration_since(self.last_tick);
        self.last_tick = now;
        self.advance(delta);
        delta
    }

    /// Record a tick of a given length without consulting the clock
    pub fn advance(&mut self, delta: Duration) {
        self.delta = delta;
        self.elapsed += delta;
        self.tick_count += 1;
    }

    /// Length of the latest tick
    #[must_use]
    pub fn delta(&self) -> Duration {
        self.delta
    }

    /// Length of the latest tick in milliseconds
    #[must_use]
    pub fn delta_ms(&self) -> f32 {
        self.delta.as_secs_f32() * 1000.0
    }

    /// Simulated time summed over all ticks
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Wall time since construction
    #[must_use]
    pub fn since_startup(&self) -> Duration {
        self.startup.elapsed()
    }

    #[must_use]
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    /// Instantaneous rate implied by the latest delta, 0 before the first tick
    #[must_use]
    pub fn ticks_per_second(&self) -> u32 {
        let ms = self.delta_ms();
        if ms > 0.0 {
            (1000.0 / ms).round() as u32
        } else {
            0
        }
    }
}

impl Default for Time {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_advance() {
        let mut time = Time::new();
        assert_eq!(time.ticks_per_second(), 0);

        time.advance(Duration::from_millis(10));
        time.advance(Duration::from_millis(10));

        assert_eq!(time.tick_count(), 2);
        assert_eq!(time.elapsed(), Duration::from_millis(20));
        assert!((time.delta_ms() - 10.0).abs() < 1e-4);
        assert_eq!(time.ticks_per_second(), 100);
    }

    #[test]
    fn test_measured_tick() {
        let mut time = Time::new();
        std::thread::sleep(Duration::from_millis(2));
        let delta = time.tick();
        assert!(delta >= Duration::from_millis(2));
        assert_eq!(time.delta(), delta);
    }
}
