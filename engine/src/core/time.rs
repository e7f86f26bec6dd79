use std::thread;
use std::time::{Duration, Instant};

/// A frame clock. Each `Time` captures the delta since the previous one along with the total
/// elapsed time and the number of frames so far. New values are generated from the previous
/// one using [`Time::next`], generally once per iteration of a loop.
#[derive(Debug, Copy, Clone)]
pub struct Time {
    // The instant this frame was created
    instant: Instant,
    /// The time delta since the last frame
    pub delta: Duration,
    /// The total elapsed time since the first frame
    pub total: Duration,
    /// The number of frames since the first one
    pub ticks: u64,
}

impl Time {
    pub fn new() -> Self {
        Self {
            instant: Instant::now(),
            delta: Duration::ZERO,
            total: Duration::ZERO,
            ticks: 0,
        }
    }

    /// Create the next frame, capturing the delta since this one.
    pub fn next(self) -> Self {
        let delta = self.instant.elapsed();
        Self {
            instant: Instant::now(),
            delta,
            total: self.total + delta,
            ticks: self.ticks + 1,
        }
    }

    /// The delta in milliseconds, never less than `min_ms`.
    pub fn delta_ms(&self, min_ms: f64) -> f64 {
        (self.delta.as_secs_f64() * 1000.0).max(min_ms)
    }
}

impl Default for Time {
    fn default() -> Self {
        Self::new()
    }
}

/// Paces a loop to a fixed rate by sleeping until the next deadline.
///
/// A loop that falls behind is not allowed to catch up with a burst of iterations: the
/// schedule restarts from the moment the lateness is noticed.
#[derive(Debug)]
pub struct RateLimiter {
    period: Duration,
    deadline: Instant,
}

impl RateLimiter {
    /// A limiter allowing `per_second` iterations per second. Zero is treated as one.
    pub fn new(per_second: u32) -> Self {
        let period = Duration::from_secs(1) / per_second.max(1);
        Self {
            period,
            deadline: Instant::now() + period,
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// Block until the next deadline. Returns how long it slept.
    pub fn wait(&mut self) -> Duration {
        let now = Instant::now();
        match self.deadline.checked_duration_since(now) {
            Some(remaining) => {
                thread::sleep(remaining);
                self.deadline += self.period;
                remaining
            }
            None => {
                self.deadline = now + self.period;
                Duration::ZERO
            }
        }
    }
}
