//! Per-tick timing of a scenario run.
//!
//! Criterion reports a single figure per benchmark. A scenario changes shape while it runs
//! (projectiles appear, rocks die, effects fade), so this records every tick together with
//! the number of bodies it had to deal with.

use std::fmt;
use std::time::{Duration, Instant};

use crate::scenarios::Scenario;

/// One measured tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickSample {
    pub duration: Duration,
    /// Active bodies once the tick finished.
    pub bodies: usize,
}

/// Summary of a run of ticks.
#[derive(Debug, Clone, Default)]
pub struct TickStats {
    samples: Vec<TickSample>,
}

impl TickStats {
    pub fn from_samples(samples: Vec<TickSample>) -> Self {
        Self { samples }
    }

    pub fn tick_count(&self) -> usize {
        self.samples.len()
    }

    pub fn samples(&self) -> &[TickSample] {
        &self.samples
    }

    pub fn total(&self) -> Duration {
        self.samples.iter().map(|sample| sample.duration).sum()
    }

    pub fn average(&self) -> Duration {
        match u32::try_from(self.samples.len()) {
            Ok(0) | Err(_) => Duration::ZERO,
            Ok(count) => self.total() / count,
        }
    }

    pub fn slowest(&self) -> Duration {
        self.samples
            .iter()
            .map(|sample| sample.duration)
            .max()
            .unwrap_or(Duration::ZERO)
    }

    /// Duration under which `p` percent of the ticks finished.
    pub fn percentile(&self, p: usize) -> Duration {
        let mut durations: Vec<_> = self.samples.iter().map(|sample| sample.duration).collect();
        if durations.is_empty() {
            return Duration::ZERO;
        }
        durations.sort();
        let index = (durations.len() * p.min(100) / 100).min(durations.len() - 1);
        durations[index]
    }

    pub fn peak_bodies(&self) -> usize {
        self.samples.iter().map(|sample| sample.bodies).max().unwrap_or(0)
    }

    /// Average time spent per body, over all ticks.
    pub fn per_body(&self) -> Duration {
        let body_ticks: u128 = self.samples.iter().map(|sample| sample.bodies as u128).sum();
        if body_ticks == 0 {
            return Duration::ZERO;
        }
        Duration::from_nanos((self.total().as_nanos() / body_ticks) as u64)
    }

    /// Whether the run could keep up with a simulation ticking `steps_per_second` times.
    pub fn keeps_up_with(&self, steps_per_second: u32) -> bool {
        let budget = Duration::from_secs(1) / steps_per_second.max(1);
        self.percentile(95) <= budget
    }
}

impl fmt::Display for TickStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ticks, avg: {:.3}ms, p95: {:.3}ms, slowest: {:.3}ms, peak bodies: {}",
            self.tick_count(),
            self.average().as_secs_f64() * 1000.0,
            self.percentile(95).as_secs_f64() * 1000.0,
            self.slowest().as_secs_f64() * 1000.0,
            self.peak_bodies(),
        )
    }
}

/// Runs `ticks` ticks of an already set up scenario, timing each.
pub fn measure_ticks<S: Scenario + ?Sized>(scenario: &mut S, ticks: usize) -> TickStats {
    let mut samples = Vec::with_capacity(ticks);
    for _ in 0..ticks {
        let start = Instant::now();
        scenario.update();
        let duration = start.elapsed();
        samples.push(TickSample {
            duration,
            bodies: scenario.universe().len(),
        });
    }
    TickStats::from_samples(samples)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scenarios::{RockField, RockFieldConfig};

    fn sample(millis: u64, bodies: usize) -> TickSample {
        TickSample {
            duration: Duration::from_millis(millis),
            bodies,
        }
    }

    #[test]
    fn stats_summarize_samples() {
        let stats = TickStats::from_samples(vec![
            sample(2, 10),
            sample(4, 12),
            sample(3, 11),
            sample(7, 7),
        ]);

        assert_eq!(stats.tick_count(), 4);
        assert_eq!(stats.total(), Duration::from_millis(16));
        assert_eq!(stats.average(), Duration::from_millis(4));
        assert_eq!(stats.slowest(), Duration::from_millis(7));
        assert_eq!(stats.percentile(50), Duration::from_millis(4));
        assert_eq!(stats.peak_bodies(), 12);
        assert_eq!(stats.per_body(), Duration::from_micros(400));
    }

    #[test]
    fn empty_stats_are_zero() {
        let stats = TickStats::default();

        assert_eq!(stats.average(), Duration::ZERO);
        assert_eq!(stats.percentile(99), Duration::ZERO);
        assert_eq!(stats.per_body(), Duration::ZERO);
        assert!(stats.keeps_up_with(150));
    }

    #[test]
    fn slow_ticks_do_not_keep_up() {
        let stats = TickStats::from_samples(vec![sample(10, 1); 20]);

        assert!(stats.keeps_up_with(60));
        assert!(!stats.keeps_up_with(150));
    }

    #[test]
    fn measures_every_tick_of_a_scenario() {
        // Given
        let mut field = RockField::with_config(RockFieldConfig {
            rock_count: 5,
            ..Default::default()
        });
        field.setup();

        // When
        let stats = measure_ticks(&mut field, 8);

        // Then
        assert_eq!(stats.tick_count(), 8);
        assert_eq!(stats.peak_bodies(), 5);
        assert_eq!(field.universe().ticks(), 8);
    }
}
