//! Heap profiling with dhat.
//!
//! Profiling adds overhead, so it sits behind the `memory_profiling` feature:
//!
//! ```bash
//! cargo bench -p orbit_bench --features memory_profiling
//! ```
//!
//! Open the written `dhat-heap.json` in <https://nnethercote.github.io/dh_view/dh_view.html>.
//! Without the feature every measurement comes back empty.

use std::fmt;

use crate::scenarios::Scenario;

/// Heap usage over one measurement.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MemoryStats {
    pub bytes_allocated: u64,
    pub allocation_count: u64,
    /// Largest heap size seen while measuring.
    pub peak_bytes: u64,
}

impl MemoryStats {
    pub fn bytes_per_body(&self, bodies: usize) -> f64 {
        if bodies == 0 {
            0.0
        } else {
            self.bytes_allocated as f64 / bodies as f64
        }
    }

    pub fn allocations_per_body(&self, bodies: usize) -> f64 {
        if bodies == 0 {
            0.0
        } else {
            self.allocation_count as f64 / bodies as f64
        }
    }
}

impl fmt::Display for MemoryStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "allocated: {} bytes ({} allocs), peak: {} bytes",
            self.bytes_allocated, self.allocation_count, self.peak_bytes
        )
    }
}

/// Records allocations from `start` until `finish`. Only one may be alive at a time.
#[cfg(feature = "memory_profiling")]
pub struct MemoryProfiler {
    _profiler: dhat::Profiler,
}

#[cfg(feature = "memory_profiling")]
impl MemoryProfiler {
    pub fn start() -> Self {
        Self {
            _profiler: dhat::Profiler::new_heap(),
        }
    }

    /// Also writes `dhat-heap.json` once the profiler drops.
    pub fn finish(self) -> MemoryStats {
        let stats = dhat::HeapStats::get();
        MemoryStats {
            bytes_allocated: stats.total_bytes,
            allocation_count: stats.total_blocks,
            peak_bytes: stats.max_bytes as u64,
        }
    }
}

#[cfg(not(feature = "memory_profiling"))]
pub struct MemoryProfiler;

#[cfg(not(feature = "memory_profiling"))]
impl MemoryProfiler {
    pub fn start() -> Self {
        Self
    }

    pub fn finish(self) -> MemoryStats {
        MemoryStats::default()
    }
}

/// Heap usage of setting a scenario up, i.e. of building and merging its bodies.
pub fn measure_setup<S: Scenario + ?Sized>(scenario: &mut S) -> MemoryStats {
    let profiler = MemoryProfiler::start();
    scenario.setup();
    profiler.finish()
}

/// Heap usage of running `ticks` ticks of an already set up scenario.
pub fn measure_ticks<S: Scenario + ?Sized>(scenario: &mut S, ticks: usize) -> MemoryStats {
    let profiler = MemoryProfiler::start();
    for _ in 0..ticks {
        scenario.update();
    }
    profiler.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_lists_every_figure() {
        let stats = MemoryStats {
            bytes_allocated: 2048,
            allocation_count: 16,
            peak_bytes: 1024,
        };

        let display = stats.to_string();

        assert!(display.contains("2048 bytes"));
        assert!(display.contains("16 allocs"));
        assert!(display.contains("peak: 1024"));
    }

    #[test]
    fn per_body_figures() {
        let stats = MemoryStats {
            bytes_allocated: 6400,
            allocation_count: 200,
            peak_bytes: 3000,
        };

        assert_eq!(stats.bytes_per_body(64), 100.0);
        assert_eq!(stats.allocations_per_body(100), 2.0);
        assert_eq!(stats.bytes_per_body(0), 0.0);
    }

    #[cfg(not(feature = "memory_profiling"))]
    #[test]
    fn measurements_are_empty_without_profiling() {
        use crate::scenarios::RockField;

        let mut field = RockField::new();
        let stats = measure_setup(&mut field);

        assert_eq!(stats, MemoryStats::default());
        assert_eq!(field.universe().len(), field.body_count());
    }
}
