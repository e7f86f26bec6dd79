//! Benchmarks for the orbit engine.
//!
//! - **Microbenchmarks**: the interaction, normalize and draw passes of a [`Universe`] at
//!   several body counts, and the lock types from `orbit_engine::sync`.
//! - **Scenarios**: seeded universes ([`scenarios::RockField`], [`scenarios::Skirmish`]) that
//!   run whole ticks.
//! - **Tick timing**: per-tick durations and body counts over a scenario run.
//! - **Memory tracking**: heap allocation profiling via dhat.
//!
//! # Running Benchmarks
//!
//! ```bash
//! cargo bench -p orbit_bench
//!
//! # One group only
//! cargo bench -p orbit_bench -- interact_all
//!
//! # With memory profiling (slower)
//! cargo bench -p orbit_bench --features memory_profiling
//! ```
//!
//! Results land in `target/criterion/`. Memory profiles are written to `dhat-heap.json`.
//!
//! [`Universe`]: orbit_engine::universe::Universe

pub mod memory;
pub mod scenarios;
pub mod tick_timer;
