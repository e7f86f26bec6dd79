//! A small concurrent 2D rigid-body engine.
//!
//! - [`physics`]: vectors, masses with an explicit Euler integrator, gravity and collisions.
//! - [`sync`]: a counting semaphore and the scoped locks built on it.
//! - [`universe`]: the bodies taking part in a simulation and the per-tick pipeline over them.
//! - [`core`]: the two-thread runtime driving a universe.

pub mod core;
pub mod physics;
pub mod sync;
pub mod universe;
