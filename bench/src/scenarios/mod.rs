//! Seeded universes for benchmarking.
//!
//! # Scenarios
//!
//! - **Rock field**: many inert bodies packed into a disc, so every tick is dominated by the
//!   pairwise interaction pass and plenty of collisions.
//! - **Skirmish**: gunships firing short-lived projectiles into a rock field, exercising spawn
//!   requests, deaths and effects in every normalize.

mod rock_field;
mod skirmish;

pub use rock_field::{RockField, RockFieldConfig};
pub use skirmish::{Skirmish, SkirmishConfig};

use orbit_engine::physics::{LinearMass, MassSpec, NewtonianMass, Vector2d};
use orbit_engine::universe::{Body, Category, Factory, Glyph, SpawnRequest, Universe, Vitals};

/// Common trait for benchmark scenarios.
pub trait Scenario {
    /// Human-readable name of the scenario.
    fn name(&self) -> &'static str;

    /// Number of bodies the scenario starts with.
    fn body_count(&self) -> usize;

    /// The universe under test.
    fn universe(&self) -> &Universe;

    /// Fill the universe and merge its pending set.
    fn setup(&mut self);

    /// Run one tick of the scenario.
    fn update(&mut self) {
        self.universe().simulate_all(DELTA_MS);
    }
}

/// Simulated milliseconds per tick, matching a 150 Hz simulation.
pub const DELTA_MS: f64 = 1000.0 / 150.0;

/// Builds the short-lived bodies the scenarios spawn.
#[derive(Debug, Default, Clone, Copy)]
pub struct Debris;

impl Factory for Debris {
    fn effect(&self, position: Vector2d, velocity: Vector2d) -> Option<Body> {
        let mass = NewtonianMass::new(
            MassSpec::new(100.0, 10.0)
                .with_moment(200.0)
                .with_position(position)
                .with_velocity(velocity),
        )
        .ok()?;
        Some(Body::new(Category::Effect, mass, Glyph('*'), Vitals::new(100.0, 50)))
    }

    fn build(&self, request: &SpawnRequest) -> Option<Body> {
        match request.kind {
            Category::Projectile => {
                let mass = LinearMass::new(
                    MassSpec::new(30.0, 5.0)
                        .with_moment(60.0)
                        .with_position(request.position)
                        .with_velocity(request.velocity),
                )
                .ok()?;
                Some(Body::new(Category::Projectile, mass, Glyph('|'), Vitals::new(2.0, 200)))
            }
            _ => None,
        }
    }
}
