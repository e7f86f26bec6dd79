use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use orbit_engine::physics::{Mass, MassSpec, NewtonianMass, Vector2d};
use orbit_engine::universe::{
    Body, Category, Glyph, Pilot, SpawnQueue, SpawnRequest, Universe, Vitals,
};

use super::rock_field::random_rock;
use super::{Debris, Scenario};

/// Configuration for the skirmish.
#[derive(Debug, Clone)]
pub struct SkirmishConfig {
    pub gunship_count: usize,
    pub rock_count: usize,
    /// Ticks between two shots of a gunship.
    pub fire_every: u64,
    /// Random seed for reproducibility.
    pub seed: u64,
}

impl Default for SkirmishConfig {
    fn default() -> Self {
        Self {
            gunship_count: 8,
            rock_count: 60,
            fire_every: 30,
            seed: 99999,
        }
    }
}

/// Spins in place and fires along its heading.
#[derive(Debug, Clone)]
struct Turret {
    ticks: u64,
    fire_every: u64,
}

impl Pilot for Turret {
    fn steer(&mut self, mass: &mut dyn Mass, spawns: &mut SpawnQueue) {
        self.ticks += 1;
        mass.torque(1.0);
        if self.ticks % self.fire_every == 0 {
            let forward = Vector2d::from_angle(mass.angle());
            spawns.request(SpawnRequest {
                kind: Category::Projectile,
                position: mass.position() + forward * (mass.radius() + 6.0),
                velocity: mass.velocity() + forward * 0.8,
            });
        }
    }
}

/// Gunships on a ring, shooting into a rock field in their middle.
pub struct Skirmish {
    config: SkirmishConfig,
    universe: Universe,
}

impl Skirmish {
    pub fn new() -> Self {
        Self::with_config(SkirmishConfig::default())
    }

    pub fn with_config(config: SkirmishConfig) -> Self {
        Self {
            config,
            universe: Universe::new(Debris),
        }
    }

    fn gunship(&self, index: usize) -> Option<Body> {
        let bearing = 360.0 * index as f64 / self.config.gunship_count.max(1) as f64;
        let mass = NewtonianMass::new(
            MassSpec::new(100.0, 12.0)
                .with_moment(2000.0)
                .with_position(Vector2d::from_angle(bearing) * 800.0)
                .with_angle(bearing + 180.0),
        )
        .ok()?;
        let turret = Turret {
            ticks: index as u64,
            fire_every: self.config.fire_every.max(1),
        };
        let vitals = Vitals::new(10_000.0, 0);
        Some(Body::new(Category::Player, mass, Glyph('A'), vitals).with_pilot(turret))
    }
}

impl Default for Skirmish {
    fn default() -> Self {
        Self::new()
    }
}

impl Scenario for Skirmish {
    fn name(&self) -> &'static str {
        "skirmish"
    }

    fn body_count(&self) -> usize {
        self.config.gunship_count + self.config.rock_count
    }

    fn universe(&self) -> &Universe {
        &self.universe
    }

    fn setup(&mut self) {
        let mut rng = ChaCha8Rng::seed_from_u64(self.config.seed);
        for index in 0..self.config.gunship_count {
            if let Some(gunship) = self.gunship(index) {
                self.universe.add(gunship);
            }
        }
        for _ in 0..self.config.rock_count {
            if let Ok(rock) = random_rock(&mut rng, 500.0) {
                self.universe.add(rock);
            }
        }
        self.universe.normalize_all();
    }
}
