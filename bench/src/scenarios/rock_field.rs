use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use orbit_engine::physics::{MassError, MassSpec, NewtonianMass, Vector2d};
use orbit_engine::universe::{Body, Category, Glyph, Universe, Vitals};

use super::{Debris, Scenario};

/// Configuration for the rock field.
#[derive(Debug, Clone)]
pub struct RockFieldConfig {
    pub rock_count: usize,
    /// Radius of the disc the rocks start in.
    pub spread: f64,
    /// Random seed for reproducibility.
    pub seed: u64,
}

impl Default for RockFieldConfig {
    fn default() -> Self {
        Self {
            rock_count: 100,
            spread: 1000.0,
            seed: 12345,
        }
    }
}

/// Immortal rocks of assorted sizes drifting in a disc.
pub struct RockField {
    config: RockFieldConfig,
    universe: Universe,
}

impl RockField {
    pub fn new() -> Self {
        Self::with_config(RockFieldConfig::default())
    }

    pub fn with_config(config: RockFieldConfig) -> Self {
        Self {
            config,
            universe: Universe::new(Debris),
        }
    }
}

impl Default for RockField {
    fn default() -> Self {
        Self::new()
    }
}

/// A random rock somewhere inside a disc of `spread` around the origin.
pub(crate) fn random_rock(rng: &mut ChaCha8Rng, spread: f64) -> Result<Body, MassError> {
    let direction = Vector2d::from_angle(rng.gen_range(0.0..360.0));
    let position = direction * (spread * rng.gen_range(0.0f64..1.0).sqrt());
    let velocity = Vector2d::new(rng.gen_range(-0.3..0.3), rng.gen_range(-0.3..0.3));
    let radius = rng.gen_range(5.0..35.0);
    let mass = NewtonianMass::new(
        MassSpec::new(radius * radius * 2.5, radius)
            .with_position(position)
            .with_velocity(velocity)
            .with_rotation(rng.gen_range(-0.5..0.5)),
    )?;
    Ok(Body::new(Category::Inert, mass, Glyph('o'), Vitals::immortal()))
}

impl Scenario for RockField {
    fn name(&self) -> &'static str {
        "rock_field"
    }

    fn body_count(&self) -> usize {
        self.config.rock_count
    }

    fn universe(&self) -> &Universe {
        &self.universe
    }

    fn setup(&mut self) {
        let mut rng = ChaCha8Rng::seed_from_u64(self.config.seed);
        for _ in 0..self.config.rock_count {
            if let Ok(rock) = random_rock(&mut rng, self.config.spread) {
                self.universe.add(rock);
            }
        }
        self.universe.normalize_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use orbit_engine::physics::Mass;

    #[test]
    fn setup_is_reproducible() {
        let positions = |seed| {
            let mut field = RockField::with_config(RockFieldConfig {
                rock_count: 10,
                seed,
                ..Default::default()
            });
            field.setup();
            field
                .universe()
                .bodies()
                .iter()
                .map(|body| body.lock().position())
                .collect::<Vec<_>>()
        };

        assert_eq!(positions(7), positions(7));
        assert_ne!(positions(7), positions(8));
    }

    #[test]
    fn rocks_stay_alive() {
        let mut field = RockField::with_config(RockFieldConfig {
            rock_count: 30,
            spread: 100.0,
            ..Default::default()
        });
        field.setup();
        assert_eq!(field.universe().len(), 30);

        for _ in 0..20 {
            field.update();
        }

        assert_eq!(field.universe().len(), 30);
        assert_eq!(field.universe().ticks(), 20);
    }
}
