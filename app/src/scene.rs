//! The demo scene: a handful of rocks, an alien and an autopiloted ship.

use std::sync::Arc;

use log::{info, warn};
use orbit_engine::core::{Frame, Logic};
use orbit_engine::physics::{Mass, MassError, Vector2d};
use orbit_engine::universe::{Body, Universe};

use crate::arsenal;
use crate::terminal::Origin;

/// Golden angle in degrees, for spreading extra rocks evenly around the ship.
const SPREAD_ANGLE: f64 = 137.5;

/// Bodies every run starts with.
fn opening() -> Result<Vec<Body>, MassError> {
    Ok(vec![
        arsenal::rock(Vector2d::new(-400.0, 100.0), Vector2d::new(-0.2, 0.1))?,
        arsenal::rock(Vector2d::new(0.0, 500.0), Vector2d::new(0.05, 0.0))?,
        arsenal::rock(Vector2d::new(250.0, 40.0), Vector2d::new(-0.3, -0.2))?,
        arsenal::big_rock(Vector2d::new(250.0, 10.0), Vector2d::new(0.0, 0.3))?,
        arsenal::rock(Vector2d::new(-300.0, -100.0), Vector2d::new(0.02, -0.02))?,
        arsenal::rock(Vector2d::new(-50.0, -200.0), Vector2d::new(0.2, -0.05))?,
        arsenal::alien(Vector2d::new(100.0, 150.0), Vector2d::new(-0.3, 0.0))?,
    ])
}

/// Extra rocks on a widening spiral around the origin.
fn extra_rocks(count: usize) -> Result<Vec<Body>, MassError> {
    (0..count)
        .map(|i| {
            let direction = Vector2d::from_angle(i as f64 * SPREAD_ANGLE);
            let distance = 700.0 + 60.0 * i as f64;
            // Drift sideways so the rocks orbit rather than fall straight in.
            arsenal::rock(direction * distance, direction.rotated_by(90.0) * 0.1)
        })
        .collect()
}

/// Populates the universe and keeps the camera on the ship.
pub struct Scene {
    extra_rocks: usize,
    ship: Option<Arc<Body>>,
    origin: Origin,
}

impl Scene {
    pub fn new(extra_rocks: usize, origin: Origin) -> Self {
        Self {
            extra_rocks,
            ship: None,
            origin,
        }
    }

    fn populate(&mut self, universe: &Universe) -> Result<(), MassError> {
        let bodies = opening()?
            .into_iter()
            .chain(extra_rocks(self.extra_rocks)?);
        for body in bodies {
            universe.add(body);
        }
        self.ship = Some(universe.add(arsenal::ship(Vector2d::ZERO, Vector2d::ZERO)?));
        Ok(())
    }
}

impl Logic for Scene {
    fn on_start(&mut self, universe: &Universe) {
        match self.populate(universe) {
            Ok(()) => info!("scene ready with {} bodies", universe.pending_len()),
            Err(error) => warn!("scene only partly populated: {error}"),
        }
    }

    fn on_fixed_update(&mut self, _frame: Frame<'_>) {
        let Some(ship) = &self.ship else {
            return;
        };
        let (position, dead) = {
            let state = ship.lock();
            (state.position(), state.is_dead())
        };
        *self.origin.lock() = position;
        if dead {
            info!("ship {} destroyed", ship.id());
            self.ship = None;
        }
    }
}
