//! Flies the ship without a keyboard.

use orbit_engine::physics::{Mass, Vector2d};
use orbit_engine::universe::{Category, Pilot, SpawnQueue, SpawnRequest};

pub const ENGINE_THRUST: f64 = 0.1;
pub const ENGINE_REVERSE_THRUST: f64 = 0.03;
pub const TURN_THRUST: f64 = 10.0;

/// How far in front of the hull missiles appear.
const MUZZLE_CLEARANCE: f64 = 6.0;
const MUZZLE_VELOCITY: f64 = 0.8;

/// The control surface of a ship, the way a keyboard would drive it.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Controls {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
    pub fire: bool,
}

impl Controls {
    /// Apply the held controls to `mass`. Firing is a one-shot: it queues one missile.
    pub fn apply(&self, mass: &mut dyn Mass, spawns: &mut SpawnQueue) {
        let forward = Vector2d::from_angle(mass.angle());
        if self.up {
            mass.push(forward * ENGINE_THRUST);
        }
        if self.down {
            mass.push(-forward * ENGINE_REVERSE_THRUST);
        }
        if self.left {
            mass.torque(-TURN_THRUST);
        }
        if self.right {
            mass.torque(TURN_THRUST);
        }
        if self.fire {
            spawns.request(SpawnRequest {
                kind: Category::Projectile,
                position: mass.position() + forward * (mass.radius() + MUZZLE_CLEARANCE),
                velocity: mass.velocity() + forward * MUZZLE_VELOCITY,
            });
        }
    }
}

/// A scripted pilot: cruises at a steady speed, banks now and then and fires at a fixed
/// cadence.
#[derive(Debug, Clone)]
pub struct Autopilot {
    ticks: u64,
    cruise_speed: f64,
    /// Ticks between the starts of two turns.
    turn_every: u64,
    /// How long each turn lasts.
    turn_for: u64,
    fire_every: u64,
}

impl Autopilot {
    pub fn new(cruise_speed: f64, turn_every: u64, turn_for: u64, fire_every: u64) -> Self {
        Self {
            ticks: 0,
            cruise_speed,
            turn_every: turn_every.max(1),
            turn_for,
            fire_every: fire_every.max(1),
        }
    }

    /// What the pilot would press on its next tick, given the ship's state.
    pub fn controls(&self, mass: &dyn Mass) -> Controls {
        let tick = self.ticks + 1;
        let heading = Vector2d::from_angle(mass.angle());
        let speed = mass.velocity().magnitude();
        let going_forward = mass.velocity().dot(heading) >= 0.0;
        let turning = tick % self.turn_every < self.turn_for;
        let settling = mass.rotation().abs() > 1.0;

        Controls {
            up: speed < self.cruise_speed || !going_forward,
            down: speed > 2.0 * self.cruise_speed && going_forward,
            left: settling && mass.rotation() > 0.0,
            right: if settling { mass.rotation() < 0.0 } else { turning },
            fire: tick % self.fire_every == 0,
        }
    }
}

impl Default for Autopilot {
    fn default() -> Self {
        Self::new(0.25, 450, 20, 120)
    }
}

impl Pilot for Autopilot {
    fn steer(&mut self, mass: &mut dyn Mass, spawns: &mut SpawnQueue) {
        let controls = self.controls(mass);
        self.ticks += 1;
        controls.apply(mass, spawns);
    }
}
