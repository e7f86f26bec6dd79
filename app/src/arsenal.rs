//! Everything that can appear in the demo, with its physical parameters.

use orbit_engine::physics::{
    FrictionMass, LinearMass, MassError, MassSpec, NewtonianMass, Vector2d,
};
use orbit_engine::universe::{
    Animation, Body, Canvas, Category, Factory, Glyph, SpawnRequest, Sprite, Vitals,
};

use crate::pilot::Autopilot;

/// Mass, moment and radius of a kind of body.
#[derive(Debug, Clone, Copy)]
struct Build {
    mass: f64,
    moment: f64,
    radius: f64,
    rotation: f64,
    hit_points: f64,
    lifetime: u64,
}

impl Build {
    fn spec(&self, position: Vector2d, velocity: Vector2d) -> MassSpec {
        MassSpec::new(self.mass, self.radius)
            .with_moment(self.moment)
            .with_position(position)
            .with_velocity(velocity)
            .with_rotation(self.rotation)
    }

    fn vitals(&self) -> Vitals {
        Vitals::new(self.hit_points, self.lifetime)
    }
}

const ROCK: Build = Build {
    mass: 1000.0,
    moment: 2000.0,
    radius: 20.0,
    rotation: 0.1,
    hit_points: 5000.0,
    lifetime: 0,
};

const BIG_ROCK: Build = Build {
    mass: 5000.0,
    moment: 10000.0,
    radius: 35.0,
    rotation: 0.1,
    hit_points: 15000.0,
    lifetime: 0,
};

const ALIEN: Build = Build {
    mass: 100.0,
    moment: 200.0,
    radius: 12.0,
    rotation: 0.0,
    hit_points: 200.0,
    lifetime: 0,
};

const EXPLOSION: Build = Build {
    mass: 100.0,
    moment: 200.0,
    radius: 10.0,
    rotation: 0.1,
    hit_points: 100.0,
    lifetime: 50,
};

const SHIP: Build = Build {
    mass: 100.0,
    moment: 2000.0,
    radius: 12.0,
    rotation: 0.0,
    hit_points: 10000.0,
    lifetime: 0,
};

const SHIP_VELOCITY_FRICTION: f64 = 0.0002;
const SHIP_TURN_FRICTION: f64 = 0.002;

const MISSILE: Build = Build {
    mass: 30.0,
    moment: 60.0,
    radius: 5.0,
    rotation: 0.0,
    hit_points: 2.0,
    lifetime: 500,
};

/// A sprite pointing the way the body faces.
#[derive(Debug, Clone, Copy, Default)]
pub struct Arrow;

impl Sprite for Arrow {
    fn draw(&mut self, canvas: &mut dyn Canvas, position: Vector2d, angle: f64) {
        let glyph = match ((angle + 45.0).rem_euclid(360.0) / 90.0) as u32 {
            0 => '^',
            1 => '>',
            2 => 'v',
            _ => '<',
        };
        canvas.stamp(position, angle, glyph);
    }
}

pub fn rock(position: Vector2d, velocity: Vector2d) -> Result<Body, MassError> {
    Ok(Body::new(
        Category::Inert,
        NewtonianMass::new(ROCK.spec(position, velocity))?,
        Glyph('o'),
        ROCK.vitals(),
    ))
}

pub fn big_rock(position: Vector2d, velocity: Vector2d) -> Result<Body, MassError> {
    Ok(Body::new(
        Category::Inert,
        NewtonianMass::new(BIG_ROCK.spec(position, velocity))?,
        Glyph('O'),
        BIG_ROCK.vitals(),
    ))
}

pub fn alien(position: Vector2d, velocity: Vector2d) -> Result<Body, MassError> {
    Ok(Body::new(
        Category::Hostile,
        NewtonianMass::new(ALIEN.spec(position, velocity))?,
        Animation::new(['%', '&', '@', '&'], 5),
        ALIEN.vitals(),
    ))
}

pub fn explosion(position: Vector2d, velocity: Vector2d) -> Result<Body, MassError> {
    Ok(Body::new(
        Category::Effect,
        NewtonianMass::new(EXPLOSION.spec(position, velocity))?,
        Animation::new(['.', '+', '*', 'x', 'X', '*', '.'], 2),
        EXPLOSION.vitals(),
    ))
}

pub fn ship(position: Vector2d, velocity: Vector2d) -> Result<Body, MassError> {
    let mass = FrictionMass::new(
        SHIP.spec(position, velocity),
        SHIP_VELOCITY_FRICTION,
        SHIP_TURN_FRICTION,
    )?;
    Ok(Body::new(Category::Player, mass, Arrow, SHIP.vitals()).with_pilot(Autopilot::default()))
}

pub fn missile(position: Vector2d, velocity: Vector2d) -> Result<Body, MassError> {
    Ok(Body::new(
        Category::Projectile,
        LinearMass::new(MISSILE.spec(position, velocity))?,
        Arrow,
        MISSILE.vitals(),
    ))
}

/// Resolves explosions and spawn requests for the demo.
#[derive(Debug, Default)]
pub struct Arsenal;

impl Factory for Arsenal {
    fn effect(&self, position: Vector2d, velocity: Vector2d) -> Option<Body> {
        explosion(position, velocity)
            .inspect_err(|error| log::warn!("no explosion at {position}: {error}"))
            .ok()
    }

    fn build(&self, request: &SpawnRequest) -> Option<Body> {
        let build = match request.kind {
            Category::Projectile => missile,
            Category::Inert => rock,
            Category::Hostile => alien,
            Category::Effect => explosion,
            Category::Player => return None,
        };
        build(request.position, request.velocity)
            .inspect_err(|error| log::warn!("dropping spawn of {:?}: {error}", request.kind))
            .ok()
    }
}
