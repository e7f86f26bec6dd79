//! Rigid 2D body physics: the vector type, the mass integrators and the pairwise interactions.

mod interaction;
mod mass;
mod vector;

pub use interaction::{COLLISION_PADDING, G, GRAVITY_CLAMP_RADII, collision, gravitate};
pub use mass::{
    FrictionMass, LinearMass, MIN_TORQUE_OFFSET, Mass, MassError, MassSpec, NewtonianMass,
    disc_moment,
};
pub use vector::Vector2d;
