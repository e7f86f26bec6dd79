//! Pairwise interactions between two masses.
//!
//! Both functions only rely on the [`Mass`] interface and are total over valid mass state.

use super::mass::Mass;

/// The gravitational constant used by [`gravitate`].
pub const G: f64 = 0.001;

/// The distance used by [`gravitate`] never drops below this many radii of the larger body.
/// Keeps bodies from being flung away when they pass close to a large mass.
pub const GRAVITY_CLAMP_RADII: f64 = 3.0;

/// Extra separation added on each side when resolving an overlap.
pub const COLLISION_PADDING: f64 = 1.0;

/// Apply the gravitational attraction between two masses to both of them. The forces are equal
/// and opposite.
pub fn gravitate<A, B>(a: &mut A, b: &mut B)
where
    A: Mass + ?Sized,
    B: Mass + ?Sized,
{
    let between = b.position() - a.position();
    let threshold = GRAVITY_CLAMP_RADII * a.radius().max(b.radius());
    let distance = between.magnitude().max(threshold);

    let magnitude = G * a.mass() * b.mass() / (distance * distance);
    let force = between.unit() * magnitude;
    a.push(force);
    b.push(-force);
}

/// Bounce two overlapping masses off each other.
///
/// This is an elastic collision along the line of centres only: no tangential friction and no
/// angular momentum transfer. The masses are first shoved apart so they no longer overlap, which
/// works for sparse scenes but misbehaves when many bodies are packed together. Does nothing when
/// the bodies do not touch.
pub fn collision<A, B>(a: &mut A, b: &mut B)
where
    A: Mass + ?Sized,
    B: Mass + ?Sized,
{
    let between = b.position() - a.position();
    let overlap = a.radius() + b.radius() - between.magnitude();
    if overlap < 0.0 {
        return;
    }
    let axis = between.unit();

    // Momentum of each body along the axis and the velocity of their centre of mass.
    let p1 = a.velocity().dot(axis) * a.mass();
    let p2 = b.velocity().dot(axis) * b.mass();
    let vc = (p1 + p2) / (a.mass() + b.mass());

    // Reverses `a` relative to the centre of mass.
    let impulse = axis * (2.0 * (p1 - vc * a.mass()));

    let shove = axis * (overlap + COLLISION_PADDING);
    a.translate(-shove);
    b.translate(shove);
    a.hit(-impulse);
    b.hit(impulse);
}
