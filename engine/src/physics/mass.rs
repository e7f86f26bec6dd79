//! Physical state and the explicit Euler integrator.
//!
//! A [`Mass`] accumulates forces (`push`, `torque`) and impulses (`hit`, `twist`) between
//! steps. Calling [`Mass::step`] consumes every accumulator exactly once and resets them, so
//! forces never persist across ticks and must be re-applied each tick.
//!
//! Forces are proportional to the step's `delta_time`; impulses are instantaneous. Velocity is
//! expressed in distance per tick, so `step` advances the position by the whole velocity.
//!
//! Three implementations are provided:
//! - [`NewtonianMass`]: the plain integrator.
//! - [`FrictionMass`]: drag on both velocity and rotation, scaled by speed, delta time and
//!   mass/moment.
//! - [`LinearMass`]: always reports its angle as the heading of its velocity.

use std::fmt;

use super::vector::Vector2d;

/// Offsets at or below this magnitude are treated as hitting the centre of mass.
pub const MIN_TORQUE_OFFSET: f64 = 0.0001;

/// The moment of inertia of a solid disc, `(2/5) * mass * radius²`.
#[inline]
pub fn disc_moment(mass: f64, radius: f64) -> f64 {
    (2.0 / 5.0) * mass * radius * radius
}

/// The capability of being moved by forces and impulses.
pub trait Mass: Send {
    /// Accumulate a force applied over the next step.
    fn push(&mut self, force: Vector2d);

    /// Accumulate an instantaneous impulse.
    fn hit(&mut self, impulse: Vector2d);

    /// Accumulate a torque applied over the next step.
    fn torque(&mut self, torque: f64);

    /// Accumulate an instantaneous change of angular momentum.
    fn twist(&mut self, sudden_torque: f64);

    /// Consume the accumulators and advance the state by `delta_time`.
    fn step(&mut self, delta_time: f64);

    /// Move the mass directly, bypassing the integrator.
    fn translate(&mut self, delta: Vector2d);

    fn mass(&self) -> f64;
    fn position(&self) -> Vector2d;
    fn velocity(&self) -> Vector2d;
    fn angle(&self) -> f64;
    /// Angular rate in degrees per tick.
    fn rotation(&self) -> f64;
    fn radius(&self) -> f64;

    fn moment(&self) -> f64 {
        disc_moment(self.mass(), self.radius())
    }

    /// Push at an offset from the centre of mass, producing a torque as well.
    fn push_at(&mut self, force: Vector2d, offset: Vector2d) {
        self.push(force);
        if offset.magnitude() > MIN_TORQUE_OFFSET {
            self.torque(force.cross(offset));
        }
    }

    /// Hit at an offset from the centre of mass, producing a sudden torque as well.
    fn hit_at(&mut self, impulse: Vector2d, offset: Vector2d) {
        self.hit(impulse);
        if offset.magnitude() > MIN_TORQUE_OFFSET {
            self.twist(impulse.cross(offset));
        }
    }
}

/// Rejected mass configurations. A zero mass or moment would turn every step into a division
/// by zero, so those are refused up front.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MassError {
    NonPositiveMass(f64),
    NonPositiveMoment(f64),
    NegativeRadius(f64),
    /// A position, velocity, angle or rotation was NaN or infinite.
    NonFinite,
}

impl fmt::Display for MassError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MassError::NonPositiveMass(mass) => write!(f, "mass must be positive, got {mass}"),
            MassError::NonPositiveMoment(moment) => {
                write!(f, "moment of inertia must be positive, got {moment}")
            }
            MassError::NegativeRadius(radius) => {
                write!(f, "radius must not be negative, got {radius}")
            }
            MassError::NonFinite => write!(f, "initial state must be finite"),
        }
    }
}

impl std::error::Error for MassError {}

/// Initial parameters for a mass. Built up with the `with_*` methods and validated when a
/// concrete mass is constructed from it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MassSpec {
    pub mass: f64,
    pub radius: f64,
    /// Defaults to [`disc_moment`] when not given.
    pub moment: Option<f64>,
    pub position: Vector2d,
    pub velocity: Vector2d,
    pub angle: f64,
    pub rotation: f64,
}

impl MassSpec {
    pub fn new(mass: f64, radius: f64) -> Self {
        Self {
            mass,
            radius,
            moment: None,
            position: Vector2d::ZERO,
            velocity: Vector2d::ZERO,
            angle: 0.0,
            rotation: 0.0,
        }
    }

    pub fn with_moment(mut self, moment: f64) -> Self {
        self.moment = Some(moment);
        self
    }

    pub fn with_position(mut self, position: Vector2d) -> Self {
        self.position = position;
        self
    }

    pub fn with_velocity(mut self, velocity: Vector2d) -> Self {
        self.velocity = velocity;
        self
    }

    pub fn with_angle(mut self, angle: f64) -> Self {
        self.angle = angle;
        self
    }

    pub fn with_rotation(mut self, rotation: f64) -> Self {
        self.rotation = rotation;
        self
    }

    fn validate(&self) -> Result<f64, MassError> {
        if !(self.mass > 0.0) || !self.mass.is_finite() {
            return Err(MassError::NonPositiveMass(self.mass));
        }
        if !(self.radius >= 0.0) || !self.radius.is_finite() {
            return Err(MassError::NegativeRadius(self.radius));
        }
        let moment = self.moment.unwrap_or_else(|| disc_moment(self.mass, self.radius));
        if !(moment > 0.0) || !moment.is_finite() {
            return Err(MassError::NonPositiveMoment(moment));
        }
        if !self.position.is_finite()
            || !self.velocity.is_finite()
            || !self.angle.is_finite()
            || !self.rotation.is_finite()
        {
            return Err(MassError::NonFinite);
        }
        Ok(moment)
    }
}

/// The plain integrator. Field names follow the usual physics notation.
#[derive(Debug, Clone, PartialEq)]
pub struct NewtonianMass {
    /// mass
    m: f64,
    /// moment of inertia
    i: f64,
    r: f64,
    p: Vector2d,
    v: Vector2d,
    /// angle in degrees
    a: f64,
    /// omega, the angular rate
    o: f64,
    force_sum: Vector2d,
    impulse_sum: Vector2d,
    torque_sum: f64,
    sudden_torque_sum: f64,
}

impl NewtonianMass {
    pub fn new(spec: MassSpec) -> Result<Self, MassError> {
        let moment = spec.validate()?;
        Ok(Self {
            m: spec.mass,
            i: moment,
            r: spec.radius,
            p: spec.position,
            v: spec.velocity,
            a: spec.angle,
            o: spec.rotation,
            force_sum: Vector2d::ZERO,
            impulse_sum: Vector2d::ZERO,
            torque_sum: 0.0,
            sudden_torque_sum: 0.0,
        })
    }

    /// Everything that will change the linear momentum during a step of `delta_time`.
    #[inline]
    pub fn total_force(&self, delta_time: f64) -> Vector2d {
        self.force_sum * delta_time + self.impulse_sum
    }

    /// Everything that will change the angular momentum during a step of `delta_time`.
    #[inline]
    pub fn total_torque(&self, delta_time: f64) -> f64 {
        self.torque_sum * delta_time + self.sudden_torque_sum
    }

    /// Apply the given totals, then clear the accumulators and wrap the angles.
    fn integrate(&mut self, total_force: Vector2d, total_torque: f64) {
        self.v += total_force / self.m;
        self.p += self.v;
        self.o += total_torque / self.i;
        self.a += self.o;
        self.reset();
        self.a %= 360.0;
        self.o %= 360.0;
    }

    fn reset(&mut self) {
        self.force_sum = Vector2d::ZERO;
        self.impulse_sum = Vector2d::ZERO;
        self.torque_sum = 0.0;
        self.sudden_torque_sum = 0.0;
    }
}

impl Mass for NewtonianMass {
    fn push(&mut self, force: Vector2d) {
        self.force_sum += force;
    }

    fn hit(&mut self, impulse: Vector2d) {
        self.impulse_sum += impulse;
    }

    fn torque(&mut self, torque: f64) {
        self.torque_sum += torque;
    }

    fn twist(&mut self, sudden_torque: f64) {
        self.sudden_torque_sum += sudden_torque;
    }

    fn step(&mut self, delta_time: f64) {
        let force = self.total_force(delta_time);
        let torque = self.total_torque(delta_time);
        self.integrate(force, torque);
    }

    fn translate(&mut self, delta: Vector2d) {
        self.p += delta;
    }

    fn mass(&self) -> f64 {
        self.m
    }

    fn moment(&self) -> f64 {
        self.i
    }

    fn position(&self) -> Vector2d {
        self.p
    }

    fn velocity(&self) -> Vector2d {
        self.v
    }

    fn angle(&self) -> f64 {
        self.a
    }

    fn rotation(&self) -> f64 {
        self.o
    }

    fn radius(&self) -> f64 {
        self.r
    }
}

/// A mass with drag on both its velocity and its rotation. Makes a piloted body much easier to
/// control than a frictionless one.
#[derive(Debug, Clone, PartialEq)]
pub struct FrictionMass {
    inner: NewtonianMass,
    velocity_friction: f64,
    turn_friction: f64,
}

impl FrictionMass {
    pub fn new(spec: MassSpec, velocity_friction: f64, turn_friction: f64) -> Result<Self, MassError> {
        Ok(Self {
            inner: NewtonianMass::new(spec)?,
            velocity_friction,
            turn_friction,
        })
    }

    pub fn total_force(&self, delta_time: f64) -> Vector2d {
        let friction = -self.velocity_friction * delta_time * self.inner.m * self.inner.v;
        self.inner.total_force(delta_time) + friction
    }

    pub fn total_torque(&self, delta_time: f64) -> f64 {
        let friction = -self.turn_friction * delta_time * self.inner.o * self.inner.i;
        self.inner.total_torque(delta_time) + friction
    }
}

impl Mass for FrictionMass {
    fn push(&mut self, force: Vector2d) {
        self.inner.push(force);
    }

    fn hit(&mut self, impulse: Vector2d) {
        self.inner.hit(impulse);
    }

    fn torque(&mut self, torque: f64) {
        self.inner.torque(torque);
    }

    fn twist(&mut self, sudden_torque: f64) {
        self.inner.twist(sudden_torque);
    }

    fn step(&mut self, delta_time: f64) {
        let force = self.total_force(delta_time);
        let torque = self.total_torque(delta_time);
        self.inner.integrate(force, torque);
    }

    fn translate(&mut self, delta: Vector2d) {
        self.inner.translate(delta);
    }

    fn mass(&self) -> f64 {
        self.inner.mass()
    }

    fn moment(&self) -> f64 {
        self.inner.moment()
    }

    fn position(&self) -> Vector2d {
        self.inner.position()
    }

    fn velocity(&self) -> Vector2d {
        self.inner.velocity()
    }

    fn angle(&self) -> f64 {
        self.inner.angle()
    }

    fn rotation(&self) -> f64 {
        self.inner.rotation()
    }

    fn radius(&self) -> f64 {
        self.inner.radius()
    }
}

/// A mass that always points the way it is travelling. Handy for projectiles.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearMass {
    inner: NewtonianMass,
}

impl LinearMass {
    /// Any angle or rotation given is ignored; the heading follows the velocity.
    pub fn new(spec: MassSpec) -> Result<Self, MassError> {
        Ok(Self {
            inner: NewtonianMass::new(spec.with_angle(0.0).with_rotation(0.0))?,
        })
    }
}

impl Mass for LinearMass {
    fn push(&mut self, force: Vector2d) {
        self.inner.push(force);
    }

    fn hit(&mut self, impulse: Vector2d) {
        self.inner.hit(impulse);
    }

    fn torque(&mut self, torque: f64) {
        self.inner.torque(torque);
    }

    fn twist(&mut self, sudden_torque: f64) {
        self.inner.twist(sudden_torque);
    }

    fn step(&mut self, delta_time: f64) {
        self.inner.step(delta_time);
    }

    fn translate(&mut self, delta: Vector2d) {
        self.inner.translate(delta);
    }

    fn mass(&self) -> f64 {
        self.inner.mass()
    }

    fn moment(&self) -> f64 {
        self.inner.moment()
    }

    fn position(&self) -> Vector2d {
        self.inner.position()
    }

    fn velocity(&self) -> Vector2d {
        self.inner.velocity()
    }

    fn angle(&self) -> f64 {
        self.inner.velocity().angle()
    }

    fn rotation(&self) -> f64 {
        self.inner.rotation()
    }

    fn radius(&self) -> f64 {
        self.inner.radius()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-12;

    fn rock() -> NewtonianMass {
        NewtonianMass::new(MassSpec::new(1000.0, 20.0).with_moment(2000.0)).unwrap()
    }

    #[test]
    fn rest_without_forces_stays_put() {
        let mut mass = NewtonianMass::new(
            MassSpec::new(10.0, 1.0).with_position(Vector2d::new(5.0, -3.0)),
        )
        .unwrap();

        mass.step(16.0);

        assert_eq!(mass.position(), Vector2d::new(5.0, -3.0));
        assert_eq!(mass.velocity(), Vector2d::ZERO);
    }

    #[test]
    fn push_changes_velocity_by_force_times_dt_over_mass() {
        // Given
        let mut mass = rock();
        let force = Vector2d::new(4.0, -2.0);

        // When
        mass.push(force);
        mass.step(5.0);

        // Then
        let expected = force * 5.0 / 1000.0;
        assert!((mass.velocity() - expected).magnitude() < EPSILON);
        assert!((mass.position() - expected).magnitude() < EPSILON);
    }

    #[test]
    fn impulses_ignore_delta_time() {
        let mut mass = rock();
        mass.hit(Vector2d::new(100.0, 0.0));
        mass.step(1000.0);
        assert!((mass.velocity() - Vector2d::new(0.1, 0.0)).magnitude() < EPSILON);
    }

    #[test]
    fn accumulators_reset_after_step() {
        let mut mass = rock();
        mass.push(Vector2d::new(1000.0, 0.0));
        mass.torque(2000.0);
        mass.step(1.0);
        let velocity = mass.velocity();
        let rotation = mass.rotation();

        mass.step(1.0);

        assert_eq!(mass.velocity(), velocity);
        assert_eq!(mass.rotation(), rotation);
        assert_eq!(mass.total_force(1.0), Vector2d::ZERO);
        assert_eq!(mass.total_torque(1.0), 0.0);
    }

    #[test]
    fn small_offset_produces_no_torque() {
        let mut mass = rock();
        mass.push_at(Vector2d::new(0.0, 10.0), Vector2d::new(0.00005, 0.0));
        mass.hit_at(Vector2d::new(0.0, 10.0), Vector2d::new(0.0, 0.0001));
        assert_eq!(mass.total_torque(1.0), 0.0);
        assert_eq!(mass.total_force(1.0), Vector2d::new(0.0, 20.0));
    }

    #[test]
    fn offset_push_adds_cross_product_torque() {
        let mut mass = rock();
        let force = Vector2d::new(0.0, 10.0);
        let offset = Vector2d::new(2.0, 0.0);

        mass.push_at(force, offset);
        mass.hit_at(force, offset);

        assert_eq!(mass.total_torque(3.0), force.cross(offset) * 3.0 + force.cross(offset));
    }

    #[test]
    fn angle_and_rotation_wrap_at_360() {
        let mut mass = NewtonianMass::new(
            MassSpec::new(1.0, 1.0).with_angle(350.0).with_rotation(20.0),
        )
        .unwrap();

        mass.step(1.0);
        assert!((mass.angle() - 10.0).abs() < EPSILON);

        mass.twist(mass.moment() * 400.0);
        mass.step(1.0);
        assert!((mass.rotation() - 60.0).abs() < 1e-9);
    }

    #[test]
    fn default_moment_is_a_disc() {
        let mass = NewtonianMass::new(MassSpec::new(10.0, 2.0)).unwrap();
        assert!((mass.moment() - 16.0).abs() < EPSILON);
    }

    #[test]
    fn degenerate_masses_are_rejected() {
        assert_eq!(
            NewtonianMass::new(MassSpec::new(0.0, 1.0)),
            Err(MassError::NonPositiveMass(0.0))
        );
        assert_eq!(
            NewtonianMass::new(MassSpec::new(1.0, 1.0).with_moment(0.0)),
            Err(MassError::NonPositiveMoment(0.0))
        );
        assert_eq!(
            NewtonianMass::new(MassSpec::new(1.0, 0.0)),
            Err(MassError::NonPositiveMoment(0.0))
        );
        assert_eq!(
            NewtonianMass::new(MassSpec::new(1.0, -1.0)),
            Err(MassError::NegativeRadius(-1.0))
        );
        assert_eq!(
            NewtonianMass::new(MassSpec::new(1.0, 1.0).with_velocity(Vector2d::new(f64::NAN, 0.0))),
            Err(MassError::NonFinite)
        );
    }

    #[test]
    fn friction_slows_a_moving_mass() {
        let spec = MassSpec::new(100.0, 12.0)
            .with_moment(2000.0)
            .with_velocity(Vector2d::new(1.0, 0.0))
            .with_rotation(5.0);
        let mut mass = FrictionMass::new(spec, 0.0002, 0.002).unwrap();

        mass.step(10.0);

        // v' = v - 0.0002 * 10 * v
        assert!((mass.velocity().x() - 0.998).abs() < EPSILON);
        // o' = o - 0.002 * 10 * o
        assert!((mass.rotation() - 4.9).abs() < EPSILON);
    }

    #[test]
    fn friction_without_motion_matches_plain_mass() {
        let spec = MassSpec::new(100.0, 12.0).with_moment(2000.0);
        let mut plain = NewtonianMass::new(spec).unwrap();
        let mut frictional = FrictionMass::new(spec, 0.5, 0.5).unwrap();

        for mass in [&mut plain as &mut dyn Mass, &mut frictional] {
            mass.push(Vector2d::new(1.0, 1.0));
            mass.step(2.0);
        }

        assert_eq!(plain.velocity(), frictional.velocity());
    }

    #[test]
    fn linear_mass_points_along_velocity() {
        let mut mass = LinearMass::new(
            MassSpec::new(30.0, 5.0)
                .with_moment(60.0)
                .with_velocity(Vector2d::new(1.0, 0.0))
                .with_angle(45.0),
        )
        .unwrap();
        assert!((mass.angle() - 90.0).abs() < 1e-9);

        mass.hit(Vector2d::new(-30.0, 30.0));
        mass.step(1.0);

        assert!((mass.angle() - 180.0).abs() < 1e-9);
    }
}
