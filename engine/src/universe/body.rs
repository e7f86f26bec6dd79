//! Bodies are the entities a [`super::Universe`] manages.
//!
//! A body composes three independent capabilities behind one lock: a [`Mass`] for physics, a
//! [`Sprite`] for drawing and the [`Guarded`] resource that serialises access between the
//! simulation and render threads. Lifecycle bookkeeping lives in [`Vitals`].

use std::collections::VecDeque;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::physics::{Mass, Vector2d};
use crate::sync::{Guard, Guarded};

use super::sprite::{Canvas, Sprite};

/// A process-wide unique, monotonically increasing body identifier. Provides the total order
/// used whenever two bodies are locked together.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BodyId(u64);

impl BodyId {
    fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }

    #[inline]
    pub const fn id(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for BodyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// What a body is from the simulation's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    /// Rocks and other inanimate matter.
    Inert,
    Hostile,
    /// Purely visual, e.g. an explosion. Exempt from gravity and collisions.
    Effect,
    Player,
    Projectile,
}

impl Category {
    #[inline]
    pub fn is_effect(self) -> bool {
        self == Category::Effect
    }
}

/// A request from a body to bring a new body into the universe, resolved by a
/// [`super::Factory`] during the next normalize.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpawnRequest {
    pub kind: Category,
    pub position: Vector2d,
    pub velocity: Vector2d,
}

/// Hit point and lifetime budgets. A budget of zero means that cause of death never applies.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vitals {
    hit_points: f64,
    damage: f64,
    /// Lifetime in ticks.
    lifetime: u64,
    age: u64,
    dead: bool,
}

impl Vitals {
    pub fn new(hit_points: f64, lifetime: u64) -> Self {
        Self {
            hit_points,
            damage: 0.0,
            lifetime,
            age: 0,
            dead: false,
        }
    }

    /// Neither damage nor age will ever kill the body.
    pub fn immortal() -> Self {
        Self::new(0.0, 0)
    }

    pub fn hit_points(&self) -> f64 {
        self.hit_points
    }

    pub fn damage(&self) -> f64 {
        self.damage
    }

    pub fn lifetime(&self) -> u64 {
        self.lifetime
    }

    pub fn age(&self) -> u64 {
        self.age
    }

    pub fn is_dead(&self) -> bool {
        self.dead
    }

    fn wound(&mut self, amount: f64) {
        self.damage += amount;
        if self.hit_points > 0.0 && self.damage > self.hit_points {
            self.dead = true;
        }
    }

    fn grow_older(&mut self) {
        self.age += 1;
        if self.lifetime > 0 && self.age > self.lifetime {
            self.dead = true;
        }
    }
}

/// Drives a body from the outside world, e.g. player input or an autopilot. Runs at the start
/// of every step, before the body integrates.
pub trait Pilot: Send {
    fn steer(&mut self, mass: &mut dyn Mass, spawns: &mut SpawnQueue);
}

/// A finite, drainable queue of spawn requests.
#[derive(Debug, Default, Clone)]
pub struct SpawnQueue(VecDeque<SpawnRequest>);

impl SpawnQueue {
    pub fn request(&mut self, request: SpawnRequest) {
        self.0.push_back(request);
    }

    pub fn has_spawn(&self) -> bool {
        !self.0.is_empty()
    }

    pub fn next_spawn(&mut self) -> Option<SpawnRequest> {
        self.0.pop_front()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Everything about a body that is guarded by its lock.
pub struct BodyState {
    mass: Box<dyn Mass>,
    sprite: Box<dyn Sprite>,
    vitals: Vitals,
    pilot: Option<Box<dyn Pilot>>,
    spawns: SpawnQueue,
}

impl BodyState {
    pub fn vitals(&self) -> &Vitals {
        &self.vitals
    }

    #[inline]
    pub fn is_dead(&self) -> bool {
        self.vitals.is_dead()
    }

    pub fn spawns(&mut self) -> &mut SpawnQueue {
        &mut self.spawns
    }

    pub fn has_spawn(&self) -> bool {
        self.spawns.has_spawn()
    }

    pub fn next_spawn(&mut self) -> Option<SpawnRequest> {
        self.spawns.next_spawn()
    }

    pub fn draw(&mut self, canvas: &mut dyn Canvas) {
        let (position, angle) = (self.mass.position(), self.mass.angle());
        self.sprite.draw(canvas, position, angle);
    }
}

impl Mass for BodyState {
    fn push(&mut self, force: Vector2d) {
        self.mass.push(force);
    }

    /// Impulses also wear the body down by their magnitude.
    fn hit(&mut self, impulse: Vector2d) {
        self.vitals.wound(impulse.magnitude());
        self.mass.hit(impulse);
    }

    fn torque(&mut self, torque: f64) {
        self.mass.torque(torque);
    }

    fn twist(&mut self, sudden_torque: f64) {
        self.mass.twist(sudden_torque);
    }

    fn step(&mut self, delta_time: f64) {
        if let Some(pilot) = self.pilot.as_mut() {
            pilot.steer(self.mass.as_mut(), &mut self.spawns);
        }
        self.vitals.grow_older();
        self.mass.step(delta_time);
    }

    fn translate(&mut self, delta: Vector2d) {
        self.mass.translate(delta);
    }

    fn mass(&self) -> f64 {
        self.mass.mass()
    }

    fn moment(&self) -> f64 {
        self.mass.moment()
    }

    fn position(&self) -> Vector2d {
        self.mass.position()
    }

    fn velocity(&self) -> Vector2d {
        self.mass.velocity()
    }

    fn angle(&self) -> f64 {
        self.mass.angle()
    }

    fn rotation(&self) -> f64 {
        self.mass.rotation()
    }

    fn radius(&self) -> f64 {
        self.mass.radius()
    }
}

/// An entity managed by the universe.
pub struct Body {
    id: BodyId,
    category: Category,
    state: Guarded<BodyState>,
}

impl Body {
    pub fn new(
        category: Category,
        mass: impl Mass + 'static,
        sprite: impl Sprite + 'static,
        vitals: Vitals,
    ) -> Self {
        Self {
            id: BodyId::next(),
            category,
            state: Guarded::new(BodyState {
                mass: Box::new(mass),
                sprite: Box::new(sprite),
                vitals,
                pilot: None,
                spawns: SpawnQueue::default(),
            }),
        }
    }

    /// Attach a pilot that steers the body every step.
    pub fn with_pilot(mut self, pilot: impl Pilot + 'static) -> Self {
        self.state.get_mut().pilot = Some(Box::new(pilot));
        self
    }

    #[inline]
    pub fn id(&self) -> BodyId {
        self.id
    }

    #[inline]
    pub fn category(&self) -> Category {
        self.category
    }

    #[inline]
    pub fn is_effect(&self) -> bool {
        self.category.is_effect()
    }

    /// Block until this body's state is free.
    pub fn lock(&self) -> Guard<'_, BodyState> {
        self.state.lock()
    }

    /// Lock two distinct bodies, always taking the lower id first so that concurrent pairwise
    /// passes can't deadlock. The guards come back in argument order.
    ///
    /// # Panics
    /// Panics if both arguments are the same body.
    pub fn lock_pair<'a>(
        first: &'a Body,
        second: &'a Body,
    ) -> (Guard<'a, BodyState>, Guard<'a, BodyState>) {
        assert_ne!(first.id, second.id, "a body can't be paired with itself");
        if first.id < second.id {
            let a = first.lock();
            let b = second.lock();
            (a, b)
        } else {
            let b = second.lock();
            let a = first.lock();
            (a, b)
        }
    }
}

impl fmt::Debug for Body {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Body")
            .field("id", &self.id)
            .field("category", &self.category)
            .finish_non_exhaustive()
    }
}
