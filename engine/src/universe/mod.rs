//! The universe owns every body taking part in the simulation and is the one place the
//! concurrency discipline between the simulation and render threads is enforced.
//!
//! # Collections
//!
//! Bodies live in two collections:
//! - the **active set**, which is simulated and drawn, and
//! - the **pending set**, where new bodies wait until the next normalize.
//!
//! The active set is guarded by a collection-wide lock and is only ever structurally changed
//! during [`Universe::normalize_all`]. [`Universe::add`] pushes onto a lock-free queue, so adding
//! never blocks on a running simulation or draw pass.
//!
//! # Locking
//!
//! - Membership of the active set is only read or changed while holding the collection lock.
//! - A body's state is only read or changed while holding that body's lock.
//! - When both are needed, the collection lock is taken first.
//! - The interaction pass holds two body locks at once, always acquired in [`BodyId`] order.
//!
//! A draw pass therefore happens either entirely before or entirely after any normalize.
//!
//! # Example
//!
//! ```ignore
//! let universe = Arc::new(Universe::new(MyFactory));
//! universe.add(rock);
//!
//! // simulation thread
//! universe.simulate_all(delta_ms);
//!
//! // render thread
//! universe.draw_all(&mut canvas);
//! ```

mod body;
mod sprite;

use std::collections::HashSet;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use crossbeam::queue::SegQueue;
use log::{debug, trace, warn};

use crate::physics::{Mass, Vector2d, collision, gravitate};
use crate::sync::Guarded;

pub use body::{Body, BodyId, BodyState, Category, Pilot, SpawnQueue, SpawnRequest, Vitals};
pub use sprite::{Animation, Canvas, Glyph, Sprite};

/// Builds bodies on behalf of the universe: explosions where bodies die, and whatever bodies
/// ask for through their spawn requests.
pub trait Factory: Send + Sync {
    /// A visual effect left behind by a body that died at `position` moving with `velocity`.
    /// `None` leaves nothing behind.
    fn effect(&self, position: Vector2d, velocity: Vector2d) -> Option<Body>;

    /// Resolve a spawn request. `None` drops the request.
    fn build(&self, request: &SpawnRequest) -> Option<Body>;
}

/// What a single normalize changed.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Normalized {
    /// Death effects queued for dead bodies.
    pub effects: usize,
    /// Bodies built from spawn requests.
    pub spawned: usize,
    /// Dead bodies removed from the active set.
    pub removed: usize,
    /// Pending bodies moved into the active set.
    pub merged: usize,
}

pub struct Universe {
    active: Guarded<Vec<Arc<Body>>>,
    pending: SegQueue<Arc<Body>>,
    factory: Box<dyn Factory>,
    ticks: AtomicU64,
}

impl Universe {
    pub fn new(factory: impl Factory + 'static) -> Self {
        Self {
            active: Guarded::new(Vec::new()),
            pending: SegQueue::new(),
            factory: Box::new(factory),
            ticks: AtomicU64::new(0),
        }
    }

    /// Queue a body to join the universe at the next normalize. Safe to call from any thread.
    pub fn add(&self, body: impl Into<Arc<Body>>) -> Arc<Body> {
        let body = body.into();
        trace!("queued body {} ({:?})", body.id(), body.category());
        self.pending.push(Arc::clone(&body));
        body
    }

    /// Run one tick: interactions, then normalize, then integration.
    ///
    /// Must only be driven from a single thread at a time.
    pub fn simulate_all(&self, delta_time: f64) -> Normalized {
        self.interact_all();
        let normalized = self.normalize_all();
        self.step_all(delta_time);
        self.ticks.fetch_add(1, Ordering::Relaxed);
        normalized
    }

    /// Apply gravity and then collisions to every pair of non-effect bodies. O(n²) by design.
    pub fn interact_all(&self) {
        let bodies: Vec<_> = self
            .bodies()
            .into_iter()
            .filter(|body| !body.is_effect())
            .collect();

        for (index, first) in bodies.iter().enumerate() {
            for second in &bodies[index + 1..] {
                let (mut a, mut b) = Body::lock_pair(first, second);
                gravitate(&mut *a, &mut *b);
                collision(&mut *a, &mut *b);
            }
        }
    }

    /// Reconcile the active set under the collection lock:
    ///
    /// 1. queue one effect for every dead non-effect body,
    /// 2. drain every body's spawn requests into the pending set,
    /// 3. drop dead bodies,
    /// 4. merge the bodies pending as of this call, skipping any that are already active.
    ///
    /// Dying bodies still emit their effect and any in-flight spawns before removal, and new
    /// bodies never take part in the pass that requested them.
    pub fn normalize_all(&self) -> Normalized {
        let mut active = self.active.lock();
        let mut normalized = Normalized::default();
        let mut born = Vec::new();

        for body in active.iter().filter(|body| !body.is_effect()) {
            let state = body.lock();
            if state.is_dead() {
                if let Some(effect) = self.factory.effect(state.position(), state.velocity()) {
                    born.push(effect);
                    normalized.effects += 1;
                }
            }
        }

        for body in active.iter() {
            let mut state = body.lock();
            while let Some(request) = state.next_spawn() {
                match self.factory.build(&request) {
                    Some(spawn) => {
                        born.push(spawn);
                        normalized.spawned += 1;
                    }
                    None => warn!("body {} requested an unbuildable {:?}", body.id(), request.kind),
                }
            }
        }

        for body in born {
            self.add(body);
        }

        let before = active.len();
        active.retain(|body| !body.lock().is_dead());
        normalized.removed = before - active.len();

        // Only what is queued as of now; later adds wait for the next normalize.
        let mut members: HashSet<BodyId> = active.iter().map(|body| body.id()).collect();
        for _ in 0..self.pending.len() {
            let Some(body) = self.pending.pop() else {
                break;
            };
            if members.insert(body.id()) {
                active.push(body);
                normalized.merged += 1;
            } else {
                warn!("body {} was added more than once", body.id());
            }
        }

        if normalized != Normalized::default() {
            debug!(
                "normalized: {} effects, {} spawned, {} removed, {} merged, {} active",
                normalized.effects,
                normalized.spawned,
                normalized.removed,
                normalized.merged,
                active.len()
            );
        }
        normalized
    }

    /// Integrate every active body by `delta_time`, each under its own lock.
    pub fn step_all(&self, delta_time: f64) {
        for body in self.bodies() {
            body.lock().step(delta_time);
        }
    }

    /// Draw every active body. Holds the collection lock for the whole pass and each body's lock
    /// while it is drawn.
    pub fn draw_all(&self, canvas: &mut dyn Canvas) {
        let active = self.active.lock();
        canvas.clear();
        for body in active.iter() {
            body.lock().draw(canvas);
        }
        canvas.present();
    }

    /// A snapshot of the active set.
    pub fn bodies(&self) -> Vec<Arc<Body>> {
        self.active.lock().clone()
    }

    pub fn contains(&self, id: BodyId) -> bool {
        self.active.lock().iter().any(|body| body.id() == id)
    }

    /// The number of active bodies.
    pub fn len(&self) -> usize {
        self.active.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The number of bodies waiting for the next normalize.
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// The number of completed ticks.
    pub fn ticks(&self) -> u64 {
        self.ticks.load(Ordering::Relaxed)
    }
}
