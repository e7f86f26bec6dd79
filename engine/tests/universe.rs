use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::{Duration, Instant};

use orbit_engine::physics::{Mass, MassSpec, NewtonianMass, Vector2d};
use orbit_engine::universe::{
    Animation, Body, Canvas, Category, Factory, Glyph, SpawnRequest, Universe, Vitals,
};

struct Explosions;

impl Factory for Explosions {
    fn effect(&self, position: Vector2d, velocity: Vector2d) -> Option<Body> {
        let mass = NewtonianMass::new(
            MassSpec::new(100.0, 10.0)
                .with_moment(200.0)
                .with_position(position)
                .with_velocity(velocity),
        )
        .ok()?;
        Some(Body::new(
            Category::Effect,
            mass,
            Animation::new(['*', '+', 'x'], 2),
            Vitals::new(100.0, 50),
        ))
    }

    fn build(&self, request: &SpawnRequest) -> Option<Body> {
        let mass = NewtonianMass::new(
            MassSpec::new(1.0, 1.0)
                .with_position(request.position)
                .with_velocity(request.velocity),
        )
        .ok()?;
        Some(Body::new(request.kind, mass, Glyph('.'), Vitals::new(0.0, 10)))
    }
}

fn rock(mass: f64, moment: f64, radius: f64, position: Vector2d, hit_points: f64) -> Body {
    let mass = NewtonianMass::new(
        MassSpec::new(mass, radius)
            .with_moment(moment)
            .with_position(position),
    )
    .unwrap();
    Body::new(Category::Inert, mass, Glyph('o'), Vitals::new(hit_points, 0))
}

#[derive(Default)]
struct CountingCanvas {
    stamps: usize,
    passes: usize,
}

impl Canvas for CountingCanvas {
    fn clear(&mut self) {
        self.stamps = 0;
    }

    fn stamp(&mut self, _position: Vector2d, _angle: f64, _glyph: char) {
        self.stamps += 1;
    }

    fn present(&mut self) {
        self.passes += 1;
    }
}

#[test]
fn overlapping_rocks_are_separated_by_one_tick() {
    // Given two overlapping rocks at rest, merged into the active set
    let universe = Universe::new(Explosions);
    let a = universe.add(rock(1000.0, 2000.0, 20.0, Vector2d::ZERO, 5000.0));
    let b = universe.add(rock(2000.0, 10000.0, 35.0, Vector2d::new(10.0, 0.0), 15000.0));
    universe.normalize_all();

    // When
    universe.simulate_all(1.0);

    // Then each is shoved 46 units away from the other
    let (pa, va) = {
        let state = a.lock();
        (state.position(), state.velocity())
    };
    let (pb, vb) = {
        let state = b.lock();
        (state.position(), state.velocity())
    };
    // each one moves by the overlap plus one unit of padding
    let separation = (pb - pa).magnitude();
    assert!((separation - 102.0).abs() < 0.2);
    assert!((pa.x() + 46.0).abs() < 0.1);
    assert!((pb.x() - 56.0).abs() < 0.1);

    // and the impulses are equal and opposite
    let pa_momentum = va * 1000.0;
    let pb_momentum = vb * 2000.0;
    assert!((pa_momentum + pb_momentum).magnitude() < 1e-9);
}

#[test]
fn fatal_hit_leaves_one_effect_behind() {
    // Given
    let universe = Universe::new(Explosions);
    let victim = universe.add(rock(
        100.0,
        200.0,
        12.0,
        Vector2d::new(300.0, -40.0),
        100.0,
    ));
    universe.simulate_all(1.0);
    assert!(universe.contains(victim.id()));

    // When
    victim.lock().hit(Vector2d::new(90.0, 120.0));
    universe.step_all(1.0);
    assert!(victim.lock().is_dead());
    let last_position = victim.lock().position();
    let normalized = universe.normalize_all();

    // Then
    assert!(!universe.contains(victim.id()));
    assert_eq!(normalized.effects, 1);
    let bodies = universe.bodies();
    assert_eq!(bodies.len(), 1);
    assert_eq!(bodies[0].category(), Category::Effect);
    assert_eq!(bodies[0].lock().position(), last_position);

    // The effect fades out on its own and leaves nothing behind.
    for _ in 0..60 {
        universe.simulate_all(1.0);
    }
    assert!(universe.is_empty());
}

#[test]
fn bodies_far_apart_only_attract() {
    let universe = Universe::new(Explosions);
    let a = universe.add(rock(1000.0, 2000.0, 20.0, Vector2d::ZERO, 0.0));
    let b = universe.add(rock(1000.0, 2000.0, 20.0, Vector2d::new(500.0, 0.0), 0.0));
    universe.normalize_all();

    universe.simulate_all(1.0);

    let va = a.lock().velocity();
    let vb = b.lock().velocity();
    assert!(va.x() > 0.0);
    assert!(vb.x() < 0.0);
    assert!((va + vb).magnitude() < 1e-12);
    assert!(a.lock().vitals().damage() == 0.0);
}

#[test]
fn concurrent_drawing_and_simulation_do_not_deadlock() {
    // Given a crowded universe where every pair interacts
    let universe = Arc::new(Universe::new(Explosions));
    for i in 0..30 {
        let angle = i as f64 * 12.0;
        universe.add(rock(
            100.0,
            200.0,
            8.0,
            Vector2d::from_angle(angle) * (20.0 + i as f64),
            0.0,
        ));
    }
    universe.normalize_all();
    let done = Arc::new(AtomicBool::new(false));

    // When the simulation, a renderer and a spawner hammer it at once
    let simulation = {
        let universe = Arc::clone(&universe);
        let done = Arc::clone(&done);
        thread::spawn(move || {
            for _ in 0..300 {
                universe.simulate_all(1.0);
            }
            done.store(true, Ordering::Release);
        })
    };
    let render = {
        let universe = Arc::clone(&universe);
        let done = Arc::clone(&done);
        thread::spawn(move || {
            let mut canvas = CountingCanvas::default();
            loop {
                universe.draw_all(&mut canvas);
                // Every pass sees a whole active set.
                assert!(canvas.stamps >= 30);
                if done.load(Ordering::Acquire) {
                    break;
                }
            }
            canvas.passes
        })
    };
    let spawner = {
        let universe = Arc::clone(&universe);
        let done = Arc::clone(&done);
        thread::spawn(move || {
            let mut added = 0;
            while !done.load(Ordering::Acquire) && added < 100 {
                let position = Vector2d::new(1000.0 + added as f64 * 30.0, 0.0);
                universe.add(rock(1.0, 1.0, 1.0, position, 0.0));
                added += 1;
                thread::yield_now();
            }
            added
        })
    };

    // Then everything finishes in bounded time
    let deadline = Instant::now() + Duration::from_secs(30);
    while !done.load(Ordering::Acquire) {
        assert!(Instant::now() < deadline, "simulation did not finish");
        thread::sleep(Duration::from_millis(5));
    }
    simulation.join().unwrap();
    let passes = render.join().unwrap();
    let added = spawner.join().unwrap();

    universe.normalize_all();
    assert!(passes > 0);
    assert_eq!(universe.len(), 30 + added);
    assert_eq!(universe.ticks(), 300);
}
