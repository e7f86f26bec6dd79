use std::fmt;
use std::io;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use log::{error, info};

use super::thread::{EngineThread, StopToken};
use super::time::{RateLimiter, Time};
use crate::universe::{Canvas, Universe};

/// Rates and clamps for an engine run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngineConfig {
    /// Simulation ticks per second.
    pub steps_per_second: u32,
    /// Draw passes per second.
    pub frames_per_second: u32,
    /// The smallest delta, in milliseconds, a tick is ever simulated with.
    pub min_delta_ms: f64,
}

impl EngineConfig {
    pub fn validate(&self) -> Result<(), EngineError> {
        if self.steps_per_second == 0 {
            return Err(EngineError::InvalidConfig(
                "steps per second must be positive".into(),
            ));
        }
        if self.frames_per_second == 0 {
            return Err(EngineError::InvalidConfig(
                "frames per second must be positive".into(),
            ));
        }
        if !self.min_delta_ms.is_finite() || self.min_delta_ms <= 0.0 {
            return Err(EngineError::InvalidConfig(format!(
                "minimum delta must be a positive number of milliseconds, got {}",
                self.min_delta_ms
            )));
        }
        Ok(())
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            steps_per_second: 150,
            frames_per_second: 24,
            min_delta_ms: 1.0,
        }
    }
}

/// Errors surfaced by the engine's lifecycle.
#[derive(Debug)]
pub enum EngineError {
    InvalidConfig(String),
    /// `start` was called on an engine that is already running.
    AlreadyRunning,
    /// `stop` was called on an engine that isn't running.
    NotRunning,
    /// The OS refused to spawn a thread.
    Spawn(io::Error),
    /// The named thread panicked.
    ThreadPanicked(String),
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineError::InvalidConfig(reason) => write!(f, "invalid engine config: {reason}"),
            EngineError::AlreadyRunning => write!(f, "engine is already running"),
            EngineError::NotRunning => write!(f, "engine is not running"),
            EngineError::Spawn(error) => write!(f, "failed to spawn engine thread: {error}"),
            EngineError::ThreadPanicked(name) => write!(f, "engine thread {name:?} panicked"),
        }
    }
}

impl std::error::Error for EngineError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            EngineError::Spawn(error) => Some(error),
            _ => None,
        }
    }
}

/// Enumeration of possible states the engine can be in.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum State {
    /// The engine has never been started
    Dead,
    /// The engine is starting up
    Starting,
    /// The engine is running in normal operation
    Running,
    /// The engine is shutting down
    Stopping,
    /// The engine has stopped
    Stopped,
}

/// A single simulation tick as seen by [`Logic`].
pub struct Frame<'a> {
    /// Timing for this tick
    pub time: Time,
    /// The delta the universe is about to be simulated with, in milliseconds
    pub delta_ms: f64,
    pub universe: &'a Universe,
}

/// Game logic driven by the simulation thread. This is where input is fed into the universe.
pub trait Logic: Send {
    /// Called once on the starting thread, before any engine thread runs.
    fn on_start(&mut self, _universe: &Universe) {}

    /// Called on the simulation thread right before every tick.
    fn on_fixed_update(&mut self, frame: Frame<'_>);
}

/// Drives a [`Universe`] with two threads: one simulating at a fixed rate and one drawing at an
/// independent rate.
pub struct Engine {
    config: EngineConfig,
    universe: Arc<Universe>,
    state: State,
    token: StopToken,
    threads: Vec<EngineThread>,
}

impl Engine {
    pub fn new(config: EngineConfig, universe: Arc<Universe>) -> Result<Self, EngineError> {
        config.validate()?;
        Ok(Self {
            config,
            universe,
            state: State::Dead,
            token: StopToken::new(),
            threads: Vec::new(),
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn universe(&self) -> &Arc<Universe> {
        &self.universe
    }

    pub fn state(&self) -> State {
        self.state
    }

    /// Spawn the simulation and render threads.
    pub fn start<C, L>(&mut self, canvas: C, mut logic: L) -> Result<(), EngineError>
    where
        C: Canvas + Send + 'static,
        L: Logic + 'static,
    {
        if matches!(self.state, State::Starting | State::Running) {
            return Err(EngineError::AlreadyRunning);
        }
        self.state = State::Starting;
        self.token = StopToken::new();
        info!(
            "revving the engine: {} steps/s, {} frames/s",
            self.config.steps_per_second, self.config.frames_per_second
        );

        logic.on_start(&self.universe);

        let simulation = self.spawn_simulation(logic).and_then(|simulation| {
            self.threads.push(simulation);
            self.spawn_render(canvas)
        });
        match simulation {
            Ok(render) => self.threads.push(render),
            Err(error) => {
                error!("engine failed to start: {error}");
                let _ = self.halt();
                return Err(error);
            }
        }

        self.state = State::Running;
        info!("engine running");
        Ok(())
    }

    /// Stop both threads and wait for them. Reports the first thread that panicked.
    pub fn stop(&mut self) -> Result<(), EngineError> {
        if self.state != State::Running {
            return Err(EngineError::NotRunning);
        }
        self.state = State::Stopping;
        info!("stopping the engine");
        let result = self.halt();
        info!("engine stopped after {} ticks", self.universe.ticks());
        result
    }

    /// Run until `duration` has passed or the run is stopped from elsewhere, then stop.
    pub fn run_for(&mut self, duration: Duration) -> Result<(), EngineError> {
        if self.state != State::Running {
            return Err(EngineError::NotRunning);
        }
        let deadline = Instant::now() + duration;
        while !self.token.is_stopped() {
            let now = Instant::now();
            if now >= deadline {
                break;
            }
            thread::sleep((deadline - now).min(Duration::from_millis(10)));
        }
        self.stop()
    }

    fn spawn_simulation<L: Logic + 'static>(&self, mut logic: L) -> Result<EngineThread, EngineError> {
        let universe = Arc::clone(&self.universe);
        let mut limiter = RateLimiter::new(self.config.steps_per_second);
        let min_delta_ms = self.config.min_delta_ms;
        let mut time = Time::new();

        EngineThread::spawn("simulation", self.token.clone(), move || {
            limiter.wait();
            time = time.next();
            let delta_ms = time.delta_ms(min_delta_ms);
            logic.on_fixed_update(Frame {
                time,
                delta_ms,
                universe: &universe,
            });
            universe.simulate_all(delta_ms);
        })
    }

    fn spawn_render<C: Canvas + Send + 'static>(&self, mut canvas: C) -> Result<EngineThread, EngineError> {
        let universe = Arc::clone(&self.universe);
        let mut limiter = RateLimiter::new(self.config.frames_per_second);

        EngineThread::spawn("render", self.token.clone(), move || {
            limiter.wait();
            universe.draw_all(&mut canvas);
        })
    }

    fn halt(&mut self) -> Result<(), EngineError> {
        self.token.stop();
        let mut result = Ok(());
        for mut thread in self.threads.drain(..) {
            if let Err(error) = thread.join() {
                error!("{error}");
                if result.is_ok() {
                    result = Err(error);
                }
            }
        }
        self.state = State::Stopped;
        result
    }
}

impl Drop for Engine {
    fn drop(&mut self) {
        if self.state == State::Running {
            let _ = self.stop();
        }
    }
}
