//! The runtime around a [`crate::universe::Universe`]: a simulation thread ticking at a fixed
//! rate, a render thread drawing at its own rate, and the pieces they are built from.
//!
//! # Example
//!
//! ```ignore
//! let universe = Arc::new(Universe::new(MyFactory));
//! let mut engine = Engine::new(EngineConfig::default(), Arc::clone(&universe))?;
//! engine.start(MyCanvas::new(), MyLogic::default())?;
//! engine.run_for(Duration::from_secs(10))?;
//! ```

mod engine;
pub mod log;
mod thread;
pub mod time;

pub use engine::{Engine, EngineConfig, EngineError, Frame, Logic, State};
pub use thread::{EngineThread, StopToken};
pub use time::{RateLimiter, Time};
