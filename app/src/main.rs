mod arsenal;
mod pilot;
mod scene;
mod terminal;

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use log::LevelFilter;
use orbit_engine::core::log::init_channel_logger;
use orbit_engine::core::{Engine, EngineConfig};
use orbit_engine::physics::Vector2d;
use orbit_engine::sync::Guarded;
use orbit_engine::universe::Universe;

use crate::arsenal::Arsenal;
use crate::scene::Scene;
use crate::terminal::{Grid, Headless, Origin, Screen, TerminalCanvas};

/// Rocks, an alien and an autopiloted ship, simulated and drawn on separate threads.
#[derive(Parser, Debug)]
#[command(name = "orbit", version)]
struct Args {
    /// Simulation ticks per second
    #[arg(long, default_value_t = 150)]
    steps: u32,

    /// Frames drawn per second
    #[arg(long, default_value_t = 24)]
    fps: u32,

    /// How long to run for
    #[arg(long, default_value_t = 30.0)]
    seconds: f64,

    /// Screen width in characters
    #[arg(long, default_value_t = 100)]
    width: usize,

    /// Screen height in characters
    #[arg(long, default_value_t = 36)]
    height: usize,

    /// World units per character column
    #[arg(long, default_value_t = 10.0)]
    scale: f64,

    /// Rocks to add on top of the opening scene
    #[arg(long, default_value_t = 0)]
    rocks: usize,

    /// Log lines shown under the screen
    #[arg(long, default_value_t = 6)]
    log_lines: usize,

    /// Most verbose log level recorded
    #[arg(long, default_value_t = LevelFilter::Info)]
    log_level: LevelFilter,

    /// Run without drawing to the terminal
    #[arg(long)]
    headless: bool,
}

impl Args {
    fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            steps_per_second: self.steps,
            frames_per_second: self.fps,
            ..EngineConfig::default()
        }
    }

    fn duration(&self) -> Result<Duration> {
        Duration::try_from_secs_f64(self.seconds)
            .with_context(|| format!("invalid run time: {} seconds", self.seconds))
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    let logs = init_channel_logger(args.log_level).context("failed to install the logger")?;

    let universe = Arc::new(Universe::new(Arsenal));
    let mut engine = Engine::new(args.engine_config(), Arc::clone(&universe))?;
    let origin: Origin = Arc::new(Guarded::new(Vector2d::ZERO));
    let scene = Scene::new(args.rocks, Arc::clone(&origin));
    let duration = args.duration()?;

    let result = if args.headless {
        engine.start(Headless::default(), scene)?;
        engine.run_for(duration)
    } else {
        let _screen = Screen::enter().context("failed to set up the terminal")?;
        let grid = Grid::new(args.width, args.height, args.scale);
        let canvas = TerminalCanvas::new(grid, origin, logs.clone(), args.log_lines);
        engine.start(canvas, scene)?;
        engine.run_for(duration)
    };

    // Whatever the screen didn't get to show.
    for message in logs.try_iter() {
        eprintln!("{message}");
    }
    result?;
    println!(
        "simulated {} ticks, {} bodies left",
        universe.ticks(),
        universe.len()
    );
    Ok(())
}
