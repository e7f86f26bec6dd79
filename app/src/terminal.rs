//! A character-grid render target drawn with crossterm.

use std::collections::VecDeque;
use std::io::{self, Write};
use std::sync::Arc;

use crossbeam::channel::Receiver;
use crossterm::{
    cursor, execute, queue,
    style::{self, Stylize},
    terminal,
};
use orbit_engine::core::log::LogMessage;
use orbit_engine::physics::Vector2d;
use orbit_engine::sync::Guarded;
use orbit_engine::universe::Canvas;

/// The point of the world shown at the centre of the screen, shared between whoever follows
/// the action and the canvas.
pub type Origin = Arc<Guarded<Vector2d>>;

/// Projects world coordinates onto a grid of characters.
#[derive(Debug, Clone)]
pub struct Grid {
    width: usize,
    height: usize,
    /// World units per column. Rows are twice as tall.
    scale: f64,
    cells: Vec<char>,
}

impl Grid {
    pub fn new(width: usize, height: usize, scale: f64) -> Self {
        Self {
            width,
            height,
            scale,
            cells: vec![' '; width * height],
        }
    }

    pub fn clear(&mut self) {
        self.cells.fill(' ');
    }

    /// The cell showing `position` when the screen is centred on `origin`.
    pub fn cell(&self, origin: Vector2d, position: Vector2d) -> Option<(usize, usize)> {
        let offset = position - origin;
        let column = (offset.x() / self.scale + self.width as f64 / 2.0).floor();
        let row = (offset.y() / (2.0 * self.scale) + self.height as f64 / 2.0).floor();
        let inside = column >= 0.0
            && row >= 0.0
            && column < self.width as f64
            && row < self.height as f64;
        inside.then_some((column as usize, row as usize))
    }

    pub fn plot(&mut self, origin: Vector2d, position: Vector2d, glyph: char) {
        if let Some((column, row)) = self.cell(origin, position) {
            self.cells[row * self.width + column] = glyph;
        }
    }

    pub fn rows(&self) -> impl Iterator<Item = String> + '_ {
        self.cells
            .chunks(self.width.max(1))
            .map(|row| row.iter().collect())
    }
}

/// Draws the universe into the terminal with the tail of the log underneath.
pub struct TerminalCanvas {
    grid: Grid,
    origin: Origin,
    frame_origin: Vector2d,
    logs: Receiver<LogMessage>,
    tail: VecDeque<LogMessage>,
    tail_len: usize,
    out: io::Stdout,
    failed: bool,
}

impl TerminalCanvas {
    pub fn new(grid: Grid, origin: Origin, logs: Receiver<LogMessage>, tail_len: usize) -> Self {
        Self {
            grid,
            origin,
            frame_origin: Vector2d::ZERO,
            logs,
            tail: VecDeque::with_capacity(tail_len),
            tail_len,
            out: io::stdout(),
            failed: false,
        }
    }

    fn render(&mut self) -> io::Result<()> {
        self.tail.extend(self.logs.try_iter());
        while self.tail.len() > self.tail_len {
            self.tail.pop_front();
        }

        queue!(self.out, cursor::MoveTo(0, 0))?;
        for row in self.grid.rows() {
            queue!(
                self.out,
                style::Print(row),
                terminal::Clear(terminal::ClearType::UntilNewLine),
                cursor::MoveToNextLine(1)
            )?;
        }
        let rule = "-".repeat(self.grid.width);
        queue!(self.out, style::Print(rule.dark_grey()), cursor::MoveToNextLine(1))?;
        for message in &self.tail {
            let line: String = message.to_string().chars().take(self.grid.width).collect();
            queue!(
                self.out,
                style::Print(line),
                terminal::Clear(terminal::ClearType::UntilNewLine),
                cursor::MoveToNextLine(1)
            )?;
        }
        self.out.flush()
    }
}

impl Canvas for TerminalCanvas {
    fn clear(&mut self) {
        self.frame_origin = *self.origin.lock();
        self.grid.clear();
    }

    fn stamp(&mut self, position: Vector2d, _angle: f64, glyph: char) {
        self.grid.plot(self.frame_origin, position, glyph);
    }

    fn present(&mut self) {
        // Logging from here feeds back into this canvas, so only the first failure is reported.
        if let Err(error) = self.render() {
            if !self.failed {
                log::error!("terminal output failed: {error}");
                self.failed = true;
            }
        }
    }
}

/// Switches to the alternate screen for as long as it lives.
pub struct Screen;

impl Screen {
    pub fn enter() -> io::Result<Self> {
        execute!(
            io::stdout(),
            terminal::EnterAlternateScreen,
            cursor::Hide,
            terminal::Clear(terminal::ClearType::All)
        )?;
        Ok(Self)
    }
}

impl Drop for Screen {
    fn drop(&mut self) {
        let _ = execute!(io::stdout(), cursor::Show, terminal::LeaveAlternateScreen);
    }
}

/// A canvas that only counts what it was asked to draw, for runs without a terminal.
#[derive(Debug, Default)]
pub struct Headless {
    frames: u64,
    stamps: u64,
}

impl Drop for Headless {
    fn drop(&mut self) {
        log::info!("drew {} frames, {} glyphs", self.frames, self.stamps);
    }
}

impl Canvas for Headless {
    fn stamp(&mut self, _position: Vector2d, _angle: f64, _glyph: char) {
        self.stamps += 1;
    }

    fn present(&mut self) {
        self.frames += 1;
    }
}
