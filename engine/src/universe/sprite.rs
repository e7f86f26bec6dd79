use crate::physics::Vector2d;

/// A render target. Implementations decide how positions map onto the output and where its
/// origin sits.
pub trait Canvas {
    /// Called once at the start of every draw pass.
    fn clear(&mut self) {}

    /// Mark `glyph` at a world `position`, rotated clockwise by `angle` degrees.
    fn stamp(&mut self, position: Vector2d, angle: f64, glyph: char);

    /// Called once at the end of every draw pass.
    fn present(&mut self) {}
}

/// The drawable capability of a body. Only invoked from a draw pass, never while simulating.
pub trait Sprite: Send {
    fn draw(&mut self, canvas: &mut dyn Canvas, position: Vector2d, angle: f64);
}

/// A sprite that always looks the same.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Glyph(pub char);

impl Sprite for Glyph {
    fn draw(&mut self, canvas: &mut dyn Canvas, position: Vector2d, angle: f64) {
        canvas.stamp(position, angle, self.0);
    }
}

/// A sprite cycling through frames, holding each one for a number of draws.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Animation {
    frames: Vec<char>,
    draws_per_frame: u32,
    draws: u32,
}

impl Animation {
    pub fn new(frames: impl Into<Vec<char>>, draws_per_frame: u32) -> Self {
        Self {
            frames: frames.into(),
            draws_per_frame: draws_per_frame.max(1),
            draws: 0,
        }
    }

    /// The frame the next draw will show.
    pub fn current(&self) -> Option<char> {
        if self.frames.is_empty() {
            return None;
        }
        let index = (self.draws / self.draws_per_frame) as usize % self.frames.len();
        Some(self.frames[index])
    }
}

impl Sprite for Animation {
    fn draw(&mut self, canvas: &mut dyn Canvas, position: Vector2d, angle: f64) {
        if let Some(glyph) = self.current() {
            canvas.stamp(position, angle, glyph);
        }
        let cycle = self.draws_per_frame.saturating_mul(self.frames.len() as u32).max(1);
        self.draws = (self.draws + 1) % cycle;
    }
}
