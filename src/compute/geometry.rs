/// Axis-aligned rectangles and the overlap test shared by every collision
/// check.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Position (top-left corner) and size in play-field units.  `y` grows
/// downward.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub pos: Vec2,
    pub size: Vec2,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            pos: Vec2::new(x, y),
            size: Vec2::new(width, height),
        }
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.pos.x
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.pos.x + self.size.x
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.pos.y
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.pos.y + self.size.y
    }

    #[inline]
    pub fn center_x(&self) -> f32 {
        self.pos.x + self.size.x / 2.0
    }

    /// Move by `delta`.  Size is never touched.
    #[inline]
    pub fn translate(&mut self, delta: Vec2) {
        self.pos += delta;
    }
}

/// True when the two boxes overlap.  Shared edges count as contact.
pub fn overlaps(a: &Rect, b: &Rect) -> bool {
    !(a.bottom() < b.top() || a.top() > b.bottom() || a.right() < b.left() || a.left() > b.right())
}

/// Top-left corner that centres a `width`-wide box on `center_x`.
#[inline]
pub fn centered_x(center_x: f32, width: f32) -> f32 {
    center_x - width / 2.0
}
