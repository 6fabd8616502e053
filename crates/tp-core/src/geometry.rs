//! Pixel-space geometry

use serde::{Deserialize, Serialize};

/// Integer pixel rectangle (origin top-left, y grows downward)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Rightmost column inside the rect
    #[inline]
    pub fn right(&self) -> i32 {
        self.x + self.width - 1
    }

    /// Bottom row inside the rect
    #[inline]
    pub fn bottom(&self) -> i32 {
        self.y + self.height - 1
    }

    #[inline]
    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.x && x <= self.right() && y >= self.y && y <= self.bottom()
    }

    #[inline]
    pub fn contains_y(&self, y: i32) -> bool {
        y >= self.y && y <= self.bottom()
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }
}
