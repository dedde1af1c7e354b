//! Axis-aligned rectangle geometry shared by every entity
//!
//! Screen space, integer pixels:
//! - x grows to the right, y grows downward
//! - a rect covers `[x, x + w) × [y, y + h)`

use glam::IVec2;
use serde::{Deserialize, Serialize};

/// Integer bounds of an entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    #[inline]
    pub fn left(&self) -> i32 {
        self.x
    }

    #[inline]
    pub fn right(&self) -> i32 {
        self.x + self.w
    }

    #[inline]
    pub fn top(&self) -> i32 {
        self.y
    }

    #[inline]
    pub fn bottom(&self) -> i32 {
        self.y + self.h
    }

    /// Center point (rounded toward the top-left for odd sizes)
    #[inline]
    pub fn center(&self) -> IVec2 {
        IVec2::new(self.x + self.w / 2, self.y + self.h / 2)
    }

    #[inline]
    pub fn center_x(&self) -> i32 {
        self.x + self.w / 2
    }

    pub fn set_left(&mut self, left: i32) {
        self.x = left;
    }

    pub fn set_right(&mut self, right: i32) {
        self.x = right - self.w;
    }

    pub fn set_center_x(&mut self, cx: i32) {
        self.x = cx - self.w / 2;
    }

    /// Overlap test. Touching edges count as a hit.
    pub fn intersects(&self, other: &Rect) -> bool {
        self.left() <= other.right()
            && other.left() <= self.right()
            && self.top() <= other.bottom()
            && other.top() <= self.bottom()
    }

    pub fn move_by(&mut self, dx: i32, dy: i32) {
        self.x += dx;
        self.y += dy;
    }

    /// Keep the horizontal center within `[min, max]`
    pub fn clamp_center_x(&mut self, min: i32, max: i32) {
        let cx = self.center_x();
        if cx < min {
            self.set_center_x(min);
        } else if cx > max {
            self.set_center_x(max);
        }
    }
}
