//! Axis-aligned rectangles and overlap tests
//!
//! Every collidable entity is a box. World entities store world-space rects;
//! the player lives in screen space. Callers convert one side with
//! [`Rect::translate_x`] before testing, never mixing the two.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle (top-left origin, y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.x
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.y
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.w / 2.0, self.y + self.h / 2.0)
    }

    /// Copy shifted horizontally (world <-> screen projection)
    #[inline]
    pub fn translate_x(&self, dx: f32) -> Self {
        Self { x: self.x + dx, ..*self }
    }

    /// Copy shifted by a vector
    #[inline]
    pub fn translate(&self, delta: Vec2) -> Self {
        Self {
            x: self.x + delta.x,
            y: self.y + delta.y,
            ..*self
        }
    }

    /// Strict overlap test. Touching edges do not overlap, and degenerate
    /// (zero-area) rects never collide.
    pub fn overlaps(&self, other: &Rect) -> bool {
        if self.w <= 0.0 || self.h <= 0.0 || other.w <= 0.0 || other.h <= 0.0 {
            return false;
        }
        self.x < other.right()
            && self.right() > other.x
            && self.y < other.bottom()
            && self.bottom() > other.y
    }

    /// Overlap that counts as landing on `surface` from above: the bottom edge
    /// has not sunk past the surface's bottom edge.
    pub fn lands_on(&self, surface: &Rect) -> bool {
        self.overlaps(surface) && self.bottom() <= surface.bottom()
    }
}
