//! Axis-aligned rectangles shared by obstacles, projectiles and combatants

use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle with a top-left origin
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
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

    /// Rectangle of the given size centered on `(cx, cy)`
    pub fn from_center(cx: f32, cy: f32, w: f32, h: f32) -> Self {
        Self::new(cx - w / 2.0, cy - h / 2.0, w, h)
    }

    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    pub fn center(&self) -> (f32, f32) {
        (self.x + self.w / 2.0, self.y + self.h / 2.0)
    }

    pub fn with_origin(&self, x: f32, y: f32) -> Self {
        Self::new(x, y, self.w, self.h)
    }

    /// Strict overlap test. Touching edges and empty rects never collide.
    pub fn intersects(&self, other: &Rect) -> bool {
        if self.w <= 0.0 || self.h <= 0.0 || other.w <= 0.0 || other.h <= 0.0 {
            return false;
        }
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }

    /// Axis-aligned bounds of this rect after rotating it about its center.
    ///
    /// Rotated obstacles collide against these bounds rather than the exact
    /// rotated shape.
    pub fn rotated_bounds(&self, degrees: f32) -> Self {
        if degrees == 0.0 {
            return *self;
        }
        let (sin, cos) = degrees.to_radians().sin_cos();
        let w = (self.w * cos).abs() + (self.h * sin).abs();
        let h = (self.w * sin).abs() + (self.h * cos).abs();
        let (cx, cy) = self.center();
        Self::from_center(cx, cy, w, h)
    }
}

/// Unit vector for an angle in radians
pub fn direction_from_angle(angle: f32) -> (f32, f32) {
    (angle.cos(), angle.sin())
}
