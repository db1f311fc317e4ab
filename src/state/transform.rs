// View transform applied to the loaded image: a scale multiplier over the
// fit-to-canvas base size plus the canvas-space position of the image center.

use std::ops::{Add, Sub};

pub const MIN_SCALE: f64 = 0.1;
pub const MAX_SCALE: f64 = 20.0;

/// A point or delta in canvas-local logical pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vec2 {
    pub x: f64,
    pub y: f64,
}

impl Vec2 {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance(self, other: Vec2) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    pub fn midpoint(self, other: Vec2) -> Vec2 {
        Vec2::new((self.x + other.x) / 2.0, (self.y + other.y) / 2.0)
    }
}

impl Add for Vec2 {
    type Output = Vec2;
    fn add(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Vec2 {
    type Output = Vec2;
    fn sub(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub scale: f64,
    pub offset: Vec2,
}

impl Transform {
    /// Identity view: scale 1 with the image center on the canvas midpoint.
    pub fn centered(viewport: Vec2) -> Self {
        Self {
            scale: 1.0,
            offset: Vec2::new(viewport.x / 2.0, viewport.y / 2.0),
        }
    }

    pub fn clamp_scale(scale: f64) -> f64 {
        scale.clamp(MIN_SCALE, MAX_SCALE)
    }

    /// Rescale so that the canvas point `anchor` keeps covering the same
    /// image point before and after the change.
    pub fn rescale_about(&mut self, next_scale: f64, anchor: Vec2) {
        let next = Self::clamp_scale(next_scale);
        let ratio = next / self.scale;
        self.offset = Vec2::new(
            anchor.x - (anchor.x - self.offset.x) * ratio,
            anchor.y - (anchor.y - self.offset.y) * ratio,
        );
        self.scale = next;
    }
}
