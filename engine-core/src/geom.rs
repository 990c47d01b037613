//! Small 2D geometry helpers shared by the games
//!
//! Points are `glam::DVec2`. On top of that: rectangles and the handful of
//! tests the games repeat: point in rect, circle against rect, and shortest
//! signed angle between headings.

use std::f64::consts::PI;

/// A 2D vector in surface or world units (y down)
pub use glam::DVec2 as Vec2;

/// Axis-aligned rectangle, origin at the top-left corner
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl Rect {
    pub const fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self { x, y, w, h }
    }

    pub fn right(&self) -> f64 {
        self.x + self.w
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.h
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.w / 2.0, self.y + self.h / 2.0)
    }

    /// Inclusive containment test, matching pointer hit tests on edges
    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.x && p.x <= self.right() && p.y >= self.y && p.y <= self.bottom()
    }

    /// Point of the rectangle nearest to `p`
    pub fn closest_point(&self, p: Vec2) -> Vec2 {
        Vec2::new(p.x.clamp(self.x, self.right()), p.y.clamp(self.y, self.bottom()))
    }

    /// Whether a circle overlaps this rectangle (strictly closer than `radius`)
    pub fn intersects_circle(&self, center: Vec2, radius: f64) -> bool {
        let nearest = self.closest_point(center);
        center.distance_squared(nearest) < radius * radius
    }
}

/// Signed shortest rotation from heading `from` to heading `to`, in (-PI, PI]
pub fn angle_diff(from: f64, to: f64) -> f64 {
    let mut d = (to - from) % (2.0 * PI);
    if d > PI {
        d -= 2.0 * PI;
    } else if d <= -PI {
        d += 2.0 * PI;
    }
    d
}
