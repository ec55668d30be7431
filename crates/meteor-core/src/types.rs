//! Fundamental geometric types.

use glam::DVec2;
use serde::{Deserialize, Serialize};

/// 2D position in screen space (pixels, origin at the top-left corner).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

/// Per-tick displacement (pixels per frame).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Velocity {
    pub dx: f64,
    pub dy: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another position.
    pub fn distance_to(&self, other: &Position) -> f64 {
        self.as_vec2().distance(other.as_vec2())
    }

    /// Point at `distance` from `self` along `angle` (radians, 0 = +x axis).
    pub fn offset_polar(&self, angle: f64, distance: f64) -> Position {
        (self.as_vec2() + DVec2::from_angle(angle) * distance).into()
    }

    pub fn as_vec2(&self) -> DVec2 {
        DVec2::new(self.x, self.y)
    }

    /// Move by one step of the given velocity.
    pub fn step(&mut self, velocity: &Velocity) {
        self.x += velocity.dx;
        self.y += velocity.dy;
    }
}

impl Velocity {
    pub fn new(dx: f64, dy: f64) -> Self {
        Self { dx, dy }
    }

    /// Speed magnitude (pixels per tick).
    pub fn speed(&self) -> f64 {
        DVec2::new(self.dx, self.dy).length()
    }
}

impl From<DVec2> for Position {
    fn from(v: DVec2) -> Self {
        Self { x: v.x, y: v.y }
    }
}

impl From<Position> for DVec2 {
    fn from(p: Position) -> Self {
        p.as_vec2()
    }
}
