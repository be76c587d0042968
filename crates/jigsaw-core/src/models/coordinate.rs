//! Points and sizes in canvas (asset pixel) space.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::ContentRect;

/// A point in original-asset pixel units
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PuzzleCoordinate {
    pub x: f64,
    pub y: f64,
}

impl PuzzleCoordinate {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub const fn origin() -> Self {
        Self::new(0.0, 0.0)
    }

    /// Euclidean distance
    pub fn distance_to(&self, other: &PuzzleCoordinate) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    pub fn manhattan_distance_to(&self, other: &PuzzleCoordinate) -> f64 {
        (self.x - other.x).abs() + (self.y - other.y).abs()
    }

    /// True when `other` lies within `threshold` (inclusive)
    pub fn is_near(&self, other: &PuzzleCoordinate, threshold: f64) -> bool {
        self.distance_to(other) <= threshold
    }

    pub fn translate(&self, dx: f64, dy: f64) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }

    pub fn scale(&self, factor: f64) -> Self {
        Self::new(self.x * factor, self.y * factor)
    }

    /// Linear interpolation; `t = 0` yields `self`, `t = 1` yields `other`
    pub fn lerp(&self, other: &PuzzleCoordinate, t: f64) -> Self {
        Self::new(self.x + (other.x - self.x) * t, self.y + (other.y - self.y) * t)
    }

    pub fn clamp_to(&self, bounds: &ContentRect) -> Self {
        Self::new(
            self.x.clamp(bounds.left(), bounds.right()),
            self.y.clamp(bounds.top(), bounds.bottom()),
        )
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl fmt::Display for PuzzleCoordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.1}, {:.1})", self.x, self.y)
    }
}

/// Width and height of an asset or canvas
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn area(&self) -> f64 {
        self.width * self.height
    }
}
