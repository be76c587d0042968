use serde::{Deserialize, Serialize};

use crate::error::{PuzzleError, Result};

/// Axis-aligned rectangle with `right >= left` and `bottom >= top`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RectFields", into = "RectFields")]
pub struct ContentRect {
    left: f64,
    top: f64,
    right: f64,
    bottom: f64,
}

#[derive(Serialize, Deserialize)]
struct RectFields {
    left: f64,
    top: f64,
    right: f64,
    bottom: f64,
}

impl TryFrom<RectFields> for ContentRect {
    type Error = PuzzleError;

    fn try_from(fields: RectFields) -> Result<Self> {
        ContentRect::new(fields.left, fields.top, fields.right, fields.bottom)
    }
}

impl From<ContentRect> for RectFields {
    fn from(rect: ContentRect) -> Self {
        Self { left: rect.left, top: rect.top, right: rect.right, bottom: rect.bottom }
    }
}

impl ContentRect {
    pub fn new(left: f64, top: f64, right: f64, bottom: f64) -> Result<Self> {
        if ![left, top, right, bottom].iter().all(|v| v.is_finite()) {
            return Err(PuzzleError::geometry("rectangle edges must be finite"));
        }
        if right < left || bottom < top {
            return Err(PuzzleError::geometry(format!(
                "rectangle ({}, {}, {}, {}) has inverted edges",
                left, top, right, bottom
            )));
        }
        Ok(Self { left, top, right, bottom })
    }

    pub fn from_origin_size(x: f64, y: f64, width: f64, height: f64) -> Result<Self> {
        Self::new(x, y, x + width, y + height)
    }

    pub fn left(&self) -> f64 {
        self.left
    }

    pub fn top(&self) -> f64 {
        self.top
    }

    pub fn right(&self) -> f64 {
        self.right
    }

    pub fn bottom(&self) -> f64 {
        self.bottom
    }

    pub fn width(&self) -> f64 {
        self.right - self.left
    }

    pub fn height(&self) -> f64 {
        self.bottom - self.top
    }

    pub fn area(&self) -> f64 {
        self.width() * self.height()
    }

    /// Point containment, edges inclusive
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.left && x <= self.right && y >= self.top && y <= self.bottom
    }

    /// Strict overlap; rectangles that only share an edge do not overlap
    pub fn overlaps(&self, other: &ContentRect) -> bool {
        self.left < other.right
            && self.right > other.left
            && self.top < other.bottom
            && self.bottom > other.top
    }

    pub fn intersection(&self, other: &ContentRect) -> Option<ContentRect> {
        if !self.overlaps(other) {
            return None;
        }
        Some(ContentRect {
            left: self.left.max(other.left),
            top: self.top.max(other.top),
            right: self.right.min(other.right),
            bottom: self.bottom.min(other.bottom),
        })
    }

    pub fn overlap_area(&self, other: &ContentRect) -> f64 {
        self.intersection(other).map(|r| r.area()).unwrap_or(0.0)
    }

    pub fn translate(&self, dx: f64, dy: f64) -> ContentRect {
        ContentRect {
            left: self.left + dx,
            top: self.top + dy,
            right: self.right + dx,
            bottom: self.bottom + dy,
        }
    }

    /// Scales every edge about the origin. Negative factors are rejected.
    pub fn scale(&self, factor: f64) -> Result<ContentRect> {
        if !factor.is_finite() || factor < 0.0 {
            return Err(PuzzleError::geometry(format!("invalid scale factor {}", factor)));
        }
        Ok(ContentRect {
            left: self.left * factor,
            top: self.top * factor,
            right: self.right * factor,
            bottom: self.bottom * factor,
        })
    }
}
