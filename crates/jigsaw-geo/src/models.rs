//! Geometry models for jigsaw-geo.
//!
//! This module re-exports canonical types from `jigsaw-core` and provides
//! conversions to and from the `geo` crate.

use geo::{Coord, Point, Rect};

pub use jigsaw_core::models::{ContentRect, GridSize, PuzzleCoordinate, Size};
use jigsaw_core::Result;

/// Convert a canonical rectangle to a geo::Rect
pub fn to_geo_rect(rect: &ContentRect) -> Rect {
    Rect::new(
        Coord { x: rect.left(), y: rect.top() },
        Coord { x: rect.right(), y: rect.bottom() },
    )
}

/// Convert a geo::Rect to a canonical rectangle
pub fn from_geo_rect(rect: &Rect) -> Result<ContentRect> {
    ContentRect::new(rect.min().x, rect.min().y, rect.max().x, rect.max().y)
}

/// Extension trait for canvas coordinates with geo-crate conversions
pub trait CoordinateExt {
    fn to_geo(&self) -> Point;
}

impl CoordinateExt for PuzzleCoordinate {
    fn to_geo(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

pub fn from_geo_point(point: &Point) -> PuzzleCoordinate {
    PuzzleCoordinate::new(point.x(), point.y())
}
