//! Canvas (original-asset pixel) points.
//!
//! Canvas space is the space the workspace engine stores positions in. A
//! `CanvasPoint` may carry the rectangle it is allowed to live in; the
//! arithmetic helpers preserve those bounds and `clamp` enforces them.

use geo::{Distance, Euclidean, Point, Rotate};
use serde::{Deserialize, Serialize};

use crate::validation::ensure_finite;
use jigsaw_core::models::{ContentRect, PuzzleCoordinate};
use jigsaw_core::{PuzzleError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "CanvasFields", into = "CanvasFields")]
pub struct CanvasPoint {
    x: f64,
    y: f64,
    bounds: Option<ContentRect>,
}

#[derive(Serialize, Deserialize)]
struct CanvasFields {
    x: f64,
    y: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    bounds: Option<ContentRect>,
}

impl TryFrom<CanvasFields> for CanvasPoint {
    type Error = PuzzleError;

    fn try_from(fields: CanvasFields) -> Result<Self> {
        ensure_finite("canvas point", &[fields.x, fields.y])?;
        Ok(Self { x: fields.x, y: fields.y, bounds: fields.bounds })
    }
}

impl From<CanvasPoint> for CanvasFields {
    fn from(point: CanvasPoint) -> Self {
        Self { x: point.x, y: point.y, bounds: point.bounds }
    }
}

impl CanvasPoint {
    pub fn new(x: f64, y: f64) -> Result<Self> {
        ensure_finite("canvas point", &[x, y])?;
        Ok(Self { x, y, bounds: None })
    }

    pub fn with_bounds(x: f64, y: f64, bounds: ContentRect) -> Result<Self> {
        ensure_finite("canvas point", &[x, y])?;
        Ok(Self { x, y, bounds: Some(bounds) })
    }

    pub fn x(&self) -> f64 {
        self.x
    }

    pub fn y(&self) -> f64 {
        self.y
    }

    pub fn bounds(&self) -> Option<&ContentRect> {
        self.bounds.as_ref()
    }

    /// True when unbounded or inside the bounds (edges inclusive)
    pub fn is_within_bounds(&self) -> bool {
        self.bounds.map_or(true, |b| b.contains(self.x, self.y))
    }

    fn with_xy(&self, x: f64, y: f64) -> Self {
        Self { x, y, bounds: self.bounds }
    }

    fn to_geo(self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn distance_to(&self, other: &CanvasPoint) -> f64 {
        Euclidean.distance(self.to_geo(), other.to_geo())
    }

    pub fn manhattan_distance_to(&self, other: &CanvasPoint) -> f64 {
        (self.x - other.x).abs() + (self.y - other.y).abs()
    }

    pub fn midpoint(&self, other: &CanvasPoint) -> Self {
        self.lerp(other, 0.5)
    }

    pub fn lerp(&self, other: &CanvasPoint, t: f64) -> Self {
        self.with_xy(self.x + (other.x - self.x) * t, self.y + (other.y - self.y) * t)
    }

    pub fn translate(&self, dx: f64, dy: f64) -> Self {
        self.with_xy(self.x + dx, self.y + dy)
    }

    /// Scale about the origin
    pub fn scale(&self, factor: f64) -> Self {
        self.with_xy(self.x * factor, self.y * factor)
    }

    /// Rotate about `pivot` by `degrees`. With y pointing down a positive
    /// angle turns clockwise on screen.
    pub fn rotate_around(&self, pivot: &CanvasPoint, degrees: f64) -> Self {
        let rotated = self.to_geo().rotate_around_point(degrees, pivot.to_geo());
        self.with_xy(rotated.x(), rotated.y())
    }

    /// Clamp into the carried bounds; unbounded points are returned unchanged
    pub fn clamp(&self) -> Self {
        match self.bounds {
            Some(bounds) => self.clamp_to(&bounds),
            None => *self,
        }
    }

    pub fn clamp_to(&self, bounds: &ContentRect) -> Self {
        self.with_xy(
            self.x.clamp(bounds.left(), bounds.right()),
            self.y.clamp(bounds.top(), bounds.bottom()),
        )
    }

    // Vector operations treat the point as a vector from the origin.

    pub fn dot(&self, other: &CanvasPoint) -> f64 {
        self.x * other.x + self.y * other.y
    }

    /// z component of the 3D cross product
    pub fn cross(&self, other: &CanvasPoint) -> f64 {
        self.x * other.y - self.y * other.x
    }

    pub fn magnitude(&self) -> f64 {
        self.x.hypot(self.y)
    }

    /// Unit vector, or `None` for the zero vector
    pub fn normalize(&self) -> Option<Self> {
        let magnitude = self.magnitude();
        if magnitude == 0.0 || !magnitude.is_finite() {
            return None;
        }
        Some(self.with_xy(self.x / magnitude, self.y / magnitude))
    }

    /// Angle from the positive x axis in radians, in `(-pi, pi]`
    pub fn angle(&self) -> f64 {
        self.y.atan2(self.x)
    }

    /// Unsigned angle between two vectors in radians, `None` if either is zero
    pub fn angle_between(&self, other: &CanvasPoint) -> Option<f64> {
        let denominator = self.magnitude() * other.magnitude();
        if denominator == 0.0 {
            return None;
        }
        Some((self.dot(other) / denominator).clamp(-1.0, 1.0).acos())
    }

    /// Reflect across the line with the given normal
    pub fn reflect(&self, normal: &CanvasPoint) -> Option<Self> {
        let n = normal.normalize()?;
        let d = 2.0 * self.dot(&n);
        Some(self.with_xy(self.x - d * n.x, self.y - d * n.y))
    }
}

impl From<PuzzleCoordinate> for CanvasPoint {
    fn from(coordinate: PuzzleCoordinate) -> Self {
        Self { x: coordinate.x, y: coordinate.y, bounds: None }
    }
}

impl From<CanvasPoint> for PuzzleCoordinate {
    fn from(point: CanvasPoint) -> Self {
        PuzzleCoordinate::new(point.x, point.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(x: f64, y: f64) -> CanvasPoint {
        CanvasPoint::new(x, y).unwrap()
    }

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_rejects_non_finite() {
        assert!(CanvasPoint::new(f64::NAN, 0.0).is_err());
        assert!(CanvasPoint::new(0.0, f64::INFINITY).is_err());
    }

    #[test]
    fn test_distances() {
        assert_eq!(p(0.0, 0.0).distance_to(&p(3.0, 4.0)), 5.0);
        assert_eq!(p(0.0, 0.0).manhattan_distance_to(&p(3.0, -4.0)), 7.0);
        assert_eq!(p(0.0, 0.0).midpoint(&p(10.0, 20.0)), p(5.0, 10.0));
    }

    #[test]
    fn test_rotate_quarter_turn() {
        let rotated = p(2.0, 1.0).rotate_around(&p(1.0, 1.0), 90.0);
        assert!(close(rotated.x(), 1.0));
        assert!(close(rotated.y(), 2.0));
    }

    #[test]
    fn test_clamp_uses_bounds() {
        let bounds = ContentRect::new(0.0, 0.0, 100.0, 50.0).unwrap();
        let point = CanvasPoint::with_bounds(150.0, -10.0, bounds).unwrap();
        assert!(!point.is_within_bounds());
        let clamped = point.clamp();
        assert_eq!((clamped.x(), clamped.y()), (100.0, 0.0));
        assert!(clamped.is_within_bounds());
        assert_eq!(clamped.bounds(), Some(&bounds));
        assert_eq!(p(500.0, 500.0).clamp(), p(500.0, 500.0));
    }

    #[test]
    fn test_vector_ops() {
        assert_eq!(p(1.0, 2.0).dot(&p(3.0, 4.0)), 11.0);
        assert_eq!(p(1.0, 0.0).cross(&p(0.0, 1.0)), 1.0);
        assert_eq!(p(3.0, 4.0).magnitude(), 5.0);
        assert_eq!(p(3.0, 4.0).normalize(), Some(p(0.6, 0.8)));
        assert_eq!(p(0.0, 0.0).normalize(), None);
        assert!(close(p(0.0, 1.0).angle(), std::f64::consts::FRAC_PI_2));
        let right_angle = p(1.0, 0.0).angle_between(&p(0.0, 5.0)).unwrap();
        assert!(close(right_angle, std::f64::consts::FRAC_PI_2));
    }

    #[test]
    fn test_reflect() {
        let reflected = p(1.0, -1.0).reflect(&p(0.0, 2.0)).unwrap();
        assert_eq!(reflected, p(1.0, 1.0));
        assert!(p(1.0, 1.0).reflect(&p(0.0, 0.0)).is_none());
    }

    #[test]
    fn test_serde_keeps_bounds_and_validates_them() {
        let bounds = ContentRect::new(0.0, 0.0, 10.0, 10.0).unwrap();
        let point = CanvasPoint::with_bounds(4.0, 5.0, bounds).unwrap();
        let json = serde_json::to_string(&point).unwrap();
        assert_eq!(serde_json::from_str::<CanvasPoint>(&json).unwrap(), point);
        assert_eq!(serde_json::to_string(&p(1.0, 2.0)).unwrap(), r#"{"x":1.0,"y":2.0}"#);

        let inverted = r#"{"x":1,"y":1,"bounds":{"left":5,"top":0,"right":1,"bottom":1}}"#;
        assert!(serde_json::from_str::<CanvasPoint>(inverted).is_err());
    }

    #[test]
    fn test_puzzle_coordinate_conversion() {
        let coordinate: PuzzleCoordinate = p(12.5, 3.0).into();
        assert_eq!(coordinate, PuzzleCoordinate::new(12.5, 3.0));
        assert_eq!(CanvasPoint::from(coordinate), p(12.5, 3.0));
    }
}
