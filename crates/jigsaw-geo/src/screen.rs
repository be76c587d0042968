//! Device screen points.

use serde::{Deserialize, Serialize};

use crate::validation::{ensure_finite, ensure_positive};
use jigsaw_core::{PuzzleError, Result};

/// A point in physical device pixels together with the device pixel ratio
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ScreenFields", into = "ScreenFields")]
pub struct ScreenPoint {
    x: f64,
    y: f64,
    device_pixel_ratio: f64,
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ScreenFields {
    x: f64,
    y: f64,
    device_pixel_ratio: f64,
}

impl TryFrom<ScreenFields> for ScreenPoint {
    type Error = PuzzleError;

    fn try_from(fields: ScreenFields) -> Result<Self> {
        ScreenPoint::new(fields.x, fields.y, fields.device_pixel_ratio)
    }
}

impl From<ScreenPoint> for ScreenFields {
    fn from(point: ScreenPoint) -> Self {
        Self { x: point.x, y: point.y, device_pixel_ratio: point.device_pixel_ratio }
    }
}

impl ScreenPoint {
    pub fn new(x: f64, y: f64, device_pixel_ratio: f64) -> Result<Self> {
        ensure_finite("screen point", &[x, y])?;
        ensure_positive("device pixel ratio", device_pixel_ratio)?;
        Ok(Self { x, y, device_pixel_ratio })
    }

    /// Build from logical (density independent) pixels
    pub fn from_logical(x: f64, y: f64, device_pixel_ratio: f64) -> Result<Self> {
        ensure_positive("device pixel ratio", device_pixel_ratio)?;
        Self::new(x * device_pixel_ratio, y * device_pixel_ratio, device_pixel_ratio)
    }

    pub fn x(&self) -> f64 {
        self.x
    }

    pub fn y(&self) -> f64 {
        self.y
    }

    pub fn device_pixel_ratio(&self) -> f64 {
        self.device_pixel_ratio
    }

    pub fn logical_x(&self) -> f64 {
        self.x / self.device_pixel_ratio
    }

    pub fn logical_y(&self) -> f64 {
        self.y / self.device_pixel_ratio
    }

    /// Distance in logical pixels, comparable across pixel ratios
    pub fn distance_to(&self, other: &ScreenPoint) -> f64 {
        (self.logical_x() - other.logical_x()).hypot(self.logical_y() - other.logical_y())
    }

    /// Midpoint, expressed at this point's pixel ratio
    pub fn midpoint(&self, other: &ScreenPoint) -> ScreenPoint {
        let dpr = self.device_pixel_ratio;
        ScreenPoint {
            x: (self.logical_x() + other.logical_x()) * 0.5 * dpr,
            y: (self.logical_y() + other.logical_y()) * 0.5 * dpr,
            device_pixel_ratio: dpr,
        }
    }

    /// Offset by physical pixels
    pub fn translate(&self, dx: f64, dy: f64) -> ScreenPoint {
        ScreenPoint { x: self.x + dx, y: self.y + dy, ..*self }
    }

    pub fn scale(&self, factor: f64) -> ScreenPoint {
        ScreenPoint { x: self.x * factor, y: self.y * factor, ..*self }
    }
}
