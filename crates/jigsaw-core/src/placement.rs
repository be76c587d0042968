//! Move evaluation: the three-way snap / proximity / free-move decision.
//!
//! [`classify`] is pure and independent of the workspace so the tolerance
//! policy can be exercised on its own.

use serde::{Deserialize, Serialize};

use crate::error::{PuzzleError, Result};
use crate::models::PuzzleCoordinate;

pub const SNAP_DISTANCE_DEFAULT: f64 = 20.0;
pub const FEEDBACK_DISTANCE_DEFAULT: f64 = 40.0;

/// Per-workspace placement tolerances, `0 <= snap_distance <= feedback_distance`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ConfigFields", into = "ConfigFields")]
pub struct PlacementConfig {
    snap_distance: f64,
    feedback_distance: f64,
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ConfigFields {
    snap_distance: f64,
    feedback_distance: f64,
}

impl TryFrom<ConfigFields> for PlacementConfig {
    type Error = PuzzleError;

    fn try_from(fields: ConfigFields) -> Result<Self> {
        PlacementConfig::new(fields.snap_distance, fields.feedback_distance)
    }
}

impl From<PlacementConfig> for ConfigFields {
    fn from(config: PlacementConfig) -> Self {
        Self { snap_distance: config.snap_distance, feedback_distance: config.feedback_distance }
    }
}

impl Default for PlacementConfig {
    fn default() -> Self {
        Self { snap_distance: SNAP_DISTANCE_DEFAULT, feedback_distance: FEEDBACK_DISTANCE_DEFAULT }
    }
}

impl PlacementConfig {
    pub fn new(snap_distance: f64, feedback_distance: f64) -> Result<Self> {
        if !snap_distance.is_finite() || snap_distance < 0.0 {
            return Err(PuzzleError::InvalidConfig {
                key: "snap_distance".to_string(),
                reason: format!("must be a finite non-negative number, got {}", snap_distance),
            });
        }
        if !feedback_distance.is_finite() || feedback_distance < snap_distance {
            return Err(PuzzleError::InvalidConfig {
                key: "feedback_distance".to_string(),
                reason: format!(
                    "must be finite and at least snap_distance ({}), got {}",
                    snap_distance, feedback_distance
                ),
            });
        }
        Ok(Self { snap_distance, feedback_distance })
    }

    pub fn snap_distance(&self) -> f64 {
        self.snap_distance
    }

    pub fn feedback_distance(&self) -> f64 {
        self.feedback_distance
    }

    pub fn classify(&self, distance: f64) -> Placement {
        classify(distance, self.snap_distance, self.feedback_distance)
    }
}

/// Geometric verdict for a candidate position
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Placement {
    Snap,
    Near { intensity: f64 },
    Free,
}

/// Classify a distance to target against the snap and feedback thresholds.
///
/// Both thresholds are inclusive. Inside the feedback band the intensity is
/// `1 - distance / feedback_distance`, falling to 0 at the feedback edge.
pub fn classify(distance: f64, snap_distance: f64, feedback_distance: f64) -> Placement {
    if distance <= snap_distance {
        Placement::Snap
    } else if distance <= feedback_distance {
        Placement::Near { intensity: proximity_intensity(distance, feedback_distance) }
    } else {
        Placement::Free
    }
}

pub fn proximity_intensity(distance: f64, feedback_distance: f64) -> f64 {
    if feedback_distance <= 0.0 {
        return 0.0;
    }
    (1.0 - distance / feedback_distance).clamp(0.0, 1.0)
}

/// Result of a `move_piece` call
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum MoveOutcome {
    /// Moved freely, away from the target
    Moved { position: PuzzleCoordinate },
    /// Locked onto the exact target
    Snapped { position: PuzzleCoordinate },
    /// Moved inside the feedback band
    #[serde(rename_all = "camelCase")]
    Near { position: PuzzleCoordinate, proximity_intensity: f64 },
    /// Nothing changed
    Blocked { message: String },
}

impl MoveOutcome {
    pub fn position(&self) -> Option<PuzzleCoordinate> {
        match self {
            MoveOutcome::Moved { position }
            | MoveOutcome::Snapped { position }
            | MoveOutcome::Near { position, .. } => Some(*position),
            MoveOutcome::Blocked { .. } => None,
        }
    }

    pub fn proximity_intensity(&self) -> Option<f64> {
        match self {
            MoveOutcome::Near { proximity_intensity, .. } => Some(*proximity_intensity),
            _ => None,
        }
    }

    pub fn is_snapped(&self) -> bool {
        matches!(self, MoveOutcome::Snapped { .. })
    }

    pub fn is_blocked(&self) -> bool {
        matches!(self, MoveOutcome::Blocked { .. })
    }
}
