use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};

use super::{ContentRect, PieceBounds, PuzzleCoordinate};
use crate::error::{PuzzleError, Result};

/// Lifecycle of a single piece
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum PieceState {
    /// Not yet on the board
    #[default]
    InTray,
    /// Positioned on the board but not locked to its target
    Held(PuzzleCoordinate),
    /// Locked at its correct position
    Placed,
}

/// A single puzzle piece.
///
/// Pieces compare and hash by `id` only.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "PieceRecord", into = "PieceRecord")]
pub struct PuzzlePiece {
    id: String,
    correct_row: u32,
    correct_col: u32,
    correct_position: PuzzleCoordinate,
    bounds: PieceBounds,
    state: PieceState,
    is_selected: bool,
    pickup_time: Option<DateTime<Utc>>,
    placement_time: Option<DateTime<Utc>>,
}

impl PuzzlePiece {
    /// Create a piece in the tray
    pub fn new(
        id: impl Into<String>,
        correct_row: u32,
        correct_col: u32,
        correct_position: PuzzleCoordinate,
        bounds: PieceBounds,
    ) -> Self {
        Self {
            id: id.into(),
            correct_row,
            correct_col,
            correct_position,
            bounds,
            state: PieceState::InTray,
            is_selected: false,
            pickup_time: None,
            placement_time: None,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn correct_row(&self) -> u32 {
        self.correct_row
    }

    pub fn correct_col(&self) -> u32 {
        self.correct_col
    }

    pub fn correct_position(&self) -> PuzzleCoordinate {
        self.correct_position
    }

    pub fn bounds(&self) -> &PieceBounds {
        &self.bounds
    }

    pub fn state(&self) -> PieceState {
        self.state
    }

    /// `None` while the piece is in the tray
    pub fn current_position(&self) -> Option<PuzzleCoordinate> {
        match self.state {
            PieceState::InTray => None,
            PieceState::Held(position) => Some(position),
            PieceState::Placed => Some(self.correct_position),
        }
    }

    pub fn is_in_tray(&self) -> bool {
        matches!(self.state, PieceState::InTray)
    }

    pub fn is_placed(&self) -> bool {
        matches!(self.state, PieceState::Placed)
    }

    pub fn is_selected(&self) -> bool {
        self.is_selected
    }

    pub fn pickup_time(&self) -> Option<DateTime<Utc>> {
        self.pickup_time
    }

    pub fn placement_time(&self) -> Option<DateTime<Utc>> {
        self.placement_time
    }

    /// Move the piece onto the board. Placed pieces cannot move.
    pub fn move_to(&mut self, position: PuzzleCoordinate, now: DateTime<Utc>) -> Result<()> {
        match self.state {
            PieceState::Placed => Err(PuzzleError::PiecePlaced { id: self.id.clone() }),
            PieceState::InTray => {
                if self.pickup_time.is_none() {
                    self.pickup_time = Some(now);
                }
                self.state = PieceState::Held(position);
                Ok(())
            }
            PieceState::Held(_) => {
                self.state = PieceState::Held(position);
                Ok(())
            }
        }
    }

    /// Reset to the tray, clearing selection and timestamps
    pub fn return_to_tray(&mut self) {
        self.state = PieceState::InTray;
        self.is_selected = false;
        self.pickup_time = None;
        self.placement_time = None;
    }

    /// Lock the piece at its correct position
    pub fn place_correctly(&mut self, now: DateTime<Utc>) {
        self.state = PieceState::Placed;
        self.is_selected = false;
        self.placement_time = Some(now);
    }

    /// Set the position, placing the piece if `position` is exactly its target
    pub fn snap_to(&mut self, position: PuzzleCoordinate, now: DateTime<Utc>) -> Result<()> {
        if self.is_placed() {
            return Err(PuzzleError::PiecePlaced { id: self.id.clone() });
        }
        if position == self.correct_position {
            if self.pickup_time.is_none() {
                self.pickup_time = Some(now);
            }
            self.place_correctly(now);
            Ok(())
        } else {
            self.move_to(position, now)
        }
    }

    pub fn set_selected(&mut self, selected: bool) {
        self.is_selected = selected;
    }

    /// Distance from the current position to the target, `None` in the tray
    pub fn distance_to_correct(&self) -> Option<f64> {
        self.current_position().map(|p| p.distance_to(&self.correct_position))
    }

    pub fn is_near_correct_position(&self, threshold: f64) -> bool {
        self.distance_to_correct().map(|d| d <= threshold).unwrap_or(false)
    }

    pub fn can_snap_to_position(&self, snap_distance: f64) -> bool {
        !self.is_placed() && self.is_near_correct_position(snap_distance)
    }

    /// Time between pickup and placement, or until `now` while unplaced
    pub fn manipulation_duration(&self, now: DateTime<Utc>) -> Option<Duration> {
        let start = self.pickup_time?;
        let end = self.placement_time.unwrap_or(now);
        Some(end - start)
    }

    /// Content rectangle at the current position, `None` in the tray
    pub fn content_rect(&self) -> Option<ContentRect> {
        self.current_position().map(|p| self.bounds.content_at(&p))
    }

    pub fn overlaps_with_at_current_position(&self, other: &PuzzlePiece) -> bool {
        match (self.content_rect(), other.content_rect()) {
            (Some(a), Some(b)) => a.overlaps(&b),
            _ => false,
        }
    }
}

impl PartialEq for PuzzlePiece {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for PuzzlePiece {}

impl Hash for PuzzlePiece {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

/// Persisted form of a piece
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PieceRecord {
    id: String,
    correct_row: u32,
    correct_col: u32,
    correct_position: PuzzleCoordinate,
    bounds: PieceBounds,
    current_position: Option<PuzzleCoordinate>,
    is_placed: bool,
    #[serde(default)]
    is_selected: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pickup_time: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    placement_time: Option<DateTime<Utc>>,
}

impl TryFrom<PieceRecord> for PuzzlePiece {
    type Error = PuzzleError;

    fn try_from(record: PieceRecord) -> Result<Self> {
        let state = match (record.is_placed, record.current_position) {
            (false, None) => PieceState::InTray,
            (false, Some(position)) => PieceState::Held(position),
            (true, Some(position)) if position == record.correct_position => PieceState::Placed,
            (true, Some(position)) => {
                return Err(PuzzleError::Serialization(format!(
                    "piece {} is placed at {} but its target is {}",
                    record.id, position, record.correct_position
                )))
            }
            (true, None) => {
                return Err(PuzzleError::Serialization(format!(
                    "piece {} is placed without a position",
                    record.id
                )))
            }
        };
        if !record.correct_position.is_finite()
            || state_position(&state).map(|p| !p.is_finite()).unwrap_or(false)
        {
            return Err(PuzzleError::Serialization(format!(
                "piece {} has non-finite coordinates",
                record.id
            )));
        }
        Ok(Self {
            id: record.id,
            correct_row: record.correct_row,
            correct_col: record.correct_col,
            correct_position: record.correct_position,
            bounds: record.bounds,
            is_selected: record.is_selected && state != PieceState::Placed,
            state,
            pickup_time: record.pickup_time,
            placement_time: record.placement_time,
        })
    }
}

fn state_position(state: &PieceState) -> Option<PuzzleCoordinate> {
    match state {
        PieceState::Held(position) => Some(*position),
        _ => None,
    }
}

impl From<PuzzlePiece> for PieceRecord {
    fn from(piece: PuzzlePiece) -> Self {
        Self {
            current_position: piece.current_position(),
            is_placed: piece.is_placed(),
            id: piece.id,
            correct_row: piece.correct_row,
            correct_col: piece.correct_col,
            correct_position: piece.correct_position,
            bounds: piece.bounds,
            is_selected: piece.is_selected,
            pickup_time: piece.pickup_time,
            placement_time: piece.placement_time,
        }
    }
}
