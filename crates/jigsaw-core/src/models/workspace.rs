use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use uuid::Uuid;

use super::{PuzzleCoordinate, PuzzlePiece, Size};
use crate::error::{PuzzleError, Result};
use crate::placement::{MoveOutcome, Placement, PlacementConfig};
use crate::ports::{Clock, PieceSource, SystemClock};
use crate::scoring::ScoringPolicy;

const BLOCKED_PLACED_MESSAGE: &str = "piece already placed";

/// Grid dimensions, written as `"<rows>x<cols>"`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct GridSize {
    pub rows: u32,
    pub cols: u32,
}

impl GridSize {
    pub fn new(rows: u32, cols: u32) -> Result<Self> {
        if rows == 0 || cols == 0 {
            return Err(PuzzleError::InvalidConfig {
                key: "grid_size".to_string(),
                reason: format!(
                    "grid must have at least one row and column, got {}x{}",
                    rows, cols
                ),
            });
        }
        Ok(Self { rows, cols })
    }

    pub fn piece_count(&self) -> usize {
        self.rows as usize * self.cols as usize
    }

    pub fn contains(&self, row: u32, col: u32) -> bool {
        row < self.rows && col < self.cols
    }
}

impl fmt::Display for GridSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.rows, self.cols)
    }
}

impl FromStr for GridSize {
    type Err = PuzzleError;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || PuzzleError::InvalidConfig {
            key: "grid_size".to_string(),
            reason: format!("expected <rows>x<cols>, got '{}'", s),
        };
        let (rows, cols) = s.trim().split_once(['x', 'X']).ok_or_else(invalid)?;
        let rows = rows.trim().parse::<u32>().map_err(|_| invalid())?;
        let cols = cols.trim().parse::<u32>().map_err(|_| invalid())?;
        GridSize::new(rows, cols)
    }
}

impl TryFrom<String> for GridSize {
    type Error = PuzzleError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<GridSize> for String {
    fn from(grid: GridSize) -> Self {
        grid.to_string()
    }
}

/// A suggested piece and where it belongs
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Hint {
    pub piece_id: String,
    pub target: PuzzleCoordinate,
}

/// Snapshot of partition sizes and counters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkspaceStats {
    pub total: usize,
    pub in_tray: usize,
    pub in_workspace: usize,
    pub placed: usize,
    pub move_count: u32,
    pub hints_used: u32,
}

/// The puzzle workspace aggregate.
///
/// Owns every piece of one puzzle session and is the only place placement
/// policy is applied. Tray, workspace and placed partitions are derived from
/// piece state on demand.
#[derive(Debug, Clone)]
pub struct PuzzleWorkspace {
    id: String,
    puzzle_id: String,
    grid_size: GridSize,
    canvas_size: Size,
    pieces: Vec<PuzzlePiece>,
    index: HashMap<String, usize>,
    /// Piece indices, bottom to top
    z_order: Vec<usize>,
    config: PlacementConfig,
    scoring: ScoringPolicy,
    move_count: u32,
    hints_used: u32,
    started_at: DateTime<Utc>,
    completed_at: Option<DateTime<Utc>>,
    clock: Arc<dyn Clock>,
}

impl PuzzleWorkspace {
    /// Create a workspace from an existing piece list
    pub fn new(
        id: impl Into<String>,
        puzzle_id: impl Into<String>,
        grid_size: GridSize,
        canvas_size: Size,
        pieces: Vec<PuzzlePiece>,
        config: PlacementConfig,
        clock: Arc<dyn Clock>,
    ) -> Result<Self> {
        if pieces.is_empty() {
            return Err(PuzzleError::InvalidConfig {
                key: "pieces".to_string(),
                reason: "a workspace needs at least one piece".to_string(),
            });
        }
        let mut index = HashMap::with_capacity(pieces.len());
        for (i, piece) in pieces.iter().enumerate() {
            if !grid_size.contains(piece.correct_row(), piece.correct_col()) {
                return Err(PuzzleError::InvalidGeometry {
                    reason: format!(
                        "piece {} at row {} col {} lies outside grid {}",
                        piece.id(),
                        piece.correct_row(),
                        piece.correct_col(),
                        grid_size
                    ),
                });
            }
            if index.insert(piece.id().to_string(), i).is_some() {
                return Err(PuzzleError::InvalidConfig {
                    key: "pieces".to_string(),
                    reason: format!("duplicate piece id {}", piece.id()),
                });
            }
        }
        let started_at = clock.now();
        let z_order = (0..pieces.len()).collect();
        Ok(Self {
            id: id.into(),
            puzzle_id: puzzle_id.into(),
            grid_size,
            canvas_size,
            pieces,
            index,
            z_order,
            config,
            scoring: ScoringPolicy::default(),
            move_count: 0,
            hints_used: 0,
            started_at,
            completed_at: None,
            clock,
        })
    }

    /// Build a fresh session with every piece in the tray
    pub fn from_source(
        puzzle_id: impl Into<String>,
        grid_size: GridSize,
        source: &dyn PieceSource,
        config: PlacementConfig,
        clock: Arc<dyn Clock>,
    ) -> Result<Self> {
        let pieces = source
            .pieces(grid_size)?
            .into_iter()
            .map(|r| PuzzlePiece::new(r.piece_id, r.row, r.col, r.target, r.bounds))
            .collect();
        let workspace = Self::new(
            Uuid::new_v4().to_string(),
            puzzle_id,
            grid_size,
            source.canvas_size(),
            pieces,
            config,
            clock,
        )?;
        tracing::info!(
            workspace_id = %workspace.id,
            puzzle_id = %workspace.puzzle_id,
            grid = %grid_size,
            pieces = workspace.pieces.len(),
            "Created workspace"
        );
        Ok(workspace)
    }

    pub fn with_scoring(mut self, scoring: ScoringPolicy) -> Self {
        self.scoring = scoring;
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn puzzle_id(&self) -> &str {
        &self.puzzle_id
    }

    pub fn grid_size(&self) -> GridSize {
        self.grid_size
    }

    pub fn canvas_size(&self) -> Size {
        self.canvas_size
    }

    pub fn config(&self) -> &PlacementConfig {
        &self.config
    }

    pub fn scoring(&self) -> &ScoringPolicy {
        &self.scoring
    }

    pub fn pieces(&self) -> &[PuzzlePiece] {
        &self.pieces
    }

    pub fn piece(&self, id: &str) -> Option<&PuzzlePiece> {
        self.index.get(id).map(|&i| &self.pieces[i])
    }

    pub fn move_count(&self) -> u32 {
        self.move_count
    }

    pub fn hints_used(&self) -> u32 {
        self.hints_used
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    pub fn tray_pieces(&self) -> Vec<&PuzzlePiece> {
        self.pieces.iter().filter(|p| p.is_in_tray()).collect()
    }

    pub fn workspace_pieces(&self) -> Vec<&PuzzlePiece> {
        self.pieces.iter().filter(|p| !p.is_in_tray() && !p.is_placed()).collect()
    }

    pub fn placed_pieces(&self) -> Vec<&PuzzlePiece> {
        self.pieces.iter().filter(|p| p.is_placed()).collect()
    }

    pub fn placed_count(&self) -> usize {
        self.pieces.iter().filter(|p| p.is_placed()).count()
    }

    pub fn is_completed(&self) -> bool {
        self.pieces.iter().all(|p| p.is_placed())
    }

    /// Fraction of pieces placed, `0.0..=1.0`
    pub fn progress(&self) -> f64 {
        self.placed_count() as f64 / self.pieces.len() as f64
    }

    pub fn stats(&self) -> WorkspaceStats {
        let mut stats = WorkspaceStats {
            total: self.pieces.len(),
            in_tray: 0,
            in_workspace: 0,
            placed: 0,
            move_count: self.move_count,
            hints_used: self.hints_used,
        };
        for piece in &self.pieces {
            if piece.is_placed() {
                stats.placed += 1;
            } else if piece.is_in_tray() {
                stats.in_tray += 1;
            } else {
                stats.in_workspace += 1;
            }
        }
        stats
    }

    /// Session time so far, frozen once the puzzle is completed
    pub fn elapsed(&self) -> Duration {
        let end = self.completed_at.unwrap_or_else(|| self.clock.now());
        end - self.started_at
    }

    fn index_of(&self, id: &str) -> Result<usize> {
        self.index.get(id).copied().ok_or_else(|| PuzzleError::UnknownPiece { id: id.to_string() })
    }

    fn raise(&mut self, idx: usize) {
        self.z_order.retain(|&i| i != idx);
        self.z_order.push(idx);
    }

    /// Select a piece for dragging. Position is untouched until `move_piece`.
    pub fn pick_up_piece(&mut self, id: &str) -> Result<&PuzzlePiece> {
        let idx = self.index_of(id)?;
        if self.pieces[idx].is_placed() {
            return Err(PuzzleError::PiecePlaced { id: id.to_string() });
        }
        self.select_index(idx);
        self.raise(idx);
        tracing::debug!(piece_id = %id, "Picked up piece");
        Ok(&self.pieces[idx])
    }

    /// Apply the placement policy to a drag ending at `candidate`
    pub fn move_piece(&mut self, id: &str, candidate: PuzzleCoordinate) -> Result<MoveOutcome> {
        let idx = self.index_of(id)?;
        if self.pieces[idx].is_placed() {
            tracing::debug!(piece_id = %id, "Move blocked, piece already placed");
            return Ok(MoveOutcome::Blocked { message: BLOCKED_PLACED_MESSAGE.to_string() });
        }
        if !candidate.is_finite() {
            return Err(PuzzleError::InvalidGeometry {
                reason: format!("candidate position for {} is not finite", id),
            });
        }

        let now = self.clock.now();
        let target = self.pieces[idx].correct_position();
        let distance = candidate.distance_to(&target);
        let outcome = match self.config.classify(distance) {
            Placement::Snap => {
                self.pieces[idx].snap_to(target, now)?;
                MoveOutcome::Snapped { position: target }
            }
            Placement::Near { intensity } => {
                self.pieces[idx].move_to(candidate, now)?;
                MoveOutcome::Near { position: candidate, proximity_intensity: intensity }
            }
            Placement::Free => {
                self.pieces[idx].move_to(candidate, now)?;
                MoveOutcome::Moved { position: candidate }
            }
        };
        self.move_count += 1;
        self.raise(idx);
        tracing::debug!(piece_id = %id, distance, outcome = ?outcome, "Evaluated move");

        if outcome.is_snapped() {
            tracing::info!(
                piece_id = %id,
                placed = self.placed_count(),
                total = self.pieces.len(),
                "Piece placed"
            );
            self.mark_completed_if_done(now);
        }
        Ok(outcome)
    }

    fn mark_completed_if_done(&mut self, now: DateTime<Utc>) {
        if self.completed_at.is_some() || !self.is_completed() {
            return;
        }
        self.completed_at = Some(now);
        tracing::info!(
            workspace_id = %self.id,
            moves = self.move_count,
            hints = self.hints_used,
            elapsed_secs = (now - self.started_at).num_seconds(),
            "Puzzle completed"
        );
    }

    /// Send a piece on the board back to the tray
    pub fn return_to_tray(&mut self, id: &str) -> Result<()> {
        let idx = self.index_of(id)?;
        if self.pieces[idx].is_placed() {
            return Err(PuzzleError::PiecePlaced { id: id.to_string() });
        }
        self.pieces[idx].return_to_tray();
        Ok(())
    }

    pub fn select_piece(&mut self, id: &str) -> Result<()> {
        let idx = self.index_of(id)?;
        if self.pieces[idx].is_placed() {
            return Err(PuzzleError::PiecePlaced { id: id.to_string() });
        }
        self.select_index(idx);
        Ok(())
    }

    fn select_index(&mut self, idx: usize) {
        for (i, piece) in self.pieces.iter_mut().enumerate() {
            piece.set_selected(i == idx);
        }
    }

    pub fn clear_selection(&mut self) {
        for piece in &mut self.pieces {
            piece.set_selected(false);
        }
    }

    pub fn selected_piece(&self) -> Option<&PuzzlePiece> {
        self.pieces.iter().find(|p| p.is_selected())
    }

    /// Suggest the next piece to place, counting the hint.
    ///
    /// Pieces already on the board come before tray pieces; ties break on
    /// `(row, col)`. Returns `None` once the puzzle is complete.
    pub fn get_hint(&mut self) -> Option<Hint> {
        let piece = self
            .pieces
            .iter()
            .filter(|p| !p.is_placed())
            .min_by_key(|p| (p.is_in_tray(), p.correct_row(), p.correct_col()))?;
        let hint = Hint { piece_id: piece.id().to_string(), target: piece.correct_position() };
        self.hints_used += 1;
        tracing::debug!(piece_id = %hint.piece_id, hints_used = self.hints_used, "Gave hint");
        Some(hint)
    }

    /// Return every piece to the tray and clear the session counters
    pub fn reset(&mut self) {
        for piece in &mut self.pieces {
            piece.return_to_tray();
        }
        self.z_order = (0..self.pieces.len()).collect();
        self.move_count = 0;
        self.hints_used = 0;
        self.completed_at = None;
        self.started_at = self.clock.now();
        tracing::info!(workspace_id = %self.id, "Workspace reset");
    }

    pub fn calculate_score(&self) -> u32 {
        self.scoring.score(self.elapsed(), self.hints_used)
    }

    /// Ids of board pieces whose content covers `point`, topmost first
    pub fn pieces_at(&self, point: &PuzzleCoordinate) -> Vec<&str> {
        self.z_order
            .iter()
            .rev()
            .map(|&i| &self.pieces[i])
            .filter(|p| p.content_rect().map(|r| r.contains(point.x, point.y)).unwrap_or(false))
            .map(|p| p.id())
            .collect()
    }

    /// Pairs of unplaced board pieces whose content rectangles overlap
    pub fn overlapping_pairs(&self) -> Vec<(&str, &str)> {
        let loose: Vec<&PuzzlePiece> = self.workspace_pieces();
        let mut pairs = Vec::new();
        for (i, a) in loose.iter().enumerate() {
            for b in &loose[i + 1..] {
                if a.overlaps_with_at_current_position(b) {
                    pairs.push((a.id(), b.id()));
                }
            }
        }
        pairs
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(&WorkspaceRecord::from(self))?)
    }

    pub fn to_json_value(&self) -> Result<serde_json::Value> {
        Ok(serde_json::to_value(WorkspaceRecord::from(self))?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Self::from_json_with_clock(json, Arc::new(SystemClock))
    }

    pub fn from_json_with_clock(json: &str, clock: Arc<dyn Clock>) -> Result<Self> {
        let record: WorkspaceRecord = serde_json::from_str(json)?;
        Self::from_record(record, clock)
    }

    fn from_record(record: WorkspaceRecord, clock: Arc<dyn Clock>) -> Result<Self> {
        let mut workspace = Self::new(
            record.id,
            record.puzzle_id,
            record.grid_size,
            record.canvas_size,
            record.pieces,
            record.config.unwrap_or_default(),
            clock,
        )
        .map_err(|e| PuzzleError::Serialization(e.to_string()))?;

        workspace.move_count = record.move_count;
        workspace.hints_used = record.hints_used;
        if let Some(started_at) = record.started_at {
            workspace.started_at = started_at;
        }
        if let Some(scoring) = record.scoring {
            scoring.validate().map_err(|e| PuzzleError::Serialization(e.to_string()))?;
            workspace.scoring = scoring;
        }

        let complete = workspace.is_completed();
        workspace.completed_at = match (record.completed_at, complete) {
            (Some(at), true) => Some(at),
            (Some(_), false) => {
                return Err(PuzzleError::Serialization(
                    "completedAt is set but not every piece is placed".to_string(),
                ))
            }
            (None, true) => {
                let inferred = workspace
                    .pieces
                    .iter()
                    .filter_map(|p| p.placement_time())
                    .max()
                    .unwrap_or(workspace.started_at);
                tracing::warn!(
                    workspace_id = %workspace.id,
                    "Saved session is complete without completedAt, using last placement time"
                );
                Some(inferred)
            }
            (None, false) => None,
        };
        Ok(workspace)
    }
}

/// Persisted form of a workspace
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WorkspaceRecord {
    id: String,
    puzzle_id: String,
    grid_size: GridSize,
    canvas_size: Size,
    pieces: Vec<PuzzlePiece>,
    move_count: u32,
    hints_used: u32,
    completed_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    started_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    config: Option<PlacementConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    scoring: Option<ScoringPolicy>,
}

impl From<&PuzzleWorkspace> for WorkspaceRecord {
    fn from(workspace: &PuzzleWorkspace) -> Self {
        Self {
            id: workspace.id.clone(),
            puzzle_id: workspace.puzzle_id.clone(),
            grid_size: workspace.grid_size,
            canvas_size: workspace.canvas_size,
            pieces: workspace.pieces.clone(),
            move_count: workspace.move_count,
            hints_used: workspace.hints_used,
            completed_at: workspace.completed_at,
            started_at: Some(workspace.started_at),
            config: Some(workspace.config),
            scoring: Some(workspace.scoring),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::{ManualClock, StaticPieceSource};
    use chrono::TimeZone;

    fn clock() -> ManualClock {
        ManualClock::new(Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap())
    }

    fn workspace(clock: &ManualClock) -> PuzzleWorkspace {
        let grid = GridSize::new(2, 2).unwrap();
        let source = StaticPieceSource::uniform_grid(Size::new(200.0, 200.0), grid).unwrap();
        PuzzleWorkspace::from_source(
            "sunset",
            grid,
            &source,
            PlacementConfig::default(),
            Arc::new(clock.clone()),
        )
        .unwrap()
    }

    #[test]
    fn test_grid_size_parsing() {
        let grid: GridSize = "8x8".parse().unwrap();
        assert_eq!(grid, GridSize { rows: 8, cols: 8 });
        assert_eq!("3X4".parse::<GridSize>().unwrap().piece_count(), 12);
        assert_eq!(GridSize::new(3, 5).unwrap().to_string(), "3x5");
        assert!("8by8".parse::<GridSize>().is_err());
        assert!("0x4".parse::<GridSize>().is_err());
    }

    #[test]
    fn test_fresh_workspace_starts_in_tray() {
        let clock = clock();
        let ws = workspace(&clock);
        assert_eq!(ws.tray_pieces().len(), 4);
        assert_eq!(ws.placed_count(), 0);
        assert!(!ws.is_completed());
        assert_eq!(ws.completed_at(), None);
        assert!(Uuid::parse_str(ws.id()).is_ok());
    }

    #[test]
    fn test_unknown_piece_is_an_error() {
        let clock = clock();
        let mut ws = workspace(&clock);
        let err = ws.move_piece("9_9", PuzzleCoordinate::origin()).unwrap_err();
        assert!(matches!(err, PuzzleError::UnknownPiece { .. }));
        assert!(ws.pick_up_piece("9_9").is_err());
        assert_eq!(ws.move_count(), 0);
    }

    #[test]
    fn test_pick_up_selects_without_moving() {
        let clock = clock();
        let mut ws = workspace(&clock);
        let piece = ws.pick_up_piece("0_1").unwrap();
        assert!(piece.is_selected());
        assert!(piece.is_in_tray());

        ws.pick_up_piece("1_0").unwrap();
        assert_eq!(ws.selected_piece().map(|p| p.id()), Some("1_0"));
    }

    #[test]
    fn test_non_finite_candidate_rejected() {
        let clock = clock();
        let mut ws = workspace(&clock);
        let err = ws.move_piece("0_0", PuzzleCoordinate::new(f64::NAN, 0.0)).unwrap_err();
        assert!(matches!(err, PuzzleError::InvalidGeometry { .. }));
        assert_eq!(ws.move_count(), 0);
    }

    #[test]
    fn test_hint_prefers_board_pieces() {
        let clock = clock();
        let mut ws = workspace(&clock);
        assert_eq!(ws.get_hint().unwrap().piece_id, "0_0");

        ws.move_piece("1_1", PuzzleCoordinate::new(500.0, 500.0)).unwrap();
        let hint = ws.get_hint().unwrap();
        assert_eq!(hint.piece_id, "1_1");
        assert_eq!(hint.target, PuzzleCoordinate::new(100.0, 100.0));
        assert_eq!(ws.hints_used(), 2);
    }

    #[test]
    fn test_hint_none_when_complete() {
        let clock = clock();
        let mut ws = workspace(&clock);
        for id in ["0_0", "0_1", "1_0", "1_1"] {
            let target = ws.piece(id).unwrap().correct_position();
            ws.move_piece(id, target).unwrap();
        }
        assert_eq!(ws.get_hint(), None);
        assert_eq!(ws.hints_used(), 0);
    }

    #[test]
    fn test_return_to_tray_only_for_loose_pieces() {
        let clock = clock();
        let mut ws = workspace(&clock);
        ws.move_piece("0_1", PuzzleCoordinate::new(300.0, 300.0)).unwrap();
        ws.return_to_tray("0_1").unwrap();
        assert!(ws.piece("0_1").unwrap().is_in_tray());

        ws.move_piece("0_0", PuzzleCoordinate::origin()).unwrap();
        assert!(matches!(ws.return_to_tray("0_0"), Err(PuzzleError::PiecePlaced { .. })));
    }

    #[test]
    fn test_pieces_at_returns_topmost_first() {
        let clock = clock();
        let mut ws = workspace(&clock);
        ws.move_piece("0_0", PuzzleCoordinate::new(300.0, 300.0)).unwrap();
        ws.move_piece("1_1", PuzzleCoordinate::new(350.0, 350.0)).unwrap();

        let hits = ws.pieces_at(&PuzzleCoordinate::new(375.0, 375.0));
        assert_eq!(hits, vec!["1_1", "0_0"]);
        assert_eq!(ws.overlapping_pairs(), vec![("0_0", "1_1")]);

        ws.pick_up_piece("0_0").unwrap();
        assert_eq!(ws.pieces_at(&PuzzleCoordinate::new(375.0, 375.0)), vec!["0_0", "1_1"]);
        assert!(ws.pieces_at(&PuzzleCoordinate::new(-10.0, -10.0)).is_empty());
    }

    #[test]
    fn test_score_uses_elapsed_time_and_hints() {
        let clock = clock();
        let mut ws = workspace(&clock);
        clock.advance(Duration::seconds(100));
        assert_eq!(ws.calculate_score(), 950);

        ws.get_hint();
        assert_eq!(ws.calculate_score(), 900);

        for id in ["0_0", "0_1", "1_0", "1_1"] {
            let target = ws.piece(id).unwrap().correct_position();
            ws.move_piece(id, target).unwrap();
        }
        clock.advance(Duration::seconds(1000));
        assert_eq!(ws.calculate_score(), 900);
    }

    #[test]
    fn test_rejects_duplicate_ids() {
        let clock = clock();
        let ws = workspace(&clock);
        let mut pieces = ws.pieces().to_vec();
        pieces.push(pieces[0].clone());
        let result = PuzzleWorkspace::new(
            "dup",
            "sunset",
            ws.grid_size(),
            ws.canvas_size(),
            pieces,
            PlacementConfig::default(),
            Arc::new(clock.clone()),
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_placed_piece_blocks_before_geometry_check() {
        let clock = clock();
        let mut ws = workspace(&clock);
        ws.move_piece("0_0", PuzzleCoordinate::origin()).unwrap();
        let outcome = ws.move_piece("0_0", PuzzleCoordinate::new(f64::NAN, 0.0)).unwrap();
        assert!(outcome.is_blocked());
        assert_eq!(ws.move_count(), 1);
    }

    #[test]
    fn test_scoring_policy_survives_json() {
        let clock = clock();
        let policy = ScoringPolicy { base_score: 500.0, ..ScoringPolicy::default() };
        let mut ws = workspace(&clock).with_scoring(policy);
        ws.get_hint();
        assert_eq!(ws.calculate_score(), 450);

        let json = ws.to_json().unwrap();
        let restored =
            PuzzleWorkspace::from_json_with_clock(&json, Arc::new(clock.clone())).unwrap();
        assert_eq!(restored.scoring(), &policy);
        assert_eq!(restored.calculate_score(), 450);
    }

    #[test]
    fn test_missing_scoring_uses_default_and_bad_scoring_is_rejected() {
        let clock = clock();
        let ws = workspace(&clock);
        let mut json = ws.to_json_value().unwrap();
        json.as_object_mut().unwrap().remove("scoring");
        let restored = PuzzleWorkspace::from_json(&json.to_string()).unwrap();
        assert_eq!(restored.scoring(), &ScoringPolicy::default());

        json["scoring"] = serde_json::json!({
            "baseScore": 100.0,
            "timePenaltyPerSecond": 0.5,
            "hintPenalty": 50.0,
            "minScore": 200.0
        });
        let err = PuzzleWorkspace::from_json(&json.to_string()).unwrap_err();
        assert!(matches!(err, PuzzleError::Serialization(_)));
    }

    #[test]
    fn test_duplicate_ids_in_json_are_rejected() {
        let clock = clock();
        let ws = workspace(&clock);
        let mut json = ws.to_json_value().unwrap();
        let first = json["pieces"][0].clone();
        json["pieces"].as_array_mut().unwrap().push(first);
        let err = PuzzleWorkspace::from_json(&json.to_string()).unwrap_err();
        assert!(matches!(err, PuzzleError::Serialization(_)));
    }

    #[test]
    fn test_completed_at_must_match_pieces() {
        let clock = clock();
        let ws = workspace(&clock);
        let mut json = ws.to_json_value().unwrap();
        json["completedAt"] = serde_json::json!("2024-01-01T10:00:00Z");
        let err = PuzzleWorkspace::from_json(&json.to_string()).unwrap_err();
        assert!(matches!(err, PuzzleError::Serialization(_)));
    }
}
