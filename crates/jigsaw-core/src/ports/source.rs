use serde::{Deserialize, Serialize};

use crate::error::{PuzzleError, Result};
use crate::models::{GridSize, PieceBounds, PuzzleCoordinate, Size};

/// Geometry of one piece as supplied by the asset side
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PieceRecord {
    pub piece_id: String,
    pub row: u32,
    pub col: u32,
    pub bounds: PieceBounds,
    pub target: PuzzleCoordinate,
}

/// Port for the per-grid piece geometry a workspace is built from
pub trait PieceSource {
    /// Canvas size of the assembled puzzle
    fn canvas_size(&self) -> Size;

    /// Piece records for the given grid
    fn pieces(&self, grid: GridSize) -> Result<Vec<PieceRecord>>;
}

/// A fixed list of records for a single grid
#[derive(Debug, Clone)]
pub struct StaticPieceSource {
    canvas_size: Size,
    grid: GridSize,
    records: Vec<PieceRecord>,
}

impl StaticPieceSource {
    pub fn new(canvas_size: Size, grid: GridSize, records: Vec<PieceRecord>) -> Self {
        Self { canvas_size, grid, records }
    }

    /// Uniform rectangular pieces tiling the canvas, ids `"<row>_<col>"`
    pub fn uniform_grid(canvas_size: Size, grid: GridSize) -> Result<Self> {
        let piece_size = Size::new(
            canvas_size.width / f64::from(grid.cols),
            canvas_size.height / f64::from(grid.rows),
        );
        let mut records = Vec::with_capacity(grid.piece_count());
        for row in 0..grid.rows {
            for col in 0..grid.cols {
                let target = PuzzleCoordinate::new(
                    f64::from(col) * piece_size.width,
                    f64::from(row) * piece_size.height,
                );
                records.push(PieceRecord {
                    piece_id: format!("{}_{}", row, col),
                    row,
                    col,
                    bounds: PieceBounds::unpadded(piece_size, target)?,
                    target,
                });
            }
        }
        Ok(Self::new(canvas_size, grid, records))
    }
}

impl PieceSource for StaticPieceSource {
    fn canvas_size(&self) -> Size {
        self.canvas_size
    }

    fn pieces(&self, grid: GridSize) -> Result<Vec<PieceRecord>> {
        if grid != self.grid {
            return Err(PuzzleError::InvalidConfig {
                key: "grid_size".to_string(),
                reason: format!("source only provides {}, requested {}", self.grid, grid),
            });
        }
        Ok(self.records.clone())
    }
}
