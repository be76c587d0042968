//! Piece geometry from the asset pipeline's `optimization_metadata.json`.

use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use crate::error::{PuzzleError, Result};
use crate::models::{ContentRect, GridSize, PieceBounds, PuzzleCoordinate, Size};
use crate::ports::{PieceRecord, PieceSource};

#[derive(Debug, Clone, Copy, Deserialize)]
struct CanvasSize {
    width: f64,
    height: f64,
}

/// Bounds as written by the asset tools. `width`/`height` win when present;
/// otherwise they are derived as `right - left` and `bottom - top`, the same
/// way the tools compute them.
#[derive(Debug, Clone, Copy, Deserialize)]
struct MetadataBounds {
    left: f64,
    top: f64,
    #[serde(default)]
    right: Option<f64>,
    #[serde(default)]
    bottom: Option<f64>,
    #[serde(default)]
    width: Option<f64>,
    #[serde(default)]
    height: Option<f64>,
}

impl MetadataBounds {
    fn to_rect(self, piece_id: &str) -> Result<ContentRect> {
        let width = self.width.or_else(|| self.right.map(|r| r - self.left));
        let height = self.height.or_else(|| self.bottom.map(|b| b - self.top));
        match (width, height) {
            (Some(width), Some(height)) => {
                ContentRect::from_origin_size(self.left, self.top, width, height).map_err(|e| {
                    PuzzleError::Serialization(format!("piece {}: {}", piece_id, e))
                })
            }
            _ => Err(PuzzleError::Serialization(format!(
                "piece {}: bounds need width/height or right/bottom",
                piece_id
            ))),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
struct MetadataPiece {
    bounds: MetadataBounds,
    #[serde(default)]
    canvas_size: Option<CanvasSize>,
    #[serde(default)]
    content_hash: Option<String>,
    #[serde(default)]
    cropped_filename: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct MetadataDocument {
    #[serde(default)]
    version: Option<String>,
    canvas_size: CanvasSize,
    pieces: BTreeMap<String, MetadataPiece>,
}

/// Parsed asset metadata for one grid layout
#[derive(Debug, Clone)]
pub struct AssetMetadata {
    version: Option<String>,
    canvas_size: Size,
    pieces: BTreeMap<String, MetadataPiece>,
}

impl AssetMetadata {
    pub fn from_json(json: &str) -> Result<Self> {
        let doc: MetadataDocument = serde_json::from_str(json)?;
        let canvas_size = Size::new(doc.canvas_size.width, doc.canvas_size.height);
        if !(canvas_size.width > 0.0 && canvas_size.height > 0.0) {
            return Err(PuzzleError::Serialization(format!(
                "canvas size {}x{} must be positive",
                canvas_size.width, canvas_size.height
            )));
        }
        Ok(Self { version: doc.version, canvas_size, pieces: doc.pieces })
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        Self::from_json(&content)
    }

    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    pub fn piece_count(&self) -> usize {
        self.pieces.len()
    }

    pub fn content_hash(&self, piece_id: &str) -> Option<&str> {
        self.pieces.get(piece_id)?.content_hash.as_deref()
    }

    pub fn cropped_filename(&self, piece_id: &str) -> Option<&str> {
        self.pieces.get(piece_id)?.cropped_filename.as_deref()
    }

    fn record(&self, piece_id: &str, piece: &MetadataPiece) -> Result<PieceRecord> {
        let (row, col) = parse_piece_id(piece_id)?;
        let content = piece.bounds.to_rect(piece_id)?;
        let padded = piece
            .canvas_size
            .map(|c| Size::new(c.width, c.height))
            .unwrap_or(self.canvas_size);
        let bounds = PieceBounds::new(content, padded, content)
            .map_err(|e| PuzzleError::Serialization(format!("piece {}: {}", piece_id, e)))?;
        Ok(PieceRecord {
            piece_id: piece_id.to_string(),
            row,
            col,
            bounds,
            target: PuzzleCoordinate::new(content.left(), content.top()),
        })
    }
}

impl PieceSource for AssetMetadata {
    fn canvas_size(&self) -> Size {
        self.canvas_size
    }

    fn pieces(&self, grid: GridSize) -> Result<Vec<PieceRecord>> {
        let mut records = self
            .pieces
            .iter()
            .map(|(id, piece)| self.record(id, piece))
            .collect::<Result<Vec<_>>>()?;
        if let Some(outside) = records.iter().find(|r| !grid.contains(r.row, r.col)) {
            return Err(PuzzleError::Serialization(format!(
                "piece {} lies outside grid {}",
                outside.piece_id, grid
            )));
        }
        if records.len() != grid.piece_count() {
            tracing::warn!(
                expected = grid.piece_count(),
                found = records.len(),
                grid = %grid,
                "Asset metadata piece count does not match grid"
            );
        }
        records.sort_by_key(|r| (r.row, r.col));
        Ok(records)
    }
}

/// Split a `"<row>_<col>"` piece id
pub fn parse_piece_id(piece_id: &str) -> Result<(u32, u32)> {
    let invalid = || {
        PuzzleError::Serialization(format!("piece id '{}' is not <row>_<col>", piece_id))
    };
    let (row, col) = piece_id.split_once('_').ok_or_else(invalid)?;
    Ok((row.parse().map_err(|_| invalid())?, col.parse().map_err(|_| invalid())?))
}
