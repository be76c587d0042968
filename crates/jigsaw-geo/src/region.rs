//! Rectangular regions of the free-drag workspace.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

use crate::validation::ensure_finite;
use jigsaw_core::models::ContentRect;
use jigsaw_core::{PuzzleError, Result};

/// An axis-aligned region with an optional id and free-form metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RegionFields", into = "RegionFields")]
pub struct WorkspaceRegion {
    rect: ContentRect,
    id: Option<String>,
    metadata: BTreeMap<String, Value>,
}

#[derive(Serialize, Deserialize)]
struct RegionFields {
    left: f64,
    top: f64,
    right: f64,
    bottom: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    id: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    metadata: BTreeMap<String, Value>,
}

impl TryFrom<RegionFields> for WorkspaceRegion {
    type Error = PuzzleError;

    fn try_from(fields: RegionFields) -> Result<Self> {
        let rect = ContentRect::new(fields.left, fields.top, fields.right, fields.bottom)?;
        Ok(Self { rect, id: fields.id, metadata: fields.metadata })
    }
}

impl From<WorkspaceRegion> for RegionFields {
    fn from(region: WorkspaceRegion) -> Self {
        Self {
            left: region.rect.left(),
            top: region.rect.top(),
            right: region.rect.right(),
            bottom: region.rect.bottom(),
            id: region.id,
            metadata: region.metadata,
        }
    }
}

impl From<ContentRect> for WorkspaceRegion {
    fn from(rect: ContentRect) -> Self {
        Self { rect, id: None, metadata: BTreeMap::new() }
    }
}

impl WorkspaceRegion {
    pub fn new(left: f64, top: f64, right: f64, bottom: f64) -> Result<Self> {
        Ok(ContentRect::new(left, top, right, bottom)?.into())
    }

    pub fn from_origin_size(x: f64, y: f64, width: f64, height: f64) -> Result<Self> {
        Ok(ContentRect::from_origin_size(x, y, width, height)?.into())
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: Value) -> Self {
        self.metadata.insert(key.into(), value);
        self
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn metadata(&self) -> &BTreeMap<String, Value> {
        &self.metadata
    }

    pub fn rect(&self) -> &ContentRect {
        &self.rect
    }

    pub fn left(&self) -> f64 {
        self.rect.left()
    }

    pub fn top(&self) -> f64 {
        self.rect.top()
    }

    pub fn right(&self) -> f64 {
        self.rect.right()
    }

    pub fn bottom(&self) -> f64 {
        self.rect.bottom()
    }

    pub fn width(&self) -> f64 {
        self.rect.width()
    }

    pub fn height(&self) -> f64 {
        self.rect.height()
    }

    pub fn area(&self) -> f64 {
        self.rect.area()
    }

    pub fn center(&self) -> (f64, f64) {
        (
            (self.rect.left() + self.rect.right()) * 0.5,
            (self.rect.top() + self.rect.bottom()) * 0.5,
        )
    }

    /// Point containment, edges inclusive
    pub fn contains_point(&self, x: f64, y: f64) -> bool {
        self.rect.contains(x, y)
    }

    pub fn contains_region(&self, other: &WorkspaceRegion) -> bool {
        self.left() <= other.left()
            && self.top() <= other.top()
            && self.right() >= other.right()
            && self.bottom() >= other.bottom()
    }

    /// Interiors overlap; touching edges do not count
    pub fn intersects(&self, other: &WorkspaceRegion) -> bool {
        self.rect.overlaps(&other.rect)
    }

    /// Shared area as an anonymous region
    pub fn intersection(&self, other: &WorkspaceRegion) -> Option<WorkspaceRegion> {
        self.rect.intersection(&other.rect).map(WorkspaceRegion::from)
    }

    /// Bounding region of both; keeps this region's id and metadata
    pub fn union(&self, other: &WorkspaceRegion) -> WorkspaceRegion {
        let rect = ContentRect::new(
            self.left().min(other.left()),
            self.top().min(other.top()),
            self.right().max(other.right()),
            self.bottom().max(other.bottom()),
        )
        .unwrap_or(self.rect);
        WorkspaceRegion { rect, ..self.clone() }
    }

    /// Grow on every side. Negative amounts shrink as in [`Self::contract`].
    pub fn expand(&self, amount: f64) -> Result<WorkspaceRegion> {
        ensure_finite("expand amount", &[amount])?;
        if amount < 0.0 {
            return self.contract(-amount);
        }
        let rect = ContentRect::new(
            self.left() - amount,
            self.top() - amount,
            self.right() + amount,
            self.bottom() + amount,
        )?;
        Ok(WorkspaceRegion { rect, ..self.clone() })
    }

    /// Shrink on every side, collapsing onto the centre instead of inverting
    pub fn contract(&self, amount: f64) -> Result<WorkspaceRegion> {
        ensure_finite("contract amount", &[amount])?;
        if amount < 0.0 {
            return self.expand(-amount);
        }
        let (cx, cy) = self.center();
        let rect = ContentRect::new(
            (self.left() + amount).min(cx),
            (self.top() + amount).min(cy),
            (self.right() - amount).max(cx),
            (self.bottom() - amount).max(cy),
        )?;
        Ok(WorkspaceRegion { rect, ..self.clone() })
    }

    pub fn translate(&self, dx: f64, dy: f64) -> Result<WorkspaceRegion> {
        ensure_finite("translation", &[dx, dy])?;
        Ok(WorkspaceRegion { rect: self.rect.translate(dx, dy), ..self.clone() })
    }

    /// Scale about the origin
    pub fn scale(&self, factor: f64) -> Result<WorkspaceRegion> {
        Ok(WorkspaceRegion { rect: self.rect.scale(factor)?, ..self.clone() })
    }

    pub fn overlap_area(&self, other: &WorkspaceRegion) -> f64 {
        self.rect.overlap_area(&other.rect)
    }

    /// Share of this region covered by `other`, in percent
    pub fn overlap_percentage(&self, other: &WorkspaceRegion) -> f64 {
        let area = self.area();
        if area == 0.0 {
            return 0.0;
        }
        self.overlap_area(other) / area * 100.0
    }

    /// Split into a row-major grid of equal cells. Cell ids are
    /// `"<id>-<row>-<col>"` when this region has an id.
    pub fn split(&self, rows: u32, cols: u32) -> Result<Vec<WorkspaceRegion>> {
        if rows == 0 || cols == 0 {
            return Err(PuzzleError::InvalidGeometry {
                reason: format!("cannot split into {}x{} cells", rows, cols),
            });
        }
        let cell_width = self.width() / cols as f64;
        let cell_height = self.height() / rows as f64;
        let mut cells = Vec::with_capacity(rows as usize * cols as usize);
        for row in 0..rows {
            for col in 0..cols {
                let left = self.left() + col as f64 * cell_width;
                let top = self.top() + row as f64 * cell_height;
                // Last row/column takes the exact outer edge
                let right = if col + 1 == cols { self.right() } else { left + cell_width };
                let bottom = if row + 1 == rows { self.bottom() } else { top + cell_height };
                let mut cell = WorkspaceRegion::new(left, top, right, bottom)?;
                if let Some(id) = &self.id {
                    cell.id = Some(format!("{}-{}-{}", id, row, col));
                }
                cells.push(cell);
            }
        }
        Ok(cells)
    }

    /// Union overlapping regions until no two results overlap
    pub fn merge_overlapping(regions: Vec<WorkspaceRegion>) -> Vec<WorkspaceRegion> {
        let mut merged: Vec<WorkspaceRegion> = Vec::with_capacity(regions.len());
        for region in regions {
            let mut current = region;
            // A union can reach regions it did not overlap before
            while let Some(index) = merged.iter().position(|m| m.intersects(&current)) {
                let existing = merged.remove(index);
                current = existing.union(&current);
            }
            merged.push(current);
        }
        merged
    }
}
