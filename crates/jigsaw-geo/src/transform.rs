//! Invertible transforms between the coordinate spaces.
//!
//! * [`Viewport`] maps device screen points to canvas points and back.
//! * [`GridMapping`] quantizes canvas points to grid cells and maps cells
//!   back to their canvas rectangles.
//! * [`WorkspaceMapping`] places the canvas inside a workspace region.
//!
//! Every transform rejects non-finite input. Continuous transforms round
//! trip within [`ROUND_TRIP_TOLERANCE`]; the grid mapping round trips
//! exactly from cell to canvas and back.

use serde::{Deserialize, Serialize};

use crate::canvas::CanvasPoint;
use crate::grid::GridPosition;
use crate::region::WorkspaceRegion;
use crate::screen::ScreenPoint;
use crate::validation::{ensure_finite, ensure_positive};
use jigsaw_core::models::{ContentRect, GridSize, Size};
use jigsaw_core::{PuzzleError, Result};

/// Maximum drift allowed after a forward and inverse transform
pub const ROUND_TRIP_TOLERANCE: f64 = 1e-2;

/// Slack for floating error when flooring onto cell boundaries
const CELL_EPSILON: f64 = 1e-9;

/// Pan (logical pixels) and zoom of the canvas on screen
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ViewportFields", into = "ViewportFields")]
pub struct Viewport {
    pan_x: f64,
    pan_y: f64,
    zoom: f64,
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ViewportFields {
    #[serde(default)]
    pan_x: f64,
    #[serde(default)]
    pan_y: f64,
    zoom: f64,
}

impl TryFrom<ViewportFields> for Viewport {
    type Error = PuzzleError;

    fn try_from(fields: ViewportFields) -> Result<Self> {
        Viewport::new(fields.pan_x, fields.pan_y, fields.zoom)
    }
}

impl From<Viewport> for ViewportFields {
    fn from(viewport: Viewport) -> Self {
        Self { pan_x: viewport.pan_x, pan_y: viewport.pan_y, zoom: viewport.zoom }
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self { pan_x: 0.0, pan_y: 0.0, zoom: 1.0 }
    }
}

impl Viewport {
    pub fn new(pan_x: f64, pan_y: f64, zoom: f64) -> Result<Self> {
        ensure_finite("viewport pan", &[pan_x, pan_y])?;
        ensure_positive("viewport zoom", zoom)?;
        Ok(Self { pan_x, pan_y, zoom })
    }

    pub fn pan(&self) -> (f64, f64) {
        (self.pan_x, self.pan_y)
    }

    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    pub fn screen_to_canvas(&self, point: &ScreenPoint) -> Result<CanvasPoint> {
        CanvasPoint::new(
            (point.logical_x() - self.pan_x) / self.zoom,
            (point.logical_y() - self.pan_y) / self.zoom,
        )
    }

    pub fn canvas_to_screen(
        &self,
        point: &CanvasPoint,
        device_pixel_ratio: f64,
    ) -> Result<ScreenPoint> {
        ScreenPoint::from_logical(
            point.x() * self.zoom + self.pan_x,
            point.y() * self.zoom + self.pan_y,
            device_pixel_ratio,
        )
    }

    pub fn pan_by(&self, dx: f64, dy: f64) -> Result<Self> {
        Self::new(self.pan_x + dx, self.pan_y + dy, self.zoom)
    }

    /// Zoom by `factor` keeping the canvas point under `anchor` fixed
    pub fn zoom_at(&self, factor: f64, anchor: &ScreenPoint) -> Result<Self> {
        ensure_positive("zoom factor", factor)?;
        let fixed = self.screen_to_canvas(anchor)?;
        let zoom = self.zoom * factor;
        Self::new(
            anchor.logical_x() - fixed.x() * zoom,
            anchor.logical_y() - fixed.y() * zoom,
            zoom,
        )
    }
}

/// Uniform cell layout of a puzzle grid over the canvas
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridMapping {
    origin_x: f64,
    origin_y: f64,
    cell_width: f64,
    cell_height: f64,
    grid: GridSize,
}

impl GridMapping {
    pub fn new(
        origin_x: f64,
        origin_y: f64,
        cell_width: f64,
        cell_height: f64,
        grid: GridSize,
    ) -> Result<Self> {
        ensure_finite("grid origin", &[origin_x, origin_y])?;
        ensure_positive("cell width", cell_width)?;
        ensure_positive("cell height", cell_height)?;
        Ok(Self { origin_x, origin_y, cell_width, cell_height, grid })
    }

    /// Cells evenly dividing a canvas anchored at the origin
    pub fn for_canvas(canvas: Size, grid: GridSize) -> Result<Self> {
        Self::new(
            0.0,
            0.0,
            canvas.width / grid.cols as f64,
            canvas.height / grid.rows as f64,
            grid,
        )
    }

    pub fn grid(&self) -> GridSize {
        self.grid
    }

    pub fn cell_size(&self) -> Size {
        Size::new(self.cell_width, self.cell_height)
    }

    /// Cell under a canvas point. Cells are half-open, so the far edges of
    /// the grid map to `None`.
    pub fn canvas_to_grid(&self, point: &CanvasPoint) -> Option<GridPosition> {
        let col = ((point.x() - self.origin_x) / self.cell_width + CELL_EPSILON).floor();
        let row = ((point.y() - self.origin_y) / self.cell_height + CELL_EPSILON).floor();
        if col < 0.0 || row < 0.0 || col >= self.grid.cols as f64 || row >= self.grid.rows as f64 {
            return None;
        }
        GridPosition::in_grid(col as u32, row as u32, self.grid).ok()
    }

    /// Top-left corner of a cell
    pub fn grid_to_canvas(&self, cell: &GridPosition) -> Result<CanvasPoint> {
        self.ensure_in_grid(cell)?;
        CanvasPoint::new(
            self.origin_x + cell.x() as f64 * self.cell_width,
            self.origin_y + cell.y() as f64 * self.cell_height,
        )
    }

    pub fn cell_center(&self, cell: &GridPosition) -> Result<CanvasPoint> {
        let corner = self.grid_to_canvas(cell)?;
        Ok(corner.translate(self.cell_width * 0.5, self.cell_height * 0.5))
    }

    /// Canvas rectangle of a cell, tagged with the cell's piece id
    pub fn cell_region(&self, cell: &GridPosition) -> Result<WorkspaceRegion> {
        let corner = self.grid_to_canvas(cell)?;
        let region = WorkspaceRegion::from_origin_size(
            corner.x(),
            corner.y(),
            self.cell_width,
            self.cell_height,
        )?;
        Ok(region.with_id(cell.piece_id()))
    }

    fn ensure_in_grid(&self, cell: &GridPosition) -> Result<()> {
        if !self.grid.contains(cell.row(), cell.col()) {
            return Err(PuzzleError::InvalidGeometry {
                reason: format!("cell ({}, {}) outside grid {}", cell.x(), cell.y(), self.grid),
            });
        }
        Ok(())
    }
}

/// A point in workspace (free-drag area) units
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "PointFields", into = "PointFields")]
pub struct WorkspacePoint {
    pub x: f64,
    pub y: f64,
}

#[derive(Serialize, Deserialize)]
struct PointFields {
    x: f64,
    y: f64,
}

impl TryFrom<PointFields> for WorkspacePoint {
    type Error = PuzzleError;

    fn try_from(fields: PointFields) -> Result<Self> {
        WorkspacePoint::new(fields.x, fields.y)
    }
}

impl From<WorkspacePoint> for PointFields {
    fn from(point: WorkspacePoint) -> Self {
        Self { x: point.x, y: point.y }
    }
}

impl WorkspacePoint {
    pub fn new(x: f64, y: f64) -> Result<Self> {
        ensure_finite("workspace point", &[x, y])?;
        Ok(Self { x, y })
    }
}

/// Placement of the canvas inside the workspace: `workspace = canvas * scale + offset`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "MappingFields", into = "MappingFields")]
pub struct WorkspaceMapping {
    offset_x: f64,
    offset_y: f64,
    scale: f64,
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MappingFields {
    offset_x: f64,
    offset_y: f64,
    scale: f64,
}

impl TryFrom<MappingFields> for WorkspaceMapping {
    type Error = PuzzleError;

    fn try_from(fields: MappingFields) -> Result<Self> {
        WorkspaceMapping::new(fields.offset_x, fields.offset_y, fields.scale)
    }
}

impl From<WorkspaceMapping> for MappingFields {
    fn from(mapping: WorkspaceMapping) -> Self {
        Self { offset_x: mapping.offset_x, offset_y: mapping.offset_y, scale: mapping.scale }
    }
}

impl WorkspaceMapping {
    pub fn new(offset_x: f64, offset_y: f64, scale: f64) -> Result<Self> {
        ensure_finite("workspace offset", &[offset_x, offset_y])?;
        ensure_positive("workspace scale", scale)?;
        Ok(Self { offset_x, offset_y, scale })
    }

    /// Fit the canvas centred inside `slot`, leaving `margin_frac` of the
    /// slot's short side free on every edge. The canvas is never enlarged.
    pub fn fit(canvas: Size, slot: &WorkspaceRegion, margin_frac: f64) -> Result<Self> {
        ensure_positive("canvas width", canvas.width)?;
        ensure_positive("canvas height", canvas.height)?;
        ensure_finite("margin fraction", &[margin_frac])?;
        let margin = slot.width().min(slot.height()) * margin_frac.clamp(0.0, 0.5);
        let fit_width = (slot.width() - margin * 2.0).max(1.0);
        let fit_height = (slot.height() - margin * 2.0).max(1.0);
        let scale = (fit_width / canvas.width).min(fit_height / canvas.height).min(1.0);
        let offset_x = slot.left() + (slot.width() - canvas.width * scale) * 0.5;
        let offset_y = slot.top() + (slot.height() - canvas.height * scale) * 0.5;
        Self::new(offset_x, offset_y, scale)
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn offset(&self) -> (f64, f64) {
        (self.offset_x, self.offset_y)
    }

    pub fn canvas_to_workspace(&self, point: &CanvasPoint) -> Result<WorkspacePoint> {
        WorkspacePoint::new(
            point.x() * self.scale + self.offset_x,
            point.y() * self.scale + self.offset_y,
        )
    }

    pub fn workspace_to_canvas(&self, point: &WorkspacePoint) -> Result<CanvasPoint> {
        ensure_finite("workspace point", &[point.x, point.y])?;
        CanvasPoint::new(
            (point.x - self.offset_x) / self.scale,
            (point.y - self.offset_y) / self.scale,
        )
    }

    /// Where a canvas rectangle (e.g. piece content) lands in the workspace
    pub fn canvas_rect_to_workspace(&self, rect: &ContentRect) -> Result<WorkspaceRegion> {
        let scaled = rect.scale(self.scale)?.translate(self.offset_x, self.offset_y);
        Ok(WorkspaceRegion::from(scaled))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() <= ROUND_TRIP_TOLERANCE
    }

    #[test]
    fn test_viewport_maps_through_pan_and_zoom() {
        let viewport = Viewport::new(100.0, 50.0, 2.0).unwrap();
        let screen = ScreenPoint::from_logical(300.0, 250.0, 2.0).unwrap();
        let canvas = viewport.screen_to_canvas(&screen).unwrap();
        assert_eq!(canvas, CanvasPoint::new(100.0, 100.0).unwrap());
        assert_eq!(viewport.canvas_to_screen(&canvas, 2.0).unwrap(), screen);
    }

    #[test]
    fn test_viewport_rejects_bad_zoom() {
        assert!(Viewport::new(0.0, 0.0, 0.0).is_err());
        assert!(Viewport::new(f64::NAN, 0.0, 1.0).is_err());
        let anchor = ScreenPoint::new(0.0, 0.0, 1.0).unwrap();
        assert!(Viewport::default().zoom_at(-1.0, &anchor).is_err());
    }

    #[test]
    fn test_zoom_at_keeps_anchor_fixed() {
        let viewport = Viewport::new(10.0, 20.0, 1.5).unwrap();
        let anchor = ScreenPoint::new(400.0, 300.0, 1.0).unwrap();
        let before = viewport.screen_to_canvas(&anchor).unwrap();
        let zoomed = viewport.zoom_at(2.0, &anchor).unwrap();
        let after = zoomed.screen_to_canvas(&anchor).unwrap();
        assert_eq!(zoomed.zoom(), 3.0);
        assert!(close(before.x(), after.x()) && close(before.y(), after.y()));
        assert_eq!(viewport.pan_by(5.0, -5.0).unwrap().pan(), (15.0, 15.0));
    }

    #[test]
    fn test_grid_mapping_cells() {
        let grid = GridSize::new(2, 4).unwrap();
        let mapping = GridMapping::for_canvas(Size::new(400.0, 200.0), grid).unwrap();
        assert_eq!(mapping.cell_size(), Size::new(100.0, 100.0));

        let cell = mapping.canvas_to_grid(&CanvasPoint::new(250.0, 150.0).unwrap()).unwrap();
        assert_eq!((cell.col(), cell.row()), (2, 1));
        assert_eq!(mapping.grid_to_canvas(&cell).unwrap(), CanvasPoint::new(200.0, 100.0).unwrap());
        assert_eq!(mapping.cell_center(&cell).unwrap(), CanvasPoint::new(250.0, 150.0).unwrap());

        let region = mapping.cell_region(&cell).unwrap();
        assert_eq!(region.id(), Some("1_2"));
        assert_eq!(region.area(), 10_000.0);
    }

    #[test]
    fn test_grid_mapping_edges() {
        let grid = GridSize::new(2, 2).unwrap();
        let mapping = GridMapping::for_canvas(Size::new(100.0, 100.0), grid).unwrap();
        assert!(mapping.canvas_to_grid(&CanvasPoint::new(100.0, 10.0).unwrap()).is_none());
        assert!(mapping.canvas_to_grid(&CanvasPoint::new(-0.5, 10.0).unwrap()).is_none());
        assert!(mapping.canvas_to_grid(&CanvasPoint::new(0.0, 0.0).unwrap()).is_some());
        assert!(mapping.grid_to_canvas(&GridPosition::new(2, 0)).is_err());
    }

    #[test]
    fn test_workspace_fit_centres_canvas() {
        let slot = WorkspaceRegion::new(0.0, 0.0, 1000.0, 500.0).unwrap();
        let mapping = WorkspaceMapping::fit(Size::new(2000.0, 1000.0), &slot, 0.1).unwrap();
        // 50 px margin leaves 900x400; height limits the scale
        assert!(close(mapping.scale(), 0.4));
        let top_left = mapping.canvas_to_workspace(&CanvasPoint::new(0.0, 0.0).unwrap()).unwrap();
        assert!(close(top_left.x, 100.0) && close(top_left.y, 50.0));

        let rect = ContentRect::new(0.0, 0.0, 2000.0, 1000.0).unwrap();
        let placed = mapping.canvas_rect_to_workspace(&rect).unwrap();
        assert!(slot.contains_region(&placed));
    }

    #[test]
    fn test_workspace_fit_never_enlarges() {
        let slot = WorkspaceRegion::new(0.0, 0.0, 1000.0, 1000.0).unwrap();
        let mapping = WorkspaceMapping::fit(Size::new(10.0, 10.0), &slot, 0.0).unwrap();
        assert_eq!(mapping.scale(), 1.0);
        assert_eq!(mapping.offset(), (495.0, 495.0));
    }

    #[test]
    fn test_viewport_deserialize_validates_zoom() {
        let viewport: Viewport = serde_json::from_str(r#"{"zoom":2.5}"#).unwrap();
        assert_eq!(viewport, Viewport::new(0.0, 0.0, 2.5).unwrap());
        let json = serde_json::to_string(&viewport).unwrap();
        let back: Viewport = serde_json::from_str(&json).unwrap();
        assert_eq!(back, viewport);

        assert!(serde_json::from_str::<Viewport>(r#"{"zoom":-2}"#).is_err());
        assert!(serde_json::from_str::<Viewport>(r#"{"panX":1,"panY":1,"zoom":0}"#).is_err());
    }

    #[test]
    fn test_workspace_mapping_deserialize_validates_scale() {
        let json = r#"{"offsetX":10,"offsetY":20,"scale":0.5}"#;
        let mapping: WorkspaceMapping = serde_json::from_str(json).unwrap();
        assert_eq!(mapping, WorkspaceMapping::new(10.0, 20.0, 0.5).unwrap());

        let zero = r#"{"offsetX":10,"offsetY":20,"scale":0}"#;
        assert!(serde_json::from_str::<WorkspaceMapping>(zero).is_err());
    }

    #[test]
    fn test_workspace_point_rejects_non_finite() {
        assert!(WorkspacePoint::new(f64::INFINITY, 0.0).is_err());
        let point: WorkspacePoint = serde_json::from_str(r#"{"x":1.5,"y":-2}"#).unwrap();
        assert_eq!(point, WorkspacePoint::new(1.5, -2.0).unwrap());
        assert!(serde_json::from_str::<WorkspacePoint>(r#"{"x":1.5}"#).is_err());
    }

    #[test]
    fn test_workspace_rejects_non_finite() {
        let mapping = WorkspaceMapping::new(0.0, 0.0, 1.0).unwrap();
        assert!(mapping.workspace_to_canvas(&WorkspacePoint { x: f64::NAN, y: 0.0 }).is_err());
        assert!(WorkspaceMapping::new(0.0, 0.0, 0.0).is_err());
    }
}
