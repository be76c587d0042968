//! Jigsaw Geo - Coordinate spaces and transforms
//!
//! This crate holds the value types for the four coordinate spaces the
//! rendering side works in (screen, canvas, grid, workspace region) and the
//! invertible transforms between them. The workspace engine itself only ever
//! sees canvas coordinates.

pub mod canvas;
pub mod grid;
pub mod models;
pub mod region;
pub mod screen;
pub mod transform;
pub mod validation;

pub use canvas::CanvasPoint;
pub use grid::{Direction, GridPosition};
pub use region::WorkspaceRegion;
pub use screen::ScreenPoint;
pub use transform::{GridMapping, Viewport, WorkspaceMapping, WorkspacePoint, ROUND_TRIP_TOLERANCE};
