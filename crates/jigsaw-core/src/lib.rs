//! Jigsaw Core - Puzzle workspace engine
//!
//! This crate contains the domain models, placement policy, scoring and port
//! definitions for the puzzle workspace. Everything here operates in canvas
//! (asset pixel) coordinates; device and grid spaces live in `jigsaw-geo`.

pub mod assets;
pub mod config;
pub mod error;
pub mod models;
pub mod placement;
pub mod ports;
pub mod scoring;

pub use error::{ErrorKind, PuzzleError, Result};
pub use models::{
    ContentRect, GridSize, Hint, PieceBounds, PieceState, PuzzleCoordinate, PuzzlePiece,
    PuzzleWorkspace, Size, WorkspaceStats,
};
pub use placement::{classify, MoveOutcome, Placement, PlacementConfig};
pub use scoring::ScoringPolicy;
