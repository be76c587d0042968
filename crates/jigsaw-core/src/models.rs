pub mod bounds;
pub mod coordinate;
pub mod piece;
pub mod rect;
pub mod workspace;

pub use bounds::PieceBounds;
pub use coordinate::{PuzzleCoordinate, Size};
pub use piece::{PieceState, PuzzlePiece};
pub use rect::ContentRect;
pub use workspace::{GridSize, Hint, PuzzleWorkspace, WorkspaceStats};
