//! Port trait definitions
//!
//! These traits define the capabilities the workspace depends on but does not own.

pub mod clock;
pub mod source;

pub use clock::{Clock, ManualClock, SystemClock};
pub use source::{PieceRecord, PieceSource, StaticPieceSource};
