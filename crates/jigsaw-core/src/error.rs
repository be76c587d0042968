//! Error types for the puzzle workspace

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PuzzleError {
    // Workspace errors
    #[error("Unknown piece: {id}")]
    UnknownPiece { id: String },

    #[error("Piece {id} is already placed")]
    PiecePlaced { id: String },

    // Configuration errors
    #[error("Invalid configuration value for {key}: {reason}")]
    InvalidConfig { key: String, reason: String },

    // Value object errors
    #[error("Invalid geometry: {reason}")]
    InvalidGeometry { reason: String },

    // Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Coarse classification of a [`PuzzleError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    UnknownPiece,
    InvalidOperation,
    Serialization,
    Io,
}

impl PuzzleError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            PuzzleError::UnknownPiece { .. } => ErrorKind::UnknownPiece,
            PuzzleError::PiecePlaced { .. }
            | PuzzleError::InvalidConfig { .. }
            | PuzzleError::InvalidGeometry { .. } => ErrorKind::InvalidOperation,
            PuzzleError::Serialization(_) => ErrorKind::Serialization,
            PuzzleError::Io(_) => ErrorKind::Io,
        }
    }

    pub(crate) fn geometry(reason: impl Into<String>) -> Self {
        PuzzleError::InvalidGeometry { reason: reason.into() }
    }
}

impl From<serde_json::Error> for PuzzleError {
    fn from(err: serde_json::Error) -> Self {
        PuzzleError::Serialization(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, PuzzleError>;
