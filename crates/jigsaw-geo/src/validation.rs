use jigsaw_core::{PuzzleError, Result};

/// Reject NaN and infinite inputs
pub fn ensure_finite(what: &str, values: &[f64]) -> Result<()> {
    if let Some(bad) = values.iter().find(|v| !v.is_finite()) {
        return Err(PuzzleError::InvalidGeometry {
            reason: format!("{} must be finite, got {}", what, bad),
        });
    }
    Ok(())
}

/// Reject values that are not strictly positive and finite
pub fn ensure_positive(what: &str, value: f64) -> Result<()> {
    if !value.is_finite() || value <= 0.0 {
        return Err(PuzzleError::InvalidGeometry {
            reason: format!("{} must be positive, got {}", what, value),
        });
    }
    Ok(())
}
