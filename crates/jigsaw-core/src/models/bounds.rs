use serde::{Deserialize, Serialize};

use super::{ContentRect, PuzzleCoordinate, Size};
use crate::error::{PuzzleError, Result};

/// Geometry of one piece asset.
///
/// `content_bounds` is the visible extent inside the padded asset frame,
/// `padded_size` is the full asset including transparent padding, and
/// `target_bounds` is where the visible content sits in the assembled puzzle.
/// A piece position always refers to the top-left corner of its content.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "BoundsFields", into = "BoundsFields")]
pub struct PieceBounds {
    content_bounds: ContentRect,
    padded_size: Size,
    target_bounds: ContentRect,
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BoundsFields {
    content_bounds: ContentRect,
    padded_size: Size,
    target_bounds: ContentRect,
}

impl TryFrom<BoundsFields> for PieceBounds {
    type Error = PuzzleError;

    fn try_from(fields: BoundsFields) -> Result<Self> {
        PieceBounds::new(fields.content_bounds, fields.padded_size, fields.target_bounds)
    }
}

impl From<PieceBounds> for BoundsFields {
    fn from(bounds: PieceBounds) -> Self {
        Self {
            content_bounds: bounds.content_bounds,
            padded_size: bounds.padded_size,
            target_bounds: bounds.target_bounds,
        }
    }
}

impl PieceBounds {
    pub fn new(
        content_bounds: ContentRect,
        padded_size: Size,
        target_bounds: ContentRect,
    ) -> Result<Self> {
        if !padded_size.width.is_finite()
            || !padded_size.height.is_finite()
            || padded_size.width < 0.0
            || padded_size.height < 0.0
        {
            return Err(PuzzleError::geometry(format!(
                "padded size {}x{} is invalid",
                padded_size.width, padded_size.height
            )));
        }
        let fits = content_bounds.left() >= 0.0
            && content_bounds.top() >= 0.0
            && content_bounds.right() <= padded_size.width
            && content_bounds.bottom() <= padded_size.height;
        if !fits {
            return Err(PuzzleError::geometry(format!(
                "content bounds {:?} exceed padded size {}x{}",
                content_bounds, padded_size.width, padded_size.height
            )));
        }
        Ok(Self { content_bounds, padded_size, target_bounds })
    }

    /// Bounds for an unpadded asset whose content fills the whole image
    pub fn unpadded(size: Size, target: PuzzleCoordinate) -> Result<Self> {
        let content = ContentRect::from_origin_size(0.0, 0.0, size.width, size.height)?;
        let target_bounds =
            ContentRect::from_origin_size(target.x, target.y, size.width, size.height)?;
        Self::new(content, size, target_bounds)
    }

    pub fn content_bounds(&self) -> &ContentRect {
        &self.content_bounds
    }

    pub fn padded_size(&self) -> Size {
        self.padded_size
    }

    pub fn target_bounds(&self) -> &ContentRect {
        &self.target_bounds
    }

    pub fn content_size(&self) -> Size {
        Size::new(self.content_bounds.width(), self.content_bounds.height())
    }

    /// Visible content rectangle when the piece sits at `position`
    pub fn content_at(&self, position: &PuzzleCoordinate) -> ContentRect {
        self.content_bounds.translate(
            position.x - self.content_bounds.left(),
            position.y - self.content_bounds.top(),
        )
    }

    /// Where the padded asset's origin lands when the piece sits at `position`
    pub fn padded_origin_at(&self, position: &PuzzleCoordinate) -> PuzzleCoordinate {
        position.translate(-self.content_bounds.left(), -self.content_bounds.top())
    }

    /// Share of the padded asset that is visible content, in `0.0..=1.0`
    pub fn content_ratio(&self) -> f64 {
        let padded = self.padded_size.area();
        if padded <= 0.0 {
            return 0.0;
        }
        self.content_bounds.area() / padded
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> PieceBounds {
        PieceBounds::new(
            ContentRect::new(10.0, 20.0, 110.0, 140.0).unwrap(),
            Size::new(256.0, 256.0),
            ContentRect::new(100.0, 0.0, 200.0, 120.0).unwrap(),
        )
        .unwrap()
    }

    #[test]
    fn test_content_must_fit_padding() {
        let result = PieceBounds::new(
            ContentRect::new(0.0, 0.0, 300.0, 10.0).unwrap(),
            Size::new(256.0, 256.0),
            ContentRect::new(0.0, 0.0, 300.0, 10.0).unwrap(),
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_content_at_position() {
        let bounds = sample();
        let placed = bounds.content_at(&PuzzleCoordinate::new(100.0, 0.0));
        assert_eq!(placed, *bounds.target_bounds());
        assert_eq!(
            bounds.padded_origin_at(&PuzzleCoordinate::new(100.0, 0.0)),
            PuzzleCoordinate::new(90.0, -20.0)
        );
    }

    #[test]
    fn test_json_shape() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["contentBounds"]["left"], 10.0);
        assert_eq!(json["paddedSize"]["width"], 256.0);
        assert_eq!(json["targetBounds"]["right"], 200.0);

        let back: PieceBounds = serde_json::from_value(json).unwrap();
        assert_eq!(back, sample());
    }

    #[test]
    fn test_unpadded_and_ratio() {
        let bounds = PieceBounds::unpadded(Size::new(50.0, 40.0), PuzzleCoordinate::new(50.0, 0.0))
            .unwrap();
        assert_eq!(bounds.content_ratio(), 1.0);
        assert_eq!(bounds.target_bounds().left(), 50.0);
        assert_eq!(bounds.content_size(), Size::new(50.0, 40.0));
    }
}
