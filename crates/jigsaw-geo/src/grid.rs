//! Integer cell positions on the puzzle grid.

use serde::{Deserialize, Serialize};

use jigsaw_core::models::GridSize;
use jigsaw_core::{PuzzleError, Result};

/// Compass step on the grid; y grows downward
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Direction {
    North,
    NorthEast,
    East,
    SouthEast,
    South,
    SouthWest,
    West,
    NorthWest,
}

impl Direction {
    pub const CARDINAL: [Direction; 4] =
        [Direction::North, Direction::East, Direction::South, Direction::West];

    pub const ALL: [Direction; 8] = [
        Direction::North,
        Direction::NorthEast,
        Direction::East,
        Direction::SouthEast,
        Direction::South,
        Direction::SouthWest,
        Direction::West,
        Direction::NorthWest,
    ];

    pub fn delta(self) -> (i64, i64) {
        match self {
            Direction::North => (0, -1),
            Direction::NorthEast => (1, -1),
            Direction::East => (1, 0),
            Direction::SouthEast => (1, 1),
            Direction::South => (0, 1),
            Direction::SouthWest => (-1, 1),
            Direction::West => (-1, 0),
            Direction::NorthWest => (-1, -1),
        }
    }

    pub fn opposite(self) -> Direction {
        match self {
            Direction::North => Direction::South,
            Direction::NorthEast => Direction::SouthWest,
            Direction::East => Direction::West,
            Direction::SouthEast => Direction::NorthWest,
            Direction::South => Direction::North,
            Direction::SouthWest => Direction::NorthEast,
            Direction::West => Direction::East,
            Direction::NorthWest => Direction::SouthEast,
        }
    }
}

/// A grid cell. `x` is the column and `y` the row. Optional maxima are
/// exclusive upper limits enforced on construction and when stepping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "GridFields", into = "GridFields")]
pub struct GridPosition {
    x: u32,
    y: u32,
    max_x: Option<u32>,
    max_y: Option<u32>,
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GridFields {
    x: u32,
    y: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    max_x: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    max_y: Option<u32>,
}

impl TryFrom<GridFields> for GridPosition {
    type Error = PuzzleError;

    fn try_from(fields: GridFields) -> Result<Self> {
        GridPosition::checked(fields.x, fields.y, fields.max_x, fields.max_y)
    }
}

impl From<GridPosition> for GridFields {
    fn from(cell: GridPosition) -> Self {
        Self { x: cell.x, y: cell.y, max_x: cell.max_x, max_y: cell.max_y }
    }
}

impl GridPosition {
    pub const fn new(x: u32, y: u32) -> Self {
        Self { x, y, max_x: None, max_y: None }
    }

    pub fn bounded(x: u32, y: u32, max_x: u32, max_y: u32) -> Result<Self> {
        Self::checked(x, y, Some(max_x), Some(max_y))
    }

    /// Each maximum is checked on its own, so a cell may be bounded on one axis
    fn checked(x: u32, y: u32, max_x: Option<u32>, max_y: Option<u32>) -> Result<Self> {
        if max_x.is_some_and(|m| x >= m) || max_y.is_some_and(|m| y >= m) {
            return Err(PuzzleError::InvalidGeometry {
                reason: format!(
                    "cell ({}, {}) outside bounds (max x {:?}, max y {:?})",
                    x, y, max_x, max_y
                ),
            });
        }
        Ok(Self { x, y, max_x, max_y })
    }

    /// Cell bounded by a puzzle grid
    pub fn in_grid(x: u32, y: u32, grid: GridSize) -> Result<Self> {
        Self::bounded(x, y, grid.cols, grid.rows)
    }

    /// Inverse of [`GridPosition::to_index`] for a row-major grid
    pub fn from_index(index: usize, cols: u32, rows: u32) -> Result<Self> {
        let total = cols as usize * rows as usize;
        if cols == 0 || index >= total {
            return Err(PuzzleError::InvalidGeometry {
                reason: format!("index {} outside {}x{} grid", index, rows, cols),
            });
        }
        let x = (index % cols as usize) as u32;
        let y = (index / cols as usize) as u32;
        Self::bounded(x, y, cols, rows)
    }

    pub fn x(&self) -> u32 {
        self.x
    }

    pub fn y(&self) -> u32 {
        self.y
    }

    pub fn row(&self) -> u32 {
        self.y
    }

    pub fn col(&self) -> u32 {
        self.x
    }

    /// Row-major index
    pub fn to_index(&self, cols: u32) -> usize {
        self.y as usize * cols as usize + self.x as usize
    }

    /// Piece id for this cell, `"<row>_<col>"`
    pub fn piece_id(&self) -> String {
        format!("{}_{}", self.y, self.x)
    }

    /// Neighbour in `direction`, `None` past zero or past a maximum
    pub fn step(&self, direction: Direction) -> Option<Self> {
        let (dx, dy) = direction.delta();
        let x = u32::try_from(self.x as i64 + dx).ok()?;
        let y = u32::try_from(self.y as i64 + dy).ok()?;
        if self.max_x.is_some_and(|m| x >= m) || self.max_y.is_some_and(|m| y >= m) {
            return None;
        }
        Some(Self { x, y, ..*self })
    }

    pub fn neighbors4(&self) -> Vec<Self> {
        Direction::CARDINAL.iter().filter_map(|d| self.step(*d)).collect()
    }

    pub fn neighbors8(&self) -> Vec<Self> {
        Direction::ALL.iter().filter_map(|d| self.step(*d)).collect()
    }

    pub fn manhattan_distance(&self, other: &GridPosition) -> u32 {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }

    pub fn chebyshev_distance(&self, other: &GridPosition) -> u32 {
        self.x.abs_diff(other.x).max(self.y.abs_diff(other.y))
    }

    /// Shares an edge with `other`
    pub fn is_adjacent(&self, other: &GridPosition) -> bool {
        self.manhattan_distance(other) == 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_roundtrip() {
        let cell = GridPosition::from_index(7, 3, 4).unwrap();
        assert_eq!((cell.x(), cell.y()), (1, 2));
        assert_eq!(cell.to_index(3), 7);
        assert!(GridPosition::from_index(12, 3, 4).is_err());
        assert!(GridPosition::from_index(0, 0, 4).is_err());
    }

    #[test]
    fn test_bounded_rejects_outside() {
        assert!(GridPosition::bounded(3, 0, 3, 3).is_err());
        let grid = GridSize::new(2, 5).unwrap();
        assert!(GridPosition::in_grid(4, 1, grid).is_ok());
        assert!(GridPosition::in_grid(1, 2, grid).is_err());
    }

    #[test]
    fn test_corner_neighbors() {
        let corner = GridPosition::bounded(0, 0, 3, 3).unwrap();
        assert_eq!(corner.neighbors4().len(), 2);
        assert_eq!(corner.neighbors8().len(), 3);

        let center = GridPosition::bounded(1, 1, 3, 3).unwrap();
        assert_eq!(center.neighbors4().len(), 4);
        assert_eq!(center.neighbors8().len(), 8);

        let far_corner = GridPosition::bounded(2, 2, 3, 3).unwrap();
        assert_eq!(far_corner.step(Direction::East), None);
        assert_eq!(far_corner.step(Direction::West).map(|c| c.x()), Some(1));
    }

    #[test]
    fn test_unbounded_only_stops_at_zero() {
        let cell = GridPosition::new(0, 5);
        assert_eq!(cell.step(Direction::North), Some(GridPosition::new(0, 4)));
        assert_eq!(cell.step(Direction::West), None);
        assert_eq!(cell.step(Direction::SouthEast), Some(GridPosition::new(1, 6)));
    }

    #[test]
    fn test_distances_and_adjacency() {
        let a = GridPosition::new(1, 1);
        let b = GridPosition::new(4, 3);
        assert_eq!(a.manhattan_distance(&b), 5);
        assert_eq!(a.chebyshev_distance(&b), 3);
        assert!(a.is_adjacent(&GridPosition::new(1, 2)));
        assert!(!a.is_adjacent(&GridPosition::new(2, 2)));
    }

    #[test]
    fn test_deserialize_enforces_bounds() {
        let cell: GridPosition =
            serde_json::from_str(r#"{"x":2,"y":0,"maxX":3,"maxY":3}"#).unwrap();
        assert_eq!(cell, GridPosition::bounded(2, 0, 3, 3).unwrap());
        assert_eq!(cell.step(Direction::West).map(|c| c.x()), Some(1));

        let unbounded: GridPosition = serde_json::from_str(r#"{"x":7,"y":4}"#).unwrap();
        assert_eq!(unbounded, GridPosition::new(7, 4));
        assert_eq!(serde_json::to_string(&unbounded).unwrap(), r#"{"x":7,"y":4}"#);

        for outside in [r#"{"x":7,"y":0,"maxX":3,"maxY":3}"#, r#"{"x":0,"y":5,"maxY":5}"#] {
            assert!(serde_json::from_str::<GridPosition>(outside).is_err());
        }
    }

    #[test]
    fn test_piece_id_is_row_then_col() {
        assert_eq!(GridPosition::new(3, 1).piece_id(), "1_3");
        for direction in Direction::ALL {
            assert_eq!(direction.opposite().opposite(), direction);
        }
    }
}
