use std::collections::HashSet;

use crate::error::ConfigError;
use crate::snake::Position;

/// The set of cells that are in play. Fixed for a session.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Bounds {
    cells: HashSet<Position>,
}

impl Bounds {
    /// Every integer point in `0..=max_x` × `0..=max_y`.
    ///
    /// # Panics
    ///
    /// Panics if either bound is negative, since the rectangle would be empty.
    #[must_use]
    pub fn inclusive(max_x: i32, max_y: i32) -> Self {
        assert!(
            max_x >= 0 && max_y >= 0,
            "inclusive bounds need non-negative maxima, got ({max_x}, {max_y})"
        );
        let cells = (0..=max_x)
            .flat_map(|x| (0..=max_y).map(move |y| Position { x, y }))
            .collect();
        Self { cells }
    }

    /// A `width` × `height` cell grid with its origin at `(0, 0)`.
    pub fn grid(width: u16, height: u16) -> Result<Self, ConfigError> {
        if width == 0 || height == 0 {
            return Err(ConfigError::EmptyGrid { width, height });
        }

        Ok(Self::inclusive(i32::from(width) - 1, i32::from(height) - 1))
    }

    /// Arbitrary cell set, e.g. a board with holes.
    pub fn from_cells(cells: impl IntoIterator<Item = Position>) -> Result<Self, ConfigError> {
        let cells: HashSet<Position> = cells.into_iter().collect();
        if cells.is_empty() {
            return Err(ConfigError::EmptyGrid {
                width: 0,
                height: 0,
            });
        }

        Ok(Self { cells })
    }

    #[must_use]
    pub fn contains(&self, position: Position) -> bool {
        self.cells.contains(&position)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Position> {
        self.cells.iter()
    }

    /// Smallest rectangle `(min, max)` covering every cell.
    #[must_use]
    pub fn extent(&self) -> Option<(Position, Position)> {
        let mut cells = self.cells.iter();
        let first = *cells.next()?;

        Some(cells.fold((first, first), |(min, max), cell| {
            (
                Position::new(min.x.min(cell.x), min.y.min(cell.y)),
                Position::new(max.x.max(cell.x), max.y.max(cell.y)),
            )
        }))
    }
}
