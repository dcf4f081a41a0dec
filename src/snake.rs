use std::collections::VecDeque;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::input::Direction;

/// Grid position in logical cell coordinates.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    #[must_use]
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Returns the neighbouring cell one step in `direction`, or `None` when
    /// that cell is not representable.
    #[must_use]
    pub fn step(self, direction: Direction) -> Option<Self> {
        let (dx, dy) = direction.offset();
        Some(Self {
            x: self.x.checked_add(dx)?,
            y: self.y.checked_add(dy)?,
        })
    }

    /// Returns true when `other` is exactly one grid step away.
    #[must_use]
    pub fn is_adjacent_to(self, other: Self) -> bool {
        let dx = (i64::from(self.x) - i64::from(other.x)).abs();
        let dy = (i64::from(self.y) - i64::from(other.y)).abs();
        dx + dy == 1
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

impl From<(i32, i32)> for Position {
    fn from((x, y): (i32, i32)) -> Self {
        Self { x, y }
    }
}

/// Snake body, head first and tail last. Never empty.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Snake {
    body: VecDeque<Position>,
}

impl Snake {
    /// Creates a one-cell snake at `head`.
    #[must_use]
    pub fn new(head: Position) -> Self {
        let mut body = VecDeque::with_capacity(1);
        body.push_front(head);
        Self { body }
    }

    /// Creates a snake from explicit body segments (front is head).
    pub fn from_segments(segments: Vec<Position>) -> Result<Self, ConfigError> {
        if segments.is_empty() {
            return Err(ConfigError::EmptySnake);
        }

        Ok(Self {
            body: VecDeque::from(segments),
        })
    }

    /// Builds a snake of `head` followed by `rest`.
    pub(crate) fn with_head(head: Position, rest: impl Iterator<Item = Position>) -> Self {
        let mut body = VecDeque::with_capacity(rest.size_hint().0 + 1);
        body.push_back(head);
        body.extend(rest);
        Self { body }
    }

    /// Returns the current head position.
    #[must_use]
    pub fn head(&self) -> Position {
        *self
            .body
            .front()
            .expect("snake body must always contain at least one segment")
    }

    /// Returns the head position after one step in `direction`.
    #[must_use]
    pub fn next_head(&self, direction: Direction) -> Option<Position> {
        self.head().step(direction)
    }

    /// Returns true if any segment occupies `position`.
    #[must_use]
    pub fn occupies(&self, position: Position) -> bool {
        self.body.contains(&position)
    }

    /// Iterates over the segments behind the head.
    pub fn trailing(&self) -> impl Iterator<Item = &Position> {
        self.body.iter().skip(1)
    }

    /// Returns true when two segments share a cell.
    #[must_use]
    pub fn has_overlap(&self) -> bool {
        self.body
            .iter()
            .enumerate()
            .any(|(index, segment)| self.body.iter().skip(index + 1).any(|other| other == segment))
    }

    /// Returns the first segment that does not touch the one before it.
    #[must_use]
    pub fn first_gap(&self) -> Option<Position> {
        self.body
            .iter()
            .zip(self.body.iter().skip(1))
            .find(|(front, back)| !front.is_adjacent_to(**back))
            .map(|(_, back)| *back)
    }

    /// Returns current segment count.
    #[must_use]
    pub fn len(&self) -> usize {
        self.body.len()
    }

    /// Returns true when there are no segments.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    /// Iterates over body segments from head to tail.
    pub fn segments(&self) -> impl DoubleEndedIterator<Item = &Position> + ExactSizeIterator {
        self.body.iter()
    }
}
