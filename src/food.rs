use rand::Rng;

use crate::bounds::Bounds;
use crate::snake::{Position, Snake};

/// Apples on the board, in spawn order. No two share a cell.
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct Apples {
    positions: Vec<Position>,
}

impl Apples {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds apples from `positions`, keeping the first of any duplicates.
    #[must_use]
    pub fn from_positions(positions: impl IntoIterator<Item = Position>) -> Self {
        let mut apples = Self::new();
        for position in positions {
            apples.push(position);
        }
        apples
    }

    /// Returns true if an apple sits on `position`.
    #[must_use]
    pub fn contains(&self, position: Position) -> bool {
        self.positions.contains(&position)
    }

    /// Returns a copy with every apple on `position` removed.
    #[must_use]
    pub fn without(&self, position: Position) -> Self {
        Self {
            positions: self
                .positions
                .iter()
                .copied()
                .filter(|apple| *apple != position)
                .collect(),
        }
    }

    /// Returns a copy with an extra apple at `position` (no-op on duplicates).
    #[must_use]
    pub fn with(&self, position: Position) -> Self {
        let mut apples = self.clone();
        apples.push(position);
        apples
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Position> {
        self.positions.iter()
    }

    fn push(&mut self, position: Position) {
        if !self.positions.contains(&position) {
            self.positions.push(position);
        }
    }
}

/// Adds one apple on a random in-bounds cell that holds neither snake nor apple.
///
/// Returns `None` when the board has no free cell left.
#[must_use]
pub fn add_apple<R: Rng + ?Sized>(
    rng: &mut R,
    bounds: &Bounds,
    snake: &Snake,
    apples: &Apples,
) -> Option<Apples> {
    spawn_position(rng, bounds, snake, apples).map(|position| apples.with(position))
}

/// Adds apples until `count` are on the board or no free cell remains.
#[must_use]
pub fn seed_apples<R: Rng + ?Sized>(
    rng: &mut R,
    bounds: &Bounds,
    snake: &Snake,
    count: usize,
) -> Apples {
    top_up(rng, bounds, snake, Apples::new(), count)
}

/// Tops `apples` back up to `count`, stopping early when the board is full.
#[must_use]
pub fn top_up<R: Rng + ?Sized>(
    rng: &mut R,
    bounds: &Bounds,
    snake: &Snake,
    mut apples: Apples,
    count: usize,
) -> Apples {
    while apples.len() < count {
        match add_apple(rng, bounds, snake, &apples) {
            Some(next) => apples = next,
            None => break,
        }
    }
    apples
}

/// Picks a free position that is neither snake nor apple.
#[must_use]
pub fn spawn_position<R: Rng + ?Sized>(
    rng: &mut R,
    bounds: &Bounds,
    snake: &Snake,
    apples: &Apples,
) -> Option<Position> {
    let mut candidates: Vec<Position> = bounds
        .iter()
        .copied()
        .filter(|position| !snake.occupies(*position) && !apples.contains(*position))
        .collect();

    if candidates.is_empty() {
        return None;
    }

    // HashSet order is not stable across runs; sort so seeded spawns repeat.
    candidates.sort_unstable_by_key(|position| (position.y, position.x));
    let index = rng.gen_range(0..candidates.len());
    Some(candidates[index])
}
