use rand::Rng;

use crate::bounds::Bounds;
use crate::food::{self, Apples};
use crate::input::Direction;
use crate::snake::Snake;

/// Shifts every segment forward one cell, dropping the tail.
///
/// A head that cannot step any further in `direction` leaves the snake as is;
/// `will_exceed_bounds` already reports that step as fatal.
#[must_use]
pub fn move_snake(snake: &Snake, direction: Direction) -> Snake {
    let Some(head) = snake.next_head(direction) else {
        return snake.clone();
    };
    let kept = snake.len() - 1;
    Snake::with_head(head, snake.segments().copied().take(kept))
}

/// True iff the projected head is not a member of `bounds`.
#[must_use]
pub fn will_exceed_bounds(bounds: &Bounds, snake: &Snake, direction: Direction) -> bool {
    snake
        .next_head(direction)
        .is_none_or(|head| !bounds.contains(head))
}

/// True iff the projected head lands on a trailing segment of the pre-move body.
///
/// The current tail counts even though a plain move would vacate it.
#[must_use]
pub fn will_hit_itself(snake: &Snake, direction: Direction) -> bool {
    snake
        .next_head(direction)
        .is_some_and(|next| snake.trailing().any(|segment| *segment == next))
}

/// True iff an apple sits on the projected head.
#[must_use]
pub fn will_eat_apple(apples: &Apples, snake: &Snake, direction: Direction) -> bool {
    snake
        .next_head(direction)
        .is_some_and(|head| apples.contains(head))
}

/// Prepends the projected head to the unmodified body and removes the eaten apple.
#[must_use]
pub fn grow_snake(apples: &Apples, snake: &Snake, direction: Direction) -> (Apples, Snake) {
    let Some(head) = snake.next_head(direction) else {
        return (apples.clone(), snake.clone());
    };
    let grown = Snake::with_head(head, snake.segments().copied());
    (apples.without(head), grown)
}

/// Guards and actions the snake machine consults on every tick.
///
/// Guards only look; actions return the next snake and apples.
pub trait Rules {
    fn will_exceed_bounds(&self, bounds: &Bounds, snake: &Snake, direction: Direction) -> bool;

    fn will_hit_itself(&self, snake: &Snake, direction: Direction) -> bool;

    fn will_eat_apple(&self, apples: &Apples, snake: &Snake, direction: Direction) -> bool;

    fn move_snake(&mut self, snake: &Snake, direction: Direction) -> Snake;

    fn grow(
        &mut self,
        bounds: &Bounds,
        apples: &Apples,
        snake: &Snake,
        direction: Direction,
    ) -> (Apples, Snake);
}

/// The plain grid rules with no side effects.
#[derive(Debug, Clone, Copy, Default)]
pub struct GridRules;

impl Rules for GridRules {
    fn will_exceed_bounds(&self, bounds: &Bounds, snake: &Snake, direction: Direction) -> bool {
        will_exceed_bounds(bounds, snake, direction)
    }

    fn will_hit_itself(&self, snake: &Snake, direction: Direction) -> bool {
        will_hit_itself(snake, direction)
    }

    fn will_eat_apple(&self, apples: &Apples, snake: &Snake, direction: Direction) -> bool {
        will_eat_apple(apples, snake, direction)
    }

    fn move_snake(&mut self, snake: &Snake, direction: Direction) -> Snake {
        move_snake(snake, direction)
    }

    fn grow(
        &mut self,
        _bounds: &Bounds,
        apples: &Apples,
        snake: &Snake,
        direction: Direction,
    ) -> (Apples, Snake) {
        grow_snake(apples, snake, direction)
    }
}

/// Grid rules that respawn apples after each growth so the board never runs dry.
#[derive(Debug, Clone)]
pub struct RestockingRules<R> {
    rng: R,
    target: usize,
}

impl<R: Rng> RestockingRules<R> {
    /// Keeps `target` apples on the board while free cells remain.
    #[must_use]
    pub fn new(rng: R, target: usize) -> Self {
        Self { rng, target }
    }
}

impl<R: Rng> Rules for RestockingRules<R> {
    fn will_exceed_bounds(&self, bounds: &Bounds, snake: &Snake, direction: Direction) -> bool {
        will_exceed_bounds(bounds, snake, direction)
    }

    fn will_hit_itself(&self, snake: &Snake, direction: Direction) -> bool {
        will_hit_itself(snake, direction)
    }

    fn will_eat_apple(&self, apples: &Apples, snake: &Snake, direction: Direction) -> bool {
        will_eat_apple(apples, snake, direction)
    }

    fn move_snake(&mut self, snake: &Snake, direction: Direction) -> Snake {
        move_snake(snake, direction)
    }

    fn grow(
        &mut self,
        bounds: &Bounds,
        apples: &Apples,
        snake: &Snake,
        direction: Direction,
    ) -> (Apples, Snake) {
        let (apples, snake) = grow_snake(apples, snake, direction);
        let apples = food::top_up(&mut self.rng, bounds, &snake, apples, self.target);
        (apples, snake)
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use crate::bounds::Bounds;
    use crate::food::Apples;
    use crate::input::Direction;
    use crate::snake::{Position, Snake};

    use super::{
        grow_snake, move_snake, will_eat_apple, will_exceed_bounds, will_hit_itself,
        RestockingRules, Rules,
    };

    fn snake(cells: &[(i32, i32)]) -> Snake {
        Snake::from_segments(cells.iter().copied().map(Position::from).collect())
            .expect("non-empty snake")
    }

    #[test]
    fn single_cell_snake_moves_its_head() {
        let moved = move_snake(&snake(&[(5, 5)]), Direction::Up);

        assert_eq!(moved, snake(&[(5, 4)]));
    }

    #[test]
    fn longer_snake_drops_tail_and_keeps_length() {
        let before = snake(&[(2, 2), (1, 2), (0, 2)]);
        let after = move_snake(&before, Direction::Down);

        assert_eq!(after, snake(&[(2, 3), (2, 2), (1, 2)]));
        assert_eq!(before.len(), 3);
    }

    #[test]
    fn exceed_bounds_checks_projected_head() {
        let bounds = Bounds::inclusive(4, 4);
        let at_edge = snake(&[(4, 2)]);

        assert!(will_exceed_bounds(&bounds, &at_edge, Direction::Right));
        assert!(!will_exceed_bounds(&bounds, &at_edge, Direction::Down));
        assert!(!will_exceed_bounds(&bounds, &at_edge, Direction::Left));
    }

    #[test]
    fn guards_stay_total_at_the_integer_edge() {
        let corner = Position::new(i32::MAX, 0);
        let bounds = Bounds::from_cells([corner]).expect("one cell");
        let apples = Apples::from_positions([corner]);
        let head = Snake::new(corner);

        assert!(will_exceed_bounds(&bounds, &head, Direction::Right));
        assert!(!will_hit_itself(&head, Direction::Right));
        assert!(!will_eat_apple(&apples, &head, Direction::Right));
        assert_eq!(move_snake(&head, Direction::Right), head);
        assert_eq!(grow_snake(&apples, &head, Direction::Right), (apples, head));
    }

    #[test]
    fn lone_head_never_hits_itself() {
        for direction in Direction::ALL {
            assert!(!will_hit_itself(&snake(&[(3, 3)]), direction));
        }
    }

    #[test]
    fn hitting_trailing_segment_is_detected() {
        // Head at (2,2) with a body curling round below it.
        let curled = snake(&[(2, 2), (1, 2), (1, 3), (2, 3), (3, 3), (3, 2)]);

        assert!(will_hit_itself(&curled, Direction::Down));
        assert!(will_hit_itself(&curled, Direction::Left));
        assert!(will_hit_itself(&curled, Direction::Right));
        assert!(!will_hit_itself(&curled, Direction::Up));
    }

    #[test]
    fn current_tail_still_counts_as_body() {
        // A 4-cell square: head would step onto the tail it is about to vacate.
        let square = snake(&[(1, 1), (2, 1), (2, 2), (1, 2)]);

        assert!(will_hit_itself(&square, Direction::Down));
    }

    #[test]
    fn apple_detection_uses_projected_head() {
        let apples = Apples::from_positions([Position::new(5, 3)]);

        assert!(will_eat_apple(&apples, &snake(&[(5, 4)]), Direction::Up));
        assert!(!will_eat_apple(&apples, &snake(&[(5, 4)]), Direction::Left));
        assert!(!will_eat_apple(&apples, &snake(&[(5, 3)]), Direction::Up));
    }

    #[test]
    fn grow_keeps_tail_and_consumes_apple() {
        let apples = Apples::from_positions([Position::new(5, 3), Position::new(0, 0)]);
        let (apples, grown) = grow_snake(&apples, &snake(&[(5, 4)]), Direction::Up);

        assert_eq!(grown, snake(&[(5, 3), (5, 4)]));
        assert_eq!(apples, Apples::from_positions([Position::new(0, 0)]));
    }

    #[test]
    fn restocking_refills_after_growth() {
        let bounds = Bounds::inclusive(9, 9);
        let apples = Apples::from_positions([Position::new(5, 3)]);
        let mut rules = RestockingRules::new(StdRng::seed_from_u64(11), 1);

        let (apples, grown) = rules.grow(&bounds, &apples, &snake(&[(5, 4)]), Direction::Up);

        assert_eq!(grown.len(), 2);
        assert_eq!(apples.len(), 1);
        assert!(!apples.contains(Position::new(5, 3)));
        assert!(apples.iter().all(|apple| !grown.occupies(*apple)));
    }
}
