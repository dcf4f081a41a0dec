use std::cell::RefCell;
use std::rc::Rc;

use snaaake::bounds::Bounds;
use snaaake::food::Apples;
use snaaake::input::{Direction, Event};
use snaaake::machine::{ResetData, SnakeMachine, Status};
use snaaake::rules::GridRules;
use snaaake::snake::{Position, Snake};

fn fixed_reset(head: Position, apples: Vec<Position>) -> impl FnMut() -> ResetData + 'static {
    move || ResetData {
        apples: Apples::from_positions(apples.clone()),
        snake: Snake::new(head),
    }
}

fn segments(machine: &SnakeMachine<GridRules>) -> Vec<Position> {
    machine.context().snake.segments().copied().collect()
}

#[test]
fn step_up_then_eat_apple() {
    let mut machine = SnakeMachine::new(
        GridRules,
        Bounds::inclusive(9, 9),
        fixed_reset(Position::new(5, 5), vec![Position::new(5, 3)]),
    );

    machine.send(Event::Up);
    machine.send(Event::Tick);
    assert_eq!(machine.status(), Status::unlocked(Direction::Up));
    assert_eq!(segments(&machine), vec![Position::new(5, 4)]);

    machine.send(Event::Tick);
    assert_eq!(machine.status().to_string(), "moving.up.unlocked");
    assert_eq!(
        segments(&machine),
        vec![Position::new(5, 3), Position::new(5, 4)]
    );
    assert!(machine.context().apples.is_empty());
}

#[test]
fn leaving_left_edge_dies_and_space_resets() {
    let head = Position::new(1, 4);
    let mut reset = fixed_reset(head, vec![Position::new(8, 8)]);
    let expected = reset();
    let mut machine = SnakeMachine::new(GridRules, Bounds::inclusive(9, 9), reset);

    machine.send(Event::Left);
    machine.send(Event::Tick);
    assert_eq!(segments(&machine), vec![Position::new(0, 4)]);

    machine.send(Event::Tick);
    assert_eq!(machine.status(), Status::Dead);
    assert_eq!(segments(&machine), vec![Position::new(0, 4)]);

    machine.send(Event::Space);
    assert_eq!(machine.status(), Status::Idle);
    assert_eq!(machine.context().snake, expected.snake);
    assert_eq!(machine.context().apples, expected.apples);
}

#[test]
fn turning_builds_an_l_and_reversal_is_ignored() {
    let mut machine = SnakeMachine::new(
        GridRules,
        Bounds::inclusive(9, 9),
        fixed_reset(
            Position::new(2, 2),
            vec![Position::new(3, 2), Position::new(4, 2)],
        ),
    );

    machine.send(Event::Right);
    machine.send(Event::Tick);
    machine.send(Event::Tick);
    assert_eq!(machine.context().snake.len(), 3);

    machine.send(Event::Left);
    assert_eq!(machine.status(), Status::unlocked(Direction::Right));

    machine.send(Event::Down);
    machine.send(Event::Up);
    assert_eq!(machine.status(), Status::locked(Direction::Down));

    machine.send(Event::Tick);
    assert_eq!(
        segments(&machine),
        vec![Position::new(4, 3), Position::new(4, 2), Position::new(3, 2)]
    );
}

#[test]
fn circling_into_own_body_dies() {
    let mut machine = SnakeMachine::new(
        GridRules,
        Bounds::inclusive(9, 9),
        fixed_reset(
            Position::new(2, 2),
            vec![
                Position::new(3, 2),
                Position::new(4, 2),
                Position::new(5, 2),
                Position::new(6, 2),
            ],
        ),
    );

    // Eat four apples heading right: length 5, head at (6,2).
    machine.send(Event::Right);
    for _ in 0..4 {
        machine.send(Event::Tick);
    }
    assert_eq!(machine.context().snake.len(), 5);

    for turn in [Event::Down, Event::Left] {
        machine.send(turn);
        machine.send(Event::Tick);
        assert!(machine.status().is_moving());
    }
    assert_eq!(machine.context().snake.head(), Position::new(5, 3));

    // (5,2) is still body.
    machine.send(Event::Up);
    machine.send(Event::Tick);

    assert_eq!(machine.status(), Status::Dead);
    assert_eq!(machine.context().snake.head(), Position::new(5, 3));
}

#[test]
fn ignored_events_do_not_notify() {
    let mut machine = SnakeMachine::new(
        GridRules,
        Bounds::inclusive(9, 9),
        fixed_reset(Position::new(5, 5), Vec::new()),
    );
    let updates = Rc::new(RefCell::new(0_u32));
    let counter = Rc::clone(&updates);
    machine.subscribe(move |_, _| *counter.borrow_mut() += 1);
    let before = machine.context().clone();

    for event in [Event::Space, Event::Escape, Event::Tick] {
        assert!(!machine.send(event));
    }

    assert_eq!(*updates.borrow(), 0);
    assert_eq!(machine.status(), Status::Idle);
    assert_eq!(*machine.context(), before);
}

#[test]
fn resume_from_pause_waits_for_a_direction() {
    let mut machine = SnakeMachine::new(
        GridRules,
        Bounds::inclusive(9, 9),
        fixed_reset(Position::new(5, 5), Vec::new()),
    );

    machine.send(Event::Up);
    machine.send(Event::Tick);
    machine.send(Event::Space);
    machine.send(Event::Space);
    assert_eq!(machine.status(), Status::Idle);

    assert!(!machine.send(Event::Tick));
    assert_eq!(machine.context().snake.head(), Position::new(5, 4));

    machine.send(Event::Down);
    machine.send(Event::Tick);
    assert_eq!(machine.context().snake.head(), Position::new(5, 5));
}
