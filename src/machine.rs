use std::fmt;

use log::{debug, info, trace};

use crate::bounds::Bounds;
use crate::food::Apples;
use crate::input::{Direction, Event};
use crate::rules::Rules;
use crate::snake::Snake;

/// Whether a moving snake may be steered yet.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum Lock {
    /// Heading just changed; no tick has applied it yet.
    Locked,
    /// At least one tick ran in this heading.
    Unlocked,
}

/// Resolved machine state.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum Status {
    Idle,
    Moving { direction: Direction, lock: Lock },
    Dead,
    Paused,
}

impl Status {
    #[must_use]
    pub fn locked(direction: Direction) -> Self {
        Self::Moving {
            direction,
            lock: Lock::Locked,
        }
    }

    #[must_use]
    pub fn unlocked(direction: Direction) -> Self {
        Self::Moving {
            direction,
            lock: Lock::Unlocked,
        }
    }

    /// Heading while moving.
    #[must_use]
    pub fn direction(self) -> Option<Direction> {
        match self {
            Self::Moving { direction, .. } => Some(direction),
            Self::Idle | Self::Dead | Self::Paused => None,
        }
    }

    /// True when ticks can change the board.
    #[must_use]
    pub fn is_moving(self) -> bool {
        matches!(self, Self::Moving { .. })
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => f.write_str("idle"),
            Self::Moving { direction, lock } => {
                let lock = match lock {
                    Lock::Locked => "locked",
                    Lock::Unlocked => "unlocked",
                };
                write!(f, "moving.{direction}.{lock}")
            }
            Self::Dead => f.write_str("dead"),
            Self::Paused => f.write_str("paused"),
        }
    }
}

/// Everything the machine threads through transitions.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct SimulationContext {
    pub bounds: Bounds,
    pub apples: Apples,
    pub snake: Snake,
}

/// Apples and snake a session restarts from.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct ResetData {
    pub apples: Apples,
    pub snake: Snake,
}

/// Context update carried by a transition.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Action {
    Move(Direction),
    Grow(Direction),
    Reset,
}

/// A transition chosen by [`resolve`].
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct Transition {
    pub target: Status,
    pub action: Option<Action>,
}

#[derive(Debug, Clone, Copy)]
enum Guard {
    Always,
    ExceedsBounds,
    HitsItself,
    EatsApple,
    Perpendicular,
}

#[derive(Debug, Clone, Copy)]
enum Effect {
    Move,
    Grow,
    Reset,
}

#[derive(Debug, Clone, Copy)]
enum Target {
    Idle,
    Dead,
    Paused,
    /// `moving.<event direction>.locked`
    Turn,
    /// `moving.<current direction>.unlocked`
    Advance,
}

#[derive(Debug, Clone, Copy)]
struct Row {
    guard: Guard,
    effect: Option<Effect>,
    target: Target,
}

const fn row(guard: Guard, effect: Option<Effect>, target: Target) -> Row {
    Row {
        guard,
        effect,
        target,
    }
}

// Order is load-bearing: death beats eating, bounds beats self.
const TICK: &[Row] = &[
    row(Guard::ExceedsBounds, None, Target::Dead),
    row(Guard::HitsItself, None, Target::Dead),
    row(Guard::EatsApple, Some(Effect::Grow), Target::Advance),
    row(Guard::Always, Some(Effect::Move), Target::Advance),
];

const START: &[Row] = &[row(Guard::Always, None, Target::Turn)];
const STEER: &[Row] = &[row(Guard::Perpendicular, None, Target::Turn)];
const PAUSE: &[Row] = &[row(Guard::Always, None, Target::Paused)];
const RESUME: &[Row] = &[row(Guard::Always, None, Target::Idle)];
const RESTART: &[Row] = &[row(Guard::Always, Some(Effect::Reset), Target::Idle)];

fn table(status: Status, event: Event) -> &'static [Row] {
    let is_direction = event.direction().is_some();

    match (status, event) {
        (Status::Idle, _) if is_direction => START,
        (Status::Moving { .. }, Event::Space) => PAUSE,
        (Status::Moving { .. }, Event::Tick) => TICK,
        (
            Status::Moving {
                lock: Lock::Unlocked,
                ..
            },
            _,
        ) if is_direction => STEER,
        (Status::Dead, Event::Space) => RESTART,
        (Status::Paused, Event::Space) => RESUME,
        (Status::Paused, Event::Escape) => RESTART,
        _ => &[],
    }
}

/// Picks the transition `event` triggers from `status`, or `None` if it is not wired.
///
/// Only guards run here; no context is changed.
pub fn resolve<R: Rules + ?Sized>(
    rules: &R,
    status: Status,
    context: &SimulationContext,
    event: Event,
) -> Option<Transition> {
    let heading = status.direction();
    let requested = event.direction();

    table(status, event).iter().find_map(|row| {
        let holds = match row.guard {
            Guard::Always => true,
            Guard::ExceedsBounds => heading.is_some_and(|direction| {
                rules.will_exceed_bounds(&context.bounds, &context.snake, direction)
            }),
            Guard::HitsItself => {
                heading.is_some_and(|direction| rules.will_hit_itself(&context.snake, direction))
            }
            Guard::EatsApple => heading.is_some_and(|direction| {
                rules.will_eat_apple(&context.apples, &context.snake, direction)
            }),
            Guard::Perpendicular => heading
                .zip(requested)
                .is_some_and(|(current, next)| current.is_perpendicular_to(next)),
        };
        if !holds {
            return None;
        }

        let target = match row.target {
            Target::Idle => Status::Idle,
            Target::Dead => Status::Dead,
            Target::Paused => Status::Paused,
            Target::Turn => Status::locked(requested?),
            Target::Advance => Status::unlocked(heading?),
        };
        let action = match row.effect {
            None => None,
            Some(Effect::Move) => Some(Action::Move(heading?)),
            Some(Effect::Grow) => Some(Action::Grow(heading?)),
            Some(Effect::Reset) => Some(Action::Reset),
        };

        Some(Transition { target, action })
    })
}

type ResetFn = Box<dyn FnMut() -> ResetData>;
type Subscriber = Box<dyn FnMut(&SimulationContext, Status)>;

/// Owns the simulation context and applies events to it.
///
/// ```text
/// idle --dir--> moving.<dir>.locked --TICK--> moving.<dir>.unlocked
///                                     \--TICK (bounds|self)--> dead
/// moving.<dir>.unlocked --perpendicular dir--> moving.<new>.locked
/// moving.* --SPACE--> paused --SPACE--> idle
///                            --ESCAPE--> idle (reset)
/// dead --SPACE--> idle (reset)
/// ```
///
/// Each event looks up an ordered table of `(guard, action, target)` rows and
/// the first row whose guard holds wins.
pub struct SnakeMachine<R> {
    rules: R,
    status: Status,
    context: SimulationContext,
    reset: ResetFn,
    subscriber: Option<Subscriber>,
}

impl<R: Rules> SnakeMachine<R> {
    /// Starts in `idle` with apples and snake from one call to `reset`.
    pub fn new(rules: R, bounds: Bounds, mut reset: impl FnMut() -> ResetData + 'static) -> Self {
        let ResetData { apples, snake } = reset();

        Self {
            rules,
            status: Status::Idle,
            context: SimulationContext {
                bounds,
                apples,
                snake,
            },
            reset: Box::new(reset),
            subscriber: None,
        }
    }

    /// Registers the callback run after every taken transition.
    pub fn subscribe(&mut self, subscriber: impl FnMut(&SimulationContext, Status) + 'static) {
        self.subscriber = Some(Box::new(subscriber));
    }

    #[must_use]
    pub fn status(&self) -> Status {
        self.status
    }

    #[must_use]
    pub fn context(&self) -> &SimulationContext {
        &self.context
    }

    /// Dispatches one event. Returns true when a transition was taken.
    ///
    /// Unwired events leave status and context untouched and notify nobody.
    pub fn send(&mut self, event: Event) -> bool {
        let Some(transition) = resolve(&self.rules, self.status, &self.context, event) else {
            trace!("{event:?} ignored in {}", self.status);
            return false;
        };

        if let Some(action) = transition.action {
            self.apply(action);
        }

        let previous = self.status;
        self.status = transition.target;
        debug!("{event:?}: {previous} -> {}", self.status);

        match self.status {
            Status::Dead => info!("snake died at length {}", self.context.snake.len()),
            Status::Idle if transition.action == Some(Action::Reset) => info!("session reset"),
            _ => {}
        }

        if let Some(subscriber) = self.subscriber.as_mut() {
            subscriber(&self.context, self.status);
        }

        true
    }

    fn apply(&mut self, action: Action) {
        let context = &mut self.context;

        match action {
            Action::Move(direction) => {
                context.snake = self.rules.move_snake(&context.snake, direction);
            }
            Action::Grow(direction) => {
                let (apples, snake) =
                    self.rules
                        .grow(&context.bounds, &context.apples, &context.snake, direction);
                context.apples = apples;
                context.snake = snake;
            }
            Action::Reset => {
                let ResetData { apples, snake } = (self.reset)();
                context.apples = apples;
                context.snake = snake;
            }
        }

        debug_assert!(!context.snake.has_overlap(), "snake overlaps itself after {action:?}");
    }
}

impl<R: fmt::Debug> fmt::Debug for SnakeMachine<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SnakeMachine")
            .field("rules", &self.rules)
            .field("status", &self.status)
            .field("context", &self.context)
            .finish_non_exhaustive()
    }
}
