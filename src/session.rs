use std::cell::Cell;
use std::rc::Rc;

use log::info;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::config::SessionConfig;
use crate::error::ConfigError;
use crate::food;
use crate::input::Event;
use crate::machine::{ResetData, SimulationContext, SnakeMachine, Status};
use crate::rules::RestockingRules;
use crate::timer::FixedStepTimer;

/// Concrete machine used by a playable session.
pub type SessionMachine = SnakeMachine<RestockingRules<StdRng>>;

/// One game: the machine, the timer that drives it, and a redraw flag.
#[derive(Debug)]
pub struct Session {
    machine: SessionMachine,
    timer: FixedStepTimer,
    dirty: Rc<Cell<bool>>,
}

impl Session {
    /// Validates `config` and builds a session sitting in `idle`.
    pub fn new(config: &SessionConfig) -> Result<Self, ConfigError> {
        let (bounds, snake) = config.prepare()?;
        let apple_count = config.apples;
        let seed = config.seed.unwrap_or_else(rand::random);
        info!(
            "new session: {}x{} grid, {} apples, seed {seed}",
            config.grid.width, config.grid.height, apple_count
        );

        let mut reset_rng = StdRng::seed_from_u64(seed);
        let reset_bounds = bounds.clone();
        let reset = move || ResetData {
            apples: food::seed_apples(&mut reset_rng, &reset_bounds, &snake, apple_count),
            snake: snake.clone(),
        };

        let rules = RestockingRules::new(StdRng::seed_from_u64(seed.wrapping_add(1)), apple_count);
        let mut machine = SnakeMachine::new(rules, bounds, reset);

        let dirty = Rc::new(Cell::new(true));
        let flag = Rc::clone(&dirty);
        machine.subscribe(move |_, _| flag.set(true));

        Ok(Self {
            machine,
            timer: FixedStepTimer::new(config.timer()),
            dirty,
        })
    }

    /// Forwards a key event to the machine.
    pub fn send(&mut self, event: Event) -> bool {
        self.machine.send(event)
    }

    /// Feeds one host frame to the timer; every fired tick becomes a `TICK` event.
    pub fn frame(&mut self, timestamp_ms: f64) -> u32 {
        let machine = &mut self.machine;
        self.timer.frame(timestamp_ms, || {
            machine.send(Event::Tick);
        })
    }

    /// Returns true once after any state change since the last call.
    pub fn take_dirty(&mut self) -> bool {
        self.dirty.replace(false)
    }

    #[must_use]
    pub fn status(&self) -> Status {
        self.machine.status()
    }

    #[must_use]
    pub fn context(&self) -> &SimulationContext {
        self.machine.context()
    }
}

#[cfg(test)]
mod tests {
    use crate::config::{GridSize, SessionConfig};
    use crate::input::{Direction, Event};
    use crate::machine::Status;
    use crate::snake::Position;

    use super::Session;

    fn config() -> SessionConfig {
        SessionConfig {
            grid: GridSize {
                width: 10,
                height: 10,
            },
            snake: vec![Position::new(5, 5)],
            apples: 2,
            step_ms: 100,
            max_ticks_per_frame: 8,
            seed: Some(5),
        }
    }

    #[test]
    fn new_session_is_idle_with_seeded_apples() {
        let mut session = Session::new(&config()).expect("valid config");

        assert_eq!(session.status(), Status::Idle);
        assert_eq!(session.context().apples.len(), 2);
        assert!(session.take_dirty());
        assert!(!session.take_dirty());
    }

    #[test]
    fn frames_drive_ticks_only_while_moving() {
        let mut session = Session::new(&config()).expect("valid config");
        session.take_dirty();

        assert_eq!(session.frame(150.0), 1);
        assert!(!session.take_dirty());
        assert_eq!(session.context().snake.head(), Position::new(5, 5));

        session.send(Event::Right);
        session.frame(260.0);

        assert!(session.take_dirty());
        assert_eq!(session.status(), Status::unlocked(Direction::Right));
        assert_eq!(session.context().snake.head(), Position::new(6, 5));
    }

    #[test]
    fn invalid_config_is_rejected() {
        let config = SessionConfig {
            snake: vec![Position::new(50, 50)],
            ..config()
        };

        assert!(Session::new(&config).is_err());
    }

    #[test]
    fn reset_reseeds_apples_and_restores_snake() {
        let mut session = Session::new(&config()).expect("valid config");
        session.send(Event::Left);
        for frame in 1..=6 {
            session.frame(f64::from(frame) * 101.0);
        }
        assert_eq!(session.status(), Status::Dead);

        session.send(Event::Space);

        assert_eq!(session.status(), Status::Idle);
        assert_eq!(session.context().snake.len(), 1);
        assert_eq!(session.context().snake.head(), Position::new(5, 5));
        assert_eq!(session.context().apples.len(), 2);
    }
}
