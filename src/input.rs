use std::fmt;
use std::io;
use std::time::Duration;

use crossterm::event::{self, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// Canonical movement directions. There is no diagonal.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum Direction {
    Up,
    Right,
    Down,
    Left,
}

impl Direction {
    /// All directions in clockwise order starting at `Up`.
    pub const ALL: [Self; 4] = [Self::Up, Self::Right, Self::Down, Self::Left];

    /// Returns the opposite direction.
    #[must_use]
    pub fn opposite(self) -> Self {
        match self {
            Self::Up => Self::Down,
            Self::Right => Self::Left,
            Self::Down => Self::Up,
            Self::Left => Self::Right,
        }
    }

    /// Returns true when `other` lies on the other axis.
    #[must_use]
    pub fn is_perpendicular_to(self, other: Self) -> bool {
        self != other && self != other.opposite()
    }

    /// Unit grid offset `(dx, dy)`; y grows downward.
    #[must_use]
    pub fn offset(self) -> (i32, i32) {
        match self {
            Self::Up => (0, -1),
            Self::Right => (1, 0),
            Self::Down => (0, 1),
            Self::Left => (-1, 0),
        }
    }

    /// Lowercase name used in status paths.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Up => "up",
            Self::Right => "right",
            Self::Down => "down",
            Self::Left => "left",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Discrete events understood by the snake machine. None carries a payload.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum Event {
    Up,
    Right,
    Down,
    Left,
    Space,
    Escape,
    Tick,
}

impl Event {
    /// Returns the heading this event requests, if it is a direction key.
    #[must_use]
    pub fn direction(self) -> Option<Direction> {
        match self {
            Self::Up => Some(Direction::Up),
            Self::Right => Some(Direction::Right),
            Self::Down => Some(Direction::Down),
            Self::Left => Some(Direction::Left),
            Self::Space | Self::Escape | Self::Tick => None,
        }
    }
}

impl From<Direction> for Event {
    fn from(direction: Direction) -> Self {
        match direction {
            Direction::Up => Self::Up,
            Direction::Right => Self::Right,
            Direction::Down => Self::Down,
            Direction::Left => Self::Left,
        }
    }
}

/// What a terminal event means to the front end.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Command {
    Send(Event),
    Redraw,
    Quit,
}

/// Maps a terminal key event to a command. Releases and unbound keys map to `None`.
#[must_use]
pub fn map_key(key: KeyEvent) -> Option<Command> {
    if key.kind == KeyEventKind::Release {
        return None;
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Some(Command::Quit);
    }

    let event = match key.code {
        KeyCode::Up | KeyCode::Char('w' | 'W' | 'k') => Event::Up,
        KeyCode::Right | KeyCode::Char('d' | 'D' | 'l') => Event::Right,
        KeyCode::Down | KeyCode::Char('s' | 'S' | 'j') => Event::Down,
        KeyCode::Left | KeyCode::Char('a' | 'A' | 'h') => Event::Left,
        KeyCode::Char(' ') => Event::Space,
        KeyCode::Esc => Event::Escape,
        KeyCode::Char('q' | 'Q') => return Some(Command::Quit),
        _ => return None,
    };

    Some(Command::Send(event))
}

/// Polls crossterm for key input without blocking longer than `timeout`.
#[derive(Debug, Default)]
pub struct InputHandler;

impl InputHandler {
    /// Returns the next mapped command, if one arrived within `timeout`.
    pub fn poll_input(&mut self, timeout: Duration) -> io::Result<Option<Command>> {
        if !event::poll(timeout)? {
            return Ok(None);
        }

        match event::read()? {
            event::Event::Key(key) => Ok(map_key(key)),
            event::Event::Resize(..) => Ok(Some(Command::Redraw)),
            _ => Ok(None),
        }
    }
}
