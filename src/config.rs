use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::bounds::Bounds;
use crate::error::ConfigError;
use crate::snake::{Position, Snake};
use crate::timer::TimerConfig;

const APP_DIR_NAME: &str = "snaaake";
const CONFIG_FILE_NAME: &str = "config.json";

/// Default grid width in cells.
pub const DEFAULT_GRID_WIDTH: u16 = 20;

/// Default grid height in cells.
pub const DEFAULT_GRID_HEIGHT: u16 = 20;

/// Apples kept on the board by default.
pub const DEFAULT_APPLE_COUNT: usize = 3;

/// Simulation step in milliseconds (8 ticks per second).
pub const DEFAULT_STEP_MS: u64 = 125;

/// Most ticks a single late frame may fire.
pub const DEFAULT_MAX_TICKS_PER_FRAME: u32 = 8;

/// Largest grid side accepted; wider boards cannot be drawn on a terminal.
pub const MAX_GRID_SIDE: u16 = 256;

/// Logical grid dimensions in cells.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
pub struct GridSize {
    pub width: u16,
    pub height: u16,
}

impl GridSize {
    /// Returns the total number of cells in the grid.
    #[must_use]
    pub fn total_cells(self) -> usize {
        usize::from(self.width) * usize::from(self.height)
    }

    /// The centre cell, where a default snake starts.
    #[must_use]
    pub fn center(self) -> Position {
        Position {
            x: i32::from(self.width / 2),
            y: i32::from(self.height / 2),
        }
    }
}

/// Everything a session needs before the first event.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SessionConfig {
    pub grid: GridSize,
    /// Starting body, head first. Empty means a single cell at the grid centre.
    pub snake: Vec<Position>,
    pub apples: usize,
    pub step_ms: u64,
    pub max_ticks_per_frame: u32,
    /// Fixed RNG seed for reproducible apple spawns.
    pub seed: Option<u64>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            grid: GridSize {
                width: DEFAULT_GRID_WIDTH,
                height: DEFAULT_GRID_HEIGHT,
            },
            snake: Vec::new(),
            apples: DEFAULT_APPLE_COUNT,
            step_ms: DEFAULT_STEP_MS,
            max_ticks_per_frame: DEFAULT_MAX_TICKS_PER_FRAME,
            seed: None,
        }
    }
}

impl SessionConfig {
    /// Loads the user config file, falling back to defaults when it does not exist.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from_path(&config_path())
    }

    /// Loads `path`; a missing file yields defaults, a malformed one an error.
    pub fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        let raw = match fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(source) => {
                return Err(ConfigError::Io {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };

        serde_json::from_str(&raw).map_err(|source| ConfigError::Json {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Checks the configuration can start a session.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.prepare().map(|_| ())
    }

    /// Validates the configuration and returns the bounds and starting snake.
    pub fn prepare(&self) -> Result<(Bounds, Snake), ConfigError> {
        if self.grid.width > MAX_GRID_SIDE || self.grid.height > MAX_GRID_SIDE {
            return Err(ConfigError::GridTooLarge {
                width: self.grid.width,
                height: self.grid.height,
                max: MAX_GRID_SIDE,
            });
        }

        let bounds = self.bounds()?;
        let snake = self.initial_snake()?;

        let mut seen = HashSet::new();
        for segment in snake.segments() {
            if !bounds.contains(*segment) {
                return Err(ConfigError::SnakeOutOfBounds(*segment));
            }
            if !seen.insert(*segment) {
                return Err(ConfigError::OverlappingSnake(*segment));
            }
        }
        if let Some(segment) = snake.first_gap() {
            return Err(ConfigError::DisjointSnake(segment));
        }

        if self.step_ms == 0 {
            return Err(ConfigError::ZeroStep);
        }

        let free = bounds.len() - snake.len();
        if self.apples > free {
            return Err(ConfigError::TooManyApples {
                requested: self.apples,
                free,
            });
        }

        Ok((bounds, snake))
    }

    /// The playable cells.
    pub fn bounds(&self) -> Result<Bounds, ConfigError> {
        Bounds::grid(self.grid.width, self.grid.height)
    }

    /// The snake every reset starts from.
    pub fn initial_snake(&self) -> Result<Snake, ConfigError> {
        if self.snake.is_empty() {
            return Ok(Snake::new(self.grid.center()));
        }

        Snake::from_segments(self.snake.clone())
    }

    #[must_use]
    pub fn timer(&self) -> TimerConfig {
        TimerConfig {
            step: Duration::from_millis(self.step_ms),
            max_ticks_per_frame: self.max_ticks_per_frame,
        }
    }
}

/// Returns the platform-correct config file path.
#[must_use]
pub fn config_path() -> PathBuf {
    let mut base = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
    base.push(APP_DIR_NAME);
    base.push(CONFIG_FILE_NAME);
    base
}
