use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::snake::Position;

/// Reasons a session cannot be configured.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("malformed config file {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("grid must have at least one cell (got {width}x{height})")]
    EmptyGrid { width: u16, height: u16 },

    #[error("grid {width}x{height} exceeds the {max}x{max} limit")]
    GridTooLarge { width: u16, height: u16, max: u16 },

    #[error("snake must have at least one segment")]
    EmptySnake,

    #[error("snake segment {0} lies outside the grid")]
    SnakeOutOfBounds(Position),

    #[error("snake segment {0} appears more than once")]
    OverlappingSnake(Position),

    #[error("snake segment {0} is not next to the segment before it")]
    DisjointSnake(Position),

    #[error("tick step must be greater than zero")]
    ZeroStep,

    #[error("{requested} apples do not fit in {free} free cells")]
    TooManyApples { requested: usize, free: usize },
}
