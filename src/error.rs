use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Problems loading or validating a [`GameConfig`](crate::config::GameConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("board must be at least 1x1, got {width}x{height}")]
    EmptyBoard { width: u16, height: u16 },

    #[error("mutation probability must lie in [0, 1], got {0}")]
    MutationProbability(f64),

    #[error("obstacle at ({x}, {y}) covers the snake's starting cell")]
    ObstacleOnSnakeStart { x: i32, y: i32 },

    #[error("tick interval must be at least {min} ms, got {actual} ms")]
    TickInterval { min: u64, actual: u64 },
}

/// Top-level error for the binary.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("failed to set up logging: {0}")]
    Logging(#[source] io::Error),

    #[error("terminal I/O failed: {0}")]
    Io(#[from] io::Error),
}
