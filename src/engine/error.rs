// Error types for world building and configuration.
//
// Builders either return a complete, valid result or one of these errors
// before anything is handed back to the caller.

use std::path::PathBuf;

/// Precondition failures raised by the maze, terrain and obstacle builders.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum WorldError {
    /// Maze dimensions must both be odd and at least `MIN_MAZE_SIZE`.
    #[error("invalid maze dimensions {width}x{height}: both must be odd and >= 5")]
    InvalidDimensions { width: u32, height: u32 },

    /// Tessellation step must satisfy `1 <= step < min(width, height)`.
    #[error("invalid tessellation step {step} for a {width}x{height} height field")]
    InvalidStep { step: u32, width: u32, height: u32 },

    /// A height field needs at least one sample along each axis.
    #[error("height field has no samples")]
    EmptyHeightField,

    #[error("height field expected {expected} samples, got {actual}")]
    SampleCountMismatch { expected: usize, actual: usize },
}

/// Failures while loading `app_settings.json` or external assets it names.
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Failed to load heightmap {path}: {source}")]
    Heightmap {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error(transparent)]
    World(#[from] WorldError),
}
