//! Error types for the simulation harness.

use std::path::PathBuf;

use posecast_core::ConfigError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    /// A pose log could not be opened or created
    #[error("Failed to open {path:?}: {source}")]
    Open {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Read or write failed mid-stream
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A pose log line is not a valid pose
    #[error("Malformed pose on line {line}: {source}")]
    Parse {
        line: usize,
        source: serde_json::Error,
    },

    /// A pose could not be encoded
    #[error("Failed to encode pose: {0}")]
    Encode(#[from] serde_json::Error),

    /// Noise standard deviation is negative or not finite
    #[error("Invalid noise standard deviation: {0}")]
    InvalidNoise(f64),

    #[error(transparent)]
    Config(#[from] ConfigError),
}
