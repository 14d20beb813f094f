//! Error types for PoseCast.
//!
//! The prediction math itself is total and never fails. Errors only arise
//! at the edges: decoding native codes and loading configuration.

use std::path::PathBuf;
use thiserror::Error;

use crate::convention::Axis;

/// Errors decoding raw values published by the tracking device.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PoseError {
    /// Confidence code outside 0x0 - 0x3
    #[error("Invalid confidence code: {0}")]
    InvalidConfidence(u32),

    /// Device index outside HMD / controller 1 / controller 2
    #[error("Invalid device index: {0}")]
    InvalidDeviceIndex(u8),
}

/// Errors loading or validating a [`TrackingConfig`](crate::TrackingConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Prediction time is NaN, infinite or negative
    #[error("Invalid prediction time: {0}s (must be finite and non-negative)")]
    InvalidPredictionTime(f64),

    /// Position swizzle does not name each axis exactly once
    #[error("Invalid axis swizzle {0:?}: must be a permutation of x, y, z")]
    InvalidSwizzle([Axis; 3]),

    /// Reference rotation contains NaN or infinite components
    #[error("Reference rotation has non-finite components")]
    InvalidReferenceRotation,

    /// Reference rotation is not a unit quaternion
    #[error("Reference rotation has norm {0}, expected 1")]
    NonUnitReferenceRotation(f64),

    /// Config file could not be read
    #[error("Failed to read config {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Config contents are not valid JSON for the schema
    #[error("Config parse error: {0}")]
    Parse(#[from] serde_json::Error),
}
