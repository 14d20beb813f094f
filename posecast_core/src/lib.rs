//! PoseCast Core - 6-DoF Pose Prediction for Tracked Headsets
//!
//! Turns raw tracker samples into render-ready transforms:
//! 1. **Prediction**: second-order extrapolation of translation and an
//!    exponential-map integration of rotation, capped at 100 ms ahead
//! 2. **Convention**: fixed remap from the tracker's right-handed frame into
//!    the renderer's axis layout
//! 3. **Tracking**: confidence gating and the per-tick pipeline that drives
//!    a scene-graph transform from a [`PoseSource`]

pub mod config;
pub mod convention;
pub mod error;
pub mod pose;
pub mod prediction;
pub mod tracking;

// Re-export key types for convenience
pub use config::TrackingConfig;
pub use convention::{AxisSwizzle, CoordinateConvention, ConventionSetting, RenderPose};
pub use error::{ConfigError, PoseError};
pub use pose::{Confidence, DeviceIndex, Pose};
pub use prediction::{predict, quaternion_exp, PosePredictor, MAX_PREDICTION_TIME};
pub use tracking::{PoseSource, TrackedTransform, TrackingTransformer, UpdateOutcome};
