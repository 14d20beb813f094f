//! Tracking configuration.
//!
//! Loaded from JSON; every field is optional and falls back to the defaults
//! below.
//!
//! ```json
//! {
//!     "prediction_time": 0.02,
//!     "min_confidence": "medium",
//!     "use_rotation": true,
//!     "source": "hmd",
//!     "convention": "left_handed_y_up"
//! }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::convention::{CoordinateConvention, ConventionSetting};
use crate::error::ConfigError;
use crate::pose::{Confidence, DeviceIndex};
use crate::prediction::{PosePredictor, MAX_PREDICTION_TIME};

/// Settings for a [`TrackingTransformer`](crate::TrackingTransformer).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackingConfig {
    /// Look-ahead in seconds.
    ///
    /// 0 disables prediction and the raw pose is used.
    ///
    /// Default: 0.0
    #[serde(default)]
    pub prediction_time: f64,

    /// Samples whose tracker confidence is below this are ignored.
    ///
    /// Default: low
    #[serde(default = "default_min_confidence")]
    pub min_confidence: Confidence,

    /// Write the converted position to the transform.
    ///
    /// Default: true
    #[serde(default = "default_true")]
    pub use_position: bool,

    /// Write the converted rotation to the transform.
    ///
    /// Default: true
    #[serde(default = "default_true")]
    pub use_rotation: bool,

    /// Default: left_handed_y_up
    #[serde(default)]
    pub convention: ConventionSetting,

    /// Only follow samples from this device; `None` accepts any.
    ///
    /// Default: none
    #[serde(default)]
    pub source: Option<DeviceIndex>,
}

fn default_min_confidence() -> Confidence {
    Confidence::Low
}
fn default_true() -> bool {
    true
}

impl Default for TrackingConfig {
    fn default() -> Self {
        Self {
            prediction_time: 0.0,
            min_confidence: default_min_confidence(),
            use_position: true,
            use_rotation: true,
            convention: ConventionSetting::default(),
            source: None,
        }
    }
}

impl TrackingConfig {
    /// Parses and validates a JSON config.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a JSON config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    /// Checks the values a JSON schema cannot express.
    ///
    /// A `prediction_time` above [`MAX_PREDICTION_TIME`] is accepted with a
    /// warning; the predictor clamps it.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.prediction_time.is_finite() || self.prediction_time < 0.0 {
            return Err(ConfigError::InvalidPredictionTime(self.prediction_time));
        }
        if self.prediction_time > MAX_PREDICTION_TIME {
            warn!(
                "prediction_time {:.3}s exceeds {:.3}s, predictions will be clamped",
                self.prediction_time, MAX_PREDICTION_TIME
            );
        }
        self.convention.resolve().validate()
    }

    pub fn predictor(&self) -> PosePredictor {
        PosePredictor::new(self.prediction_time)
    }

    pub fn coordinate_convention(&self) -> CoordinateConvention {
        self.convention.resolve()
    }
}
