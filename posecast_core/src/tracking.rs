//! Pose consumer: drives a renderable transform from a pose source.
//!
//! Each tick the transformer pulls the latest sample, gates it on tracker
//! confidence, predicts it forward, converts it to the renderer convention
//! and writes the enabled components into its [`TrackedTransform`].

use nalgebra::{Quaternion, Vector3};
use tracing::{debug, trace};

use crate::config::TrackingConfig;
use crate::convention::{CoordinateConvention, RenderPose};
use crate::error::ConfigError;
use crate::pose::{Confidence, DeviceIndex, Pose};
use crate::prediction::PosePredictor;

/// Anything that can hand out the latest pose sample.
///
/// # Implementations
///
/// - **Device**: a binding to the native tracking library (lives outside this crate)
/// - **Replay**: reads recorded samples back from a log
pub trait PoseSource {
    /// Returns the latest sample, or `None` when no pose is available
    /// (device disconnected, controller not paired, log exhausted).
    fn try_get_pose(&mut self) -> Option<Pose>;
}

impl<S: PoseSource + ?Sized> PoseSource for &mut S {
    fn try_get_pose(&mut self) -> Option<Pose> {
        (**self).try_get_pose()
    }
}

/// Local transform of the node being driven.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackedTransform {
    pub local_position: Vector3<f64>,
    pub local_rotation: Quaternion<f64>,
}

impl Default for TrackedTransform {
    fn default() -> Self {
        Self {
            local_position: Vector3::zeros(),
            local_rotation: Quaternion::identity(),
        }
    }
}

/// Result of one [`TrackingTransformer::update`] tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UpdateOutcome {
    /// The source had nothing to offer
    NoPose,
    /// The sample came from a device other than the configured `source`
    OtherSource(DeviceIndex),
    /// The sample was below `min_confidence`; transform left untouched
    BelowConfidence(Confidence),
    /// The transform was updated from this render pose
    Applied(RenderPose),
}

pub struct TrackingTransformer {
    config: TrackingConfig,
    predictor: PosePredictor,
    convention: CoordinateConvention,
    transform: TrackedTransform,
}

impl TrackingTransformer {
    pub fn new(config: TrackingConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            predictor: config.predictor(),
            convention: config.coordinate_convention(),
            transform: TrackedTransform::default(),
            config,
        })
    }

    pub fn config(&self) -> &TrackingConfig {
        &self.config
    }

    pub fn transform(&self) -> &TrackedTransform {
        &self.transform
    }

    /// Gates, predicts and converts a single sample without touching the
    /// transform.
    pub fn resolve(&self, pose: &Pose) -> Result<RenderPose, Confidence> {
        if !pose.is_confident(self.config.min_confidence) {
            return Err(pose.tracker_confidence);
        }
        let predicted = self.predictor.apply(pose);
        Ok(self.convention.convert(&predicted))
    }

    /// Pulls one sample from `source` and applies it.
    pub fn update<S: PoseSource + ?Sized>(&mut self, source: &mut S) -> UpdateOutcome {
        let Some(pose) = source.try_get_pose() else {
            trace!("no pose available");
            return UpdateOutcome::NoPose;
        };
        if let Some(wanted) = self.config.source {
            if pose.source != wanted {
                trace!("ignoring {} sample, following {}", pose.source, wanted);
                return UpdateOutcome::OtherSource(pose.source);
            }
        }

        match self.resolve(&pose) {
            Ok(render) => {
                if self.config.use_position {
                    self.transform.local_position = render.position;
                }
                if self.config.use_rotation {
                    self.transform.local_rotation = render.rotation;
                }
                UpdateOutcome::Applied(render)
            }
            Err(confidence) => {
                debug!(
                    "skipping {} sample at {:.3}s: confidence {} below {}",
                    pose.source,
                    pose.timestamp_secs(),
                    confidence,
                    self.config.min_confidence
                );
                UpdateOutcome::BelowConfidence(confidence)
            }
        }
    }
}
