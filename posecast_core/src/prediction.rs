//! Pose extrapolation (motion prediction).
//!
//! Predicts where a tracked body will be `dt` seconds after a sample was
//! taken, so a renderer can hide pipeline latency:
//! - **Translation**: constant-acceleration kinematics, `p + v·dt + ½·a·dt²`
//! - **Rotation**: the angular rate is integrated the same way into a
//!   body-frame rotation vector, then mapped to a quaternion through the
//!   exponential map and composed on the left of the sample orientation.
//!
//! The horizon is capped at [`MAX_PREDICTION_TIME`]; second-order
//! extrapolation diverges quickly beyond it.

use nalgebra::{Quaternion, Vector3};
use serde::{Deserialize, Serialize};

use crate::pose::Pose;

/// Upper bound on the look-ahead, in seconds.
pub const MAX_PREDICTION_TIME: f64 = 0.1;

/// Cutoff on `theta²` below which `sin(theta)/theta` is replaced by its
/// Taylor series. The dropped `theta⁴/120` term is below machine epsilon here.
pub fn small_angle_threshold() -> f64 {
    (120.0 * f64::EPSILON).sqrt()
}

/// One axis of constant-acceleration extrapolation.
///
/// Evaluated as `dt * (dt/2 * a + v) + p`; keep this association, it fixes
/// the rounding behaviour.
#[inline]
pub fn integrate(value: f64, rate: f64, rate_of_change: f64, dt: f64) -> f64 {
    dt * (dt / 2.0 * rate_of_change + rate) + value
}

fn integrate_vector(
    value: &Vector3<f64>,
    rate: &Vector3<f64>,
    rate_of_change: &Vector3<f64>,
    dt: f64,
) -> Vector3<f64> {
    Vector3::new(
        integrate(value.x, rate.x, rate_of_change.x, dt),
        integrate(value.y, rate.y, rate_of_change.y, dt),
        integrate(value.z, rate.z, rate_of_change.z, dt),
    )
}

/// Quaternion exponential map of a rotation vector (axis * angle).
///
/// Returns `(sin(θ)/θ · v/2, cos θ)` with `θ = |v/2|`. Near zero the sinc
/// factor switches to `1 - θ²/6`, so a zero vector maps to the identity.
pub fn quaternion_exp(rotation_vector: &Vector3<f64>) -> Quaternion<f64> {
    let half = rotation_vector / 2.0;
    let theta_sq = half.x * half.x + half.y * half.y + half.z * half.z;
    let theta = theta_sq.sqrt();
    let cos_term = theta.cos();
    let sin_term = if theta_sq < small_angle_threshold() {
        1.0 - theta_sq / 6.0
    } else {
        theta.sin() / theta
    };

    Quaternion::new(
        cos_term,
        sin_term * half.x,
        sin_term * half.y,
        sin_term * half.z,
    )
}

/// Extrapolate `pose` forward by `dt` seconds.
///
/// `dt` is clamped to [`MAX_PREDICTION_TIME`] from above only; a negative
/// `dt` extrapolates backwards and a NaN `dt` takes the full clamped step.
/// Only `position` and `orientation` change, every other field is carried
/// over. The result orientation is not
/// renormalised.
pub fn predict(pose: &Pose, dt: f64) -> Pose {
    let dt = dt.min(MAX_PREDICTION_TIME);

    let position = integrate_vector(
        &pose.position,
        &pose.linear_velocity,
        &pose.linear_acceleration,
        dt,
    );

    let rotation_vector = integrate_vector(
        &Vector3::zeros(),
        &pose.angular_velocity,
        &pose.angular_acceleration,
        dt,
    );
    let delta = quaternion_exp(&rotation_vector);

    Pose {
        position,
        orientation: delta * pose.orientation,
        ..*pose
    }
}

/// Predictor bound to a configured look-ahead.
///
/// A `prediction_time` of zero (or below) disables prediction and hands the
/// raw sample through.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PosePredictor {
    prediction_time: f64,
}

impl PosePredictor {
    pub fn new(prediction_time: f64) -> Self {
        Self { prediction_time }
    }

    /// Configured look-ahead in seconds, before clamping.
    pub fn prediction_time(&self) -> f64 {
        self.prediction_time
    }

    pub fn is_enabled(&self) -> bool {
        self.prediction_time > 0.0
    }

    /// The look-ahead actually applied to samples, in seconds.
    pub fn horizon(&self) -> f64 {
        if self.is_enabled() {
            self.prediction_time.min(MAX_PREDICTION_TIME)
        } else {
            0.0
        }
    }

    pub fn apply(&self, pose: &Pose) -> Pose {
        if self.is_enabled() {
            predict(pose, self.prediction_time)
        } else {
            *pose
        }
    }
}
