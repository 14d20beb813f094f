//! Prediction accuracy against oracle ground truth.
//!
//! For every tick the sample at `t` is predicted forward by the predictor's
//! horizon and compared with the exact pose at `t + horizon`. The same
//! comparison for the raw (unpredicted) sample gives the baseline a
//! predictor has to beat.

use nalgebra::Quaternion;
use posecast_core::{Pose, PosePredictor};
use serde::Serialize;

use crate::oracle::MotionOracle;

/// Running RMS / max accumulator for one error channel.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct ErrorStats {
    pub count: usize,
    pub sum_squared: f64,
    pub max: f64,
}

impl ErrorStats {
    pub fn record(&mut self, error: f64) {
        self.count += 1;
        self.sum_squared += error * error;
        self.max = self.max.max(error);
    }

    /// Root mean square error
    pub fn rms(&self) -> f64 {
        if self.count > 0 {
            (self.sum_squared / self.count as f64).sqrt()
        } else {
            0.0
        }
    }
}

/// Angle in radians between two orientations, ignoring quaternion sign.
///
/// Tolerates slightly non-unit inputs.
pub fn angular_distance(a: &Quaternion<f64>, b: &Quaternion<f64>) -> f64 {
    let norms = a.norm() * b.norm();
    if norms == 0.0 {
        return 0.0;
    }
    let cos_half = (a.coords.dot(&b.coords).abs() / norms).min(1.0);
    2.0 * cos_half.acos()
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct PredictionReport {
    pub seed: u64,
    pub samples: usize,

    /// Look-ahead actually applied, seconds
    pub horizon: f64,

    /// Predicted position vs truth, meters
    pub position: ErrorStats,

    /// Predicted orientation vs truth, radians
    pub angular: ErrorStats,

    /// Raw sample position vs truth, meters
    pub baseline_position: ErrorStats,

    /// Raw sample orientation vs truth, radians
    pub baseline_angular: ErrorStats,
}

impl PredictionReport {
    /// True when prediction beat the raw samples on both channels.
    pub fn improves_on_baseline(&self) -> bool {
        self.position.rms() <= self.baseline_position.rms()
            && self.angular.rms() <= self.baseline_angular.rms()
    }

    fn record(&mut self, predicted: &Pose, raw: &Pose, truth: &Pose) {
        self.samples += 1;
        self.position.record((predicted.position - truth.position).norm());
        self.angular
            .record(angular_distance(&predicted.orientation, &truth.orientation));
        self.baseline_position.record((raw.position - truth.position).norm());
        self.baseline_angular
            .record(angular_distance(&raw.orientation, &truth.orientation));
    }
}

/// Runs `oracle` for `duration` seconds at `rate_hz` and scores `predictor`.
pub fn evaluate(
    oracle: &mut MotionOracle,
    predictor: &PosePredictor,
    rate_hz: f64,
    duration: f64,
) -> PredictionReport {
    let horizon = predictor.horizon();
    let ticks = (duration * rate_hz).max(0.0) as u64;

    let mut report = PredictionReport {
        seed: oracle.seed(),
        horizon,
        ..Default::default()
    };

    for tick in 0..ticks {
        let t = tick as f64 / rate_hz;
        let raw = oracle.sample_at(t);
        let predicted = predictor.apply(&raw);
        let truth = oracle.truth_at(t + horizon);
        report.record(&predicted, &raw, &truth);
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use nalgebra::{UnitQuaternion, Vector3};

    #[test]
    fn test_error_stats() {
        let mut stats = ErrorStats::default();
        assert_eq!(stats.rms(), 0.0);

        stats.record(3.0);
        stats.record(4.0);
        assert_eq!(stats.count, 2);
        assert_eq!(stats.max, 4.0);
        assert_relative_eq!(stats.rms(), (12.5_f64).sqrt(), epsilon = 1e-12);
    }

    #[test]
    fn test_angular_distance() {
        let a = UnitQuaternion::from_axis_angle(&Vector3::z_axis(), 0.2).into_inner();
        let b = UnitQuaternion::from_axis_angle(&Vector3::z_axis(), 0.5).into_inner();

        assert_relative_eq!(angular_distance(&a, &b), 0.3, epsilon = 1e-9);
        // q and -q are the same rotation
        assert_relative_eq!(angular_distance(&a, &-a), 0.0, epsilon = 1e-6);
    }

    #[test]
    fn test_disabled_predictor_matches_baseline() {
        let mut oracle = MotionOracle::new(42);
        let report = evaluate(&mut oracle, &PosePredictor::default(), 100.0, 1.0);

        assert_eq!(report.samples, 100);
        assert_eq!(report.horizon, 0.0);
        assert_eq!(report.position.rms(), 0.0);
        assert_eq!(report.position.rms(), report.baseline_position.rms());
    }

    #[test]
    fn test_prediction_beats_stale_pose() {
        let mut oracle = MotionOracle::new(42);
        let report = evaluate(&mut oracle, &PosePredictor::new(0.02), 200.0, 5.0);

        assert_eq!(report.samples, 1000);
        assert!(report.improves_on_baseline());
        assert!(report.position.rms() < 0.1 * report.baseline_position.rms());
        assert!(report.position.max < 5e-3);
        assert!(report.angular.max < 5e-3);
    }

    #[test]
    fn test_horizon_is_clamped() {
        let mut oracle = MotionOracle::new(1);
        let report = evaluate(&mut oracle, &PosePredictor::new(1.0), 50.0, 0.5);
        assert_eq!(report.horizon, 0.1);
    }
}
