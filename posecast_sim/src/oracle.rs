//! Ground truth oracle for simulation.
//!
//! The Oracle generates head motion with closed-form derivatives:
//! - Per-axis sinusoidal sway for translation
//! - Oscillation about a fixed axis for rotation
//! - Optional Gaussian noise on the published samples
//!
//! Because every derivative is analytic, `truth_at(t + dt)` is the exact
//! answer a predictor should approach.

use nalgebra::{Unit, UnitQuaternion, Vector3};
use posecast_core::{Confidence, DeviceIndex, Pose};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rand_distr::{Distribution, Normal};

use crate::error::SimError;

/// Parameters of a synthetic head trajectory.
#[derive(Debug, Clone)]
pub struct MotionProfile {
    /// Mean position in meters
    pub center: Vector3<f64>,

    /// Sway amplitude per axis, meters
    pub amplitude: Vector3<f64>,

    /// Sway angular frequency per axis, rad/s
    pub frequency: Vector3<f64>,

    /// Sway phase per axis, radians
    pub phase: Vector3<f64>,

    /// Fixed rotation axis
    pub rotation_axis: Unit<Vector3<f64>>,

    /// Peak rotation angle, radians
    pub rotation_amplitude: f64,

    /// Rotation angular frequency, rad/s
    pub rotation_frequency: f64,
}

impl MotionProfile {
    /// Draws a head-like profile: a few centimeters of sway at 0.5-2 Hz and
    /// up to ~35° of rotation at 0.2-1.5 Hz.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let tau = std::f64::consts::TAU;
        let mut axis_component = || -> f64 { rng.gen_range(-1.0..1.0) };
        let raw_axis = Vector3::new(axis_component(), axis_component(), axis_component());
        let rotation_axis = Unit::try_new(raw_axis, 1e-6).unwrap_or_else(Vector3::y_axis);

        Self {
            center: Vector3::new(0.0, rng.gen_range(1.4..1.8), 0.0),
            amplitude: Vector3::from_fn(|_, _| rng.gen_range(0.02..0.2)),
            frequency: Vector3::from_fn(|_, _| tau * rng.gen_range(0.5..2.0)),
            phase: Vector3::from_fn(|_, _| rng.gen_range(0.0..tau)),
            rotation_axis,
            rotation_amplitude: rng.gen_range(0.1..0.6),
            rotation_frequency: tau * rng.gen_range(0.2..1.5),
        }
    }
}

/// The Oracle - ground truth motion and noisy sample generation.
pub struct MotionOracle {
    seed: u64,

    /// RNG for noise, seeded separately from the profile draw
    noise_rng: ChaCha8Rng,

    profile: MotionProfile,

    /// `None` when noise is disabled
    position_noise: Option<Normal<f64>>,

    angular_noise: Option<Normal<f64>>,
}

impl MotionOracle {
    /// Creates an oracle with a random profile derived from `seed`.
    pub fn new(seed: u64) -> Self {
        let mut profile_rng = ChaCha8Rng::seed_from_u64(seed);
        let profile = MotionProfile::random(&mut profile_rng);
        Self::with_profile(seed, profile)
    }

    pub fn with_profile(seed: u64, profile: MotionProfile) -> Self {
        Self {
            seed,
            noise_rng: ChaCha8Rng::seed_from_u64(seed.wrapping_mul(0x9e3779b97f4a7c15)),
            profile,
            position_noise: None,
            angular_noise: None,
        }
    }

    fn noise(std_dev: f64) -> Result<Option<Normal<f64>>, SimError> {
        if !std_dev.is_finite() || std_dev < 0.0 {
            return Err(SimError::InvalidNoise(std_dev));
        }
        if std_dev == 0.0 {
            return Ok(None);
        }
        Normal::new(0.0, std_dev)
            .map(Some)
            .map_err(|_| SimError::InvalidNoise(std_dev))
    }

    /// Sets the noise added to published samples.
    ///
    /// # Arguments
    /// * `position_std` - Position noise, meters
    /// * `angular_std` - Angular velocity noise, rad/s
    pub fn set_noise(&mut self, position_std: f64, angular_std: f64) -> Result<(), SimError> {
        let position_noise = Self::noise(position_std)?;
        let angular_noise = Self::noise(angular_std)?;
        self.position_noise = position_noise;
        self.angular_noise = angular_noise;
        Ok(())
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn profile(&self) -> &MotionProfile {
        &self.profile
    }

    /// Exact pose at simulation time `t` seconds.
    pub fn truth_at(&self, t: f64) -> Pose {
        let p = &self.profile;

        let angle = p.phase + p.frequency * t;
        let sin = angle.map(f64::sin);
        let cos = angle.map(f64::cos);

        let position = p.center + p.amplitude.component_mul(&sin);
        let velocity = p.amplitude.component_mul(&p.frequency).component_mul(&cos);
        let acceleration = -p
            .amplitude
            .component_mul(&p.frequency)
            .component_mul(&p.frequency)
            .component_mul(&sin);

        let w = p.rotation_frequency;
        let theta = p.rotation_amplitude * (w * t).sin();
        let theta_dot = p.rotation_amplitude * w * (w * t).cos();
        let theta_ddot = -p.rotation_amplitude * w * w * (w * t).sin();

        let timestamp = (t * 1e9).round() as i64;

        Pose {
            timestamp,
            arrival_timestamp: timestamp,
            system_timestamp: timestamp,
            source: DeviceIndex::Hmd,
            position,
            orientation: UnitQuaternion::from_axis_angle(&p.rotation_axis, theta).into_inner(),
            linear_velocity: velocity,
            linear_acceleration: acceleration,
            angular_velocity: p.rotation_axis.into_inner() * theta_dot,
            angular_acceleration: p.rotation_axis.into_inner() * theta_ddot,
            tracker_confidence: Confidence::High,
            mapper_confidence: Confidence::High,
        }
    }

    /// Published sample at time `t`: ground truth plus configured noise.
    pub fn sample_at(&mut self, t: f64) -> Pose {
        let mut pose = self.truth_at(t);
        let rng = &mut self.noise_rng;

        if let Some(noise) = self.position_noise {
            pose.position += Vector3::from_fn(|_, _| noise.sample(rng));
        }
        if let Some(noise) = self.angular_noise {
            pose.angular_velocity += Vector3::from_fn(|_, _| noise.sample(rng));
        }
        pose
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_oracle_deterministic_profile() {
        let a = MotionOracle::new(42);
        let b = MotionOracle::new(42);

        assert_eq!(a.truth_at(1.25), b.truth_at(1.25));
        assert_ne!(a.truth_at(1.25), MotionOracle::new(43).truth_at(1.25));
    }

    #[test]
    fn test_oracle_deterministic_noise() {
        let mut a = MotionOracle::new(7);
        let mut b = MotionOracle::new(7);
        a.set_noise(0.01, 0.1).unwrap();
        b.set_noise(0.01, 0.1).unwrap();

        // Same seed = same noise
        assert_eq!(a.sample_at(0.5), b.sample_at(0.5));
    }

    #[test]
    fn test_noiseless_sample_is_truth() {
        let mut oracle = MotionOracle::new(3);
        assert_eq!(oracle.sample_at(2.0), oracle.truth_at(2.0));
    }

    #[test]
    fn test_velocity_matches_finite_difference() {
        let oracle = MotionOracle::new(11);
        let h = 1e-6;
        let t = 0.8;

        let before = oracle.truth_at(t - h).position;
        let after = oracle.truth_at(t + h).position;
        let numeric = (after - before) / (2.0 * h);

        assert_relative_eq!(oracle.truth_at(t).linear_velocity, numeric, epsilon = 1e-5);
    }

    #[test]
    fn test_orientation_is_unit() {
        let oracle = MotionOracle::new(5);
        for i in 0..20 {
            let q = oracle.truth_at(i as f64 * 0.1).orientation;
            assert_relative_eq!(q.norm(), 1.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_invalid_noise_rejected() {
        let mut oracle = MotionOracle::new(1);
        assert!(matches!(oracle.set_noise(-0.1, 0.0), Err(SimError::InvalidNoise(_))));
        assert!(matches!(oracle.set_noise(0.0, f64::NAN), Err(SimError::InvalidNoise(_))));
    }
}
