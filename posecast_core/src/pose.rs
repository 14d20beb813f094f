//! Pose samples as published by the tracking device.
//!
//! A [`Pose`] is an immutable snapshot: position and orientation plus their
//! first and second time derivatives, stamped with the device clock. All
//! vectors are in the device-native frame (X right, Y up, Z forward).

use std::fmt;

use nalgebra::{Quaternion, Vector3};
use serde::{Deserialize, Serialize};

use crate::error::PoseError;

/// Ordinal tracking-quality indicator.
///
/// Ordered `Failed < Low < Medium < High`, so gating is a plain comparison.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Confidence {
    #[default]
    Failed,
    Low,
    Medium,
    High,
}

impl TryFrom<u32> for Confidence {
    type Error = PoseError;

    fn try_from(code: u32) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(Confidence::Failed),
            1 => Ok(Confidence::Low),
            2 => Ok(Confidence::Medium),
            3 => Ok(Confidence::High),
            other => Err(PoseError::InvalidConfidence(other)),
        }
    }
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Confidence::Failed => "FAILED",
            Confidence::Low => "LOW",
            Confidence::Medium => "MEDIUM",
            Confidence::High => "HIGH",
        };
        f.write_str(name)
    }
}

/// Which tracked body a sample belongs to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum DeviceIndex {
    #[default]
    Hmd = 0x0,
    Controller1 = 0x1,
    Controller2 = 0x2,
}

impl TryFrom<u8> for DeviceIndex {
    type Error = PoseError;

    fn try_from(index: u8) -> Result<Self, Self::Error> {
        match index {
            0x0 => Ok(DeviceIndex::Hmd),
            0x1 => Ok(DeviceIndex::Controller1),
            0x2 => Ok(DeviceIndex::Controller2),
            other => Err(PoseError::InvalidDeviceIndex(other)),
        }
    }
}

impl fmt::Display for DeviceIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DeviceIndex::Hmd => "HMD",
            DeviceIndex::Controller1 => "CONTROLLER1",
            DeviceIndex::Controller2 => "CONTROLLER2",
        };
        f.write_str(name)
    }
}

fn zero_vector() -> Vector3<f64> {
    Vector3::zeros()
}

/// A timestamped 6-DoF sample with velocities and accelerations.
///
/// The orientation is kept as a raw quaternion rather than a
/// `UnitQuaternion`: the source guarantees unit norm and nothing downstream
/// renormalises it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    /// Frame integration time, nanoseconds since device initialization
    pub timestamp: i64,

    /// Frame arrival time, nanoseconds since device initialization
    #[serde(default)]
    pub arrival_timestamp: i64,

    /// Host-correlated time, nanoseconds
    #[serde(default)]
    pub system_timestamp: i64,

    /// Tracked body this sample describes
    #[serde(default)]
    pub source: DeviceIndex,

    /// Translation in meters, relative to the initial position
    pub position: Vector3<f64>,

    /// Rotation from the device frame to the world-at-init frame
    pub orientation: Quaternion<f64>,

    /// m/s
    #[serde(default = "zero_vector")]
    pub linear_velocity: Vector3<f64>,

    /// m/s²
    #[serde(default = "zero_vector")]
    pub linear_acceleration: Vector3<f64>,

    /// Body-frame angular rate, rad/s
    #[serde(default = "zero_vector")]
    pub angular_velocity: Vector3<f64>,

    /// Body-frame angular acceleration, rad/s²
    #[serde(default = "zero_vector")]
    pub angular_acceleration: Vector3<f64>,

    pub tracker_confidence: Confidence,

    #[serde(default)]
    pub mapper_confidence: Confidence,
}

impl Pose {
    /// A pose at rest at the origin with identity orientation.
    pub fn identity_at(timestamp: i64) -> Self {
        Self {
            timestamp,
            arrival_timestamp: timestamp,
            system_timestamp: timestamp,
            source: DeviceIndex::Hmd,
            position: Vector3::zeros(),
            orientation: Quaternion::identity(),
            linear_velocity: Vector3::zeros(),
            linear_acceleration: Vector3::zeros(),
            angular_velocity: Vector3::zeros(),
            angular_acceleration: Vector3::zeros(),
            tracker_confidence: Confidence::High,
            mapper_confidence: Confidence::High,
        }
    }

    /// True when the tracker confidence meets `min`.
    pub fn is_confident(&self, min: Confidence) -> bool {
        self.tracker_confidence >= min
    }

    /// Device timestamp in seconds.
    pub fn timestamp_secs(&self) -> f64 {
        self.timestamp as f64 * 1e-9
    }
}

impl fmt::Display for Pose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let p = &self.position;
        let q = &self.orientation;
        write!(
            f,
            "Pose[{} t={}ns pos=({:+.4}, {:+.4}, {:+.4})m rot=({:+.4}, {:+.4}, {:+.4}, {:+.4}) confidence={}]",
            self.source, self.timestamp, p.x, p.y, p.z, q.i, q.j, q.k, q.w, self.tracker_confidence,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_confidence_ordering() {
        assert!(Confidence::Failed < Confidence::Low);
        assert!(Confidence::Low < Confidence::Medium);
        assert!(Confidence::Medium < Confidence::High);
    }

    #[test]
    fn test_confidence_from_native_code() {
        assert_eq!(Confidence::try_from(2), Ok(Confidence::Medium));
        assert_eq!(Confidence::try_from(4), Err(PoseError::InvalidConfidence(4)));
    }

    #[test]
    fn test_device_index_from_native_code() {
        assert_eq!(DeviceIndex::try_from(0x1), Ok(DeviceIndex::Controller1));
        assert_eq!(DeviceIndex::try_from(7), Err(PoseError::InvalidDeviceIndex(7)));
    }

    #[test]
    fn test_confidence_gate() {
        let mut pose = Pose::identity_at(0);
        pose.tracker_confidence = Confidence::Low;

        assert!(pose.is_confident(Confidence::Failed));
        assert!(pose.is_confident(Confidence::Low));
        assert!(!pose.is_confident(Confidence::Medium));
    }

    #[test]
    fn test_timestamp_secs() {
        assert_eq!(Pose::identity_at(0).timestamp_secs(), 0.0);
        assert!((Pose::identity_at(1_500_000_000).timestamp_secs() - 1.5).abs() < 1e-12);
    }

    #[test]
    fn test_display_summary() {
        let mut pose = Pose::identity_at(1_500_000);
        pose.position = Vector3::new(1.0, -2.0, 0.5);

        let text = pose.to_string();
        assert!(text.contains("HMD"));
        assert!(text.contains("t=1500000ns"));
        assert!(text.contains("(+1.0000, -2.0000, +0.5000)m"));
        assert!(text.contains("confidence=HIGH"));
    }

    #[test]
    fn test_deserialize_fills_defaults() {
        let json = r#"{
            "timestamp": 42,
            "position": [1.0, 2.0, 3.0],
            "orientation": [0.0, 0.0, 0.0, 1.0],
            "tracker_confidence": "medium"
        }"#;

        let pose: Pose = serde_json::from_str(json).unwrap();
        assert_eq!(pose.timestamp, 42);
        assert_eq!(pose.source, DeviceIndex::Hmd);
        assert_eq!(pose.position, Vector3::new(1.0, 2.0, 3.0));
        assert_eq!(pose.orientation, Quaternion::identity());
        assert_eq!(pose.linear_velocity, Vector3::zeros());
        assert_eq!(pose.tracker_confidence, Confidence::Medium);
        assert_eq!(pose.mapper_confidence, Confidence::Failed);
    }
}
