//! Coordinate-convention conversion from the tracker frame to a renderer frame.
//!
//! The tracking device publishes right-handed poses. A renderer usually
//! wants its own axis layout and handedness, so every consumer applies a
//! fixed remap before use:
//! 1. optionally mirror the rotation (negate `x` and `w`)
//! 2. left-multiply by a fixed reference rotation
//! 3. permute the position components
//!
//! The remap is a pure function of `position` and `orientation`. It does not
//! care whether the pose was predicted first.

use std::f64::consts::{FRAC_PI_2, PI};

use nalgebra::{Quaternion, UnitQuaternion, Vector3};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::pose::Pose;

/// How far a reference rotation's norm may stray from 1.
pub const UNIT_NORM_TOLERANCE: f64 = 1e-6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }
}

/// Permutation of position components.
///
/// Entry `i` names the source axis that lands in output component `i`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "[Axis; 3]", into = "[Axis; 3]")]
pub struct AxisSwizzle([Axis; 3]);

impl AxisSwizzle {
    pub const IDENTITY: Self = Self([Axis::X, Axis::Y, Axis::Z]);

    /// `(x, y, z) -> (x, z, y)`
    pub const XZY: Self = Self([Axis::X, Axis::Z, Axis::Y]);

    /// Builds a swizzle, rejecting anything that is not a permutation.
    pub fn new(axes: [Axis; 3]) -> Result<Self, ConfigError> {
        let mut seen = [false; 3];
        for axis in axes {
            if std::mem::replace(&mut seen[axis.index()], true) {
                return Err(ConfigError::InvalidSwizzle(axes));
            }
        }
        Ok(Self(axes))
    }

    pub fn axes(&self) -> [Axis; 3] {
        self.0
    }

    pub fn apply(&self, v: &Vector3<f64>) -> Vector3<f64> {
        Vector3::new(v[self.0[0].index()], v[self.0[1].index()], v[self.0[2].index()])
    }
}

impl Default for AxisSwizzle {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl TryFrom<[Axis; 3]> for AxisSwizzle {
    type Error = ConfigError;

    fn try_from(axes: [Axis; 3]) -> Result<Self, Self::Error> {
        Self::new(axes)
    }
}

impl From<AxisSwizzle> for [Axis; 3] {
    fn from(swizzle: AxisSwizzle) -> Self {
        swizzle.0
    }
}

/// Position and rotation ready to hand to a scene-graph node.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RenderPose {
    pub position: Vector3<f64>,
    pub rotation: Quaternion<f64>,
}

/// A fixed tracker-to-renderer remap.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CoordinateConvention {
    /// Applied on the left after mirroring
    pub reference_rotation: Quaternion<f64>,

    /// Negate the quaternion `x` and `w` components before rotating
    #[serde(default)]
    pub mirror_rotation: bool,

    #[serde(default)]
    pub position_axes: AxisSwizzle,
}

impl CoordinateConvention {
    /// Left-handed, Y-up renderer frame.
    ///
    /// Mirrors the rotation, then applies the Euler rotation (-90°, 180°, 0°)
    /// in Z-X-Y application order, i.e. `Ry(180°) * Rx(-90°)`. Position
    /// components are swapped `(x, y, z) -> (x, z, y)`.
    pub fn left_handed_y_up() -> Self {
        let about_x = UnitQuaternion::from_axis_angle(&Vector3::x_axis(), -FRAC_PI_2);
        let about_y = UnitQuaternion::from_axis_angle(&Vector3::y_axis(), PI);

        Self {
            reference_rotation: (about_y * about_x).into_inner(),
            mirror_rotation: true,
            position_axes: AxisSwizzle::XZY,
        }
    }

    /// Leaves poses in the tracker's own frame.
    pub fn native() -> Self {
        Self {
            reference_rotation: Quaternion::identity(),
            mirror_rotation: false,
            position_axes: AxisSwizzle::IDENTITY,
        }
    }

    /// Rejects a reference rotation that is not a finite unit quaternion.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let q = &self.reference_rotation;
        if !q.coords.iter().all(|c| c.is_finite()) {
            return Err(ConfigError::InvalidReferenceRotation);
        }
        let norm = q.norm();
        if (norm - 1.0).abs() > UNIT_NORM_TOLERANCE {
            return Err(ConfigError::NonUnitReferenceRotation(norm));
        }
        Ok(())
    }

    pub fn convert_rotation(&self, orientation: &Quaternion<f64>) -> Quaternion<f64> {
        let q = if self.mirror_rotation {
            Quaternion::new(-orientation.w, -orientation.i, orientation.j, orientation.k)
        } else {
            *orientation
        };
        self.reference_rotation * q
    }

    pub fn convert_position(&self, position: &Vector3<f64>) -> Vector3<f64> {
        self.position_axes.apply(position)
    }

    pub fn convert(&self, pose: &Pose) -> RenderPose {
        RenderPose {
            position: self.convert_position(&pose.position),
            rotation: self.convert_rotation(&pose.orientation),
        }
    }
}

impl Default for CoordinateConvention {
    fn default() -> Self {
        Self::left_handed_y_up()
    }
}

/// Named conventions selectable from config.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConventionPreset {
    LeftHandedYUp,
    Native,
}

/// Config-facing convention: either a preset name or a full custom remap.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConventionSetting {
    Preset(ConventionPreset),
    Custom(CoordinateConvention),
}

impl ConventionSetting {
    pub fn resolve(&self) -> CoordinateConvention {
        match self {
            ConventionSetting::Preset(ConventionPreset::LeftHandedYUp) => {
                CoordinateConvention::left_handed_y_up()
            }
            ConventionSetting::Preset(ConventionPreset::Native) => CoordinateConvention::native(),
            ConventionSetting::Custom(convention) => *convention,
        }
    }
}

impl Default for ConventionSetting {
    fn default() -> Self {
        ConventionSetting::Preset(ConventionPreset::LeftHandedYUp)
    }
}
