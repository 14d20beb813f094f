//! Property tests for the prediction and convention math.

use nalgebra::{Quaternion, UnitQuaternion, Vector3};
use posecast_core::prediction::small_angle_threshold;
use posecast_core::{predict, quaternion_exp, AxisSwizzle, Pose, MAX_PREDICTION_TIME};
use proptest::prelude::*;

fn arb_vec3(range: f64) -> impl Strategy<Value = Vector3<f64>> {
    (-range..range, -range..range, -range..range).prop_map(|(x, y, z)| Vector3::new(x, y, z))
}

fn arb_orientation() -> impl Strategy<Value = Quaternion<f64>> {
    (-3.1..3.1f64, -1.5..1.5f64, -3.1..3.1f64).prop_map(|(roll, pitch, yaw)| {
        UnitQuaternion::from_euler_angles(roll, pitch, yaw).into_inner()
    })
}

prop_compose! {
    fn arb_pose()(
        position in arb_vec3(5.0),
        orientation in arb_orientation(),
        linear_velocity in arb_vec3(3.0),
        linear_acceleration in arb_vec3(20.0),
        angular_velocity in arb_vec3(5.7),
        angular_acceleration in arb_vec3(20.0),
    ) -> Pose {
        Pose {
            position,
            orientation,
            linear_velocity,
            linear_acceleration,
            angular_velocity,
            angular_acceleration,
            ..Pose::identity_at(0)
        }
    }
}

proptest! {
    #[test]
    fn zero_dt_leaves_pose_unchanged(pose in arb_pose()) {
        let predicted = predict(&pose, 0.0);
        prop_assert_eq!(predicted.position, pose.position);
        prop_assert!((predicted.orientation.coords - pose.orientation.coords).norm() < 1e-15);
    }

    #[test]
    fn long_horizons_clamp_to_max(pose in arb_pose(), dt in 0.1f64..100.0) {
        prop_assert_eq!(predict(&pose, dt), predict(&pose, MAX_PREDICTION_TIME));
    }

    #[test]
    fn constant_velocity_is_linear(mut pose in arb_pose(), dt in 0.0f64..0.1) {
        pose.linear_acceleration = Vector3::zeros();
        let predicted = predict(&pose, dt);
        let expected = pose.position + pose.linear_velocity * dt;
        prop_assert!((predicted.position - expected).norm() < 1e-12);
    }

    #[test]
    fn orientation_norm_stays_unit(pose in arb_pose(), dt in 0.0f64..=0.1) {
        let predicted = predict(&pose, dt);
        prop_assert!((predicted.orientation.norm() - 1.0).abs() < 1e-4);
    }

    #[test]
    fn passthrough_fields_unchanged(pose in arb_pose(), dt in -0.1f64..0.1) {
        let predicted = predict(&pose, dt);
        prop_assert_eq!(predicted.timestamp, pose.timestamp);
        prop_assert_eq!(predicted.linear_velocity, pose.linear_velocity);
        prop_assert_eq!(predicted.angular_velocity, pose.angular_velocity);
        prop_assert_eq!(predicted.tracker_confidence, pose.tracker_confidence);
    }

    #[test]
    fn exp_branches_agree_at_threshold(axis in arb_vec3(1.0), scale in 0.999f64..1.001) {
        prop_assume!(axis.norm() > 1e-3);
        let direction = axis.normalize();
        let boundary = 2.0 * small_angle_threshold().sqrt();

        let near = quaternion_exp(&(direction * boundary * scale));
        let at = quaternion_exp(&(direction * boundary));
        prop_assert!((near.coords - at.coords).norm() < 1e-5);
    }

    #[test]
    fn xzy_swizzle_is_an_involution(v in arb_vec3(100.0)) {
        let twice = AxisSwizzle::XZY.apply(&AxisSwizzle::XZY.apply(&v));
        prop_assert_eq!(twice, v);
    }
}
