//! Recorded motion replayed through the full tracking pipeline.

use approx::assert_relative_eq;
use posecast_core::{
    predict, Confidence, CoordinateConvention, Pose, TrackingConfig, TrackingTransformer,
    UpdateOutcome,
};
use posecast_sim::{write_pose_log, MotionOracle, ReplaySource};

fn recorded_motion() -> Vec<Pose> {
    let oracle = MotionOracle::new(2024);
    (0..50).map(|i| oracle.truth_at(i as f64 / 100.0)).collect()
}

#[test]
fn test_replay_drives_transform() {
    let poses = recorded_motion();
    let mut log = Vec::new();
    write_pose_log(&mut log, &poses).unwrap();

    let mut source = ReplaySource::from_reader(log.as_slice()).unwrap();
    let config = TrackingConfig::from_json_str(r#"{"prediction_time": 0.015}"#).unwrap();
    let mut transformer = TrackingTransformer::new(config).unwrap();

    let mut applied = 0;
    while let UpdateOutcome::Applied(_) = transformer.update(&mut source) {
        applied += 1;
    }
    assert_eq!(applied, poses.len());

    let last = poses.last().unwrap();
    let expected = CoordinateConvention::left_handed_y_up().convert(&predict(last, 0.015));
    let transform = transformer.transform();
    assert_relative_eq!(transform.local_position, expected.position, epsilon = 1e-9);
    assert_relative_eq!(
        transform.local_rotation.coords,
        expected.rotation.coords,
        epsilon = 1e-9
    );
}

#[test]
fn test_low_confidence_samples_are_skipped() {
    let mut poses = recorded_motion();
    for pose in poses.iter_mut().skip(1).step_by(2) {
        pose.tracker_confidence = Confidence::Failed;
    }
    let mut source = ReplaySource::new(poses);
    let mut transformer = TrackingTransformer::new(TrackingConfig::default()).unwrap();

    let mut applied = 0;
    let mut skipped = 0;
    loop {
        match transformer.update(&mut source) {
            UpdateOutcome::NoPose => break,
            UpdateOutcome::BelowConfidence(confidence) => {
                assert_eq!(confidence, Confidence::Failed);
                skipped += 1;
            }
            UpdateOutcome::Applied(_) => applied += 1,
            UpdateOutcome::OtherSource(device) => panic!("unexpected source filter on {device}"),
        }
    }

    assert_eq!(applied, 25);
    assert_eq!(skipped, 25);
}
