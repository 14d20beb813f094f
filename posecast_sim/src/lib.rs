//! PoseCast Simulation and Replay Harness
//!
//! Exercises the prediction pipeline without a headset attached:
//! - **Oracle**: seeded synthetic head motion with exact derivatives, so
//!   prediction error can be measured against ground truth
//! - **Report**: RMS / max position and angular error, predicted vs raw
//! - **Replay**: JSON-lines pose logs played back through a [`PoseSource`]
//!
//! # Usage
//!
//! ```ignore
//! use posecast_core::PosePredictor;
//! use posecast_sim::{evaluate, MotionOracle};
//!
//! let mut oracle = MotionOracle::new(42);
//! let report = evaluate(&mut oracle, &PosePredictor::new(0.02), 200.0, 10.0);
//! assert!(report.improves_on_baseline());
//! ```
//!
//! [`PoseSource`]: posecast_core::PoseSource

mod error;
mod oracle;
mod replay;
mod report;

pub use error::SimError;
pub use oracle::{MotionOracle, MotionProfile};
pub use replay::{record_pose_log, write_pose_log, ReplaySource};
pub use report::{angular_distance, evaluate, ErrorStats, PredictionReport};
