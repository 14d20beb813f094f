//! JSON-lines pose logs.
//!
//! One [`Pose`] per line. Blank lines and lines starting with `#` are
//! skipped, so logs can carry a header comment.

use std::collections::VecDeque;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use posecast_core::{Pose, PoseSource};
use tracing::debug;

use crate::error::SimError;

/// A [`PoseSource`] that plays back a recorded log, one sample per call.
#[derive(Debug, Clone, Default)]
pub struct ReplaySource {
    poses: VecDeque<Pose>,
}

impl ReplaySource {
    pub fn new(poses: impl IntoIterator<Item = Pose>) -> Self {
        Self {
            poses: poses.into_iter().collect(),
        }
    }

    /// Parses a whole log up front; the first malformed line aborts.
    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self, SimError> {
        let mut poses = VecDeque::new();
        for (index, line) in reader.lines().enumerate() {
            let line = line?;
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }
            let pose = serde_json::from_str(trimmed).map_err(|source| SimError::Parse {
                line: index + 1,
                source,
            })?;
            poses.push_back(pose);
        }
        debug!("loaded {} poses", poses.len());
        Ok(Self { poses })
    }

    pub fn open(path: impl AsRef<Path>) -> Result<Self, SimError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| SimError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_reader(BufReader::new(file))
    }

    /// Samples not yet played back.
    pub fn remaining(&self) -> usize {
        self.poses.len()
    }
}

impl PoseSource for ReplaySource {
    fn try_get_pose(&mut self) -> Option<Pose> {
        self.poses.pop_front()
    }
}

/// Writes `poses` as a JSON-lines log.
pub fn write_pose_log<'a, W: Write>(
    writer: W,
    poses: impl IntoIterator<Item = &'a Pose>,
) -> Result<usize, SimError> {
    let mut writer = BufWriter::new(writer);
    let mut count = 0;
    for pose in poses {
        serde_json::to_writer(&mut writer, pose)?;
        writer.write_all(b"\n")?;
        count += 1;
    }
    writer.flush()?;
    Ok(count)
}

/// Creates (or truncates) `path` and writes `poses` into it.
pub fn record_pose_log<'a>(
    path: impl AsRef<Path>,
    poses: impl IntoIterator<Item = &'a Pose>,
) -> Result<usize, SimError> {
    let path = path.as_ref();
    let file = File::create(path).map_err(|source| SimError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    write_pose_log(file, poses)
}
