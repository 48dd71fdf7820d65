use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::error::{AnalysisError, Result};
use crate::order::{compute_s_frame, TrimerPairing};
use crate::sampler::{sampled_frames, SegmentLayout};
use crate::structure::RoleMap;
use crate::vtf::{self, FrameRange};

/// Order parameter of a single sampled frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FrameValue {
    pub frame: usize,
    pub s: f64,
}

/// Trait for reading and processing trajectory files
pub trait Trajectory {
    /// Read the structure block and map each declared particle to its role
    fn read_structure(&self) -> Result<RoleMap>;

    /// Line ranges of every frame, in the order the frames appear in the file
    fn frame_ranges(&self) -> Vec<FrameRange>;

    /// Calculate S for every frame the sampling policy selects under `layout`.
    ///
    /// Degenerate frames are left out of the result.
    ///
    /// # Returns
    /// One FrameValue per sampled frame with a defined order parameter, in frame order
    fn compute_s_values(&self, layout: &SegmentLayout) -> Result<Vec<FrameValue>>;
}

/// Implementation of Trajectory trait for VTF files, read fully into memory
pub struct VtfTrajectory {
    file_path: PathBuf,
    contents: String,
}

impl VtfTrajectory {
    pub fn open(file_path: impl AsRef<Path>) -> Result<Self> {
        let path = file_path.as_ref();
        if !path.exists() {
            return Err(AnalysisError::MissingFile(path.to_path_buf()));
        }
        let contents = fs::read_to_string(path).map_err(|e| AnalysisError::io(path, e))?;
        Ok(Self::from_contents(path, contents))
    }

    /// Wrap text that is already in memory; `file_path` is only used for reporting
    pub fn from_contents(file_path: impl AsRef<Path>, contents: impl Into<String>) -> Self {
        Self {
            file_path: file_path.as_ref().to_path_buf(),
            contents: contents.into(),
        }
    }

    fn lines(&self) -> Vec<&str> {
        self.contents.lines().collect()
    }
}

impl Trajectory for VtfTrajectory {
    fn read_structure(&self) -> Result<RoleMap> {
        vtf::parse_role_map(self.contents.lines())
    }

    fn frame_ranges(&self) -> Vec<FrameRange> {
        vtf::index_frames(&self.lines())
    }

    fn compute_s_values(&self, layout: &SegmentLayout) -> Result<Vec<FrameValue>> {
        let lines = self.lines();
        let roles = vtf::parse_role_map(lines.iter().copied())?;
        let pairing = TrimerPairing::from_role_map(&roles)?;
        let ranges = vtf::index_frames(&lines);

        let sampled = sampled_frames(layout, ranges.len());
        log::debug!(
            "{}: {} particles, {} frames, sampling frames {:?}",
            self.file_path.display(),
            roles.len(),
            ranges.len(),
            sampled
        );

        let mut values = Vec::with_capacity(sampled.len());
        let mut skipped = 0usize;

        for frame in sampled {
            let positions = vtf::frame_positions(&lines, ranges[frame], &roles)?;
            match compute_s_frame(&positions, &pairing) {
                Some(s) => values.push(FrameValue { frame, s }),
                None => {
                    skipped += 1;
                    log::debug!("frame {} has no defined S, skipping", frame);
                }
            }
        }

        if skipped > 0 {
            log::debug!(
                "{}: skipped {} degenerate frames",
                self.file_path.display(),
                skipped
            );
        }

        Ok(values)
    }
}

/// Save per-frame values to CSV file
pub fn save_frame_values_to_csv(values: &[FrameValue], output_path: &Path) -> Result<()> {
    let mut writer = csv::Writer::from_path(output_path)?;

    for value in values {
        writer.serialize(value)?;
    }

    writer
        .flush()
        .map_err(|e| AnalysisError::io(output_path, e))?;

    Ok(())
}
