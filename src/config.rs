use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{AnalysisError, Result};
use crate::sampler::SegmentLayout;

/// Batch parameters for a shift scan
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Directory holding `trimer_shift_<shift>_run<run>.vtf` files
    pub data_dir: PathBuf,
    pub shifts: Vec<f64>,
    pub runs: Vec<usize>,
    /// initial, on1, off1, on2, off2 frame counts
    pub segment_lengths: [usize; 5],
    pub bins: usize,
    pub output_dir: PathBuf,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("."),
            shifts: Vec::new(),
            runs: vec![1, 2, 3, 4],
            segment_lengths: SegmentLayout::default().lengths(),
            bins: 50,
            output_dir: PathBuf::from("."),
        }
    }
}

impl AnalysisConfig {
    pub fn from_json_str(content: &str) -> Result<Self> {
        serde_json::from_str(content)
            .map_err(|e| AnalysisError::Config(format!("json parse error: {e}")))
    }

    pub fn from_json_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| AnalysisError::io(path, e))?;
        Self::from_json_str(&content)
    }

    pub fn layout(&self) -> SegmentLayout {
        SegmentLayout::from(self.segment_lengths)
    }

    pub fn validate(&self) -> Result<()> {
        if self.bins == 0 {
            return Err(AnalysisError::Config("bins must be at least 1".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_fill_missing_fields() {
        let cfg = AnalysisConfig::from_json_str(r#"{"data_dir": "runs", "shifts": [0.0, 0.1]}"#)
            .unwrap();
        assert_eq!(cfg.data_dir, PathBuf::from("runs"));
        assert_eq!(cfg.shifts, vec![0.0, 0.1]);
        assert_eq!(cfg.runs, vec![1, 2, 3, 4]);
        assert_eq!(cfg.segment_lengths, [500, 100, 2000, 100, 2000]);
        assert_eq!(cfg.bins, 50);
        assert_eq!(cfg.layout(), SegmentLayout::default());
    }

    #[test]
    fn test_wrong_types_rejected() {
        let err = AnalysisConfig::from_json_str(r#"{"segment_lengths": [1, 2, 3]}"#).unwrap_err();
        assert!(matches!(err, AnalysisError::Config(_)));
        let err = AnalysisConfig::from_json_str(r#"{"bins": "many"}"#).unwrap_err();
        assert!(matches!(err, AnalysisError::Config(_)));
    }

    #[test]
    fn test_zero_bins_invalid() {
        let cfg = AnalysisConfig {
            bins: 0,
            ..AnalysisConfig::default()
        };
        assert!(cfg.validate().is_err());
        assert!(AnalysisConfig::default().validate().is_ok());
    }
}
