//! Batch driver: runs every (shift, run) trajectory through the analysis and pools the
//! order-parameter samples per shift.

use std::path::{Path, PathBuf};

use indicatif::{ProgressBar, ProgressStyle};
use serde::{Deserialize, Serialize};

use crate::config::AnalysisConfig;
use crate::error::{AnalysisError, Result};
use crate::sampler::SegmentLayout;
use crate::trajectory::{Trajectory, VtfTrajectory};

/// Shift label used in file names and reports: one fractional digit
pub fn format_shift(shift: f64) -> String {
    format!("{:.1}", shift)
}

/// Location of the trajectory for one (shift, run) combination
pub fn trajectory_path(data_dir: &Path, shift: f64, run: usize) -> PathBuf {
    data_dir.join(format!("trimer_shift_{}_run{}.vtf", format_shift(shift), run))
}

/// All valid S samples pooled over the runs of one shift
#[derive(Debug, Clone, PartialEq)]
pub struct ConditionSamples {
    pub shift: f64,
    pub values: Vec<f64>,
}

impl ConditionSamples {
    pub fn new(shift: f64) -> Self {
        Self {
            shift,
            values: Vec::new(),
        }
    }

    pub fn label(&self) -> String {
        format_shift(self.shift)
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// A trajectory that was present but could not be analysed
#[derive(Debug, Clone)]
pub struct FailedFile {
    pub path: PathBuf,
    pub reason: String,
}

/// Outcome of a batch: samples per shift, in configuration order, plus skipped files
#[derive(Debug, Clone, Default)]
pub struct BatchReport {
    pub conditions: Vec<ConditionSamples>,
    pub missing: Vec<PathBuf>,
    pub failed: Vec<FailedFile>,
}

impl BatchReport {
    pub fn condition(&self, shift: f64) -> Option<&ConditionSamples> {
        self.conditions.iter().find(|c| c.shift == shift)
    }

    fn condition_mut(&mut self, shift: f64) -> &mut ConditionSamples {
        let idx = match self.conditions.iter().position(|c| c.shift == shift) {
            Some(idx) => idx,
            None => {
                self.conditions.push(ConditionSamples::new(shift));
                self.conditions.len() - 1
            }
        };
        &mut self.conditions[idx]
    }

    pub fn total_values(&self) -> usize {
        self.conditions.iter().map(|c| c.values.len()).sum()
    }

    /// Shifts that ended the batch without a single valid sample
    pub fn empty_conditions(&self) -> Vec<f64> {
        self.conditions
            .iter()
            .filter(|c| c.is_empty())
            .map(|c| c.shift)
            .collect()
    }
}

/// Valid order-parameter values of one trajectory file, in frame order
pub fn compute_s_for_file(path: &Path, layout: &SegmentLayout) -> Result<Vec<f64>> {
    let trajectory = VtfTrajectory::open(path)?;
    let values = trajectory.compute_s_values(layout)?;
    Ok(values.into_iter().map(|v| v.s).collect())
}

/// Analyse every (shift, run) trajectory named by `config`.
///
/// Missing files and files that fail to parse are reported and skipped; the batch
/// always runs to completion.
pub fn run_batch(config: &AnalysisConfig) -> BatchReport {
    let layout = config.layout();
    let mut report = BatchReport::default();

    let total_files = config.shifts.len() * config.runs.len();
    let pb = ProgressBar::new(total_files as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{wide_bar:.cyan/blue}] {pos}/{len} files ({percent}%) | ETA: {eta}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-"),
    );

    for &shift in &config.shifts {
        report.condition_mut(shift);

        for &run in &config.runs {
            let path = trajectory_path(&config.data_dir, shift, run);
            pb.inc(1);

            log::info!("Processing {} ...", path.display());
            match compute_s_for_file(&path, &layout) {
                Ok(values) => {
                    log::info!("{}: {} valid S values", path.display(), values.len());
                    report.condition_mut(shift).values.extend(values);
                }
                Err(AnalysisError::MissingFile(path)) => {
                    log::warn!("File {} not found, skipping.", path.display());
                    report.missing.push(path);
                }
                Err(e) => {
                    log::error!("Failed to analyse {}: {}", path.display(), e);
                    report.failed.push(FailedFile {
                        path,
                        reason: e.to_string(),
                    });
                }
            }
        }
    }

    pb.finish_and_clear();

    for shift in report.empty_conditions() {
        log::warn!(
            "No valid S values were found for shift {}.",
            format_shift(shift)
        );
    }

    report
}

#[derive(Debug, Serialize, Deserialize)]
struct SampleRow {
    shift: String,
    s: f64,
}

/// Save every pooled sample as a `shift,s` row
pub fn write_samples_csv(conditions: &[ConditionSamples], output_path: &Path) -> Result<()> {
    let mut writer = csv::Writer::from_path(output_path)?;

    for condition in conditions {
        let shift = condition.label();
        for &s in &condition.values {
            writer.serialize(SampleRow {
                shift: shift.clone(),
                s,
            })?;
        }
    }

    writer
        .flush()
        .map_err(|e| AnalysisError::io(output_path, e))?;

    Ok(())
}

/// Load samples written by `write_samples_csv`, keeping the order shifts first appear in
pub fn load_samples_csv(csv_path: &Path) -> Result<Vec<ConditionSamples>> {
    let mut reader = csv::Reader::from_path(csv_path)?;
    let mut report = BatchReport::default();

    for (idx, row) in reader.deserialize::<SampleRow>().enumerate() {
        let row = row?;
        let shift: f64 = row.shift.trim().parse().map_err(|e| AnalysisError::Parse {
            line: idx + 2,
            reason: format!("invalid shift '{}': {}", row.shift, e),
        })?;
        report.condition_mut(shift).values.push(row.s);
    }

    Ok(report.conditions)
}
