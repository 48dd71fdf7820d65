//! Probability-density histograms of pooled S samples.
//!
//! Figures are drawn with the SVG backend so that no system fonts are needed.

use std::fs;
use std::path::{Path, PathBuf};

use plotters::prelude::*;
use plotters_svg::SVGBackend;
use serde::Serialize;

use crate::aggregate::ConditionSamples;
use crate::error::{AnalysisError, Result};

/// Equal-width density histogram over the sample range
#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    /// `bins + 1` edges; the last bin is closed on the right
    pub edges: Vec<f64>,
    pub counts: Vec<usize>,
    /// Normalised so that `sum(density * width) == 1`
    pub densities: Vec<f64>,
}

impl Histogram {
    /// Bin `values` into `bins` equal-width bins spanning their minimum and maximum.
    ///
    /// Returns None for an empty sample. When every value is equal the range is widened
    /// to `[v - 0.5, v + 0.5]`.
    pub fn from_values(values: &[f64], bins: usize) -> Result<Option<Histogram>> {
        if bins == 0 {
            return Err(AnalysisError::Config("bins must be at least 1".into()));
        }
        if values.is_empty() {
            return Ok(None);
        }

        let (mut lo, mut hi) = values
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
                (lo.min(v), hi.max(v))
            });
        if !lo.is_finite() || !hi.is_finite() {
            return Err(AnalysisError::Config(
                "histogram input contains non-finite values".into(),
            ));
        }
        if lo == hi {
            lo -= 0.5;
            hi += 0.5;
        }

        let width = (hi - lo) / bins as f64;
        let mut edges: Vec<f64> = (0..bins).map(|i| lo + i as f64 * width).collect();
        edges.push(hi);

        let mut counts = vec![0usize; bins];
        for &v in values {
            let mut idx = ((((v - lo) / (hi - lo)) * bins as f64) as usize).min(bins - 1);
            // The scaled index can land one bin off near an edge; the edges decide.
            if idx > 0 && v < edges[idx] {
                idx -= 1;
            } else if idx + 1 < bins && v >= edges[idx + 1] {
                idx += 1;
            }
            counts[idx] += 1;
        }

        let total = values.len() as f64;
        let densities = counts
            .iter()
            .zip(edges.windows(2))
            .map(|(&count, edge)| count as f64 / (total * (edge[1] - edge[0])))
            .collect();

        Ok(Some(Histogram {
            edges,
            counts,
            densities,
        }))
    }

    pub fn bins(&self) -> usize {
        self.counts.len()
    }

    /// (bin_start, bin_end, density) for every bin
    pub fn bars(&self) -> impl Iterator<Item = (f64, f64, f64)> + '_ {
        self.edges
            .windows(2)
            .zip(&self.densities)
            .map(|(edge, &density)| (edge[0], edge[1], density))
    }
}

#[derive(Debug, Serialize)]
struct HistogramRow {
    bin_start: f64,
    bin_end: f64,
    count: usize,
    density: f64,
}

/// Save histogram bins to CSV file
pub fn save_histogram_to_csv(histogram: &Histogram, output_path: &Path) -> Result<()> {
    let mut writer = csv::Writer::from_path(output_path)?;

    for ((bin_start, bin_end, density), &count) in histogram.bars().zip(&histogram.counts) {
        writer.serialize(HistogramRow {
            bin_start,
            bin_end,
            count,
            density,
        })?;
    }

    writer
        .flush()
        .map_err(|e| AnalysisError::io(output_path, e))?;

    Ok(())
}

fn plot_error<E: std::fmt::Display>(err: E) -> AnalysisError {
    AnalysisError::Plot(err.to_string())
}

/// Draw the histogram of one shift as an SVG bar chart
pub fn render_histogram_svg(histogram: &Histogram, shift_label: &str, output_path: &Path) -> Result<()> {
    let root = SVGBackend::new(output_path, (800, 600)).into_drawing_area();
    root.fill(&WHITE).map_err(plot_error)?;

    let x_range = histogram.edges[0]..histogram.edges[histogram.edges.len() - 1];
    let y_max = histogram.densities.iter().copied().fold(0.0, f64::max);
    let y_top = if y_max > 0.0 { y_max * 1.05 } else { 1.0 };

    let mut chart = ChartBuilder::on(&root)
        .caption(
            format!("Histogram P(S) for shift = {}", shift_label),
            ("sans-serif", 22),
        )
        .margin(20)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(x_range, 0.0..y_top)
        .map_err(plot_error)?;

    chart
        .configure_mesh()
        .x_desc("S")
        .y_desc("P(S)")
        .draw()
        .map_err(plot_error)?;

    chart
        .draw_series(histogram.bars().map(|(start, end, density)| {
            Rectangle::new([(start, 0.0), (end, density)], BLUE.mix(0.6).filled())
        }))
        .map_err(plot_error)?;

    root.present().map_err(plot_error)?;
    Ok(())
}

/// Write `hist_shift_<shift>.csv` and `.svg` for every shift with samples.
///
/// Shifts without samples are reported and skipped. Returns the paths written.
pub fn write_histograms(
    conditions: &[ConditionSamples],
    bins: usize,
    output_dir: &Path,
) -> Result<Vec<PathBuf>> {
    if bins == 0 {
        return Err(AnalysisError::Config("bins must be at least 1".into()));
    }

    let mut written = Vec::new();

    for condition in conditions {
        let label = condition.label();
        let histogram = match Histogram::from_values(&condition.values, bins)? {
            Some(h) => h,
            None => {
                log::warn!(
                    "Skipping shift {} because no valid S values were found.",
                    label
                );
                continue;
            }
        };

        fs::create_dir_all(output_dir).map_err(|e| AnalysisError::io(output_dir, e))?;

        let csv_path = output_dir.join(format!("hist_shift_{}.csv", label));
        save_histogram_to_csv(&histogram, &csv_path)?;

        let svg_path = output_dir.join(format!("hist_shift_{}.svg", label));
        render_histogram_svg(&histogram, &label, &svg_path)?;

        log::info!("Saved histogram to {}", svg_path.display());
        written.push(csv_path);
        written.push(svg_path);
    }

    Ok(written)
}
