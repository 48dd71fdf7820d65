use pyo3::prelude::*;
use pyo3::types::{PyDict, PyList};
use std::path::{Path, PathBuf};

use crate::aggregate::{compute_s_for_file, run_batch};
use crate::config::AnalysisConfig;
use crate::error::AnalysisError;
use crate::sampler::SegmentLayout;

fn to_py_err(err: AnalysisError) -> PyErr {
    match err {
        AnalysisError::Io { .. } | AnalysisError::MissingFile(_) => {
            PyErr::new::<pyo3::exceptions::PyIOError, _>(err.to_string())
        }
        _ => PyErr::new::<pyo3::exceptions::PyRuntimeError, _>(err.to_string()),
    }
}

/// Python binding for the per-file S calculation
#[pyfunction]
#[pyo3(signature = (trajectory_file, segment_lengths=[500, 100, 2000, 100, 2000]))]
fn compute_s_values(
    py: Python<'_>,
    trajectory_file: &str,
    segment_lengths: [usize; 5],
) -> PyResult<PyObject> {
    let layout = SegmentLayout::from(segment_lengths);
    let values = compute_s_for_file(Path::new(trajectory_file), &layout).map_err(to_py_err)?;

    let py_values = PyList::empty_bound(py);
    for s in values {
        py_values.append(s)?;
    }

    Ok(py_values.into())
}

/// Python binding for the batch analysis: returns {shift_label: [S, ...]}
#[pyfunction]
#[pyo3(signature = (data_dir, shifts, runs=vec![1, 2, 3, 4], segment_lengths=[500, 100, 2000, 100, 2000]))]
fn analyze(
    py: Python<'_>,
    data_dir: &str,
    shifts: Vec<f64>,
    runs: Vec<usize>,
    segment_lengths: [usize; 5],
) -> PyResult<PyObject> {
    let config = AnalysisConfig {
        data_dir: PathBuf::from(data_dir),
        shifts,
        runs,
        segment_lengths,
        ..AnalysisConfig::default()
    };

    // The batch itself touches no Python objects.
    let report = py.allow_threads(|| run_batch(&config));

    let py_conditions = PyDict::new_bound(py);
    for condition in &report.conditions {
        let py_values = PyList::empty_bound(py);
        for s in &condition.values {
            py_values.append(*s)?;
        }
        py_conditions.set_item(condition.label(), py_values)?;
    }

    Ok(py_conditions.into())
}

/// Python module definition
#[pymodule]
fn trimer_analysis_rs(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(compute_s_values, m)?)?;
    m.add_function(wrap_pyfunction!(analyze, m)?)?;
    m.add("__doc__", "Trimer dipole order-parameter analysis with Python bindings")?;
    Ok(())
}
