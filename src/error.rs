use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while reading trajectories or writing analysis outputs.
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("trajectory file not found: {}", .0.display())]
    MissingFile(PathBuf),
    #[error("malformed header at line {line}: {reason}")]
    MalformedHeader { line: usize, reason: String },
    #[error("malformed position record at line {line}: {reason}")]
    Parse { line: usize, reason: String },
    #[error("expected 3 real and 3 virtual particles, found {real} real and {virtual_sites} virtual")]
    Pairing { real: usize, virtual_sites: usize },
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("plot error: {0}")]
    Plot(String),
    #[error("invalid configuration: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, AnalysisError>;

impl AnalysisError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        AnalysisError::Io {
            path: path.into(),
            source,
        }
    }
}
