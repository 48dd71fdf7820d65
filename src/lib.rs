pub mod aggregate;
pub mod config;
pub mod error;
pub mod histogram;
pub mod launcher;
pub mod order;
pub mod sampler;
pub mod structure;
pub mod trajectory;
pub mod vtf;

#[cfg(feature = "python")]
pub mod python_bindings;

// Re-export commonly used types and traits
pub use aggregate::{
    compute_s_for_file, load_samples_csv, run_batch, trajectory_path, write_samples_csv,
    BatchReport, ConditionSamples,
};
pub use config::AnalysisConfig;
pub use error::{AnalysisError, Result};
pub use histogram::{write_histograms, Histogram};
pub use launcher::{launch_jobs, LaunchSpec, LaunchSummary};
pub use order::{compute_s_frame, TrimerPairing};
pub use sampler::{sampled_frames, sampled_range, SegmentLayout, Zone};
pub use structure::{Coordinate, FramePositions, ParticleRole, RoleMap};
pub use trajectory::{FrameValue, Trajectory, VtfTrajectory};
