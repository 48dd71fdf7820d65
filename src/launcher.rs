//! Fire-and-wait launcher for the simulation runs of a shift scan.
//!
//! Every (shift, run) job is spawned immediately; the launcher then blocks until all of
//! them exit. Jobs share nothing and there is no cancellation.

use std::process::{Child, Command};

/// Command template and parameter grid for a scan
#[derive(Debug, Clone, PartialEq)]
pub struct LaunchSpec {
    pub program: String,
    /// Arguments placed before the per-job flags (e.g. the simulation script)
    pub args: Vec<String>,
    pub shifts: Vec<f64>,
    pub runs: Vec<usize>,
    pub base_seed: u64,
}

impl Default for LaunchSpec {
    fn default() -> Self {
        Self {
            program: "python".to_string(),
            args: vec!["trimer_sim.py".to_string()],
            shifts: vec![0.0, 0.1, 0.2, 0.3, 0.4, 0.5],
            runs: vec![1, 2, 3, 4],
            base_seed: 123456,
        }
    }
}

/// Exit state of one job
#[derive(Debug, Clone, PartialEq)]
pub struct JobOutcome {
    pub shift: f64,
    pub run: usize,
    /// None when the job could not be spawned or waited on
    pub exit_code: Option<i32>,
    pub success: bool,
    pub error: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct LaunchSummary {
    pub outcomes: Vec<JobOutcome>,
}

impl LaunchSummary {
    pub fn all_succeeded(&self) -> bool {
        self.outcomes.iter().all(|o| o.success)
    }

    pub fn failures(&self) -> impl Iterator<Item = &JobOutcome> {
        self.outcomes.iter().filter(|o| !o.success)
    }
}

/// Full argument list of the job for (shift, run)
pub fn job_arguments(spec: &LaunchSpec, shift: f64, run: usize) -> Vec<String> {
    let mut args = spec.args.clone();
    args.extend([
        "--shift".to_string(),
        format!("{:?}", shift),
        "--run".to_string(),
        run.to_string(),
        "--base-seed".to_string(),
        spec.base_seed.to_string(),
    ]);
    args
}

/// Spawn every job of the scan, then wait for all of them.
///
/// Outcomes are listed in (shift, run) enumeration order, whether or not the job started.
pub fn launch_jobs(spec: &LaunchSpec) -> LaunchSummary {
    let mut jobs: Vec<(f64, usize, std::io::Result<Child>)> = Vec::new();

    for &shift in &spec.shifts {
        for &run in &spec.runs {
            let args = job_arguments(spec, shift, run);
            log::info!("Launching: {} {}", spec.program, args.join(" "));

            let spawned = Command::new(&spec.program).args(&args).spawn();
            if let Err(e) = &spawned {
                log::error!("Failed to launch job shift={} run={}: {}", shift, run, e);
            }
            jobs.push((shift, run, spawned));
        }
    }

    let outcomes = jobs
        .into_iter()
        .map(|(shift, run, spawned)| {
            let waited = spawned.and_then(|mut child| child.wait());
            match waited {
                Ok(status) => {
                    if !status.success() {
                        log::warn!("Job shift={} run={} exited with {}", shift, run, status);
                    }
                    JobOutcome {
                        shift,
                        run,
                        exit_code: status.code(),
                        success: status.success(),
                        error: None,
                    }
                }
                Err(e) => JobOutcome {
                    shift,
                    run,
                    exit_code: None,
                    success: false,
                    error: Some(e.to_string()),
                },
            }
        })
        .collect();

    log::info!("All jobs finished.");
    LaunchSummary { outcomes }
}
