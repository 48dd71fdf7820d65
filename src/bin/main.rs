use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use trimer_analysis_rs::trajectory::save_frame_values_to_csv;
use trimer_analysis_rs::{
    launch_jobs, load_samples_csv, run_batch, write_histograms, write_samples_csv,
    AnalysisConfig, ConditionSamples, LaunchSpec, SegmentLayout, Trajectory, VtfTrajectory,
};

/// Command-line tool for analyzing dipole alignment in trimer trajectories
#[derive(Parser)]
#[command(name = "trimer-analysis")]
#[command(about = "Compute the dipole order parameter S from VTF trajectories and histogram P(S) per shift", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute S for every (shift, run) trajectory and write P(S) histograms
    Analyze {
        /// Directory containing trimer_shift_*.vtf files
        #[arg(long)]
        data_dir: Option<PathBuf>,

        /// Shift values (e.g. 0.0 0.1 0.2 ...)
        #[arg(long, num_args = 1.., allow_negative_numbers = true)]
        shifts: Vec<f64>,

        /// Run indices per shift (default: 1 2 3 4)
        #[arg(long, num_args = 1..)]
        runs: Vec<usize>,

        /// Frame counts for each segment (default: 500 100 2000 100 2000)
        #[arg(long, num_args = 5, value_names = ["INITIAL", "ON1", "OFF1", "ON2", "OFF2"])]
        segment_lengths: Option<Vec<usize>>,

        /// Number of bins for histogram (default: 50)
        #[arg(long)]
        bins: Option<usize>,

        /// Where to save histogram plots (default: .)
        #[arg(long)]
        output_dir: Option<PathBuf>,

        /// JSON configuration file; command-line flags override its values
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Optional CSV path for the pooled S samples
        #[arg(long)]
        samples: Option<PathBuf>,
    },

    /// Compute S for the sampled frames of a single trajectory
    FrameValues {
        /// Path to the VTF trajectory file
        #[arg(short, long)]
        trajectory: PathBuf,

        /// Frame counts for each segment (default: 500 100 2000 100 2000)
        #[arg(long, num_args = 5, value_names = ["INITIAL", "ON1", "OFF1", "ON2", "OFF2"])]
        segment_lengths: Option<Vec<usize>>,

        /// Output CSV path (columns: frame, s)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Regenerate histograms from a samples CSV written by analyze
    Plot {
        /// Samples CSV (columns: shift, s)
        #[arg(short, long)]
        samples: PathBuf,

        /// Number of bins for histogram
        #[arg(long, default_value_t = 50)]
        bins: usize,

        /// Where to save histogram plots
        #[arg(long, default_value = ".")]
        output_dir: PathBuf,
    },

    /// Launch one simulation per (shift, run) in parallel and wait for all of them
    Launch {
        /// Interpreter or executable to run
        #[arg(long, default_value = "python")]
        program: String,

        /// Simulation script passed as first argument
        #[arg(long, default_value = "trimer_sim.py")]
        script: String,

        #[arg(long, num_args = 1.., allow_negative_numbers = true)]
        shifts: Vec<f64>,

        #[arg(long, num_args = 1..)]
        runs: Vec<usize>,

        #[arg(long, default_value_t = 123456)]
        base_seed: u64,
    },
}

fn parse_layout(segment_lengths: Option<Vec<usize>>) -> Result<Option<[usize; 5]>, String> {
    match segment_lengths {
        None => Ok(None),
        Some(lengths) => <[usize; 5]>::try_from(lengths.as_slice())
            .map(Some)
            .map_err(|_| format!("expected 5 segment lengths, got {}", lengths.len())),
    }
}

fn report_histograms(conditions: &[ConditionSamples], bins: usize, output_dir: &Path) {
    match write_histograms(conditions, bins, output_dir) {
        Ok(written) => {
            for path in written.iter().filter(|p| p.extension().map_or(false, |e| e == "svg")) {
                println!("📄 Saved histogram to {:?}", path);
            }
            println!("✅ All histograms generated.");
        }
        Err(e) => {
            eprintln!("❌ Error writing histograms: {}", e);
            std::process::exit(1);
        }
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Analyze {
            data_dir,
            shifts,
            runs,
            segment_lengths,
            bins,
            output_dir,
            config,
            samples,
        } => {
            let mut cfg = match config {
                Some(path) => match AnalysisConfig::from_json_file(&path) {
                    Ok(c) => {
                        println!("✅ Loaded configuration from {:?}", path);
                        c
                    }
                    Err(e) => {
                        eprintln!("❌ Error loading configuration: {}", e);
                        std::process::exit(1);
                    }
                },
                None => AnalysisConfig::default(),
            };

            if let Some(dir) = data_dir {
                cfg.data_dir = dir;
            }
            if !shifts.is_empty() {
                cfg.shifts = shifts;
            }
            if !runs.is_empty() {
                cfg.runs = runs;
            }
            match parse_layout(segment_lengths) {
                Ok(Some(lengths)) => cfg.segment_lengths = lengths,
                Ok(None) => {}
                Err(e) => {
                    eprintln!("❌ {}", e);
                    std::process::exit(1);
                }
            }
            if let Some(b) = bins {
                cfg.bins = b;
            }
            if let Some(dir) = output_dir {
                cfg.output_dir = dir;
            }

            if let Err(e) = cfg.validate() {
                eprintln!("❌ {}", e);
                std::process::exit(1);
            }
            if cfg.shifts.is_empty() {
                log::warn!("No shifts given; nothing to analyse.");
            }

            println!("Data directory: {:?}", cfg.data_dir);
            println!("Segment lengths: {:?}", cfg.segment_lengths);

            let report = run_batch(&cfg);
            println!(
                "✅ Collected {} S values from {} shifts ({} files missing, {} failed)",
                report.total_values(),
                report.conditions.len(),
                report.missing.len(),
                report.failed.len()
            );
            for failed in &report.failed {
                eprintln!("❌ {:?}: {}", failed.path, failed.reason);
            }

            if let Some(samples_path) = samples {
                match write_samples_csv(&report.conditions, &samples_path) {
                    Ok(()) => println!("📄 Samples saved to: {:?}", samples_path),
                    Err(e) => {
                        eprintln!("❌ Error saving samples: {}", e);
                        std::process::exit(1);
                    }
                }
            }

            report_histograms(&report.conditions, cfg.bins, &cfg.output_dir);
        }

        Commands::FrameValues {
            trajectory,
            segment_lengths,
            output,
        } => {
            println!("Reading trajectory: {:?}", trajectory);

            let layout = match parse_layout(segment_lengths) {
                Ok(lengths) => lengths.map(SegmentLayout::from).unwrap_or_default(),
                Err(e) => {
                    eprintln!("❌ {}", e);
                    std::process::exit(1);
                }
            };

            let traj = match VtfTrajectory::open(&trajectory) {
                Ok(t) => t,
                Err(e) => {
                    eprintln!("❌ Error reading trajectory: {}", e);
                    std::process::exit(1);
                }
            };

            match traj.compute_s_values(&layout) {
                Ok(values) => {
                    println!("✅ Successfully computed S for {} frames", values.len());
                    if !values.is_empty() {
                        let mean = values.iter().map(|v| v.s).sum::<f64>() / values.len() as f64;
                        println!("Mean S: {:.6}", mean);
                    }
                    if let Some(output_path) = output {
                        if let Err(e) = save_frame_values_to_csv(&values, &output_path) {
                            eprintln!("❌ Error saving values: {}", e);
                            std::process::exit(1);
                        }
                        println!("📄 Results saved to: {:?}", output_path);
                    }
                }
                Err(e) => {
                    eprintln!("❌ Error analysing trajectory: {}", e);
                    std::process::exit(1);
                }
            }
        }

        Commands::Plot {
            samples,
            bins,
            output_dir,
        } => {
            println!("Loading samples: {:?}", samples);

            let conditions = match load_samples_csv(&samples) {
                Ok(c) => {
                    println!("✅ Loaded {} shifts from CSV", c.len());
                    c
                }
                Err(e) => {
                    eprintln!("❌ Error loading CSV: {}", e);
                    std::process::exit(1);
                }
            };

            report_histograms(&conditions, bins, &output_dir);
        }

        Commands::Launch {
            program,
            script,
            shifts,
            runs,
            base_seed,
        } => {
            let defaults = LaunchSpec::default();
            let spec = LaunchSpec {
                program,
                args: vec![script],
                shifts: if shifts.is_empty() { defaults.shifts } else { shifts },
                runs: if runs.is_empty() { defaults.runs } else { runs },
                base_seed,
            };

            let summary = launch_jobs(&spec);
            let failures: Vec<_> = summary.failures().collect();
            if failures.is_empty() {
                println!("✅ All {} jobs finished.", summary.outcomes.len());
            } else {
                for job in &failures {
                    eprintln!(
                        "❌ Job shift={:?} run={} failed (exit code {:?}{})",
                        job.shift,
                        job.run,
                        job.exit_code,
                        job.error.as_deref().map(|e| format!(", {}", e)).unwrap_or_default()
                    );
                }
                std::process::exit(1);
            }
        }
    }
}
