//! houghtrack CLI - Hough-transform line finding on generated or recorded hits.
//!
//! Each subcommand maps onto one [`Operation`]: `points` generates the
//! five-track event, `hspace` builds the vote grids and `peaks` extracts
//! the ranked line candidates.
#![allow(clippy::uninlined_format_args)]

use clap::{Args, Parser, Subcommand};
use houghtrack_algorithms::{execute, EventSource, HoughConfig, Operation, Outcome, Scenario};
use houghtrack_core::{
    checked_count, Accumulator, AngleSweep, Peak, PeakConfig, PointSet, RadialAxis,
};
use houghtrack_io::{read_points_file, DataFileWriter};
use log::{debug, info, warn};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::{Path, PathBuf};
use std::time::Instant;
use thiserror::Error;

/// Result type for CLI operations.
type Result<T> = std::result::Result<T, CliError>;

/// CLI error types.
#[derive(Error, Debug)]
enum CliError {
    #[error("I/O error: {0}")]
    HoughtrackIo(#[from] houghtrack_io::Error),

    #[error("Core error: {0}")]
    Core(#[from] houghtrack_core::Error),

    #[error("unsupported output extension '{0}' (expected csv or json)")]
    UnsupportedOutput(String),
}

/// Hough-transform line finder.
#[derive(Parser)]
#[command(name = "houghtrack")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate the five-track event with uniform noise
    Points {
        #[command(flatten)]
        source: SourceArgs,

        /// Output file (.csv or .json)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Build the per-group and combined vote grids
    Hspace {
        #[command(flatten)]
        source: SourceArgs,

        #[command(flatten)]
        grid: GridArgs,

        /// Write every cell instead of only cells holding votes (CSV only)
        #[arg(long)]
        dense: bool,

        /// Output file (.csv or .json)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Extract ranked line candidates from the combined grid
    Peaks {
        #[command(flatten)]
        source: SourceArgs,

        #[command(flatten)]
        grid: GridArgs,

        /// Minimum votes for a peak
        #[arg(long, default_value = "10")]
        threshold: u32,

        /// Keep at most this many peaks
        #[arg(long)]
        max_peaks: Option<usize>,

        /// Output file (.csv or .json)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

/// Where the points come from.
#[derive(Args)]
struct SourceArgs {
    /// Number of uniform noise points added to the event
    #[arg(short, long, default_value = "0", allow_negative_numbers = true)]
    noise: i64,

    /// Seed for the noise generator (entropy when omitted)
    #[arg(long)]
    seed: Option<u64>,

    /// Read points from a CSV file instead of generating them
    #[arg(short, long, conflicts_with = "seed")]
    input: Option<PathBuf>,
}

/// Accumulator binning.
#[derive(Args)]
struct GridArgs {
    /// First swept angle (degrees, inclusive)
    #[arg(long, default_value = "0.0")]
    theta_min: f64,

    /// End of the swept range (degrees, exclusive)
    #[arg(long, default_value = "180.0")]
    theta_max: f64,

    /// Angle step (degrees)
    #[arg(long, default_value = "0.5")]
    theta_step: f64,

    /// Radial half-width: r spans [-r_max, r_max)
    #[arg(long, default_value = "5.0")]
    r_max: f64,

    /// Number of radial bins
    #[arg(long, default_value = "100")]
    r_bins: usize,

    /// Vote in parallel with rayon
    #[arg(long)]
    parallel: bool,

    /// Points per parallel work chunk
    #[arg(long, default_value = "256")]
    chunk_size: usize,
}

impl GridArgs {
    fn to_config(&self) -> Result<HoughConfig> {
        let sweep = AngleSweep::from_degrees(self.theta_min, self.theta_max, self.theta_step)?;
        let radial = RadialAxis::symmetric(self.r_max, self.r_bins)?;
        let config = HoughConfig::new()
            .with_sweep(sweep)
            .with_radial(radial)
            .with_parallel(self.parallel)
            .with_chunk_size(self.chunk_size);
        config.validate()?;
        Ok(config)
    }
}

/// Output file format, chosen by extension.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Format {
    Csv,
    Json,
}

fn output_format(path: &Path) -> Result<Format> {
    let ext = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_lowercase)
        .unwrap_or_default();
    match ext.as_str() {
        "csv" => Ok(Format::Csv),
        "json" => Ok(Format::Json),
        _ => Err(CliError::UnsupportedOutput(ext)),
    }
}

fn run(
    operation: Operation,
    source: &SourceArgs,
    hough: &HoughConfig,
    peaks: &PeakConfig,
) -> Result<Outcome> {
    let noise = checked_count(source.noise)?;

    let events = match &source.input {
        Some(path) => {
            if noise > 0 {
                warn!("--noise is ignored when reading points from a file");
            }
            let sets = read_points_file(path)?;
            info!("Read {} point groups from {}", sets.len(), path.display());
            EventSource::Recorded(sets)
        }
        None => EventSource::Generated(Scenario::five_tracks(noise)),
    };

    let mut rng = match source.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    debug!("Seed: {:?}", source.seed);
    Ok(execute(operation, &events, hough, peaks, &mut rng)?)
}

fn write_outcome(outcome: &Outcome, path: &Path, dense: bool) -> Result<()> {
    let format = output_format(path)?;
    let mut writer = DataFileWriter::create(path)?;
    match (outcome, format) {
        (Outcome::Points(sets), Format::Csv) => writer.write_points_csv(sets)?,
        (Outcome::Points(sets), Format::Json) => writer.write_json(sets)?,
        (Outcome::Accumulator(acc), Format::Csv) => {
            writer.write_grid_csv(acc.combined(), !dense)?;
        }
        (Outcome::Accumulator(acc), Format::Json) => writer.write_json(acc)?,
        (Outcome::Peaks { peaks, .. }, Format::Csv) => writer.write_peaks_csv(peaks)?,
        (Outcome::Peaks { peaks, .. }, Format::Json) => writer.write_json(peaks)?,
    }
    info!("Wrote {}", path.display());
    Ok(())
}

fn print_points(sets: &[PointSet]) {
    for set in sets {
        println!("{:<10} {:?}: {} points", set.name(), set.kind(), set.len());
    }
    println!(
        "Total points: {}",
        sets.iter().map(PointSet::len).sum::<usize>()
    );
}

fn print_accumulator(acc: &Accumulator) {
    let combined = acc.combined();
    println!(
        "Grid: {} angles x {} radial bins",
        combined.theta_bins(),
        combined.r_bins()
    );
    for group in acc.groups() {
        println!(
            "{:<10} {:>5} points {:>7} votes {:>7} dropped",
            group.name,
            group.points,
            group.grid.total_votes(),
            group.grid.dropped()
        );
    }
    match combined.max_cell() {
        Some(cell) => println!(
            "Maximum: {} votes at theta = {:.2} deg, r = {:.3}",
            cell.votes,
            combined.theta_of(cell.theta_bin).to_degrees(),
            combined.r_center_of(cell.r_bin)
        ),
        None => println!("Maximum: grid is empty"),
    }
}

fn print_peaks(peaks: &[Peak]) {
    println!(
        "{:>6} | {:>10} | {:>8} | {:>8} | {:>10}",
        "Votes", "Theta(deg)", "r", "Slope", "Intercept"
    );
    println!("{:-<54}", "");
    for peak in peaks {
        let line = peak.line();
        match line.slope_intercept() {
            Some((m, b)) => println!(
                "{:>6} | {:>10.2} | {:>8.3} | {:>8.3} | {:>10.3}",
                peak.votes,
                peak.theta.to_degrees(),
                peak.r,
                m,
                b
            ),
            None => println!(
                "{:>6} | {:>10.2} | {:>8.3} | {:>8} | {:>10}",
                peak.votes,
                peak.theta.to_degrees(),
                peak.r,
                "vertical",
                "-"
            ),
        }
    }
    println!("{} peaks", peaks.len());
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();

    let (operation, source, hough, peaks, output, dense) = match cli.command {
        Commands::Points { source, output } => (
            Operation::GeneratePoints,
            source,
            HoughConfig::default(),
            PeakConfig::default(),
            output,
            false,
        ),
        Commands::Hspace {
            source,
            grid,
            dense,
            output,
        } => (
            Operation::BuildAccumulator,
            source,
            grid.to_config()?,
            PeakConfig::default(),
            output,
            dense,
        ),
        Commands::Peaks {
            source,
            grid,
            threshold,
            max_peaks,
            output,
        } => {
            let mut peaks = PeakConfig::new().with_threshold(threshold);
            if let Some(max) = max_peaks {
                peaks = peaks.with_max_peaks(max);
            }
            (
                Operation::ExtractPeaks,
                source,
                grid.to_config()?,
                peaks,
                output,
                false,
            )
        }
    };

    if let Some(path) = &output {
        // Reject a bad extension before any work is done.
        output_format(path)?;
    }

    debug!("Operation: {:?}", operation);
    let start = Instant::now();
    let outcome = run(operation, &source, &hough, &peaks)?;
    debug!("Finished in {:.2?}", start.elapsed());

    match (&outcome, &output) {
        (_, Some(path)) => write_outcome(&outcome, path, dense)?,
        (Outcome::Points(sets), None) => print_points(sets),
        (Outcome::Accumulator(acc), None) => print_accumulator(acc),
        (Outcome::Peaks { accumulator, peaks }, None) => {
            print_accumulator(accumulator);
            println!();
            print_peaks(peaks);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_format_by_extension() {
        assert_eq!(output_format(Path::new("a.csv")).unwrap(), Format::Csv);
        assert_eq!(output_format(Path::new("a.JSON")).unwrap(), Format::Json);
        assert!(matches!(
            output_format(Path::new("a.h5")),
            Err(CliError::UnsupportedOutput(_))
        ));
    }

    #[test]
    fn test_negative_noise_rejected() {
        let cli = Cli::try_parse_from(["houghtrack", "points", "--noise", "-3"]).unwrap();
        let Commands::Points { source, .. } = cli.command else {
            panic!("expected points");
        };
        let result = run(
            Operation::GeneratePoints,
            &source,
            &HoughConfig::default(),
            &PeakConfig::default(),
        );
        assert!(matches!(
            result,
            Err(CliError::Core(houghtrack_core::Error::InvalidArgument(_)))
        ));
    }

    #[test]
    fn test_grid_args_build_config() {
        let cli = Cli::try_parse_from([
            "houghtrack",
            "hspace",
            "--theta-step",
            "1",
            "--r-bins",
            "50",
        ])
        .unwrap();
        let Commands::Hspace { grid, .. } = cli.command else {
            panic!("expected hspace");
        };
        let config = grid.to_config().unwrap();
        assert_eq!(config.sweep.steps(), 180);
        assert_eq!(config.radial.bins(), 50);
    }

    #[test]
    fn test_zero_step_is_configuration_error() {
        let cli = Cli::try_parse_from(["houghtrack", "peaks", "--theta-step", "0"]).unwrap();
        let Commands::Peaks { grid, .. } = cli.command else {
            panic!("expected peaks");
        };
        assert!(matches!(
            grid.to_config(),
            Err(CliError::Core(houghtrack_core::Error::Configuration(_)))
        ));
    }

    #[test]
    fn test_oversized_grid_is_configuration_error() {
        let cli = Cli::try_parse_from([
            "houghtrack",
            "hspace",
            "--theta-step",
            "0.0002",
            "--r-bins",
            "1000000",
        ])
        .unwrap();
        let Commands::Hspace { grid, .. } = cli.command else {
            panic!("expected hspace");
        };
        assert!(matches!(
            grid.to_config(),
            Err(CliError::Core(houghtrack_core::Error::Configuration(_)))
        ));
    }

    #[test]
    fn test_recorded_input_runs_through_dispatch() {
        let file = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(file.path(), "x,y\n0,2.05\n1,2.05\n2,2.05\n").unwrap();
        let path = file.path().to_str().unwrap();

        let cli = Cli::try_parse_from(["houghtrack", "peaks", "--input", path, "--threshold", "3"])
            .unwrap();
        let Commands::Peaks {
            source,
            grid,
            threshold,
            ..
        } = cli.command
        else {
            panic!("expected peaks");
        };
        let outcome = run(
            Operation::ExtractPeaks,
            &source,
            &grid.to_config().unwrap(),
            &PeakConfig::new().with_threshold(threshold),
        )
        .unwrap();
        let Outcome::Peaks { accumulator, peaks } = outcome else {
            panic!("expected peaks");
        };
        assert_eq!(accumulator.groups()[0].name, "hits");
        assert_eq!(peaks[0].votes, 3);
    }

    #[test]
    fn test_seeded_peaks_run() {
        let cli = Cli::try_parse_from([
            "houghtrack",
            "peaks",
            "--noise",
            "50",
            "--seed",
            "7",
            "--threshold",
            "12",
        ])
        .unwrap();
        let Commands::Peaks {
            source,
            grid,
            threshold,
            ..
        } = cli.command
        else {
            panic!("expected peaks");
        };
        let outcome = run(
            Operation::ExtractPeaks,
            &source,
            &grid.to_config().unwrap(),
            &PeakConfig::new().with_threshold(threshold),
        )
        .unwrap();
        let Outcome::Peaks { accumulator, peaks } = outcome else {
            panic!("expected peaks");
        };
        assert_eq!(accumulator.total_points(), 150);
        assert!(peaks[0].votes >= 20);
    }
}
