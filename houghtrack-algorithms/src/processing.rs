//! High-level helpers that chain point generation, voting and peak
//! extraction.

use houghtrack_core::{find_peaks, Accumulator, Peak, PeakConfig, PointSet, Result};
use log::debug;
use rand::Rng;

use crate::scenario::Scenario;
use crate::transform::{HoughConfig, HoughTransform};

/// Operation selected by a caller.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Operation {
    /// Generate the scenario's point sets.
    GeneratePoints,
    /// Generate points and build the accumulator.
    BuildAccumulator,
    /// Generate points, build the accumulator and extract peaks.
    ExtractPeaks,
}

/// Result of an [`Operation`].
#[derive(Clone, Debug)]
pub enum Outcome {
    /// Generated point sets.
    Points(Vec<PointSet>),
    /// Populated accumulator.
    Accumulator(Accumulator),
    /// Accumulator and its ranked peaks.
    Peaks {
        /// Populated accumulator.
        accumulator: Accumulator,
        /// Peaks of the combined grid.
        peaks: Vec<Peak>,
    },
}

/// Votes `sets` and extracts the peaks of the combined grid.
///
/// # Errors
/// Propagates configuration and empty-input errors from the transform.
pub fn build_and_extract(
    sets: &[PointSet],
    hough: &HoughConfig,
    peaks: &PeakConfig,
) -> Result<(Accumulator, Vec<Peak>)> {
    let transform = HoughTransform::new(hough.clone())?;
    let accumulator = transform.run(sets)?;
    let found = find_peaks(accumulator.combined(), peaks);
    debug!(
        "{} peaks at threshold {}",
        found.len(),
        peaks.threshold.max(1)
    );
    Ok((accumulator, found))
}

/// Where the points of an operation come from.
#[derive(Clone, Debug)]
pub enum EventSource {
    /// Points generated from a synthetic scenario with the injected RNG.
    Generated(Scenario),
    /// Points already recorded, e.g. read from a file.
    Recorded(Vec<PointSet>),
}

impl EventSource {
    /// Produces the point sets of this source.
    ///
    /// # Errors
    /// Returns [`houghtrack_core::Error::InvalidArgument`] for invalid
    /// scenario parameters.
    pub fn point_sets<R: Rng>(&self, rng: &mut R) -> Result<Vec<PointSet>> {
        match self {
            Self::Generated(scenario) => scenario.generate(rng),
            Self::Recorded(sets) => Ok(sets.clone()),
        }
    }
}

impl From<Scenario> for EventSource {
    fn from(scenario: Scenario) -> Self {
        Self::Generated(scenario)
    }
}

impl From<Vec<PointSet>> for EventSource {
    fn from(sets: Vec<PointSet>) -> Self {
        Self::Recorded(sets)
    }
}

/// Runs `operation` on the points of `source`.
///
/// The Hough configuration is validated before any point is generated.
///
/// # Errors
/// Returns configuration errors, invalid source parameters, or
/// [`houghtrack_core::Error::EmptyInput`] when points are required.
pub fn execute<R: Rng>(
    operation: Operation,
    source: &EventSource,
    hough: &HoughConfig,
    peaks: &PeakConfig,
    rng: &mut R,
) -> Result<Outcome> {
    match operation {
        Operation::GeneratePoints => Ok(Outcome::Points(source.point_sets(rng)?)),
        Operation::BuildAccumulator => {
            let transform = HoughTransform::new(hough.clone())?;
            let sets = source.point_sets(rng)?;
            Ok(Outcome::Accumulator(transform.run(&sets)?))
        }
        Operation::ExtractPeaks => {
            hough.validate()?;
            let sets = source.point_sets(rng)?;
            let (accumulator, peaks) = build_and_extract(&sets, hough, peaks)?;
            Ok(Outcome::Peaks { accumulator, peaks })
        }
    }
}
