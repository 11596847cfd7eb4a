//! Peak extraction from a populated vote grid.
#![allow(clippy::cast_possible_wrap, clippy::cast_sign_loss)]

use std::cmp::Ordering;

use crate::grid::HoughGrid;
use crate::line::LineParams;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Configuration for peak extraction.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PeakConfig {
    /// Minimum vote count of a peak. Values below 1 behave as 1.
    pub threshold: u32,
    /// Maximum number of peaks returned (`None` = unlimited).
    pub max_peaks: Option<usize>,
}

impl Default for PeakConfig {
    fn default() -> Self {
        Self {
            threshold: 1,
            max_peaks: None,
        }
    }
}

impl PeakConfig {
    /// Creates a peak configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the minimum vote count.
    #[must_use]
    pub fn with_threshold(mut self, threshold: u32) -> Self {
        self.threshold = threshold;
        self
    }

    /// Limit the number of returned peaks.
    #[must_use]
    pub fn with_max_peaks(mut self, max_peaks: usize) -> Self {
        self.max_peaks = Some(max_peaks);
        self
    }
}

/// A local maximum of the vote grid, interpreted as a line candidate.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Peak {
    /// Column index.
    pub theta_bin: usize,
    /// Radial bin index.
    pub r_bin: usize,
    /// Sampled angle of the column, radians.
    pub theta: f64,
    /// Centre of the radial bin.
    pub r: f64,
    /// Vote count, used as a confidence proxy.
    pub votes: u32,
}

impl Peak {
    /// Line parameters estimated by this peak.
    #[must_use]
    pub fn line(&self) -> LineParams {
        LineParams::new(self.theta, self.r)
    }

    /// Ordering used for peak lists: votes descending, then `theta_bin`
    /// and `r_bin` ascending.
    #[must_use]
    pub fn rank(&self, other: &Self) -> Ordering {
        other
            .votes
            .cmp(&self.votes)
            .then(self.theta_bin.cmp(&other.theta_bin))
            .then(self.r_bin.cmp(&other.r_bin))
    }
}

/// Trait for peak extraction algorithms.
pub trait PeakExtraction: Send + Sync {
    /// Algorithm name.
    fn name(&self) -> &'static str;

    /// Configure the extraction.
    fn configure(&mut self, config: PeakConfig);

    /// Get current configuration.
    fn config(&self) -> &PeakConfig;

    /// Extract ranked peaks from a populated grid.
    fn extract(&self, grid: &HoughGrid) -> Vec<Peak>;
}

/// 8-neighbourhood local-maximum search with plateau resolution.
///
/// Cells of equal count that touch (8-connectivity) form a plateau. A
/// plateau at or above the threshold is a peak when no cell bordering it
/// holds more votes; it is reported once, at its first cell in
/// `(theta_bin, r_bin)` order. A plateau that touches a higher cell is a
/// shoulder and yields nothing. Grid edges have fewer neighbours; the θ
/// axis does not wrap around.
#[derive(Clone, Debug, Default)]
pub struct LocalMaximumPeaks {
    config: PeakConfig,
}

impl LocalMaximumPeaks {
    /// Create with default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create with custom configuration.
    #[must_use]
    pub fn with_config(config: PeakConfig) -> Self {
        Self { config }
    }

    fn neighbours(
        grid: &HoughGrid,
        theta_bin: usize,
        r_bin: usize,
    ) -> impl Iterator<Item = (usize, usize)> {
        let (theta_bins, r_bins) = (grid.theta_bins() as isize, grid.r_bins() as isize);
        let (t, r) = (theta_bin as isize, r_bin as isize);
        (-1isize..=1)
            .flat_map(move |dt| (-1isize..=1).map(move |dr| (t + dt, r + dr)))
            .filter(move |&(nt, nr)| {
                (nt, nr) != (t, r) && (0..theta_bins).contains(&nt) && (0..r_bins).contains(&nr)
            })
            .map(|(nt, nr)| (nt as usize, nr as usize))
    }
}

impl PeakExtraction for LocalMaximumPeaks {
    fn name(&self) -> &'static str {
        "LocalMaximum"
    }

    fn configure(&mut self, config: PeakConfig) {
        self.config = config;
    }

    fn config(&self) -> &PeakConfig {
        &self.config
    }

    fn extract(&self, grid: &HoughGrid) -> Vec<Peak> {
        let threshold = self.config.threshold.max(1);
        let r_bins = grid.r_bins();
        let counts = grid.counts();

        let mut visited = vec![false; counts.len()];
        let mut stack = Vec::new();
        let mut peaks = Vec::new();

        for cell in grid.cells() {
            let idx = cell.theta_bin * r_bins + cell.r_bin;
            if visited[idx] || cell.votes < threshold {
                continue;
            }

            // Flood the whole plateau so none of its cells is reported later.
            let mut is_peak = true;
            visited[idx] = true;
            stack.push((cell.theta_bin, cell.r_bin));
            while let Some((t, r)) = stack.pop() {
                for (nt, nr) in Self::neighbours(grid, t, r) {
                    let n = nt * r_bins + nr;
                    if counts[n] > cell.votes {
                        is_peak = false;
                    } else if counts[n] == cell.votes && !visited[n] {
                        visited[n] = true;
                        stack.push((nt, nr));
                    }
                }
            }

            if is_peak {
                peaks.push(Peak {
                    theta_bin: cell.theta_bin,
                    r_bin: cell.r_bin,
                    theta: grid.theta_of(cell.theta_bin),
                    r: grid.r_center_of(cell.r_bin),
                    votes: cell.votes,
                });
            }
        }

        peaks.sort_by(Peak::rank);
        if let Some(max) = self.config.max_peaks {
            peaks.truncate(max);
        }
        peaks
    }
}

/// Extracts peaks with [`LocalMaximumPeaks`].
#[must_use]
pub fn find_peaks(grid: &HoughGrid, config: &PeakConfig) -> Vec<Peak> {
    LocalMaximumPeaks::with_config(config.clone()).extract(grid)
}
