//! Synthetic track scenarios: straight tracks plus uniform noise.

use houghtrack_core::{PointSet, Result};
use rand::Rng;

use crate::source::{LineSource, NoiseSource};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Points per reference track.
pub const REFERENCE_TRACK_POINTS: usize = 20;
/// X spacing of reference track points.
pub const REFERENCE_X_STEP: f64 = 0.5;
/// Noise rectangle of the reference scenario.
pub const REFERENCE_NOISE_X: (f64, f64) = (0.0, 10.0);
/// Noise rectangle of the reference scenario.
pub const REFERENCE_NOISE_Y: (f64, f64) = (-4.0, 20.0);

/// `(slope, intercept)` of the five reference tracks.
pub const REFERENCE_TRACKS: [(f64, f64); 5] =
    [(0.5, 2.0), (0.3, 3.0), (1.5, -2.0), (1.5, -3.0), (2.0, 0.0)];

/// A set of true tracks plus one noise group.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Scenario {
    /// True tracks, generated in order as groups `track 1`, `track 2`, ...
    pub tracks: Vec<LineSource>,
    /// Noise hits, generated last as group `noise`.
    pub noise: NoiseSource,
}

impl Scenario {
    /// Five crossing tracks of 20 points each (x step 0.5) and `noise`
    /// uniform hits in `[0, 10] × [-4, 20]`.
    #[must_use]
    pub fn five_tracks(noise: usize) -> Self {
        Self {
            tracks: REFERENCE_TRACKS
                .iter()
                .map(|&(slope, intercept)| {
                    LineSource::new(slope, intercept, REFERENCE_TRACK_POINTS, REFERENCE_X_STEP)
                })
                .collect(),
            noise: NoiseSource::new(noise, REFERENCE_NOISE_X, REFERENCE_NOISE_Y),
        }
    }

    /// Generates one point set per track followed by the noise set, which
    /// is present even when empty.
    ///
    /// # Errors
    /// Returns [`houghtrack_core::Error::InvalidArgument`] for invalid
    /// track or noise parameters.
    pub fn generate<R: Rng>(&self, rng: &mut R) -> Result<Vec<PointSet>> {
        let mut sets = Vec::with_capacity(self.tracks.len() + 1);
        for (i, track) in self.tracks.iter().enumerate() {
            sets.push(PointSet::track(format!("track {}", i + 1), track.points()?));
        }
        sets.push(PointSet::noise("noise", self.noise.points(rng)?));
        Ok(sets)
    }
}

impl Default for Scenario {
    fn default() -> Self {
        Self::five_tracks(0)
    }
}
