//! Parameter-space axes: the discretized angle sweep and the radial binning.
#![allow(
    clippy::cast_possible_truncation,
    clippy::cast_precision_loss,
    clippy::cast_sign_loss
)]

use crate::{Error, Result};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Upper bound on sweep steps and radial bins, to keep grids allocatable.
pub const MAX_AXIS_BINS: usize = 1 << 20;

/// Upper bound on `steps × bins` of one vote grid (256 MiB of `u32` counts).
pub const MAX_GRID_CELLS: usize = 1 << 26;

/// Slack applied when deriving the step count from `span / step`.
const STEP_COUNT_EPSILON: f64 = 1e-9;

/// Discretized range of candidate normal angles `θ ∈ [θ_min, θ_max)`.
///
/// Angles are stored in radians. The sampled angles are
/// `θ_k = θ_min + k·Δθ` for `k in 0..steps()`; `θ_min` is always sampled
/// and `θ_max` never is.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AngleSweep {
    theta_min: f64,
    theta_max: f64,
    step: f64,
    steps: usize,
}

impl AngleSweep {
    /// Creates a sweep over `[theta_min, theta_max)` in radians.
    ///
    /// # Errors
    /// Returns [`Error::Configuration`] if the step is not a positive finite
    /// number, the range is empty or not finite, or the step count is too
    /// large.
    pub fn new(theta_min: f64, theta_max: f64, step: f64) -> Result<Self> {
        if !step.is_finite() || step <= 0.0 {
            return Err(Error::configuration(format!(
                "angle step must be positive and finite, got {step}"
            )));
        }
        if !theta_min.is_finite() || !theta_max.is_finite() || theta_min >= theta_max {
            return Err(Error::configuration(format!(
                "angle range [{theta_min}, {theta_max}) is empty or not finite"
            )));
        }

        let ratio = (theta_max - theta_min) / step;
        if !ratio.is_finite() || ratio > MAX_AXIS_BINS as f64 {
            return Err(Error::configuration(format!(
                "angle sweep has too many steps ({ratio})"
            )));
        }
        let steps = ((ratio - STEP_COUNT_EPSILON).ceil() as usize).max(1);

        Ok(Self {
            theta_min,
            theta_max,
            step,
            steps,
        })
    }

    /// Creates a sweep from bounds and step given in degrees.
    ///
    /// # Errors
    /// Same conditions as [`AngleSweep::new`].
    pub fn from_degrees(theta_min: f64, theta_max: f64, step: f64) -> Result<Self> {
        Self::new(theta_min.to_radians(), theta_max.to_radians(), step.to_radians())
    }

    /// Sweep over the half turn `[0, π)` with the given step in radians.
    ///
    /// # Errors
    /// Same conditions as [`AngleSweep::new`].
    pub fn half_turn(step: f64) -> Result<Self> {
        Self::new(0.0, std::f64::consts::PI, step)
    }

    /// Lower bound (inclusive), radians.
    #[must_use]
    #[inline]
    pub fn theta_min(&self) -> f64 {
        self.theta_min
    }

    /// Upper bound (exclusive), radians.
    #[must_use]
    #[inline]
    pub fn theta_max(&self) -> f64 {
        self.theta_max
    }

    /// Angular step, radians.
    #[must_use]
    #[inline]
    pub fn step(&self) -> f64 {
        self.step
    }

    /// Number of sampled angles.
    #[must_use]
    #[inline]
    pub fn steps(&self) -> usize {
        self.steps
    }

    /// Sampled angle of step `k`.
    #[must_use]
    #[inline]
    pub fn angle(&self, k: usize) -> f64 {
        self.theta_min + k as f64 * self.step
    }

    /// Iterator over all sampled angles.
    pub fn angles(&self) -> impl Iterator<Item = f64> + '_ {
        (0..self.steps).map(move |k| self.angle(k))
    }

    /// Precomputed `(cos θ_k, sin θ_k)` for every sampled angle.
    #[must_use]
    pub fn trig_table(&self) -> Vec<(f64, f64)> {
        self.angles().map(|theta| (theta.cos(), theta.sin())).collect()
    }

    /// Index of the sampled angle nearest to `theta`, if inside the sweep.
    #[must_use]
    pub fn nearest_step(&self, theta: f64) -> Option<usize> {
        if !theta.is_finite() {
            return None;
        }
        let k = ((theta - self.theta_min) / self.step).round();
        if k < 0.0 || k >= self.steps as f64 {
            return None;
        }
        Some(k as usize)
    }
}

impl Default for AngleSweep {
    /// `[0°, 180°)` in steps of 0.5°.
    fn default() -> Self {
        let step = 0.5_f64.to_radians();
        Self {
            theta_min: 0.0,
            theta_max: std::f64::consts::PI,
            step,
            steps: 360,
        }
    }
}

/// Equal-width binning of the signed distance `r` over `[r_min, r_max)`.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RadialAxis {
    r_min: f64,
    r_max: f64,
    bins: usize,
}

impl RadialAxis {
    /// Creates a radial axis.
    ///
    /// # Errors
    /// Returns [`Error::Configuration`] if `r_min >= r_max`, a bound is not
    /// finite, or `bins` is zero or too large.
    pub fn new(r_min: f64, r_max: f64, bins: usize) -> Result<Self> {
        if !r_min.is_finite() || !r_max.is_finite() {
            return Err(Error::configuration(format!(
                "radial bounds must be finite, got [{r_min}, {r_max})"
            )));
        }
        if r_min >= r_max {
            return Err(Error::configuration(format!(
                "radial bounds are inverted: r_min {r_min} >= r_max {r_max}"
            )));
        }
        if bins == 0 || bins > MAX_AXIS_BINS {
            return Err(Error::configuration(format!(
                "radial bin count must be in 1..={MAX_AXIS_BINS}, got {bins}"
            )));
        }
        Ok(Self { r_min, r_max, bins })
    }

    /// Axis symmetric around zero: `[-half_width, half_width)`.
    ///
    /// # Errors
    /// Same conditions as [`RadialAxis::new`].
    pub fn symmetric(half_width: f64, bins: usize) -> Result<Self> {
        Self::new(-half_width, half_width, bins)
    }

    /// Lower bound (inclusive).
    #[must_use]
    #[inline]
    pub fn r_min(&self) -> f64 {
        self.r_min
    }

    /// Upper bound (exclusive).
    #[must_use]
    #[inline]
    pub fn r_max(&self) -> f64 {
        self.r_max
    }

    /// Number of bins.
    #[must_use]
    #[inline]
    pub fn bins(&self) -> usize {
        self.bins
    }

    /// Width of one bin.
    #[must_use]
    #[inline]
    pub fn bin_width(&self) -> f64 {
        (self.r_max - self.r_min) / self.bins as f64
    }

    /// Bin holding `r`, or `None` when `r` is outside `[r_min, r_max)` or NaN.
    #[must_use]
    #[inline]
    pub fn bin_of(&self, r: f64) -> Option<usize> {
        // NaN fails both comparisons.
        if !(r >= self.r_min && r < self.r_max) {
            return None;
        }
        let scaled = (r - self.r_min) * self.bins as f64 / (self.r_max - self.r_min);
        Some((scaled as usize).min(self.bins - 1))
    }

    /// Centre of bin `bin`.
    #[must_use]
    #[inline]
    pub fn center(&self, bin: usize) -> f64 {
        self.r_min + (bin as f64 + 0.5) * self.bin_width()
    }
}

impl Default for RadialAxis {
    /// `[-5, 5)` in 100 bins.
    fn default() -> Self {
        Self {
            r_min: -5.0,
            r_max: 5.0,
            bins: 100,
        }
    }
}
