//! Point sources feeding the voting engine.
//!
//! - [`LineSource`] samples points exactly on `y = m·x + b`.
//! - [`NoiseSource`] draws points uniformly from a rectangle using an
//!   injected random generator.
#![allow(clippy::cast_precision_loss)]

use houghtrack_core::{Error, Point, Result};
use rand::Rng;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Evenly spaced points along `y = slope·x + intercept`, starting at `x = 0`.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LineSource {
    /// Line slope `m`.
    pub slope: f64,
    /// Line intercept `b`.
    pub intercept: f64,
    /// Number of points.
    pub count: usize,
    /// Distance between consecutive x values.
    pub x_step: f64,
}

impl LineSource {
    /// Creates a line source.
    #[must_use]
    pub fn new(slope: f64, intercept: f64, count: usize, x_step: f64) -> Self {
        Self {
            slope,
            intercept,
            count,
            x_step,
        }
    }

    /// Generates `x_i = i·x_step`, `y_i = slope·x_i + intercept`.
    ///
    /// # Errors
    /// Returns [`Error::InvalidArgument`] if a parameter is not finite.
    pub fn points(&self) -> Result<Vec<Point>> {
        if !(self.slope.is_finite() && self.intercept.is_finite() && self.x_step.is_finite()) {
            return Err(Error::InvalidArgument(format!(
                "line parameters must be finite (slope {}, intercept {}, x step {})",
                self.slope, self.intercept, self.x_step
            )));
        }
        Ok((0..self.count)
            .map(|i| {
                let x = i as f64 * self.x_step;
                Point::new(x, self.slope * x + self.intercept)
            })
            .collect())
    }
}

/// Uniform noise hits in `[x_lo, x_hi] × [y_lo, y_hi]`.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct NoiseSource {
    /// Number of points.
    pub count: usize,
    /// `(x_lo, x_hi)`.
    pub x_range: (f64, f64),
    /// `(y_lo, y_hi)`.
    pub y_range: (f64, f64),
}

impl NoiseSource {
    /// Creates a noise source.
    #[must_use]
    pub fn new(count: usize, x_range: (f64, f64), y_range: (f64, f64)) -> Self {
        Self {
            count,
            x_range,
            y_range,
        }
    }

    fn check_range(axis: &str, (lo, hi): (f64, f64)) -> Result<()> {
        if !lo.is_finite() || !hi.is_finite() || lo > hi {
            return Err(Error::InvalidArgument(format!(
                "noise {axis} range [{lo}, {hi}] is inverted or not finite"
            )));
        }
        Ok(())
    }

    /// Draws `count` points with independent uniform coordinates.
    ///
    /// The rectangle is validated before any draw.
    ///
    /// # Errors
    /// Returns [`Error::InvalidArgument`] for an inverted or non-finite
    /// rectangle.
    pub fn points<R: Rng>(&self, rng: &mut R) -> Result<Vec<Point>> {
        Self::check_range("x", self.x_range)?;
        Self::check_range("y", self.y_range)?;

        let (x_lo, x_hi) = self.x_range;
        let (y_lo, y_hi) = self.y_range;
        Ok((0..self.count)
            .map(|_| Point::new(rng.gen_range(x_lo..=x_hi), rng.gen_range(y_lo..=y_hi)))
            .collect())
    }
}
