//! Conversion between normal-form `(θ, r)` and slope-intercept lines.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::point::Point;

/// Below this `|sin θ|` a line is treated as vertical.
const VERTICAL_EPSILON: f64 = 1e-12;

/// A straight line in normal form `x·cos θ + y·sin θ = r`.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LineParams {
    /// Angle of the line normal, radians.
    pub theta: f64,
    /// Signed distance from the origin.
    pub r: f64,
}

impl LineParams {
    /// Creates a line from its normal-form parameters.
    #[must_use]
    pub fn new(theta: f64, r: f64) -> Self {
        Self { theta, r }
    }

    /// Normal form of `y = slope·x + intercept`, with `θ ∈ (0, π)`.
    ///
    /// `tan θ = -1/slope` and `r = intercept·sin θ`.
    #[must_use]
    pub fn from_slope_intercept(slope: f64, intercept: f64) -> Self {
        let theta = 1.0_f64.atan2(-slope);
        Self {
            theta,
            r: intercept * theta.sin(),
        }
    }

    /// Slope and intercept, or `None` for a vertical line.
    #[must_use]
    pub fn slope_intercept(&self) -> Option<(f64, f64)> {
        let (sin, cos) = self.theta.sin_cos();
        if sin.abs() < VERTICAL_EPSILON {
            return None;
        }
        Some((-cos / sin, self.r / sin))
    }

    /// Signed perpendicular distance of `point` from the line.
    #[must_use]
    pub fn residual(&self, point: &Point) -> f64 {
        let (sin, cos) = self.theta.sin_cos();
        point.radius_at(cos, sin) - self.r
    }
}
