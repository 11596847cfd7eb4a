//! Hit coordinates and their logical groups.

use crate::{Error, Result};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A single 2D hit coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Point {
    /// X coordinate.
    pub x: f64,
    /// Y coordinate.
    pub y: f64,
}

impl Point {
    /// Creates a new point.
    #[inline]
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Returns true if both coordinates are finite.
    #[inline]
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    /// Signed distance parameter `r = x·cos θ + y·sin θ` for a precomputed
    /// `(cos θ, sin θ)` pair.
    #[inline]
    #[must_use]
    pub fn radius_at(&self, cos_theta: f64, sin_theta: f64) -> f64 {
        self.x * cos_theta + self.y * sin_theta
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

/// Semantic role of a point group.
///
/// The accumulator itself ignores the role; it only matters for diagnostics
/// and validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum GroupKind {
    /// Points sampled from a true straight track.
    Track,
    /// Uncorrelated noise hits.
    Noise,
}

/// An ordered, immutable sequence of points belonging to one group.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PointSet {
    name: String,
    kind: GroupKind,
    points: Vec<Point>,
}

impl PointSet {
    /// Creates a point set from its name, role and points.
    pub fn new(name: impl Into<String>, kind: GroupKind, points: Vec<Point>) -> Self {
        Self {
            name: name.into(),
            kind,
            points,
        }
    }

    /// Creates a track point set.
    pub fn track(name: impl Into<String>, points: Vec<Point>) -> Self {
        Self::new(name, GroupKind::Track, points)
    }

    /// Creates a noise point set.
    pub fn noise(name: impl Into<String>, points: Vec<Point>) -> Self {
        Self::new(name, GroupKind::Noise, points)
    }

    /// Group name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Group role.
    #[must_use]
    pub fn kind(&self) -> GroupKind {
        self.kind
    }

    /// Points in insertion order.
    #[must_use]
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Returns the number of points.
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Returns true if the set holds no points.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Returns an iterator over the points.
    pub fn iter(&self) -> impl Iterator<Item = &Point> {
        self.points.iter()
    }
}

/// Converts a caller-supplied signed count into a point count.
///
/// # Errors
/// Returns [`Error::InvalidArgument`] if `count` is negative.
pub fn checked_count(count: i64) -> Result<usize> {
    usize::try_from(count)
        .map_err(|_| Error::invalid_argument(format!("point count must be >= 0, got {count}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_radius_at_axes() {
        let p = Point::new(3.0, 4.0);
        assert!((p.radius_at(1.0, 0.0) - 3.0).abs() < f64::EPSILON);
        assert!((p.radius_at(0.0, 1.0) - 4.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_point_set_accessors() {
        let set = PointSet::noise("noise", vec![Point::new(1.0, 2.0), (3.0, 4.0).into()]);
        assert_eq!(set.name(), "noise");
        assert_eq!(set.kind(), GroupKind::Noise);
        assert_eq!(set.len(), 2);
        assert!(!set.is_empty());
        assert_eq!(set.points()[1], Point::new(3.0, 4.0));
    }

    #[test]
    fn test_checked_count() {
        assert_eq!(checked_count(0).unwrap(), 0);
        assert_eq!(checked_count(20).unwrap(), 20);
        assert!(matches!(
            checked_count(-1),
            Err(Error::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_non_finite_point() {
        assert!(Point::new(1.0, 2.0).is_finite());
        assert!(!Point::new(f64::NAN, 2.0).is_finite());
    }
}
