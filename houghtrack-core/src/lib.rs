//! houghtrack-core: Core types for Hough-transform track finding.
//!
//! This crate provides the hit and point-group model, the (θ, r) parameter
//! space axes, the vote grids and accumulator, and peak extraction.
//!

pub mod accumulator;
pub mod error;
pub mod grid;
pub mod line;
pub mod peaks;
pub mod point;
pub mod sweep;

pub use accumulator::{Accumulator, GroupGrid};
pub use error::{Error, Result};
pub use grid::{Cell, HoughGrid};
pub use line::LineParams;
pub use peaks::{find_peaks, LocalMaximumPeaks, Peak, PeakConfig, PeakExtraction};
pub use point::{checked_count, GroupKind, Point, PointSet};
pub use sweep::{AngleSweep, RadialAxis, MAX_AXIS_BINS, MAX_GRID_CELLS};
