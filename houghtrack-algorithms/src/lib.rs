//! houghtrack-algorithms: Hough voting and track-finding pipelines.
//!
//! This crate provides:
//! - **Voting** - [`HoughTransform`], sequential or rayon-parallel
//! - **Point sources** - exact line samples and seeded uniform noise
//! - **Scenarios** - the five-track reference event
//! - **Operations** - explicit dispatch of generate / build / extract
//!
#![warn(missing_docs)]

mod processing;
mod scenario;
mod source;
mod transform;

pub use processing::{build_and_extract, execute, EventSource, Operation, Outcome};
pub use scenario::{
    Scenario, REFERENCE_NOISE_X, REFERENCE_NOISE_Y, REFERENCE_TRACKS, REFERENCE_TRACK_POINTS,
    REFERENCE_X_STEP,
};
pub use source::{LineSource, NoiseSource};
pub use transform::{HoughConfig, HoughTransform};

// Re-export core peak types
pub use houghtrack_core::peaks::{find_peaks, Peak, PeakConfig};
