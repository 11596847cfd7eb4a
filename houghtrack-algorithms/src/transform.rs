//! Hough voting engine.
//!
//! For every point and every sampled angle `θ_k` of the sweep the engine
//! computes `r = x·cos θ_k + y·sin θ_k` and increments the `(k, r)` cell
//! of the point's group grid and of the combined grid. Votes outside the
//! radial window are dropped and only counted as a diagnostic.

use houghtrack_core::{
    Accumulator, AngleSweep, Error, HoughGrid, Point, PointSet, RadialAxis, Result,
    MAX_GRID_CELLS,
};
use log::{debug, info, warn};
use rayon::prelude::*;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Configuration of one Hough analysis.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct HoughConfig {
    /// Sampled normal angles.
    pub sweep: AngleSweep,
    /// Radial window and binning.
    pub radial: RadialAxis,
    /// Fail with [`Error::EmptyInput`] when no point is supplied.
    pub require_points: bool,
    /// Vote point chunks on the rayon pool.
    pub parallel: bool,
    /// Points per parallel chunk.
    pub chunk_size: usize,
}

impl Default for HoughConfig {
    fn default() -> Self {
        Self {
            sweep: AngleSweep::default(),
            radial: RadialAxis::default(),
            require_points: false,
            parallel: false,
            chunk_size: 256,
        }
    }
}

impl HoughConfig {
    /// Creates a configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the angle sweep.
    #[must_use]
    pub fn with_sweep(mut self, sweep: AngleSweep) -> Self {
        self.sweep = sweep;
        self
    }

    /// Sets the radial axis.
    #[must_use]
    pub fn with_radial(mut self, radial: RadialAxis) -> Self {
        self.radial = radial;
        self
    }

    /// Requires at least one input point.
    #[must_use]
    pub fn with_require_points(mut self, require: bool) -> Self {
        self.require_points = require;
        self
    }

    /// Enables parallel voting.
    #[must_use]
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Sets the parallel chunk size.
    #[must_use]
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    /// Re-checks the axes, which may have been built without their
    /// validating constructors (e.g. deserialized).
    ///
    /// # Errors
    /// Returns [`Error::Configuration`] for a degenerate sweep, radial axis
    /// or chunk size, or a grid larger than [`MAX_GRID_CELLS`].
    pub fn validate(&self) -> Result<()> {
        let sweep = AngleSweep::new(
            self.sweep.theta_min(),
            self.sweep.theta_max(),
            self.sweep.step(),
        )?;
        if sweep.steps() != self.sweep.steps() {
            return Err(Error::Configuration(format!(
                "angle sweep step count {} does not match its range",
                self.sweep.steps()
            )));
        }
        RadialAxis::new(self.radial.r_min(), self.radial.r_max(), self.radial.bins())?;
        let cells = sweep
            .steps()
            .checked_mul(self.radial.bins())
            .filter(|&cells| cells <= MAX_GRID_CELLS);
        if cells.is_none() {
            return Err(Error::Configuration(format!(
                "grid of {} angles x {} radial bins exceeds {MAX_GRID_CELLS} cells",
                sweep.steps(),
                self.radial.bins()
            )));
        }
        if self.chunk_size == 0 {
            return Err(Error::Configuration(
                "parallel chunk size must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Hough transform over a fixed sweep and radial window.
///
/// Holds no per-run state: every [`HoughTransform::run`] allocates a fresh
/// [`Accumulator`], so independent analyses can share one transform.
#[derive(Clone, Debug)]
pub struct HoughTransform {
    config: HoughConfig,
    trig: Vec<(f64, f64)>,
}

impl HoughTransform {
    /// Validates the configuration and precomputes the sweep's trig table.
    ///
    /// # Errors
    /// Returns [`Error::Configuration`] if the configuration is invalid.
    pub fn new(config: HoughConfig) -> Result<Self> {
        config.validate()?;
        let trig = config.sweep.trig_table();
        Ok(Self { config, trig })
    }

    /// Current configuration.
    #[must_use]
    pub fn config(&self) -> &HoughConfig {
        &self.config
    }

    /// Fresh accumulator with no groups.
    #[must_use]
    pub fn accumulator(&self) -> Accumulator {
        Accumulator::new(self.config.sweep, self.config.radial)
    }

    /// Fresh all-zero grid with this transform's axes.
    #[must_use]
    pub fn grid(&self) -> HoughGrid {
        HoughGrid::new(self.config.sweep, self.config.radial)
    }

    /// Votes one point into group `group` of `acc` and its combined grid.
    ///
    /// # Errors
    /// Returns [`Error::InvalidArgument`] for an unknown group.
    pub fn vote(&self, acc: &mut Accumulator, group: usize, point: &Point) -> Result<usize> {
        acc.vote(group, point, &self.trig)
    }

    /// Votes one point into a single grid. Returns the counted votes.
    pub fn vote_grid(&self, grid: &mut HoughGrid, point: &Point) -> usize {
        if grid.sweep() == &self.config.sweep {
            grid.vote_with(point, &self.trig)
        } else {
            grid.vote(point)
        }
    }

    /// Sinusoid `(θ_k, r_k)` traced by `point` across the sweep.
    #[must_use]
    pub fn trace(&self, point: &Point) -> Vec<(f64, f64)> {
        self.trig
            .iter()
            .enumerate()
            .map(|(k, &(cos, sin))| (self.config.sweep.angle(k), point.radius_at(cos, sin)))
            .collect()
    }

    /// Runs one analysis: one grid per point set plus the combined grid.
    ///
    /// Groups keep the order of `sets`. Zero points is valid unless
    /// [`HoughConfig::require_points`] is set.
    ///
    /// # Errors
    /// Returns [`Error::EmptyInput`] if points are required and none were
    /// supplied, and [`Error::InvalidArgument`] if a point is not finite.
    /// Both are checked before any grid is allocated.
    pub fn run(&self, sets: &[PointSet]) -> Result<Accumulator> {
        let total_points: usize = sets.iter().map(PointSet::len).sum();
        if self.config.require_points && total_points == 0 {
            return Err(Error::EmptyInput);
        }
        for set in sets {
            if let Some(point) = set.iter().find(|p| !p.is_finite()) {
                return Err(Error::InvalidArgument(format!(
                    "group '{}' holds a non-finite point ({}, {})",
                    set.name(),
                    point.x,
                    point.y
                )));
            }
        }

        let mut acc = self.accumulator();
        for set in sets {
            let group = acc.add_group(set.name(), set.kind());
            if self.config.parallel {
                let partial = self.vote_parallel(set.points())?;
                acc.absorb(group, &partial, set.len())?;
            } else {
                for point in set.iter() {
                    acc.vote(group, point, &self.trig)?;
                }
            }
            let grid = &acc.groups()[group].grid;
            debug!(
                "group '{}' ({:?}): {} points, {} votes, {} dropped",
                set.name(),
                set.kind(),
                set.len(),
                grid.total_votes(),
                grid.dropped()
            );
        }

        let combined = acc.combined();
        info!(
            "Hough run: {} points in {} groups, {} votes counted, {} dropped",
            total_points,
            sets.len(),
            combined.total_votes(),
            combined.dropped()
        );
        if combined.dropped() > combined.total_votes() {
            warn!(
                "more than half of the votes fell outside r in [{}, {})",
                self.config.radial.r_min(),
                self.config.radial.r_max()
            );
        }

        Ok(acc)
    }

    /// Votes `points` in parallel chunks into private grids, then sums the
    /// partial grids sequentially in chunk order.
    fn vote_parallel(&self, points: &[Point]) -> Result<HoughGrid> {
        let partials: Vec<HoughGrid> = points
            .par_chunks(self.config.chunk_size)
            .map(|chunk| {
                let mut grid = self.grid();
                for point in chunk {
                    grid.vote_with(point, &self.trig);
                }
                grid
            })
            .collect();

        let mut total = self.grid();
        for partial in &partials {
            total.merge(partial)?;
        }
        Ok(total)
    }
}
