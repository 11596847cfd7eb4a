//! Dense (θ, r) vote grid.
//!
//! The grid stores vote counts in row-major order:
//! `counts[theta_bin * r_bins + r_bin]`. The θ axis is aligned with the
//! [`AngleSweep`]: column `k` holds the votes cast at the sampled angle
//! `θ_k`, so only the radial coordinate is ever out of range.

use crate::point::Point;
use crate::sweep::{AngleSweep, RadialAxis};
use crate::{Error, Result};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A single accumulator cell and its vote count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Cell {
    /// Column index (sweep step).
    pub theta_bin: usize,
    /// Radial bin index.
    pub r_bin: usize,
    /// Vote count.
    pub votes: u32,
}

/// Fixed-bounds 2D histogram of votes over (θ, r).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct HoughGrid {
    sweep: AngleSweep,
    radial: RadialAxis,
    counts: Vec<u32>,
    dropped: u64,
}

impl HoughGrid {
    /// Creates an all-zero grid covering the full sweep and radial axis.
    #[must_use]
    pub fn new(sweep: AngleSweep, radial: RadialAxis) -> Self {
        Self {
            sweep,
            radial,
            counts: vec![0; sweep.steps() * radial.bins()],
            dropped: 0,
        }
    }

    /// Angle sweep defining the θ axis.
    #[must_use]
    #[inline]
    pub fn sweep(&self) -> &AngleSweep {
        &self.sweep
    }

    /// Radial axis.
    #[must_use]
    #[inline]
    pub fn radial(&self) -> &RadialAxis {
        &self.radial
    }

    /// Number of θ columns.
    #[must_use]
    #[inline]
    pub fn theta_bins(&self) -> usize {
        self.sweep.steps()
    }

    /// Number of radial bins.
    #[must_use]
    #[inline]
    pub fn r_bins(&self) -> usize {
        self.radial.bins()
    }

    #[inline]
    fn index(&self, theta_bin: usize, r_bin: usize) -> usize {
        theta_bin * self.radial.bins() + r_bin
    }

    /// Vote count of a cell, or `None` outside the grid.
    #[must_use]
    #[inline]
    pub fn get(&self, theta_bin: usize, r_bin: usize) -> Option<u32> {
        if theta_bin < self.theta_bins() && r_bin < self.r_bins() {
            Some(self.counts[self.index(theta_bin, r_bin)])
        } else {
            None
        }
    }

    /// Adds one vote at column `theta_bin` for the radial value `r`.
    ///
    /// Returns `false` (and records a dropped vote) when the vote falls
    /// outside the grid.
    #[inline]
    pub fn fill(&mut self, theta_bin: usize, r: f64) -> bool {
        match self.radial.bin_of(r) {
            Some(r_bin) if theta_bin < self.theta_bins() => {
                let idx = self.index(theta_bin, r_bin);
                self.counts[idx] += 1;
                true
            }
            _ => {
                self.dropped += 1;
                false
            }
        }
    }

    /// Casts the full sweep of votes for one point using a precomputed
    /// `(cos θ_k, sin θ_k)` table. Returns the number of votes counted.
    ///
    /// `trig` must come from [`AngleSweep::trig_table`] of this grid's sweep.
    pub fn vote_with(&mut self, point: &Point, trig: &[(f64, f64)]) -> usize {
        let mut counted = 0;
        for (theta_bin, &(cos, sin)) in trig.iter().enumerate() {
            if self.fill(theta_bin, point.radius_at(cos, sin)) {
                counted += 1;
            }
        }
        counted
    }

    /// Casts the full sweep of votes for one point.
    pub fn vote(&mut self, point: &Point) -> usize {
        let trig = self.sweep.trig_table();
        self.vote_with(point, &trig)
    }

    /// Adds every cell of `other` into this grid.
    ///
    /// # Errors
    /// Returns [`Error::Configuration`] if the grids have different axes.
    pub fn merge(&mut self, other: &HoughGrid) -> Result<()> {
        if self.sweep != other.sweep || self.radial != other.radial {
            return Err(Error::configuration(
                "cannot merge vote grids with different axes",
            ));
        }
        for (dst, &src) in self.counts.iter_mut().zip(&other.counts) {
            *dst += src;
        }
        self.dropped += other.dropped;
        Ok(())
    }

    /// Row-major vote counts.
    #[must_use]
    pub fn counts(&self) -> &[u32] {
        &self.counts
    }

    /// Radial profile of one θ column.
    #[must_use]
    pub fn row(&self, theta_bin: usize) -> Option<&[u32]> {
        if theta_bin >= self.theta_bins() {
            return None;
        }
        let start = theta_bin * self.r_bins();
        Some(&self.counts[start..start + self.r_bins()])
    }

    /// Iterator over all cells in `(theta_bin, r_bin)` order.
    pub fn cells(&self) -> impl Iterator<Item = Cell> + '_ {
        let r_bins = self.r_bins();
        self.counts.iter().enumerate().map(move |(idx, &votes)| Cell {
            theta_bin: idx / r_bins,
            r_bin: idx % r_bins,
            votes,
        })
    }

    /// Cell with the highest count; ties resolve to the lowest
    /// `(theta_bin, r_bin)`. `None` if every cell is empty.
    #[must_use]
    pub fn max_cell(&self) -> Option<Cell> {
        self.cells()
            .filter(|cell| cell.votes > 0)
            .fold(None, |best: Option<Cell>, cell| match best {
                Some(b) if b.votes >= cell.votes => Some(b),
                _ => Some(cell),
            })
    }

    /// Sum of all counted votes.
    #[must_use]
    pub fn total_votes(&self) -> u64 {
        self.counts.iter().map(|&c| u64::from(c)).sum()
    }

    /// Number of votes dropped because they fell outside the radial window.
    #[must_use]
    #[inline]
    pub fn dropped(&self) -> u64 {
        self.dropped
    }

    /// Returns true if no cell holds a vote.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.counts.iter().all(|&c| c == 0)
    }

    /// Sampled angle of a θ column.
    #[must_use]
    #[inline]
    pub fn theta_of(&self, theta_bin: usize) -> f64 {
        self.sweep.angle(theta_bin)
    }

    /// Centre of a radial bin.
    #[must_use]
    #[inline]
    pub fn r_center_of(&self, r_bin: usize) -> f64 {
        self.radial.center(r_bin)
    }

    /// Radial bin holding `r`.
    #[must_use]
    #[inline]
    pub fn r_bin_of(&self, r: f64) -> Option<usize> {
        self.radial.bin_of(r)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_grid() -> HoughGrid {
        let sweep = AngleSweep::new(0.0, 1.0, 0.25).unwrap();
        let radial = RadialAxis::new(0.0, 4.0, 4).unwrap();
        HoughGrid::new(sweep, radial)
    }

    #[test]
    fn test_new_grid_is_empty() {
        let grid = small_grid();
        assert_eq!(grid.theta_bins(), 4);
        assert_eq!(grid.r_bins(), 4);
        assert_eq!(grid.counts().len(), 16);
        assert!(grid.is_empty());
        assert_eq!(grid.max_cell(), None);
    }

    #[test]
    fn test_fill_and_get() {
        let mut grid = small_grid();
        assert!(grid.fill(2, 1.5));
        assert!(grid.fill(2, 1.9));
        assert_eq!(grid.get(2, 1), Some(2));
        assert_eq!(grid.get(0, 0), Some(0));
        assert_eq!(grid.get(4, 0), None);
        assert_eq!(grid.row(2), Some(&[0, 2, 0, 0][..]));
    }

    #[test]
    fn test_out_of_range_votes_are_dropped() {
        let mut grid = small_grid();
        assert!(!grid.fill(0, -0.1));
        assert!(!grid.fill(0, 4.0));
        assert!(!grid.fill(0, f64::NAN));
        assert!(!grid.fill(9, 1.0));
        assert!(grid.is_empty());
        assert_eq!(grid.dropped(), 4);
    }

    #[test]
    fn test_edge_value_counted_once() {
        let mut grid = small_grid();
        grid.fill(1, 2.0);
        assert_eq!(grid.total_votes(), 1);
        assert_eq!(grid.get(1, 2), Some(1));
    }

    #[test]
    fn test_max_cell_tie_prefers_lowest_index() {
        let mut grid = small_grid();
        grid.fill(3, 0.5);
        grid.fill(1, 2.5);
        assert_eq!(
            grid.max_cell(),
            Some(Cell {
                theta_bin: 1,
                r_bin: 2,
                votes: 1
            })
        );
    }

    #[test]
    fn test_merge() {
        let mut a = small_grid();
        let mut b = small_grid();
        a.fill(0, 0.5);
        b.fill(0, 0.5);
        b.fill(1, 9.0);
        a.merge(&b).unwrap();
        assert_eq!(a.get(0, 0), Some(2));
        assert_eq!(a.dropped(), 1);
    }

    #[test]
    fn test_merge_rejects_shape_mismatch() {
        let mut a = small_grid();
        let b = HoughGrid::new(
            AngleSweep::new(0.0, 1.0, 0.5).unwrap(),
            RadialAxis::new(0.0, 4.0, 4).unwrap(),
        );
        assert!(matches!(a.merge(&b), Err(Error::Configuration(_))));
    }

    #[test]
    fn test_vote_origin_point() {
        // A point at the origin has r = 0 at every angle.
        let mut grid = small_grid();
        assert_eq!(grid.vote(&Point::new(0.0, 0.0)), 4);
        for theta_bin in 0..4 {
            assert_eq!(grid.get(theta_bin, 0), Some(1));
        }
    }
}
