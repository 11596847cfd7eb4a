//! Per-group and combined vote grids produced by one analysis run.

use crate::grid::HoughGrid;
use crate::point::{GroupKind, Point};
use crate::sweep::{AngleSweep, RadialAxis};
use crate::{Error, Result};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Diagnostic grid holding the votes of a single point group.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GroupGrid {
    /// Group name.
    pub name: String,
    /// Group role.
    pub kind: GroupKind,
    /// Number of points that voted into this grid.
    pub points: usize,
    /// Votes of this group only.
    pub grid: HoughGrid,
}

/// Vote accumulator for one analysis.
///
/// Every vote lands in its group's grid and in the combined grid. The
/// combined grid is the one used for peak detection.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Accumulator {
    groups: Vec<GroupGrid>,
    combined: HoughGrid,
}

impl Accumulator {
    /// Creates an accumulator with no groups and an empty combined grid.
    #[must_use]
    pub fn new(sweep: AngleSweep, radial: RadialAxis) -> Self {
        Self {
            groups: Vec::new(),
            combined: HoughGrid::new(sweep, radial),
        }
    }

    /// Allocates an all-zero grid for a new group and returns its index.
    pub fn add_group(&mut self, name: impl Into<String>, kind: GroupKind) -> usize {
        let grid = HoughGrid::new(*self.combined.sweep(), *self.combined.radial());
        self.groups.push(GroupGrid {
            name: name.into(),
            kind,
            points: 0,
            grid,
        });
        self.groups.len() - 1
    }

    /// Casts the full sweep of votes for `point` into group `group` and the
    /// combined grid. Returns the number of votes counted per grid.
    ///
    /// `trig` must come from [`AngleSweep::trig_table`] of this accumulator's
    /// sweep.
    ///
    /// # Errors
    /// Returns [`Error::InvalidArgument`] if `group` does not exist.
    pub fn vote(&mut self, group: usize, point: &Point, trig: &[(f64, f64)]) -> Result<usize> {
        let entry = self
            .groups
            .get_mut(group)
            .ok_or_else(|| Error::invalid_argument(format!("unknown group index {group}")))?;
        entry.points += 1;
        entry.grid.vote_with(point, trig);
        Ok(self.combined.vote_with(point, trig))
    }

    /// Adds a partial grid of `points` votes into group `group` and the
    /// combined grid.
    ///
    /// # Errors
    /// Returns [`Error::InvalidArgument`] if `group` does not exist and
    /// [`Error::Configuration`] if the partial grid has different axes.
    pub fn absorb(&mut self, group: usize, partial: &HoughGrid, points: usize) -> Result<()> {
        let entry = self
            .groups
            .get_mut(group)
            .ok_or_else(|| Error::invalid_argument(format!("unknown group index {group}")))?;
        entry.grid.merge(partial)?;
        entry.points += points;
        self.combined.merge(partial)
    }

    /// Combined grid of all groups.
    #[must_use]
    pub fn combined(&self) -> &HoughGrid {
        &self.combined
    }

    /// Consumes the accumulator, keeping only the combined grid.
    #[must_use]
    pub fn into_combined(self) -> HoughGrid {
        self.combined
    }

    /// Per-group grids in insertion order.
    #[must_use]
    pub fn groups(&self) -> &[GroupGrid] {
        &self.groups
    }

    /// Looks up a group grid by name.
    #[must_use]
    pub fn group(&self, name: &str) -> Option<&GroupGrid> {
        self.groups.iter().find(|g| g.name == name)
    }

    /// Grids of all noise groups.
    pub fn noise_groups(&self) -> impl Iterator<Item = &GroupGrid> {
        self.groups.iter().filter(|g| g.kind == GroupKind::Noise)
    }

    /// Grids of all track groups.
    pub fn track_groups(&self) -> impl Iterator<Item = &GroupGrid> {
        self.groups.iter().filter(|g| g.kind == GroupKind::Track)
    }

    /// Total number of points voted.
    #[must_use]
    pub fn total_points(&self) -> usize {
        self.groups.iter().map(|g| g.points).sum()
    }
}
