//! File writers for points, vote grids and peaks.

use crate::Result;
use houghtrack_core::{GroupKind, HoughGrid, Peak, PointSet};
use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

pub(crate) fn kind_label(kind: GroupKind) -> &'static str {
    match kind {
        GroupKind::Track => "track",
        GroupKind::Noise => "noise",
    }
}

/// Writer for houghtrack output files.
pub struct DataFileWriter<W: Write = BufWriter<File>> {
    writer: W,
}

impl DataFileWriter {
    /// Creates a new file writer.
    ///
    /// # Errors
    /// Returns an error if the file cannot be created.
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::create(path)?;
        Ok(Self {
            writer: BufWriter::new(file),
        })
    }
}

impl<W: Write> DataFileWriter<W> {
    /// Wraps an arbitrary writer.
    pub fn from_writer(writer: W) -> Self {
        Self { writer }
    }

    /// Writes point sets as CSV: `group,kind,x,y`.
    ///
    /// # Errors
    /// Returns an error if writing fails.
    pub fn write_points_csv(&mut self, sets: &[PointSet]) -> Result<()> {
        writeln!(self.writer, "group,kind,x,y")?;
        for set in sets {
            let kind = kind_label(set.kind());
            for p in set.iter() {
                writeln!(self.writer, "{},{},{},{}", set.name(), kind, p.x, p.y)?;
            }
        }
        self.writer.flush()?;
        Ok(())
    }

    /// Writes a vote grid as CSV: `theta_bin,r_bin,theta,r,votes`.
    ///
    /// With `skip_empty` only cells holding votes are written; otherwise the
    /// dense grid is written in `(theta_bin, r_bin)` order.
    ///
    /// # Errors
    /// Returns an error if writing fails.
    pub fn write_grid_csv(&mut self, grid: &HoughGrid, skip_empty: bool) -> Result<()> {
        writeln!(self.writer, "theta_bin,r_bin,theta,r,votes")?;
        for cell in grid.cells() {
            if skip_empty && cell.votes == 0 {
                continue;
            }
            writeln!(
                self.writer,
                "{},{},{},{},{}",
                cell.theta_bin,
                cell.r_bin,
                grid.theta_of(cell.theta_bin),
                grid.r_center_of(cell.r_bin),
                cell.votes
            )?;
        }
        self.writer.flush()?;
        Ok(())
    }

    /// Writes peaks as CSV: `theta_bin,r_bin,theta,r,votes,slope,intercept`.
    ///
    /// Slope and intercept are empty for vertical lines.
    ///
    /// # Errors
    /// Returns an error if writing fails.
    pub fn write_peaks_csv(&mut self, peaks: &[Peak]) -> Result<()> {
        writeln!(self.writer, "theta_bin,r_bin,theta,r,votes,slope,intercept")?;
        for peak in peaks {
            let (slope, intercept) = peak.line().slope_intercept().map_or_else(
                || (String::new(), String::new()),
                |(m, b)| (m.to_string(), b.to_string()),
            );
            writeln!(
                self.writer,
                "{},{},{},{},{},{},{}",
                peak.theta_bin, peak.r_bin, peak.theta, peak.r, peak.votes, slope, intercept
            )?;
        }
        self.writer.flush()?;
        Ok(())
    }

    /// Writes any serializable value as pretty-printed JSON.
    ///
    /// # Errors
    /// Returns an error if serialization or writing fails.
    pub fn write_json<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<()> {
        serde_json::to_writer_pretty(&mut self.writer, value)?;
        writeln!(self.writer)?;
        self.writer.flush()?;
        Ok(())
    }

    /// Flushes the writer.
    ///
    /// # Errors
    /// Returns an error if flushing fails.
    pub fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }

    /// Returns the inner writer.
    pub fn into_inner(self) -> W {
        self.writer
    }
}
