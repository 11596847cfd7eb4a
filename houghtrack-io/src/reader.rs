//! Point-set readers.
//!
//! Accepts the CSV written by [`crate::DataFileWriter::write_points_csv`]
//! (`group,kind,x,y`) or a bare `x,y` hit list, which becomes a single
//! track group named `hits`.

use crate::{Error, Result};
use houghtrack_core::{GroupKind, Point, PointSet};
use log::debug;
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

/// Name of the group created for bare `x,y` input.
pub const DEFAULT_GROUP: &str = "hits";

fn parse_kind(field: &str, line_no: usize) -> Result<GroupKind> {
    match field.trim() {
        "track" => Ok(GroupKind::Track),
        "noise" => Ok(GroupKind::Noise),
        other => Err(Error::InvalidFormat(format!(
            "line {line_no}: unknown group kind '{other}'"
        ))),
    }
}

fn parse_coord(field: &str, line_no: usize) -> Result<f64> {
    let value: f64 = field.trim().parse().map_err(|_| {
        Error::InvalidFormat(format!("line {line_no}: invalid coordinate '{}'", field.trim()))
    })?;
    if !value.is_finite() {
        return Err(Error::InvalidFormat(format!(
            "line {line_no}: coordinate must be finite, got {value}"
        )));
    }
    Ok(value)
}

/// Reads point sets from CSV text.
///
/// Groups keep the order of their first appearance. The first row is
/// treated as a header when it is `group,kind,x,y` or a non-numeric `x,y`
/// pair; blank lines and `#` comments are ignored.
///
/// # Errors
/// Returns [`Error::InvalidFormat`] for malformed rows and [`Error::Io`]
/// for read failures.
pub fn read_points_csv<R: Read>(input: R) -> Result<Vec<PointSet>> {
    let mut groups: Vec<(String, GroupKind, Vec<Point>)> = Vec::new();
    let mut first_row = true;

    for (idx, line) in BufReader::new(input).lines().enumerate() {
        let line = line?;
        let line_no = idx + 1;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let fields: Vec<&str> = trimmed.split(',').collect();
        let header = std::mem::replace(&mut first_row, false);

        let (name, kind, x, y) = match fields.as_slice() {
            [x, y] => (DEFAULT_GROUP, GroupKind::Track, *x, *y),
            [name, _, x, _] if header && name.trim() == "group" && x.trim() == "x" => continue,
            [name, kind, x, y] => (name.trim(), parse_kind(kind, line_no)?, *x, *y),
            _ => {
                return Err(Error::InvalidFormat(format!(
                    "line {line_no}: expected 2 or 4 fields, found {}",
                    fields.len()
                )))
            }
        };
        if header && fields.len() == 2 && x.trim().parse::<f64>().is_err() {
            continue;
        }
        let point = Point::new(parse_coord(x, line_no)?, parse_coord(y, line_no)?);

        match groups.iter_mut().find(|(n, _, _)| n == name) {
            Some((_, existing, points)) => {
                if *existing != kind {
                    return Err(Error::InvalidFormat(format!(
                        "line {line_no}: group '{name}' changes kind"
                    )));
                }
                points.push(point);
            }
            None => groups.push((name.to_string(), kind, vec![point])),
        }
    }

    debug!("read {} point groups", groups.len());
    Ok(groups
        .into_iter()
        .map(|(name, kind, points)| PointSet::new(name, kind, points))
        .collect())
}

/// Reads point sets from a CSV file.
///
/// # Errors
/// Same as [`read_points_csv`], plus file-open failures.
pub fn read_points_file<P: AsRef<Path>>(path: P) -> Result<Vec<PointSet>> {
    read_points_csv(File::open(path)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DataFileWriter;

    #[test]
    fn test_read_bare_hits() {
        let sets = read_points_csv("x,y\n0,1\n0.5,1.25\n".as_bytes()).unwrap();
        assert_eq!(sets.len(), 1);
        assert_eq!(sets[0].name(), DEFAULT_GROUP);
        assert_eq!(sets[0].points(), &[Point::new(0.0, 1.0), Point::new(0.5, 1.25)]);
    }

    #[test]
    fn test_read_headerless_hits() {
        let sets = read_points_csv("1,2\n# comment\n\n3,4\n".as_bytes()).unwrap();
        assert_eq!(sets[0].len(), 2);
    }

    #[test]
    fn test_read_back_written_groups() {
        let sets = vec![
            PointSet::track("track 1", vec![Point::new(0.0, 2.0), Point::new(0.5, 2.25)]),
            PointSet::noise("noise", vec![Point::new(3.5, -1.0)]),
        ];
        let mut writer = DataFileWriter::from_writer(Vec::new());
        writer.write_points_csv(&sets).unwrap();
        let bytes = writer.into_inner();

        let read = read_points_csv(bytes.as_slice()).unwrap();
        assert_eq!(read, sets);
    }

    #[test]
    fn test_rejects_malformed_rows() {
        assert!(matches!(
            read_points_csv("1,2,3\n".as_bytes()),
            Err(Error::InvalidFormat(_))
        ));
        assert!(matches!(
            read_points_csv("1,abc\n".as_bytes()),
            Err(Error::InvalidFormat(_))
        ));
        assert!(matches!(
            read_points_csv("a,track,1,2\na,noise,1,2\n".as_bytes()),
            Err(Error::InvalidFormat(_))
        ));
        assert!(matches!(
            read_points_csv("a,line,1,2\n".as_bytes()),
            Err(Error::InvalidFormat(_))
        ));
    }
}
