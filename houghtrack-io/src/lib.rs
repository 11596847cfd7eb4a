//! houghtrack-io: readers and writers for houghtrack data.
//!
//! Point sets are exchanged as CSV; vote grids and peaks can be written
//! as CSV or pretty-printed JSON.
//!

mod error;
mod reader;
mod writer;

pub use error::{Error, Result};
pub use reader::{read_points_csv, read_points_file, DEFAULT_GROUP};
pub use writer::DataFileWriter;
