//! Output rendering of decoded groups.
//!
//! The assembler drives a [`RecordWriter`] in a fixed order:
//!
//! 1. [`write_start_array`](RecordWriter::write_start_array)
//! 2. [`write_header`](RecordWriter::write_header) once, before the first object
//! 3. [`write_object`](RecordWriter::write_object) per completed group
//! 4. [`write_end_array`](RecordWriter::write_end_array)
//! 5. [`finish`](RecordWriter::finish)

mod csv;
mod json;

pub use self::csv::{flatten, CsvWriter};
pub use self::json::JsonWriter;

use std::io::Write;

use crate::group::OutputGroup;
use crate::options::{Mode, OutputFormat};
use crate::Result;

/// Sink for decoded output groups.
pub trait RecordWriter {
    /// Opens the top-level sequence.
    fn write_start_array(&mut self) -> Result<()>;

    /// Receives the first group before it is written, for column headers.
    fn write_header(&mut self, group: &OutputGroup, mode: Mode, root: Option<&str>) -> Result<()>;

    /// Writes one completed group.
    fn write_object(&mut self, group: &OutputGroup, mode: Mode, root: Option<&str>) -> Result<()>;

    /// Closes the top-level sequence.
    fn write_end_array(&mut self) -> Result<()>;

    /// Flushes buffered output.
    fn finish(&mut self) -> Result<()>;
}

/// Creates the writer for an output format.
pub fn create_writer<'w, W: Write + 'w>(format: OutputFormat, out: W) -> Box<dyn RecordWriter + 'w> {
    match format {
        OutputFormat::Json => Box::new(JsonWriter::pretty(out)),
        OutputFormat::JsonCompact => Box::new(JsonWriter::compact(out)),
        OutputFormat::Csv => Box::new(CsvWriter::new(out)),
    }
}
