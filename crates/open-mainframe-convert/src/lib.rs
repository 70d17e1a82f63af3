#![forbid(unsafe_code)]
//! EBCDIC record conversion for OpenMainframe.
//!
//! Reads a file of fixed-length or RDW-prefixed mainframe records, decodes
//! every record through a PL/I-style layout and writes the result as JSON or
//! CSV.
//!
//! # Features
//!
//! - **Framing**: fixed-length and RDW variable-length records
//! - **Structure Walking**: nested groups, static arrays and `OCCURS` counts
//!   resolved from earlier fields
//! - **Grouping**: round-robin multi-record groups and segment-name dispatch
//! - **Output**: pretty or compact JSON, `|`-separated CSV
//!
//! # Example
//!
//! ```rust
//! use open_mainframe_convert::{convert, ConvertOptions, OutputFormat};
//! use open_mainframe_encoding::CP1047;
//! use open_mainframe_layout::parse_layout;
//!
//! let layouts = parse_layout("DCL 1 ITEM FB,\n  3 CODE CHAR(3),\n  3 QTY FIXED BIN(15);");
//! let mut input = CP1047.encode("ABC").unwrap();
//! input.extend_from_slice(&[0x00, 0x07]);
//!
//! let options = ConvertOptions { format: OutputFormat::JsonCompact, ..Default::default() };
//! let mut output = Vec::new();
//! convert(input.as_slice(), &layouts, &options, &mut output).unwrap();
//! assert_eq!(
//!     String::from_utf8(output).unwrap(),
//!     "[{\"ITEM\":{\"CODE\":\"ABC\",\"QTY\":\"7\"}}]\n"
//! );
//! ```

pub mod assembler;
pub mod decode;
pub mod error;
pub mod framer;
pub mod group;
pub mod options;
pub mod record;
pub mod value;
pub mod writer;

pub use assembler::{convert, convert_with_layout_file, ConvertSummary, RecordGroupAssembler};
pub use error::ConvertError;
pub use framer::RecordFramer;
pub use group::{merge_entry, OutputGroup};
pub use options::{BufferSize, ConvertOptions, Mode, OutputFormat};
pub use record::StructureRecord;
pub use value::{FieldMap, Value};
pub use writer::{create_writer, CsvWriter, JsonWriter, RecordWriter};

/// Result type for conversion operations.
pub type Result<T> = std::result::Result<T, ConvertError>;
