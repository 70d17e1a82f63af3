#![forbid(unsafe_code)]
//! Record layout parsing for OpenMainframe record conversion.
//!
//! A layout is a PL/I-flavoured description of one or more record formats:
//!
//! ```text
//! DCL 1 CUSTOMER FB,
//!       3 ID        FIXED BIN(31),
//!       3 NAME      CHAR(20),
//!       3 BALANCE   FIXED DEC(9,2),
//!       3 PHONES(2),
//!         5 KIND    CHAR(1),
//!         5 NUMBER  PIC'(10)9';
//! ```
//!
//! Parsing produces one [`RecordLayoutSet`] per `DCL`/`DECLARE`/`ROOT`
//! header, each holding a tree of [`FieldDescriptor`] nodes with static
//! arrays already expanded.
//!
//! # Example
//!
//! ```rust
//! use open_mainframe_layout::{parse_layout, DataType, RecordType};
//!
//! let layouts = parse_layout("DCL 1 REC FB,\n  3 CODE CHAR(4),\n  3 QTY FIXED BIN(15);");
//! assert_eq!(layouts.len(), 1);
//! assert_eq!(layouts[0].record_type, RecordType::FixedLength);
//! assert_eq!(layouts[0].fixed_length(), 6);
//! let rec = &layouts[0].fields[0];
//! assert_eq!(rec.children[1].data_type, Some(DataType::BinaryInteger));
//! ```

pub mod error;
pub mod reader;
pub mod row;
pub mod source;
pub mod tree;
pub mod types;

pub use error::LayoutError;
pub use reader::{parse_layout, read_layout_file};
pub use row::parse_row;
pub use tree::{build_tree, expand_arrays};
pub use types::{
    array_index, base_name, fixed_length, DataType, FieldDescriptor, RecordLayoutSet, RecordType,
    FILLER_NAMES, SKIP_MARKER,
};

/// Result type for layout operations.
pub type Result<T> = std::result::Result<T, LayoutError>;
