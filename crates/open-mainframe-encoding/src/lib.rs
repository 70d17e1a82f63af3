#![forbid(unsafe_code)]
//! EBCDIC translation and numeric field decoding for OpenMainframe.
//!
//! This crate turns raw mainframe field bytes into display strings. It is
//! the leaf of the record conversion pipeline: the layout crate describes
//! fields, the convert crate slices records, and the functions here render
//! each slice.
//!
//! # Features
//!
//! - **EBCDIC Conversion**: IBM-1047 to Latin-1 with `\uXXXX` escapes for
//!   control and non-printable targets
//! - **Bit Strings**: MSB-first extraction of `BIT(n)` fields
//! - **Packed Decimal**: `FIXED DEC(p,q)` nibble decoding with implied point
//! - **Binary Integer**: `FIXED BIN(p)` halfword/fullword/doubleword decoding
//! - **Numeric Pictures**: `PIC'999V99'` display decoding
//!
//! # Example
//!
//! ```rust
//! use open_mainframe_encoding::ebcdic::CP1047;
//! use open_mainframe_encoding::decimal::{decode_fixed_binary, packed_to_display};
//!
//! assert_eq!(CP1047.decode_escaped(&[0xC8, 0xC9]), "HI");
//! assert_eq!(packed_to_display(&[0x12, 0x3D], 3, 1), "-12.3");
//! assert_eq!(decode_fixed_binary(&[0x01, 0x02], 16, false).unwrap(), "258");
//! ```

pub mod bits;
pub mod decimal;
pub mod ebcdic;
pub mod error;

// Re-export commonly used items at crate root
pub use bits::extract_bits;
pub use decimal::{
    binary_width, decode_fixed_binary, decode_picture, insert_implied_point, packed_to_display,
};
pub use ebcdic::{CodePage, CP1047};
pub use error::EncodingError;

/// Result type for encoding operations.
pub type Result<T> = std::result::Result<T, EncodingError>;
