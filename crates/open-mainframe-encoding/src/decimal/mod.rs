//! Numeric field decoding.
//!
//! Three storage formats appear in the converted layouts:
//!
//! - **Packed Decimal (`FIXED DEC`)**: two BCD digits per byte, sign nibble last
//! - **Binary (`FIXED BIN`)**: big-endian halfword, fullword or doubleword
//! - **Numeric Picture (`PIC'...'`)**: EBCDIC display digits with an implied point
//!
//! Every decoder renders a display string rather than a numeric value; the
//! converted output carries the digits exactly as they were stored.

mod binary;
mod packed;
mod picture;

pub use binary::{binary_width, decode_fixed_binary};
pub use packed::{packed_to_display, NEGATIVE_SIGN_NIBBLE};
pub use picture::{decode_picture, insert_implied_point};
