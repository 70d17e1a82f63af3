//! Binary integer (`FIXED BIN`) decoding.
//!
//! Storage size depends on the declared precision in bits:
//! - p <= 16: 2 bytes (halfword)
//! - p <= 32: 4 bytes (fullword)
//! - p <= 64: 8 bytes (doubleword)
//!
//! Signed fields use sign-flag encoding: the top bit of the first byte is the
//! sign and the remaining bits are the magnitude. This is not two's
//! complement; `0x81 0x02` reads as -258.

use crate::Result;
use crate::error::EncodingError;

const SIGN_BIT: u8 = 0b1000_0000;

/// Canonical storage width in bytes for a binary precision.
///
/// Returns 0 for precisions wider than a doubleword.
pub fn binary_width(digits: usize) -> usize {
    match digits {
        0..=16 => 2,
        17..=32 => 4,
        33..=64 => 8,
        _ => 0,
    }
}

/// Decode a big-endian binary integer to its decimal display string.
///
/// # Errors
/// Returns `EncodingError::UnsupportedWidth` if `bytes` is not exactly the
/// canonical width for `digits`.
pub fn decode_fixed_binary(bytes: &[u8], digits: usize, signed: bool) -> Result<String> {
    let expected = binary_width(digits);
    if bytes.len() != expected {
        return Err(EncodingError::UnsupportedWidth {
            digits,
            expected,
            actual: bytes.len(),
        });
    }

    let mut negative = false;
    let mut magnitude: u64 = 0;
    for (i, &byte) in bytes.iter().enumerate() {
        let mut byte = byte;
        if i == 0 && signed {
            negative = byte & SIGN_BIT != 0;
            byte &= !SIGN_BIT;
        }
        magnitude = (magnitude << 8) | u64::from(byte);
    }

    Ok(if negative {
        format!("-{magnitude}")
    } else {
        magnitude.to_string()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_halfword_unsigned() {
        assert_eq!(decode_fixed_binary(&[0x01, 0x02], 16, false).unwrap(), "258");
    }

    #[test]
    fn test_halfword_sign_flag() {
        assert_eq!(decode_fixed_binary(&[0x81, 0x02], 16, true).unwrap(), "-258");
    }

    #[test]
    fn test_unsigned_ignores_top_bit_meaning() {
        assert_eq!(decode_fixed_binary(&[0x81, 0x02], 15, false).unwrap(), "33026");
    }

    #[test]
    fn test_fullword() {
        assert_eq!(
            decode_fixed_binary(&[0x00, 0x01, 0x00, 0x00], 31, false).unwrap(),
            "65536"
        );
    }

    #[test]
    fn test_doubleword_signed() {
        let bytes = [0x80, 0, 0, 0, 0, 0, 0x01, 0x00];
        assert_eq!(decode_fixed_binary(&bytes, 63, true).unwrap(), "-256");
    }

    #[test]
    fn test_width_mismatch() {
        let err = decode_fixed_binary(&[0x01, 0x02, 0x03], 16, false).unwrap_err();
        assert!(matches!(
            err,
            EncodingError::UnsupportedWidth {
                digits: 16,
                expected: 2,
                actual: 3
            }
        ));
    }

    #[test]
    fn test_precision_too_wide() {
        assert!(decode_fixed_binary(&[0u8; 8], 65, false).is_err());
    }

    #[test]
    fn test_binary_width() {
        assert_eq!(binary_width(0), 2);
        assert_eq!(binary_width(15), 2);
        assert_eq!(binary_width(16), 2);
        assert_eq!(binary_width(17), 4);
        assert_eq!(binary_width(31), 4);
        assert_eq!(binary_width(64), 8);
        assert_eq!(binary_width(65), 0);
    }
}
