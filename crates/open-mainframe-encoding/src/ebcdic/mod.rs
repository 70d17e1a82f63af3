//! EBCDIC translation for record character fields.
//!
//! Character data in the converted datasets is IBM-1047. Decoding maps each
//! byte through a fixed table to a Latin-1 code point. The escaping decoder
//! additionally replaces control characters and the C1 / upper-punctuation
//! band with `\uXXXX` sequences so the text can be embedded verbatim in JSON
//! or CSV output.

mod tables;

pub use tables::{CodePage, CP1047};

use crate::error::EncodingError;
use crate::Result;

/// Latin-1 code points rendered as `\uXXXX` by [`CodePage::decode_escaped`].
#[inline]
pub fn needs_escape(code: u8) -> bool {
    code < 0x20 || (0x7F..=0xBF).contains(&code)
}

impl CodePage {
    /// Decode EBCDIC bytes, escaping non-printable targets.
    ///
    /// Printable targets are emitted as the Latin-1 character itself; all
    /// others become a six character `\uXXXX` escape with upper-case hex.
    pub fn decode_escaped(&self, bytes: &[u8]) -> String {
        let mut result = String::with_capacity(bytes.len());
        for &b in bytes {
            let code = self.ebcdic_to_latin1[b as usize];
            if needs_escape(code) {
                result.push_str(&format!("\\u{:04X}", code));
            } else {
                result.push(char::from(code));
            }
        }
        result
    }

    /// Encode a string to EBCDIC bytes.
    ///
    /// # Errors
    /// Returns `EncodingError::Unencodable` for characters outside Latin-1.
    pub fn encode(&self, s: &str) -> Result<Vec<u8>> {
        s.chars()
            .map(|ch| {
                u8::try_from(u32::from(ch))
                    .map(|latin1| self.latin1_to_ebcdic[latin1 as usize])
                    .map_err(|_| EncodingError::Unencodable {
                        ch,
                        code: u32::from(ch),
                        code_page: self.name,
                    })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_letter() {
        assert_eq!(CP1047.decode_escaped(&[0xC1]), "A");
    }

    #[test]
    fn test_nul_is_escaped() {
        assert_eq!(CP1047.decode_escaped(&[0x00]), "\\u0000");
    }

    #[test]
    fn test_empty_slice() {
        assert_eq!(CP1047.decode_escaped(&[]), "");
    }

    #[test]
    fn test_hello_world() {
        let bytes = [0xC8, 0xC5, 0xD3, 0xD3, 0xD6, 0x40, 0xE6, 0xD6, 0xD9, 0xD3, 0xC4];
        assert_eq!(CP1047.decode_escaped(&bytes), "HELLO WORLD");
    }

    #[test]
    fn test_digits() {
        let bytes: Vec<u8> = (0xF0..=0xF9).collect();
        assert_eq!(CP1047.decode_escaped(&bytes), "0123456789");
    }

    #[test]
    fn test_cp1047_brackets() {
        assert_eq!(CP1047.decode_escaped(&[0xAD, 0xBD]), "[]");
        assert_eq!(CP1047.decode_escaped(&[0x5F]), "^");
    }

    #[test]
    fn test_control_band_is_escaped() {
        // 0x07 -> DEL (0x7F), 0x20 -> 0x80, 0x4A -> cent sign (0xA2)
        assert_eq!(CP1047.decode_escaped(&[0x07]), "\\u007F");
        assert_eq!(CP1047.decode_escaped(&[0x20]), "\\u0080");
        assert_eq!(CP1047.decode_escaped(&[0x4A]), "\\u00A2");
        assert_eq!(CP1047.decode_escaped(&[0x15]), "\\u000A");
        assert_eq!(CP1047.decode_escaped(&[0x25]), "\\u0085");
    }

    #[test]
    fn test_latin1_letters_are_literal() {
        // 0x51 -> e acute (0xE9), 0x41 -> nbsp (0xA0, escaped)
        assert_eq!(CP1047.decode_escaped(&[0x51]), "\u{E9}");
        assert_eq!(CP1047.decode_escaped(&[0x41]), "\\u00A0");
    }

    #[test]
    fn test_encode_roundtrip() {
        let encoded = CP1047.encode("ORDER-42 [A]").unwrap();
        assert_eq!(CP1047.decode_escaped(&encoded), "ORDER-42 [A]");
    }

    #[test]
    fn test_encode_space_and_letters() {
        assert_eq!(CP1047.encode(" AZ").unwrap(), vec![0x40, 0xC1, 0xE9]);
    }

    #[test]
    fn test_encode_rejects_non_latin1() {
        let err = CP1047.encode("\u{20AC}").unwrap_err();
        assert!(matches!(err, EncodingError::Unencodable { code: 0x20AC, .. }));
    }

    #[test]
    fn test_table_is_one_to_one() {
        for b in 0..=255u8 {
            let latin1 = CP1047.ebcdic_to_latin1[b as usize];
            assert_eq!(CP1047.latin1_to_ebcdic[latin1 as usize], b);
        }
    }

    #[test]
    fn test_ccsid_field() {
        assert_eq!(CP1047.ccsid, 1047);
        assert_eq!(CP1047.name, "CP1047");
    }
}
