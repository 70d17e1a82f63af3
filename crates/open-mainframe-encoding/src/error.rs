//! Error types for field decoding.

use miette::Diagnostic;
use thiserror::Error;

/// Errors raised while translating or decoding field bytes.
#[derive(Debug, Error, Diagnostic)]
pub enum EncodingError {
    /// A binary integer slice does not have its canonical width.
    #[error("FIXED BIN({digits}) needs {expected} bytes, got {actual}")]
    #[diagnostic(
        code(encoding::unsupported_width),
        help("FIXED BIN(p) occupies 2 bytes for p <= 16, 4 bytes for p <= 32 and 8 bytes for p <= 64")
    )]
    UnsupportedWidth {
        /// Declared precision in bits.
        digits: usize,
        /// Canonical storage width (0 when the precision has none).
        expected: usize,
        /// Length of the slice that was supplied.
        actual: usize,
    },

    /// A character has no EBCDIC code point in the code page.
    #[error("Character '{ch}' (U+{code:04X}) cannot be encoded in {code_page}")]
    #[diagnostic(code(encoding::unencodable))]
    Unencodable {
        /// The offending character.
        ch: char,
        /// Its Unicode scalar value.
        code: u32,
        /// Name of the target code page.
        code_page: &'static str,
    },
}
