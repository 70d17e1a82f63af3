//! Error types for layout loading.

use miette::Diagnostic;
use thiserror::Error;

/// Errors that can occur while loading a record layout.
///
/// Line-level problems are not errors: a line matching no known grammar is
/// dropped and the rest of the layout is still used.
#[derive(Debug, Error, Diagnostic)]
pub enum LayoutError {
    /// The layout file could not be read.
    #[error("Cannot read layout {path}: {message}")]
    #[diagnostic(
        code(layout::io_error),
        help("Check that the layout path exists and is UTF-8 text")
    )]
    Io {
        /// Path of the layout file.
        path: String,
        /// Description of the I/O error.
        message: String,
    },

    /// The layout declares no data-bearing record.
    #[error("Layout {path} declares no record fields")]
    #[diagnostic(
        code(layout::empty),
        help("Each record must start with a DCL, 0DCL or DECLARE line followed by level-numbered fields")
    )]
    Empty {
        /// Path (or description) of the layout source.
        path: String,
    },
}
