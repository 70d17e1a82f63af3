//! Error types for record conversion.

use miette::Diagnostic;
use open_mainframe_encoding::EncodingError;
use open_mainframe_layout::LayoutError;
use thiserror::Error;

/// Errors that can occur while converting a record file.
///
/// Any error aborts the conversion of the current file. Groups already handed
/// to the writer stay written; the group in flight is dropped.
#[derive(Debug, Error, Diagnostic)]
pub enum ConvertError {
    /// A field could not be decoded.
    #[error(transparent)]
    #[diagnostic(transparent)]
    Encoding(#[from] EncodingError),

    /// The layout could not be loaded.
    #[error(transparent)]
    #[diagnostic(transparent)]
    Layout(#[from] LayoutError),

    /// I/O error while reading records or writing output.
    #[error("I/O error: {message}")]
    #[diagnostic(code(convert::io_error))]
    Io {
        /// Description of the I/O error.
        message: String,
    },

    /// No layout other than `ROOT` declares fields.
    #[error("Layout declares no data records")]
    #[diagnostic(
        code(convert::no_data_layout),
        help("Add at least one DCL record with level-numbered fields")
    )]
    NoDataLayouts,

    /// A runtime repeat expression did not resolve to a count.
    #[error("Repeat count for {field} resolved to '{value}', expected a non-negative integer")]
    #[diagnostic(
        code(convert::invalid_repeat_count),
        help("OCCURS must name an earlier numeric field or give a literal count")
    )]
    InvalidRepeatCount {
        /// Name of the repeated group.
        field: String,
        /// Resolved text of the repeat expression.
        value: String,
    },

    /// JSON rendering failed.
    #[error("JSON output failed: {0}")]
    #[diagnostic(code(convert::json))]
    Json(#[from] serde_json::Error),

    /// CSV rendering failed.
    #[error("CSV output failed: {0}")]
    #[diagnostic(code(convert::csv))]
    Csv(#[from] csv::Error),
}

impl From<std::io::Error> for ConvertError {
    fn from(err: std::io::Error) -> Self {
        ConvertError::Io {
            message: err.to_string(),
        }
    }
}
