//! Conversion options.

use serde::{Deserialize, Serialize};

/// How repeated sibling names are folded into the output map.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Mode {
    /// Repeats of one base name are collected into an ordered list.
    #[default]
    WithArrayGrouping,
    /// Repeats keep their indexed names, or get `(2)`, `(3)`, ... suffixes.
    WithoutArrayGrouping,
}

/// Output rendering.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum OutputFormat {
    /// Indented JSON array.
    #[default]
    Json,
    /// JSON array without whitespace.
    JsonCompact,
    /// `|`-separated rows with a header row of dotted field paths.
    Csv,
}

/// Read buffer used for the record source.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BufferSize {
    /// 8 KiB.
    #[default]
    Default,
    /// 10 MiB, for large sequential inputs.
    TenMegabytes,
}

impl BufferSize {
    /// Buffer capacity in bytes.
    pub fn capacity(self) -> usize {
        match self {
            BufferSize::Default => 8 * 1024,
            BufferSize::TenMegabytes => 10 * 1024 * 1024,
        }
    }
}

/// Options for one conversion run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConvertOptions {
    /// Output rendering.
    pub format: OutputFormat,
    /// Folding of repeated names.
    pub mode: Mode,
    /// Input buffer size.
    pub buffer: BufferSize,
}
