//! CLI for converting EBCDIC record files.
//!
//! # Examples
//!
//! ```bash
//! # Pretty JSON to standard output
//! open-mainframe-convert --layout customer.pli customer.dat
//!
//! # CSV to a file, keeping indexed names
//! open-mainframe-convert -l customer.pli -f csv --without-array-grouping -o customer.csv customer.dat
//! ```

use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;

use clap::Parser;
use miette::{IntoDiagnostic, Result, WrapErr};
use tracing::info;

use open_mainframe_convert::{
    convert_with_layout_file, BufferSize, ConvertOptions, Mode, OutputFormat,
};

#[derive(Parser, Debug)]
#[command(name = "open-mainframe-convert")]
#[command(author, version, about = "Convert EBCDIC record files to JSON or CSV", long_about = None)]
struct Cli {
    /// Record file to convert
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Record layout file
    #[arg(short, long, value_name = "FILE")]
    layout: PathBuf,

    /// Output file (standard output when omitted)
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Json)]
    format: OutputFormat,

    /// Keep indexed names instead of collecting repeats into lists
    #[arg(long)]
    without_array_grouping: bool,

    /// Read the input through a 10 MiB buffer
    #[arg(long)]
    large_buffer: bool,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    let options = ConvertOptions {
        format: cli.format,
        mode: if cli.without_array_grouping {
            Mode::WithoutArrayGrouping
        } else {
            Mode::WithArrayGrouping
        },
        buffer: if cli.large_buffer {
            BufferSize::TenMegabytes
        } else {
            BufferSize::Default
        },
    };

    let input = File::open(&cli.input)
        .into_diagnostic()
        .wrap_err_with(|| format!("Failed to open {}", cli.input.display()))?;

    let summary = match &cli.output {
        Some(path) => {
            let file = File::create(path)
                .into_diagnostic()
                .wrap_err_with(|| format!("Failed to create {}", path.display()))?;
            convert_with_layout_file(&cli.layout, input, &options, BufWriter::new(file))?
        }
        None => {
            convert_with_layout_file(&cli.layout, input, &options, std::io::stdout().lock())?
        }
    };

    info!(
        input = %cli.input.display(),
        records = summary.records,
        groups = summary.groups,
        "converted"
    );
    Ok(())
}
