use clap::{Args, Subcommand};
use std::path::PathBuf;

use cosmiq_block::{Marker, DEFAULT_WINDOW_SIZE};

use crate::exit::CliResult;
use crate::output::OutputFormat;

pub mod analyse;
pub mod dump;
pub mod version;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Split a capture into channels and recover data blocks from the body.
    Dump(DumpArgs),
    /// Scan recovered block files for candidate samples.
    Analyse(AnalyseArgs),
    /// Show version information.
    Version(VersionArgs),
}

pub fn run(command: Command, format: OutputFormat) -> CliResult<i32> {
    match command {
        Command::Dump(args) => dump::run(args, format),
        Command::Analyse(args) => analyse::run(args, format),
        Command::Version(args) => version::run(args),
    }
}

#[derive(Args, Debug)]
pub struct DumpArgs {
    /// Capture file, one hex frame per line.
    pub capture: PathBuf,
    /// Directory recovered blocks are written to. Block files from earlier runs are removed.
    #[arg(long, value_name = "DIR", env = "COSMIQ_DATA_DIR", default_value = "data")]
    pub out_dir: PathBuf,
    /// Report blocks without writing them.
    #[arg(long)]
    pub no_write: bool,
    /// Segmentation window size in bytes.
    #[arg(long, value_name = "BYTES", default_value_t = DEFAULT_WINDOW_SIZE)]
    pub window_size: usize,
    /// Filler byte value (hex).
    #[arg(long, value_name = "HEX", value_parser = parse_byte, default_value = "ff")]
    pub filler: u8,
    /// Command code of header frames (hex).
    #[arg(long, value_name = "HEX", value_parser = parse_byte, default_value = "42")]
    pub header_command: u8,
    /// Command code of body frames (hex).
    #[arg(long, value_name = "HEX", value_parser = parse_byte, default_value = "44")]
    pub body_command: u8,
}

#[derive(Args, Debug)]
pub struct AnalyseArgs {
    /// Block files, or directories holding `*.bin` block files.
    #[arg(default_value = "data")]
    pub paths: Vec<PathBuf>,
    /// Samples listed per block (0 lists all).
    #[arg(long, default_value_t = 5)]
    pub limit: usize,
    /// Sample markers (comma-separated hex, e.g. c200,c300). Default: c200,c300,c400.
    #[arg(long, value_delimiter = ',', value_parser = parse_marker)]
    pub marker: Vec<Marker>,
    /// Divisor applied to raw sample values.
    #[arg(long, default_value_t = 100.0, value_parser = parse_divisor)]
    pub divisor: f64,
}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Show build details and decoding defaults.
    #[arg(long)]
    pub extended: bool,
}

fn parse_byte(input: &str) -> Result<u8, String> {
    let digits = input
        .trim()
        .trim_start_matches("0x")
        .trim_start_matches("0X");
    if digits.is_empty() {
        return Err(format!("expected a hex byte, got {input:?}"));
    }
    let padded = format!("{digits:0>2}");
    let mut byte = [0u8; 1];
    hex::decode_to_slice(&padded, &mut byte)
        .map_err(|err| format!("expected a hex byte, got {input:?}: {err}"))?;
    Ok(byte[0])
}

fn parse_marker(input: &str) -> Result<Marker, String> {
    Marker::from_hex(input).ok_or_else(|| format!("expected four hex digits, got {input:?}"))
}

fn parse_divisor(input: &str) -> Result<f64, String> {
    let value: f64 = input
        .trim()
        .parse()
        .map_err(|_| format!("invalid divisor: {input}"))?;
    if !value.is_finite() || value == 0.0 {
        return Err("divisor must be finite and non-zero".to_string());
    }
    Ok(value)
}
