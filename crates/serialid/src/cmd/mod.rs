use std::num::NonZeroU8;
use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Subcommand, ValueEnum};
use serialid_session::{ReplySequence, DEFAULT_CHUNK_SIZE};
use serialid_transport::DEFAULT_BAUD_RATE;

use crate::exit::{CliError, CliResult, USAGE};
use crate::output::OutputFormat;

pub mod identify;
pub mod ports;
pub mod version;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Read the identification record from a device.
    Identify(IdentifyArgs),
    /// List serial ports.
    Ports(PortsArgs),
    /// Show version information.
    Version(VersionArgs),
}

pub fn run(command: Command, format: OutputFormat) -> CliResult<i32> {
    match command {
        Command::Identify(args) => identify::run(args, format),
        Command::Ports(args) => ports::run(args, format),
        Command::Version(args) => version::run(args),
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum ReplySequenceArg {
    /// Replies carry the request's sequence id.
    Same,
    /// Replies carry the id after the request's.
    Next,
}

impl From<ReplySequenceArg> for ReplySequence {
    fn from(arg: ReplySequenceArg) -> Self {
        match arg {
            ReplySequenceArg::Same => ReplySequence::SameAsRequest,
            ReplySequenceArg::Next => ReplySequence::Next,
        }
    }
}

#[derive(Args, Debug)]
pub struct IdentifyArgs {
    /// Serial device path (e.g. /dev/ttyACM0).
    #[arg(env = "SERIALID_PORT")]
    pub port: PathBuf,
    /// Line speed in baud.
    #[arg(long, env = "SERIALID_BAUD", default_value_t = DEFAULT_BAUD_RATE)]
    pub baud: u32,
    /// Per-read timeout (e.g. 1s, 500ms).
    #[arg(long, env = "SERIALID_TIMEOUT", default_value = "1s")]
    pub timeout: String,
    /// Bytes requested per page.
    #[arg(long, default_value_t = DEFAULT_CHUNK_SIZE)]
    pub chunk_size: NonZeroU8,
    /// Sequence id the device uses in its replies.
    #[arg(long, value_enum, default_value = "same")]
    pub reply_sequence: ReplySequenceArg,
    /// Also write the raw compressed image to FILE.
    #[arg(long, value_name = "FILE")]
    pub dump_image: Option<PathBuf>,
}

#[derive(Args, Debug, Default)]
pub struct PortsArgs {}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Show extended build provenance.
    #[arg(long)]
    pub extended: bool,
}

pub fn parse_duration(input: &str) -> CliResult<Duration> {
    let input = input.trim();
    if input.is_empty() {
        return Err(CliError::new(USAGE, "duration must not be empty"));
    }

    let (number, unit) = if let Some(num) = input.strip_suffix("ms") {
        (num, "ms")
    } else if let Some(num) = input.strip_suffix('s') {
        (num, "s")
    } else {
        (input, "s")
    };

    let value: u64 = number
        .parse()
        .map_err(|_| CliError::new(USAGE, format!("invalid duration value: {input}")))?;

    if value == 0 {
        return Err(CliError::new(USAGE, "duration must be greater than zero"));
    }

    match unit {
        "ms" => Ok(Duration::from_millis(value)),
        _ => Ok(Duration::from_secs(value)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_duration_seconds() {
        assert_eq!(parse_duration("5s").unwrap(), Duration::from_secs(5));
        assert_eq!(parse_duration("2").unwrap(), Duration::from_secs(2));
    }

    #[test]
    fn parse_duration_millis() {
        assert_eq!(parse_duration("150ms").unwrap(), Duration::from_millis(150));
    }

    #[test]
    fn parse_duration_invalid() {
        assert_eq!(parse_duration("0s").unwrap_err().code, USAGE);
        assert_eq!(parse_duration("bad").unwrap_err().code, USAGE);
        assert_eq!(parse_duration("  ").unwrap_err().code, USAGE);
    }

    #[test]
    fn reply_sequence_arg_maps() {
        assert_eq!(
            ReplySequence::from(ReplySequenceArg::Same),
            ReplySequence::SameAsRequest
        );
        assert_eq!(
            ReplySequence::from(ReplySequenceArg::Next),
            ReplySequence::Next
        );
    }
}
