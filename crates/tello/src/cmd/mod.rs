use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Subcommand};
use tello::client::{CancellationToken, ClientConfig};
use tello::transport::TransportConfig;

use crate::exit::{CliError, CliResult, USAGE};
use crate::output::OutputFormat;

pub mod hop;
pub mod mission_pad;
pub mod record;
pub mod status;
pub mod version;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Enter SDK mode and report battery and height above ground.
    Status(StatusArgs),
    /// Enable mission pad detection and report the pad in view.
    MissionPad(MissionPadArgs),
    /// Take off and land again.
    Hop(HopArgs),
    /// Record the raw video stream to a file.
    Record(RecordArgs),
    /// Show version information.
    Version(VersionArgs),
}

/// Settings shared by every command that talks to a drone.
pub struct Context {
    pub client: ClientConfig,
    pub format: OutputFormat,
    /// Cancelled on Ctrl-C.
    pub interrupt: CancellationToken,
}

pub fn run(command: Command, ctx: Context) -> CliResult<i32> {
    match command {
        Command::Status(args) => status::run(args, &ctx),
        Command::MissionPad(args) => mission_pad::run(args, &ctx),
        Command::Hop(args) => hop::run(args, &ctx),
        Command::Record(args) => record::run(args, &ctx),
        Command::Version(args) => version::run(args),
    }
}

#[derive(Args, Debug, Default)]
pub struct StatusArgs {}

#[derive(Args, Debug, Default)]
pub struct MissionPadArgs {}

#[derive(Args, Debug, Default)]
pub struct HopArgs {}

#[derive(Args, Debug)]
pub struct RecordArgs {
    /// File the encoded stream is written to.
    pub file: PathBuf,
    /// Recording length in seconds.
    #[arg(long, default_value = "5")]
    pub seconds: u64,
    /// Local address for the video socket.
    #[arg(long, value_name = "ADDR", default_value = "0.0.0.0:11111")]
    pub video: SocketAddr,
}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Show extended build provenance.
    #[arg(long)]
    pub extended: bool,
}

pub fn client_config(
    drone: SocketAddr,
    local: SocketAddr,
    timeout: &str,
) -> CliResult<ClientConfig> {
    Ok(ClientConfig {
        transport: TransportConfig {
            local_addr: local,
            drone_addr: drone,
            recv_timeout: parse_timeout(timeout)?,
            ..TransportConfig::default()
        },
        ..ClientConfig::default()
    })
}

pub fn parse_timeout(input: &str) -> CliResult<Duration> {
    let input = input.trim();
    if input.is_empty() {
        return Err(CliError::new(USAGE, "timeout must not be empty"));
    }

    let (number, millis) = if let Some(num) = input.strip_suffix("ms") {
        (num, true)
    } else if let Some(num) = input.strip_suffix('s') {
        (num, false)
    } else {
        (input, false)
    };

    let value: u64 = number
        .parse()
        .map_err(|_| CliError::new(USAGE, format!("invalid timeout value: {input}")))?;

    if value == 0 {
        return Err(CliError::new(USAGE, "timeout must be greater than zero"));
    }

    Ok(if millis {
        Duration::from_millis(value)
    } else {
        Duration::from_secs(value)
    })
}
