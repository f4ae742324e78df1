mod cmd;
mod exit;
mod logging;
mod output;

use std::net::SocketAddr;

use clap::Parser;
use tello::client::CancellationToken;

use crate::cmd::{Command, Context};
use crate::exit::{CliError, CliResult, INTERNAL};
use crate::logging::{init_logging, LogFormat, LogLevel};
use crate::output::OutputFormat;

#[derive(Parser, Debug)]
#[command(name = "tello", version, about = "Tello drone command-line client")]
struct Cli {
    /// Drone command address.
    #[arg(
        long,
        value_name = "ADDR",
        env = "TELLO_DRONE_ADDR",
        default_value = "192.168.10.1:8889",
        global = true
    )]
    drone: SocketAddr,

    /// Local address for the command socket.
    #[arg(
        long,
        value_name = "ADDR",
        env = "TELLO_LOCAL_ADDR",
        default_value = "0.0.0.0:9000",
        global = true
    )]
    local: SocketAddr,

    /// Reply timeout per command (e.g. 7s, 500ms).
    #[arg(long, env = "TELLO_TIMEOUT", default_value = "7s", global = true)]
    timeout: String,

    /// Output format.
    #[arg(long, value_name = "FORMAT", global = true)]
    format: Option<OutputFormat>,

    /// Log output format (stderr).
    #[arg(long, value_name = "FORMAT", default_value = "text", global = true)]
    log_format: LogFormat,

    /// Minimum log level (stderr).
    #[arg(long, value_name = "LEVEL", default_value = "info", global = true)]
    log_level: LogLevel,

    #[command(subcommand)]
    command: Command,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.log_format, cli.log_level);

    match run(cli) {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(err.code);
        }
    }
}

fn run(cli: Cli) -> CliResult<i32> {
    let client = cmd::client_config(cli.drone, cli.local, &cli.timeout)?;
    let interrupt = CancellationToken::new();
    install_ctrlc_handler(interrupt.clone())?;

    let ctx = Context {
        client,
        format: cli.format.unwrap_or_else(OutputFormat::default_for_stdout),
        interrupt,
    };
    cmd::run(cli.command, ctx)
}

fn install_ctrlc_handler(interrupt: CancellationToken) -> CliResult<()> {
    ctrlc::set_handler(move || interrupt.cancel())
        .map_err(|err| CliError::new(INTERNAL, format!("signal handler setup failed: {err}")))
}
