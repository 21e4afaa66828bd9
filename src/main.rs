//! Binary entry point for the `piwait` CLI.

use std::io::{self, Write};
use std::process;
use std::time::Duration;

use clap::Parser;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::warn;

use piwait::{HttpPowerClient, PowerConfig, PowerWaits, WaitError, logging};

mod cli;
mod operation;

use cli::{Cli, Command, WaitCommand};
use operation::{DEFAULT_MEMBER_TIMEOUT, Operation, OperationError};

/// Exit code reported when a wait runs out of time.
const EXIT_TIMEOUT: i32 = 2;

#[derive(Debug, Error)]
enum CliError {
    #[error("invalid arguments: {0}")]
    Arguments(#[from] OperationError),
    #[error("configuration error: {0}")]
    Config(String),
    #[error("client error: {0}")]
    Client(String),
    #[error("{0}")]
    Wait(#[from] WaitError),
}

impl CliError {
    const fn exit_code(&self) -> i32 {
        match self {
            Self::Wait(WaitError::Timeout { .. }) => EXIT_TIMEOUT,
            _ => 1,
        }
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    logging::init(cli.log.as_deref()).ok();
    let exit_code = match dispatch(cli).await {
        Ok(()) => 0,
        Err(err) => {
            report_error(&err);
            err.exit_code()
        }
    };

    process::exit(exit_code);
}

async fn dispatch(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Command::Wait(args) => wait_command(args).await,
    }
}

async fn wait_command(args: WaitCommand) -> Result<(), CliError> {
    let operation = Operation::from_args(&args)?;
    let config =
        PowerConfig::load_without_cli_args().map_err(|err| CliError::Config(err.to_string()))?;
    config
        .validate()
        .map_err(|err| CliError::Config(err.to_string()))?;
    let client = HttpPowerClient::new(&config).map_err(|err| CliError::Client(err.to_string()))?;

    let timeout = resolve_timeout(args.timeout, config.timeout());
    let token = CancellationToken::new();
    cancel_on_interrupt(token.clone());

    let waits = PowerWaits::new(client, config.cloud_instance_id.trim())
        .with_cancellation(token)
        .with_poll_interval(config.poll_interval())
        .with_timeout(timeout);
    let status = operation
        .run(&waits, timeout.unwrap_or(DEFAULT_MEMBER_TIMEOUT))
        .await?;

    writeln!(io::stdout(), "{operation} {status}").ok();
    Ok(())
}

/// The `--timeout` flag wins over the configured override.
fn resolve_timeout(flag_secs: Option<u64>, configured: Option<Duration>) -> Option<Duration> {
    flag_secs
        .filter(|secs| *secs > 0)
        .map(Duration::from_secs)
        .or(configured)
}

fn cancel_on_interrupt(token: CancellationToken) {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("interrupt received, cancelling wait");
            token.cancel();
        }
    });
}

fn report_error(err: &CliError) {
    write_error(io::stderr(), err);
}

fn write_error(mut target: impl Write, err: &CliError) {
    writeln!(target, "{err}").ok();
}

#[cfg(test)]
#[path = "main_tests.rs"]
mod tests;
