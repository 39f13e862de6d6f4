//! pisetup - idempotent Raspberry Pi provisioning

#![cfg_attr(test, allow(clippy::expect_used))]

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use pisetup_cli::cli::Cli;
use pisetup_cli::domain::ProvisionError;
use pisetup_cli::output::json::format_error;

/// Exit status when the operator declines to provision a non-Pi host.
const EXIT_DECLINED: u8 = 1;
/// Exit status for every other failure.
const EXIT_FAILURE: u8 = 2;

/// Logs go to stderr so they never mix with `--json` output on stdout.
fn init_tracing(verbose: u8) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(match verbose {
            0 => "warn",
            1 => "info",
            _ => "debug",
        })
    });
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let json = cli.json;

    match cli.run().await {
        Ok(code) => code,
        Err(e) => {
            let provision_err = e.downcast_ref::<ProvisionError>();
            if json {
                let code = provision_err.map_or("error", ProvisionError::code);
                match format_error(&format!("{e:#}"), code) {
                    Ok(text) => eprintln!("{text}"),
                    Err(_) => eprintln!("Error: {e:#}"),
                }
            } else {
                eprintln!("Error: {e:#}");
            }
            if matches!(provision_err, Some(ProvisionError::HostDeclined { .. })) {
                ExitCode::from(EXIT_DECLINED)
            } else {
                ExitCode::from(EXIT_FAILURE)
            }
        }
    }
}
