//! `pisetup run`: gate on the host, then bring it to the provisioned state.

use std::process::ExitCode;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Args;

use crate::app::AppContext;
use crate::application::ports::ProgressReporter;
use crate::application::services::config_service;
use crate::application::services::provision::provision;
use crate::application::services::step_exec::Ports;
use crate::domain::{FailurePolicy, ProvisionConfig, ProvisionError, RunReport, default_steps};
use crate::infra::command_runner::TokioCommandRunner;
use crate::infra::fetch::UreqFetcher;
use crate::infra::fs::StdFs;
use crate::infra::host::DeviceTreeProbe;
use crate::infra::locator::PathLocator;
use crate::output::{Renderer, SilentReporter, TerminalReporter};

/// Arguments for the run command.
#[derive(Args, Default)]
pub struct RunArgs {
    /// Run every step even after one fails
    #[arg(long)]
    pub keep_going: bool,
}

/// Entry point for `pisetup run`.
///
/// # Errors
///
/// Returns `ProvisionError::HostDeclined` when the operator declines,
/// `ProvisionError::RunFailed` when any step failed, or a configuration or
/// identity detection error.
pub async fn run(app: &AppContext, args: &RunArgs) -> Result<ExitCode> {
    let config = config_service::load_config(&app.config_store)?;
    let policy = if args.keep_going {
        FailurePolicy::KeepGoing
    } else {
        config.policy
    };

    let report = if app.is_json() {
        execute(app, &config, policy, &SilentReporter).await?
    } else {
        app.output.header("Provisioning this host");
        execute(app, &config, policy, &TerminalReporter::new(&app.output)).await?
    };

    match app.renderer() {
        Renderer::Human(r) => r.render_report(&report),
        Renderer::Json(r) => r.render(&report)?,
    }

    if report.is_success() {
        Ok(ExitCode::SUCCESS)
    } else {
        Err(ProvisionError::RunFailed {
            failed: report.failed_steps(),
        }
        .into())
    }
}

async fn execute(
    app: &AppContext,
    config: &ProvisionConfig,
    policy: FailurePolicy,
    reporter: &impl ProgressReporter,
) -> Result<RunReport> {
    let home = dirs::home_dir().context("cannot determine home directory")?;
    let runner = TokioCommandRunner::new(Duration::from_secs(config.command_timeout_secs));
    let fetcher = UreqFetcher::new(Duration::from_secs(config.fetch_timeout_secs));
    let ports = Ports {
        runner: &runner,
        fs: &StdFs,
        locator: &PathLocator,
        fetcher: &fetcher,
    };
    let probe = DeviceTreeProbe::from_env();

    provision(
        &ports,
        (&probe, &app.prompter),
        home,
        |identity| default_steps(config, identity),
        policy,
        reporter,
    )
    .await
}
