//! `pisetup plan`: evaluate every check and report what a run would do.

use std::process::ExitCode;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::app::AppContext;
use crate::application::services::step_exec::Ports;
use crate::application::services::{config_service, identity, plan};
use crate::domain::default_steps;
use crate::infra::command_runner::TokioCommandRunner;
use crate::infra::fetch::UreqFetcher;
use crate::infra::fs::StdFs;
use crate::infra::locator::PathLocator;
use crate::output::Renderer;

/// Run the plan command. Never changes the host.
///
/// # Errors
///
/// Returns an error if the configuration is invalid or the current user
/// cannot be determined.
pub async fn run(app: &AppContext) -> Result<ExitCode> {
    let config = config_service::load_config(&app.config_store)?;
    let home = dirs::home_dir().context("cannot determine home directory")?;
    let runner = TokioCommandRunner::new(Duration::from_secs(config.command_timeout_secs));
    let fetcher = UreqFetcher::new(Duration::from_secs(config.fetch_timeout_secs));
    let ports = Ports {
        runner: &runner,
        fs: &StdFs,
        locator: &PathLocator,
        fetcher: &fetcher,
    };

    let (identity, privilege) = identity::detect(&runner, home).await?;
    let steps = default_steps(&config, &identity);
    let entries = plan::plan_steps(&ports.with_privilege(privilege), &steps).await;

    match app.renderer() {
        Renderer::Human(r) => r.render_plan(&entries),
        Renderer::Json(r) => r.render(&entries)?,
    }
    Ok(ExitCode::SUCCESS)
}
