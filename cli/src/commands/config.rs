//! `pisetup config`: inspect and initialise the configuration file.

use std::process::ExitCode;

use anyhow::Result;
use clap::Subcommand;

use crate::app::AppContext;
use crate::application::ports::ConfigStore;
use crate::application::services::config_service;
use crate::output::Renderer;

/// Config subcommands.
#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Show the effective configuration
    Show,
    /// Print the configuration file path
    Path,
    /// Write a default configuration file if none exists
    Init,
}

/// Run the config command.
///
/// # Errors
///
/// Returns an error if the configuration cannot be read, validated, or written.
pub fn run(app: &AppContext, cmd: ConfigCommand) -> Result<ExitCode> {
    match cmd {
        ConfigCommand::Show => show_config(app),
        ConfigCommand::Path => show_path(app),
        ConfigCommand::Init => init_config(app),
    }
}

fn show_config(app: &AppContext) -> Result<ExitCode> {
    let config = config_service::load_config(&app.config_store)?;
    let path = app.config_store.path()?;
    match app.renderer() {
        Renderer::Human(r) => r.render_config(&config, &path),
        Renderer::Json(r) => r.render(&config)?,
    }
    Ok(ExitCode::SUCCESS)
}

fn show_path(app: &AppContext) -> Result<ExitCode> {
    let path = app.config_store.path()?;
    match app.renderer() {
        Renderer::Human(_) => println!("{}", path.display()),
        Renderer::Json(r) => r.render(&serde_json::json!({ "path": path }))?,
    }
    Ok(ExitCode::SUCCESS)
}

fn init_config(app: &AppContext) -> Result<ExitCode> {
    let path = app.config_store.path()?;
    let created = config_service::init_config(&app.config_store)?;
    match app.renderer() {
        Renderer::Human(_) if created => {
            app.output.done(&format!("Wrote {}", path.display()));
        }
        Renderer::Human(_) => {
            app.output
                .info(&format!("{} already exists; left unchanged", path.display()));
        }
        Renderer::Json(r) => r.render(&serde_json::json!({
            "path": path,
            "created": created,
        }))?,
    }
    Ok(ExitCode::SUCCESS)
}
