//! `pisetup steps`: list the catalog in execution order.

use std::process::ExitCode;

use anyhow::Result;
use serde::Serialize;

use crate::app::AppContext;
use crate::application::services::config_service;
use crate::domain::{Identity, default_steps};
use crate::output::Renderer;

#[derive(Serialize)]
struct StepSummary<'a> {
    name: &'a str,
    description: &'a str,
}

/// Run the steps command.
///
/// Steps excluded by the `skip` setting are not listed.
///
/// # Errors
///
/// Returns an error if the configuration is invalid.
pub fn run(app: &AppContext) -> Result<ExitCode> {
    let config = config_service::load_config(&app.config_store)?;
    // Only names and descriptions are shown, which do not depend on the user.
    let identity = Identity {
        user: String::new(),
        home: dirs::home_dir().unwrap_or_default(),
    };
    let steps = default_steps(&config, &identity);

    match app.renderer() {
        Renderer::Human(r) => r.render_steps(&steps),
        Renderer::Json(r) => {
            let summary: Vec<StepSummary<'_>> = steps
                .iter()
                .map(|s| StepSummary {
                    name: &s.name,
                    description: &s.description,
                })
                .collect();
            r.render(&summary)?;
        }
    }
    Ok(ExitCode::SUCCESS)
}
