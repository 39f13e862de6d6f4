//! Version command

use std::process::ExitCode;

use anyhow::Result;

use crate::app::AppContext;
use crate::output::Renderer;

/// Run the version command.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn run(app: &AppContext) -> Result<ExitCode> {
    let version = env!("CARGO_PKG_VERSION");
    match app.renderer() {
        Renderer::Human(r) => r.render_version(version),
        Renderer::Json(r) => r.render(&serde_json::json!({ "version": version }))?,
    }
    Ok(ExitCode::SUCCESS)
}
