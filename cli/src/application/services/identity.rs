//! Application service: who are we provisioning for.

use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::application::ports::CommandRunner;
use crate::application::services::step_exec::{PROBE_TIMEOUT, ensure_success};
use crate::domain::{Identity, Privilege};

/// Detect the effective privilege (`id -u`) and login name (`id -un`).
///
/// # Errors
///
/// Returns an error if `id` cannot be run or exits non-zero.
pub async fn detect(runner: &impl CommandRunner, home: PathBuf) -> Result<(Identity, Privilege)> {
    let uid = runner
        .run_with_timeout("id", &["-u"], PROBE_TIMEOUT)
        .await
        .context("running id -u")?;
    let uid = ensure_success("id -u", uid)?;
    let privilege = Privilege::from_uid(&String::from_utf8_lossy(&uid.stdout));

    let user = runner
        .run_with_timeout("id", &["-un"], PROBE_TIMEOUT)
        .await
        .context("running id -un")?;
    let user = ensure_success("id -un", user)?;
    let user = String::from_utf8_lossy(&user.stdout).trim().to_string();
    anyhow::ensure!(!user.is_empty(), "id -un printed no user name");

    tracing::debug!(%user, ?privilege, home = %home.display(), "detected identity");
    Ok((Identity { user, home }, privilege))
}
