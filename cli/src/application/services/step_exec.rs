//! Evaluate checks and perform actions through the injected ports.
//!
//! Imports only from `crate::domain` and `crate::application`.

use std::process::Output;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use anyhow::{Context, Result};

use crate::application::ports::{CommandRunner, LocalFs, ScriptFetcher, ToolLocator};
use crate::application::services::dotfile;
use crate::domain::host::{DPKG_QUERY_FORMAT, login_shell, missing_packages, shell_matches};
use crate::domain::ProvisionError;
use crate::domain::step::{
    Action, Check, CommandLine, Privilege, Satisfaction, apt_args, apt_command,
};

/// Timeout for read-only probes (`dpkg-query`, `getent`, `id`).
pub const PROBE_TIMEOUT: Duration = Duration::from_secs(30);

/// The ports a provisioning run needs, before privilege is known.
pub struct Ports<'a, R, F, L, S> {
    pub runner: &'a R,
    pub fs: &'a F,
    pub locator: &'a L,
    pub fetcher: &'a S,
}

impl<'a, R, F, L, S> Ports<'a, R, F, L, S> {
    /// Attach the detected privilege, yielding what steps execute against.
    #[must_use]
    pub fn with_privilege(&self, privilege: Privilege) -> Capabilities<'a, R, F, L, S> {
        Capabilities {
            runner: self.runner,
            fs: self.fs,
            locator: self.locator,
            fetcher: self.fetcher,
            privilege,
            sudo_ready: AtomicBool::new(false),
        }
    }
}

/// The capabilities a step may use, bundled so services take one argument.
pub struct Capabilities<'a, R, F, L, S> {
    pub runner: &'a R,
    pub fs: &'a F,
    pub locator: &'a L,
    pub fetcher: &'a S,
    pub privilege: Privilege,
    sudo_ready: AtomicBool,
}

impl<R, F, L, S> Capabilities<'_, R, F, L, S>
where
    R: CommandRunner,
    F: LocalFs,
    L: ToolLocator,
    S: ScriptFetcher,
{
    /// Evaluate an idempotency check.
    ///
    /// # Errors
    ///
    /// Returns an error if a probe cannot be run (e.g. `dpkg-query` missing).
    pub async fn evaluate(&self, check: &Check) -> Result<Satisfaction> {
        let holds = match check {
            Check::ToolOnPath(program) => self.locator.is_installed(program),
            Check::PathExists(path) => self.fs.exists(path),
            Check::PackagesInstalled(pkgs) => self.packages_installed(pkgs).await?,
            Check::FileContainsLines { path, lines } => {
                let content = self.fs.read_optional(path)?.unwrap_or_default();
                crate::domain::dotfile::missing_lines(&content, lines).is_empty()
            }
            Check::FreshWithin { path, max_age } => {
                self.fs.age(path)?.is_some_and(|age| age < *max_age)
            }
            Check::LoginShell { user, shell } => self.login_shell_is(user, shell).await?,
            Check::AnyOf(checks) => {
                let mut any = false;
                for inner in checks {
                    if Box::pin(self.evaluate(inner)).await?.is_satisfied() {
                        any = true;
                        break;
                    }
                }
                any
            }
        };
        tracing::debug!(?check, holds, "evaluated check");
        Ok(Satisfaction::from_bool(holds))
    }

    /// Whether `action` goes through `sudo` under the detected privilege.
    #[must_use]
    pub fn needs_sudo(&self, action: &Action) -> bool {
        self.privilege == Privilege::Sudo && action.is_elevated()
    }

    /// Validate `sudo` credentials with `sudo -v` the first time an elevated
    /// action is about to run, so the password prompt reaches the terminal
    /// while no spinner is drawing.
    ///
    /// # Errors
    ///
    /// Returns `ProvisionError::CommandFailed` if `sudo` rejects the operator.
    pub async fn ensure_sudo(&self) -> Result<()> {
        if self.sudo_ready.load(Ordering::Relaxed) {
            return Ok(());
        }
        let output = self.runner.run("sudo", &["-v"]).await?;
        ensure_success("sudo -v", output)?;
        self.sudo_ready.store(true, Ordering::Relaxed);
        Ok(())
    }

    /// Perform a single action.
    ///
    /// # Errors
    ///
    /// Returns `ProvisionError::CommandFailed` for non-zero exits,
    /// `ProvisionError::FetchFailed` for installer downloads, or an I/O error.
    pub async fn perform(&self, action: &Action) -> Result<()> {
        tracing::debug!(action = %action.label(), "performing action");
        match action {
            Action::RefreshPackageIndex | Action::UpgradePackages | Action::InstallPackages(_) => {
                let args = apt_args(action).unwrap_or_default();
                let refs: Vec<&str> = args.iter().map(String::as_str).collect();
                self.exec(&apt_command(&refs, self.privilege)).await
            }
            Action::RunInstaller { url, args, elevate } => {
                let script = self.fetcher.fetch(url).await?;
                let mut sh_args = vec!["-s", "--"];
                sh_args.extend(args.iter().map(String::as_str));
                let cmd = CommandLine::new("sh", &sh_args).elevated(*elevate, self.privilege);
                let output = self
                    .runner
                    .run_with_stdin(&cmd.program, &cmd.arg_refs(), script.as_bytes())
                    .await?;
                ensure_success(&cmd.to_string(), output).map(drop)
            }
            Action::AppendLines { path, lines } => {
                dotfile::append_lines(self.fs, path, lines)?;
                Ok(())
            }
            Action::WriteFile { path, contents } => self.fs.write_atomic(path, contents),
            Action::Exec { program, args, elevate } => {
                let refs: Vec<&str> = args.iter().map(String::as_str).collect();
                let cmd = CommandLine::new(program, &refs).elevated(*elevate, self.privilege);
                self.exec(&cmd).await
            }
        }
    }

    async fn exec(&self, cmd: &CommandLine) -> Result<()> {
        let output = self.runner.run(&cmd.program, &cmd.arg_refs()).await?;
        ensure_success(&cmd.to_string(), output).map(drop)
    }

    async fn packages_installed(&self, pkgs: &[String]) -> Result<bool> {
        if pkgs.is_empty() {
            return Ok(true);
        }
        let format = format!("-f={DPKG_QUERY_FORMAT}");
        let mut args = vec!["-W", format.as_str()];
        args.extend(pkgs.iter().map(String::as_str));
        // dpkg-query exits 1 when any package is unknown; stdout still lists the rest.
        let output = self
            .runner
            .run_with_timeout("dpkg-query", &args, PROBE_TIMEOUT)
            .await
            .context("querying installed packages")?;
        let missing = missing_packages(pkgs, &String::from_utf8_lossy(&output.stdout));
        if !missing.is_empty() {
            tracing::debug!(?missing, "packages not installed");
        }
        Ok(missing.is_empty())
    }

    async fn login_shell_is(&self, user: &str, shell: &str) -> Result<bool> {
        let output = self
            .runner
            .run_with_timeout("getent", &["passwd", user], PROBE_TIMEOUT)
            .await
            .context("reading passwd entry")?;
        let output = ensure_success("getent", output)?;
        let entry = String::from_utf8_lossy(&output.stdout);
        Ok(login_shell(&entry).is_some_and(|current| shell_matches(current, shell)))
    }
}

/// Turn a non-zero exit into `ProvisionError::CommandFailed`, keeping the
/// tool's own error text.
///
/// # Errors
///
/// Returns `ProvisionError::CommandFailed` when `output.status` is not success.
pub fn ensure_success(program: &str, output: Output) -> Result<Output> {
    if output.status.success() {
        return Ok(output);
    }
    let stderr = if output.stderr.is_empty() {
        String::from_utf8_lossy(&output.stdout).into_owned()
    } else {
        String::from_utf8_lossy(&output.stderr).into_owned()
    };
    Err(ProvisionError::CommandFailed {
        program: program.to_string(),
        code: output.status.code(),
        stderr,
    }
    .into())
}
