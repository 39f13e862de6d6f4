//! Provisioning step types: checks, actions, outcomes and the run report.
//!
//! Pure data only. Evaluating a check or performing an action happens in
//! `crate::application::services::step_exec` through port traits.

use std::path::PathBuf;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Environment prefix applied to every package-manager invocation.
pub const APT_FRONTEND_ENV: &str = "DEBIAN_FRONTEND=noninteractive";

// ── Step definition ───────────────────────────────────────────────────────────

/// One unit of host configuration.
///
/// A step is skipped when its `check` already holds; otherwise its `actions`
/// run in order and the first error fails the step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    /// Kebab-case identifier, unique within a plan.
    pub name: String,
    /// One-line human description shown by `pisetup steps`.
    pub description: String,
    /// Idempotency predicate.
    pub check: Check,
    /// Side effects performed when `check` does not hold.
    pub actions: Vec<Action>,
}

impl Step {
    #[must_use]
    pub fn new(name: &str, description: &str, check: Check, actions: Vec<Action>) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            check,
            actions,
        }
    }
}

/// Idempotency predicate for a step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Check {
    /// The program resolves on `PATH`.
    ToolOnPath(String),
    /// The path exists (file or directory).
    PathExists(PathBuf),
    /// Every package is reported as `install ok installed` by `dpkg-query`.
    PackagesInstalled(Vec<String>),
    /// Every line is present in the file.
    FileContainsLines { path: PathBuf, lines: Vec<String> },
    /// The file exists and was modified less than `max_age` ago.
    FreshWithin { path: PathBuf, max_age: Duration },
    /// The user's passwd entry names `shell` as login shell.
    LoginShell { user: String, shell: String },
    /// Any inner check holds.
    AnyOf(Vec<Check>),
}

/// Side-effecting procedure performed by a step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    RefreshPackageIndex,
    UpgradePackages,
    InstallPackages(Vec<String>),
    /// Fetch a shell script over HTTPS and pipe it to `sh -s -- args`.
    RunInstaller {
        url: String,
        args: Vec<String>,
        elevate: bool,
    },
    /// Append each line unless already present.
    AppendLines { path: PathBuf, lines: Vec<String> },
    /// Replace the file contents.
    WriteFile { path: PathBuf, contents: String },
    Exec {
        program: String,
        args: Vec<String>,
        elevate: bool,
    },
}

impl Action {
    /// Short label for progress output.
    #[must_use]
    pub fn label(&self) -> String {
        match self {
            Self::RefreshPackageIndex => "refreshing package index".to_string(),
            Self::UpgradePackages => "upgrading installed packages".to_string(),
            Self::InstallPackages(pkgs) => format!("installing {}", pkgs.join(" ")),
            Self::RunInstaller { url, .. } => format!("running installer from {url}"),
            Self::AppendLines { path, .. } => format!("updating {}", path.display()),
            Self::WriteFile { path, .. } => format!("writing {}", path.display()),
            Self::Exec { program, args, .. } => format!("{program} {}", args.join(" ")),
        }
    }
    /// Whether the action runs with root privileges.
    #[must_use]
    pub fn is_elevated(&self) -> bool {
        match self {
            Self::RefreshPackageIndex | Self::UpgradePackages | Self::InstallPackages(_) => true,
            Self::RunInstaller { elevate, .. } | Self::Exec { elevate, .. } => *elevate,
            Self::AppendLines { .. } | Self::WriteFile { .. } => false,
        }
    }
}

// ── Command lines ─────────────────────────────────────────────────────────────

/// Effective privilege of the provisioning process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Privilege {
    /// Running as uid 0; commands run directly.
    Root,
    /// Running as a regular user; elevated commands are prefixed with `sudo`.
    Sudo,
}

impl Privilege {
    /// Derive the privilege from the output of `id -u`.
    #[must_use]
    pub fn from_uid(uid: &str) -> Self {
        if uid.trim() == "0" { Self::Root } else { Self::Sudo }
    }
}

/// A fully resolved external command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine {
    pub program: String,
    pub args: Vec<String>,
}

impl CommandLine {
    #[must_use]
    pub fn new(program: &str, args: &[&str]) -> Self {
        Self {
            program: program.to_string(),
            args: args.iter().map(ToString::to_string).collect(),
        }
    }

    /// Prefix the command with `sudo` when `elevate` is set and the process
    /// is not already root.
    #[must_use]
    pub fn elevated(self, elevate: bool, privilege: Privilege) -> Self {
        if !elevate || privilege == Privilege::Root {
            return self;
        }
        let mut args = Vec::with_capacity(self.args.len() + 1);
        args.push(self.program);
        args.extend(self.args);
        Self {
            program: "sudo".to_string(),
            args,
        }
    }

    /// Borrow the arguments as `&str` for `CommandRunner` calls.
    #[must_use]
    pub fn arg_refs(&self) -> Vec<&str> {
        self.args.iter().map(String::as_str).collect()
    }
}

impl std::fmt::Display for CommandLine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.program)?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

/// Build the `apt-get` invocation for a package-manager action.
///
/// `env` is used instead of a process environment so the variable survives
/// `sudo`'s environment reset.
#[must_use]
pub fn apt_command(apt_args: &[&str], privilege: Privilege) -> CommandLine {
    let mut args = vec![APT_FRONTEND_ENV, "apt-get"];
    args.extend_from_slice(apt_args);
    CommandLine::new("env", &args).elevated(true, privilege)
}

/// `apt-get` arguments for a package-manager action, or `None` if the action
/// does not use the package manager.
#[must_use]
pub fn apt_args(action: &Action) -> Option<Vec<String>> {
    let args = match action {
        Action::RefreshPackageIndex => vec!["update".to_string()],
        Action::UpgradePackages => vec!["upgrade".to_string(), "-y".to_string()],
        Action::InstallPackages(pkgs) => {
            let mut args = vec![
                "install".to_string(),
                "-y".to_string(),
                "--no-install-recommends".to_string(),
            ];
            args.extend(pkgs.iter().cloned());
            args
        }
        _ => return None,
    };
    Some(args)
}

// ── Outcomes ──────────────────────────────────────────────────────────────────

/// Result of evaluating a check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Satisfaction {
    Satisfied,
    NeedsAction,
}

impl Satisfaction {
    #[must_use]
    pub fn from_bool(holds: bool) -> Self {
        if holds { Self::Satisfied } else { Self::NeedsAction }
    }

    #[must_use]
    pub fn is_satisfied(self) -> bool {
        self == Self::Satisfied
    }
}

/// What happened to a step during a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "kebab-case")]
pub enum StepOutcome {
    /// The check held; nothing was done.
    Skipped,
    /// Every action succeeded.
    Completed,
    /// The check or an action failed.
    Failed { reason: String },
}

impl StepOutcome {
    #[must_use]
    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }
}

/// Whether a failed step halts the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FailurePolicy {
    /// Stop at the first failed step.
    #[default]
    FailFast,
    /// Record the failure and continue with the next step.
    KeepGoing,
}

impl std::fmt::Display for FailurePolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::FailFast => f.write_str("fail-fast"),
            Self::KeepGoing => f.write_str("keep-going"),
        }
    }
}

/// One entry of the run report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepRecord {
    pub name: String,
    #[serde(flatten)]
    pub outcome: StepOutcome,
    pub elapsed_ms: u64,
}

/// Ordered record of one provisioning pass.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub policy: FailurePolicy,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    pub steps: Vec<StepRecord>,
}

impl RunReport {
    #[must_use]
    pub fn new(policy: FailurePolicy, started_at: DateTime<Utc>) -> Self {
        Self {
            policy,
            started_at,
            finished_at: None,
            steps: Vec::new(),
        }
    }

    /// Names of failed steps, in run order.
    #[must_use]
    pub fn failed_steps(&self) -> Vec<String> {
        self.steps
            .iter()
            .filter(|r| r.outcome.is_failed())
            .map(|r| r.name.clone())
            .collect()
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        !self.steps.iter().any(|r| r.outcome.is_failed())
    }

    /// Counts of `(skipped, completed, failed)` records.
    #[must_use]
    pub fn tally(&self) -> (usize, usize, usize) {
        self.steps
            .iter()
            .fold((0, 0, 0), |(s, c, f), r| match r.outcome {
                StepOutcome::Skipped => (s + 1, c, f),
                StepOutcome::Completed => (s, c + 1, f),
                StepOutcome::Failed { .. } => (s, c, f + 1),
            })
    }
}

// ── Plan ──────────────────────────────────────────────────────────────────────

/// Result of evaluating one check without acting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "kebab-case")]
pub enum PlanStatus {
    Satisfied,
    NeedsAction,
    Unknown { reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlanEntry {
    pub name: String,
    #[serde(flatten)]
    pub status: PlanStatus,
}
