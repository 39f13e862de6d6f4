//! Typed domain error enums.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `tokio`, `std::fs`, `std::process`, or `std::net`.
//! All error types implement `thiserror::Error` and convert to `anyhow::Error`
//! via the `?` operator.

use thiserror::Error;

// ── Provisioning errors ───────────────────────────────────────────────────────

/// Errors raised while provisioning the host.
#[derive(Debug, Error)]
pub enum ProvisionError {
    #[error("{program} exited with {}{}", exit_code_display(*code), stderr_suffix(stderr))]
    CommandFailed {
        program: String,
        code: Option<i32>,
        stderr: String,
    },

    #[error("{program} timed out after {secs}s")]
    CommandTimedOut { program: String, secs: u64 },

    #[error("cannot fetch {url}: {reason}")]
    FetchFailed { url: String, reason: String },

    #[error("This host ({model}) is not a Raspberry Pi. Provisioning declined.")]
    HostDeclined { model: String },

    #[error("Provisioning failed at: {}. Fix the cause and re-run; completed steps will be skipped.", failed.join(", "))]
    RunFailed { failed: Vec<String> },
}

impl ProvisionError {
    /// Stable machine-readable code used in `--json` error output.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::CommandFailed { .. } => "command_failed",
            Self::CommandTimedOut { .. } => "command_timed_out",
            Self::FetchFailed { .. } => "fetch_failed",
            Self::HostDeclined { .. } => "host_declined",
            Self::RunFailed { .. } => "run_failed",
        }
    }
}

fn exit_code_display(code: Option<i32>) -> String {
    code.map_or_else(|| "a signal".to_string(), |c| format!("status {c}"))
}

fn stderr_suffix(stderr: &str) -> String {
    let trimmed = stderr.trim();
    if trimmed.is_empty() {
        String::new()
    } else {
        format!(":\n{trimmed}")
    }
}

// ── Config errors ─────────────────────────────────────────────────────────────

/// Errors related to configuration validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Unknown step in skip list: {name}\n\nValid steps: {valid}")]
    UnknownStep { name: String, valid: String },

    #[error("Invalid package name: {0}")]
    InvalidPackage(String),

    #[error("{key} must be greater than zero")]
    ZeroValue { key: &'static str },

    #[error("shell_profile must not be empty")]
    EmptyShellProfile,

    #[error("profile_lines entries must be a single non-blank line: {0:?}")]
    InvalidProfileLine(String),
}
