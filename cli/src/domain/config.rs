//! Domain types and validators for pisetup configuration.
//!
//! Pure functions only: no I/O, no async, no filesystem access.

use std::sync::LazyLock;

use anyhow::Result;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::domain::error::ConfigError;
use crate::domain::step::FailurePolicy;

// ── Defaults ─────────────────────────────────────────────────────────────────

/// Utility packages installed by the `utilities` step.
pub const DEFAULT_PACKAGES: &[&str] = &[
    "git",
    "curl",
    "htop",
    "tmux",
    "tree",
    "jq",
    "ripgrep",
    "build-essential",
    "python3-pip",
    "python3-venv",
];

/// Lines the `shell-profile` step keeps in the shell profile.
pub const DEFAULT_PROFILE_LINES: &[&str] = &[
    "export EDITOR=nvim",
    "export PATH=\"$HOME/.cargo/bin:$HOME/.local/bin:$PATH\"",
    "alias vim=nvim",
];

/// Debian policy for binary package names.
static PACKAGE_NAME_RE: LazyLock<Result<Regex, regex::Error>> =
    LazyLock::new(|| Regex::new(r"^[a-z0-9][a-z0-9+.\-]+$"));

// ── Config schema ────────────────────────────────────────────────────────────

/// Top-level configuration stored in `~/.config/pisetup/config.yaml`.
///
/// Every field is optional in the file; an empty file yields the defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProvisionConfig {
    /// What to do when a step fails.
    pub policy: FailurePolicy,
    /// Per-command timeout for external processes, in seconds.
    pub command_timeout_secs: u64,
    /// Timeout for fetching installer scripts, in seconds.
    pub fetch_timeout_secs: u64,
    /// Skip the package index refresh when it is younger than this.
    pub apt_max_age_hours: u64,
    /// Utility packages for the `utilities` step.
    pub packages: Vec<String>,
    /// Shell profile that receives configuration lines (`~` is expanded).
    pub shell_profile: String,
    /// Lines appended to the shell profile, one per entry.
    pub profile_lines: Vec<String>,
    /// Step names to leave out of the plan.
    pub skip: Vec<String>,
}

impl Default for ProvisionConfig {
    fn default() -> Self {
        Self {
            policy: FailurePolicy::FailFast,
            command_timeout_secs: 1800,
            fetch_timeout_secs: 60,
            apt_max_age_hours: 24,
            packages: DEFAULT_PACKAGES.iter().map(ToString::to_string).collect(),
            shell_profile: "~/.zshrc".to_string(),
            profile_lines: DEFAULT_PROFILE_LINES.iter().map(ToString::to_string).collect(),
            skip: Vec::new(),
        }
    }
}

// ── Validators ───────────────────────────────────────────────────────────────

/// Validates a loaded configuration against the known step names.
///
/// # Errors
///
/// Returns the first `ConfigError` found.
pub fn validate_config(config: &ProvisionConfig, known_steps: &[&str]) -> Result<()> {
    if config.command_timeout_secs == 0 {
        return Err(ConfigError::ZeroValue {
            key: "command_timeout_secs",
        }
        .into());
    }
    if config.fetch_timeout_secs == 0 {
        return Err(ConfigError::ZeroValue {
            key: "fetch_timeout_secs",
        }
        .into());
    }
    if config.apt_max_age_hours == 0 {
        return Err(ConfigError::ZeroValue {
            key: "apt_max_age_hours",
        }
        .into());
    }
    if config.shell_profile.trim().is_empty() {
        return Err(ConfigError::EmptyShellProfile.into());
    }
    for line in &config.profile_lines {
        if line.trim().is_empty() || line.contains('\n') {
            return Err(ConfigError::InvalidProfileLine(line.clone()).into());
        }
    }
    for pkg in &config.packages {
        validate_package_name(pkg)?;
    }
    for name in &config.skip {
        if !known_steps.contains(&name.as_str()) {
            return Err(ConfigError::UnknownStep {
                name: name.clone(),
                valid: known_steps.join(", "),
            }
            .into());
        }
    }
    Ok(())
}

/// Validates a Debian package name.
///
/// # Errors
///
/// Returns an error if the name does not follow Debian policy.
pub fn validate_package_name(name: &str) -> Result<()> {
    let re = PACKAGE_NAME_RE
        .as_ref()
        .map_err(|e| anyhow::anyhow!("invalid package pattern: {e}"))?;
    if !re.is_match(name) {
        return Err(ConfigError::InvalidPackage(name.to_string()).into());
    }
    Ok(())
}

/// Expand a leading `~` against `home`.
#[must_use]
pub fn expand_home(path: &str, home: &std::path::Path) -> std::path::PathBuf {
    if path == "~" {
        return home.to_path_buf();
    }
    match path.strip_prefix("~/") {
        Some(rest) => home.join(rest),
        None => std::path::PathBuf::from(path),
    }
}

// ── Unit tests ───────────────────────────────────────────────────────────────
