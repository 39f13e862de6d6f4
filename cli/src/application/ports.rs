//! Port trait definitions for the Application layer.
//!
//! Ports are the interfaces (contracts) that infrastructure must fulfill.
//! This file imports only from `crate::domain`: never from `crate::infra`,
//! `crate::commands`, or `crate::output`.

use std::path::{Path, PathBuf};
use std::process::Output;
use std::time::Duration;

use anyhow::Result;

use crate::domain::ProvisionConfig;

// ── Command Runner Port ───────────────────────────────────────────────────────

/// Abstracts process execution so infrastructure can be swapped or mocked.
///
/// This is the Command Executor capability: every external program a step
/// touches goes through here.
#[allow(async_fn_in_trait)]
pub trait CommandRunner {
    /// Run a program and capture its output.
    ///
    /// Implementations should delegate to `run_with_timeout` using the
    /// instance's configured default timeout.
    async fn run(&self, program: &str, args: &[&str]) -> Result<Output>;
    /// Run a program with a custom timeout override.
    ///
    /// # Errors
    ///
    /// Returns an error if the process cannot be spawned or exceeds `timeout`.
    /// On timeout, the child process must be killed (not left orphaned).
    async fn run_with_timeout(
        &self,
        program: &str,
        args: &[&str],
        timeout: Duration,
    ) -> Result<Output>;
    /// Run a program with stdin piped from `stdin`.
    async fn run_with_stdin(&self, program: &str, args: &[&str], stdin: &[u8]) -> Result<Output>;
}

// ── Presence Probe Port ───────────────────────────────────────────────────────

/// Resolves programs on `PATH`.
pub trait ToolLocator {
    /// Returns `true` if `program` resolves to an executable.
    fn is_installed(&self, program: &str) -> bool;
}

// ── Network Fetch Port ────────────────────────────────────────────────────────

/// Downloads installer scripts.
#[allow(async_fn_in_trait)]
pub trait ScriptFetcher {
    /// Fetch the body of `url` as text.
    ///
    /// # Errors
    ///
    /// Returns `ProvisionError::FetchFailed` on any network or HTTP error.
    async fn fetch(&self, url: &str) -> Result<String>;
}

// ── Filesystem Port ───────────────────────────────────────────────────────────

/// Filesystem operations used by checks and file-writing actions.
///
/// Dotfile edits go through `application::services::dotfile::append_if_absent`,
/// which is built on these primitives.
pub trait LocalFs {
    fn exists(&self, path: &Path) -> bool;
    /// Read a file, returning `None` when it does not exist.
    fn read_optional(&self, path: &Path) -> Result<Option<String>>;
    /// Append `text` to the file, creating it and its parent directories.
    fn append(&self, path: &Path, text: &str) -> Result<()>;
    /// Replace the file contents atomically, creating parent directories.
    fn write_atomic(&self, path: &Path, contents: &str) -> Result<()>;
    /// Time since the file was last modified, or `None` if it does not exist.
    fn age(&self, path: &Path) -> Result<Option<Duration>>;
}

// ── Host Ports ────────────────────────────────────────────────────────────────

/// Reads the board model string.
pub trait HostProbe {
    /// The normalized board model, or `None` if the host exposes none.
    fn model(&self) -> Option<String>;
}

/// Asks the operator a yes/no question.
pub trait Prompter {
    /// Ask for confirmation, returning `default` when no one can answer.
    ///
    /// # Errors
    ///
    /// Returns an error if the terminal prompt fails.
    fn confirm(&self, prompt: &str, default: bool) -> Result<bool>;
}

// ── Progress Reporting Port ───────────────────────────────────────────────────

/// Abstracts progress reporting so services can emit events without
/// depending on the Presentation layer. Sync trait: no async needed.
pub trait ProgressReporter {
    /// Emit an in-progress step message.
    fn step(&self, message: &str);
    /// Emit a success message.
    fn success(&self, message: &str);
    /// Emit a skip message for a step whose end state already holds.
    fn skip(&self, message: &str);
    /// Emit a warning message.
    fn warn(&self, message: &str);
    /// Emit a failure message with the underlying reason.
    fn fail(&self, message: &str, reason: &str);
}

// ── Config Port ───────────────────────────────────────────────────────────────

/// Abstracts configuration persistence.
pub trait ConfigStore {
    /// Load the configuration, returning defaults when no file exists.
    fn load(&self) -> Result<ProvisionConfig>;
    /// Persist the configuration.
    fn save(&self, config: &ProvisionConfig) -> Result<()>;
    /// Location of the configuration file.
    fn path(&self) -> Result<PathBuf>;
    /// Whether a configuration file exists at `path()`.
    fn exists(&self) -> Result<bool>;
}
