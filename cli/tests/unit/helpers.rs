//! Shared test helpers: an in-memory host that implements every port a step
//! touches, plus output constructors.

#![allow(dead_code, clippy::expect_used)]

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::process::{ExitStatus, Output};
use std::sync::Mutex;
use std::time::Duration;

use anyhow::Result;
use pisetup_cli::application::ports::{
    CommandRunner, LocalFs, ProgressReporter, ScriptFetcher, ToolLocator,
};
use pisetup_cli::application::services::step_exec::{Capabilities, Ports};
use pisetup_cli::domain::catalog::{OH_MY_ZSH_INSTALLER, RUSTUP_INSTALLER, TAILSCALE_INSTALLER};
use pisetup_cli::domain::{Identity, Privilege, ProvisionError};

// ── Cross-platform ExitStatus construction ───────────────────────────────────

/// Build an `ExitStatus` from a logical exit code (0 = success, non-zero = failure).
///
/// The raw wait-status encodes the exit code in bits 8–15, so we shift.
pub fn exit_status(code: i32) -> ExitStatus {
    use std::os::unix::process::ExitStatusExt;
    ExitStatus::from_raw(code << 8)
}

// ── Output constructors ──────────────────────────────────────────────────────

pub fn ok_output(stdout: &[u8]) -> Output {
    Output {
        status: exit_status(0),
        stdout: stdout.to_vec(),
        stderr: Vec::new(),
    }
}

pub fn err_output(code: i32, stderr: &[u8]) -> Output {
    Output {
        status: exit_status(code),
        stdout: Vec::new(),
        stderr: stderr.to_vec(),
    }
}

// ── Fake host ────────────────────────────────────────────────────────────────

pub const USER: &str = "pi";

pub fn identity() -> Identity {
    Identity {
        user: USER.to_string(),
        home: PathBuf::from("/home/pi"),
    }
}

#[derive(Default)]
struct HostState {
    tools: HashSet<String>,
    packages: HashSet<String>,
    files: HashMap<PathBuf, String>,
    dirs: HashSet<PathBuf>,
    ages: HashMap<PathBuf, Duration>,
    shell: String,
    uid: String,
    calls: Vec<String>,
    fetches: Vec<String>,
    fail_matching: Option<String>,
    sudo_fails: bool,
}

/// An in-memory Raspberry Pi.
///
/// Package installs put the package (and its binary) in place, `chsh` changes
/// the login shell, and installer scripts are tiny line-based programs:
/// `tool:<name>` puts a binary on `PATH`, `mkdir:<path>` creates a directory.
pub struct FakeHost {
    state: Mutex<HostState>,
    installers: HashMap<String, String>,
}

impl Default for FakeHost {
    fn default() -> Self {
        Self::new()
    }
}

impl FakeHost {
    /// A fresh, unprovisioned host where the current user is not root.
    pub fn new() -> Self {
        let installers = HashMap::from([
            (
                OH_MY_ZSH_INSTALLER.to_string(),
                "mkdir:/home/pi/.oh-my-zsh\n".to_string(),
            ),
            (TAILSCALE_INSTALLER.to_string(), "tool:tailscale\n".to_string()),
            (RUSTUP_INSTALLER.to_string(), "tool:rustup\n".to_string()),
        ]);
        Self {
            state: Mutex::new(HostState {
                shell: "/bin/bash".to_string(),
                uid: "1000".to_string(),
                ..HostState::default()
            }),
            installers,
        }
    }

    pub fn as_root(self) -> Self {
        self.state.lock().expect("lock").uid = "0".to_string();
        self
    }

    pub fn with_tool(self, tool: &str) -> Self {
        self.state.lock().expect("lock").tools.insert(tool.to_string());
        self
    }

    pub fn with_file(self, path: &str, content: &str) -> Self {
        self.state
            .lock()
            .expect("lock")
            .files
            .insert(PathBuf::from(path), content.to_string());
        self
    }

    /// Make every command whose line contains `pattern` exit 100.
    pub fn failing_on(self, pattern: &str) -> Self {
        self.state.lock().expect("lock").fail_matching = Some(pattern.to_string());
        self
    }

    /// Make `sudo -v` fail, as when the operator gives a wrong password.
    pub fn with_rejected_sudo(self) -> Self {
        self.state.lock().expect("lock").sudo_fails = true;
        self
    }

    pub fn stop_failing(&self) {
        self.state.lock().expect("lock").fail_matching = None;
    }

    /// Every command line run so far, `sudo` prefix included.
    pub fn calls(&self) -> Vec<String> {
        self.state.lock().expect("lock").calls.clone()
    }

    /// Command lines that change the host (probes and `sudo -v` excluded).
    pub fn mutating_calls(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter(|c| {
                !c.starts_with("id ")
                    && !c.starts_with("getent ")
                    && !c.starts_with("dpkg-query ")
                    && c != "sudo -v"
            })
            .collect()
    }

    pub fn clear_calls(&self) {
        let mut state = self.state.lock().expect("lock");
        state.calls.clear();
        state.fetches.clear();
    }

    pub fn fetches(&self) -> Vec<String> {
        self.state.lock().expect("lock").fetches.clone()
    }

    pub fn file(&self, path: &str) -> Option<String> {
        self.state
            .lock()
            .expect("lock")
            .files
            .get(Path::new(path))
            .cloned()
    }

    pub fn login_shell(&self) -> String {
        self.state.lock().expect("lock").shell.clone()
    }

    pub fn ports(&self) -> Ports<'_, Self, Self, Self, Self> {
        Ports {
            runner: self,
            fs: self,
            locator: self,
            fetcher: self,
        }
    }

    pub fn caps(&self, privilege: Privilege) -> Capabilities<'_, Self, Self, Self, Self> {
        self.ports().with_privilege(privilege)
    }

    fn respond(&self, program: &str, args: &[&str], stdin: Option<&[u8]>) -> Output {
        let mut state = self.state.lock().expect("lock");
        let line = std::iter::once(program)
            .chain(args.iter().copied())
            .collect::<Vec<_>>()
            .join(" ");
        state.calls.push(line.clone());

        if let Some(pattern) = &state.fail_matching
            && line.contains(pattern.as_str())
        {
            return err_output(100, b"E: simulated failure");
        }

        // Drop a leading sudo: the fake host does not model permissions.
        let words: Vec<&str> = std::iter::once(program)
            .chain(args.iter().copied())
            .skip_while(|w| *w == "sudo")
            .collect();

        if program == "sudo" && args == ["-v"] {
            return if state.sudo_fails {
                err_output(1, b"sudo: 3 incorrect password attempts")
            } else {
                ok_output(b"")
            };
        }

        match words.as_slice() {
            ["id", "-u"] => ok_output(format!("{}\n", state.uid).as_bytes()),
            ["id", "-un"] => ok_output(format!("{USER}\n").as_bytes()),
            ["getent", "passwd", user] => ok_output(
                format!("{user}:x:1000:1000::/home/{user}:{}\n", state.shell).as_bytes(),
            ),
            ["dpkg-query", "-W", _format, pkgs @ ..] => {
                let mut out = String::new();
                let mut all = true;
                for pkg in pkgs {
                    if state.packages.contains(*pkg) {
                        out.push_str(&format!("{pkg} install ok installed\n"));
                    } else {
                        all = false;
                    }
                }
                Output {
                    status: exit_status(i32::from(!all)),
                    stdout: out.into_bytes(),
                    stderr: Vec::new(),
                }
            }
            ["env", _frontend, "apt-get", "update"] => ok_output(b""),
            ["env", _frontend, "apt-get", "upgrade", ..] => ok_output(b""),
            ["env", _frontend, "apt-get", "install", rest @ ..] => {
                for pkg in rest.iter().filter(|a| !a.starts_with('-')) {
                    state.packages.insert((*pkg).to_string());
                    let tool = if *pkg == "neovim" { "nvim" } else { *pkg };
                    state.tools.insert(tool.to_string());
                }
                ok_output(b"")
            }
            ["chsh", "-s", shell, _user] => {
                state.shell = (*shell).to_string();
                ok_output(b"")
            }
            ["sh", "-s", "--", ..] => {
                let script = String::from_utf8_lossy(stdin.unwrap_or_default()).into_owned();
                for instr in script.lines() {
                    if let Some(tool) = instr.strip_prefix("tool:") {
                        state.tools.insert(tool.to_string());
                    } else if let Some(dir) = instr.strip_prefix("mkdir:") {
                        state.dirs.insert(PathBuf::from(dir));
                    }
                }
                ok_output(b"")
            }
            _ => err_output(127, format!("{program}: command not found").as_bytes()),
        }
    }
}

impl CommandRunner for FakeHost {
    async fn run(&self, program: &str, args: &[&str]) -> Result<Output> {
        Ok(self.respond(program, args, None))
    }

    async fn run_with_timeout(
        &self,
        program: &str,
        args: &[&str],
        _timeout: Duration,
    ) -> Result<Output> {
        Ok(self.respond(program, args, None))
    }

    async fn run_with_stdin(&self, program: &str, args: &[&str], stdin: &[u8]) -> Result<Output> {
        Ok(self.respond(program, args, Some(stdin)))
    }
}

impl ToolLocator for FakeHost {
    fn is_installed(&self, program: &str) -> bool {
        self.state.lock().expect("lock").tools.contains(program)
    }
}

impl ScriptFetcher for FakeHost {
    async fn fetch(&self, url: &str) -> Result<String> {
        self.state.lock().expect("lock").fetches.push(url.to_string());
        self.installers.get(url).cloned().ok_or_else(|| {
            ProvisionError::FetchFailed {
                url: url.to_string(),
                reason: "HTTP 404".to_string(),
            }
            .into()
        })
    }
}

impl LocalFs for FakeHost {
    fn exists(&self, path: &Path) -> bool {
        let state = self.state.lock().expect("lock");
        state.files.contains_key(path) || state.dirs.contains(path)
    }

    fn read_optional(&self, path: &Path) -> Result<Option<String>> {
        Ok(self.state.lock().expect("lock").files.get(path).cloned())
    }

    fn append(&self, path: &Path, text: &str) -> Result<()> {
        let mut state = self.state.lock().expect("lock");
        state
            .files
            .entry(path.to_path_buf())
            .or_default()
            .push_str(text);
        state.ages.insert(path.to_path_buf(), Duration::ZERO);
        Ok(())
    }

    fn write_atomic(&self, path: &Path, contents: &str) -> Result<()> {
        let mut state = self.state.lock().expect("lock");
        state.files.insert(path.to_path_buf(), contents.to_string());
        state.ages.insert(path.to_path_buf(), Duration::ZERO);
        Ok(())
    }

    fn age(&self, path: &Path) -> Result<Option<Duration>> {
        Ok(self.state.lock().expect("lock").ages.get(path).copied())
    }
}

// ── Reporters ────────────────────────────────────────────────────────────────

pub struct NoopReporter;

impl ProgressReporter for NoopReporter {
    fn step(&self, _: &str) {}
    fn success(&self, _: &str) {}
    fn skip(&self, _: &str) {}
    fn warn(&self, _: &str) {}
    fn fail(&self, _: &str, _: &str) {}
}

/// Records every event as `kind: message`.
#[derive(Default)]
pub struct RecordingReporter {
    pub events: Mutex<Vec<String>>,
}

impl RecordingReporter {
    pub fn events(&self) -> Vec<String> {
        self.events.lock().expect("lock").clone()
    }

    fn push(&self, kind: &str, message: &str) {
        self.events
            .lock()
            .expect("lock")
            .push(format!("{kind}: {message}"));
    }
}

impl ProgressReporter for RecordingReporter {
    fn step(&self, message: &str) {
        self.push("step", message);
    }
    fn success(&self, message: &str) {
        self.push("success", message);
    }
    fn skip(&self, message: &str) {
        self.push("skip", message);
    }
    fn warn(&self, message: &str) {
        self.push("warn", message);
    }
    fn fail(&self, message: &str, reason: &str) {
        self.push("fail", &format!("{message}: {reason}"));
    }
}
