//! Host facts parsed from probe output.
//!
//! Pure functions only: callers read the model file or run `dpkg-query` /
//! `getent` and hand the text in here.

use std::collections::HashSet;

/// Substring identifying a Raspberry Pi in the device-tree model string.
pub const PI_MODEL_MARKER: &str = "Raspberry Pi";

/// Default location of the board model string on Linux.
pub const DEVICE_TREE_MODEL_PATH: &str = "/proc/device-tree/model";

/// Normalize a device-tree model string (NUL-terminated, may carry newlines).
#[must_use]
pub fn normalize_model(raw: &str) -> String {
    raw.trim_matches(|c: char| c == '\0' || c.is_whitespace())
        .to_string()
}

/// Returns `true` if the model string names a Raspberry Pi board.
#[must_use]
pub fn is_raspberry_pi(model: &str) -> bool {
    model.contains(PI_MODEL_MARKER)
}

/// `dpkg-query` format producing one `name status` line per package.
pub const DPKG_QUERY_FORMAT: &str = "${Package} ${Status}\\n";

/// Return the packages from `requested` that `dpkg-query` output does not list
/// as fully installed.
///
/// Packages dpkg has never heard of are absent from stdout entirely, which
/// counts as missing.
#[must_use]
pub fn missing_packages(requested: &[String], dpkg_output: &str) -> Vec<String> {
    let installed: HashSet<&str> = dpkg_output
        .lines()
        .filter_map(|line| {
            let (name, status) = line.trim().split_once(' ')?;
            (status.trim() == "install ok installed").then_some(name)
        })
        .collect();
    requested
        .iter()
        .filter(|p| !installed.contains(p.as_str()))
        .cloned()
        .collect()
}

/// Extract the login shell from a passwd entry (`name:x:uid:gid:gecos:home:shell`).
#[must_use]
pub fn login_shell(passwd_line: &str) -> Option<&str> {
    let shell = passwd_line.trim().rsplit(':').next()?;
    if shell.is_empty() || !passwd_line.contains(':') {
        None
    } else {
        Some(shell)
    }
}

/// Compare shells by file name so `/bin/zsh` and `/usr/bin/zsh` both match `zsh`.
#[must_use]
pub fn shell_matches(current: &str, wanted: &str) -> bool {
    let base = |s: &str| s.rsplit('/').next().unwrap_or(s).to_string();
    base(current) == base(wanted)
}
