//! Append-if-absent capability for dotfiles.
//!
//! Steps never open a dotfile themselves: they hand the path and the wanted
//! lines to `append_if_absent` / `append_lines`.

use std::path::Path;

use anyhow::{Context, Result};

use crate::application::ports::LocalFs;
use crate::domain::dotfile::append_text;

/// Append `line` to the file unless it is already present.
///
/// Returns `true` when the file was changed.
///
/// # Errors
///
/// Returns an error if the file cannot be read or written.
pub fn append_if_absent(fs: &impl LocalFs, path: &Path, line: &str) -> Result<bool> {
    let content = fs
        .read_optional(path)
        .with_context(|| format!("reading {}", path.display()))?
        .unwrap_or_default();
    match append_text(&content, line) {
        Some(text) => {
            fs.append(path, &text)
                .with_context(|| format!("appending to {}", path.display()))?;
            tracing::debug!(path = %path.display(), line, "appended line");
            Ok(true)
        }
        None => Ok(false),
    }
}

/// Append every missing line, in order, returning how many were added.
///
/// # Errors
///
/// Returns an error if the file cannot be read or written.
pub fn append_lines(fs: &impl LocalFs, path: &Path, lines: &[String]) -> Result<usize> {
    let mut added = 0;
    for line in lines {
        if append_if_absent(fs, path, line)? {
            added += 1;
        }
    }
    Ok(added)
}
