//! Presence probe: resolves programs on `PATH` with the `which` crate.

use crate::application::ports::ToolLocator;

/// Production `ToolLocator`.
pub struct PathLocator;

impl ToolLocator for PathLocator {
    fn is_installed(&self, program: &str) -> bool {
        which::which(program).is_ok()
    }
}
