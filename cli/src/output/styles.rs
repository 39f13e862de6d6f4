//! Output styles keyed by step outcome, using owo-colors.

use owo_colors::Style;

/// Marker printed before a step that changed the host.
pub const DONE: &str = "✓";
/// Marker printed before a step whose end state already held.
pub const SKIPPED: &str = "·";
/// Marker printed before a failed step or an error.
pub const FAILED: &str = "✗";
/// Marker printed before a warning.
pub const WARNING: &str = "⚠";
/// Marker printed before an informational line.
pub const INFO: &str = "ℹ";
/// Marker printed before an action in progress when no spinner is shown.
pub const RUNNING: &str = "→";

/// Stylesheet for terminal output. `Default` is the uncolored sheet.
#[derive(Default, Clone)]
pub struct Styles {
    pub done: Style,
    pub skipped: Style,
    pub failed: Style,
    pub warning: Style,
    pub info: Style,
    pub running: Style,
    /// Step names in listings.
    pub emphasis: Style,
    pub header: Style,
}

impl Styles {
    /// The colored stylesheet used on a terminal.
    #[must_use]
    pub fn colored() -> Self {
        Self {
            done: Style::new().green(),
            skipped: Style::new().dimmed(),
            failed: Style::new().red(),
            warning: Style::new().yellow(),
            info: Style::new().blue(),
            running: Style::new().cyan(),
            emphasis: Style::new().bold(),
            header: Style::new().bold().cyan(),
        }
    }
}
