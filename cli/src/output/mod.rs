//! Output formatting module

pub mod human;
pub mod json;
pub mod reporter;
pub mod styles;

use console::Term;
use owo_colors::{OwoColorize as _, Style};

pub use human::HumanRenderer;
pub use json::JsonRenderer;
pub use reporter::{SilentReporter, TerminalReporter};
pub use styles::Styles;

/// Terminal state and styling shared by every human-readable printer.
pub struct OutputContext {
    pub styles: Styles,
    /// Whether stdout is a TTY.
    pub is_tty: bool,
    /// Suppress everything except errors.
    pub quiet: bool,
}

impl OutputContext {
    /// Colors are used only on a TTY, and never with `--no-color` or `NO_COLOR`.
    #[must_use]
    pub fn new(no_color: bool, quiet: bool) -> Self {
        let is_tty = Term::stdout().is_term();
        let use_colors = !no_color && is_tty && std::env::var_os("NO_COLOR").is_none();
        Self {
            styles: if use_colors {
                Styles::colored()
            } else {
                Styles::default()
            },
            is_tty,
            quiet,
        }
    }

    /// Spinners are drawn only on an interactive, non-quiet terminal.
    #[must_use]
    pub fn show_progress(&self) -> bool {
        self.is_tty && !self.quiet
    }

    fn mark(&self, marker: &str, style: Style, msg: &str) {
        if !self.quiet {
            println!("  {} {msg}", marker.style(style));
        }
    }

    pub fn done(&self, msg: &str) {
        self.mark(styles::DONE, self.styles.done, msg);
    }

    pub fn skipped(&self, msg: &str) {
        if !self.quiet {
            println!(
                "  {} {}",
                styles::SKIPPED.style(self.styles.skipped),
                msg.style(self.styles.skipped)
            );
        }
    }

    pub fn warn(&self, msg: &str) {
        self.mark(styles::WARNING, self.styles.warning, msg);
    }

    pub fn info(&self, msg: &str) {
        self.mark(styles::INFO, self.styles.info, msg);
    }

    pub fn running(&self, msg: &str) {
        self.mark(styles::RUNNING, self.styles.running, msg);
    }

    /// Printed to stderr, even when quiet.
    pub fn error(&self, msg: &str) {
        eprintln!("  {} {msg}", styles::FAILED.style(self.styles.failed));
    }

    pub fn header(&self, msg: &str) {
        if !self.quiet {
            println!("  {}", msg.style(self.styles.header));
        }
    }

    /// A `key value` line with the key dimmed and padded to `width`.
    pub fn field(&self, key: &str, value: &str, width: usize) {
        if !self.quiet {
            println!("  {:<width$} {value}", key.style(self.styles.skipped));
        }
    }
}

/// Output renderer selected by `--json`.
pub enum Renderer<'a> {
    Human(HumanRenderer<'a>),
    Json(JsonRenderer),
}
