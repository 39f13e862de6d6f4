//! `TerminalReporter`: Presentation-layer implementation of `ProgressReporter`.
//!
//! Application services emit step events through the port; this turns them
//! into spinner updates and outcome lines.

use std::cell::RefCell;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

use crate::application::ports::ProgressReporter;
use crate::output::OutputContext;

const SPINNER_TEMPLATE: &str = "  {spinner:.cyan} {msg} {elapsed:.dim}";
const SPINNER_TICKS: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "✓"];

/// Terminal reporter.
///
/// On a TTY the running action is a single spinner whose message is replaced
/// by each new action and cleared when the step resolves. Off a TTY each
/// action is printed as a `→` line. Everything except `fail()` honors quiet.
pub struct TerminalReporter<'a> {
    ctx: &'a OutputContext,
    spinner: RefCell<Option<ProgressBar>>,
}

impl<'a> TerminalReporter<'a> {
    #[must_use]
    pub fn new(ctx: &'a OutputContext) -> Self {
        Self {
            ctx,
            spinner: RefCell::new(None),
        }
    }

    fn start_spinner(message: &str) -> ProgressBar {
        let pb = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner().template(SPINNER_TEMPLATE) {
            pb.set_style(style.tick_strings(SPINNER_TICKS));
        }
        pb.set_message(message.to_string());
        pb.enable_steady_tick(Duration::from_millis(80));
        pb
    }

    fn clear_spinner(&self) {
        if let Some(pb) = self.spinner.borrow_mut().take() {
            pb.finish_and_clear();
        }
    }
}

impl ProgressReporter for TerminalReporter<'_> {
    fn step(&self, message: &str) {
        if !self.ctx.show_progress() {
            self.ctx.running(message);
            return;
        }
        let mut slot = self.spinner.borrow_mut();
        match slot.as_ref() {
            Some(pb) => pb.set_message(message.to_string()),
            None => *slot = Some(Self::start_spinner(message)),
        }
    }

    fn success(&self, message: &str) {
        self.clear_spinner();
        self.ctx.done(message);
    }

    fn skip(&self, message: &str) {
        self.clear_spinner();
        self.ctx.skipped(message);
    }

    fn warn(&self, message: &str) {
        self.clear_spinner();
        self.ctx.warn(message);
    }

    fn fail(&self, message: &str, reason: &str) {
        self.clear_spinner();
        self.ctx.error(&format!("{message} failed"));
        for line in reason.lines() {
            eprintln!("      {line}");
        }
    }
}

/// Reporter that discards every event, used in `--json` mode.
pub struct SilentReporter;

impl ProgressReporter for SilentReporter {
    fn step(&self, _: &str) {}
    fn success(&self, _: &str) {}
    fn skip(&self, _: &str) {}
    fn warn(&self, _: &str) {}
    fn fail(&self, _: &str, _: &str) {}
}
