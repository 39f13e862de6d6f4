//! Human-readable terminal renderer.

use std::path::Path;

use owo_colors::OwoColorize as _;

use crate::domain::{PlanEntry, PlanStatus, ProvisionConfig, RunReport, Step, StepOutcome};
use crate::output::OutputContext;
use crate::output::styles::{DONE, FAILED, RUNNING};

/// Renders domain types as human-readable terminal output using `OutputContext`.
pub struct HumanRenderer<'a> {
    ctx: &'a OutputContext,
}

impl<'a> HumanRenderer<'a> {
    /// Create a new `HumanRenderer` wrapping the given output context.
    #[must_use]
    pub fn new(ctx: &'a OutputContext) -> Self {
        Self { ctx }
    }

    /// Render the CLI version information.
    pub fn render_version(&self, version: &str) {
        if self.ctx.quiet {
            return;
        }
        println!("pisetup {version}");
    }

    /// Render the summary printed after a provisioning run.
    pub fn render_report(&self, report: &RunReport) {
        if self.ctx.quiet {
            return;
        }
        let (skipped, completed, failed) = report.tally();
        println!();
        if failed == 0 {
            self.ctx.done(&format!(
                "Provisioning complete: {completed} done, {skipped} already satisfied."
            ));
        } else {
            println!(
                "  {} {failed} failed, {completed} done, {skipped} already satisfied ({}).",
                FAILED.style(self.ctx.styles.failed),
                report.policy,
            );
            for record in &report.steps {
                if let StepOutcome::Failed { .. } = record.outcome {
                    self.ctx.field("failed:", &record.name, 9);
                }
            }
        }
        if let Some(finished) = report.finished_at {
            let secs = (finished - report.started_at).num_seconds();
            self.ctx.field("elapsed:", &format_elapsed(secs), 9);
        }
    }

    /// Render the result of evaluating every check.
    pub fn render_plan(&self, entries: &[PlanEntry]) {
        if self.ctx.quiet {
            return;
        }
        self.ctx.header("Provisioning plan");
        println!();
        for entry in entries {
            match &entry.status {
                PlanStatus::Satisfied => println!(
                    "    {} {:<16} {}",
                    DONE.style(self.ctx.styles.done),
                    entry.name,
                    "satisfied".style(self.ctx.styles.skipped)
                ),
                PlanStatus::NeedsAction => println!(
                    "    {} {:<16} {}",
                    RUNNING.style(self.ctx.styles.running),
                    entry.name,
                    "will run"
                ),
                PlanStatus::Unknown { reason } => println!(
                    "    {} {:<16} {}",
                    "?".style(self.ctx.styles.warning),
                    entry.name,
                    reason
                ),
            }
        }
        let pending = entries
            .iter()
            .filter(|e| e.status != PlanStatus::Satisfied)
            .count();
        println!();
        if pending == 0 {
            self.ctx.done("Nothing to do.");
        } else {
            self.ctx.info(&format!("{pending} step(s) would run. Run: pisetup run"));
        }
    }

    /// Render the step catalog.
    pub fn render_steps(&self, steps: &[Step]) {
        for (i, step) in steps.iter().enumerate() {
            println!(
                "  {:>2}. {:<16} {}",
                i + 1,
                step.name.style(self.ctx.styles.emphasis),
                step.description
            );
        }
    }

    /// Render the effective configuration.
    pub fn render_config(&self, config: &ProvisionConfig, path: &Path) {
        println!();
        println!(
            "  {}",
            format!("Configuration ({})", path.display()).style(self.ctx.styles.header)
        );
        println!();
        println!("  {:<24} {}", "policy:", config.policy);
        println!("  {:<24} {}", "command_timeout_secs:", config.command_timeout_secs);
        println!("  {:<24} {}", "fetch_timeout_secs:", config.fetch_timeout_secs);
        println!("  {:<24} {}", "apt_max_age_hours:", config.apt_max_age_hours);
        println!("  {:<24} {}", "shell_profile:", config.shell_profile);
        println!("  {:<24} {}", "packages:", config.packages.join(" "));
        println!("  {:<24} {}", "profile_lines:", config.profile_lines.len());
        let skip = if config.skip.is_empty() {
            "(none)".to_string()
        } else {
            config.skip.join(", ")
        };
        println!("  {:<24} {skip}", "skip:");
        println!();
    }
}

// ── Display helpers ──────────────────────────────────────────────────────────

#[must_use]
pub fn format_elapsed(seconds: i64) -> String {
    let seconds = seconds.max(0);
    let minutes = seconds / 60;
    if minutes > 0 {
        format!("{minutes}m {}s", seconds % 60)
    } else {
        format!("{seconds}s")
    }
}
