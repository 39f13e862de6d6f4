//! Application service: the provisioning run use-case.
//!
//! Imports only from `crate::domain` and `crate::application::ports`.
//! All I/O is routed through injected port traits.

use std::path::PathBuf;
use std::time::Instant;

use anyhow::Result;
use chrono::Utc;

use crate::application::ports::{
    CommandRunner, HostProbe, LocalFs, ProgressReporter, Prompter, ScriptFetcher, ToolLocator,
};
use crate::application::services::identity;
use crate::application::services::step_exec::{Capabilities, Ports};
use crate::domain::host::is_raspberry_pi;
use crate::domain::{
    FailurePolicy, Identity, Privilege, ProvisionError, RunReport, Step, StepOutcome, StepRecord,
};

/// Ask the operator to confirm when the host is not a Raspberry Pi.
///
/// # Errors
///
/// Returns `ProvisionError::HostDeclined` if the operator answers no, or an
/// error if the prompt itself fails.
pub fn confirm_host(probe: &impl HostProbe, prompter: &impl Prompter) -> Result<()> {
    let model = probe.model().unwrap_or_else(|| "unknown model".to_string());
    if is_raspberry_pi(&model) {
        tracing::debug!(%model, "host is a Raspberry Pi");
        return Ok(());
    }
    let prompt = format!("This host ({model}) does not look like a Raspberry Pi. Continue anyway?");
    if prompter.confirm(&prompt, false)? {
        tracing::info!(%model, "operator accepted non-Pi host");
        Ok(())
    } else {
        Err(ProvisionError::HostDeclined { model }.into())
    }
}

/// Gate on the host model, detect who we provision for, build the plan and
/// run it.
///
/// When the operator declines, nothing else happens: no probe, no step.
///
/// # Errors
///
/// Returns `ProvisionError::HostDeclined`, a prompt error, or an identity
/// detection error. Step failures are recorded in the returned report, not
/// returned as errors.
pub async fn provision<R, F, L, S>(
    ports: &Ports<'_, R, F, L, S>,
    gate: (&impl HostProbe, &impl Prompter),
    home: PathBuf,
    build: impl FnOnce(&Identity) -> Vec<Step>,
    policy: FailurePolicy,
    reporter: &impl ProgressReporter,
) -> Result<RunReport>
where
    R: CommandRunner,
    F: LocalFs,
    L: ToolLocator,
    S: ScriptFetcher,
{
    let (probe, prompter) = gate;
    confirm_host(probe, prompter)?;

    let (identity, privilege) = identity::detect(ports.runner, home).await?;
    if privilege == Privilege::Sudo {
        reporter.warn("package steps run through sudo; you may be asked for a password");
    }
    let steps = build(&identity);
    let caps = ports.with_privilege(privilege);
    Ok(run_steps(&caps, &steps, policy, reporter).await)
}

/// Run `steps` in order under `policy`.
///
/// Under `FailFast` the report ends at the first failed step; later steps are
/// neither executed nor recorded.
pub async fn run_steps<R, F, L, S>(
    caps: &Capabilities<'_, R, F, L, S>,
    steps: &[Step],
    policy: FailurePolicy,
    reporter: &impl ProgressReporter,
) -> RunReport
where
    R: CommandRunner,
    F: LocalFs,
    L: ToolLocator,
    S: ScriptFetcher,
{
    let mut report = RunReport::new(policy, Utc::now());

    for step in steps {
        let started = Instant::now();
        let outcome = run_step(caps, step, reporter).await;
        let elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
        let stop = outcome.is_failed() && policy == FailurePolicy::FailFast;
        tracing::info!(step = %step.name, ?outcome, elapsed_ms, "step finished");
        report.steps.push(StepRecord {
            name: step.name.clone(),
            outcome,
            elapsed_ms,
        });
        if stop {
            break;
        }
    }

    report.finished_at = Some(Utc::now());
    report
}

async fn run_step<R, F, L, S>(
    caps: &Capabilities<'_, R, F, L, S>,
    step: &Step,
    reporter: &impl ProgressReporter,
) -> StepOutcome
where
    R: CommandRunner,
    F: LocalFs,
    L: ToolLocator,
    S: ScriptFetcher,
{
    match caps.evaluate(&step.check).await {
        Ok(s) if s.is_satisfied() => {
            reporter.skip(&format!("{}: already done", step.name));
            return StepOutcome::Skipped;
        }
        Ok(_) => {}
        Err(e) => {
            let reason = format!("{e:#}");
            reporter.fail(&step.name, &reason);
            return StepOutcome::Failed { reason };
        }
    }

    for action in &step.actions {
        if caps.needs_sudo(action)
            && let Err(e) = caps.ensure_sudo().await
        {
            let reason = format!("{e:#}");
            reporter.fail(&step.name, &reason);
            return StepOutcome::Failed { reason };
        }
        reporter.step(&format!("{}: {}", step.name, action.label()));
        if let Err(e) = caps.perform(action).await {
            let reason = format!("{e:#}");
            reporter.fail(&step.name, &reason);
            return StepOutcome::Failed { reason };
        }
    }

    reporter.success(&format!("{}: done", step.name));
    StepOutcome::Completed
}
