//! Application service: evaluate every check without acting.

use crate::application::ports::{CommandRunner, LocalFs, ScriptFetcher, ToolLocator};
use crate::application::services::step_exec::Capabilities;
use crate::domain::{PlanEntry, PlanStatus, Step};

/// Evaluate the check of every step. A probe error is reported as
/// `PlanStatus::Unknown` and does not stop the evaluation.
pub async fn plan_steps<R, F, L, S>(
    caps: &Capabilities<'_, R, F, L, S>,
    steps: &[Step],
) -> Vec<PlanEntry>
where
    R: CommandRunner,
    F: LocalFs,
    L: ToolLocator,
    S: ScriptFetcher,
{
    let mut entries = Vec::with_capacity(steps.len());
    for step in steps {
        let status = match caps.evaluate(&step.check).await {
            Ok(s) if s.is_satisfied() => PlanStatus::Satisfied,
            Ok(_) => PlanStatus::NeedsAction,
            Err(e) => PlanStatus::Unknown {
                reason: format!("{e:#}"),
            },
        };
        entries.push(PlanEntry {
            name: step.name.clone(),
            status,
        });
    }
    entries
}
