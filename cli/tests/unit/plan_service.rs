//! Tests for `plan_steps`: read-only evaluation of every check.

#![allow(clippy::expect_used)]

use pisetup_cli::application::services::plan::plan_steps;
use pisetup_cli::application::services::provision::run_steps;
use pisetup_cli::domain::{FailurePolicy, PlanStatus, Privilege, ProvisionConfig, default_steps};

use crate::helpers::{FakeHost, NoopReporter, identity};

#[tokio::test]
async fn test_plan_reports_status_without_changing_host() {
    let host = FakeHost::new().with_tool("zsh").with_tool("nvim");
    let steps = default_steps(&ProvisionConfig::default(), &identity());

    let entries = plan_steps(&host.caps(Privilege::Sudo), &steps).await;

    assert_eq!(entries.len(), steps.len());
    let status = |name: &str| {
        entries
            .iter()
            .find(|e| e.name == name)
            .map(|e| e.status.clone())
    };
    assert_eq!(status("zsh"), Some(PlanStatus::Satisfied));
    assert_eq!(status("neovim"), Some(PlanStatus::Satisfied));
    assert_eq!(status("tailscale"), Some(PlanStatus::NeedsAction));
    assert_eq!(status("login-shell"), Some(PlanStatus::NeedsAction));
    assert_eq!(host.mutating_calls(), Vec::<String>::new());
    assert!(host.fetches().is_empty());
}

#[tokio::test]
async fn test_plan_probe_error_is_unknown_and_evaluation_continues() {
    let host = FakeHost::new().failing_on("getent");
    let steps = default_steps(&ProvisionConfig::default(), &identity());

    let entries = plan_steps(&host.caps(Privilege::Sudo), &steps).await;

    let login = entries
        .iter()
        .find(|e| e.name == "login-shell")
        .expect("login-shell entry");
    assert!(matches!(&login.status, PlanStatus::Unknown { reason } if reason.contains("getent")));
    assert_eq!(entries.len(), steps.len());
}

#[tokio::test]
async fn test_plan_after_full_run_reports_everything_satisfied() {
    let host = FakeHost::new();
    let steps = default_steps(&ProvisionConfig::default(), &identity());
    let caps = host.caps(Privilege::Sudo);

    let report = run_steps(&caps, &steps, FailurePolicy::FailFast, &NoopReporter).await;
    assert!(report.is_success(), "{:?}", report.steps);

    let entries = plan_steps(&caps, &steps).await;
    assert!(
        entries.iter().all(|e| e.status == PlanStatus::Satisfied),
        "{entries:?}"
    );
}
