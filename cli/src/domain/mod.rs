//! Domain layer: pure business logic, types, and validation.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `tokio`, `std::fs`, `std::process`, or `std::net`.
//! All functions are synchronous and take data in, returning data out.

pub mod catalog;
pub mod config;
pub mod dotfile;
pub mod error;
pub mod host;
pub mod step;

pub use catalog::{Identity, STEP_NAMES, default_steps};
pub use config::{ProvisionConfig, validate_config};
pub use error::{ConfigError, ProvisionError};
pub use step::{
    Action, Check, CommandLine, FailurePolicy, PlanEntry, PlanStatus, Privilege, RunReport,
    Satisfaction, Step, StepOutcome, StepRecord,
};
