//! Application service: configuration loading and validation.

use anyhow::Result;

use crate::application::ports::ConfigStore;
use crate::domain::catalog::STEP_NAMES;
use crate::domain::{ProvisionConfig, validate_config};

/// Load the configuration and validate it against the step catalog.
///
/// # Errors
///
/// Returns an error if the file cannot be read, parsed, or fails validation.
pub fn load_config(store: &impl ConfigStore) -> Result<ProvisionConfig> {
    let config = store.load()?;
    validate_config(&config, STEP_NAMES)?;
    Ok(config)
}

/// Write the default configuration unless a file already exists.
///
/// Returns `true` when a file was written.
///
/// # Errors
///
/// Returns an error if the path cannot be resolved or the file cannot be written.
pub fn init_config(store: &impl ConfigStore) -> Result<bool> {
    if store.exists()? {
        return Ok(false);
    }
    store.save(&ProvisionConfig::default())?;
    Ok(true)
}
