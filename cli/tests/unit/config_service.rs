//! Tests for configuration loading, validation and `config init`.

#![allow(clippy::expect_used)]

use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::Result;
use pisetup_cli::application::ports::ConfigStore;
use pisetup_cli::application::services::config_service::{init_config, load_config};
use pisetup_cli::domain::{ConfigError, FailurePolicy, ProvisionConfig};

// ── Mock: in-memory config store ──────────────────────────────────────────────

#[derive(Default)]
struct MemoryConfigStore {
    saved: Mutex<Option<ProvisionConfig>>,
    save_calls: Mutex<u32>,
}

impl MemoryConfigStore {
    fn with(config: ProvisionConfig) -> Self {
        Self {
            saved: Mutex::new(Some(config)),
            save_calls: Mutex::new(0),
        }
    }
}

impl ConfigStore for MemoryConfigStore {
    fn load(&self) -> Result<ProvisionConfig> {
        Ok(self.saved.lock().expect("lock").clone().unwrap_or_default())
    }

    fn save(&self, config: &ProvisionConfig) -> Result<()> {
        *self.saved.lock().expect("lock") = Some(config.clone());
        *self.save_calls.lock().expect("lock") += 1;
        Ok(())
    }

    fn path(&self) -> Result<PathBuf> {
        Ok(PathBuf::from("/tmp/pisetup/config.yaml"))
    }

    fn exists(&self) -> Result<bool> {
        Ok(self.saved.lock().expect("lock").is_some())
    }
}

#[test]
fn test_load_without_file_gives_defaults() {
    let store = MemoryConfigStore::default();
    let config = load_config(&store).expect("load");
    assert_eq!(config, ProvisionConfig::default());
    assert_eq!(config.policy, FailurePolicy::FailFast);
}

#[test]
fn test_load_rejects_unknown_skip_entry() {
    let store = MemoryConfigStore::with(ProvisionConfig {
        skip: vec!["emacs".to_string()],
        ..ProvisionConfig::default()
    });
    let err = load_config(&store).expect_err("unknown step");
    assert!(matches!(
        err.downcast_ref::<ConfigError>(),
        Some(ConfigError::UnknownStep { name, .. }) if name == "emacs"
    ));
}

#[test]
fn test_load_rejects_package_with_shell_metacharacters() {
    let store = MemoryConfigStore::with(ProvisionConfig {
        packages: vec!["git; rm -rf /".to_string()],
        ..ProvisionConfig::default()
    });
    assert!(load_config(&store).is_err());
}

#[test]
fn test_init_writes_defaults_once() {
    let store = MemoryConfigStore::default();
    assert!(init_config(&store).expect("init"));
    assert!(!init_config(&store).expect("init"));
    assert_eq!(*store.save_calls.lock().expect("lock"), 1);
}

#[test]
fn test_init_leaves_existing_config_untouched() {
    let custom = ProvisionConfig {
        policy: FailurePolicy::KeepGoing,
        ..ProvisionConfig::default()
    };
    let store = MemoryConfigStore::with(custom.clone());
    assert!(!init_config(&store).expect("init"));
    assert_eq!(load_config(&store).expect("load"), custom);
}
