//! Host probe: reads the device-tree board model.

use std::path::PathBuf;

use crate::application::ports::HostProbe;
use crate::domain::host::{DEVICE_TREE_MODEL_PATH, normalize_model};

/// Reads the model string from `/proc/device-tree/model`, or from the path in
/// `PISETUP_MODEL_PATH` when set.
pub struct DeviceTreeProbe {
    path: PathBuf,
}

impl DeviceTreeProbe {
    #[must_use]
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    #[must_use]
    pub fn from_env() -> Self {
        let path = std::env::var_os("PISETUP_MODEL_PATH")
            .map_or_else(|| PathBuf::from(DEVICE_TREE_MODEL_PATH), PathBuf::from);
        Self::new(path)
    }
}

impl HostProbe for DeviceTreeProbe {
    fn model(&self) -> Option<String> {
        // The file is raw bytes with a trailing NUL.
        let raw = std::fs::read(&self.path).ok()?;
        let model = normalize_model(&String::from_utf8_lossy(&raw));
        (!model.is_empty()).then_some(model)
    }
}
