//! Daemon configuration.
//!
//! YAML file with a small number of knobs; every field has a default so
//! a partial file (or none at all) works:
//!
//! ```yaml
//! bus_endpoint: "127.0.0.1:7001"
//! audio_endpoint: "127.0.0.1:7002"
//! display_endpoint: "127.0.0.1:7003"
//! state_path: "/var/run/ibusd/state.json"
//! speed_trigger:
//!   threshold: 120
//!   track_path: "Dethklok/Dethklok - The Gears.mp3"
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use ibusd_core::SpeedTriggerConfig;

use crate::DaemonError;

/// Daemon configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DaemonConfig {
    /// Address of the bus interface daemon (newline-delimited JSON
    /// packets in both directions).
    pub bus_endpoint: String,
    /// Address of the audio backend.
    pub audio_endpoint: String,
    /// Address of the display backend.
    pub display_endpoint: String,
    /// File the latest vehicle-state snapshot is written to.
    pub state_path: PathBuf,
    /// High-speed track switch settings.
    pub speed_trigger: SpeedTriggerConfig,
}

impl Default for DaemonConfig {
    fn default() -> Self {
        DaemonConfig {
            bus_endpoint: "127.0.0.1:7001".to_string(),
            audio_endpoint: "127.0.0.1:7002".to_string(),
            display_endpoint: "127.0.0.1:7003".to_string(),
            state_path: PathBuf::from("ibusd-state.json"),
            speed_trigger: SpeedTriggerConfig::default(),
        }
    }
}

/// Load the configuration from a YAML file.
pub fn load(path: &Path) -> Result<DaemonConfig, DaemonError> {
    let raw = fs::read_to_string(path).map_err(|source| DaemonError::ConfigRead {
        path: path.to_path_buf(),
        source,
    })?;
    serde_yaml::from_str(&raw).map_err(|source| DaemonError::ConfigParse {
        path: path.to_path_buf(),
        source,
    })
}
