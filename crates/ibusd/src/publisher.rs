//! Vehicle-state publication.

use std::fs;
use std::path::{Path, PathBuf};

use ibusd_core::{BackendError, StatePublisher, VehicleState};

/// Writes the latest vehicle state as a JSON object to a file for the
/// external consumer (e.g. a web front-end) to pick up.
///
/// Fire-and-forget: each publish replaces the whole file, and nobody
/// has to be reading it.
pub struct FileStatePublisher {
    path: PathBuf,
}

impl FileStatePublisher {
    pub fn new(path: &Path) -> Self {
        FileStatePublisher {
            path: path.to_path_buf(),
        }
    }
}

impl StatePublisher for FileStatePublisher {
    fn publish(&mut self, state: &VehicleState) -> Result<(), BackendError> {
        let json = serde_json::to_string(state)
            .map_err(|err| BackendError::Protocol(err.to_string()))?;
        fs::write(&self.path, json)?;
        Ok(())
    }
}
