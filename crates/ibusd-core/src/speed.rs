//! Speed-based track switching.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::{AudioController, BackendError, DisplayController};

/// Configuration for the high-speed track switch.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SpeedTriggerConfig {
    /// Speed threshold in km/h; strictly above it the designated track
    /// is forced.
    pub threshold: u16,
    /// Playlist path of the designated track.
    pub track_path: String,
    /// Text flashed on the cluster display when the switch happens.
    pub alert_text: String,
}

impl Default for SpeedTriggerConfig {
    fn default() -> Self {
        SpeedTriggerConfig {
            threshold: 120,
            track_path: "Dethklok/Dethklok - The Gears.mp3".to_string(),
            alert_text: "HOLY SHIT".to_string(),
        }
    }
}

/// Forces playback of a designated track above a speed threshold.
///
/// Cosmetic feature: every failure is caught here and logged as a
/// warning so it can never disturb packet handling.
#[derive(Debug, Clone)]
pub struct SpeedTrigger {
    config: SpeedTriggerConfig,
}

impl SpeedTrigger {
    pub fn new(config: SpeedTriggerConfig) -> Self {
        SpeedTrigger { config }
    }

    /// Feed one observed speed value.
    pub fn observe<A, D>(&self, speed: u16, audio: &mut A, display: &mut D)
    where
        A: AudioController,
        D: DisplayController,
    {
        if speed <= self.config.threshold {
            return;
        }
        if let Err(err) = self.switch_track(audio, display) {
            warn!("failed to switch to the high-speed track: {}", err);
        }
    }

    fn switch_track<A, D>(&self, audio: &mut A, display: &mut D) -> Result<(), BackendError>
    where
        A: AudioController,
        D: DisplayController,
    {
        let designated = audio.info_by_path(&self.config.track_path)?;
        if designated.id == audio.track_id()? {
            // Already on the designated track; nothing to do.
            return Ok(());
        }
        audio.add_song(&self.config.track_path)?;
        audio.play_song(&self.config.track_path)?;
        display.immediate_text(&self.config.alert_text)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_threshold() {
        assert_eq!(SpeedTriggerConfig::default().threshold, 120);
    }
}
