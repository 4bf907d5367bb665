//! Contracts of the external collaborators the dispatcher drives.
//!
//! The audio player, the cluster display, the bus transport, and the
//! telemetry consumer all live in other processes; these traits are the
//! narrow surface the handlers see. Implementations are expected to be
//! quick and non-blocking from the dispatcher's perspective; if the
//! underlying transport can stall, that is the implementation's problem
//! to solve.

use serde::Serialize;

use ibus_packet::Packet;

use crate::BackendError;

/// Writes packets onto the bus.
///
/// Payload byte order is preserved on the wire. Delivery is not
/// guaranteed and failed writes are never retried here.
pub trait BusWriter {
    /// Queue one packet for transmission.
    fn write(&mut self, packet: &Packet) -> Result<(), BackendError>;
}

/// Metadata for one playlist entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackInfo {
    /// Playlist id of the track.
    pub id: u32,
    pub artist: String,
    pub title: String,
}

/// Playback control surface of the audio backend.
pub trait AudioController {
    fn play(&mut self) -> Result<(), BackendError>;
    fn pause(&mut self) -> Result<(), BackendError>;
    fn next(&mut self) -> Result<(), BackendError>;
    fn previous(&mut self) -> Result<(), BackendError>;

    /// Seek within the current track by the given offset in seconds.
    fn seek(&mut self, offset_secs: i32) -> Result<(), BackendError>;

    /// Toggle or seed shuffle mode; returns the resulting mode.
    fn random(&mut self, seed: u8, toggle: bool) -> Result<bool, BackendError>;

    /// Playlist id of the track currently playing.
    fn track_id(&mut self) -> Result<u32, BackendError>;

    /// Metadata of the track currently playing.
    fn current_track(&mut self) -> Result<TrackInfo, BackendError>;

    /// Metadata of a track by playlist path.
    fn info_by_path(&mut self, path: &str) -> Result<TrackInfo, BackendError>;

    /// Append a track to the playlist by path.
    fn add_song(&mut self, path: &str) -> Result<(), BackendError>;

    /// Start playing a track by path.
    fn play_song(&mut self, path: &str) -> Result<(), BackendError>;
}

/// Text display in the instrument cluster.
pub trait DisplayController {
    /// Replace the rotating display queue with the given lines.
    fn set_queue(&mut self, lines: &[String]) -> Result<(), BackendError>;

    /// Show a text immediately, bypassing the queue.
    fn immediate_text(&mut self, text: &str) -> Result<(), BackendError>;

    /// Turn the display on or off.
    fn set_power(&mut self, on: bool) -> Result<(), BackendError>;
}

/// Telemetry snapshot derived from instrument-cluster packets.
///
/// Field names are part of the contract with the external consumer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct VehicleState {
    /// Road speed in km/h.
    pub speed: u16,
    /// Engine revolutions as reported by the cluster.
    pub revs: u16,
}

/// Publishes derived telemetry for external consumers.
///
/// Fire-and-forget: there is no acknowledgment and no reader may be
/// present at all.
pub trait StatePublisher {
    fn publish(&mut self, state: &VehicleState) -> Result<(), BackendError>;
}
