//! CD-changer wire payloads.
//!
//! Byte sequences the emulated changer puts on the bus. The `0x3F` in
//! the status replies is the fixed track field: real track numbers can
//! exceed 99 and the radio converts the field to decimal for display,
//! so a constant is sent instead.

/// Announcement asking the radio to poll this device (sent to broadcast
/// while unregistered).
pub const ANNOUNCE: [u8; 2] = [0x02, 0x01];

/// Acknowledgment of a radio poll (sent to broadcast).
pub const POLL_ACK: [u8; 2] = [0x02, 0x00];

/// Status reply: playing.
pub const STATUS_PLAYING: [u8; 8] = [0x39, 0x00, 0x09, 0x00, 0x3F, 0x00, 0x01, 0x01];

/// Status reply: stopped.
pub const STATUS_STOPPED: [u8; 8] = [0x39, 0x00, 0x02, 0x00, 0x3F, 0x00, 0x01, 0x00];

/// Status reply acknowledging a track change.
pub const STATUS_TRACK_CHANGE: [u8; 8] = [0x39, 0x02, 0x09, 0x00, 0x3F, 0x00, 0x01, 0x01];

/// Status reply: scanning forward.
pub const STATUS_SCAN_FORWARD: [u8; 8] = [0x39, 0x03, 0x09, 0x00, 0x3F, 0x00, 0x01, 0x01];

/// Status reply: scanning backward.
pub const STATUS_SCAN_BACKWARD: [u8; 8] = [0x39, 0x04, 0x09, 0x00, 0x3F, 0x00, 0x01, 0x01];

/// Tag byte of the instrument-cluster speed/RPM telemetry payload.
pub const IKE_SPEED_RPM: u8 = 0x18;

/// Seek offset applied per scan command, in seconds.
pub const SCAN_SEEK_SECS: i32 = 2;
