//! Known I-Bus device addresses.
//!
//! Only the devices the daemon actually talks to are listed; the bus
//! carries many more.

use crate::DeviceId;

/// Instrument cluster electronics. Source of speed/RPM telemetry.
pub const IKE: DeviceId = DeviceId(0x80);

/// Radio head unit. Origin of all CD-changer commands.
pub const RADIO: DeviceId = DeviceId(0x68);

/// CD changer, the device this daemon emulates.
pub const CD_CHANGER: DeviceId = DeviceId(0x18);

/// Broadcast address.
pub const BROADCAST: DeviceId = DeviceId(0xFF);

/// Global broadcast address used by instrument-cluster messages.
pub const GLOBAL_BROADCAST: DeviceId = DeviceId(0xBF);
