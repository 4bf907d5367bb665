//! I-Bus packet model
//!
//! This crate provides the packet types shared by the ibusd daemon and its
//! tooling. A packet is a source device, a destination device, and an
//! ordered payload of bytes. Device addresses and payload bytes cross every
//! textual boundary as two uppercase hex digits (`"3F"`), matching the
//! format the bus interface daemon speaks.
//!
//! # Example
//!
//! ```rust,ignore
//! use ibus_packet::{devices, Packet, WirePacket};
//!
//! // Parse a packet received from the interface daemon
//! let wire: WirePacket = serde_json::from_str(line)?;
//! let packet = wire.validate()?;
//!
//! // Build a reply
//! let reply = Packet::new(devices::CD_CHANGER, devices::RADIO, vec![0x39, 0x00]);
//! ```

pub mod devices;
mod error;
mod packet;
mod wire;

pub use error::*;
pub use packet::*;
pub use wire::*;
