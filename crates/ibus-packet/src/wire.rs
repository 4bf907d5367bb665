//! Wire (JSON) form of packets.
//!
//! The interface daemon owns the serial port and the physical byte
//! framing; packets cross the socket between it and ibusd as
//! newline-delimited JSON objects:
//!
//! ```text
//! {"src":"68","dst":"18","dat":["38","01","00"]}
//! ```
//!
//! Every field is optional at this layer. [`WirePacket::validate`] is the
//! single place a malformed packet is rejected, before any routing can
//! look at it.

use serde::{Deserialize, Serialize};

use crate::{parse_hex_byte, DeviceId, Packet, PacketError};

/// A packet as it appears on the interface socket.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WirePacket {
    /// Sending device address, two hex digits.
    #[serde(default)]
    pub src: Option<String>,
    /// Recipient device address, two hex digits.
    #[serde(default)]
    pub dst: Option<String>,
    /// Payload byte identifiers, two hex digits each, in wire order.
    #[serde(default)]
    pub dat: Option<Vec<String>>,
}

impl WirePacket {
    /// Validate the wire form into a [`Packet`].
    ///
    /// A missing `src` or `dst` or a malformed byte identifier is a
    /// precondition violation surfaced here as a [`PacketError`]; an
    /// absent `dat` is an empty payload.
    pub fn validate(&self) -> Result<Packet, PacketError> {
        let src = device_field("src", &self.src)?;
        let dst = device_field("dst", &self.dst)?;

        let mut dat = Vec::new();
        if let Some(raw) = &self.dat {
            dat.reserve(raw.len());
            for value in raw {
                match parse_hex_byte(value) {
                    Some(byte) => dat.push(byte),
                    None => {
                        return Err(PacketError::InvalidByte {
                            field: "dat",
                            value: value.clone(),
                        })
                    }
                }
            }
        }

        Ok(Packet::new(src, dst, dat))
    }
}

fn device_field(field: &'static str, value: &Option<String>) -> Result<DeviceId, PacketError> {
    let raw = match value {
        Some(raw) => raw,
        None => return Err(PacketError::MissingField(field)),
    };
    DeviceId::from_hex(raw).ok_or_else(|| PacketError::InvalidByte {
        field,
        value: raw.clone(),
    })
}

impl From<&Packet> for WirePacket {
    fn from(packet: &Packet) -> Self {
        WirePacket {
            src: Some(packet.src.to_string()),
            dst: Some(packet.dst.to_string()),
            dat: Some(packet.dat.iter().map(|b| format!("{:02X}", b)).collect()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::devices;

    #[test]
    fn test_validate_full_packet() {
        let wire: WirePacket =
            serde_json::from_str(r#"{"src":"68","dst":"18","dat":["38","01","00"]}"#)
                .expect("valid json");
        let packet = wire.validate().expect("valid packet");
        assert_eq!(packet.src, devices::RADIO);
        assert_eq!(packet.dst, devices::CD_CHANGER);
        assert_eq!(packet.dat, vec![0x38, 0x01, 0x00]);
    }

    #[test]
    fn test_validate_missing_src() {
        let wire: WirePacket =
            serde_json::from_str(r#"{"dst":"18","dat":["01"]}"#).expect("valid json");
        assert_eq!(wire.validate(), Err(PacketError::MissingField("src")));
    }

    #[test]
    fn test_validate_missing_dst() {
        let wire: WirePacket = serde_json::from_str(r#"{"src":"68"}"#).expect("valid json");
        assert_eq!(wire.validate(), Err(PacketError::MissingField("dst")));
    }

    #[test]
    fn test_validate_absent_payload_is_empty() {
        let wire: WirePacket =
            serde_json::from_str(r#"{"src":"80","dst":"BF"}"#).expect("valid json");
        let packet = wire.validate().expect("valid packet");
        assert!(packet.dat.is_empty());
        assert_eq!(packet.data_signature(), "");
    }

    #[test]
    fn test_validate_rejects_bad_payload_byte() {
        let wire: WirePacket =
            serde_json::from_str(r#"{"src":"68","dst":"18","dat":["38","1"]}"#)
                .expect("valid json");
        assert_eq!(
            wire.validate(),
            Err(PacketError::InvalidByte {
                field: "dat",
                value: "1".to_string(),
            })
        );
    }

    #[test]
    fn test_outbound_wire_form_is_uppercase() {
        let packet = Packet::new(devices::CD_CHANGER, devices::BROADCAST, vec![0x02, 0x01]);
        let wire = WirePacket::from(&packet);
        let json = serde_json::to_string(&wire).expect("serializable");
        assert_eq!(json, r#"{"src":"18","dst":"FF","dat":["02","01"]}"#);
    }
}
