//! Directive table and packet routing.
//!
//! The table is a three-level mapping: source device, then destination
//! device, then payload signature. The third level is either a wildcard
//! (any payload routes to one handler) or a set of exact signatures;
//! the type makes the two mutually exclusive, so wildcard priority is a
//! structural guarantee rather than a lookup-order convention.
//!
//! The table is configuration: built once at startup, never mutated
//! while packets flow.

use std::collections::HashMap;

use ibus_packet::{devices, DeviceId, Packet};

/// Identifier of a packet handler.
///
/// Every table entry carries one of these, so a rule can never name a
/// handler that does not exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Directive {
    /// Parse instrument-cluster telemetry (speed/RPM).
    IkeTelemetry,
    /// Answer a radio poll and mark the device registered.
    PollResponse,
    /// Report playback status to the radio.
    SendStatus,
    /// Pause playback, report stopped, display off.
    StopPlaying,
    /// Resume playback, report playing, display on.
    StartPlaying,
    /// Advance to the next track.
    NextTrack,
    /// Return to the previous track.
    PrevTrack,
    /// Scan forward within the current track.
    ScanForward,
    /// Scan backward within the current track.
    ScanBackward,
    /// Toggle shuffle mode.
    ToggleRandom,
}

/// Rule set for one (source, destination) pair.
#[derive(Debug, Clone)]
pub enum DestinationRule {
    /// Any payload routes to the one handler.
    Wildcard(Directive),
    /// Exact payload signature → handler. No partial or prefix matching.
    Exact(HashMap<String, Directive>),
}

/// Outcome of routing one packet.
///
/// The three no-rule outcomes are operationally equivalent (no handler
/// runs) but are distinguished for diagnostics. None of them is a
/// fault: most bus traffic is not addressed to us.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchOutcome {
    /// A handler matched.
    Matched(Directive),
    /// The packet's source has no rules at all.
    NoSourceRule,
    /// The source is known but not this destination.
    NoDestinationRule,
    /// Source and destination are known but the payload matched nothing.
    NoDataRule,
}

/// Static, three-level rule set mapping packets to handlers.
#[derive(Debug, Clone, Default)]
pub struct DirectiveTable {
    rules: HashMap<DeviceId, HashMap<DeviceId, DestinationRule>>,
}

impl DirectiveTable {
    /// Create an empty table.
    pub fn new() -> Self {
        DirectiveTable {
            rules: HashMap::new(),
        }
    }

    /// Install the rule for a (source, destination) pair, replacing any
    /// previous rule for that pair.
    pub fn insert(&mut self, src: DeviceId, dst: DeviceId, rule: DestinationRule) {
        self.rules.entry(src).or_default().insert(dst, rule);
    }

    /// The CD-changer rule set.
    ///
    /// Instrument-cluster broadcasts vary in payload, so they route
    /// through a wildcard; everything from the radio matches on exact
    /// payload signatures.
    pub fn cd_changer() -> Self {
        let mut table = DirectiveTable::new();

        table.insert(
            devices::IKE,
            devices::GLOBAL_BROADCAST,
            DestinationRule::Wildcard(Directive::IkeTelemetry),
        );

        let mut radio = HashMap::new();
        radio.insert("01".to_string(), Directive::PollResponse);
        radio.insert("380000".to_string(), Directive::SendStatus);
        radio.insert("380100".to_string(), Directive::StopPlaying);
        radio.insert("380300".to_string(), Directive::StartPlaying);
        radio.insert("380A00".to_string(), Directive::NextTrack);
        radio.insert("380A01".to_string(), Directive::PrevTrack);
        // Two payload codes map to each scan handler.
        radio.insert("380700".to_string(), Directive::ScanForward);
        radio.insert("380400".to_string(), Directive::ScanForward);
        radio.insert("380701".to_string(), Directive::ScanBackward);
        radio.insert("380401".to_string(), Directive::ScanBackward);
        radio.insert("380800".to_string(), Directive::ToggleRandom);
        radio.insert("380801".to_string(), Directive::ToggleRandom);
        table.insert(
            devices::RADIO,
            devices::CD_CHANGER,
            DestinationRule::Exact(radio),
        );

        table
    }

    /// Match a packet against the table.
    ///
    /// Three-level exact lookup; the routing decision depends only on
    /// the packet and the table, so repeated calls with the same packet
    /// return the same outcome.
    pub fn route(&self, packet: &Packet) -> MatchOutcome {
        let destinations = match self.rules.get(&packet.src) {
            Some(destinations) => destinations,
            None => return MatchOutcome::NoSourceRule,
        };
        let rule = match destinations.get(&packet.dst) {
            Some(rule) => rule,
            None => return MatchOutcome::NoDestinationRule,
        };
        match rule {
            DestinationRule::Wildcard(directive) => MatchOutcome::Matched(*directive),
            DestinationRule::Exact(signatures) => {
                match signatures.get(&packet.data_signature()) {
                    Some(directive) => MatchOutcome::Matched(*directive),
                    None => MatchOutcome::NoDataRule,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn radio_packet(dat: Vec<u8>) -> Packet {
        Packet::new(devices::RADIO, devices::CD_CHANGER, dat)
    }

    #[test]
    fn test_unknown_source() {
        let table = DirectiveTable::cd_changer();
        let packet = Packet::new(DeviceId(0x50), devices::CD_CHANGER, vec![0x01]);
        assert_eq!(table.route(&packet), MatchOutcome::NoSourceRule);
    }

    #[test]
    fn test_unknown_destination() {
        let table = DirectiveTable::cd_changer();
        let packet = Packet::new(devices::RADIO, DeviceId(0x60), vec![0x01]);
        assert_eq!(table.route(&packet), MatchOutcome::NoDestinationRule);
    }

    #[test]
    fn test_unknown_payload() {
        let table = DirectiveTable::cd_changer();
        assert_eq!(
            table.route(&radio_packet(vec![0x38, 0x0F, 0x00])),
            MatchOutcome::NoDataRule
        );
    }

    #[test]
    fn test_stop_playing_signature() {
        let table = DirectiveTable::cd_changer();
        assert_eq!(
            table.route(&radio_packet(vec![0x38, 0x01, 0x00])),
            MatchOutcome::Matched(Directive::StopPlaying)
        );
    }

    #[test]
    fn test_poll_signature() {
        let table = DirectiveTable::cd_changer();
        assert_eq!(
            table.route(&radio_packet(vec![0x01])),
            MatchOutcome::Matched(Directive::PollResponse)
        );
    }

    #[test]
    fn test_wildcard_matches_any_payload() {
        let table = DirectiveTable::cd_changer();
        for dat in [vec![], vec![0x18], vec![0x18, 0x41, 0x30], vec![0xAA, 0xBB]] {
            let packet = Packet::new(devices::IKE, devices::GLOBAL_BROADCAST, dat);
            assert_eq!(
                table.route(&packet),
                MatchOutcome::Matched(Directive::IkeTelemetry)
            );
        }
    }

    #[test]
    fn test_scan_code_aliases() {
        let table = DirectiveTable::cd_changer();
        for dat in [vec![0x38, 0x07, 0x00], vec![0x38, 0x04, 0x00]] {
            assert_eq!(
                table.route(&radio_packet(dat)),
                MatchOutcome::Matched(Directive::ScanForward)
            );
        }
        for dat in [vec![0x38, 0x07, 0x01], vec![0x38, 0x04, 0x01]] {
            assert_eq!(
                table.route(&radio_packet(dat)),
                MatchOutcome::Matched(Directive::ScanBackward)
            );
        }
    }

    #[test]
    fn test_routing_is_idempotent() {
        let table = DirectiveTable::cd_changer();
        let packet = radio_packet(vec![0x38, 0x03, 0x00]);
        let first = table.route(&packet);
        let second = table.route(&packet);
        assert_eq!(first, second);
        assert_eq!(first, MatchOutcome::Matched(Directive::StartPlaying));
    }

    #[test]
    fn test_empty_payload_has_no_rule() {
        let table = DirectiveTable::cd_changer();
        assert_eq!(table.route(&radio_packet(vec![])), MatchOutcome::NoDataRule);
    }
}
