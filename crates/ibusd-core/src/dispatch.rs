//! Packet dispatch and the CD-changer handler set.
//!
//! One packet is routed and fully handled, including all collaborator
//! calls, before the next is accepted. Nothing that happens inside a
//! handler may abort the processing loop: collaborator failures are
//! caught where they occur and logged.

use tracing::{debug, warn};

use ibus_packet::{devices, DeviceId, Packet};

use crate::constants;
use crate::{
    AudioController, BusWriter, Directive, DirectiveTable, DisplayController, MatchOutcome,
    Registration, SpeedTrigger, StatePublisher, VehicleState,
};

// ============================================================================
// Outcome Types
// ============================================================================

/// Outcome of feeding one packet through the dispatcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// A directive matched and its handler ran.
    Handled(Directive),
    /// No rule applied and the packet was left alone. The announcement
    /// fallback may still have fired.
    Unrouted(MatchOutcome),
}

/// Running totals over dispatched packets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchStats {
    /// Packets a handler ran for.
    pub handled: u64,
    /// Packets no rule applied to.
    pub unrouted: u64,
    /// Announcement writes emitted while unregistered.
    pub announcements: u64,
}

// ============================================================================
// Dispatcher
// ============================================================================

/// Routes packets against the directive table and runs the matched
/// handler against the collaborators.
pub struct Dispatcher<W, A, D, P> {
    table: DirectiveTable,
    registration: Registration,
    trigger: SpeedTrigger,
    writer: W,
    audio: A,
    display: D,
    publisher: P,
    stats: DispatchStats,
}

impl<W, A, D, P> Dispatcher<W, A, D, P>
where
    W: BusWriter,
    A: AudioController,
    D: DisplayController,
    P: StatePublisher,
{
    pub fn new(
        table: DirectiveTable,
        registration: Registration,
        trigger: SpeedTrigger,
        writer: W,
        audio: A,
        display: D,
        publisher: P,
    ) -> Self {
        Dispatcher {
            table,
            registration,
            trigger,
            writer,
            audio,
            display,
            publisher,
            stats: DispatchStats::default(),
        }
    }

    /// Registration state, for callers that report on it.
    pub fn registration(&self) -> &Registration {
        &self.registration
    }

    /// Totals since startup.
    pub fn stats(&self) -> DispatchStats {
        self.stats
    }

    /// Route one packet and run the matched handler.
    ///
    /// Unrouted packets are expected traffic and logged at debug level
    /// only; while the device is unregistered they additionally emit the
    /// re-announcement write.
    pub fn dispatch(&mut self, packet: &Packet) -> DispatchOutcome {
        match self.table.route(packet) {
            MatchOutcome::Matched(directive) => {
                debug!("directive {:?} matched packet {}", directive, packet);
                self.run(directive, packet);
                self.stats.handled += 1;
                DispatchOutcome::Handled(directive)
            }
            outcome => {
                debug!("no directive for packet {}: {:?}", packet, outcome);
                self.stats.unrouted += 1;
                self.announce_if_unregistered();
                DispatchOutcome::Unrouted(outcome)
            }
        }
    }

    fn run(&mut self, directive: Directive, packet: &Packet) {
        match directive {
            Directive::IkeTelemetry => self.on_ike_telemetry(packet),
            Directive::PollResponse => self.on_poll_response(),
            Directive::SendStatus => self.on_send_status(),
            Directive::StopPlaying => self.on_stop_playing(),
            Directive::StartPlaying => self.on_start_playing(),
            Directive::NextTrack => self.on_next_track(),
            Directive::PrevTrack => self.on_prev_track(),
            Directive::ScanForward => self.on_scan_forward(),
            Directive::ScanBackward => self.on_scan_backward(),
            Directive::ToggleRandom => self.on_toggle_random(),
        }
    }

    // ========================================================================
    // Handlers
    // ========================================================================

    /// Instrument-cluster broadcasts of every kind land here through the
    /// wildcard rule; only the speed/RPM message (tag `0x18`) is parsed.
    fn on_ike_telemetry(&mut self, packet: &Packet) {
        if packet.dat.first() != Some(&constants::IKE_SPEED_RPM) {
            return;
        }
        let (speed_raw, revs) = match (packet.dat.get(1), packet.dat.get(2)) {
            (Some(speed_raw), Some(revs)) => (*speed_raw, *revs),
            _ => {
                debug!("speed/RPM payload too short: {}", packet);
                return;
            }
        };
        let state = VehicleState {
            speed: u16::from(speed_raw) * 2,
            revs: u16::from(revs),
        };
        if let Err(err) = self.publisher.publish(&state) {
            warn!("failed to publish vehicle state: {}", err);
        }
        self.trigger
            .observe(state.speed, &mut self.audio, &mut self.display);
    }

    fn on_poll_response(&mut self) {
        self.registration.mark_registered();
        self.write(devices::BROADCAST, &constants::POLL_ACK);
    }

    fn on_send_status(&mut self) {
        self.write(devices::RADIO, &constants::STATUS_PLAYING);
    }

    fn on_stop_playing(&mut self) {
        if let Err(err) = self.audio.pause() {
            warn!("failed to pause playback: {}", err);
        }
        self.write(devices::RADIO, &constants::STATUS_STOPPED);
        if let Err(err) = self.display.set_power(false) {
            warn!("failed to turn the display off: {}", err);
        }
    }

    fn on_start_playing(&mut self) {
        if let Err(err) = self.audio.play() {
            warn!("failed to resume playback: {}", err);
        }
        self.write(devices::RADIO, &constants::STATUS_PLAYING);
        if let Err(err) = self.display.set_power(true) {
            warn!("failed to turn the display on: {}", err);
        }
    }

    fn on_next_track(&mut self) {
        if let Err(err) = self.audio.next() {
            warn!("failed to advance to the next track: {}", err);
        }
        self.write(devices::RADIO, &constants::STATUS_TRACK_CHANGE);
        self.refresh_track_display();
    }

    fn on_prev_track(&mut self) {
        if let Err(err) = self.audio.previous() {
            warn!("failed to return to the previous track: {}", err);
        }
        self.write(devices::RADIO, &constants::STATUS_TRACK_CHANGE);
        self.refresh_track_display();
    }

    fn on_scan_forward(&mut self) {
        self.write(devices::RADIO, &constants::STATUS_SCAN_FORWARD);
        if let Err(err) = self.audio.seek(constants::SCAN_SEEK_SECS) {
            warn!("failed to seek forward: {}", err);
        }
    }

    fn on_scan_backward(&mut self) {
        self.write(devices::RADIO, &constants::STATUS_SCAN_BACKWARD);
        if let Err(err) = self.audio.seek(-constants::SCAN_SEEK_SECS) {
            warn!("failed to seek backward: {}", err);
        }
    }

    fn on_toggle_random(&mut self) {
        match self.audio.random(0, true) {
            Ok(enabled) => {
                let text = if enabled { "Random: ON" } else { "Random: OFF" };
                if let Err(err) = self.display.immediate_text(text) {
                    warn!("failed to show shuffle mode: {}", err);
                }
            }
            Err(err) => warn!("failed to toggle shuffle mode: {}", err),
        }
    }

    // ========================================================================
    // Helpers
    // ========================================================================

    /// Push the current track's artist and title to the display queue.
    fn refresh_track_display(&mut self) {
        let track = match self.audio.current_track() {
            Ok(track) => track,
            Err(err) => {
                warn!("failed to query the current track: {}", err);
                return;
            }
        };
        if let Err(err) = self.display.set_queue(&[track.artist, track.title]) {
            warn!("failed to update the track display: {}", err);
        }
    }

    /// While unregistered, ask the radio to poll us. Fires on every
    /// unrouted packet; never after registration.
    fn announce_if_unregistered(&mut self) {
        if self.registration.is_registered() {
            return;
        }
        self.write(devices::BROADCAST, &constants::ANNOUNCE);
        self.stats.announcements += 1;
    }

    /// Emit one bus write from the changer. Failures are logged and the
    /// write is not retried.
    fn write(&mut self, dst: DeviceId, payload: &[u8]) {
        let packet = Packet::new(devices::CD_CHANGER, dst, payload.to_vec());
        if let Err(err) = self.writer.write(&packet) {
            warn!("bus write to {} failed: {}", dst, err);
        }
    }
}
