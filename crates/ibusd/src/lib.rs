//! I-Bus CD-changer emulator daemon
//!
//! ibusd connects to the bus interface daemon, routes every inbound
//! packet through the directive table, and drives the audio, display,
//! and telemetry collaborators from the matched handlers. The decision
//! logic lives in `ibusd-core`; this crate is the wiring around it:
//! configuration, logging, sockets, and the sequential processing loop.

pub mod backends;
pub mod bus;
pub mod config;
mod error;
pub mod publisher;

pub use config::DaemonConfig;
pub use error::DaemonError;

use std::sync::atomic::{AtomicBool, Ordering};

use metrics::counter;
use tracing::{info, warn};

use ibusd_core::{DirectiveTable, DispatchOutcome, Dispatcher, Registration, SpeedTrigger};

use crate::backends::{AudioClient, DisplayClient};
use crate::bus::BusRead;
use crate::publisher::FileStatePublisher;

/// Connect to every collaborator and process packets until the stop
/// flag is set or the bus connection ends.
///
/// One packet is routed and fully handled before the next is read;
/// packets from the interface are processed strictly in arrival order.
pub fn run(config: &DaemonConfig, stop: &AtomicBool) -> Result<(), DaemonError> {
    let (mut receiver, sender) = bus::connect(&config.bus_endpoint)?;
    let audio = AudioClient::connect(&config.audio_endpoint)?;
    let display = DisplayClient::connect(&config.display_endpoint)?;
    let publisher = FileStatePublisher::new(&config.state_path);

    let mut dispatcher = Dispatcher::new(
        DirectiveTable::cd_changer(),
        Registration::new(),
        SpeedTrigger::new(config.speed_trigger.clone()),
        sender,
        audio,
        display,
        publisher,
    );

    info!("connected to the bus interface at {}", config.bus_endpoint);
    while !stop.load(Ordering::Relaxed) {
        let packet = match receiver.poll() {
            Ok(BusRead::Packet(packet)) => packet,
            Ok(BusRead::Idle) => continue,
            Ok(BusRead::Eof) => {
                info!("bus interface closed the connection");
                break;
            }
            Err(err) if matches!(err, DaemonError::BadFrame(_) | DaemonError::Packet(_)) => {
                warn!("dropping packet: {}", err);
                counter!("ibusd.packets.malformed").increment(1);
                continue;
            }
            Err(err) => return Err(err),
        };

        counter!("ibusd.packets.received").increment(1);
        match dispatcher.dispatch(&packet) {
            DispatchOutcome::Handled(_) => counter!("ibusd.packets.handled").increment(1),
            DispatchOutcome::Unrouted(_) => counter!("ibusd.packets.unrouted").increment(1),
        }
    }

    let stats = dispatcher.stats();
    info!(
        "shutting down: {} handled, {} unrouted, {} announcements",
        stats.handled, stats.unrouted, stats.announcements
    );
    Ok(())
}
