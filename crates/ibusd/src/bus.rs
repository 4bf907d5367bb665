//! Connection to the bus interface daemon.
//!
//! The interface process owns the serial port and the physical byte
//! framing. Packets cross this socket as newline-delimited JSON in both
//! directions, so the receiving side here is a line reader and the
//! sending side implements [`BusWriter`] for the dispatcher.

use std::io::{BufRead, BufReader, ErrorKind, Write};
use std::net::TcpStream;
use std::time::Duration;

use ibus_packet::{Packet, WirePacket};
use ibusd_core::{BackendError, BusWriter};

use crate::DaemonError;

/// How long one read waits before handing control back to the loop so
/// it can check the stop flag.
const READ_TIMEOUT: Duration = Duration::from_millis(250);

/// Result of polling the bus for the next packet.
#[derive(Debug)]
pub enum BusRead {
    /// A complete, valid packet arrived.
    Packet(Packet),
    /// Nothing complete arrived within the read timeout.
    Idle,
    /// The interface daemon closed the connection.
    Eof,
}

/// Receiving half of the bus connection.
pub struct BusReceiver {
    reader: BufReader<TcpStream>,
    /// Partial line carried across read timeouts.
    pending: String,
}

/// Sending half of the bus connection.
pub struct BusSender {
    stream: TcpStream,
}

/// Connect to the interface daemon at `addr` ("host:port").
pub fn connect(addr: &str) -> Result<(BusReceiver, BusSender), DaemonError> {
    let stream = TcpStream::connect(addr).map_err(|source| DaemonError::Connect {
        target: "bus interface",
        addr: addr.to_string(),
        source,
    })?;
    stream.set_read_timeout(Some(READ_TIMEOUT))?;
    let sender = stream.try_clone()?;
    Ok((
        BusReceiver {
            reader: BufReader::new(stream),
            pending: String::new(),
        },
        BusSender { stream: sender },
    ))
}

impl BusReceiver {
    /// Poll for the next packet.
    ///
    /// A malformed line is an error the caller logs and skips; the
    /// stream itself stays usable afterwards.
    pub fn poll(&mut self) -> Result<BusRead, DaemonError> {
        match self.reader.read_line(&mut self.pending) {
            Ok(0) => Ok(BusRead::Eof),
            Ok(_) => {
                let line = std::mem::take(&mut self.pending);
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    return Ok(BusRead::Idle);
                }
                let wire: WirePacket = serde_json::from_str(trimmed)
                    .map_err(|err| DaemonError::BadFrame(err.to_string()))?;
                Ok(BusRead::Packet(wire.validate()?))
            }
            Err(err) if matches!(err.kind(), ErrorKind::WouldBlock | ErrorKind::TimedOut) => {
                // Partial input (if any) stays buffered in `pending`.
                Ok(BusRead::Idle)
            }
            Err(err) => Err(DaemonError::Io(err)),
        }
    }
}

impl BusWriter for BusSender {
    fn write(&mut self, packet: &Packet) -> Result<(), BackendError> {
        let mut line = serde_json::to_string(&WirePacket::from(packet))
            .map_err(|err| BackendError::Protocol(err.to_string()))?;
        line.push('\n');
        self.stream.write_all(line.as_bytes())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;
    use std::net::TcpListener;

    use ibus_packet::devices;

    fn pair() -> (BusReceiver, BusSender, TcpStream) {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
        let addr = listener.local_addr().expect("local addr").to_string();
        let (receiver, sender) = connect(&addr).expect("connect");
        let (server, _) = listener.accept().expect("accept");
        (receiver, sender, server)
    }

    fn poll_until_packet(receiver: &mut BusReceiver) -> Packet {
        for _ in 0..40 {
            match receiver.poll().expect("poll") {
                BusRead::Packet(packet) => return packet,
                BusRead::Idle => continue,
                BusRead::Eof => panic!("unexpected eof"),
            }
        }
        panic!("no packet within the polling budget");
    }

    #[test]
    fn test_reads_newline_delimited_packets() {
        let (mut receiver, _sender, mut server) = pair();
        server
            .write_all(b"{\"src\":\"68\",\"dst\":\"18\",\"dat\":[\"01\"]}\n")
            .expect("server write");

        let packet = poll_until_packet(&mut receiver);
        assert_eq!(packet.src, devices::RADIO);
        assert_eq!(packet.dst, devices::CD_CHANGER);
        assert_eq!(packet.dat, vec![0x01]);
    }

    #[test]
    fn test_undecodable_line_is_an_error_but_stream_survives() {
        let (mut receiver, _sender, mut server) = pair();
        server.write_all(b"not json\n").expect("server write");
        server
            .write_all(b"{\"src\":\"80\",\"dst\":\"BF\"}\n")
            .expect("server write");

        let err = loop {
            match receiver.poll() {
                Ok(BusRead::Idle) => continue,
                Ok(other) => panic!("expected an error, got {:?}", other),
                Err(err) => break err,
            }
        };
        assert!(matches!(err, DaemonError::BadFrame(_)));

        // The next line still parses.
        let packet = poll_until_packet(&mut receiver);
        assert_eq!(packet.src, devices::IKE);
        assert!(packet.dat.is_empty());
    }

    #[test]
    fn test_malformed_packet_surfaces_packet_error() {
        let (mut receiver, _sender, mut server) = pair();
        server
            .write_all(b"{\"dst\":\"18\",\"dat\":[\"01\"]}\n")
            .expect("server write");

        let err = loop {
            match receiver.poll() {
                Ok(BusRead::Idle) => continue,
                Ok(other) => panic!("expected an error, got {:?}", other),
                Err(err) => break err,
            }
        };
        assert!(matches!(err, DaemonError::Packet(_)));
    }

    #[test]
    fn test_eof_when_interface_disconnects() {
        let (mut receiver, _sender, server) = pair();
        drop(server);

        for _ in 0..40 {
            match receiver.poll().expect("poll") {
                BusRead::Eof => return,
                BusRead::Idle => continue,
                BusRead::Packet(packet) => panic!("unexpected packet {}", packet),
            }
        }
        panic!("no eof within the polling budget");
    }

    #[test]
    fn test_sender_writes_wire_form_lines() {
        let (receiver, mut sender, mut server) = pair();
        let packet = Packet::new(devices::CD_CHANGER, devices::BROADCAST, vec![0x02, 0x01]);
        sender.write(&packet).expect("bus write");
        // Both halves hold the same socket; close them so the server
        // side sees EOF.
        drop(sender);
        drop(receiver);

        let mut raw = String::new();
        server.read_to_string(&mut raw).expect("server read");
        assert_eq!(raw, "{\"src\":\"18\",\"dst\":\"FF\",\"dat\":[\"02\",\"01\"]}\n");
    }
}
