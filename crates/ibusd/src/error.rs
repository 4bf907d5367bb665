//! Daemon error types.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that end the daemon (or one startup attempt).
///
/// Per-packet problems are not here on purpose: malformed packets and
/// collaborator failures are logged and skipped by the processing loop.
#[derive(Error, Debug)]
pub enum DaemonError {
    /// A backend endpoint could not be reached at startup.
    #[error("failed to connect to the {target} at {addr}: {source}")]
    Connect {
        /// Which collaborator ("bus interface", "audio backend", ...).
        target: &'static str,
        addr: String,
        #[source]
        source: std::io::Error,
    },

    /// The bus connection failed mid-stream.
    #[error("bus i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// A line from the interface daemon was not a JSON packet.
    #[error("undecodable bus frame: {0}")]
    BadFrame(String),

    /// A decoded frame failed packet validation.
    #[error(transparent)]
    Packet(#[from] ibus_packet::PacketError),

    /// The config file could not be read.
    #[error("failed to read config {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The config file could not be parsed.
    #[error("failed to parse config {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// The ctrl-c handler could not be installed.
    #[error("failed to install the shutdown handler: {0}")]
    Shutdown(#[from] ctrlc::Error),
}
