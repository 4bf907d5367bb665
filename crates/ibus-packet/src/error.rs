//! Packet error types.

use thiserror::Error;

/// Errors produced when validating a wire-form packet.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PacketError {
    /// A required field was absent from the wire form.
    #[error("packet is missing required field '{0}'")]
    MissingField(&'static str),

    /// A byte identifier was not two hex digits.
    #[error("invalid byte identifier '{value}' in field '{field}'")]
    InvalidByte {
        /// Field the identifier appeared in.
        field: &'static str,
        /// The offending string.
        value: String,
    },
}
