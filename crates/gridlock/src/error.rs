//! Unified error type for the server crate.

use gridlock_protocol::ProtocolError;
use gridlock_transport::TransportError;

/// Top-level error wrapping the layer-specific errors.
///
/// Only infrastructure failures surface here (socket setup, frame I/O,
/// undecodable input). Game-rule failures never become errors; they are
/// `err` replies to the offending client, and they never cross sessions.
#[derive(Debug, thiserror::Error)]
pub enum GridlockError {
    /// A transport-level error (bind, accept, send, recv).
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// A protocol-level error (encode, decode).
    #[error(transparent)]
    Protocol(#[from] ProtocolError),
}
