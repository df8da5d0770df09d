//! WebSocket transport for Gridlock.
//!
//! The contract the rest of the server relies on: a full-duplex, ordered,
//! reliable message stream per client, with observable end-of-stream and the
//! ability to close from the server side. Each accepted connection splits
//! into two independently owned halves, because the inbound and outbound
//! flows of a connection live in different tasks and must be able to
//! terminate independently.

mod error;
mod websocket;

pub use error::TransportError;
pub use websocket::{WsConnection, WsListener, WsReader, WsWriter};

use std::fmt;

/// Opaque identifier for a connection, unique within the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(u64);

impl ConnectionId {
    /// Creates a new `ConnectionId` from a raw `u64`.
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the underlying `u64` value.
    pub fn into_inner(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "conn-{}", self.0)
    }
}
