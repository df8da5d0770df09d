//! Error types for the transport layer.

use tokio_tungstenite::tungstenite;

/// Errors that can occur in the transport layer.
///
/// `Send` and `Recv` on an established connection are expected events (the
/// peer vanished); the connection handler turns them into disconnect
/// cleanup rather than propagating them anywhere fatal.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// Binding the listening socket failed.
    #[error("bind failed: {0}")]
    Bind(#[source] std::io::Error),

    /// Accepting a TCP connection failed.
    #[error("accept failed: {0}")]
    Accept(#[source] std::io::Error),

    /// The WebSocket upgrade handshake failed.
    #[error("websocket handshake failed: {0}")]
    Handshake(#[source] tungstenite::Error),

    /// Writing a frame failed.
    #[error("send failed: {0}")]
    Send(#[source] tungstenite::Error),

    /// Reading a frame failed.
    #[error("receive failed: {0}")]
    Recv(#[source] tungstenite::Error),
}
