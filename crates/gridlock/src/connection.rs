//! Per-connection handler: one session, two flows.
//!
//! Each accepted connection runs this handler in its own task:
//!
//! - the **outbound flow** is a spawned task that owns the write half,
//!   drains the session's queue, and stops when it dequeues the close
//!   sentinel or a write fails;
//! - the **inbound flow** runs right here: read a frame and hand the
//!   decoded message to the router.
//!
//! The flows are independently cancellable. A dead writer never blocks the
//! reader, and cleanup is triggered by inbound termination alone. The
//! inbound loop and [`SessionRouter::handle_disconnect`] run sequentially
//! in this task, so cleanup can never race a late-arriving move from the
//! same connection.

use std::sync::Arc;

use gridlock_protocol::{ClientMessage, Codec, JsonCodec};
use gridlock_session::{Outbound, Session, SessionId};
use gridlock_transport::{WsConnection, WsReader, WsWriter};
use tokio::sync::mpsc;

use crate::{GridlockError, SessionRouter};

/// Drives one connection from accept to teardown.
pub(crate) async fn handle_connection(
    conn: WsConnection,
    router: Arc<SessionRouter>,
) -> Result<(), GridlockError> {
    let session_id = SessionId::new(conn.id().into_inner());
    let (writer, reader) = conn.split();

    let (tx, rx) = mpsc::unbounded_channel();
    let session = Arc::new(Session::new(session_id, tx));
    tracing::debug!(session = %session_id, "session opened");

    let outbound = tokio::spawn(outbound_flow(writer, rx, JsonCodec));

    let result = inbound_flow(reader, &session, &router, JsonCodec).await;

    // However the inbound flow ended, run cleanup exactly once. This is
    // what enqueues the close sentinel that lets the outbound task finish.
    router.handle_disconnect(&session).await;
    let _ = outbound.await;

    tracing::debug!(session = %session_id, "session closed");
    result
}

/// Reads and dispatches frames until the peer goes away.
///
/// Returns `Ok` on a clean close and `Err` on a read or decode failure; the
/// caller treats all three identically for cleanup purposes. An undecodable
/// frame ends the connection: a client speaking the wrong protocol is
/// indistinguishable from a broken peer.
async fn inbound_flow(
    mut reader: WsReader,
    session: &Arc<Session>,
    router: &Arc<SessionRouter>,
    codec: JsonCodec,
) -> Result<(), GridlockError> {
    loop {
        let data = match reader.recv().await {
            Ok(Some(data)) => data,
            Ok(None) => {
                tracing::info!(session = %session.id(), "connection closed by peer");
                return Ok(());
            }
            Err(e) => {
                tracing::debug!(session = %session.id(), error = %e, "read failed");
                return Err(e.into());
            }
        };

        let msg: ClientMessage = match codec.decode(&data) {
            Ok(msg) => msg,
            Err(e) => {
                tracing::debug!(
                    session = %session.id(),
                    error = %e,
                    "undecodable frame, dropping connection"
                );
                return Err(e.into());
            }
        };

        router.dispatch(session, msg).await;
    }
}

/// Drains the session's queue onto the socket.
///
/// Terminates on the close sentinel, on a write failure, or when every
/// sender is gone. Always closes the write half on the way out so the peer
/// sees a proper close frame.
async fn outbound_flow(
    mut writer: WsWriter,
    mut rx: mpsc::UnboundedReceiver<Outbound>,
    codec: JsonCodec,
) {
    while let Some(item) = rx.recv().await {
        match item {
            Outbound::Message(msg) => {
                let bytes = match codec.encode(&msg) {
                    Ok(bytes) => bytes,
                    Err(e) => {
                        tracing::error!(error = %e, "reply failed to encode, skipping");
                        continue;
                    }
                };
                if let Err(e) = writer.send(&bytes).await {
                    tracing::debug!(error = %e, "write failed, stopping outbound flow");
                    break;
                }
            }
            Outbound::Close => break,
        }
    }
    writer.close().await;
}
