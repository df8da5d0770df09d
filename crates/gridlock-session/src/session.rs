//! Session types: the data structures that represent a connected player.
//!
//! A session tracks:
//! - WHO the player is (`SessionId`, joined name)
//! - WHERE their replies go (the outbound queue)
//! - WHICH match they are in, if any (symbol + match id, assigned at pairing)
//!
//! Sessions are shared as `Arc<Session>`: the connection handler holds one,
//! the matchmaking queue may hold one while the player waits, and a match
//! holds both of its players for broadcasting. None of those references owns
//! the player's match; matches belong to the registry, and a session only
//! carries the match's id.

use std::fmt;
use std::sync::OnceLock;

use gridlock_protocol::{MatchId, ServerMessage, Symbol};
use tokio::sync::mpsc;

// ---------------------------------------------------------------------------
// SessionId
// ---------------------------------------------------------------------------

/// Opaque identifier for a session, minted from the connection counter.
///
/// Server-internal only, never on the wire. Two sessions are the
/// same session exactly when their ids are equal, which is what matchmaking
/// uses to recognize a waiting player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionId(u64);

impl SessionId {
    /// Creates a new `SessionId` from a raw `u64`.
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the underlying `u64` value.
    pub fn into_inner(self) -> u64 {
        self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "S-{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Outbound
// ---------------------------------------------------------------------------

/// An entry in a session's outbound queue.
///
/// The queue carries replies in FIFO order plus one distinguished sentinel:
/// `Close` tells the outbound flow to stop writing and close the connection.
/// The sentinel is what lets the writer terminate deterministically instead
/// of being cancelled mid-frame.
#[derive(Debug, Clone, PartialEq)]
pub enum Outbound {
    /// A reply to serialize and write to the client.
    Message(ServerMessage),
    /// Stop the outbound flow and close the connection from the server side.
    Close,
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

/// A session's place in a match: which mark it plays and where.
///
/// The two fields are assigned together at pairing time and never change, so
/// readers always see both or neither.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Assignment {
    /// The mark this session plays.
    pub symbol: Symbol,
    /// The match it plays in. A back-reference for lookup only; the match
    /// itself is owned by the registry.
    pub match_id: MatchId,
}

/// Server-side state for one connected client.
///
/// The identity fields are write-once (`OnceLock`): the name is fixed by the
/// first `join`, and the assignment is fixed by pairing. Everything else a
/// handler needs lives behind the registry and queue locks, so the session
/// itself needs no mutex.
#[derive(Debug)]
pub struct Session {
    id: SessionId,
    name: OnceLock<String>,
    assignment: OnceLock<Assignment>,
    outbound: mpsc::UnboundedSender<Outbound>,
}

impl Session {
    /// Creates a session that delivers replies into `outbound`.
    pub fn new(id: SessionId, outbound: mpsc::UnboundedSender<Outbound>) -> Self {
        Self {
            id,
            name: OnceLock::new(),
            assignment: OnceLock::new(),
            outbound,
        }
    }

    /// Returns this session's id.
    pub fn id(&self) -> SessionId {
        self.id
    }

    /// Records the joined name. The first `join` wins; later attempts keep
    /// the original name.
    pub fn set_name(&self, name: String) {
        let _ = self.name.set(name);
    }

    /// The joined name, or an empty string before the first `join`.
    pub fn name(&self) -> String {
        self.name.get().cloned().unwrap_or_default()
    }

    /// Fixes this session's symbol and match at pairing time.
    ///
    /// Called exactly once, by the registry, while the matchmaking lock is
    /// held. A second call is ignored.
    pub fn assign(&self, symbol: Symbol, match_id: MatchId) {
        let _ = self.assignment.set(Assignment { symbol, match_id });
    }

    /// The session's match assignment, or `None` while unpaired.
    pub fn assignment(&self) -> Option<Assignment> {
        self.assignment.get().copied()
    }

    /// Enqueues a reply for the outbound flow.
    ///
    /// Fire-and-forget: if the outbound task is already gone (the client
    /// vanished and the writer stopped), the reply is discarded. Cleanup is
    /// driven by the inbound flow, never by a failed send.
    pub fn send(&self, msg: ServerMessage) {
        if self.outbound.send(Outbound::Message(msg)).is_err() {
            tracing::trace!(session = %self.id, "outbound flow gone, reply dropped");
        }
    }

    /// Enqueues the close sentinel, ending the outbound flow after any
    /// replies already queued ahead of it.
    pub fn close(&self) {
        let _ = self.outbound.send(Outbound::Close);
    }
}
