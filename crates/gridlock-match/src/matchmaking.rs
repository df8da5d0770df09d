//! The matchmaking queue: a single waiting slot, strict FIFO pairing.
//!
//! Matchmaking here is deliberately minimal: no skill rating, no
//! lobby browsing. The first joiner waits; the second arrival pairs with
//! them. That's the whole policy, and the arrival order is a protocol
//! guarantee: the earlier joiner always plays X and always starts.

use std::sync::Arc;

use gridlock_session::Session;

/// Holds at most one session waiting for an opponent.
///
/// A session parked here has no match assignment yet; it gains one only
/// through the pairing that dequeues it.
#[derive(Debug, Default)]
pub struct MatchmakingQueue {
    waiting: Option<Arc<Session>>,
}

impl MatchmakingQueue {
    /// Creates an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Offers a session for pairing.
    ///
    /// - Slot empty: parks `session`, returns `None`. The caller sends no
    ///   reply, the session just waits.
    /// - Slot occupied by someone else: empties the slot and returns the
    ///   pair in arrival order `(waiting, session)`. The first element is
    ///   the one to assign X.
    /// - Slot occupied by this very session (a repeated `join` while
    ///   waiting): leaves it parked and returns `None`, so a session can
    ///   never be paired with itself.
    pub fn join(&mut self, session: Arc<Session>) -> Option<(Arc<Session>, Arc<Session>)> {
        match self.waiting.take() {
            None => {
                tracing::debug!(session = %session.id(), "parked in matchmaking queue");
                self.waiting = Some(session);
                None
            }
            Some(waiting) if waiting.id() == session.id() => {
                self.waiting = Some(waiting);
                None
            }
            Some(waiting) => Some((waiting, session)),
        }
    }

    /// Removes `session` from the waiting slot if it is the one parked
    /// there. Returns whether it was present.
    ///
    /// Disconnect cleanup calls this first: a session that was still
    /// waiting has touched no other shared state, so removal completes its
    /// cleanup.
    pub fn remove_if_waiting(&mut self, session: &Session) -> bool {
        match &self.waiting {
            Some(waiting) if waiting.id() == session.id() => {
                self.waiting = None;
                tracing::debug!(session = %session.id(), "removed from matchmaking queue");
                true
            }
            _ => false,
        }
    }

    /// Returns `true` if a session is currently parked.
    pub fn has_waiting(&self) -> bool {
        self.waiting.is_some()
    }
}
