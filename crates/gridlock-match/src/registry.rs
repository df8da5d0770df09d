//! The match registry: sole owner of every live match.
//!
//! Matches enter the map at pairing time and leave it during disconnect
//! cleanup. Sessions refer to their match by id only, so nothing outside
//! this map keeps a match alive.

use std::collections::HashMap;
use std::sync::Arc;

use gridlock_protocol::{MatchId, Symbol};
use gridlock_session::Session;

use crate::Match;

/// Maps match ids to live matches.
#[derive(Debug, Default)]
pub struct MatchRegistry {
    matches: HashMap<MatchId, Match>,
}

impl MatchRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Constructs and registers a match for a freshly paired couple.
    ///
    /// This is the only place a [`Match`] is built. `first` (the session
    /// that was waiting) plays X and starts; `second` plays O. Both
    /// sessions get their symbol and match back-reference here, so by the
    /// time the new id is visible anywhere, the players are fully wired up.
    pub fn create(&mut self, first: Arc<Session>, second: Arc<Session>) -> MatchId {
        let id = MatchId::new();
        first.assign(Symbol::X, id);
        second.assign(Symbol::O, id);

        tracing::info!(
            match_id = %id,
            x = %first.name(),
            o = %second.name(),
            "match created"
        );

        self.matches.insert(id, Match::new(id, first, second));
        id
    }

    /// Looks up a match for reading.
    pub fn get(&self, id: MatchId) -> Option<&Match> {
        self.matches.get(&id)
    }

    /// Looks up a match for move application or abort.
    pub fn get_mut(&mut self, id: MatchId) -> Option<&mut Match> {
        self.matches.get_mut(&id)
    }

    /// Deregisters a match. Idempotent: removing an id that is already gone
    /// (the other participant cleaned up first) is a no-op.
    pub fn remove(&mut self, id: MatchId) {
        if self.matches.remove(&id).is_some() {
            tracing::info!(match_id = %id, "match removed");
        }
    }

    /// Number of registered matches.
    pub fn len(&self) -> usize {
        self.matches.len()
    }

    /// Returns `true` if no matches are registered.
    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }
}
