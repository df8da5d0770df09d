//! The session router: message dispatch and the disconnect protocol.
//!
//! Every inbound message from every connection funnels through here, and
//! this is the only code that mutates the two process-wide singletons (the
//! matchmaking queue and the match registry). Handlers run to completion on
//! the calling connection's task; the locks below serialize them across
//! connections.
//!
//! Lock discipline: the queue lock is always taken before the registry
//! lock, and pairing registers the new match while still holding the queue
//! lock, so no second `join` can slip between "dequeue the waiting session"
//! and "register the match".

use std::sync::Arc;

use gridlock_match::{MatchmakingQueue, MatchRegistry, MoveError};
use gridlock_protocol::{ClientMessage, MatchId, MatchStatus, ServerMessage, Symbol};
use gridlock_session::Session;
use tokio::sync::Mutex;

/// Routes inbound messages to matchmaking or move handling, and owns the
/// disconnect-cleanup procedure.
///
/// Cleanup guarantee: after a connection's inbound flow ends, its session
/// references no live entry in the queue or the registry, and a mid-game
/// opponent has been told instead of being left waiting on a dead peer.
pub struct SessionRouter {
    matchmaking: Mutex<MatchmakingQueue>,
    registry: Mutex<MatchRegistry>,
}

/// Sends an `err` reply to one session. Rejections never cross sessions.
fn reject(session: &Session, message: impl Into<String>) {
    session.send(ServerMessage::error(message));
}

impl SessionRouter {
    /// Creates a router with an empty queue and registry.
    pub fn new() -> Self {
        Self {
            matchmaking: Mutex::new(MatchmakingQueue::new()),
            registry: Mutex::new(MatchRegistry::new()),
        }
    }

    /// Fans a decoded client message out to its handler.
    pub async fn dispatch(&self, session: &Arc<Session>, msg: ClientMessage) {
        match msg {
            ClientMessage::Join { player_name } => {
                self.handle_join(session, player_name).await;
            }
            ClientMessage::Move { match_id, x, y } => {
                self.handle_move(session, match_id, x, y).await;
            }
        }
    }

    /// Handles a `join`: record the name, then either park the session or
    /// pair it with the session already waiting.
    ///
    /// Parking sends no reply; the client just waits. Pairing sends each
    /// player its own `joined`: the match id, that player's symbol, the
    /// opponent's name, and the starting player (always X, always the
    /// earlier joiner).
    pub async fn handle_join(&self, session: &Arc<Session>, name: String) {
        if session.assignment().is_some() {
            reject(session, "already in a match");
            return;
        }
        session.set_name(name);

        let paired = {
            let mut matchmaking = self.matchmaking.lock().await;
            match matchmaking.join(Arc::clone(session)) {
                None => None,
                Some((first, second)) => {
                    let mut registry = self.registry.lock().await;
                    let match_id =
                        registry.create(Arc::clone(&first), Arc::clone(&second));
                    Some((match_id, first, second))
                }
            }
        };

        let Some((match_id, first, second)) = paired else {
            tracing::info!(
                session = %session.id(),
                name = %session.name(),
                "waiting for an opponent"
            );
            return;
        };

        first.send(ServerMessage::Joined {
            match_id,
            your_symbol: Symbol::X,
            opponent: second.name(),
            start_player: Symbol::X,
        });
        second.send(ServerMessage::Joined {
            match_id,
            your_symbol: Symbol::O,
            opponent: first.name(),
            start_player: Symbol::X,
        });
    }

    /// Handles a `move`: validate against the session's own match, apply,
    /// and either broadcast the new state to both players or answer the
    /// sender alone with the rejection reason.
    ///
    /// Routing always uses the session's match back-reference; the id the
    /// client supplied is only checked for agreement, never trusted for
    /// lookup.
    pub async fn handle_move(&self, session: &Arc<Session>, match_id: MatchId, x: i32, y: i32) {
        let Some(assignment) = session.assignment() else {
            reject(session, "not in a match");
            return;
        };
        if match_id != assignment.match_id {
            tracing::debug!(
                session = %session.id(),
                supplied = %match_id,
                current = %assignment.match_id,
                "move addressed to the wrong match"
            );
            reject(session, "that is not your current match");
            return;
        }

        let mut registry = self.registry.lock().await;
        let Some(game) = registry.get_mut(assignment.match_id) else {
            // Only reachable once the match has been retired by a
            // participant's disconnect, which requires a terminal status or
            // an abort, so the honest answer is the game-over rejection.
            drop(registry);
            reject(session, MoveError::GameOver.to_string());
            return;
        };

        match game.apply_move(assignment.symbol, x, y) {
            Err(e) => {
                tracing::debug!(
                    match_id = %assignment.match_id,
                    session = %session.id(),
                    error = %e,
                    "move rejected"
                );
                reject(session, e.to_string());
            }
            Ok(()) => {
                tracing::debug!(
                    match_id = %assignment.match_id,
                    symbol = %assignment.symbol,
                    x,
                    y,
                    status = %game.status(),
                    "move applied"
                );
                // Snapshot after all match fields are updated, then enqueue
                // onto both (independent) per-session queues.
                let state = ServerMessage::State {
                    match_id: assignment.match_id,
                    board: game.board().cells(),
                    next_turn: game.turn(),
                    status: game.status(),
                };
                game.player(Symbol::X).send(state.clone());
                game.player(Symbol::O).send(state);
            }
        }
    }

    /// Handles the end of a session's inbound flow. Runs exactly once per
    /// connection, whatever ended it: clean close, read error, or an
    /// undecodable frame.
    ///
    /// 1. Still parked in the queue → unpark; nothing else was touched.
    /// 2. Else, if in a registered match: abort it if it was still ongoing
    ///    (one `err` plus the close signal to the opponent), then remove it
    ///    from the registry unconditionally (finished matches are retired
    ///    here too).
    /// 3. Always enqueue the close signal to the session's own queue so its
    ///    outbound flow winds down.
    pub async fn handle_disconnect(&self, session: &Arc<Session>) {
        let was_waiting = {
            let mut matchmaking = self.matchmaking.lock().await;
            matchmaking.remove_if_waiting(session)
        };

        if !was_waiting {
            if let Some(assignment) = session.assignment() {
                let mut registry = self.registry.lock().await;
                if let Some(game) = registry.get_mut(assignment.match_id) {
                    if game.status() == MatchStatus::Ongoing {
                        game.abort();
                        let opponent = game.opponent(assignment.symbol);
                        opponent.send(ServerMessage::error(format!(
                            "opponent ({}) disconnected, game aborted",
                            session.name()
                        )));
                        opponent.close();
                        tracing::info!(
                            match_id = %assignment.match_id,
                            session = %session.id(),
                            "match aborted, opponent notified"
                        );
                    }
                    registry.remove(assignment.match_id);
                }
            }
        }

        session.close();
        tracing::debug!(session = %session.id(), "disconnect cleanup complete");
    }

    /// Number of registered matches.
    pub async fn match_count(&self) -> usize {
        self.registry.lock().await.len()
    }

    /// Returns `true` if a session is parked in the matchmaking queue.
    pub async fn has_waiting(&self) -> bool {
        self.matchmaking.lock().await.has_waiting()
    }
}

impl Default for SessionRouter {
    fn default() -> Self {
        Self::new()
    }
}
