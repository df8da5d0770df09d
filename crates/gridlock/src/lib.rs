//! # Gridlock
//!
//! A two-player tic-tac-toe match server over WebSockets.
//!
//! Clients connect, send a `join`, and are paired strictly first-come,
//! first-served: the earlier joiner plays X and starts. Every accepted move
//! is broadcast to both players as a full board snapshot; every rejected
//! move is answered to the offender alone. When a connection drops, its
//! session is scrubbed from the matchmaking queue and registry, and a
//! mid-game opponent is notified and closed rather than left waiting on a
//! dead peer.
//!
//! Layering, bottom up: `gridlock-transport` (WebSocket plumbing) →
//! `gridlock-protocol` (message model + codec) → `gridlock-session` /
//! `gridlock-match` (state) → this crate ([`SessionRouter`], the
//! per-connection handler, and [`GridlockServer`]).

mod connection;
mod error;
mod router;
mod server;

pub use error::GridlockError;
pub use router::SessionRouter;
pub use server::{GridlockServer, GridlockServerBuilder};
