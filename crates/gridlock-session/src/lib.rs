//! Player session state for Gridlock.
//!
//! A session is the server's record of one connected client across its
//! lifetime: who they are, which match they are in, and the queue their
//! replies travel through.
//!
//! # How it fits in the stack
//!
//! ```text
//! Router (above)    ← mutates sessions through join/move/disconnect handling
//!     ↕
//! Session (this crate)  ← identity, assignment, outbound queue
//!     ↕
//! Protocol (below)  ← provides ServerMessage, Symbol, MatchId
//! ```

mod session;

pub use session::{Assignment, Outbound, Session, SessionId};
