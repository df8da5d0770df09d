//! Match lifecycle for Gridlock.
//!
//! Everything between "two names in a queue" and "a finished grid" lives
//! here:
//!
//! - [`Board`]: pure 3×3 state plus win/draw evaluation
//! - [`Match`]: one game (board, paired sessions, turn, status)
//! - [`MatchRegistry`]: owns every live match, keyed by id
//! - [`MatchmakingQueue`]: the single waiting slot that pairs arrivals
//!
//! Nothing in this crate does I/O or locking. The router serializes all
//! mutation behind its own locks, so at most one mutation is ever in flight
//! per match.

mod board;
mod error;
mod game;
mod matchmaking;
mod registry;

pub use board::{Board, Outcome};
pub use error::MoveError;
pub use game::Match;
pub use matchmaking::MatchmakingQueue;
pub use registry::MatchRegistry;
