//! One match: two paired sessions, a board, a turn, and a status.
//!
//! `Match` is a state machine with a single mutating operation,
//! [`Match::apply_move`], plus the [`Match::abort`] transition used by
//! disconnect cleanup. It does no I/O; callers own sending notifications.

use std::sync::Arc;

use gridlock_protocol::{MatchId, MatchStatus, Symbol};
use gridlock_session::Session;

use crate::board::{Board, Outcome};
use crate::MoveError;

fn player_index(symbol: Symbol) -> usize {
    match symbol {
        Symbol::X => 0,
        Symbol::O => 1,
    }
}

/// A single two-player game.
///
/// Constructed only by [`MatchRegistry::create`](crate::MatchRegistry::create)
/// and owned by the registry for its whole lifetime. The sessions stored in
/// `players` are delivery targets for broadcasts; they don't keep the match
/// alive.
///
/// Status transitions:
///
/// ```text
/// ONGOING → X_WON | O_WON | DRAW   (apply_move)
/// ONGOING → ABORTED                (abort, on opponent disconnect)
/// ```
///
/// All terminal states are final.
#[derive(Debug)]
pub struct Match {
    id: MatchId,
    /// Indexed by symbol: `[X, O]`. Fixed at creation.
    players: [Arc<Session>; 2],
    board: Board,
    turn: Symbol,
    status: MatchStatus,
}

impl Match {
    /// Builds a fresh match: `first` plays X and starts, `second` plays O.
    pub(crate) fn new(id: MatchId, first: Arc<Session>, second: Arc<Session>) -> Self {
        Self {
            id,
            players: [first, second],
            board: Board::new(),
            turn: Symbol::X,
            status: MatchStatus::Ongoing,
        }
    }

    /// This match's id.
    pub fn id(&self) -> MatchId {
        self.id
    }

    /// The symbol that moves next. Stale once the status is terminal.
    pub fn turn(&self) -> Symbol {
        self.turn
    }

    /// Current lifecycle status.
    pub fn status(&self) -> MatchStatus {
        self.status
    }

    /// The board, for snapshotting into `state` broadcasts.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// The session playing `symbol`.
    pub fn player(&self, symbol: Symbol) -> &Arc<Session> {
        &self.players[player_index(symbol)]
    }

    /// The session playing against `symbol`.
    pub fn opponent(&self, symbol: Symbol) -> &Arc<Session> {
        self.player(symbol.other())
    }

    /// Attempts to place `symbol` at `(x, y)`.
    ///
    /// Checks run in a fixed order so rejections are precise: a move after
    /// the game ended reports `GameOver` even if it is also out of bounds,
    /// and an out-of-turn move reports `WrongTurn` before anything else
    /// about the target cell is considered.
    ///
    /// A rejected move leaves board, turn, and status untouched. An accepted
    /// move places the symbol, re-evaluates the board, and either records
    /// the terminal status or passes the turn.
    pub fn apply_move(&mut self, symbol: Symbol, x: i32, y: i32) -> Result<(), MoveError> {
        if self.status.is_terminal() {
            return Err(MoveError::GameOver);
        }
        if symbol != self.turn {
            return Err(MoveError::WrongTurn);
        }
        if !(0..3).contains(&x) || !(0..3).contains(&y) {
            return Err(MoveError::OutOfBounds);
        }

        let index = Board::index(x as usize, y as usize);
        if !self.board.cell(index).is_empty() {
            return Err(MoveError::CellOccupied);
        }

        self.board.place(index, symbol);
        match self.board.evaluate() {
            Outcome::Won(winner) => self.status = MatchStatus::won(winner),
            Outcome::Draw => self.status = MatchStatus::Draw,
            Outcome::Ongoing => self.turn = symbol.other(),
        }

        Ok(())
    }

    /// Marks the match aborted. A no-op once the status is already
    /// terminal, preserving monotonicity.
    pub fn abort(&mut self) {
        if !self.status.is_terminal() {
            self.status = MatchStatus::Aborted;
            tracing::debug!(match_id = %self.id, "match aborted");
        }
    }
}
