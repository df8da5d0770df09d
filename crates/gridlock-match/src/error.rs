//! Error types for the match layer.

/// Why a move was rejected.
///
/// All variants are recoverable: the offending client gets the `Display`
/// string as an `err` reply, the match is left untouched, and the connection
/// stays open. The variants are ordered the way [`Match::apply_move`]
/// checks them: a move after the game ended reports that, even if it is
/// also out of bounds.
///
/// [`Match::apply_move`]: crate::Match::apply_move
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum MoveError {
    /// The match already reached a terminal status.
    #[error("game is already over")]
    GameOver,

    /// It is the other player's turn.
    #[error("not your turn")]
    WrongTurn,

    /// A coordinate lies outside `0..3`.
    #[error("coordinates out of bounds (0-2)")]
    OutOfBounds,

    /// The target cell already holds a symbol.
    #[error("cell is already occupied")]
    CellOccupied,
}
