//! Core protocol types for Gridlock's wire format.
//!
//! Every message on the wire is one of two internally tagged JSON enums:
//! [`ClientMessage`] (client → server) and [`ServerMessage`] (server →
//! client). The supporting types ([`Symbol`], [`Cell`], [`MatchStatus`],
//! [`MatchId`]) pin down the exact strings clients see, so changing a serde
//! attribute here is a wire-format change.

use serde::{Deserialize, Serialize};

use std::fmt;

use uuid::Uuid;

// ---------------------------------------------------------------------------
// Identity
// ---------------------------------------------------------------------------

/// A unique identifier for a match.
///
/// Newtype over a UUIDv4, generated once at match creation and stable for
/// the match's lifetime. `#[serde(transparent)]` makes it travel as a plain
/// JSON string (`"7f9c…"`), not as a wrapper object. Clients treat it as
/// an opaque token and echo it back on every move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MatchId(Uuid);

impl MatchId {
    /// Generates a fresh random match id.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for MatchId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for MatchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Symbol and Cell
// ---------------------------------------------------------------------------

/// A player's mark. The first session to join a match always plays `X` and
/// always moves first; the second plays `O`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Symbol {
    X,
    O,
}

impl Symbol {
    /// Returns the opposing symbol.
    pub fn other(self) -> Self {
        match self {
            Self::X => Self::O,
            Self::O => Self::X,
        }
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::X => write!(f, "X"),
            Self::O => write!(f, "O"),
        }
    }
}

/// One cell of the board as it appears in `state` broadcasts.
///
/// The wire contract is a 9-element array of `""`, `"X"`, or `"O"`: an
/// empty string, not `null`, marks a free cell, so `Empty` is renamed to
/// the empty string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Cell {
    #[default]
    #[serde(rename = "")]
    Empty,
    X,
    O,
}

impl Cell {
    /// Returns `true` if no symbol has been placed here.
    pub fn is_empty(self) -> bool {
        self == Self::Empty
    }
}

impl From<Symbol> for Cell {
    fn from(symbol: Symbol) -> Self {
        match symbol {
            Symbol::X => Self::X,
            Symbol::O => Self::O,
        }
    }
}

// ---------------------------------------------------------------------------
// MatchStatus
// ---------------------------------------------------------------------------

/// The lifecycle state of a match.
///
/// `Ongoing` is the only non-terminal state. Transitions are monotonic:
///
/// ```text
/// ONGOING → X_WON | O_WON | DRAW | ABORTED
/// ```
///
/// `ABORTED` is reachable only through disconnect cleanup, never through
/// play. The SCREAMING_SNAKE renames are the literal strings clients see in
/// the `status` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MatchStatus {
    Ongoing,
    XWon,
    OWon,
    Draw,
    Aborted,
}

impl MatchStatus {
    /// The winning status for the given symbol.
    pub fn won(symbol: Symbol) -> Self {
        match symbol {
            Symbol::X => Self::XWon,
            Symbol::O => Self::OWon,
        }
    }

    /// Returns `true` for any status other than `Ongoing`.
    pub fn is_terminal(self) -> bool {
        self != Self::Ongoing
    }
}

impl fmt::Display for MatchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ongoing => write!(f, "ONGOING"),
            Self::XWon => write!(f, "X_WON"),
            Self::OWon => write!(f, "O_WON"),
            Self::Draw => write!(f, "DRAW"),
            Self::Aborted => write!(f, "ABORTED"),
        }
    }
}

// ---------------------------------------------------------------------------
// Messages
// ---------------------------------------------------------------------------

/// Messages a client sends to the server.
///
/// `#[serde(tag = "type")]` produces internally tagged JSON:
///
/// ```json
/// { "type": "join", "player_name": "Alice" }
/// { "type": "move", "match_id": "7f9c…", "x": 1, "y": 1 }
/// ```
///
/// Move coordinates are signed on purpose: a client sending `x: -1` gets an
/// out-of-bounds rejection for that move, where an unsigned field would turn
/// it into a decode failure and tear the connection down.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    /// Enter the matchmaking queue under the given display name.
    Join { player_name: String },

    /// Place this session's symbol at `(x, y)` in its current match.
    Move { match_id: MatchId, x: i32, y: i32 },
}

/// Messages the server sends to a client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    /// Sent to each player individually once a pairing succeeds. There is no
    /// reply to a `join` that merely parks the session in the queue.
    Joined {
        match_id: MatchId,
        your_symbol: Symbol,
        opponent: String,
        start_player: Symbol,
    },

    /// Full board snapshot, broadcast to both players after every accepted
    /// move. The snapshot is built only after the match's fields are fully
    /// updated, so it is always self-consistent.
    State {
        match_id: MatchId,
        board: [Cell; 9],
        next_turn: Symbol,
        status: MatchStatus,
    },

    /// A rejection or notification, delivered to one session only.
    #[serde(rename = "err")]
    Error { message: String },
}

impl ServerMessage {
    /// Shorthand for an [`ServerMessage::Error`] reply.
    pub fn error(message: impl Into<String>) -> Self {
        Self::Error {
            message: message.into(),
        }
    }
}

// =========================================================================
// Tests
// =========================================================================

#[cfg(test)]
mod tests {
    //! The wire contract defines exact JSON shapes; these tests pin them
    //! down, because a serde-attribute slip here silently breaks clients.

    use super::*;

    #[test]
    fn test_match_id_serializes_as_plain_string() {
        let id = MatchId::new();
        let json = serde_json::to_value(id).unwrap();
        assert_eq!(json, serde_json::json!(id.to_string()));
    }

    #[test]
    fn test_match_id_round_trips_through_its_string_form() {
        let id = MatchId::new();
        let parsed: MatchId =
            serde_json::from_value(serde_json::json!(id.to_string())).unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn test_symbol_other_flips() {
        assert_eq!(Symbol::X.other(), Symbol::O);
        assert_eq!(Symbol::O.other(), Symbol::X);
    }

    #[test]
    fn test_empty_cell_serializes_as_empty_string() {
        assert_eq!(serde_json::to_string(&Cell::Empty).unwrap(), "\"\"");
        assert_eq!(serde_json::to_string(&Cell::X).unwrap(), "\"X\"");
        assert_eq!(serde_json::to_string(&Cell::O).unwrap(), "\"O\"");
    }

    #[test]
    fn test_status_uses_screaming_snake_strings() {
        for (status, expected) in [
            (MatchStatus::Ongoing, "\"ONGOING\""),
            (MatchStatus::XWon, "\"X_WON\""),
            (MatchStatus::OWon, "\"O_WON\""),
            (MatchStatus::Draw, "\"DRAW\""),
            (MatchStatus::Aborted, "\"ABORTED\""),
        ] {
            assert_eq!(serde_json::to_string(&status).unwrap(), expected);
        }
    }

    #[test]
    fn test_status_terminality() {
        assert!(!MatchStatus::Ongoing.is_terminal());
        assert!(MatchStatus::XWon.is_terminal());
        assert!(MatchStatus::OWon.is_terminal());
        assert!(MatchStatus::Draw.is_terminal());
        assert!(MatchStatus::Aborted.is_terminal());
    }

    #[test]
    fn test_join_decodes_from_tagged_json() {
        let msg: ClientMessage =
            serde_json::from_str(r#"{"type":"join","player_name":"Alice"}"#).unwrap();
        assert_eq!(
            msg,
            ClientMessage::Join {
                player_name: "Alice".into()
            }
        );
    }

    #[test]
    fn test_move_decodes_with_negative_coordinates() {
        // Negative coordinates must survive decoding so the router can
        // reject them as a move error rather than a protocol error.
        let id = MatchId::new();
        let raw = format!(r#"{{"type":"move","match_id":"{id}","x":-1,"y":2}}"#);
        let msg: ClientMessage = serde_json::from_str(&raw).unwrap();
        assert_eq!(
            msg,
            ClientMessage::Move {
                match_id: id,
                x: -1,
                y: 2
            }
        );
    }

    #[test]
    fn test_joined_json_shape() {
        let msg = ServerMessage::Joined {
            match_id: MatchId::new(),
            your_symbol: Symbol::O,
            opponent: "Alice".into(),
            start_player: Symbol::X,
        };
        let json = serde_json::to_value(&msg).unwrap();

        assert_eq!(json["type"], "joined");
        assert_eq!(json["your_symbol"], "O");
        assert_eq!(json["opponent"], "Alice");
        assert_eq!(json["start_player"], "X");
    }

    #[test]
    fn test_state_json_shape() {
        let mut board = [Cell::Empty; 9];
        board[4] = Cell::X;
        let msg = ServerMessage::State {
            match_id: MatchId::new(),
            board,
            next_turn: Symbol::O,
            status: MatchStatus::Ongoing,
        };
        let json = serde_json::to_value(&msg).unwrap();

        assert_eq!(json["type"], "state");
        assert_eq!(
            json["board"],
            serde_json::json!(["", "", "", "", "X", "", "", "", ""])
        );
        assert_eq!(json["next_turn"], "O");
        assert_eq!(json["status"], "ONGOING");
    }

    #[test]
    fn test_error_reply_uses_err_tag() {
        let json = serde_json::to_value(ServerMessage::error("not in a match")).unwrap();
        assert_eq!(json["type"], "err");
        assert_eq!(json["message"], "not in a match");
    }

    #[test]
    fn test_unknown_type_tag_fails_to_decode() {
        let result: Result<ClientMessage, _> =
            serde_json::from_str(r#"{"type":"resign","match_id":"x"}"#);
        assert!(result.is_err());
    }
}
