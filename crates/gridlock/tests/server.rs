//! End-to-end tests: real WebSocket clients against a full server.

use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use gridlock::GridlockServerBuilder;
use gridlock_protocol::{Cell, ClientMessage, MatchId, MatchStatus, ServerMessage, Symbol};
use tokio_tungstenite::tungstenite::Message;

type Ws = tokio_tungstenite::WebSocketStream<
    tokio_tungstenite::MaybeTlsStream<tokio::net::TcpStream>,
>;

// =========================================================================
// Helpers
// =========================================================================

/// Starts a server on a random port and returns its address.
async fn start() -> String {
    let server = GridlockServerBuilder::new()
        .bind("127.0.0.1:0")
        .build()
        .await
        .expect("server should build");
    let addr = server.local_addr().expect("bound").to_string();

    tokio::spawn(async move {
        let _ = server.run().await;
    });

    // Give the accept loop a moment to start.
    tokio::time::sleep(Duration::from_millis(10)).await;
    addr
}

async fn connect(addr: &str) -> Ws {
    let (ws, _) = tokio_tungstenite::connect_async(format!("ws://{addr}"))
        .await
        .expect("should connect");
    ws
}

async fn send(ws: &mut Ws, msg: &ClientMessage) {
    let bytes = serde_json::to_vec(msg).unwrap();
    ws.send(Message::Binary(bytes.into())).await.unwrap();
}

/// Receives the next server reply, failing the test after 5 seconds.
async fn recv(ws: &mut Ws) -> ServerMessage {
    let msg = tokio::time::timeout(Duration::from_secs(5), ws.next())
        .await
        .expect("timed out waiting for a reply")
        .expect("stream ended unexpectedly")
        .expect("websocket error");
    serde_json::from_slice(&msg.into_data()).expect("server sent invalid json")
}

/// Asserts that the server closes the connection (close frame or EOF),
/// without sending any further replies.
async fn expect_closed(ws: &mut Ws) {
    loop {
        match tokio::time::timeout(Duration::from_secs(5), ws.next())
            .await
            .expect("timed out waiting for close")
        {
            None | Some(Ok(Message::Close(_))) | Some(Err(_)) => return,
            Some(Ok(Message::Ping(_))) | Some(Ok(Message::Pong(_))) => continue,
            Some(Ok(other)) => panic!("expected close, got {other:?}"),
        }
    }
}

async fn join(ws: &mut Ws, name: &str) {
    send(
        ws,
        &ClientMessage::Join {
            player_name: name.into(),
        },
    )
    .await;
}

fn error_message(msg: ServerMessage) -> String {
    match msg {
        ServerMessage::Error { message } => message,
        other => panic!("expected err, got {other:?}"),
    }
}

/// Connects Alice then Bob, joins both, and verifies the pairing replies.
async fn pair(addr: &str) -> (Ws, Ws, MatchId) {
    let mut alice = connect(addr).await;
    join(&mut alice, "Alice").await;
    // The first join gets no reply; give the server time to park it so the
    // arrival order is fixed before Bob shows up.
    tokio::time::sleep(Duration::from_millis(50)).await;

    let mut bob = connect(addr).await;
    join(&mut bob, "Bob").await;

    let match_id = match recv(&mut alice).await {
        ServerMessage::Joined {
            match_id,
            your_symbol: Symbol::X,
            opponent,
            start_player: Symbol::X,
        } => {
            assert_eq!(opponent, "Bob");
            match_id
        }
        other => panic!("expected joined as X, got {other:?}"),
    };

    match recv(&mut bob).await {
        ServerMessage::Joined {
            match_id: id,
            your_symbol: Symbol::O,
            opponent,
            start_player: Symbol::X,
        } => {
            assert_eq!(opponent, "Alice");
            assert_eq!(id, match_id);
        }
        other => panic!("expected joined as O, got {other:?}"),
    }

    (alice, bob, match_id)
}

/// Sends a move and returns the `state` broadcast as seen by the sender,
/// draining the other player's copy.
async fn play(
    sender: &mut Ws,
    other: &mut Ws,
    match_id: MatchId,
    x: i32,
    y: i32,
) -> (MatchId, [Cell; 9], Symbol, MatchStatus) {
    send(sender, &ClientMessage::Move { match_id, x, y }).await;
    let state = match recv(sender).await {
        ServerMessage::State {
            match_id,
            board,
            next_turn,
            status,
        } => (match_id, board, next_turn, status),
        unexpected => panic!("expected state, got {unexpected:?}"),
    };
    let _ = recv(other).await;
    state
}

// =========================================================================
// Pairing
// =========================================================================

#[tokio::test]
async fn test_first_joiner_plays_x_and_starts() {
    let addr = start().await;
    let (_alice, _bob, _match_id) = pair(&addr).await;
    // All the assertions live in pair(): A=X, B=O, start_player=X, one id.
}

#[tokio::test]
async fn test_queue_survives_a_waiting_player_leaving() {
    let addr = start().await;

    let mut quitter = connect(&addr).await;
    join(&mut quitter, "Quitter").await;
    tokio::time::sleep(Duration::from_millis(50)).await;
    quitter.close(None).await.unwrap();
    tokio::time::sleep(Duration::from_millis(50)).await;

    // The queue is empty again: the next two arrivals pair with each other.
    let (_carol, _dave, _match_id) = pair(&addr).await;
}

// =========================================================================
// Full games
// =========================================================================

#[tokio::test]
async fn test_full_game_x_wins_on_a_full_board() {
    let addr = start().await;
    let (mut alice, mut bob, match_id) = pair(&addr).await;

    // X opens in the center.
    let (id, board, next_turn, status) = play(&mut alice, &mut bob, match_id, 1, 1).await;
    assert_eq!(id, match_id);
    assert_eq!(board[4], Cell::X);
    assert_eq!(board.iter().filter(|c| !c.is_empty()).count(), 1);
    assert_eq!(next_turn, Symbol::O);
    assert_eq!(status, MatchStatus::Ongoing);

    // O answers in the corner.
    let (_, board, next_turn, _) = play(&mut bob, &mut alice, match_id, 0, 0).await;
    assert_eq!(board[0], Cell::O);
    assert_eq!(board[4], Cell::X);
    assert_eq!(next_turn, Symbol::X);

    play(&mut alice, &mut bob, match_id, 0, 1).await; // X: 1
    play(&mut bob, &mut alice, match_id, 2, 1).await; // O: 7
    let (_, board, _, status) = play(&mut alice, &mut bob, match_id, 2, 2).await; // X: 8
    // X holds 1, 4, 8: no line yet.
    assert_eq!(status, MatchStatus::Ongoing);
    assert_eq!(board[8], Cell::X);

    play(&mut bob, &mut alice, match_id, 1, 0).await; // O: 3
    play(&mut alice, &mut bob, match_id, 0, 2).await; // X: 2
    play(&mut bob, &mut alice, match_id, 1, 2).await; // O: 5

    // X completes the anti-diagonal (2, 4, 6) with the final free cell.
    let (_, board, _, status) = play(&mut alice, &mut bob, match_id, 2, 0).await;
    assert_eq!(status, MatchStatus::XWon);
    let expected = [
        Cell::O,
        Cell::X,
        Cell::X,
        Cell::O,
        Cell::X,
        Cell::O,
        Cell::X,
        Cell::O,
        Cell::X,
    ];
    assert_eq!(board, expected);

    // The game is over: any further move is rejected.
    send(&mut bob, &ClientMessage::Move { match_id, x: 1, y: 1 }).await;
    let message = error_message(recv(&mut bob).await);
    assert!(message.contains("over"), "{message}");
}

#[tokio::test]
async fn test_full_game_ends_in_a_draw() {
    let addr = start().await;
    let (mut alice, mut bob, match_id) = pair(&addr).await;

    //  X | O | X
    //  X | O | O
    //  O | X | X
    let moves = [
        (0, 0),
        (0, 1),
        (0, 2),
        (1, 1),
        (1, 0),
        (1, 2),
        (2, 1),
        (2, 0),
    ];
    for (i, (x, y)) in moves.into_iter().enumerate() {
        let (sender, other) = if i % 2 == 0 {
            (&mut alice, &mut bob)
        } else {
            (&mut bob, &mut alice)
        };
        let (_, _, _, status) = play(sender, other, match_id, x, y).await;
        assert_eq!(status, MatchStatus::Ongoing);
    }

    let (_, board, _, status) = play(&mut alice, &mut bob, match_id, 2, 2).await;
    assert_eq!(status, MatchStatus::Draw);
    assert!(board.iter().all(|c| !c.is_empty()));
}

// =========================================================================
// Rejections
// =========================================================================

#[tokio::test]
async fn test_wrong_turn_and_occupied_cell_rejections() {
    let addr = start().await;
    let (mut alice, mut bob, match_id) = pair(&addr).await;

    // O tries to open.
    send(&mut bob, &ClientMessage::Move { match_id, x: 0, y: 0 }).await;
    let message = error_message(recv(&mut bob).await);
    assert!(message.contains("not your turn"), "{message}");

    // The rejection changed nothing: X takes that very cell.
    let (_, board, _, _) = play(&mut alice, &mut bob, match_id, 0, 0).await;
    assert_eq!(board[0], Cell::X);

    // O now tries the occupied cell.
    send(&mut bob, &ClientMessage::Move { match_id, x: 0, y: 0 }).await;
    let message = error_message(recv(&mut bob).await);
    assert!(message.contains("occupied"), "{message}");

    // Still O's turn after the failures.
    let (_, _, next_turn, _) = play(&mut bob, &mut alice, match_id, 1, 1).await;
    assert_eq!(next_turn, Symbol::X);
}

#[tokio::test]
async fn test_out_of_bounds_rejections_including_negatives() {
    let addr = start().await;
    let (mut alice, _bob, match_id) = pair(&addr).await;

    for (x, y) in [(3, 0), (0, 3), (-1, 0), (0, -1)] {
        send(&mut alice, &ClientMessage::Move { match_id, x, y }).await;
        let message = error_message(recv(&mut alice).await);
        assert!(message.contains("out of bounds"), "{message}");
    }
}

#[tokio::test]
async fn test_move_before_join_is_rejected() {
    let addr = start().await;
    let mut lone = connect(&addr).await;

    send(
        &mut lone,
        &ClientMessage::Move {
            match_id: MatchId::new(),
            x: 0,
            y: 0,
        },
    )
    .await;
    let message = error_message(recv(&mut lone).await);
    assert!(message.contains("not in a match"), "{message}");
}

#[tokio::test]
async fn test_move_against_a_foreign_match_id_is_rejected() {
    let addr = start().await;
    let (mut alice, _bob, _match_id) = pair(&addr).await;

    send(
        &mut alice,
        &ClientMessage::Move {
            match_id: MatchId::new(),
            x: 0,
            y: 0,
        },
    )
    .await;
    let message = error_message(recv(&mut alice).await);
    assert!(message.contains("not your current match"), "{message}");
}

// =========================================================================
// Disconnects
// =========================================================================

#[tokio::test]
async fn test_disconnect_mid_match_aborts_and_closes_the_opponent() {
    let addr = start().await;
    let (mut alice, mut bob, match_id) = pair(&addr).await;

    play(&mut alice, &mut bob, match_id, 1, 1).await;

    alice.close(None).await.unwrap();

    // Exactly one err, then the server closes Bob's connection too.
    let message = error_message(recv(&mut bob).await);
    assert!(message.contains("Alice"), "{message}");
    assert!(message.contains("aborted"), "{message}");
    expect_closed(&mut bob).await;
}

#[tokio::test]
async fn test_winner_staying_connected_after_opponent_leaves_post_game() {
    let addr = start().await;
    let (mut alice, mut bob, match_id) = pair(&addr).await;

    // X wins the top row.
    play(&mut alice, &mut bob, match_id, 0, 0).await;
    play(&mut bob, &mut alice, match_id, 1, 0).await;
    play(&mut alice, &mut bob, match_id, 0, 1).await;
    play(&mut bob, &mut alice, match_id, 1, 1).await;
    let (_, _, _, status) = play(&mut alice, &mut bob, match_id, 0, 2).await;
    assert_eq!(status, MatchStatus::XWon);

    // The loser leaves. The game already ended, so the winner gets no
    // abort notification and stays connected.
    bob.close(None).await.unwrap();
    tokio::time::sleep(Duration::from_millis(50)).await;

    // The winner's stray move is still answered on the open connection.
    send(&mut alice, &ClientMessage::Move { match_id, x: 2, y: 2 }).await;
    let message = error_message(recv(&mut alice).await);
    assert!(message.contains("over"), "{message}");
}
