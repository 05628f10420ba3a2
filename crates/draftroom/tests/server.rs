//! Integration tests for the Draftroom server over real WebSockets.

use std::time::Duration;

use draftroom::prelude::*;
use futures_util::{SinkExt, StreamExt};
use tokio_tungstenite::tungstenite::Message;

// =========================================================================
// Helpers
// =========================================================================

type ClientWs = tokio_tungstenite::WebSocketStream<
    tokio_tungstenite::MaybeTlsStream<tokio::net::TcpStream>,
>;

fn catalog(n: u32) -> Vec<Item> {
    (1..=n)
        .map(|i| Item {
            id: ItemId(i),
            name: format!("Player {i}"),
            role: "Batsman".into(),
            rating: 75 + (i % 20) as u8,
        })
        .collect()
}

/// Starts a server on a random port and returns the address. The
/// snapshot ticker is effectively silenced so event streams stay
/// command-driven unless a test opts in.
async fn start_server(n_items: u32, turn_timeout: Duration) -> String {
    let server = DraftServerBuilder::new()
        .bind("127.0.0.1:0")
        .catalog(catalog(n_items))
        .config(DraftConfig {
            turn_timeout,
            snapshot_interval: Duration::from_secs(3_600),
        })
        .build()
        .await
        .expect("server should build");

    let addr = server
        .local_addr()
        .expect("should have local addr")
        .to_string();

    tokio::spawn(async move {
        let _ = server.run().await;
    });

    // Give the accept loop a moment to start.
    tokio::time::sleep(Duration::from_millis(10)).await;
    addr
}

async fn connect(addr: &str) -> ClientWs {
    let (ws, _) = tokio_tungstenite::connect_async(format!("ws://{addr}"))
        .await
        .expect("should connect");
    ws
}

fn encode_event(event: &ClientEvent) -> Message {
    let text = serde_json::to_string(event).expect("encode");
    Message::Text(text.into())
}

/// Receives the next server event, skipping control frames.
async fn recv_event(ws: &mut ClientWs) -> ServerEvent {
    loop {
        let msg = tokio::time::timeout(Duration::from_secs(5), ws.next())
            .await
            .expect("timed out waiting for event")
            .expect("stream ended")
            .expect("recv");
        match msg {
            Message::Text(_) | Message::Binary(_) => {
                return serde_json::from_slice(&msg.into_data())
                    .expect("decode");
            }
            _ => continue,
        }
    }
}

/// Receives events until one satisfies the predicate, discarding the
/// rest (broadcasts interleave with direct replies).
async fn recv_until(
    ws: &mut ClientWs,
    want: impl Fn(&ServerEvent) -> bool,
) -> ServerEvent {
    for _ in 0..20 {
        let event = recv_event(ws).await;
        if want(&event) {
            return event;
        }
    }
    panic!("expected event never arrived");
}

/// Creates a room and returns its code plus the creator's id.
async fn create_room(ws: &mut ClientWs, name: &str) -> (RoomCode, ParticipantId) {
    ws.send(encode_event(&ClientEvent::CreateRoom {
        user_name: name.into(),
    }))
    .await
    .expect("send");

    match recv_event(ws).await {
        ServerEvent::RoomCreated { room_id, game_state } => {
            assert_eq!(game_state.users.len(), 1);
            (room_id, game_state.users[0].id)
        }
        other => panic!("expected RoomCreated, got {other:?}"),
    }
}

/// Joins a room and returns the joiner's id from the snapshot.
async fn join_room(
    ws: &mut ClientWs,
    code: &RoomCode,
    name: &str,
) -> ParticipantId {
    ws.send(encode_event(&ClientEvent::JoinRoom {
        room_id: code.clone(),
        user_name: name.into(),
    }))
    .await
    .expect("send");

    let event = recv_until(ws, |e| {
        matches!(e, ServerEvent::RoomJoined { .. })
    })
    .await;
    match event {
        ServerEvent::RoomJoined { game_state, .. } => {
            game_state.users.last().expect("joiner listed").id
        }
        _ => unreachable!(),
    }
}

// =========================================================================
// Tests
// =========================================================================

#[tokio::test]
async fn test_create_room_returns_code_and_snapshot() {
    let addr = start_server(4, Duration::from_secs(60)).await;
    let mut ws = connect(&addr).await;

    ws.send(encode_event(&ClientEvent::CreateRoom {
        user_name: "Alice".into(),
    }))
    .await
    .expect("send");

    match recv_event(&mut ws).await {
        ServerEvent::RoomCreated { room_id, game_state } => {
            assert_eq!(room_id.as_str().len(), 6);
            assert_eq!(game_state.room_id, room_id);
            assert_eq!(game_state.users[0].name, "Alice");
            assert!(game_state.users[0].is_host);
            assert!(!game_state.game_started);
            assert_eq!(game_state.available_players.len(), 4);
        }
        other => panic!("expected RoomCreated, got {other:?}"),
    }
}

#[tokio::test]
async fn test_join_unknown_room_reports_error() {
    let addr = start_server(4, Duration::from_secs(60)).await;
    let mut ws = connect(&addr).await;

    ws.send(encode_event(&ClientEvent::JoinRoom {
        room_id: RoomCode::new("ZZZZZZ"),
        user_name: "Bob".into(),
    }))
    .await
    .expect("send");

    match recv_event(&mut ws).await {
        ServerEvent::Error { message } => {
            assert!(message.contains("ZZZZZZ"));
        }
        other => panic!("expected Error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_join_notifies_existing_members() {
    let addr = start_server(4, Duration::from_secs(60)).await;
    let mut host = connect(&addr).await;
    let mut joiner = connect(&addr).await;

    let (code, _) = create_room(&mut host, "Alice").await;
    join_room(&mut joiner, &code, "Bob").await;

    match recv_event(&mut host).await {
        ServerEvent::UserJoined { game_state } => {
            assert_eq!(game_state.users.len(), 2);
            assert_eq!(game_state.users[1].name, "Bob");
            assert!(!game_state.users[1].is_host);
        }
        other => panic!("expected UserJoined, got {other:?}"),
    }
}

#[tokio::test]
async fn test_only_host_can_start() {
    let addr = start_server(4, Duration::from_secs(60)).await;
    let mut host = connect(&addr).await;
    let mut joiner = connect(&addr).await;

    let (code, _) = create_room(&mut host, "Alice").await;
    join_room(&mut joiner, &code, "Bob").await;

    joiner
        .send(encode_event(&ClientEvent::StartGame {
            room_id: code.clone(),
        }))
        .await
        .expect("send");

    let event =
        recv_until(&mut joiner, |e| matches!(e, ServerEvent::Error { .. }))
            .await;
    match event {
        ServerEvent::Error { message } => {
            assert!(message.contains("host"), "got: {message}");
        }
        _ => unreachable!(),
    }
}

#[tokio::test]
async fn test_full_draft_over_websockets() {
    let addr = start_server(2, Duration::from_secs(60)).await;
    let mut host = connect(&addr).await;
    let mut joiner = connect(&addr).await;

    let (code, host_id) = create_room(&mut host, "Alice").await;
    let joiner_id = join_room(&mut joiner, &code, "Bob").await;

    host.send(encode_event(&ClientEvent::StartGame {
        room_id: code.clone(),
    }))
    .await
    .expect("send");

    let started = recv_until(&mut host, |e| {
        matches!(e, ServerEvent::GameStarted { .. })
    })
    .await;
    let ServerEvent::GameStarted { game_state } = started else {
        unreachable!()
    };
    assert!(game_state.game_started);
    assert_eq!(game_state.turn_order.len(), 2);

    // Drain the two-item pool, letting whoever holds the turn pick.
    let mut state = game_state;
    for _ in 0..2 {
        let current = state.current_turn.expect("a turn is active");
        let target = state.available_players[0].id;
        let picker = if current == host_id {
            &mut host
        } else {
            assert_eq!(current, joiner_id);
            &mut joiner
        };
        picker
            .send(encode_event(&ClientEvent::SelectPlayer {
                room_id: code.clone(),
                player_id: target,
            }))
            .await
            .expect("send");

        let event = recv_until(&mut host, |e| {
            matches!(e, ServerEvent::PlayerSelected { .. })
        })
        .await;
        let ServerEvent::PlayerSelected { game_state } = event else {
            unreachable!()
        };
        state = game_state;
    }

    assert!(state.available_players.is_empty());

    // Both sides observe the terminal broadcast, with one item each.
    for ws in [&mut host, &mut joiner] {
        let event = recv_until(ws, |e| {
            matches!(e, ServerEvent::DraftComplete { .. })
        })
        .await;
        let ServerEvent::DraftComplete { game_state } = event else {
            unreachable!()
        };
        for user in &game_state.users {
            assert_eq!(user.selected_players.len(), 1);
        }
    }
}

#[tokio::test]
async fn test_turn_timeout_auto_picks() {
    let addr = start_server(2, Duration::from_millis(100)).await;
    let mut host = connect(&addr).await;

    let (code, _) = create_room(&mut host, "Alice").await;
    host.send(encode_event(&ClientEvent::StartGame {
        room_id: code.clone(),
    }))
    .await
    .expect("send");

    // Make no pick; the server drafts for us.
    let event = recv_until(&mut host, |e| {
        matches!(e, ServerEvent::GameStateUpdate { .. })
    })
    .await;
    let ServerEvent::GameStateUpdate { game_state } = event else {
        unreachable!()
    };
    assert_eq!(game_state.available_players.len(), 1);
    assert_eq!(game_state.users[0].selected_players.len(), 1);

    // The second timeout exhausts the pool and ends the draft.
    recv_until(&mut host, |e| {
        matches!(e, ServerEvent::DraftComplete { .. })
    })
    .await;
}

#[tokio::test]
async fn test_disconnect_transfers_host() {
    let addr = start_server(4, Duration::from_secs(60)).await;
    let mut host = connect(&addr).await;
    let mut joiner = connect(&addr).await;

    let (code, _) = create_room(&mut host, "Alice").await;
    join_room(&mut joiner, &code, "Bob").await;

    drop(host);

    let event = recv_until(&mut joiner, |e| {
        matches!(e, ServerEvent::UserLeft { .. })
    })
    .await;
    let ServerEvent::UserLeft { game_state } = event else {
        unreachable!()
    };
    assert_eq!(game_state.users.len(), 1);
    assert_eq!(game_state.users[0].name, "Bob");
    assert!(game_state.users[0].is_host, "host passes to the survivor");

    // The promoted host can start.
    joiner
        .send(encode_event(&ClientEvent::StartGame {
            room_id: code.clone(),
        }))
        .await
        .expect("send");
    recv_until(&mut joiner, |e| {
        matches!(e, ServerEvent::GameStarted { .. })
    })
    .await;
}

#[tokio::test]
async fn test_malformed_event_is_ignored() {
    let addr = start_server(4, Duration::from_secs(60)).await;
    let mut ws = connect(&addr).await;

    ws.send(Message::Text("not json".into())).await.expect("send");
    ws.send(Message::Text(r#"{"type":"no-such-event"}"#.into()))
        .await
        .expect("send");

    // The connection survives and still serves requests.
    let (code, _) = create_room(&mut ws, "Alice").await;
    assert_eq!(code.as_str().len(), 6);
}

#[tokio::test]
async fn test_vacated_room_code_becomes_unknown() {
    let addr = start_server(4, Duration::from_secs(60)).await;
    let mut host = connect(&addr).await;

    let (code, _) = create_room(&mut host, "Alice").await;
    drop(host);

    // Give the disconnect a moment to tear the room down.
    tokio::time::sleep(Duration::from_millis(100)).await;

    let mut late = connect(&addr).await;
    late.send(encode_event(&ClientEvent::JoinRoom {
        room_id: code.clone(),
        user_name: "Bob".into(),
    }))
    .await
    .expect("send");

    match recv_event(&mut late).await {
        ServerEvent::Error { message } => {
            assert!(message.contains(code.as_str()));
        }
        other => panic!("expected Error, got {other:?}"),
    }
}
