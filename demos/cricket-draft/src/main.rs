use draftroom::prelude::*;
use tracing_subscriber::EnvFilter;

// ---------------------------------------------------------------------------
// Catalog
// ---------------------------------------------------------------------------

/// The fantasy cricket pool every room drafts from.
fn catalog() -> Vec<Item> {
    let players: &[(&str, &str, u8)] = &[
        ("Virat Kohli", "Batsman", 95),
        ("Rohit Sharma", "Batsman", 93),
        ("Steve Smith", "Batsman", 92),
        ("Kane Williamson", "Batsman", 91),
        ("Babar Azam", "Batsman", 90),
        ("Joe Root", "Batsman", 90),
        ("Jasprit Bumrah", "Bowler", 94),
        ("Pat Cummins", "Bowler", 92),
        ("Shaheen Afridi", "Bowler", 90),
        ("Trent Boult", "Bowler", 89),
        ("Rashid Khan", "Bowler", 91),
        ("Ben Stokes", "All-rounder", 92),
        ("Shakib Al Hasan", "All-rounder", 91),
        ("Hardik Pandya", "All-rounder", 88),
        ("Jos Buttler", "Wicket-keeper", 91),
        ("Quinton de Kock", "Wicket-keeper", 89),
    ];

    players
        .iter()
        .enumerate()
        .map(|(i, (name, role, rating))| Item {
            id: ItemId(i as u32 + 1),
            name: (*name).into(),
            role: (*role).into(),
            rating: *rating,
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Server bootstrap
// ---------------------------------------------------------------------------

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let server = DraftServer::builder()
        .bind("0.0.0.0:8080")
        .catalog(catalog())
        .build()
        .await?;

    tracing::info!(
        addr = %server.local_addr()?,
        "cricket draft server listening"
    );
    server.run().await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures_util::{SinkExt, StreamExt};
    use std::time::Duration;
    use tokio_tungstenite::tungstenite::Message;

    type Ws = tokio_tungstenite::WebSocketStream<
        tokio_tungstenite::MaybeTlsStream<tokio::net::TcpStream>,
    >;

    async fn start(turn_timeout: Duration) -> String {
        let server = DraftServerBuilder::new()
            .bind("127.0.0.1:0")
            .catalog(catalog())
            .config(DraftConfig {
                turn_timeout,
                snapshot_interval: Duration::from_secs(3_600),
            })
            .build()
            .await
            .unwrap();
        let addr = server.local_addr().unwrap().to_string();
        tokio::spawn(async move {
            let _ = server.run().await;
        });
        tokio::time::sleep(Duration::from_millis(10)).await;
        addr
    }

    async fn ws(addr: &str) -> Ws {
        let (ws, _) = tokio_tungstenite::connect_async(format!("ws://{addr}"))
            .await
            .unwrap();
        ws
    }

    fn enc(event: &ClientEvent) -> Message {
        Message::Text(serde_json::to_string(event).unwrap().into())
    }

    async fn recv(ws: &mut Ws) -> ServerEvent {
        let msg = tokio::time::timeout(Duration::from_secs(10), ws.next())
            .await
            .expect("timeout")
            .unwrap()
            .unwrap();
        serde_json::from_slice(&msg.into_data()).unwrap()
    }

    #[test]
    fn test_catalog_ids_are_unique() {
        let items = catalog();
        let mut ids: Vec<_> = items.iter().map(|i| i.id).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), items.len());
    }

    #[test]
    fn test_catalog_covers_every_role() {
        let items = catalog();
        for role in ["Batsman", "Bowler", "All-rounder", "Wicket-keeper"] {
            assert!(
                items.iter().any(|i| i.role == role),
                "missing role {role}"
            );
        }
    }

    // A solo drafter who never picks: every turn times out, the server
    // drafts the whole catalog for them, and the draft completes.
    #[tokio::test]
    async fn test_unattended_solo_draft_completes() {
        let addr = start(Duration::from_millis(50)).await;
        let mut host = ws(&addr).await;

        host.send(enc(&ClientEvent::CreateRoom {
            user_name: "Solo".into(),
        }))
        .await
        .unwrap();
        let ServerEvent::RoomCreated { room_id, .. } = recv(&mut host).await
        else {
            panic!("expected RoomCreated")
        };

        host.send(enc(&ClientEvent::StartGame { room_id })).await.unwrap();

        loop {
            match recv(&mut host).await {
                ServerEvent::DraftComplete { game_state } => {
                    assert!(game_state.available_players.is_empty());
                    assert_eq!(
                        game_state.users[0].selected_players.len(),
                        catalog().len()
                    );
                    break;
                }
                _ => continue,
            }
        }
    }

    // Two drafters split the pool, picking manually in turn.
    #[tokio::test]
    async fn test_two_player_draft_splits_the_pool() {
        let addr = start(Duration::from_secs(60)).await;
        let mut alice = ws(&addr).await;
        let mut bob = ws(&addr).await;

        alice
            .send(enc(&ClientEvent::CreateRoom {
                user_name: "Alice".into(),
            }))
            .await
            .unwrap();
        let ServerEvent::RoomCreated { room_id, game_state } =
            recv(&mut alice).await
        else {
            panic!("expected RoomCreated")
        };
        let alice_id = game_state.users[0].id;

        bob.send(enc(&ClientEvent::JoinRoom {
            room_id: room_id.clone(),
            user_name: "Bob".into(),
        }))
        .await
        .unwrap();

        alice
            .send(enc(&ClientEvent::StartGame {
                room_id: room_id.clone(),
            }))
            .await
            .unwrap();

        let mut state = loop {
            if let ServerEvent::GameStarted { game_state } =
                recv(&mut alice).await
            {
                break game_state;
            }
        };

        for _ in 0..catalog().len() {
            let current = state.current_turn.expect("a turn is active");
            let target = state.available_players[0].id;
            let picker =
                if current == alice_id { &mut alice } else { &mut bob };
            picker
                .send(enc(&ClientEvent::SelectPlayer {
                    room_id: room_id.clone(),
                    player_id: target,
                }))
                .await
                .unwrap();

            state = loop {
                if let ServerEvent::PlayerSelected { game_state } =
                    recv(&mut alice).await
                {
                    break game_state;
                }
            };
        }

        assert!(state.available_players.is_empty());
        let half = catalog().len() / 2;
        for user in &state.users {
            assert_eq!(user.selected_players.len(), half);
        }
    }
}
