//! Per-connection handler: event decoding, routing, and delivery.
//!
//! Each accepted connection gets its own Tokio task running this
//! handler, plus a writer task that pumps queued server events onto the
//! socket. All events for one client flow through one queue, so replies
//! and room broadcasts arrive in a single consistent order.

use std::sync::Arc;

use draftroom_core::{DraftError, EventSender};
use draftroom_protocol::{ClientEvent, Codec, ParticipantId, ServerEvent};
use draftroom_transport::{Connection, WebSocketConnection};
use tokio::sync::mpsc;

use crate::server::ServerState;
use crate::ServerError;

/// Drop guard that releases a participant's room residency when the
/// handler exits.
///
/// This ensures cleanup happens even if the handler panics. Since
/// `Drop` is synchronous, we spawn a fire-and-forget task for the
/// async lock.
struct DisconnectGuard {
    id: ParticipantId,
    state: Arc<ServerState>,
}

impl Drop for DisconnectGuard {
    fn drop(&mut self) {
        let id = self.id;
        let state = Arc::clone(&self.state);
        tokio::spawn(async move {
            let mut directory = state.directory.lock().await;
            if let Some(room) = directory.disconnect(id).await {
                tracing::info!(%id, %room, "participant disconnected");
            }
        });
    }
}

/// Handles a single connection from accept to close.
pub(crate) async fn handle_connection(
    conn: WebSocketConnection,
    state: Arc<ServerState>,
) -> Result<(), ServerError> {
    let conn = Arc::new(conn);
    let id = ParticipantId(conn.id().into_inner());
    tracing::debug!(%id, "handling new connection");

    // All outbound traffic for this client goes through one queue: the
    // room actor holds a clone of `events` for broadcasts, the dispatch
    // below uses it for direct replies. The writer exits once every
    // sender is gone, which the disconnect guard guarantees.
    let (events, outbound) = mpsc::unbounded_channel();
    tokio::spawn(pump_events(Arc::clone(&conn), Arc::clone(&state), outbound));

    let _guard = DisconnectGuard {
        id,
        state: Arc::clone(&state),
    };

    loop {
        let data = match conn.recv().await {
            Ok(Some(data)) => data,
            Ok(None) => {
                tracing::debug!(%id, "connection closed cleanly");
                break;
            }
            Err(e) => {
                tracing::debug!(%id, error = %e, "recv error");
                break;
            }
        };

        let event: ClientEvent = match state.codec.decode(&data) {
            Ok(event) => event,
            Err(e) => {
                tracing::debug!(%id, error = %e, "failed to decode event");
                continue;
            }
        };

        dispatch(&state, id, &events, event).await;
    }

    // _guard drops here → room residency is released.
    Ok(())
}

/// Writer task: encodes queued server events and sends them until the
/// queue closes, then closes the socket.
async fn pump_events(
    conn: Arc<WebSocketConnection>,
    state: Arc<ServerState>,
    mut outbound: mpsc::UnboundedReceiver<ServerEvent>,
) {
    while let Some(event) = outbound.recv().await {
        let bytes = match state.codec.encode(&event) {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::warn!(error = %e, "failed to encode event");
                continue;
            }
        };
        if conn.send(&bytes).await.is_err() {
            break;
        }
    }
    let _ = conn.close().await;
}

/// Routes one client event to the directory.
///
/// Structural failures (unknown room, unauthorized start) are reported
/// back to the sender only, as an `Error` event; they never terminate
/// the connection.
async fn dispatch(
    state: &Arc<ServerState>,
    id: ParticipantId,
    events: &EventSender,
    event: ClientEvent,
) {
    match event {
        ClientEvent::CreateRoom { user_name } => {
            let result = {
                let mut directory = state.directory.lock().await;
                directory.create_room(id, user_name, events.clone()).await
            };
            match result {
                Ok((room_id, game_state)) => {
                    let _ = events.send(ServerEvent::RoomCreated {
                        room_id,
                        game_state,
                    });
                }
                Err(e) => send_error(events, &e),
            }
        }

        ClientEvent::JoinRoom { room_id, user_name } => {
            let result = {
                let mut directory = state.directory.lock().await;
                directory
                    .join_room(&room_id, id, user_name, events.clone())
                    .await
            };
            match result {
                Ok(game_state) => {
                    let _ = events.send(ServerEvent::RoomJoined {
                        room_id,
                        game_state,
                    });
                }
                Err(e) => send_error(events, &e),
            }
        }

        ClientEvent::StartGame { room_id } => {
            // The room broadcasts GameStarted itself; only failures
            // produce a direct reply.
            let result = {
                let directory = state.directory.lock().await;
                directory.start_draft(&room_id, id).await
            };
            if let Err(e) = result {
                send_error(events, &e);
            }
        }

        ClientEvent::SelectPlayer { room_id, player_id } => {
            // Losing picks are silently dropped inside the room; only
            // an unknown room comes back as an error.
            let result = {
                let directory = state.directory.lock().await;
                directory.select_item(&room_id, id, player_id).await
            };
            if let Err(e) = result {
                send_error(events, &e);
            }
        }
    }
}

fn send_error(events: &EventSender, error: &DraftError) {
    let _ = events.send(ServerEvent::Error {
        message: error.to_string(),
    });
}
