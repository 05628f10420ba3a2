//! The room directory: code generation, lookup, and participant
//! residency tracking across all rooms on a server.

use std::collections::HashMap;
use std::sync::Arc;

use draftroom_protocol::{GameState, Item, ItemId, ParticipantId, RoomCode};
use rand::Rng;

use crate::room::{spawn_room, EventSender, LeaveOutcome, RoomHandle};
use crate::{DraftConfig, DraftError};

/// Command-channel depth per room actor.
const DEFAULT_CHANNEL_SIZE: usize = 64;

const CODE_LEN: usize = 6;
/// Uppercase alphanumerics minus the lookalikes (I, O, 0, 1).
const CODE_ALPHABET: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ23456789";

/// Registry of all live rooms, keyed by room code.
///
/// Also tracks which room each participant is in, which is what makes
/// "one room per connection" enforceable and makes disconnect handling
/// a single lookup. Not itself thread-safe; the server wraps it in a
/// `Mutex` and holds the lock only across the map operations, never
/// across a broadcast.
pub struct RoomDirectory {
    rooms: HashMap<RoomCode, RoomHandle>,
    participant_rooms: HashMap<ParticipantId, RoomCode>,
    catalog: Arc<[Item]>,
    config: DraftConfig,
}

impl RoomDirectory {
    /// Creates an empty directory over the given item catalog. Every
    /// room starts with its own copy of the catalog as its pool.
    pub fn new(catalog: impl Into<Arc<[Item]>>, config: DraftConfig) -> Self {
        Self {
            rooms: HashMap::new(),
            participant_rooms: HashMap::new(),
            catalog: catalog.into(),
            config,
        }
    }

    /// Creates a room with `host` as its sole participant and returns
    /// the code and initial snapshot.
    pub async fn create_room(
        &mut self,
        host: ParticipantId,
        name: impl Into<String>,
        sender: EventSender,
    ) -> Result<(RoomCode, GameState), DraftError> {
        if let Some(code) = self.participant_rooms.get(&host) {
            return Err(DraftError::AlreadyInRoom(host, code.clone()));
        }

        let code = self.fresh_code();
        let handle = spawn_room(
            code.clone(),
            self.config,
            &self.catalog,
            host,
            name.into(),
            sender,
            DEFAULT_CHANNEL_SIZE,
        );
        let snapshot = handle.snapshot().await?;

        self.rooms.insert(code.clone(), handle);
        self.participant_rooms.insert(host, code.clone());
        tracing::info!(room = %code, host = %host, "room created");
        Ok((code, snapshot))
    }

    /// Adds a participant to an existing room and returns the post-join
    /// snapshot.
    pub async fn join_room(
        &mut self,
        code: &RoomCode,
        id: ParticipantId,
        name: impl Into<String>,
        sender: EventSender,
    ) -> Result<GameState, DraftError> {
        if let Some(existing) = self.participant_rooms.get(&id) {
            return Err(DraftError::AlreadyInRoom(id, existing.clone()));
        }
        let handle = self
            .rooms
            .get(code)
            .ok_or_else(|| DraftError::RoomNotFound(code.clone()))?;

        let snapshot = handle.join(id, name, sender).await?;
        self.participant_rooms.insert(id, code.clone());
        Ok(snapshot)
    }

    /// Asks a room to start its draft on behalf of `requester`.
    pub async fn start_draft(
        &self,
        code: &RoomCode,
        requester: ParticipantId,
    ) -> Result<(), DraftError> {
        let handle = self
            .rooms
            .get(code)
            .ok_or_else(|| DraftError::RoomNotFound(code.clone()))?;
        handle.start(requester).await
    }

    /// Forwards a pick to a room. An unknown code is an error; a losing
    /// pick inside the room is not.
    pub async fn select_item(
        &self,
        code: &RoomCode,
        requester: ParticipantId,
        item_id: ItemId,
    ) -> Result<(), DraftError> {
        let handle = self
            .rooms
            .get(code)
            .ok_or_else(|| DraftError::RoomNotFound(code.clone()))?;
        handle.select(requester, item_id).await
    }

    /// Removes a departing participant from whatever room they were in,
    /// destroying the room if it empties. Returns the room code they
    /// left, if any. Idempotent for ids with no residency.
    pub async fn disconnect(
        &mut self,
        id: ParticipantId,
    ) -> Option<RoomCode> {
        let code = self.participant_rooms.remove(&id)?;
        let handle = self.rooms.get(&code)?.clone();

        match handle.leave(id).await {
            Ok(LeaveOutcome::Vacated) => {
                self.rooms.remove(&code);
                tracing::info!(room = %code, "room destroyed");
            }
            Ok(_) => {}
            Err(e) => {
                // The actor already stopped; just drop the handle.
                tracing::debug!(room = %code, error = %e, "leave after shutdown");
                self.rooms.remove(&code);
            }
        }
        Some(code)
    }

    /// Fetches a room's current snapshot.
    pub async fn snapshot(
        &self,
        code: &RoomCode,
    ) -> Result<GameState, DraftError> {
        let handle = self
            .rooms
            .get(code)
            .ok_or_else(|| DraftError::RoomNotFound(code.clone()))?;
        handle.snapshot().await
    }

    /// The room a participant currently resides in, if any.
    pub fn participant_room(&self, id: ParticipantId) -> Option<&RoomCode> {
        self.participant_rooms.get(&id)
    }

    pub fn contains(&self, code: &RoomCode) -> bool {
        self.rooms.contains_key(code)
    }

    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }

    /// Generates a code not currently in use, re-rolling on collision.
    fn fresh_code(&self) -> RoomCode {
        let mut rng = rand::rng();
        loop {
            let code: String = (0..CODE_LEN)
                .map(|_| {
                    let i = rng.random_range(0..CODE_ALPHABET.len());
                    CODE_ALPHABET[i] as char
                })
                .collect();
            let code = RoomCode::new(code);
            if !self.rooms.contains_key(&code) {
                return code;
            }
        }
    }
}
