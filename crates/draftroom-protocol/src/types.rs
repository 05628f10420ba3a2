//! Core wire types for Draftroom.
//!
//! Everything here is serialized to JSON and consumed by browser
//! clients, so the serde attributes pin the exact wire shape: event
//! names are kebab-case in a `type` tag, payload fields are camelCase.

use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Identity types
// ---------------------------------------------------------------------------

/// A unique identifier for a participant.
///
/// This is the transport connection id — stable for the lifetime of the
/// connection, never reused while the process lives. A dropped
/// connection is a permanent departure, so there is no separate account
/// identity behind it.
///
/// `#[serde(transparent)]` makes `ParticipantId(42)` serialize as plain
/// `42` on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParticipantId(pub u64);

impl fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "u-{}", self.0)
    }
}

/// A short, human-enterable room code, e.g. `"QK7R2M"`.
///
/// Unique within the room directory at any instant; the directory
/// re-rolls on collision at creation time. Serializes as a plain JSON
/// string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoomCode(String);

impl RoomCode {
    /// Wraps an existing code.
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    /// Returns the code as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RoomCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A unique identifier for a draftable item within the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(pub u32);

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "item-{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Catalog items
// ---------------------------------------------------------------------------

/// One draftable item from the catalog.
///
/// Immutable after catalog load — rooms copy the catalog into their
/// pool and only ever move items out of it, never change them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    /// Unique within the catalog.
    pub id: ItemId,
    /// Display name.
    pub name: String,
    /// Category label (e.g. "Batsman", "Bowler").
    pub role: String,
    /// Numeric rating shown to clients when choosing.
    pub rating: u8,
}

// ---------------------------------------------------------------------------
// Snapshot
// ---------------------------------------------------------------------------

/// One participant as seen in a [`GameState`] snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParticipantView {
    pub id: ParticipantId,
    pub name: String,
    /// Exactly one participant per room carries this flag.
    pub is_host: bool,
    /// Items claimed so far, in pick order.
    pub selected_players: Vec<Item>,
}

/// The complete, serializable view of a room.
///
/// This exact shape is what every state-changing operation broadcasts
/// to all room members, and what join/create replies carry. Clients
/// render from it alone — there is no incremental diffing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameState {
    pub room_id: RoomCode,
    /// All participants in join order.
    pub users: Vec<ParticipantView>,
    pub game_started: bool,
    /// Whose turn it is. `None` before the draft starts and after it
    /// finishes.
    pub current_turn: Option<ParticipantId>,
    /// The fixed turn order. Empty before the draft starts; keeps
    /// departed participants' ids once set.
    pub turn_order: Vec<ParticipantId>,
    /// Items still unclaimed.
    pub available_players: Vec<Item>,
    pub current_turn_index: usize,
}

// ---------------------------------------------------------------------------
// Events
// ---------------------------------------------------------------------------

/// Events a client sends to the server.
///
/// `#[serde(tag = "type")]` + kebab-case produces the wire shape
/// `{ "type": "create-room", "userName": "Alice" }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ClientEvent {
    /// Create a room and become its host.
    #[serde(rename_all = "camelCase")]
    CreateRoom { user_name: String },

    /// Join an existing room by code.
    #[serde(rename_all = "camelCase")]
    JoinRoom { room_id: RoomCode, user_name: String },

    /// Start the draft (host only).
    #[serde(rename_all = "camelCase")]
    StartGame { room_id: RoomCode },

    /// Claim an item on the sender's turn. `player_id` is the catalog
    /// item being drafted.
    #[serde(rename_all = "camelCase")]
    SelectPlayer { room_id: RoomCode, player_id: ItemId },
}

/// Events the server sends to clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ServerEvent {
    /// To the creator only: the room exists and you are its host.
    #[serde(rename_all = "camelCase")]
    RoomCreated { room_id: RoomCode, game_state: GameState },

    /// To the joiner only: you are in.
    #[serde(rename_all = "camelCase")]
    RoomJoined { room_id: RoomCode, game_state: GameState },

    /// Broadcast: someone joined.
    #[serde(rename_all = "camelCase")]
    UserJoined { game_state: GameState },

    /// Broadcast: the draft started, turn order is fixed.
    #[serde(rename_all = "camelCase")]
    GameStarted { game_state: GameState },

    /// Broadcast: a manual pick succeeded.
    #[serde(rename_all = "camelCase")]
    PlayerSelected { game_state: GameState },

    /// Broadcast: periodic refresh while drafting, and the immediate
    /// notification after a timeout auto-pick.
    #[serde(rename_all = "camelCase")]
    GameStateUpdate { game_state: GameState },

    /// Broadcast: the pool is exhausted (or the draft can no longer
    /// proceed) — terminal.
    #[serde(rename_all = "camelCase")]
    DraftComplete { game_state: GameState },

    /// Broadcast: someone left; the snapshot reflects any host
    /// transfer.
    #[serde(rename_all = "camelCase")]
    UserLeft { game_state: GameState },

    /// To one connection only: a structural failure (unknown room,
    /// unauthorized start). Routine race losses are never reported.
    Error { message: String },
}

// =========================================================================
// Tests
// =========================================================================
