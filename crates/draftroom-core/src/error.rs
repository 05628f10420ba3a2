//! Error types for the draft layer.

use draftroom_protocol::{ItemId, ParticipantId, RoomCode};

/// Errors that can occur during draft operations.
///
/// Only *structural* failures live here — a pick that merely loses a
/// race (wrong turn, already-claimed item) is not an error and is
/// reported as silence by the room actor instead.
#[derive(Debug, thiserror::Error)]
pub enum DraftError {
    /// The room does not exist.
    #[error("room {0} not found")]
    RoomNotFound(RoomCode),

    /// A non-host tried a host-only action.
    #[error("{0} is not the host of room {1}")]
    Unauthorized(ParticipantId, RoomCode),

    /// No such item remains in the pool (already claimed, or never in
    /// the catalog).
    #[error("{0} is not in the pool")]
    ItemNotFound(ItemId),

    /// The pool has no items left to claim.
    #[error("the draft pool is empty")]
    PoolEmpty,

    /// A draft cannot start without participants.
    #[error("cannot start a draft with no participants")]
    InsufficientParticipants,

    /// The turn order has not been computed yet.
    #[error("the draft has not started")]
    NotStarted,

    /// The participant is not registered in this room.
    #[error("{0} is not a member of the room")]
    UnknownParticipant(ParticipantId),

    /// The participant is already in a room.
    #[error("{0} is already in room {1}")]
    AlreadyInRoom(ParticipantId, RoomCode),

    /// The room's command channel is full or closed.
    #[error("room {0} is unavailable")]
    Unavailable(RoomCode),
}
