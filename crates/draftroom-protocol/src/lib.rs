//! Wire protocol for Draftroom.
//!
//! This crate defines the "language" that draft clients and the server
//! speak:
//!
//! - **Types** ([`ClientEvent`], [`ServerEvent`], [`GameState`], the id
//!   newtypes) — the structures that travel on the wire.
//! - **Codec** ([`Codec`] trait, [`JsonCodec`]) — how those messages are
//!   converted to/from bytes.
//! - **Errors** ([`ProtocolError`]) — what can go wrong while encoding
//!   or decoding.
//!
//! The protocol layer sits between transport (raw websocket frames) and
//! the draft coordinator. It knows nothing about connections, rooms, or
//! turn timers — only how events are shaped on the wire.

mod codec;
mod error;
mod types;

pub use codec::Codec;
#[cfg(feature = "json")]
pub use codec::JsonCodec;
pub use error::ProtocolError;
pub use types::{
    ClientEvent, GameState, Item, ItemId, ParticipantId, ParticipantView,
    RoomCode, ServerEvent,
};
