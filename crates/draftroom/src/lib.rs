//! # Draftroom
//!
//! WebSocket server for turn-based drafting sessions.
//!
//! Clients create or join rooms by code, the host starts the draft, and
//! the server runs it authoritatively: a random fixed turn order, a
//! 10-second budget per turn with a random auto-pick on expiry, and a
//! full [`GameState`](draftroom_protocol::GameState) snapshot broadcast
//! after every change.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use draftroom::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), ServerError> {
//!     let server = DraftServer::builder()
//!         .bind("0.0.0.0:8080")
//!         .catalog(Vec::<Item>::new())
//!         .build()
//!         .await?;
//!     server.run().await
//! }
//! ```

mod error;
mod handler;
mod server;

pub use error::ServerError;
pub use server::{DraftServer, DraftServerBuilder};

/// Commonly used types, re-exported from the component crates.
pub mod prelude {
    pub use crate::{DraftServer, DraftServerBuilder, ServerError};
    pub use draftroom_core::{DraftConfig, DraftError, Phase, RoomDirectory};
    pub use draftroom_protocol::{
        ClientEvent, Codec, GameState, Item, ItemId, JsonCodec,
        ParticipantId, ParticipantView, RoomCode, ServerEvent,
    };
    pub use draftroom_transport::{
        Connection, ConnectionId, Transport, WebSocketTransport,
    };
}
