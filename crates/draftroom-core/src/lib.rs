//! Draft session coordination for Draftroom.
//!
//! Each room runs as an isolated Tokio task (actor model) owning its
//! draft pool, participant roster, turn order, and timers. The outside
//! world talks to a room only through its command channel, so every
//! state transition — a manual pick, a timeout auto-pick, a departure —
//! executes as one non-overlapping step.
//!
//! # Key types
//!
//! - [`RoomDirectory`] — creates/destroys rooms, routes participants
//! - [`RoomHandle`] — send commands to a running room actor
//! - [`DraftPool`], [`Roster`], [`TurnSequencer`] — the domain pieces
//!   the actor owns
//! - [`DraftConfig`] — turn timeout and snapshot interval
//! - [`Phase`] — room lifecycle state machine

mod config;
mod directory;
mod error;
mod order;
mod pool;
mod room;
mod roster;

pub use config::{DraftConfig, Phase};
pub use directory::RoomDirectory;
pub use error::DraftError;
pub use order::TurnSequencer;
pub use pool::DraftPool;
pub use room::{EventSender, LeaveOutcome, RoomHandle};
pub use roster::{Member, Roster};
