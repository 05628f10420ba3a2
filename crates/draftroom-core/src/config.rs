//! Draft configuration and room lifecycle state machine.

use std::time::Duration;

// ---------------------------------------------------------------------------
// DraftConfig
// ---------------------------------------------------------------------------

/// Timing configuration for a drafting room.
///
/// The defaults are the production policy; tests inject shorter values
/// where they drive real sockets instead of the paused clock.
#[derive(Debug, Clone, Copy)]
pub struct DraftConfig {
    /// Time budget per turn. When it elapses without a manual pick, the
    /// room claims a random item for the current participant.
    pub turn_timeout: Duration,

    /// Period of the full-snapshot broadcast while drafting.
    pub snapshot_interval: Duration,
}

impl Default for DraftConfig {
    fn default() -> Self {
        Self {
            turn_timeout: Duration::from_millis(10_000),
            snapshot_interval: Duration::from_millis(1_000),
        }
    }
}

// ---------------------------------------------------------------------------
// Phase
// ---------------------------------------------------------------------------

/// The lifecycle phase of a drafting room.
///
/// ```text
/// Lobby → Drafting → Finished
/// ```
///
/// - **Lobby**: accepting joins, no turn order yet.
/// - **Drafting**: turn order fixed, timer armed, pool shrinking. Late
///   joiners are admitted but get no turn-order slot.
/// - **Finished**: the pool is exhausted (or no ordered participant
///   remains) — terminal.
///
/// Room *destruction* is not a phase: it happens whenever the roster
/// empties, in any phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Lobby,
    Drafting,
    Finished,
}

impl Phase {
    /// Returns `true` once the draft has been started (turn order
    /// fixed), including after it finished.
    pub fn is_started(&self) -> bool {
        !matches!(self, Self::Lobby)
    }

    /// Returns `true` if picks are currently being made.
    pub fn is_drafting(&self) -> bool {
        matches!(self, Self::Drafting)
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Lobby => write!(f, "Lobby"),
            Self::Drafting => write!(f, "Drafting"),
            Self::Finished => write!(f, "Finished"),
        }
    }
}
