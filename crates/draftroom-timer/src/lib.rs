//! Deadline timers for Draftroom's room coordinator.
//!
//! Two timers drive a drafting room besides participant input:
//!
//! - [`TurnTimer`] — a single-shot, rearmable deadline. When it expires
//!   the room auto-picks for the current participant.
//! - [`SnapshotTicker`] — a repeating tick that triggers a full-state
//!   broadcast while a draft is running.
//!
//! Both are designed to sit inside the room actor's `tokio::select!`
//! loop and pend forever while disarmed, so the loop needs no special
//! casing for "no timer right now":
//!
//! ```ignore
//! loop {
//!     tokio::select! {
//!         Some(cmd) = rx.recv() => { /* participant events */ }
//!         _ = self.turn_timer.expired() => { /* auto-pick */ }
//!         _ = self.ticker.tick() => { /* broadcast snapshot */ }
//!     }
//! }
//! ```
//!
//! Because expiry is just another branch of the same loop, a manual pick
//! and a timeout auto-pick for the same room can never interleave, and
//! re-arming inside the branch that advances the turn makes a stale
//! expiry structurally impossible.

use std::future::pending;
use std::time::Duration;

use tokio::time::{self, Instant};
use tracing::trace;

// ---------------------------------------------------------------------------
// TurnTimer
// ---------------------------------------------------------------------------

/// A single-shot, rearmable deadline.
///
/// At most one deadline is ever pending: [`arm`](Self::arm) replaces any
/// previous deadline, [`cancel`](Self::cancel) clears it, and
/// [`expired`](Self::expired) disarms on firing. There is no callback —
/// the owner awaits `expired()` in its select! loop and runs the expiry
/// action itself, on its own thread of control.
#[derive(Debug, Default)]
pub struct TurnTimer {
    deadline: Option<Instant>,
}

impl TurnTimer {
    /// Creates a disarmed timer.
    pub fn new() -> Self {
        Self { deadline: None }
    }

    /// Arms the timer to expire after `after`, replacing any pending
    /// deadline.
    pub fn arm(&mut self, after: Duration) {
        self.deadline = Some(Instant::now() + after);
        trace!(after_ms = after.as_millis() as u64, "turn timer armed");
    }

    /// Clears any pending deadline. Idempotent; cancelling a fired or
    /// never-armed timer is a no-op.
    pub fn cancel(&mut self) {
        if self.deadline.take().is_some() {
            trace!("turn timer cancelled");
        }
    }

    /// Whether a deadline is currently pending.
    pub fn is_armed(&self) -> bool {
        self.deadline.is_some()
    }

    /// Resolves when the pending deadline expires, disarming the timer.
    ///
    /// Pends forever while disarmed. Cancellation-safe: if another
    /// select! branch wins, the deadline stays pending and the next
    /// call picks it up again.
    pub async fn expired(&mut self) {
        match self.deadline {
            Some(deadline) => {
                time::sleep_until(deadline).await;
                self.deadline = None;
            }
            None => pending::<()>().await,
        }
    }
}

// ---------------------------------------------------------------------------
// SnapshotTicker
// ---------------------------------------------------------------------------

/// A repeating tick with explicit start/stop.
///
/// Unlike a plain `tokio::time::interval`, the ticker is inert until
/// [`start`](Self::start) and goes back to pending forever after
/// [`stop`](Self::stop) — the room broadcasts snapshots only while a
/// draft is actually running, and the tick must never outlive the room.
#[derive(Debug)]
pub struct SnapshotTicker {
    period: Duration,
    next: Option<Instant>,
}

impl SnapshotTicker {
    /// Creates a stopped ticker with the given period.
    pub fn new(period: Duration) -> Self {
        Self { period, next: None }
    }

    /// Starts ticking; the first tick fires one period from now.
    /// Restarting an already-running ticker resets its cadence.
    pub fn start(&mut self) {
        self.next = Some(Instant::now() + self.period);
        trace!(period_ms = self.period.as_millis() as u64, "ticker started");
    }

    /// Stops ticking. Idempotent.
    pub fn stop(&mut self) {
        if self.next.take().is_some() {
            trace!("ticker stopped");
        }
    }

    /// Whether the ticker is currently running.
    pub fn is_running(&self) -> bool {
        self.next.is_some()
    }

    /// Resolves on the next tick and schedules the one after it.
    /// Pends forever while stopped.
    pub async fn tick(&mut self) {
        match self.next {
            Some(next) => {
                time::sleep_until(next).await;
                // Schedule from now, not from the missed deadline — a
                // slow broadcast must not cause a burst of catch-up
                // ticks.
                self.next = Some(Instant::now() + self.period);
            }
            None => pending::<()>().await,
        }
    }
}

// =========================================================================
// Tests — all on the paused tokio clock, so they are deterministic and
// finish instantly regardless of the durations involved.
// =========================================================================
