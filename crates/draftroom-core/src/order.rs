//! Turn sequencing: a fixed random permutation plus a moving index.

use draftroom_protocol::ParticipantId;
use rand::seq::SliceRandom;
use rand::Rng;

use crate::DraftError;

/// Computes and advances the turn order for one room.
///
/// The order is a uniformly random permutation of the participant ids
/// present when the draft starts, and its membership never changes
/// afterwards — participants who leave keep their slot. Advancing
/// *skips* slots whose participant is no longer live, so the draft
/// proceeds over the surviving subset while the array stays stable.
#[derive(Debug, Clone, Default)]
pub struct TurnSequencer {
    order: Vec<ParticipantId>,
    index: usize,
}

impl TurnSequencer {
    /// Creates an unstarted sequencer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fixes the turn order as a random permutation of `ids` and sets
    /// the current index to 0.
    ///
    /// # Errors
    /// `DraftError::InsufficientParticipants` if `ids` is empty.
    pub fn start<R: Rng + ?Sized>(
        &mut self,
        ids: &[ParticipantId],
        rng: &mut R,
    ) -> Result<(), DraftError> {
        if ids.is_empty() {
            return Err(DraftError::InsufficientParticipants);
        }
        let mut order = ids.to_vec();
        order.shuffle(rng);
        self.order = order;
        self.index = 0;
        Ok(())
    }

    /// Whether `start` has been called.
    pub fn is_started(&self) -> bool {
        !self.order.is_empty()
    }

    /// The participant whose turn it currently is.
    pub fn current(&self) -> Result<ParticipantId, DraftError> {
        if !self.is_started() {
            return Err(DraftError::NotStarted);
        }
        Ok(self.order[self.index])
    }

    /// Moves to the next slot whose participant satisfies `live`,
    /// wrapping modulo the order length, and returns its id.
    ///
    /// Returns `Ok(None)` when no live participant remains anywhere in
    /// the order — the caller must treat the draft as unable to
    /// proceed. A sole live participant keeps getting their own turn.
    ///
    /// # Errors
    /// `DraftError::NotStarted` before `start`.
    pub fn advance(
        &mut self,
        live: impl Fn(ParticipantId) -> bool,
    ) -> Result<Option<ParticipantId>, DraftError> {
        if !self.is_started() {
            return Err(DraftError::NotStarted);
        }
        for _ in 0..self.order.len() {
            self.index = (self.index + 1) % self.order.len();
            let id = self.order[self.index];
            if live(id) {
                return Ok(Some(id));
            }
        }
        Ok(None)
    }

    /// The fixed order. Empty before `start`.
    pub fn order(&self) -> &[ParticipantId] {
        &self.order
    }

    /// The current index into the order.
    pub fn index(&self) -> usize {
        self.index
    }
}
