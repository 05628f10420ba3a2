//! The participant roster: who is in the room, who hosts, what they
//! have picked.

use draftroom_protocol::{Item, ParticipantId, ParticipantView};
use tracing::info;

use crate::DraftError;

/// One registered participant.
#[derive(Debug, Clone)]
pub struct Member {
    pub id: ParticipantId,
    pub name: String,
    pub is_host: bool,
    /// Claimed items in pick order. Append-only during a session.
    pub picks: Vec<Item>,
}

/// Per-room participant registry, kept in join order.
///
/// Join order doubles as the host-succession order: when the host
/// leaves, the earliest-joined remaining participant inherits the flag.
/// That makes succession deterministic and therefore testable.
#[derive(Debug, Clone)]
pub struct Roster {
    members: Vec<Member>,
}

impl Roster {
    /// Creates a roster containing exactly the host.
    pub fn new(host: ParticipantId, host_name: impl Into<String>) -> Self {
        Self {
            members: vec![Member {
                id: host,
                name: host_name.into(),
                is_host: true,
                picks: Vec::new(),
            }],
        }
    }

    /// Adds a non-host participant. Returns `false` (and changes
    /// nothing) if the id is already registered.
    pub fn add(&mut self, id: ParticipantId, name: impl Into<String>) -> bool {
        if self.contains(id) {
            return false;
        }
        self.members.push(Member {
            id,
            name: name.into(),
            is_host: false,
            picks: Vec::new(),
        });
        true
    }

    /// Removes a participant. If they held host status and anyone
    /// remains, the earliest-joined remaining participant becomes host.
    /// Returns `false` if the id was not registered.
    pub fn remove(&mut self, id: ParticipantId) -> bool {
        let Some(index) = self.members.iter().position(|m| m.id == id)
        else {
            return false;
        };
        let removed = self.members.remove(index);
        if removed.is_host {
            if let Some(successor) = self.members.first_mut() {
                successor.is_host = true;
                info!(
                    from = %removed.id,
                    to = %successor.id,
                    "host transferred"
                );
            }
        }
        true
    }

    /// Appends an item to a participant's pick list.
    pub fn record_pick(
        &mut self,
        id: ParticipantId,
        item: Item,
    ) -> Result<(), DraftError> {
        let member = self
            .members
            .iter_mut()
            .find(|m| m.id == id)
            .ok_or(DraftError::UnknownParticipant(id))?;
        member.picks.push(item);
        Ok(())
    }

    pub fn contains(&self, id: ParticipantId) -> bool {
        self.members.iter().any(|m| m.id == id)
    }

    /// The current host, if the roster is non-empty.
    pub fn host(&self) -> Option<ParticipantId> {
        self.members.iter().find(|m| m.is_host).map(|m| m.id)
    }

    /// All member ids in join order.
    pub fn ids(&self) -> Vec<ParticipantId> {
        self.members.iter().map(|m| m.id).collect()
    }

    /// Snapshot view for broadcast, in join order.
    pub fn views(&self) -> Vec<ParticipantView> {
        self.members
            .iter()
            .map(|m| ParticipantView {
                id: m.id,
                name: m.name.clone(),
                is_host: m.is_host,
                selected_players: m.picks.clone(),
            })
            .collect()
    }

    pub fn members(&self) -> &[Member] {
        &self.members
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}
