//! Room actor: an isolated Tokio task that owns one drafting session.
//!
//! Each room runs in its own task, communicating with the outside world
//! through an mpsc channel. Participant events, turn-timer expiries, and
//! snapshot ticks are all branches of one `tokio::select!` loop, so no
//! two mutations of the same room ever overlap — in particular, a
//! manual pick and a timeout auto-pick are mutually exclusive by
//! construction, and re-arming the timer in the same step that advances
//! the turn means a stale deadline can never fire.

use std::collections::HashMap;

use draftroom_protocol::{
    GameState, Item, ItemId, ParticipantId, RoomCode, ServerEvent,
};
use draftroom_timer::{SnapshotTicker, TurnTimer};
use tokio::sync::{mpsc, oneshot};

use crate::{DraftConfig, DraftError, DraftPool, Phase, Roster, TurnSequencer};

/// Channel sender for delivering server events to one participant's
/// connection handler.
pub type EventSender = mpsc::UnboundedSender<ServerEvent>;

/// What a departure did to the room.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeaveOutcome {
    /// The id was not a member; nothing changed.
    NotMember,
    /// The participant left; others remain.
    Remaining,
    /// The last participant left; the actor is shutting down and the
    /// directory must drop its handle.
    Vacated,
}

/// Commands sent to a room actor through its channel.
///
/// Variants carrying a `oneshot::Sender` are request/response: the
/// caller awaits the reply. `Select` is deliberately fire-and-forget —
/// a losing pick produces silence by design.
pub(crate) enum RoomCommand {
    Join {
        id: ParticipantId,
        name: String,
        sender: EventSender,
        reply: oneshot::Sender<Result<GameState, DraftError>>,
    },
    Start {
        requester: ParticipantId,
        reply: oneshot::Sender<Result<(), DraftError>>,
    },
    Select {
        requester: ParticipantId,
        item_id: ItemId,
    },
    Leave {
        id: ParticipantId,
        reply: oneshot::Sender<LeaveOutcome>,
    },
    Snapshot {
        reply: oneshot::Sender<GameState>,
    },
}

/// Handle to a running room actor. Cheap to clone; the
/// [`RoomDirectory`](crate::RoomDirectory) holds one per room.
#[derive(Clone)]
pub struct RoomHandle {
    code: RoomCode,
    sender: mpsc::Sender<RoomCommand>,
}

impl RoomHandle {
    /// The room's code.
    pub fn code(&self) -> &RoomCode {
        &self.code
    }

    /// Adds a participant and returns the post-join snapshot.
    pub async fn join(
        &self,
        id: ParticipantId,
        name: impl Into<String>,
        sender: EventSender,
    ) -> Result<GameState, DraftError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.sender
            .send(RoomCommand::Join {
                id,
                name: name.into(),
                sender,
                reply: reply_tx,
            })
            .await
            .map_err(|_| DraftError::Unavailable(self.code.clone()))?;
        reply_rx
            .await
            .map_err(|_| DraftError::Unavailable(self.code.clone()))?
    }

    /// Requests a draft start on behalf of `requester`.
    pub async fn start(
        &self,
        requester: ParticipantId,
    ) -> Result<(), DraftError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.sender
            .send(RoomCommand::Start {
                requester,
                reply: reply_tx,
            })
            .await
            .map_err(|_| DraftError::Unavailable(self.code.clone()))?;
        reply_rx
            .await
            .map_err(|_| DraftError::Unavailable(self.code.clone()))?
    }

    /// Submits a pick (fire-and-forget; failures are silent).
    pub async fn select(
        &self,
        requester: ParticipantId,
        item_id: ItemId,
    ) -> Result<(), DraftError> {
        self.sender
            .send(RoomCommand::Select { requester, item_id })
            .await
            .map_err(|_| DraftError::Unavailable(self.code.clone()))
    }

    /// Removes a participant (connection closed).
    pub async fn leave(
        &self,
        id: ParticipantId,
    ) -> Result<LeaveOutcome, DraftError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.sender
            .send(RoomCommand::Leave { id, reply: reply_tx })
            .await
            .map_err(|_| DraftError::Unavailable(self.code.clone()))?;
        reply_rx
            .await
            .map_err(|_| DraftError::Unavailable(self.code.clone()))
    }

    /// Fetches the current snapshot (pure read).
    pub async fn snapshot(&self) -> Result<GameState, DraftError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.sender
            .send(RoomCommand::Snapshot { reply: reply_tx })
            .await
            .map_err(|_| DraftError::Unavailable(self.code.clone()))?;
        reply_rx
            .await
            .map_err(|_| DraftError::Unavailable(self.code.clone()))
    }
}

/// The internal room actor state. Runs inside a Tokio task.
struct RoomActor {
    code: RoomCode,
    phase: Phase,
    config: DraftConfig,
    roster: Roster,
    pool: DraftPool,
    sequencer: TurnSequencer,
    turn_timer: TurnTimer,
    ticker: SnapshotTicker,
    /// Per-participant outbound channels.
    senders: HashMap<ParticipantId, EventSender>,
    receiver: mpsc::Receiver<RoomCommand>,
}

impl RoomActor {
    /// Runs the actor loop until the room is vacated or all handles are
    /// dropped. Returning drops the timers with the actor, so nothing
    /// can fire for a destroyed room.
    async fn run(mut self) {
        tracing::info!(room = %self.code, "room opened");

        loop {
            tokio::select! {
                cmd = self.receiver.recv() => match cmd {
                    Some(cmd) => {
                        if self.handle_command(cmd) {
                            break;
                        }
                    }
                    None => break,
                },
                _ = self.turn_timer.expired() => self.handle_turn_expired(),
                _ = self.ticker.tick() => {
                    let game_state = self.snapshot();
                    self.broadcast(ServerEvent::GameStateUpdate { game_state });
                }
            }
        }

        tracing::info!(room = %self.code, "room closed");
    }

    /// Processes one command. Returns `true` when the actor must stop.
    fn handle_command(&mut self, cmd: RoomCommand) -> bool {
        match cmd {
            RoomCommand::Join {
                id,
                name,
                sender,
                reply,
            } => {
                let result = self.handle_join(id, name, sender);
                let _ = reply.send(result);
                false
            }
            RoomCommand::Start { requester, reply } => {
                let result = self.handle_start(requester);
                let _ = reply.send(result);
                false
            }
            RoomCommand::Select { requester, item_id } => {
                self.handle_select(requester, item_id);
                false
            }
            RoomCommand::Leave { id, reply } => {
                let outcome = self.handle_leave(id);
                let stop = outcome == LeaveOutcome::Vacated;
                let _ = reply.send(outcome);
                stop
            }
            RoomCommand::Snapshot { reply } => {
                let _ = reply.send(self.snapshot());
                false
            }
        }
    }

    fn handle_join(
        &mut self,
        id: ParticipantId,
        name: String,
        sender: EventSender,
    ) -> Result<GameState, DraftError> {
        // Joins are allowed in any phase; a mid-draft joiner simply has
        // no slot in the fixed turn order.
        if !self.roster.add(id, name) {
            return Err(DraftError::AlreadyInRoom(id, self.code.clone()));
        }
        self.senders.insert(id, sender);
        tracing::info!(
            room = %self.code,
            participant = %id,
            members = self.roster.len(),
            "participant joined"
        );

        // The joiner learns about the room from the reply; everyone
        // else hears about the joiner from the broadcast.
        let game_state = self.snapshot();
        self.broadcast_except(
            id,
            ServerEvent::UserJoined {
                game_state: game_state.clone(),
            },
        );
        Ok(game_state)
    }

    fn handle_start(
        &mut self,
        requester: ParticipantId,
    ) -> Result<(), DraftError> {
        if self.roster.host() != Some(requester) {
            return Err(DraftError::Unauthorized(
                requester,
                self.code.clone(),
            ));
        }
        if self.phase.is_started() {
            // Idempotent: a second start must not re-shuffle the order
            // or reset the running timer.
            tracing::debug!(room = %self.code, "draft already started, ignoring");
            return Ok(());
        }

        self.sequencer.start(&self.roster.ids(), &mut rand::rng())?;
        self.phase = Phase::Drafting;
        self.turn_timer.arm(self.config.turn_timeout);
        self.ticker.start();
        tracing::info!(
            room = %self.code,
            participants = self.roster.len(),
            pool = self.pool.len(),
            "draft started"
        );

        let game_state = self.snapshot();
        self.broadcast(ServerEvent::GameStarted { game_state });
        Ok(())
    }

    /// A manual pick. Both failure modes — not the requester's turn and
    /// item already gone — are routine race losses: no reply, no
    /// broadcast, no state change.
    fn handle_select(&mut self, requester: ParticipantId, item_id: ItemId) {
        if !self.phase.is_drafting() {
            tracing::debug!(
                room = %self.code,
                participant = %requester,
                "pick outside drafting phase, ignoring"
            );
            return;
        }
        let Ok(current) = self.sequencer.current() else {
            return;
        };
        if requester != current {
            tracing::debug!(
                room = %self.code,
                participant = %requester,
                "pick out of turn, ignoring"
            );
            return;
        }
        let item = match self.pool.claim(item_id) {
            Ok(item) => item,
            Err(_) => {
                tracing::debug!(
                    room = %self.code,
                    %item_id,
                    "pick of unavailable item, ignoring"
                );
                return;
            }
        };

        self.award(requester, item);
        let finished = self.advance_turn();

        let game_state = self.snapshot();
        self.broadcast(ServerEvent::PlayerSelected {
            game_state: game_state.clone(),
        });
        if finished {
            self.broadcast(ServerEvent::DraftComplete { game_state });
        }
    }

    /// Turn-timer expiry: claim a random item for the current
    /// participant. Runs on the same loop as manual picks, so it can
    /// never race one; the timer only ever expires while drafting.
    fn handle_turn_expired(&mut self) {
        if !self.phase.is_drafting() {
            return;
        }
        let Ok(current) = self.sequencer.current() else {
            return;
        };
        let item = match self.pool.claim_random(&mut rand::rng()) {
            Ok(item) => item,
            // Unreachable while drafting: the claim that empties the
            // pool finishes the draft and cancels the timer.
            Err(_) => return,
        };
        tracing::info!(
            room = %self.code,
            participant = %current,
            item = %item.id,
            "turn expired, auto-picked"
        );

        self.award(current, item);
        let finished = self.advance_turn();

        let game_state = self.snapshot();
        self.broadcast(ServerEvent::GameStateUpdate {
            game_state: game_state.clone(),
        });
        if finished {
            self.broadcast(ServerEvent::DraftComplete { game_state });
        }
    }

    fn handle_leave(&mut self, id: ParticipantId) -> LeaveOutcome {
        if !self.roster.contains(id) {
            return LeaveOutcome::NotMember;
        }
        let was_current = self.phase.is_drafting()
            && self.sequencer.current().ok() == Some(id);

        self.senders.remove(&id);
        self.roster.remove(id);
        tracing::info!(
            room = %self.code,
            participant = %id,
            members = self.roster.len(),
            "participant left"
        );

        if self.roster.is_empty() {
            // Cancel timers before release: they must never fire for a
            // destroyed room.
            self.turn_timer.cancel();
            self.ticker.stop();
            tracing::info!(room = %self.code, "room vacated");
            return LeaveOutcome::Vacated;
        }

        let finished = if was_current {
            // Their turn dies with them: move on immediately and give
            // the next participant a full time budget.
            self.advance_turn()
        } else {
            false
        };

        let game_state = self.snapshot();
        self.broadcast(ServerEvent::UserLeft {
            game_state: game_state.clone(),
        });
        if finished {
            self.broadcast(ServerEvent::DraftComplete { game_state });
        }
        LeaveOutcome::Remaining
    }

    fn award(&mut self, id: ParticipantId, item: Item) {
        // The recipient is the live current-turn participant, so this
        // only fails if invariants are already broken.
        if let Err(e) = self.roster.record_pick(id, item) {
            tracing::warn!(room = %self.code, error = %e, "pick not recorded");
        }
    }

    /// Moves to the next live turn (re-arming the timer) or finishes
    /// the draft when nothing can follow: pool exhausted, or nobody
    /// from the fixed order is still in the room. Returns `true` when
    /// the draft just finished; the caller broadcasts the terminal
    /// event after its own, so `DraftComplete` is always last.
    fn advance_turn(&mut self) -> bool {
        if self.pool.is_empty() {
            self.finish("pool exhausted");
            return true;
        }
        let roster = &self.roster;
        match self.sequencer.advance(|id| roster.contains(id)) {
            Ok(Some(_)) => {
                self.turn_timer.arm(self.config.turn_timeout);
                false
            }
            Ok(None) => {
                self.finish("no ordered participants remain");
                true
            }
            Err(e) => {
                tracing::warn!(room = %self.code, error = %e, "advance failed");
                false
            }
        }
    }

    fn finish(&mut self, reason: &str) {
        self.phase = Phase::Finished;
        self.turn_timer.cancel();
        self.ticker.stop();
        tracing::info!(room = %self.code, reason, "draft finished");
    }

    /// Assembles the authoritative snapshot every mutation broadcasts.
    fn snapshot(&self) -> GameState {
        GameState {
            room_id: self.code.clone(),
            users: self.roster.views(),
            game_started: self.phase.is_started(),
            current_turn: if self.phase.is_drafting() {
                self.sequencer.current().ok()
            } else {
                None
            },
            turn_order: self.sequencer.order().to_vec(),
            available_players: self.pool.items().to_vec(),
            current_turn_index: self.sequencer.index(),
        }
    }

    /// Sends an event to every connected member. Disconnected receivers
    /// are silently skipped; the subsequent Leave command cleans them up.
    fn broadcast(&self, event: ServerEvent) {
        for sender in self.senders.values() {
            let _ = sender.send(event.clone());
        }
    }

    fn broadcast_except(&self, skip: ParticipantId, event: ServerEvent) {
        for (id, sender) in &self.senders {
            if *id != skip {
                let _ = sender.send(event.clone());
            }
        }
    }
}

/// Spawns a new room actor with the host as its sole participant and a
/// pool copied from the catalog. Returns the handle used to command it.
pub(crate) fn spawn_room(
    code: RoomCode,
    config: DraftConfig,
    catalog: &[Item],
    host: ParticipantId,
    host_name: String,
    host_sender: EventSender,
    channel_size: usize,
) -> RoomHandle {
    let (tx, rx) = mpsc::channel(channel_size);

    let actor = RoomActor {
        code: code.clone(),
        phase: Phase::Lobby,
        ticker: SnapshotTicker::new(config.snapshot_interval),
        config,
        roster: Roster::new(host, host_name),
        pool: DraftPool::new(catalog),
        sequencer: TurnSequencer::new(),
        turn_timer: TurnTimer::new(),
        senders: HashMap::from([(host, host_sender)]),
        receiver: rx,
    };

    tokio::spawn(actor.run());

    RoomHandle { code, sender: tx }
}
