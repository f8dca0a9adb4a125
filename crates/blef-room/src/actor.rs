//! Room actor: an isolated Tokio task that owns one game table.
//!
//! Each room runs in its own task, communicating with the outside world
//! through an mpsc channel. No shared mutable state, just message
//! passing; every command against a table is applied by exactly one
//! task, in arrival order.

use std::collections::HashMap;
use std::time::Duration;

use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

use blef_engine::{
    ClientCommand, Events, GameTable, Phase, ServerEvent,
};
use blef_protocol::{PlayerId, Recipient, RoomId};

use crate::RoomError;

/// How long a resolved round stays on screen before the actor advances
/// to the next one on its own. A client `startNewRound` arriving earlier
/// cancels the timer and advances immediately.
pub const ROUND_TRANSITION_DELAY: Duration = Duration::from_secs(5);

/// Channel sender for delivering outbound events to a player's
/// connection handler.
pub type PlayerSender = mpsc::UnboundedSender<ServerEvent>;

/// Commands sent to a room actor through its channel.
pub(crate) enum RoomCommand {
    /// Seat a player. The reply says whether they were actually seated;
    /// a table-level rejection is reported to the player directly as a
    /// `joinError` and replies `false`.
    Join {
        player_id: PlayerId,
        name: String,
        sender: PlayerSender,
        reply: oneshot::Sender<bool>,
    },

    /// A game command from a seated player.
    Command {
        sender_id: PlayerId,
        cmd: ClientCommand,
    },

    /// The player's connection dropped.
    Disconnect { player_id: PlayerId },

    /// The round-transition timer fired.
    AdvanceRound,
}

/// Handle to a running room actor. Cheap to clone; the registry holds
/// one per room.
#[derive(Clone)]
pub struct RoomHandle {
    room_id: RoomId,
    sender: mpsc::Sender<RoomCommand>,
}

impl RoomHandle {
    pub fn room_id(&self) -> &RoomId {
        &self.room_id
    }

    /// `true` once the actor has stopped and the room is gone.
    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }

    /// Asks the room to seat a player. `Ok(true)` means they are in;
    /// `Ok(false)` means the table refused (and already told them why).
    pub async fn join(
        &self,
        player_id: PlayerId,
        name: String,
        sender: PlayerSender,
    ) -> Result<bool, RoomError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.sender
            .send(RoomCommand::Join {
                player_id,
                name,
                sender,
                reply: reply_tx,
            })
            .await
            .map_err(|_| RoomError::Unavailable(self.room_id.clone()))?;
        reply_rx
            .await
            .map_err(|_| RoomError::Unavailable(self.room_id.clone()))
    }

    /// Delivers a game command (fire-and-forget).
    pub async fn command(
        &self,
        sender_id: PlayerId,
        cmd: ClientCommand,
    ) -> Result<(), RoomError> {
        self.sender
            .send(RoomCommand::Command { sender_id, cmd })
            .await
            .map_err(|_| RoomError::Unavailable(self.room_id.clone()))
    }

    /// Reports a dropped connection (fire-and-forget).
    pub async fn disconnect(
        &self,
        player_id: PlayerId,
    ) -> Result<(), RoomError> {
        self.sender
            .send(RoomCommand::Disconnect { player_id })
            .await
            .map_err(|_| RoomError::Unavailable(self.room_id.clone()))
    }
}

/// The internal room actor state. Runs inside a Tokio task.
struct RoomActor {
    table: GameTable,
    /// Per-player outbound channels.
    senders: HashMap<PlayerId, PlayerSender>,
    receiver: mpsc::Receiver<RoomCommand>,
    /// Loops the timer signal back into the command channel so the
    /// transition goes through the same serialized path as everything
    /// else.
    self_tx: mpsc::Sender<RoomCommand>,
    /// The pending round-transition timer, if a round is resolving.
    transition: Option<JoinHandle<()>>,
}

impl RoomActor {
    /// Runs the actor loop until the game finishes or the room empties.
    async fn run(mut self, created: Events) {
        tracing::info!(room_id = %self.table.id(), "room actor started");
        self.dispatch(created);

        while let Some(cmd) = self.receiver.recv().await {
            match cmd {
                RoomCommand::Join {
                    player_id,
                    name,
                    sender,
                    reply,
                } => {
                    let seated = self.handle_join(player_id, name, sender);
                    let _ = reply.send(seated);
                }
                RoomCommand::Command { sender_id, cmd } => {
                    self.handle_command(sender_id, cmd);
                }
                RoomCommand::Disconnect { player_id } => {
                    self.handle_disconnect(player_id);
                }
                RoomCommand::AdvanceRound => {
                    let events = self.advance_round();
                    self.dispatch(events);
                }
            }

            if self.table.is_finished() {
                tracing::info!(room_id = %self.table.id(), "game finished");
                break;
            }
        }

        if let Some(timer) = self.transition.take() {
            timer.abort();
        }
        tracing::info!(room_id = %self.table.id(), "room actor stopped");
    }

    fn handle_join(
        &mut self,
        player_id: PlayerId,
        name: String,
        sender: PlayerSender,
    ) -> bool {
        match self.table.join(player_id, name) {
            Ok(events) => {
                self.senders.insert(player_id, sender);
                tracing::info!(
                    room_id = %self.table.id(),
                    %player_id,
                    players = self.table.player_count(),
                    "player joined"
                );
                self.dispatch(events);
                true
            }
            Err(err) => {
                let _ = sender.send(ServerEvent::JoinError {
                    message: err.to_string(),
                });
                false
            }
        }
    }

    fn handle_command(&mut self, sender_id: PlayerId, cmd: ClientCommand) {
        if !self.senders.contains_key(&sender_id) {
            tracing::warn!(
                room_id = %self.table.id(),
                %sender_id,
                "command from non-member, ignoring"
            );
            return;
        }

        let result = match cmd {
            ClientCommand::StartGame { .. } => Ok(self.table.start()),
            ClientCommand::PlayHand { hand, .. } => {
                self.table.play_hand(sender_id, hand)
            }
            ClientCommand::SkipTurn { .. } => {
                Ok(self.table.skip_turn(sender_id))
            }
            ClientCommand::CallBluff { .. } => {
                self.table.call_bluff(sender_id)
            }
            ClientCommand::StartNewRound { .. } => {
                Ok(self.advance_round())
            }
            ClientCommand::CreateRoom { .. }
            | ClientCommand::JoinRoom { .. } => {
                // Membership commands are the registry's job; one that
                // leaks through here is a client bug.
                tracing::warn!(
                    room_id = %self.table.id(),
                    %sender_id,
                    "membership command routed to a running room, ignoring"
                );
                return;
            }
        };

        match result {
            Ok(events) => {
                self.dispatch(events);
                if self.table.phase() == Phase::RoundResolving
                    && self.transition.is_none()
                {
                    self.schedule_round_transition();
                }
            }
            Err(err) => {
                tracing::debug!(
                    room_id = %self.table.id(),
                    %sender_id,
                    %err,
                    "command rejected"
                );
                self.send_to(
                    sender_id,
                    ServerEvent::JoinError {
                        message: err.to_string(),
                    },
                );
            }
        }
    }

    fn handle_disconnect(&mut self, player_id: PlayerId) {
        self.senders.remove(&player_id);
        let events = self.table.remove_player(player_id);
        tracing::info!(
            room_id = %self.table.id(),
            %player_id,
            players = self.table.player_count(),
            "player disconnected"
        );
        self.dispatch(events);
    }

    /// Moves a resolving round forward. Safe to hit twice: the table's
    /// phase guard makes the second signal a no-op.
    fn advance_round(&mut self) -> Events {
        if let Some(timer) = self.transition.take() {
            timer.abort();
        }
        self.table.start_new_round()
    }

    fn schedule_round_transition(&mut self) {
        let tx = self.self_tx.clone();
        let handle = tokio::spawn(async move {
            tokio::time::sleep(ROUND_TRANSITION_DELAY).await;
            let _ = tx.send(RoomCommand::AdvanceRound).await;
        });
        self.transition = Some(handle);
    }

    /// Delivers events to their recipients. Closed receivers are
    /// silently dropped; the disconnect path cleans them up for real.
    fn dispatch(&mut self, events: Events) {
        for (recipient, event) in events {
            match recipient {
                Recipient::All => {
                    for sender in self.senders.values() {
                        let _ = sender.send(event.clone());
                    }
                }
                Recipient::Player(player_id) => {
                    self.send_to(player_id, event);
                }
            }
        }
    }

    fn send_to(&self, player_id: PlayerId, event: ServerEvent) {
        if let Some(sender) = self.senders.get(&player_id) {
            let _ = sender.send(event);
        }
    }
}

/// Spawns a room actor around a freshly created table and returns its
/// handle. `created` (typically the `roomCreated` event) is dispatched
/// once the host's sender is registered.
pub(crate) fn spawn_room(
    table: GameTable,
    created: Events,
    host: PlayerId,
    host_sender: PlayerSender,
    channel_size: usize,
) -> RoomHandle {
    let (tx, rx) = mpsc::channel(channel_size);
    let room_id = table.id().clone();

    let mut senders = HashMap::new();
    senders.insert(host, host_sender);

    let actor = RoomActor {
        table,
        senders,
        receiver: rx,
        self_tx: tx.clone(),
        transition: None,
    };

    tokio::spawn(actor.run(created));

    RoomHandle {
        room_id,
        sender: tx,
    }
}
