//! Room registry: creates rooms under client-chosen tokens and routes
//! players to them.

use std::collections::HashMap;

use blef_engine::{ClientCommand, GameTable, TableConfig};
use blef_protocol::{PlayerId, RoomId};

use crate::actor::{spawn_room, PlayerSender, RoomHandle};
use crate::RoomError;

/// Default command channel size for room actors.
const DEFAULT_CHANNEL_SIZE: usize = 64;

/// Tracks all live rooms and which player sits where.
///
/// This is the entry point for room operations from the connection
/// layer. Room tokens are chosen by the creating client; the registry
/// only enforces uniqueness among live rooms.
#[derive(Default)]
pub struct RoomRegistry {
    /// Live rooms, keyed by token.
    rooms: HashMap<RoomId, RoomHandle>,

    /// Maps each player to the room they are in. A player is in at most
    /// one room at a time.
    player_rooms: HashMap<PlayerId, RoomId>,
}

impl RoomRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a room under `room_id` with `host` seated as its first
    /// player.
    ///
    /// # Errors
    /// [`RoomError::AlreadyExists`] when a live room already uses the
    /// token. A token whose room has since shut down is free again.
    pub fn create(
        &mut self,
        room_id: RoomId,
        host: PlayerId,
        host_name: String,
        config: TableConfig,
        sender: PlayerSender,
    ) -> Result<(), RoomError> {
        self.prune_closed();
        if self.player_rooms.contains_key(&host) {
            return Err(RoomError::AlreadyInRoom(host));
        }
        if self.rooms.contains_key(&room_id) {
            return Err(RoomError::AlreadyExists(room_id));
        }

        let (table, created) =
            GameTable::new(room_id.clone(), host, host_name, config);
        let handle = spawn_room(
            table,
            created,
            host,
            sender,
            DEFAULT_CHANNEL_SIZE,
        );
        self.rooms.insert(room_id.clone(), handle);
        self.player_rooms.insert(host, room_id.clone());
        tracing::info!(%room_id, %host, "room created");
        Ok(())
    }

    /// Seats a player in an existing room.
    ///
    /// Table-level refusals (full, started, name taken) are reported to
    /// the player by the room itself and leave them unseated; they are
    /// not errors here.
    ///
    /// # Errors
    /// [`RoomError::NotFound`] when no live room uses the token,
    /// [`RoomError::AlreadyInRoom`] when the player is seated elsewhere.
    pub async fn join(
        &mut self,
        room_id: RoomId,
        player: PlayerId,
        name: String,
        sender: PlayerSender,
    ) -> Result<(), RoomError> {
        self.prune_closed();
        if self.player_rooms.contains_key(&player) {
            return Err(RoomError::AlreadyInRoom(player));
        }
        let handle = self
            .rooms
            .get(&room_id)
            .filter(|h| !h.is_closed())
            .ok_or_else(|| RoomError::NotFound(room_id.clone()))?;

        let seated = handle.join(player, name, sender).await?;
        if seated {
            self.player_rooms.insert(player, room_id);
        }
        Ok(())
    }

    /// Routes a game command to the sender's room.
    pub async fn route(
        &self,
        player: PlayerId,
        cmd: ClientCommand,
    ) -> Result<(), RoomError> {
        let room_id = self
            .player_rooms
            .get(&player)
            .ok_or(RoomError::NotInRoom(player))?;
        let handle = self
            .rooms
            .get(room_id)
            .ok_or_else(|| RoomError::NotFound(room_id.clone()))?;
        handle.command(player, cmd).await
    }

    /// Handles a dropped connection: tells the player's room (if any)
    /// and forgets the membership.
    pub async fn disconnect(&mut self, player: PlayerId) {
        if let Some(room_id) = self.player_rooms.remove(&player) {
            if let Some(handle) = self.rooms.get(&room_id) {
                let _ = handle.disconnect(player).await;
            }
        }
        self.prune_closed();
    }

    /// The room a player currently sits in, if any.
    pub fn room_of(&self, player: PlayerId) -> Option<&RoomId> {
        self.player_rooms.get(&player)
    }

    /// Number of live rooms.
    pub fn room_count(&mut self) -> usize {
        self.prune_closed();
        self.rooms.len()
    }

    /// Drops handles to rooms whose actors have stopped, and the
    /// memberships that pointed at them.
    fn prune_closed(&mut self) {
        self.rooms.retain(|room_id, handle| {
            let open = !handle.is_closed();
            if !open {
                tracing::debug!(%room_id, "pruned finished room");
            }
            open
        });
        self.player_rooms
            .retain(|_, room_id| self.rooms.contains_key(room_id));
    }
}
