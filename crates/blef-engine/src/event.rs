//! The wire vocabulary: commands the client sends and events the engine
//! broadcasts back.
//!
//! Both enums are internally tagged on `event` with camelCase names and
//! fields, so a played pair of kings travels as
//! `{"event": "playHand", "roomId": "a1b2c3",
//!   "hand": {"type": "pair", "rank": "K"}}`.

use serde::{Deserialize, Serialize};

use blef_protocol::{PlayerId, Recipient, RoomId};

use crate::card::Card;
use crate::hand::DeclaredHand;

/// Outbound events paired with their delivery targets.
pub type Events = Vec<(Recipient, ServerEvent)>;

/// A player as shown in the lobby: identity only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerPublic {
    pub id: PlayerId,
    pub name: String,
}

/// A player as shown during the game: identity plus visible card count.
/// Eliminated players stay in this roster frozen at zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerStatus {
    pub id: PlayerId,
    pub name: String,
    pub cards_count: usize,
}

/// One player's exact cards in the post-bluff reveal snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevealedHand {
    pub id: PlayerId,
    pub name: String,
    pub cards: Vec<Card>,
}

/// Commands a client may send against a room.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "camelCase")]
pub enum ClientCommand {
    /// Create a room under a client-chosen token and join it as host.
    #[serde(rename_all = "camelCase")]
    CreateRoom {
        room_id: RoomId,
        player_name: String,
        #[serde(default)]
        hand_size: Option<usize>,
        #[serde(default)]
        timer_length: Option<u64>,
    },

    /// Join an existing, not-yet-started room.
    #[serde(rename_all = "camelCase")]
    JoinRoom {
        room_id: RoomId,
        player_name: String,
    },

    /// Deal the first round. No-op below the player minimum.
    #[serde(rename_all = "camelCase")]
    StartGame { room_id: RoomId },

    /// Declare a hand on the caller's turn.
    #[serde(rename_all = "camelCase")]
    PlayHand {
        room_id: RoomId,
        hand: DeclaredHand,
    },

    /// Challenge the pending declaration.
    #[serde(rename_all = "camelCase")]
    CallBluff { room_id: RoomId },

    /// Give up the turn without declaring. Sent by the client when its
    /// local turn timer elapses.
    #[serde(rename_all = "camelCase")]
    SkipTurn { room_id: RoomId },

    /// Ask for the next round after a reveal. Duplicates are no-ops.
    #[serde(rename_all = "camelCase")]
    StartNewRound { room_id: RoomId },
}

/// Events the engine emits back through the transport.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "camelCase")]
pub enum ServerEvent {
    /// To the creator: the room exists and they are seated in it.
    #[serde(rename_all = "camelCase")]
    RoomCreated {
        room_id: RoomId,
        hand_size: usize,
        timer_length: u64,
    },

    /// To the requester only: a rejected command, any kind. The message
    /// is the human-readable error text.
    #[serde(rename_all = "camelCase")]
    JoinError { message: String },

    /// To the room: the lobby roster changed.
    #[serde(rename_all = "camelCase")]
    PlayerJoined {
        players: Vec<PlayerPublic>,
        room_id: RoomId,
        hand_size: usize,
        timer_length: u64,
    },

    /// To the room: a round is live. Sent on the initial start and again
    /// after every redeal; `players` includes eliminated seats at zero.
    #[serde(rename_all = "camelCase")]
    GameStarted {
        players: Vec<PlayerStatus>,
        current_turn: PlayerId,
        room_id: RoomId,
    },

    /// Privately to one player: their own hand.
    #[serde(rename_all = "camelCase")]
    DealCards { cards: Vec<Card> },

    /// To the room: an accepted declaration and whose turn is next.
    #[serde(rename_all = "camelCase")]
    HandPlayed {
        player_id: PlayerId,
        hand: DeclaredHand,
        next_turn: PlayerId,
        players: Vec<PlayerStatus>,
    },

    /// To the room: a turn given up without a declaration. Distinct from
    /// `handPlayed` so clients do not render a phantom hand.
    #[serde(rename_all = "camelCase")]
    TurnSkipped {
        player_id: PlayerId,
        next_turn: PlayerId,
        players: Vec<PlayerStatus>,
    },

    /// To the room: the verdict of a bluff call.
    #[serde(rename_all = "camelCase")]
    BluffResult {
        hand_exists: bool,
        calling_player: PlayerId,
        last_player: PlayerId,
        remaining_players: Vec<PlayerStatus>,
    },

    /// To the room: the auditable reveal. `players` is the snapshot of
    /// every active hand as it stood at the instant of the call, before
    /// the loser forfeits a card.
    #[serde(rename_all = "camelCase")]
    RevealAllCards {
        players: Vec<RevealedHand>,
        bluff_result: String,
        calling_player: PlayerId,
        last_player: PlayerId,
    },

    /// To the room: one player holds cards, everyone else is out.
    #[serde(rename_all = "camelCase")]
    GameOver { winner: PlayerPublic },

    /// To the room: someone disconnected; the display roster after.
    #[serde(rename_all = "camelCase")]
    PlayerLeft { players: Vec<PlayerStatus> },

    /// Privately to one player: they are out of the game.
    Eliminated,
}
