//! The per-room aggregate and its turn state machine.
//!
//! A [`GameTable`] owns everything one room needs: the seated players in
//! join order, the deck, the pending declaration, the turn pointer, and
//! the phase guard. Commands are applied synchronously, one at a time;
//! each either mutates the table and returns the events to broadcast, or
//! returns a [`GameError`] leaving the table exactly as it was.

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use blef_protocol::{PlayerId, Recipient, RoomId};

use crate::card::{Card, Deck};
use crate::error::GameError;
use crate::event::{Events, PlayerPublic, PlayerStatus, ServerEvent};
use crate::hand::DeclaredHand;

/// Room capacity.
pub const MAX_PLAYERS: usize = 6;
/// Minimum players before the start command takes effect.
pub const MIN_PLAYERS: usize = 3;
/// Largest opening hand the deck can cover at full capacity.
pub const MAX_HAND_SIZE: usize = 52 / MAX_PLAYERS;

/// Per-room settings, fixed at creation from the `createRoom` payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableConfig {
    /// Cards dealt to every player in the first round.
    pub hand_size: usize,
    /// Turn time budget in seconds. Advisory: clients run the countdown
    /// and send `skipTurn` themselves; the engine only echoes it.
    pub timer_secs: u64,
}

impl TableConfig {
    /// Brings client-supplied settings into the range the deck can
    /// serve: a zero hand size falls back to the default, an oversized
    /// one is capped at [`MAX_HAND_SIZE`] so a full table still deals.
    pub fn clamped(mut self) -> Self {
        if self.hand_size == 0 {
            self.hand_size = Self::default().hand_size;
        } else if self.hand_size > MAX_HAND_SIZE {
            self.hand_size = MAX_HAND_SIZE;
        }
        self
    }
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            hand_size: 5,
            timer_secs: 30,
        }
    }
}

/// Room lifecycle phase.
///
/// ```text
/// WaitingForPlayers → InProgress ⇄ RoundResolving → GameOver
/// ```
///
/// `RoundResolving` doubles as the round guard: a bluff call moves the
/// table there, and only the first round-transition signal moves it back
/// (or on to `GameOver`). Duplicate signals find the table already out of
/// `RoundResolving` and do nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    WaitingForPlayers,
    InProgress,
    RoundResolving,
    GameOver,
}

/// A seated player and their hidden hand.
#[derive(Debug, Clone)]
pub(crate) struct Player {
    pub(crate) id: PlayerId,
    pub(crate) name: String,
    pub(crate) hand: Vec<Card>,
}

/// One room's complete game state.
pub struct GameTable {
    id: RoomId,
    /// Active roster in seating (join) order. Never reordered; players
    /// leave only at round boundaries or on disconnect.
    pub(crate) players: Vec<Player>,
    /// Display roster: everyone who ever joined, eliminated seats frozen
    /// at zero cards.
    pub(crate) roster: Vec<PlayerStatus>,
    pub(crate) deck: Deck,
    /// The accepted declaration to beat, tagged with its declarer.
    pub(crate) pending: Option<(PlayerId, DeclaredHand)>,
    pub(crate) current_turn: PlayerId,
    /// Loser of the bluff call being resolved; consumed by the round
    /// transition to pick the next starter.
    pub(crate) last_loser: Option<PlayerId>,
    pub(crate) phase: Phase,
    config: TableConfig,
    pub(crate) rng: StdRng,
}

impl GameTable {
    /// Creates a room with the host seated and holding the first turn.
    ///
    /// Returns the table and the `roomCreated` event for the host. Token
    /// collision checks happen in the registry, not here.
    pub fn new(
        id: RoomId,
        host: PlayerId,
        host_name: String,
        config: TableConfig,
    ) -> (Self, Events) {
        Self::with_rng(id, host, host_name, config, StdRng::from_os_rng())
    }

    /// Like [`GameTable::new`] with a caller-supplied RNG, for
    /// deterministic deck order in tests.
    pub fn with_rng(
        id: RoomId,
        host: PlayerId,
        host_name: String,
        config: TableConfig,
        rng: StdRng,
    ) -> (Self, Events) {
        let config = config.clamped();
        let table = Self {
            id: id.clone(),
            players: vec![Player {
                id: host,
                name: host_name.clone(),
                hand: Vec::new(),
            }],
            roster: vec![PlayerStatus {
                id: host,
                name: host_name,
                cards_count: 0,
            }],
            deck: Deck::standard(),
            pending: None,
            current_turn: host,
            last_loser: None,
            phase: Phase::WaitingForPlayers,
            config,
            rng,
        };
        let events = vec![(
            Recipient::Player(host),
            ServerEvent::RoomCreated {
                room_id: id,
                hand_size: config.hand_size,
                timer_length: config.timer_secs,
            },
        )];
        (table, events)
    }

    pub fn id(&self) -> &RoomId {
        &self.id
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn config(&self) -> TableConfig {
        self.config
    }

    pub fn current_turn(&self) -> PlayerId {
        self.current_turn
    }

    /// `true` once the room is finished and should be torn down.
    pub fn is_finished(&self) -> bool {
        self.phase == Phase::GameOver
    }

    pub fn player_count(&self) -> usize {
        self.players.len()
    }

    /// Deck plus all active hands. Equals 52 from the start command until
    /// a card is forfeited or a player disconnects mid-round.
    pub fn card_total(&self) -> usize {
        self.deck.len()
            + self.players.iter().map(|p| p.hand.len()).sum::<usize>()
    }

    /// Seats a player. Only possible before the game starts.
    pub fn join(
        &mut self,
        player: PlayerId,
        name: String,
    ) -> Result<Events, GameError> {
        if self.phase != Phase::WaitingForPlayers {
            return Err(GameError::GameAlreadyStarted);
        }
        if self.players.len() >= MAX_PLAYERS {
            return Err(GameError::RoomFull);
        }
        if self.players.iter().any(|p| p.name == name) {
            return Err(GameError::NameTaken);
        }

        self.players.push(Player {
            id: player,
            name: name.clone(),
            hand: Vec::new(),
        });
        self.roster.push(PlayerStatus {
            id: player,
            name,
            cards_count: 0,
        });

        Ok(vec![(
            Recipient::All,
            ServerEvent::PlayerJoined {
                players: self.roster_public(),
                room_id: self.id.clone(),
                hand_size: self.config.hand_size,
                timer_length: self.config.timer_secs,
            },
        )])
    }

    /// Deals the first round and opens play. Silent no-op unless the room
    /// is still waiting and seats at least [`MIN_PLAYERS`].
    pub fn start(&mut self) -> Events {
        if self.phase != Phase::WaitingForPlayers
            || self.players.len() < MIN_PLAYERS
        {
            return Vec::new();
        }

        self.phase = Phase::InProgress;
        self.deck = Deck::standard();
        self.deck.shuffle_with(&mut self.rng);
        let quotas = vec![self.config.hand_size; self.players.len()];
        let hands = self.deck.deal(&quotas);
        for (player, hand) in self.players.iter_mut().zip(hands) {
            player.hand = hand;
        }
        self.sync_roster_counts();

        self.round_open_events()
    }

    /// Accepts a declaration from the turn holder and passes the turn.
    pub fn play_hand(
        &mut self,
        player: PlayerId,
        hand: DeclaredHand,
    ) -> Result<Events, GameError> {
        if self.phase != Phase::InProgress || player != self.current_turn {
            return Err(GameError::NotYourTurn);
        }
        hand.validate()?;
        if let Some((_, pending)) = &self.pending {
            if !hand.beats(pending) {
                return Err(GameError::HandTooWeak);
            }
        }

        self.pending = Some((player, hand));
        self.current_turn = self.seat_after(player);

        Ok(vec![(
            Recipient::All,
            ServerEvent::HandPlayed {
                player_id: player,
                hand,
                next_turn: self.current_turn,
                players: self.roster_status(),
            },
        )])
    }

    /// Passes the turn without a declaration. The pending hand and its
    /// declarer are untouched. An out-of-turn or out-of-phase skip is
    /// dropped silently.
    pub fn skip_turn(&mut self, player: PlayerId) -> Events {
        if self.phase != Phase::InProgress || player != self.current_turn {
            return Vec::new();
        }

        self.current_turn = self.seat_after(player);

        vec![(
            Recipient::All,
            ServerEvent::TurnSkipped {
                player_id: player,
                next_turn: self.current_turn,
                players: self.roster_status(),
            },
        )]
    }

    /// Handles a disconnect: removes the player from the active roster.
    /// In the lobby their display entry is dropped too (the seat and the
    /// name become free again); mid-game it is kept at zero cards. If
    /// they held the turn it advances to the next seat so the room
    /// cannot stall. An emptied room finishes silently.
    pub fn remove_player(&mut self, player: PlayerId) -> Events {
        let Some(idx) = self.players.iter().position(|p| p.id == player)
        else {
            return Vec::new();
        };

        let next = self.seat_after(player);
        self.players.remove(idx);

        if self.players.is_empty() {
            self.phase = Phase::GameOver;
            return Vec::new();
        }

        if self.phase == Phase::WaitingForPlayers {
            self.roster.retain(|e| e.id != player);
        } else if let Some(entry) =
            self.roster.iter_mut().find(|e| e.id == player)
        {
            entry.cards_count = 0;
        }
        if self.current_turn == player {
            self.current_turn = next;
        }

        vec![(
            Recipient::All,
            ServerEvent::PlayerLeft {
                players: self.roster_status(),
            },
        )]
    }

    /// The seat after `player` in join order, wrapping around.
    pub(crate) fn seat_after(&self, player: PlayerId) -> PlayerId {
        let idx = self
            .players
            .iter()
            .position(|p| p.id == player)
            .unwrap_or(0);
        self.players[(idx + 1) % self.players.len()].id
    }

    /// Refreshes display counts from the active hands.
    pub(crate) fn sync_roster_counts(&mut self) {
        for entry in &mut self.roster {
            entry.cards_count = self
                .players
                .iter()
                .find(|p| p.id == entry.id)
                .map_or(0, |p| p.hand.len());
        }
    }

    pub(crate) fn roster_public(&self) -> Vec<PlayerPublic> {
        self.roster
            .iter()
            .map(|e| PlayerPublic {
                id: e.id,
                name: e.name.clone(),
            })
            .collect()
    }

    pub(crate) fn roster_status(&self) -> Vec<PlayerStatus> {
        self.roster.clone()
    }

    /// `gameStarted` broadcast plus a private `dealCards` per player.
    /// Used both on the initial start and after every redeal.
    pub(crate) fn round_open_events(&self) -> Events {
        let mut events: Events = vec![(
            Recipient::All,
            ServerEvent::GameStarted {
                players: self.roster_status(),
                current_turn: self.current_turn,
                room_id: self.id.clone(),
            },
        )];
        for player in &self.players {
            events.push((
                Recipient::Player(player.id),
                ServerEvent::DealCards {
                    cards: player.hand.clone(),
                },
            ));
        }
        events
    }
}
