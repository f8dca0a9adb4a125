//! The Blef game engine.
//!
//! Blef is a bluffing card game: on their turn a player declares a
//! poker-style hand shape they claim exists somewhere in the union of all
//! active players' hidden cards. Each declaration must be strictly
//! stronger than the previous one. Any active player may call the bluff;
//! the claim is then checked against the true pooled cards, the loser
//! forfeits one card, hands are redealt, and players who run out of cards
//! are eliminated. The last player holding cards wins.
//!
//! This crate is the transport-free core. A [`GameTable`] is a single
//! room's aggregate state; every operation validates, mutates, and
//! returns the `(Recipient, ServerEvent)` pairs to broadcast. It never
//! blocks, never touches the network, and never panics on bad input:
//! every precondition failure degrades to a [`GameError`] that leaves the
//! table untouched.
//!
//! # Key types
//!
//! - [`Card`], [`Deck`]: the fixed 52-card domain
//! - [`DeclaredHand`]: the 8 claimable shapes, with a strict total
//!   strength order
//! - [`GameTable`]: roster, deck, pending declaration, turn pointer
//! - [`ClientCommand`], [`ServerEvent`]: the wire vocabulary
//! - [`GameError`]: the non-fatal rejection taxonomy

mod bluff;
mod card;
mod error;
mod event;
mod hand;
mod round;
mod table;

pub use bluff::hand_exists;
pub use card::{Card, Deck, Rank, Suit};
pub use error::{GameError, NotEligibleReason};
pub use event::{
    ClientCommand, Events, PlayerPublic, PlayerStatus, RevealedHand,
    ServerEvent,
};
pub use hand::DeclaredHand;
pub use table::{
    GameTable, Phase, TableConfig, MAX_HAND_SIZE, MAX_PLAYERS, MIN_PLAYERS,
};
