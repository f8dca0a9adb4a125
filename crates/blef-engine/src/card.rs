//! Cards and the deck: the fixed 52-card domain.

use std::fmt;

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// One of the four suits.
///
/// Suits never matter for hand strength or bluff verification; they exist
/// so the 52 cards are distinct and so clients can render them. On the
/// wire a suit is its symbol, matching the payloads the client renders
/// directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Suit {
    #[serde(rename = "♠")]
    Spades,
    #[serde(rename = "♥")]
    Hearts,
    #[serde(rename = "♦")]
    Diamonds,
    #[serde(rename = "♣")]
    Clubs,
}

impl Suit {
    /// All four suits, in a fixed (but otherwise meaningless) order.
    pub const ALL: [Suit; 4] = [
        Suit::Spades,
        Suit::Hearts,
        Suit::Diamonds,
        Suit::Clubs,
    ];

    /// The suit's display symbol.
    pub const fn symbol(self) -> &'static str {
        match self {
            Suit::Spades => "♠",
            Suit::Hearts => "♥",
            Suit::Diamonds => "♦",
            Suit::Clubs => "♣",
        }
    }
}

impl fmt::Display for Suit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Card ranks from Two (weakest) to Ace (strongest).
///
/// Discriminants are the rank's index in the strength order, so
/// [`Rank::index`] is a plain cast.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize,
    Deserialize,
)]
#[repr(u8)]
pub enum Rank {
    #[serde(rename = "2")]
    Two = 0,
    #[serde(rename = "3")]
    Three = 1,
    #[serde(rename = "4")]
    Four = 2,
    #[serde(rename = "5")]
    Five = 3,
    #[serde(rename = "6")]
    Six = 4,
    #[serde(rename = "7")]
    Seven = 5,
    #[serde(rename = "8")]
    Eight = 6,
    #[serde(rename = "9")]
    Nine = 7,
    #[serde(rename = "10")]
    Ten = 8,
    #[serde(rename = "J")]
    Jack = 9,
    #[serde(rename = "Q")]
    Queen = 10,
    #[serde(rename = "K")]
    King = 11,
    #[serde(rename = "A")]
    Ace = 12,
}

impl Rank {
    /// All thirteen ranks, weakest first.
    pub const ALL: [Rank; 13] = [
        Rank::Two,
        Rank::Three,
        Rank::Four,
        Rank::Five,
        Rank::Six,
        Rank::Seven,
        Rank::Eight,
        Rank::Nine,
        Rank::Ten,
        Rank::Jack,
        Rank::Queen,
        Rank::King,
        Rank::Ace,
    ];

    /// Position in the strength order: 0 for "2" up to 12 for "A".
    pub const fn index(self) -> usize {
        self as usize
    }

    /// The rank's display string, as it appears on the wire.
    pub const fn as_str(self) -> &'static str {
        match self {
            Rank::Two => "2",
            Rank::Three => "3",
            Rank::Four => "4",
            Rank::Five => "5",
            Rank::Six => "6",
            Rank::Seven => "7",
            Rank::Eight => "8",
            Rank::Nine => "9",
            Rank::Ten => "10",
            Rank::Jack => "J",
            Rank::Queen => "Q",
            Rank::King => "K",
            Rank::Ace => "A",
        }
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single playing card. Immutable value type.
///
/// The rank field serializes as `value`, matching the `{suit, value}`
/// card objects in the client protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Card {
    pub suit: Suit,
    #[serde(rename = "value")]
    pub rank: Rank,
}

impl Card {
    pub const fn new(suit: Suit, rank: Rank) -> Self {
        Self { suit, rank }
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.rank, self.suit)
    }
}

/// An ordered stack of cards.
///
/// A deck is only ever mutated two ways: a full uniform reshuffle, or
/// removal from the top during a deal. Cards are never created or
/// destroyed elsewhere, which is what keeps the per-room conservation
/// invariant (`|deck| + Σ hand sizes == 52`) checkable.
#[derive(Debug, Clone)]
pub struct Deck {
    cards: Vec<Card>,
}

impl Deck {
    /// A fresh 52-card deck, one of each (suit, rank) pair.
    ///
    /// Enumeration order is irrelevant; the deck is always shuffled
    /// before use.
    pub fn standard() -> Self {
        let mut cards = Vec::with_capacity(52);
        for &suit in &Suit::ALL {
            for &rank in &Rank::ALL {
                cards.push(Card::new(suit, rank));
            }
        }
        Self { cards }
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Uniformly shuffles the deck in place (Fisher–Yates, every
    /// permutation equally likely).
    pub fn shuffle_with<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.cards.shuffle(rng);
    }

    /// Removes and returns the top card.
    pub fn draw(&mut self) -> Option<Card> {
        self.cards.pop()
    }

    /// Deals one card at a time, round-robin in seating order, until
    /// every quota is met or the deck runs dry.
    ///
    /// `quotas[i]` is how many cards seat `i` should receive. The result
    /// always has one hand per quota; hands come up short only on deck
    /// exhaustion, which cannot happen in normal play (52 cards cover
    /// 6 players at 5 cards each with room to spare).
    pub fn deal(&mut self, quotas: &[usize]) -> Vec<Vec<Card>> {
        let mut hands: Vec<Vec<Card>> =
            quotas.iter().map(|&q| Vec::with_capacity(q)).collect();
        loop {
            let mut dealt = false;
            for (hand, &quota) in hands.iter_mut().zip(quotas) {
                if hand.len() < quota {
                    match self.draw() {
                        Some(card) => {
                            hand.push(card);
                            dealt = true;
                        }
                        None => return hands,
                    }
                }
            }
            if !dealt {
                return hands;
            }
        }
    }
}
