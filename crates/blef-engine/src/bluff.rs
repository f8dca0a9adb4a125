//! Bluff verification: does a declared hand exist in the pooled cards?
//!
//! The check runs against the union of all active players' hidden hands,
//! counted by rank only. Suits never matter and the pool is never shown
//! to anyone before a bluff call forces the reveal.

use crate::card::{Card, Rank};
use crate::hand::DeclaredHand;

/// Per-rank card counts for a pool.
fn rank_counts(pool: &[Card]) -> [u8; 13] {
    let mut counts = [0u8; 13];
    for card in pool {
        counts[card.rank.index()] += 1;
    }
    counts
}

/// Returns `true` if the declared hand exists in `pool`.
///
/// Existence only requires enough cards of each named rank; e.g. a
/// `full_house(K, 9)` exists as soon as the pool holds three kings and
/// two nines, regardless of who holds them. Dual-rank shapes with equal
/// ranks never exist (they are also rejected at declaration time).
pub fn hand_exists(hand: &DeclaredHand, pool: &[Card]) -> bool {
    let counts = rank_counts(pool);
    let count = |r: Rank| counts[r.index()];
    match *hand {
        DeclaredHand::HighCard { rank } => count(rank) >= 1,
        DeclaredHand::Pair { rank } => count(rank) >= 2,
        DeclaredHand::TwoPairs { rank1, rank2 } => {
            rank1 != rank2 && count(rank1) >= 2 && count(rank2) >= 2
        }
        DeclaredHand::Triple { rank } => count(rank) >= 3,
        DeclaredHand::TripleAndHigh { rank1, rank2 } => {
            rank1 != rank2 && count(rank1) >= 3 && count(rank2) >= 1
        }
        DeclaredHand::FullHouse { rank1, rank2 } => {
            rank1 != rank2 && count(rank1) >= 3 && count(rank2) >= 2
        }
        DeclaredHand::Quadra { rank } => count(rank) >= 4,
        DeclaredHand::QuadraAndHigh { rank1, rank2 } => {
            rank1 != rank2 && count(rank1) >= 4 && count(rank2) >= 1
        }
    }
}
