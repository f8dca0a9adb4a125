//! Declared hands and their strength order.
//!
//! A declaration names a shape and the rank(s) it is built from; it says
//! nothing about suits and does not have to come from the declarer's own
//! cards. Strength is a strict total order so that any two declarations
//! are comparable and each play can be required to be strictly stronger
//! than the pending one.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::card::Rank;
use crate::error::GameError;

/// Shape tier dominates rank: one step of shape is worth more than the
/// strongest possible rank contribution.
const SHAPE_BASE: u32 = 10_000;
/// Primary rank dominates the kicker the same way.
const PRIMARY_BASE: u32 = 100;

/// A poker-style hand shape a player claims exists in the pooled cards.
///
/// Each variant carries exactly the ranks its shape requires, so a
/// declaration with a missing or extra rank is unrepresentable. For the
/// two-rank shapes other than `TwoPairs`, `rank1` is the primary (the
/// triple or quadra) and `rank2` the kicker; for `TwoPairs` the order of
/// the fields is irrelevant.
///
/// Wire format is internally tagged, e.g.
/// `{"type": "full_house", "rank1": "K", "rank2": "9"}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DeclaredHand {
    HighCard { rank: Rank },
    Pair { rank: Rank },
    TwoPairs { rank1: Rank, rank2: Rank },
    Triple { rank: Rank },
    TripleAndHigh { rank1: Rank, rank2: Rank },
    FullHouse { rank1: Rank, rank2: Rank },
    Quadra { rank: Rank },
    QuadraAndHigh { rank1: Rank, rank2: Rank },
}

impl DeclaredHand {
    /// Shape tier, weakest (0, high card) to strongest (7, quadra and
    /// high).
    pub const fn shape_index(&self) -> u32 {
        match self {
            DeclaredHand::HighCard { .. } => 0,
            DeclaredHand::Pair { .. } => 1,
            DeclaredHand::TwoPairs { .. } => 2,
            DeclaredHand::Triple { .. } => 3,
            DeclaredHand::TripleAndHigh { .. } => 4,
            DeclaredHand::FullHouse { .. } => 5,
            DeclaredHand::Quadra { .. } => 6,
            DeclaredHand::QuadraAndHigh { .. } => 7,
        }
    }

    /// Checks the declaration is well-formed: every two-rank shape must
    /// name two different ranks.
    ///
    /// # Errors
    /// Returns [`GameError::InvalidHand`] for declarations like
    /// `two_pairs(3, 3)`.
    pub fn validate(&self) -> Result<(), GameError> {
        match self {
            DeclaredHand::TwoPairs { rank1, rank2 }
            | DeclaredHand::TripleAndHigh { rank1, rank2 }
            | DeclaredHand::FullHouse { rank1, rank2 }
            | DeclaredHand::QuadraAndHigh { rank1, rank2 }
                if rank1 == rank2 =>
            {
                Err(GameError::InvalidHand)
            }
            _ => Ok(()),
        }
    }

    /// The (primary, secondary) rank indices used for intra-shape
    /// comparison. Shapes with no kicker use 0 as the secondary.
    fn rank_indices(&self) -> (u32, u32) {
        match *self {
            DeclaredHand::HighCard { rank }
            | DeclaredHand::Pair { rank }
            | DeclaredHand::Triple { rank }
            | DeclaredHand::Quadra { rank } => (rank.index() as u32, 0),
            // Input order is irrelevant: the higher pair is primary.
            DeclaredHand::TwoPairs { rank1, rank2 } => {
                let (hi, lo) = if rank1.index() >= rank2.index() {
                    (rank1, rank2)
                } else {
                    (rank2, rank1)
                };
                (hi.index() as u32, lo.index() as u32)
            }
            // rank1 is always the triple/quadra, rank2 the kicker.
            DeclaredHand::TripleAndHigh { rank1, rank2 }
            | DeclaredHand::FullHouse { rank1, rank2 }
            | DeclaredHand::QuadraAndHigh { rank1, rank2 } => {
                (rank1.index() as u32, rank2.index() as u32)
            }
        }
    }

    /// Total strength. Shape always dominates rank and the primary rank
    /// always dominates the kicker; the bases leave no room for
    /// collisions across tiers.
    pub fn strength(&self) -> u32 {
        let (primary, secondary) = self.rank_indices();
        self.shape_index() * SHAPE_BASE + primary * PRIMARY_BASE + secondary
    }

    /// `true` if this declaration is strictly stronger than `other`.
    pub fn beats(&self, other: &DeclaredHand) -> bool {
        self.strength() > other.strength()
    }
}

impl fmt::Display for DeclaredHand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            DeclaredHand::HighCard { rank } => write!(f, "high card {rank}"),
            DeclaredHand::Pair { rank } => write!(f, "pair of {rank}"),
            DeclaredHand::TwoPairs { rank1, rank2 } => {
                write!(f, "two pairs, {rank1} and {rank2}")
            }
            DeclaredHand::Triple { rank } => write!(f, "triple {rank}"),
            DeclaredHand::TripleAndHigh { rank1, rank2 } => {
                write!(f, "triple {rank1} with {rank2} high")
            }
            DeclaredHand::FullHouse { rank1, rank2 } => {
                write!(f, "full house, {rank1} over {rank2}")
            }
            DeclaredHand::Quadra { rank } => write!(f, "quadra {rank}"),
            DeclaredHand::QuadraAndHigh { rank1, rank2 } => {
                write!(f, "quadra {rank1} with {rank2} high")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Every well-formed declaration, one per distinct strength value.
    fn all_hands() -> Vec<DeclaredHand> {
        let mut hands = Vec::new();
        for &rank in &Rank::ALL {
            hands.push(DeclaredHand::HighCard { rank });
            hands.push(DeclaredHand::Pair { rank });
            hands.push(DeclaredHand::Triple { rank });
            hands.push(DeclaredHand::Quadra { rank });
        }
        for &rank1 in &Rank::ALL {
            for &rank2 in &Rank::ALL {
                if rank1 == rank2 {
                    continue;
                }
                // TwoPairs is order-symmetric; keep one representative.
                if rank1 > rank2 {
                    hands.push(DeclaredHand::TwoPairs { rank1, rank2 });
                }
                hands.push(DeclaredHand::TripleAndHigh { rank1, rank2 });
                hands.push(DeclaredHand::FullHouse { rank1, rank2 });
                hands.push(DeclaredHand::QuadraAndHigh { rank1, rank2 });
            }
        }
        hands
    }

    #[test]
    fn test_strength_is_a_strict_total_order() {
        let mut hands = all_hands();
        hands.sort_by_key(DeclaredHand::strength);
        for pair in hands.windows(2) {
            assert!(
                pair[0].strength() < pair[1].strength(),
                "collision between {} and {}",
                pair[0],
                pair[1]
            );
        }
    }

    #[test]
    fn test_shape_dominates_rank() {
        // The weakest pair beats the strongest high card, and so on up
        // the shape ladder.
        let strongest_per_shape = [
            DeclaredHand::HighCard { rank: Rank::Ace },
            DeclaredHand::Pair { rank: Rank::Ace },
            DeclaredHand::TwoPairs { rank1: Rank::Ace, rank2: Rank::King },
            DeclaredHand::Triple { rank: Rank::Ace },
            DeclaredHand::TripleAndHigh { rank1: Rank::Ace, rank2: Rank::King },
            DeclaredHand::FullHouse { rank1: Rank::Ace, rank2: Rank::King },
            DeclaredHand::Quadra { rank: Rank::Ace },
        ];
        let weakest_per_shape = [
            DeclaredHand::Pair { rank: Rank::Two },
            DeclaredHand::TwoPairs { rank1: Rank::Three, rank2: Rank::Two },
            DeclaredHand::Triple { rank: Rank::Two },
            DeclaredHand::TripleAndHigh { rank1: Rank::Two, rank2: Rank::Three },
            DeclaredHand::FullHouse { rank1: Rank::Two, rank2: Rank::Three },
            DeclaredHand::Quadra { rank: Rank::Two },
            DeclaredHand::QuadraAndHigh { rank1: Rank::Two, rank2: Rank::Three },
        ];
        for (weak, strong) in strongest_per_shape.iter().zip(&weakest_per_shape) {
            assert!(strong.beats(weak), "{strong} should beat {weak}");
        }
    }

    #[test]
    fn test_two_pairs_is_order_symmetric() {
        let a = DeclaredHand::TwoPairs { rank1: Rank::Three, rank2: Rank::Seven };
        let b = DeclaredHand::TwoPairs { rank1: Rank::Seven, rank2: Rank::Three };
        assert_eq!(a.strength(), b.strength());
    }

    #[test]
    fn test_two_pairs_compares_high_pair_first() {
        let high = DeclaredHand::TwoPairs { rank1: Rank::Two, rank2: Rank::King };
        let low = DeclaredHand::TwoPairs { rank1: Rank::Queen, rank2: Rank::Jack };
        assert!(high.beats(&low));
    }

    #[test]
    fn test_primary_dominates_kicker() {
        // full_house(K, 2) beats full_house(Q, A): the triple decides.
        let k_over_2 = DeclaredHand::FullHouse { rank1: Rank::King, rank2: Rank::Two };
        let q_over_a = DeclaredHand::FullHouse { rank1: Rank::Queen, rank2: Rank::Ace };
        assert!(k_over_2.beats(&q_over_a));
    }

    #[test]
    fn test_primary_shapes_are_not_order_interchangeable() {
        let a = DeclaredHand::FullHouse { rank1: Rank::King, rank2: Rank::Nine };
        let b = DeclaredHand::FullHouse { rank1: Rank::Nine, rank2: Rank::King };
        assert_ne!(a.strength(), b.strength());
        assert!(a.beats(&b));
    }

    #[test]
    fn test_validate_rejects_equal_ranks_in_dual_rank_shapes() {
        let bad = [
            DeclaredHand::TwoPairs { rank1: Rank::Three, rank2: Rank::Three },
            DeclaredHand::TripleAndHigh { rank1: Rank::Five, rank2: Rank::Five },
            DeclaredHand::FullHouse { rank1: Rank::Ace, rank2: Rank::Ace },
            DeclaredHand::QuadraAndHigh { rank1: Rank::Ten, rank2: Rank::Ten },
        ];
        for hand in bad {
            assert!(matches!(hand.validate(), Err(GameError::InvalidHand)));
        }
        let ok = DeclaredHand::Pair { rank: Rank::Three };
        assert!(ok.validate().is_ok());
    }

    #[test]
    fn test_wire_format_single_rank() {
        let hand = DeclaredHand::Pair { rank: Rank::King };
        let json = serde_json::to_value(&hand).unwrap();
        assert_eq!(json["type"], "pair");
        assert_eq!(json["rank"], "K");
    }

    #[test]
    fn test_wire_format_dual_rank() {
        let hand = DeclaredHand::TripleAndHigh { rank1: Rank::Nine, rank2: Rank::Ace };
        let json = serde_json::to_value(&hand).unwrap();
        assert_eq!(json["type"], "triple_and_high");
        assert_eq!(json["rank1"], "9");
        assert_eq!(json["rank2"], "A");
        let back: DeclaredHand = serde_json::from_value(json).unwrap();
        assert_eq!(back, hand);
    }

    #[test]
    fn test_wire_rejects_missing_rank2() {
        let raw = r#"{"type": "full_house", "rank1": "K"}"#;
        let result: Result<DeclaredHand, _> = serde_json::from_str(raw);
        assert!(result.is_err());
    }
}
