//! Round resolution: bluff calls and the transition into the next round.
//!
//! A bluff call ends the betting phase of a round. The table reveals
//! every active hand, verdicts the pending declaration against the pooled
//! cards, takes one card from the loser, and parks in
//! [`Phase::RoundResolving`] until a round-transition signal arrives. The
//! transition eliminates emptied players, detects the winner, redeals,
//! and hands the first turn to the seat after the loser.

use blef_protocol::{PlayerId, Recipient};

use crate::bluff::hand_exists;
use crate::card::{Card, Deck};
use crate::error::{GameError, NotEligibleReason};
use crate::event::{Events, PlayerPublic, RevealedHand, ServerEvent};
use crate::table::{GameTable, Phase};

/// Reveal caption when the declared hand was really in the pool.
const BLUFF_CALL_FAILED: &str = "Bluff call failed! The hand was real.";
/// Reveal caption when it was not.
const BLUFF_CALL_SUCCEEDED: &str =
    "Bluff call successful! The hand was fake.";

impl GameTable {
    /// Resolves a bluff call from `caller` against the pending
    /// declaration.
    ///
    /// On success the reveal snapshot is taken before the loser forfeits
    /// a card, so clients can audit the verdict against the exact pool it
    /// was computed from. The table moves to [`Phase::RoundResolving`];
    /// play stays frozen until [`GameTable::start_new_round`].
    ///
    /// # Errors
    /// [`GameError::NotEligible`] when the caller is eliminated, the
    /// declarer is gone, or there is nothing to challenge.
    pub fn call_bluff(
        &mut self,
        caller: PlayerId,
    ) -> Result<Events, GameError> {
        if self.phase != Phase::InProgress {
            return Err(NotEligibleReason::NoPendingHand.into());
        }
        let caller_has_cards = self
            .players
            .iter()
            .any(|p| p.id == caller && !p.hand.is_empty());
        if !caller_has_cards {
            return Err(NotEligibleReason::CallerEliminated.into());
        }
        let Some((declarer, hand)) = self.pending else {
            return Err(NotEligibleReason::NoPendingHand.into());
        };
        let declarer_has_cards = self
            .players
            .iter()
            .any(|p| p.id == declarer && !p.hand.is_empty());
        if !declarer_has_cards {
            return Err(NotEligibleReason::DeclarerEliminated.into());
        }

        // Snapshot before forfeiture so the reveal matches the verdict.
        let reveal: Vec<RevealedHand> = self
            .players
            .iter()
            .map(|p| RevealedHand {
                id: p.id,
                name: p.name.clone(),
                cards: p.hand.clone(),
            })
            .collect();
        let pool: Vec<Card> = self
            .players
            .iter()
            .flat_map(|p| p.hand.iter().copied())
            .collect();

        let exists = hand_exists(&hand, &pool);
        let loser = if exists { caller } else { declarer };
        if let Some(p) = self.players.iter_mut().find(|p| p.id == loser) {
            p.hand.pop();
        }
        self.last_loser = Some(loser);
        self.phase = Phase::RoundResolving;
        self.sync_roster_counts();

        let caption = if exists {
            BLUFF_CALL_FAILED
        } else {
            BLUFF_CALL_SUCCEEDED
        };
        Ok(vec![
            (
                Recipient::All,
                ServerEvent::RevealAllCards {
                    players: reveal,
                    bluff_result: caption.to_owned(),
                    calling_player: caller,
                    last_player: declarer,
                },
            ),
            (
                Recipient::All,
                ServerEvent::BluffResult {
                    hand_exists: exists,
                    calling_player: caller,
                    last_player: declarer,
                    remaining_players: self.roster_status(),
                },
            ),
        ])
    }

    /// Moves a resolving table into the next round (or ends the game).
    ///
    /// Accepted from the server-side transition timer and from client
    /// `startNewRound` commands alike; whichever arrives first wins and
    /// the rest find the table out of [`Phase::RoundResolving`] and do
    /// nothing. Eliminations happen here, not at forfeiture time, so a
    /// player on zero cards still appears in the reveal of the round that
    /// knocked them out.
    pub fn start_new_round(&mut self) -> Events {
        if self.phase != Phase::RoundResolving {
            return Vec::new();
        }

        // Seating order as it stood before this round's eliminations;
        // the next starter is picked against it.
        let prev_order: Vec<PlayerId> =
            self.players.iter().map(|p| p.id).collect();
        let loser = self.last_loser;

        let eliminated: Vec<PlayerId> = self
            .players
            .iter()
            .filter(|p| p.hand.is_empty())
            .map(|p| p.id)
            .collect();
        self.players.retain(|p| !p.hand.is_empty());

        let mut events: Events = eliminated
            .iter()
            .map(|&id| (Recipient::Player(id), ServerEvent::Eliminated))
            .collect();

        if self.players.len() <= 1 {
            if let Some(winner) = self.players.first() {
                events.push((
                    Recipient::All,
                    ServerEvent::GameOver {
                        winner: PlayerPublic {
                            id: winner.id,
                            name: winner.name.clone(),
                        },
                    },
                ));
            }
            self.phase = Phase::GameOver;
            return events;
        }

        self.deck = Deck::standard();
        self.deck.shuffle_with(&mut self.rng);
        let quotas: Vec<usize> =
            self.players.iter().map(|p| p.hand.len()).collect();
        let hands = self.deck.deal(&quotas);
        for (player, hand) in self.players.iter_mut().zip(hands) {
            player.hand = hand;
        }

        self.current_turn = self.starter_after(&prev_order, loser);
        self.pending = None;
        self.last_loser = None;
        self.phase = Phase::InProgress;
        self.sync_roster_counts();

        events.extend(self.round_open_events());
        events
    }

    /// The next starter: the first survivor after `loser` in the
    /// pre-elimination seating order, wrapping around. Falls back to the
    /// first survivor when the loser is unknown (e.g. they disconnected
    /// before the transition).
    fn starter_after(
        &self,
        prev_order: &[PlayerId],
        loser: Option<PlayerId>,
    ) -> PlayerId {
        let alive = |id: PlayerId| self.players.iter().any(|p| p.id == id);
        if let Some(loser) = loser {
            if let Some(idx) = prev_order.iter().position(|&id| id == loser)
            {
                for offset in 1..=prev_order.len() {
                    let candidate =
                        prev_order[(idx + offset) % prev_order.len()];
                    if alive(candidate) {
                        return candidate;
                    }
                }
            }
        }
        self.players[0].id
    }
}
