//! The engine's rejection taxonomy.
//!
//! Every variant is non-fatal: a rejected command is reported to the
//! requester (as a `joinError` event carrying the Display string) and the
//! room state is left untouched. Nothing in here ever aborts a room or
//! affects other players.

/// Why a bluff call was not allowed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum NotEligibleReason {
    /// The caller has no cards left.
    #[error("You are eliminated and cannot call a bluff.")]
    CallerEliminated,

    /// The player who declared the pending hand has since been
    /// eliminated or left.
    #[error("The last player is eliminated. Cannot call bluff.")]
    DeclarerEliminated,

    /// No declaration is on the table to challenge.
    #[error("There is no hand to challenge.")]
    NoPendingHand,
}

/// A rejected command. Display strings are client-facing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum GameError {
    /// Joining after the start command has been accepted.
    #[error("Game has already started")]
    GameAlreadyStarted,

    /// The room already seats the maximum number of players.
    #[error("Room is full")]
    RoomFull,

    /// Another player in the room uses this name (case-sensitive).
    #[error("Player name already taken")]
    NameTaken,

    /// A play or skip from anyone but the current turn holder, or
    /// outside an in-progress round.
    #[error("It is not your turn.")]
    NotYourTurn,

    /// The declaration does not strictly beat the pending one.
    #[error("You must play a stronger hand than the previous one.")]
    HandTooWeak,

    /// A dual-rank shape declared with two equal ranks.
    #[error("A two-rank hand must name two different ranks.")]
    InvalidHand,

    /// The bluff call was not allowed.
    #[error("{0}")]
    NotEligible(#[from] NotEligibleReason),
}
