//! Error types for the room layer.
//!
//! Display strings are client-facing: the connection handler forwards
//! them verbatim inside `joinError` events.

use blef_protocol::{PlayerId, RoomId};

/// Errors from registry-level room operations. Table-level rejections
/// (wrong turn, weak hand, full room) never surface here; the room actor
/// reports those to the requester itself.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RoomError {
    /// A create request for a token that is already taken.
    #[error("Room already exists")]
    AlreadyExists(RoomId),

    /// No room under this token.
    #[error("Room does not exist")]
    NotFound(RoomId),

    /// The room's command channel is closed or full; the actor has
    /// stopped or is going away.
    #[error("Room is unavailable")]
    Unavailable(RoomId),

    /// A game command from a player who is not seated anywhere.
    #[error("You are not in a room")]
    NotInRoom(PlayerId),

    /// A create or join request from a player who is already seated.
    /// One room per player.
    #[error("You are already in a room")]
    AlreadyInRoom(PlayerId),
}
