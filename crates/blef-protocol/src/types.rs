//! Identity and routing types shared by every layer.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

use crate::ProtocolError;

// ---------------------------------------------------------------------------
// Identity types
// ---------------------------------------------------------------------------

/// A unique identifier for a player.
///
/// Identity here is ephemeral: a `PlayerId` is minted when a connection is
/// accepted and dies with it. There is no account behind it.
///
/// `#[serde(transparent)]` makes `PlayerId(42)` serialize as plain `42`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(pub u64);

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P-{}", self.0)
    }
}

/// Length of a room token, in characters.
pub const ROOM_ID_LEN: usize = 6;

/// A room identifier: a client-generated 6-character base-36 token.
///
/// The server never generates these itself; the creating client picks one
/// and the registry rejects collisions. [`RoomId::parse`] is the only way
/// to construct one, so an in-memory `RoomId` is always well-formed.
/// Tokens are normalized to lowercase, making lookups case-insensitive.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct RoomId(String);

impl RoomId {
    /// Validates and normalizes a raw token.
    ///
    /// # Errors
    /// Returns [`ProtocolError::InvalidRoomId`] unless the token is exactly
    /// [`ROOM_ID_LEN`] ASCII alphanumeric characters.
    pub fn parse(token: &str) -> Result<Self, ProtocolError> {
        if token.len() != ROOM_ID_LEN
            || !token.chars().all(|c| c.is_ascii_alphanumeric())
        {
            return Err(ProtocolError::InvalidRoomId(token.to_string()));
        }
        Ok(Self(token.to_ascii_lowercase()))
    }

    /// Returns the token as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Deserialization goes through [`RoomId::parse`] so malformed tokens are
/// rejected at the wire boundary, not deep inside the engine.
impl<'de> Deserialize<'de> for RoomId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        RoomId::parse(&raw).map_err(serde::de::Error::custom)
    }
}

// ---------------------------------------------------------------------------
// Recipient
// ---------------------------------------------------------------------------

/// Specifies who should receive a server event.
///
/// Engine operations return `(Recipient, ServerEvent)` pairs; the room
/// actor fans them out to the right connections. Hands dealt to a player
/// are `Player(..)`, everything the table sees together is `All`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Recipient {
    /// Every player currently attached to the room.
    All,
    /// One specific player.
    Player(PlayerId),
}
