//! Error types for the protocol layer.

/// Errors that can occur while encoding, decoding, or validating
/// wire-level data.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// Serialization failed.
    #[cfg(feature = "json")]
    #[error("encode failed: {0}")]
    Encode(serde_json::Error),

    /// Deserialization failed: malformed bytes, missing fields, or a
    /// payload that does not match the expected message.
    #[cfg(feature = "json")]
    #[error("decode failed: {0}")]
    Decode(serde_json::Error),

    /// The room token is not a 6-character base-36 string.
    #[error("invalid room id: {0:?}")]
    InvalidRoomId(String),
}
