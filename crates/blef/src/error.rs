//! Unified error type for the server layer.

use blef_protocol::ProtocolError;
use blef_room::RoomError;

/// Top-level error that wraps the sub-crate errors plus the transport.
///
/// The `#[from]` attributes auto-generate `From` impls, so `?` converts
/// sub-crate errors automatically.
#[derive(Debug, thiserror::Error)]
pub enum BlefError {
    /// An encode/decode failure on the wire format.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// A registry-level room failure.
    #[error(transparent)]
    Room(#[from] RoomError),

    /// A WebSocket handshake, send, or receive failure.
    #[error("websocket error: {0}")]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),

    /// A socket-level failure (bind, accept).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
