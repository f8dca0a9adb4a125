//! Wire-level building blocks for Blef.
//!
//! This crate defines the pieces every other layer agrees on:
//!
//! - **Identity** ([`PlayerId`], [`RoomId`]): who is talking and which
//!   table they are talking about.
//! - **Routing** ([`Recipient`]): who should receive an outbound event.
//! - **Codec** ([`Codec`] trait, [`JsonCodec`]): how messages are
//!   converted to and from bytes.
//! - **Errors** ([`ProtocolError`]): what can go wrong while doing so.
//!
//! The protocol layer knows nothing about cards, turns, or rooms. It sits
//! below the engine and only moves structured data around.

mod codec;
mod error;
mod types;

pub use codec::Codec;
#[cfg(feature = "json")]
pub use codec::JsonCodec;
pub use error::ProtocolError;
pub use types::{PlayerId, Recipient, RoomId, ROOM_ID_LEN};
