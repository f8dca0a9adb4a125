//! Room lifecycle for the Blef server.
//!
//! Each room runs as an isolated Tokio task (actor model) owning one
//! [`blef_engine::GameTable`]. The outside world talks to it through an
//! mpsc command channel; the actor serializes all game commands, so two
//! simultaneous bluff calls can never race on the same table.
//!
//! # Key types
//!
//! - [`RoomRegistry`]: creates rooms under client-chosen tokens, routes
//!   players to their room
//! - [`RoomHandle`]: send commands to a running room actor
//! - [`PlayerSender`]: per-player outbound event channel
//! - [`RoomError`]: registry-level failures (room missing, taken, gone)

mod actor;
mod error;
mod registry;

pub use actor::{PlayerSender, RoomHandle, ROUND_TRANSITION_DELAY};
pub use error::RoomError;
pub use registry::RoomRegistry;
