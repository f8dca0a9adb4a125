//! # Blef
//!
//! WebSocket server for Blef, a multiplayer bluffing card game. Players
//! declare poker-style hands they claim exist in the union of everyone's
//! hidden cards; any player may call the bluff, the claim is checked
//! against the real pool, and the loser forfeits a card. Last player
//! holding cards wins.
//!
//! The workspace is layered:
//!
//! - `blef-protocol`: ids, recipients, and the JSON codec
//! - `blef-engine`: the transport-free game rules
//! - `blef-room`: one actor task per room, plus the registry
//! - `blef` (this crate): the WebSocket server binding it together
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use blef::BlefServer;
//!
//! # async fn run() -> Result<(), blef::BlefError> {
//! let server = BlefServer::builder().bind("0.0.0.0:3000").build().await?;
//! server.run().await
//! # }
//! ```

mod error;
mod handler;
mod server;

pub use error::BlefError;
pub use server::{BlefServer, BlefServerBuilder};
