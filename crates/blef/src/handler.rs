//! Per-connection handler: socket upgrade, command routing, cleanup.
//!
//! Each accepted socket gets its own Tokio task running this handler.
//! The flow is:
//!   1. WebSocket upgrade, assign a fresh `PlayerId`
//!   2. Loop: decode client commands, route them through the registry;
//!      forward events arriving from the player's room to the socket
//!   3. On close (either direction), report the disconnect

use std::sync::atomic::Ordering;
use std::sync::Arc;

use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::Message;

use blef_engine::{ClientCommand, ServerEvent, TableConfig};
use blef_protocol::{Codec, PlayerId};
use blef_room::PlayerSender;

use crate::server::ServerState;
use crate::BlefError;

/// Error text for payloads that do not decode to a known command.
const INVALID_COMMAND: &str = "Invalid command.";

/// Handles a single connection from accept to close.
pub(crate) async fn handle_connection(
    stream: TcpStream,
    state: Arc<ServerState>,
) -> Result<(), BlefError> {
    let ws = tokio_tungstenite::accept_async(stream).await?;
    let player_id =
        PlayerId(state.next_player_id.fetch_add(1, Ordering::Relaxed));
    tracing::debug!(%player_id, "connection established");

    let (mut sink, mut source) = ws.split();
    // The player's room delivers events through this channel; the
    // handler also pushes its own error events into it, so the socket
    // has a single writer.
    let (tx, mut rx) = mpsc::unbounded_channel::<ServerEvent>();

    let result = loop {
        tokio::select! {
            event = rx.recv() => {
                // rx cannot be exhausted while tx lives above.
                let Some(event) = event else { break Ok(()) };
                let bytes = match state.codec.encode(&event) {
                    Ok(bytes) => bytes,
                    Err(e) => break Err(BlefError::Protocol(e)),
                };
                if let Err(e) = sink.send(Message::Binary(bytes.into())).await {
                    break Err(BlefError::WebSocket(e));
                }
            }
            msg = source.next() => {
                match msg {
                    Some(Ok(Message::Binary(data))) => {
                        handle_payload(&state, player_id, &tx, &data).await;
                    }
                    Some(Ok(Message::Text(text))) => {
                        handle_payload(&state, player_id, &tx, text.as_bytes())
                            .await;
                    }
                    Some(Ok(Message::Close(_))) | None => {
                        tracing::info!(%player_id, "connection closed");
                        break Ok(());
                    }
                    Some(Ok(_)) => {} // ping/pong/frame
                    Some(Err(e)) => {
                        tracing::debug!(%player_id, error = %e, "recv error");
                        break Ok(());
                    }
                }
            }
        }
    };

    state.registry.lock().await.disconnect(player_id).await;
    result
}

/// Decodes one inbound payload and routes it. All failures come back to
/// the requester as a `joinError` event; nothing here is fatal to the
/// connection.
async fn handle_payload(
    state: &Arc<ServerState>,
    player_id: PlayerId,
    tx: &PlayerSender,
    data: &[u8],
) {
    let cmd: ClientCommand = match state.codec.decode(data) {
        Ok(cmd) => cmd,
        Err(e) => {
            tracing::debug!(%player_id, error = %e, "undecodable command");
            let _ = tx.send(ServerEvent::JoinError {
                message: INVALID_COMMAND.to_string(),
            });
            return;
        }
    };

    let result = match cmd {
        ClientCommand::CreateRoom {
            room_id,
            player_name,
            hand_size,
            timer_length,
        } => {
            let config = TableConfig {
                hand_size: hand_size.unwrap_or(state.defaults.hand_size),
                timer_secs: timer_length.unwrap_or(state.defaults.timer_secs),
            };
            state.registry.lock().await.create(
                room_id,
                player_id,
                player_name,
                config,
                tx.clone(),
            )
        }
        ClientCommand::JoinRoom {
            room_id,
            player_name,
        } => {
            state
                .registry
                .lock()
                .await
                .join(room_id, player_id, player_name, tx.clone())
                .await
        }
        game_cmd => {
            state.registry.lock().await.route(player_id, game_cmd).await
        }
    };

    if let Err(err) = result {
        tracing::debug!(%player_id, %err, "command refused");
        let _ = tx.send(ServerEvent::JoinError {
            message: err.to_string(),
        });
    }
}
