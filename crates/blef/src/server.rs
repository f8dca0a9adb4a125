//! `BlefServer` builder and accept loop.
//!
//! Ties the layers together: WebSocket transport → JSON protocol →
//! room registry → game engine.

use std::sync::atomic::AtomicU64;
use std::sync::Arc;

use tokio::net::TcpListener;
use tokio::sync::Mutex;

use blef_engine::TableConfig;
use blef_protocol::JsonCodec;
use blef_room::RoomRegistry;

use crate::handler::handle_connection;
use crate::BlefError;

/// Shared server state passed to each connection handler task.
///
/// Wrapped in `Arc` so it can be cheaply cloned across tasks. The
/// registry sits behind a `Mutex`; it is only touched on membership
/// changes and command routing, the per-room work happens in the room
/// actors.
pub(crate) struct ServerState {
    pub(crate) registry: Mutex<RoomRegistry>,
    pub(crate) codec: JsonCodec,
    /// Table settings used when a create request omits them.
    pub(crate) defaults: TableConfig,
    /// Connection counter; each accepted socket becomes a player id.
    pub(crate) next_player_id: AtomicU64,
}

/// Builder for configuring and starting a Blef server.
///
/// # Example
///
/// ```rust,no_run
/// use blef::BlefServer;
///
/// # async fn run() -> Result<(), blef::BlefError> {
/// let server = BlefServer::builder()
///     .bind("0.0.0.0:3000")
///     .build()
///     .await?;
/// server.run().await
/// # }
/// ```
pub struct BlefServerBuilder {
    bind_addr: String,
    defaults: TableConfig,
}

impl BlefServerBuilder {
    pub fn new() -> Self {
        Self {
            bind_addr: "127.0.0.1:3000".to_string(),
            defaults: TableConfig::default(),
        }
    }

    /// Sets the address to bind the server to.
    pub fn bind(mut self, addr: &str) -> Self {
        self.bind_addr = addr.to_string();
        self
    }

    /// Sets the table settings used when a create request omits them.
    pub fn table_defaults(mut self, defaults: TableConfig) -> Self {
        self.defaults = defaults;
        self
    }

    /// Binds the listener and builds the server.
    pub async fn build(self) -> Result<BlefServer, BlefError> {
        let listener = TcpListener::bind(&self.bind_addr).await?;
        tracing::info!(addr = %self.bind_addr, "listening");

        let state = Arc::new(ServerState {
            registry: Mutex::new(RoomRegistry::new()),
            codec: JsonCodec,
            defaults: self.defaults,
            next_player_id: AtomicU64::new(1),
        });

        Ok(BlefServer { listener, state })
    }
}

impl Default for BlefServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A running Blef game server.
///
/// Call [`run()`](Self::run) to start accepting connections.
pub struct BlefServer {
    listener: TcpListener,
    state: Arc<ServerState>,
}

impl BlefServer {
    pub fn builder() -> BlefServerBuilder {
        BlefServerBuilder::new()
    }

    /// Returns the local address the server is bound to.
    pub fn local_addr(&self) -> std::io::Result<std::net::SocketAddr> {
        self.listener.local_addr()
    }

    /// Runs the accept loop. Each connection gets its own handler task;
    /// the WebSocket upgrade happens inside the task so a slow client
    /// cannot stall the loop. Runs until the process is terminated.
    pub async fn run(self) -> Result<(), BlefError> {
        tracing::info!("Blef server running");

        loop {
            match self.listener.accept().await {
                Ok((stream, addr)) => {
                    let state = Arc::clone(&self.state);
                    tokio::spawn(async move {
                        if let Err(e) =
                            handle_connection(stream, state).await
                        {
                            tracing::debug!(
                                %addr,
                                error = %e,
                                "connection ended with error"
                            );
                        }
                    });
                }
                Err(e) => {
                    tracing::error!(error = %e, "accept failed");
                }
            }
        }
    }
}
