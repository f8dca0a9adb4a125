//! The `blef-server` binary.

use blef::{BlefError, BlefServer};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), BlefError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let addr = std::env::var("BLEF_ADDR")
        .unwrap_or_else(|_| "0.0.0.0:3000".to_string());

    let server = BlefServer::builder().bind(&addr).build().await?;
    server.run().await
}
