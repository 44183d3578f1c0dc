//! Holdings API Server
//!
//! Run with: cargo run --bin holdings-api
//!
//! # Configuration
//!
//! Read from the first config file found (see `holdings config`), then
//! environment variables:
//! - `HOLDINGS_SNAPSHOT`: Snapshot file (default: data.sqlite3)
//! - `HOLDINGS_API_HOST`: Host to bind to (default: 0.0.0.0)
//! - `HOLDINGS_API_PORT`: Port to listen on (default: 8090)
//! - `HOLDINGS_LOG_LEVEL`: Log level (default: info)
//! - `HOLDINGS_LOG_FORMAT`: pretty or json (default: pretty)
//! - `RUST_LOG`: Full filter, overrides the log level

use holdings::api::{serve, AppState};
use holdings::config::Config;
use holdings::snapshot::SnapshotLoader;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::load_default();

    // Initialize tracing
    holdings::logging::init_tracing(&config.logging);

    tracing::info!("Starting Holdings API server v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!("Snapshot: {:?}", config.snapshot.path);

    let state = AppState::new(config.clone());

    // Load the snapshot in the background; the page shows a loading notice meanwhile
    let path = config.snapshot.path.clone();
    state.query.load_from(async move {
        match SnapshotLoader::from_path(&path).await {
            Ok(snapshot) => snapshot,
            Err(e) => {
                tracing::error!("Failed to read snapshot {:?}: {}", path, e);
                None
            }
        }
    });

    // Run server
    tracing::info!("Starting server on {}", config.api.addr());
    serve(state).await?;

    tracing::info!("Holdings API server stopped");
    Ok(())
}
