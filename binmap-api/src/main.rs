//! binmap API server entry point.
//!
//! Bootstraps configuration, builds the gateway client and document
//! store, and starts the Axum HTTP server.

use std::sync::Arc;

use binmap_api::{create_router, ApiConfig, ApiError, ApiResult, AppState};
use binmap_core::{HdfsConfig, StoreConfig};
use binmap_events::ChangeBroadcaster;
use binmap_hdfs::HdfsClient;
use binmap_store::DocumentStore;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ApiResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let hdfs_config = HdfsConfig::from_env();
    let store_config = StoreConfig::from_env();
    let api_config = ApiConfig::from_env();

    let gateway = HdfsClient::new(&hdfs_config)
        .map_err(|e| ApiError::internal_error(format!("failed to build gateway client: {e}")))?;
    tracing::info!(
        host = %hdfs_config.host,
        user = %hdfs_config.user,
        document = %store_config.document_path,
        "gateway client initialized"
    );

    let broadcaster = ChangeBroadcaster::new(api_config.ws_capacity);
    let store = Arc::new(DocumentStore::new(gateway, &store_config, broadcaster));
    let state = Arc::new(AppState::new(store));

    let app = create_router(state);
    let addr = api_config.bind_addr()?;
    tracing::info!(%addr, "starting binmap API server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| ApiError::internal_error(format!("failed to bind {addr}: {e}")))?;

    let server = axum::serve(listener, app);
    tokio::select! {
        result = server => {
            result.map_err(|e| ApiError::internal_error(format!("server error: {e}")))?;
        }
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("shutdown signal received");
        }
    }

    Ok(())
}
