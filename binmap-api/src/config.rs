//! API server configuration, loaded from environment variables with
//! development defaults.

use std::net::SocketAddr;

use crate::error::{ApiError, ApiResult};

/// Bind address and channel sizing for the API server.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Interface to bind, e.g. "0.0.0.0".
    pub bind: String,

    /// TCP port.
    pub port: u16,

    /// Buffered change events per WebSocket subscriber before the
    /// slowest one starts lagging.
    pub ws_capacity: usize,
}

impl ApiConfig {
    /// Build from environment variables.
    ///
    /// - `BINMAP_API_BIND`: interface (default: `0.0.0.0`)
    /// - `PORT` or `BINMAP_API_PORT`: port (default: 8080)
    /// - `BINMAP_WS_CAPACITY`: event buffer size (default: 1000)
    pub fn from_env() -> Self {
        let bind = std::env::var("BINMAP_API_BIND").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = std::env::var("PORT")
            .ok()
            .or_else(|| std::env::var("BINMAP_API_PORT").ok())
            .and_then(|s| s.parse().ok())
            .unwrap_or(8080);
        let ws_capacity = std::env::var("BINMAP_WS_CAPACITY")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(1000);
        Self {
            bind,
            port,
            ws_capacity,
        }
    }

    /// The socket address to serve on.
    pub fn bind_addr(&self) -> ApiResult<SocketAddr> {
        let addr = format!("{}:{}", self.bind, self.port);
        addr.parse::<SocketAddr>()
            .map_err(|e| ApiError::invalid_input(format!("invalid bind address {addr}: {e}")))
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0".to_string(),
            port: 8080,
            ws_capacity: 1000,
        }
    }
}
