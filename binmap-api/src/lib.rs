//! binmap API — REST/WebSocket layer over the document store.
//!
//! Exposes CRUD, import/export, and clear operations on the bin-location
//! document, plus a WebSocket endpoint that pushes every change event to
//! connected clients.

pub mod config;
pub mod error;
pub mod routes;
pub mod state;
pub mod types;
pub mod ws;

pub use config::ApiConfig;
pub use error::{ApiError, ApiResult, ErrorCode};
pub use routes::create_router;
pub use state::{AppState, LocationStore};
