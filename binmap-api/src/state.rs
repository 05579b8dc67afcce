//! Shared application state for Axum routers.

use std::sync::Arc;
use std::time::Instant;

use binmap_core::BinLocation;
use binmap_store::DocumentStore;

/// The document store instantiated for bin locations.
pub type LocationStore = DocumentStore<BinLocation>;

/// Application-wide state shared across all routes.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<LocationStore>,
    pub start_time: Instant,
}

impl AppState {
    pub fn new(store: Arc<LocationStore>) -> Self {
        Self {
            store,
            start_time: Instant::now(),
        }
    }
}
