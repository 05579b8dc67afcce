//! REST API routes.

pub mod health;
pub mod locations;

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::state::AppState;
use crate::ws;

/// Assemble the full application router.
///
/// `/api/locations/export` and `/api/locations/import` are registered as
/// static segments alongside the `:id` capture; Axum prefers the static
/// match, so both route shapes coexist.
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/health", get(health::health))
        .route(
            "/api/locations",
            get(locations::list_locations)
                .post(locations::create_location)
                .delete(locations::clear_locations),
        )
        .route("/api/locations/all", get(locations::list_all_locations))
        .route("/api/locations/export", get(locations::export_locations))
        .route("/api/locations/import", post(locations::import_locations))
        .route(
            "/api/locations/:id",
            get(locations::get_location)
                .put(locations::update_location)
                .delete(locations::delete_location),
        )
        .route("/api/ws", get(ws::ws_handler))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
