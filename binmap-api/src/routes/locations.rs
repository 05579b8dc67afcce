//! Bin-location REST routes.
//!
//! Per-record mutations run through [`DocumentStore::mutate`] so each
//! read-modify-write cycle executes as the single writer; the store emits
//! the change event on success, so handlers never broadcast themselves.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use binmap_core::BinLocation;
use binmap_events::ChangeEvent;
use uuid::Uuid;

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;
use crate::types::{
    AckResponse, BulkSummary, CreateLocationRequest, ImportLocationRecord, ListLocationsQuery,
    UpdateLocationRequest,
};

/// GET /api/locations - list with name and fill-level filters
pub async fn list_locations(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ListLocationsQuery>,
) -> impl IntoResponse {
    let needle = params.q.unwrap_or_default().to_lowercase();
    let min_status = params.min_status.unwrap_or(0);

    let document = state.store.get_document().await;
    let filtered: Vec<BinLocation> = document
        .into_iter()
        .filter(|r| r.name.to_lowercase().contains(&needle) && r.status >= min_status)
        .collect();

    Json(filtered)
}

/// GET /api/locations/all - the whole document
pub async fn list_all_locations(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(state.store.get_document().await)
}

/// POST /api/locations - create a location
pub async fn create_location(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateLocationRequest>,
) -> ApiResult<impl IntoResponse> {
    let (Some(lat), Some(lng)) = (req.lat, req.lng) else {
        return Err(ApiError::missing_field("lat/lng"));
    };

    let status = req.effective_status();
    let mut record = BinLocation::new(
        req.name.unwrap_or_else(|| "Unnamed".to_string()),
        lat,
        lng,
        status,
    );
    record.bin_id = req.bin_id;

    state
        .store
        .mutate(|document| {
            document.push(record.clone());
            Some((ChangeEvent::created(record.clone()), ()))
        })
        .await?;

    Ok((StatusCode::CREATED, Json(record)))
}

/// GET /api/locations/{id} - fetch one location
pub async fn get_location(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<BinLocation>> {
    state
        .store
        .get_document()
        .await
        .into_iter()
        .find(|r| r.id == id)
        .map(Json)
        .ok_or_else(|| ApiError::not_found(id))
}

/// PUT /api/locations/{id} - patch fields of one location
pub async fn update_location(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateLocationRequest>,
) -> ApiResult<Json<BinLocation>> {
    let updated = state
        .store
        .mutate(move |document| {
            let entry = document.iter_mut().find(|r| r.id == id)?;
            if let Some(name) = req.name {
                entry.name = name;
            }
            if let Some(lat) = req.lat {
                entry.lat = lat;
            }
            if let Some(lng) = req.lng {
                entry.lng = lng;
            }
            if let Some(bin_id) = req.bin_id {
                entry.bin_id = Some(bin_id);
            }
            if let Some(status) = req.status.or(req.bin_level) {
                entry.set_status(status);
            }
            entry.touch();
            let snapshot = entry.clone();
            Some((ChangeEvent::updated(snapshot.clone()), snapshot))
        })
        .await?;

    updated.map(Json).ok_or_else(|| ApiError::not_found(id))
}

/// DELETE /api/locations/{id} - remove one location
pub async fn delete_location(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<AckResponse>> {
    let removed = state
        .store
        .mutate(move |document| {
            let idx = document.iter().position(|r| r.id == id)?;
            let record = document.remove(idx);
            Some((ChangeEvent::deleted(record.clone()), record))
        })
        .await?;

    match removed {
        Some(_) => Ok(Json(AckResponse { ok: true })),
        None => Err(ApiError::not_found(id)),
    }
}

/// GET /api/locations/export - whole document as a JSON attachment
pub async fn export_locations(
    State(state): State<Arc<AppState>>,
) -> ApiResult<impl IntoResponse> {
    let document = state.store.get_document().await;
    let body = serde_json::to_string_pretty(&document)
        .map_err(|e| ApiError::internal_error(format!("failed to serialize export: {e}")))?;

    Ok((
        [
            (header::CONTENT_TYPE, "application/json"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"locations.json\"",
            ),
        ],
        body,
    ))
}

/// POST /api/locations/import - replace the document wholesale
pub async fn import_locations(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<Vec<ImportLocationRecord>>,
) -> ApiResult<Json<BulkSummary>> {
    let document: Vec<BinLocation> = payload
        .into_iter()
        .map(ImportLocationRecord::into_location)
        .collect();
    let count = document.len();

    state
        .store
        .put_document(document, ChangeEvent::imported(count))
        .await?;

    Ok(Json(BulkSummary { ok: true, count }))
}

/// DELETE /api/locations - clear the document
pub async fn clear_locations(
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<BulkSummary>> {
    let count = state
        .store
        .mutate(|document| {
            let count = document.len();
            document.clear();
            Some((ChangeEvent::cleared(count), count))
        })
        .await?
        .ok_or_else(|| ApiError::internal_error("clear mutation did not apply"))?;

    Ok(Json(BulkSummary { ok: true, count }))
}
