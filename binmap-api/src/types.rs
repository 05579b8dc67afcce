//! Request and response types for the binmap API.
//!
//! Field names follow the original wire format (camelCase), including
//! the legacy `binLevel` alias for the fill status that older clients
//! still send.

use binmap_core::BinLocation;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Body of `POST /api/locations`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateLocationRequest {
    pub name: Option<String>,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub bin_id: Option<String>,
    pub status: Option<u8>,
    /// Legacy alias for `status`.
    pub bin_level: Option<u8>,
}

impl CreateLocationRequest {
    /// Fill level with the legacy alias applied: `status` wins,
    /// then `binLevel`, then empty.
    pub fn effective_status(&self) -> u8 {
        self.status.or(self.bin_level).unwrap_or(0)
    }
}

/// Body of `PUT /api/locations/{id}`. Absent fields are left unchanged.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateLocationRequest {
    pub name: Option<String>,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub bin_id: Option<String>,
    pub status: Option<u8>,
    /// Legacy alias for `status`; applied only when `status` is absent.
    pub bin_level: Option<u8>,
}

/// Query parameters of `GET /api/locations`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListLocationsQuery {
    /// Case-insensitive substring match on the name.
    pub q: Option<String>,

    /// Minimum fill level.
    #[serde(alias = "minBin")]
    pub min_status: Option<u8>,
}

/// One entry of a `POST /api/locations/import` payload. Lenient: ids and
/// timestamps are assigned when absent, names default.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportLocationRecord {
    pub id: Option<Uuid>,
    pub bin_id: Option<String>,
    pub name: Option<String>,
    pub lat: f64,
    pub lng: f64,
    pub status: Option<u8>,
    /// Legacy alias for `status`.
    pub bin_level: Option<u8>,
    pub created_at: Option<DateTime<Utc>>,
}

impl ImportLocationRecord {
    /// Normalize into a full record.
    pub fn into_location(self) -> BinLocation {
        let mut location = BinLocation::new(
            self.name.unwrap_or_else(|| "Unnamed".to_string()),
            self.lat,
            self.lng,
            self.status.or(self.bin_level).unwrap_or(0),
        );
        if let Some(id) = self.id {
            location.id = id;
        }
        location.bin_id = self.bin_id;
        if let Some(created_at) = self.created_at {
            location.created_at = created_at;
        }
        location
    }
}

/// Acknowledgement for single-record mutations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AckResponse {
    pub ok: bool,
}

/// Acknowledgement for bulk mutations (import, clear).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BulkSummary {
    pub ok: bool,
    pub count: usize,
}

/// Response of `GET /api/health`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: String,
    pub uptime_seconds: u64,
}
