//! The bin-location record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Maximum fill level; `status` is clamped to this on construction.
pub const MAX_STATUS: u8 = 100;

/// A tracked waste bin: where it stands and how full it is.
///
/// Serialized in camelCase to match the document format on disk and on
/// the wire (`binId`, `createdAt`, `updatedAt`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BinLocation {
    /// Globally unique, immutable once assigned.
    pub id: Uuid,

    /// Human-facing asset tag, e.g. "BIN-00042".
    #[serde(default)]
    pub bin_id: Option<String>,

    pub name: String,

    /// WGS84 latitude.
    pub lat: f64,

    /// WGS84 longitude.
    pub lng: f64,

    /// Fill level, 0 (empty) to 100 (full).
    #[serde(default)]
    pub status: u8,

    pub created_at: DateTime<Utc>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl BinLocation {
    /// Create a new record with a fresh id and the current timestamp.
    pub fn new(name: impl Into<String>, lat: f64, lng: f64, status: u8) -> Self {
        Self {
            id: Uuid::now_v7(),
            bin_id: None,
            name: name.into(),
            lat,
            lng,
            status: status.min(MAX_STATUS),
            created_at: Utc::now(),
            updated_at: None,
        }
    }

    /// Attach an asset tag.
    pub fn with_bin_id(mut self, bin_id: impl Into<String>) -> Self {
        self.bin_id = Some(bin_id.into());
        self
    }

    /// Set the fill level, clamped to the valid range.
    pub fn set_status(&mut self, status: u8) {
        self.status = status.min(MAX_STATUS);
    }

    /// Record that the entry was just modified.
    pub fn touch(&mut self) {
        self.updated_at = Some(Utc::now());
    }
}
