//! Record contract for stored documents.

use binmap_core::BinLocation;
use serde::{de::DeserializeOwned, Serialize};
use uuid::Uuid;

/// A record that can live in a stored document.
///
/// The store only requires that records serialize and carry a stable
/// identity; every other field is opaque business data. `id` values are
/// unique within a document.
pub trait DocumentRecord:
    Clone + Serialize + DeserializeOwned + Send + Sync + 'static
{
    /// Stable unique identity within a document.
    fn id(&self) -> Uuid;
}

impl DocumentRecord for BinLocation {
    fn id(&self) -> Uuid {
        self.id
    }
}
