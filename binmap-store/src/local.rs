//! Local fallback for the document.

use std::io;
use std::path::{Path, PathBuf};

use binmap_core::{BinmapError, BinmapResult, StoreError};
use tokio::fs;
use tracing::debug;

use crate::record::DocumentRecord;

/// Reads and writes the document as one JSON file on local disk.
///
/// Authoritative only while the gateway is degraded; the remote path
/// remains the source of truth otherwise.
#[derive(Debug, Clone)]
pub struct LocalStore {
    path: PathBuf,
}

impl LocalStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The last written document, or an empty one when no file exists
    /// yet — a store that has never been written is not an error.
    pub async fn read<T: DocumentRecord>(&self) -> BinmapResult<Vec<T>> {
        match fs::read_to_string(&self.path).await {
            Ok(text) if text.trim().is_empty() => Ok(Vec::new()),
            Ok(text) => serde_json::from_str(&text).map_err(|e| {
                StoreError::Serialization {
                    message: e.to_string(),
                }
                .into()
            }),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(self.io_error(e)),
        }
    }

    /// Persist the document.
    ///
    /// Writes a temporary sibling and renames it over the target, so a
    /// concurrent reader sees either the old file or the new one, never
    /// a torn write. The containing directory is created if absent.
    pub async fn write<T: DocumentRecord>(&self, document: &[T]) -> BinmapResult<()> {
        let bytes = serde_json::to_vec(document).map_err(|e| {
            BinmapError::from(StoreError::Serialization {
                message: e.to_string(),
            })
        })?;

        if let Some(dir) = self.path.parent() {
            if !dir.as_os_str().is_empty() {
                fs::create_dir_all(dir).await.map_err(|e| self.io_error(e))?;
            }
        }

        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, &bytes).await.map_err(|e| self.io_error(e))?;
        fs::rename(&tmp, &self.path).await.map_err(|e| self.io_error(e))?;
        debug!(path = %self.path.display(), bytes = bytes.len(), "wrote local document");
        Ok(())
    }

    fn io_error(&self, e: io::Error) -> BinmapError {
        StoreError::LocalIo {
            path: self.path.display().to_string(),
            message: e.to_string(),
        }
        .into()
    }
}
