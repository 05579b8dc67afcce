//! Document persistence orchestration.

use binmap_core::{BinmapError, BinmapResult, StoreConfig, StoreError};
use binmap_events::{ChangeBroadcaster, ChangeEvent};
use binmap_hdfs::HdfsClient;
use tokio::sync::{broadcast, Mutex};
use tracing::{debug, warn};

use crate::cache::DocumentCache;
use crate::local::LocalStore;
use crate::record::DocumentRecord;

/// One logical store for the current document.
///
/// Reads degrade: cache, then gateway, then local fallback, then an
/// empty document — a broken remote must never fail a read. Writes
/// degrade once: gateway, then local fallback; when both refuse, the
/// error surfaces because the mutation took effect nowhere.
pub struct DocumentStore<T: DocumentRecord> {
    gateway: HdfsClient,
    remote_path: String,
    local: LocalStore,
    cache: DocumentCache<T>,
    broadcaster: ChangeBroadcaster<T>,
    // Serializes read-modify-write spans; see `mutate`.
    write_lock: Mutex<()>,
}

impl<T: DocumentRecord> DocumentStore<T> {
    pub fn new(gateway: HdfsClient, config: &StoreConfig, broadcaster: ChangeBroadcaster<T>) -> Self {
        Self {
            gateway,
            remote_path: config.document_path.clone(),
            local: LocalStore::new(&config.local_file),
            cache: DocumentCache::new(config.cache_ttl),
            broadcaster,
            write_lock: Mutex::new(()),
        }
    }

    /// Subscribe to the change events emitted after successful mutations.
    pub fn subscribe(&self) -> broadcast::Receiver<ChangeEvent<T>> {
        self.broadcaster.subscribe()
    }

    /// The current document. Infallible by contract: every read-path
    /// failure degrades to the next source and finally to an empty
    /// document, so a degraded backend is invisible to readers.
    pub async fn get_document(&self) -> Vec<T> {
        if let Some(document) = self.cache.fresh() {
            return document;
        }
        self.read_backends().await
    }

    /// Replace the document wholesale and announce the change.
    ///
    /// Takes the same lock as [`mutate`](Self::mutate) so a wholesale
    /// replacement cannot interleave with a read-modify-write span.
    pub async fn put_document(&self, document: Vec<T>, change: ChangeEvent<T>) -> BinmapResult<()> {
        let _guard = self.write_lock.lock().await;
        self.write_and_notify(document, change).await
    }

    /// Run a read-modify-write cycle as the single writer.
    ///
    /// The lock is held across the whole span, so two concurrent
    /// mutations never start from the same snapshot and neither update
    /// is lost. The closure returns `None` to abandon the cycle without
    /// writing (nothing is emitted), or the change to announce plus a
    /// value handed back to the caller.
    pub async fn mutate<F, R>(&self, f: F) -> BinmapResult<Option<R>>
    where
        F: FnOnce(&mut Vec<T>) -> Option<(ChangeEvent<T>, R)>,
    {
        let _guard = self.write_lock.lock().await;
        let mut document = match self.cache.fresh() {
            Some(document) => document,
            None => self.read_backends().await,
        };
        match f(&mut document) {
            Some((change, value)) => {
                self.write_and_notify(document, change).await?;
                Ok(Some(value))
            }
            None => Ok(None),
        }
    }

    async fn read_backends(&self) -> Vec<T> {
        match self.read_gateway().await {
            Ok(Some(document)) => {
                self.cache.store(&document);
                return document;
            }
            Ok(None) => debug!("remote document absent, consulting local fallback"),
            Err(e) => warn!(error = %e, "gateway read failed, consulting local fallback"),
        }
        match self.local.read().await {
            Ok(document) => {
                self.cache.store(&document);
                document
            }
            Err(e) => {
                warn!(error = %e, "local fallback read failed, serving empty document");
                Vec::new()
            }
        }
    }

    async fn read_gateway(&self) -> BinmapResult<Option<Vec<T>>> {
        let Some(text) = self.gateway.read_file(&self.remote_path).await? else {
            return Ok(None);
        };
        let document = serde_json::from_str(&text).map_err(|e| {
            BinmapError::from(StoreError::Serialization {
                message: e.to_string(),
            })
        })?;
        Ok(Some(document))
    }

    async fn write_and_notify(&self, document: Vec<T>, change: ChangeEvent<T>) -> BinmapResult<()> {
        self.write_backends(&document).await?;
        // Install before the caller observes success: a TTL-window read
        // must see the just-written value even while the remote is
        // still settling.
        self.cache.store(&document);
        self.broadcaster.broadcast(change);
        Ok(())
    }

    async fn write_backends(&self, document: &[T]) -> BinmapResult<()> {
        let bytes = serde_json::to_vec(document).map_err(|e| {
            BinmapError::from(StoreError::Serialization {
                message: e.to_string(),
            })
        })?;

        let gateway_err = match self.gateway.write_file(&self.remote_path, bytes).await {
            Ok(()) => return Ok(()),
            Err(e) => e,
        };
        warn!(error = %gateway_err, "gateway write failed, falling back to local store");

        match self.local.write(document).await {
            Ok(()) => Ok(()),
            Err(local_err) => Err(StoreError::BothBackendsFailed {
                gateway: gateway_err.to_string(),
                local: local_err.to_string(),
            }
            .into()),
        }
    }
}

impl<T: DocumentRecord> std::fmt::Debug for DocumentStore<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DocumentStore")
            .field("remote_path", &self.remote_path)
            .field("local", &self.local.path())
            .finish()
    }
}
