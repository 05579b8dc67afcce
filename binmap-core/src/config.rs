//! Configuration loaded from environment variables, with defaults that
//! match the reference deployment (Hadoop gateway on the compose network,
//! local fallback under `data/`).

use std::path::PathBuf;
use std::time::Duration;

/// Gateway connection settings.
#[derive(Debug, Clone)]
pub struct HdfsConfig {
    /// Base address of the gateway, without a trailing slash.
    pub host: String,

    /// Identity attached to every gateway request (`user.name`).
    pub user: String,

    /// Per-request timeout; applies to each leg of an exchange.
    pub request_timeout: Duration,
}

impl HdfsConfig {
    pub fn new(host: impl Into<String>, user: impl Into<String>, request_timeout: Duration) -> Self {
        let mut host = host.into();
        while host.ends_with('/') {
            host.pop();
        }
        Self {
            host,
            user: user.into(),
            request_timeout,
        }
    }

    /// Build from environment variables.
    ///
    /// - `BINMAP_HDFS_HOST`: gateway base address (default: `http://hadoop:50070`)
    /// - `BINMAP_HDFS_USER`: identity string (default: `hduser`)
    /// - `BINMAP_HDFS_TIMEOUT_SECS`: per-request timeout (default: 5)
    pub fn from_env() -> Self {
        let host = std::env::var("BINMAP_HDFS_HOST")
            .unwrap_or_else(|_| "http://hadoop:50070".to_string());
        let user = std::env::var("BINMAP_HDFS_USER").unwrap_or_else(|_| "hduser".to_string());
        let timeout_secs = std::env::var("BINMAP_HDFS_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(5);
        Self::new(host, user, Duration::from_secs(timeout_secs))
    }
}

impl Default for HdfsConfig {
    fn default() -> Self {
        Self::new("http://hadoop:50070", "hduser", Duration::from_secs(5))
    }
}

/// Document store settings.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Remote path of the single document.
    pub document_path: String,

    /// Local fallback file holding the same document.
    pub local_file: PathBuf,

    /// How long a cached document stays fresh.
    pub cache_ttl: Duration,
}

impl StoreConfig {
    /// Build from environment variables.
    ///
    /// - `BINMAP_HDFS_DOCUMENT_PATH`: remote document path
    ///   (default: `/locations/locations.json`)
    /// - `BINMAP_LOCAL_DATA_FILE`: fallback file (default: `data/locations.json`)
    /// - `BINMAP_CACHE_TTL_SECS`: cache window (default: 10)
    pub fn from_env() -> Self {
        let document_path = std::env::var("BINMAP_HDFS_DOCUMENT_PATH")
            .unwrap_or_else(|_| "/locations/locations.json".to_string());
        let local_file = std::env::var("BINMAP_LOCAL_DATA_FILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("data/locations.json"));
        let ttl_secs = std::env::var("BINMAP_CACHE_TTL_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(10);
        Self {
            document_path,
            local_file,
            cache_ttl: Duration::from_secs(ttl_secs),
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            document_path: "/locations/locations.json".to_string(),
            local_file: PathBuf::from("data/locations.json"),
            cache_ttl: Duration::from_secs(10),
        }
    }
}
