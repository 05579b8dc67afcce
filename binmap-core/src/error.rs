//! Error types for binmap operations.

use thiserror::Error;

/// Gateway protocol and transport errors.
///
/// Read absence is not represented here: a missing remote document is a
/// distinguished `Ok(None)` at the client, never an error.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GatewayError {
    /// A response promised a redirect but named no target.
    #[error("{op} redirected without a Location header")]
    MissingRedirect { op: &'static str },

    /// The terminal request of an exchange came back outside 2xx.
    #[error("{op} failed with status {status}: {message}")]
    RequestFailed {
        op: &'static str,
        status: u16,
        message: String,
    },

    /// Connection failure or timeout before any status was observed.
    #[error("{op} transport failure: {message}")]
    Transport { op: &'static str, message: String },
}

/// Document store errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("local store I/O on {path}: {message}")]
    LocalIo { path: String, message: String },

    #[error("document serialization failed: {message}")]
    Serialization { message: String },

    /// Fatal: neither the gateway nor the local fallback accepted a write.
    #[error("write failed on every backend (gateway: {gateway}; local: {local})")]
    BothBackendsFailed { gateway: String, local: String },
}

/// Configuration errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value for {field}: {value} - {reason}")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },
}

/// Master error type for binmap.
#[derive(Debug, Clone, Error)]
pub enum BinmapError {
    #[error("gateway error: {0}")]
    Gateway(#[from] GatewayError),

    #[error("store error: {0}")]
    Store(#[from] StoreError),

    #[error("config error: {0}")]
    Config(#[from] ConfigError),
}

/// Result type alias for binmap operations.
pub type BinmapResult<T> = Result<T, BinmapError>;
