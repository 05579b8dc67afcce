//! Core types for binmap: the bin-location record, the error taxonomy,
//! and environment-driven configuration.
//!
//! This crate performs no I/O. The gateway client, the document store,
//! and the API layer all build on the types defined here.

pub mod config;
pub mod error;
pub mod location;

pub use config::{HdfsConfig, StoreConfig};
pub use error::{BinmapError, BinmapResult, ConfigError, GatewayError, StoreError};
pub use location::BinLocation;
