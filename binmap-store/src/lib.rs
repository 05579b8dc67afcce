//! Document persistence for binmap.
//!
//! One logical document — the full list of records — lives at a single
//! remote path behind the WebHDFS gateway, with a local file standing in
//! whenever the gateway is degraded. [`DocumentStore`] composes the two
//! behind one read/write contract, owns a short-lived cache, and
//! announces every successful mutation through the change broadcaster.

pub mod cache;
pub mod local;
pub mod record;
pub mod store;

pub use cache::DocumentCache;
pub use local::LocalStore;
pub use record::DocumentRecord;
pub use store::DocumentStore;
