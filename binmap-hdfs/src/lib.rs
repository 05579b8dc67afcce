//! WebHDFS gateway client.
//!
//! Speaks the HTTP front door of a Hadoop-style filesystem: directory
//! creation, file create/overwrite, and file open. The gateway has two
//! observed personalities for the data-bearing operations — a namenode
//! that redirects to a datanode, and single-node or proxy setups that
//! answer directly — and this crate hides that difference behind one API.

pub mod client;
pub mod exchange;

pub use client::HdfsClient;
pub use exchange::Exchange;
