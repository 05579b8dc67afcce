//! Change events and their fan-out.
//!
//! Every successful mutation of the document produces exactly one
//! [`ChangeEvent`], which the store hands to the [`ChangeBroadcaster`].
//! Subscribers (the WebSocket layer, tests) receive events through a
//! `tokio::sync::broadcast` channel; a slow subscriber lags and drops
//! events rather than blocking the mutation path.

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tracing::debug;

/// What a mutation did to the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeKind {
    Created,
    Updated,
    Deleted,
    Imported,
    Cleared,
}

impl ChangeKind {
    /// Stable name used in logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            ChangeKind::Created => "created",
            ChangeKind::Updated => "updated",
            ChangeKind::Deleted => "deleted",
            ChangeKind::Imported => "imported",
            ChangeKind::Cleared => "cleared",
        }
    }
}

/// One successful mutation, as announced to subscribers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChangeEvent<T> {
    pub kind: ChangeKind,

    /// The affected record, for single-record mutations.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub record: Option<T>,

    /// Number of records involved, for bulk mutations.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
}

impl<T> ChangeEvent<T> {
    pub fn created(record: T) -> Self {
        Self {
            kind: ChangeKind::Created,
            record: Some(record),
            count: None,
        }
    }

    pub fn updated(record: T) -> Self {
        Self {
            kind: ChangeKind::Updated,
            record: Some(record),
            count: None,
        }
    }

    pub fn deleted(record: T) -> Self {
        Self {
            kind: ChangeKind::Deleted,
            record: Some(record),
            count: None,
        }
    }

    pub fn imported(count: usize) -> Self {
        Self {
            kind: ChangeKind::Imported,
            record: None,
            count: Some(count),
        }
    }

    pub fn cleared(count: usize) -> Self {
        Self {
            kind: ChangeKind::Cleared,
            record: None,
            count: Some(count),
        }
    }
}

/// Fans change events out to subscribers.
pub struct ChangeBroadcaster<T> {
    tx: broadcast::Sender<ChangeEvent<T>>,
}

impl<T: Clone> ChangeBroadcaster<T> {
    /// Create a broadcaster buffering up to `capacity` events per
    /// subscriber before the slowest one starts lagging.
    pub fn new(capacity: usize) -> Self {
        let (tx, _rx) = broadcast::channel(capacity);
        Self { tx }
    }

    /// Announce an event to all current subscribers.
    ///
    /// Non-blocking; sending with zero subscribers is not an error.
    pub fn broadcast(&self, event: ChangeEvent<T>) {
        let kind = event.kind.as_str();
        match self.tx.send(event) {
            Ok(receivers) => debug!(kind, receivers, "broadcast change event"),
            Err(_) => debug!(kind, "no subscribers for change event"),
        }
    }

    /// Subscribe to all future events.
    pub fn subscribe(&self) -> broadcast::Receiver<ChangeEvent<T>> {
        self.tx.subscribe()
    }
}

impl<T> Clone for ChangeBroadcaster<T> {
    fn clone(&self) -> Self {
        Self {
            tx: self.tx.clone(),
        }
    }
}
