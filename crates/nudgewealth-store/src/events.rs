//! Change notifications published on every store write
//!
//! Subscribers (the server's SSE stream, a CLI watcher) receive these over a
//! `tokio::sync::broadcast` channel. A slow subscriber lags and loses events
//! rather than blocking writers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A change to the store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum StoreEvent {
    /// A document was inserted
    DocumentAdded {
        collection: String,
        id: String,
        timestamp: DateTime<Utc>,
    },

    /// A document was merged with a patch
    DocumentUpdated {
        collection: String,
        id: String,
        timestamp: DateTime<Utc>,
    },

    /// A document was removed
    DocumentDeleted {
        collection: String,
        id: String,
        timestamp: DateTime<Utc>,
    },

    /// A whole collection was overwritten
    CollectionReplaced {
        collection: String,
        count: usize,
        timestamp: DateTime<Utc>,
    },

    /// Every collection was dropped
    Cleared { timestamp: DateTime<Utc> },
}

impl StoreEvent {
    pub fn added(collection: &str, id: &str) -> Self {
        Self::DocumentAdded {
            collection: collection.to_string(),
            id: id.to_string(),
            timestamp: Utc::now(),
        }
    }

    pub fn updated(collection: &str, id: &str) -> Self {
        Self::DocumentUpdated {
            collection: collection.to_string(),
            id: id.to_string(),
            timestamp: Utc::now(),
        }
    }

    pub fn deleted(collection: &str, id: &str) -> Self {
        Self::DocumentDeleted {
            collection: collection.to_string(),
            id: id.to_string(),
            timestamp: Utc::now(),
        }
    }

    pub fn replaced(collection: &str, count: usize) -> Self {
        Self::CollectionReplaced {
            collection: collection.to_string(),
            count,
            timestamp: Utc::now(),
        }
    }

    pub fn cleared() -> Self {
        Self::Cleared {
            timestamp: Utc::now(),
        }
    }

    /// Collection touched by the event, `None` for a full clear
    pub fn collection(&self) -> Option<&str> {
        match self {
            Self::DocumentAdded { collection, .. }
            | Self::DocumentUpdated { collection, .. }
            | Self::DocumentDeleted { collection, .. }
            | Self::CollectionReplaced { collection, .. } => Some(collection),
            Self::Cleared { .. } => None,
        }
    }

    pub fn event_type(&self) -> &'static str {
        match self {
            Self::DocumentAdded { .. } => "document_added",
            Self::DocumentUpdated { .. } => "document_updated",
            Self::DocumentDeleted { .. } => "document_deleted",
            Self::CollectionReplaced { .. } => "collection_replaced",
            Self::Cleared { .. } => "cleared",
        }
    }
}
