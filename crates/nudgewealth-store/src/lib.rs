//! NudgeWealth Store - keyed record persistence
//!
//! The store holds named collections of JSON documents. It is deliberately
//! simple:
//!
//! - Linear scans, no indexes
//! - No multi-document transactions
//! - Shallow-merge updates
//! - Every write publishes a [`StoreEvent`] to subscribers
//!
//! A handle is constructed explicitly and injected wherever it is needed;
//! there is no process-wide instance.
//!
//! Two backends are provided: [`MemoryStore`] for tests and embedded use, and
//! [`FileStore`] which keeps one `nudgewealth_<collection>.json` file per
//! collection. A collection file that cannot be parsed is logged and read as
//! empty.

pub mod document;
pub mod error;
pub mod events;
pub mod file;
pub mod memory;
pub mod seed;
pub mod typed;

use async_trait::async_trait;
use tokio::sync::broadcast;

pub use document::Document;
pub use error::{Result, StoreError};
pub use events::StoreEvent;
pub use file::FileStore;
pub use memory::MemoryStore;
pub use seed::seed_if_empty;

/// Prefix of every persisted collection key
pub const KEY_PREFIX: &str = "nudgewealth_";

/// Default capacity of the change-event channel
pub const DEFAULT_EVENT_CAPACITY: usize = 256;

/// Keyed record store
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Human-readable backend name
    fn name(&self) -> &'static str;

    /// All documents of a collection, in insertion order
    async fn collection(&self, collection: &str) -> Result<Vec<Document>>;

    /// Whether the collection has ever been written
    async fn has_collection(&self, collection: &str) -> Result<bool>;

    /// Fetch one document by id
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>>;

    /// Insert a document, assigning `id` and `createdAt`; returns the id
    async fn add(&self, collection: &str, doc: Document) -> Result<String>;

    /// Shallow-merge `patch` into the document, stamping `updatedAt`.
    /// Returns `false` when no document has this id.
    async fn update(&self, collection: &str, id: &str, patch: Document) -> Result<bool>;

    /// Remove a document; returns whether it existed
    async fn delete(&self, collection: &str, id: &str) -> Result<bool>;

    /// Overwrite a whole collection (used by seeding)
    async fn replace_collection(&self, collection: &str, docs: Vec<Document>) -> Result<()>;

    /// Drop every collection
    async fn clear_all(&self) -> Result<()>;

    /// Subscribe to change events
    fn subscribe(&self) -> broadcast::Receiver<StoreEvent>;
}
