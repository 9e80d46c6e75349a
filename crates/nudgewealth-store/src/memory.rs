//! In-memory record store

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::{broadcast, RwLock};

use crate::document::{self, Document};
use crate::{RecordStore, Result, StoreEvent, DEFAULT_EVENT_CAPACITY};

/// Record store kept entirely in memory.
///
/// Cloning is not supported; share it behind an `Arc`.
pub struct MemoryStore {
    collections: RwLock<HashMap<String, Vec<Document>>>,
    events: broadcast::Sender<StoreEvent>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::with_event_capacity(DEFAULT_EVENT_CAPACITY)
    }

    pub fn with_event_capacity(capacity: usize) -> Self {
        let (events, _) = broadcast::channel(capacity.max(1));
        Self {
            collections: RwLock::new(HashMap::new()),
            events,
        }
    }

    fn publish(&self, event: StoreEvent) {
        // No subscribers is fine
        let _ = self.events.send(event);
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    fn name(&self) -> &'static str {
        "memory"
    }

    async fn collection(&self, collection: &str) -> Result<Vec<Document>> {
        let collections = self.collections.read().await;
        Ok(collections.get(collection).cloned().unwrap_or_default())
    }

    async fn has_collection(&self, collection: &str) -> Result<bool> {
        Ok(self.collections.read().await.contains_key(collection))
    }

    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(collection)
            .and_then(|docs| document::find(docs, id))
            .cloned())
    }

    async fn add(&self, collection: &str, doc: Document) -> Result<String> {
        let id = {
            let mut collections = self.collections.write().await;
            let docs = collections.entry(collection.to_string()).or_default();
            document::insert(docs, doc)
        };
        self.publish(StoreEvent::added(collection, &id));
        Ok(id)
    }

    async fn update(&self, collection: &str, id: &str, patch: Document) -> Result<bool> {
        let merged = {
            let mut collections = self.collections.write().await;
            match collections.get_mut(collection) {
                Some(docs) => document::merge(docs, id, patch),
                None => false,
            }
        };
        if merged {
            self.publish(StoreEvent::updated(collection, id));
        }
        Ok(merged)
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<bool> {
        let removed = {
            let mut collections = self.collections.write().await;
            match collections.get_mut(collection) {
                Some(docs) => document::remove(docs, id),
                None => false,
            }
        };
        if removed {
            self.publish(StoreEvent::deleted(collection, id));
        }
        Ok(removed)
    }

    async fn replace_collection(&self, collection: &str, docs: Vec<Document>) -> Result<()> {
        let count = docs.len();
        self.collections
            .write()
            .await
            .insert(collection.to_string(), docs);
        self.publish(StoreEvent::replaced(collection, count));
        Ok(())
    }

    async fn clear_all(&self) -> Result<()> {
        self.collections.write().await.clear();
        self.publish(StoreEvent::cleared());
        Ok(())
    }

    fn subscribe(&self) -> broadcast::Receiver<StoreEvent> {
        self.events.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn object(value: Value) -> Document {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    #[tokio::test]
    async fn test_add_get_update_delete() {
        let store = MemoryStore::new();

        let id = store
            .add("rules", object(json!({"category": "Shopping", "limit": 5000})))
            .await
            .unwrap();

        let doc = store.get("rules", &id).await.unwrap().unwrap();
        assert_eq!(doc["category"], "Shopping");
        assert!(doc.contains_key("createdAt"));

        assert!(store
            .update("rules", &id, object(json!({"limit": 6000})))
            .await
            .unwrap());
        let doc = store.get("rules", &id).await.unwrap().unwrap();
        assert_eq!(doc["limit"], 6000);
        assert_eq!(doc["category"], "Shopping");

        assert!(store.delete("rules", &id).await.unwrap());
        assert!(store.get("rules", &id).await.unwrap().is_none());
        assert!(!store.delete("rules", &id).await.unwrap());
    }

    #[tokio::test]
    async fn test_missing_collection_is_empty() {
        let store = MemoryStore::new();
        assert!(store.collection("goals").await.unwrap().is_empty());
        assert!(!store.has_collection("goals").await.unwrap());
        assert!(!store
            .update("goals", "x", Document::new())
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn test_writes_publish_events() {
        let store = MemoryStore::new();
        let mut events = store.subscribe();

        let id = store.add("transactions", Document::new()).await.unwrap();
        store.delete("transactions", &id).await.unwrap();
        store.clear_all().await.unwrap();

        let first = events.recv().await.unwrap();
        assert_eq!(first.event_type(), "document_added");
        assert_eq!(first.collection(), Some("transactions"));
        assert_eq!(events.recv().await.unwrap().event_type(), "document_deleted");
        assert!(matches!(events.recv().await.unwrap(), StoreEvent::Cleared { .. }));
    }
}
