//! JSON-file record store
//!
//! Each collection lives in `<dir>/nudgewealth_<collection>.json` as a JSON
//! array of objects. Writes go to a temporary file that is renamed over the
//! original, and are serialized by a single writer lock.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::{broadcast, Mutex};

use crate::document::{self, Document};
use crate::{RecordStore, Result, StoreEvent, DEFAULT_EVENT_CAPACITY, KEY_PREFIX};

/// Record store persisted as one JSON file per collection
pub struct FileStore {
    dir: PathBuf,
    write_lock: Mutex<()>,
    events: broadcast::Sender<StoreEvent>,
}

impl FileStore {
    /// Open (and create if needed) a store rooted at `dir`
    pub async fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        tokio::fs::create_dir_all(&dir).await?;
        let (events, _) = broadcast::channel(DEFAULT_EVENT_CAPACITY);
        tracing::debug!(dir = %dir.display(), "opened file store");
        Ok(Self {
            dir,
            write_lock: Mutex::new(()),
            events,
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, collection: &str) -> PathBuf {
        self.dir.join(format!("{KEY_PREFIX}{collection}.json"))
    }

    /// Read a collection; unreadable or malformed files yield an empty list
    async fn read(&self, collection: &str) -> Result<Vec<Document>> {
        let path = self.path_for(collection);
        let raw = match tokio::fs::read_to_string(&path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let values: Vec<Value> = match serde_json::from_str(&raw) {
            Ok(values) => values,
            Err(e) => {
                tracing::warn!(
                    collection,
                    path = %path.display(),
                    error = %e,
                    "malformed collection file, treating as empty"
                );
                return Ok(Vec::new());
            }
        };

        let total = values.len();
        let docs: Vec<Document> = values
            .into_iter()
            .filter_map(|value| match value {
                Value::Object(map) => Some(map),
                _ => None,
            })
            .collect();
        if docs.len() != total {
            tracing::warn!(
                collection,
                skipped = total - docs.len(),
                "skipped non-object records"
            );
        }
        Ok(docs)
    }

    async fn write(&self, collection: &str, docs: &[Document]) -> Result<()> {
        let path = self.path_for(collection);
        let tmp = path.with_extension("json.tmp");
        let body = serde_json::to_vec_pretty(docs)?;
        tokio::fs::write(&tmp, body).await?;
        tokio::fs::rename(&tmp, &path).await?;
        tracing::debug!(collection, records = docs.len(), "wrote collection");
        Ok(())
    }

    fn publish(&self, event: StoreEvent) {
        let _ = self.events.send(event);
    }
}

#[async_trait]
impl RecordStore for FileStore {
    fn name(&self) -> &'static str {
        "file"
    }

    async fn collection(&self, collection: &str) -> Result<Vec<Document>> {
        self.read(collection).await
    }

    async fn has_collection(&self, collection: &str) -> Result<bool> {
        Ok(tokio::fs::try_exists(self.path_for(collection)).await?)
    }

    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>> {
        let docs = self.read(collection).await?;
        Ok(document::find(&docs, id).cloned())
    }

    async fn add(&self, collection: &str, doc: Document) -> Result<String> {
        let id = {
            let _guard = self.write_lock.lock().await;
            let mut docs = self.read(collection).await?;
            let id = document::insert(&mut docs, doc);
            self.write(collection, &docs).await?;
            id
        };
        self.publish(StoreEvent::added(collection, &id));
        Ok(id)
    }

    async fn update(&self, collection: &str, id: &str, patch: Document) -> Result<bool> {
        let merged = {
            let _guard = self.write_lock.lock().await;
            let mut docs = self.read(collection).await?;
            let merged = document::merge(&mut docs, id, patch);
            if merged {
                self.write(collection, &docs).await?;
            }
            merged
        };
        if merged {
            self.publish(StoreEvent::updated(collection, id));
        }
        Ok(merged)
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<bool> {
        let removed = {
            let _guard = self.write_lock.lock().await;
            let mut docs = self.read(collection).await?;
            let removed = document::remove(&mut docs, id);
            if removed {
                self.write(collection, &docs).await?;
            }
            removed
        };
        if removed {
            self.publish(StoreEvent::deleted(collection, id));
        }
        Ok(removed)
    }

    async fn replace_collection(&self, collection: &str, docs: Vec<Document>) -> Result<()> {
        {
            let _guard = self.write_lock.lock().await;
            self.write(collection, &docs).await?;
        }
        self.publish(StoreEvent::replaced(collection, docs.len()));
        Ok(())
    }

    async fn clear_all(&self) -> Result<()> {
        {
            let _guard = self.write_lock.lock().await;
            let mut entries = tokio::fs::read_dir(&self.dir).await?;
            while let Some(entry) = entries.next_entry().await? {
                let name = entry.file_name();
                let name = name.to_string_lossy();
                if name.starts_with(KEY_PREFIX) && name.ends_with(".json") {
                    tokio::fs::remove_file(entry.path()).await?;
                }
            }
        }
        self.publish(StoreEvent::cleared());
        Ok(())
    }

    fn subscribe(&self) -> broadcast::Receiver<StoreEvent> {
        self.events.subscribe()
    }
}
