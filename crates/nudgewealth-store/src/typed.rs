//! Typed access to documents
//!
//! Records that fail to deserialize are skipped with a warning instead of
//! failing the whole read.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::{Document, RecordStore, Result, StoreError};

/// Serialize a value into a document
pub fn to_document<T: Serialize>(value: &T, collection: &str) -> Result<Document> {
    match serde_json::to_value(value)? {
        Value::Object(map) => Ok(map),
        _ => Err(StoreError::NotAnObject {
            collection: collection.to_string(),
        }),
    }
}

/// Deserialize a document into a value
pub fn from_document<T: DeserializeOwned>(doc: Document) -> Result<T> {
    Ok(serde_json::from_value(Value::Object(doc))?)
}

/// Load every well-formed record of a collection
pub async fn load_all<T, S>(store: &S, collection: &str) -> Result<Vec<T>>
where
    T: DeserializeOwned,
    S: RecordStore + ?Sized,
{
    let docs = store.collection(collection).await?;
    let mut records = Vec::with_capacity(docs.len());
    for doc in docs {
        let id = doc.get("id").cloned();
        match from_document(doc) {
            Ok(record) => records.push(record),
            Err(e) => tracing::warn!(collection, ?id, error = %e, "skipping malformed record"),
        }
    }
    Ok(records)
}

/// Load one record by id
pub async fn load_one<T, S>(store: &S, collection: &str, id: &str) -> Result<Option<T>>
where
    T: DeserializeOwned,
    S: RecordStore + ?Sized,
{
    match store.get(collection, id).await? {
        Some(doc) => Ok(Some(from_document(doc)?)),
        None => Ok(None),
    }
}

/// Insert a record, letting the store assign its id
pub async fn insert<T, S>(store: &S, collection: &str, record: &T) -> Result<String>
where
    T: Serialize + Sync,
    S: RecordStore + ?Sized,
{
    let mut doc = to_document(record, collection)?;
    doc.remove("id");
    store.add(collection, doc).await
}
