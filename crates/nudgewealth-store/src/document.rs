//! Document helpers shared by the store backends
//!
//! All backends keep a collection as a `Vec<Document>` and mutate it through
//! these functions, so id assignment and merge semantics are identical.

use chrono::{SecondsFormat, Utc};
use serde_json::{Map, Value};
use uuid::Uuid;

/// A stored record: a JSON object with at least an `id` key
pub type Document = Map<String, Value>;

/// Generate a document id: `<unix millis>-<9 hex chars>`
pub fn generate_id() -> String {
    let suffix = Uuid::new_v4().simple().to_string();
    format!("{}-{}", Utc::now().timestamp_millis(), &suffix[..9])
}

/// Current time in the stored timestamp format
pub fn timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Id of a document, if it has a string id
pub fn doc_id(doc: &Document) -> Option<&str> {
    doc.get("id").and_then(Value::as_str)
}

pub(crate) fn find<'a>(docs: &'a [Document], id: &str) -> Option<&'a Document> {
    docs.iter().find(|d| doc_id(d) == Some(id))
}

/// Append a document with a fresh id and `createdAt`; returns the id
pub(crate) fn insert(docs: &mut Vec<Document>, mut doc: Document) -> String {
    let id = generate_id();
    doc.insert("id".to_string(), Value::String(id.clone()));
    doc.insert("createdAt".to_string(), Value::String(timestamp()));
    docs.push(doc);
    id
}

/// Shallow-merge a patch; the id itself is never overwritten
pub(crate) fn merge(docs: &mut [Document], id: &str, patch: Document) -> bool {
    let Some(doc) = docs.iter_mut().find(|d| doc_id(d) == Some(id)) else {
        return false;
    };
    for (key, value) in patch {
        if key != "id" {
            doc.insert(key, value);
        }
    }
    doc.insert("updatedAt".to_string(), Value::String(timestamp()));
    true
}

pub(crate) fn remove(docs: &mut Vec<Document>, id: &str) -> bool {
    let before = docs.len();
    docs.retain(|d| doc_id(d) != Some(id));
    docs.len() != before
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn object(value: Value) -> Document {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    #[test]
    fn test_generated_ids_are_unique() {
        let a = generate_id();
        let b = generate_id();
        assert_ne!(a, b);
        let (millis, suffix) = a.split_once('-').unwrap();
        assert!(millis.parse::<i64>().is_ok());
        assert_eq!(suffix.len(), 9);
    }

    #[test]
    fn test_merge_keeps_id_and_untouched_fields() {
        let mut docs = vec![object(json!({"id": "rule-1", "limit": 2000, "current": 570}))];
        let merged = merge(
            &mut docs,
            "rule-1",
            object(json!({"id": "hijack", "current": 1570})),
        );

        assert!(merged);
        assert_eq!(docs[0]["id"], "rule-1");
        assert_eq!(docs[0]["limit"], 2000);
        assert_eq!(docs[0]["current"], 1570);
        assert!(docs[0].contains_key("updatedAt"));
    }

    #[test]
    fn test_merge_unknown_id_is_noop() {
        let mut docs = vec![object(json!({"id": "a"}))];
        assert!(!merge(&mut docs, "b", Document::new()));
        assert!(!docs[0].contains_key("updatedAt"));
    }

    #[test]
    fn test_remove_reports_presence() {
        let mut docs = vec![object(json!({"id": "a"})), object(json!({"id": "b"}))];
        assert!(remove(&mut docs, "a"));
        assert!(!remove(&mut docs, "a"));
        assert_eq!(docs.len(), 1);
    }
}
