use nudgewealth_store::{seed_if_empty, typed, FileStore, RecordStore, StoreEvent, KEY_PREFIX};
use nudgewealth_types::{SpendingRule, Transaction, RULES, TRANSACTIONS};
use serde_json::{json, Value};

fn object(value: Value) -> nudgewealth_store::Document {
    match value {
        Value::Object(map) => map,
        _ => panic!("expected object"),
    }
}

#[tokio::test]
async fn test_file_store_persists_across_handles() {
    let dir = tempfile::tempdir().unwrap();

    let id = {
        let store = FileStore::open(dir.path()).await.unwrap();
        store
            .add("goals", object(json!({"category": "Bills", "limit": 900})))
            .await
            .unwrap()
    };

    let reopened = FileStore::open(dir.path()).await.unwrap();
    let doc = reopened.get("goals", &id).await.unwrap().unwrap();
    assert_eq!(doc["category"], "Bills");
    assert!(dir
        .path()
        .join(format!("{KEY_PREFIX}goals.json"))
        .exists());
}

#[tokio::test]
async fn test_malformed_file_reads_as_empty() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join(format!("{KEY_PREFIX}{TRANSACTIONS}.json")),
        "{not json",
    )
    .unwrap();

    let store = FileStore::open(dir.path()).await.unwrap();
    assert!(store.collection(TRANSACTIONS).await.unwrap().is_empty());

    // A write replaces the broken file
    store
        .add(TRANSACTIONS, object(json!({"category": "Bills"})))
        .await
        .unwrap();
    assert_eq!(store.collection(TRANSACTIONS).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_seed_and_clear() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileStore::open(dir.path()).await.unwrap();

    let report = seed_if_empty(&store).await.unwrap();
    assert!(report.any());

    let rules: Vec<SpendingRule> = typed::load_all(&store, RULES).await.unwrap();
    assert_eq!(rules.len(), 3);
    assert_eq!(rules[0].id.as_str(), "rule-1");

    let transactions: Vec<Transaction> = typed::load_all(&store, TRANSACTIONS).await.unwrap();
    assert_eq!(transactions.len(), 10);

    let mut events = store.subscribe();
    store.clear_all().await.unwrap();
    assert!(matches!(events.recv().await.unwrap(), StoreEvent::Cleared { .. }));
    assert!(!store.has_collection(RULES).await.unwrap());
}

#[tokio::test]
async fn test_update_and_delete_round_through_disk() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileStore::open(dir.path()).await.unwrap();
    seed_if_empty(&store).await.unwrap();

    assert!(store
        .update(RULES, "rule-2", object(json!({"limit": 7000})))
        .await
        .unwrap());
    let rule: SpendingRule = typed::load_one(&store, RULES, "rule-2")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(rule.limit.to_string(), "7000");

    assert!(store.delete(RULES, "rule-2").await.unwrap());
    assert_eq!(store.collection(RULES).await.unwrap().len(), 2);
}
