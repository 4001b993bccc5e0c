//! In-memory `DocumentStore` used by tests and `--dry-run`.

use crate::{DocumentStore, IndexSpec, StoreError};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};
use tokio::sync::Mutex;

#[derive(Debug, Default)]
struct Inner {
    /// collection -> uri -> document
    collections: BTreeMap<String, BTreeMap<String, Value>>,
    /// collection -> indexed field names
    indexes: BTreeMap<String, BTreeSet<String>>,
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn document(&self, collection: &str, uri: &str) -> Option<Value> {
        self.inner
            .lock()
            .await
            .collections
            .get(collection)
            .and_then(|docs| docs.get(uri))
            .cloned()
    }

    pub async fn documents(&self, collection: &str) -> BTreeMap<String, Value> {
        self.inner
            .lock()
            .await
            .collections
            .get(collection)
            .cloned()
            .unwrap_or_default()
    }

    pub async fn count(&self, collection: &str) -> usize {
        self.inner
            .lock()
            .await
            .collections
            .get(collection)
            .map(|docs| docs.len())
            .unwrap_or(0)
    }

    pub async fn index_fields(&self, collection: &str) -> BTreeSet<String> {
        self.inner
            .lock()
            .await
            .indexes
            .get(collection)
            .cloned()
            .unwrap_or_default()
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn ensure_indexes(
        &self,
        collection: &str,
        specs: &[IndexSpec],
    ) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().await;
        let fields = inner.indexes.entry(collection.to_string()).or_default();
        for spec in specs {
            fields.insert(spec.field.to_string());
        }
        Ok(())
    }

    async fn upsert(
        &self,
        collection: &str,
        uri: &str,
        document: Value,
    ) -> Result<(), StoreError> {
        let Value::Object(fields) = document else {
            return Err(StoreError::Document(
                "upsert expects a JSON object".to_string(),
            ));
        };

        let mut inner = self.inner.lock().await;
        let docs = inner.collections.entry(collection.to_string()).or_default();
        // `$set` semantics: merge fields into the existing document.
        let existing = docs
            .entry(uri.to_string())
            .or_insert_with(|| Value::Object(serde_json::Map::new()));
        if let Value::Object(existing) = existing {
            for (key, value) in fields {
                existing.insert(key, value);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn upsert_is_idempotent() {
        let store = MemoryStore::new();
        let doc = json!({"uri": "http://x/1", "prefLabel": "Foo"});

        store.upsert("prot", "http://x/1", doc.clone()).await.unwrap();
        store.upsert("prot", "http://x/1", doc.clone()).await.unwrap();

        assert_eq!(store.count("prot").await, 1);
        assert_eq!(store.document("prot", "http://x/1").await, Some(doc));
    }

    #[tokio::test]
    async fn upsert_merges_fields() {
        let store = MemoryStore::new();
        store
            .upsert("prot", "u", json!({"uri": "u", "prefLabel": "Old", "refScore": 1}))
            .await
            .unwrap();
        store
            .upsert("prot", "u", json!({"uri": "u", "prefLabel": "New"}))
            .await
            .unwrap();

        let doc = store.document("prot", "u").await.unwrap();
        assert_eq!(doc["prefLabel"], "New");
        assert_eq!(doc["refScore"], 1);
    }

    #[tokio::test]
    async fn ensure_indexes_is_idempotent() {
        let store = MemoryStore::new();
        let specs = crate::simple_entity_indexes();
        store.ensure_indexes("goall", &specs).await.unwrap();
        store.ensure_indexes("goall", &specs).await.unwrap();

        let fields = store.index_fields("goall").await;
        assert!(fields.contains("uri"));
        assert!(fields.contains("definition"));
        assert_eq!(fields.len(), 5);
    }
}
