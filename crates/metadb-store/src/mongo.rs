//! MongoDB-backed `DocumentStore`.

use crate::{DocumentStore, IndexKind, IndexSpec, StoreError};
use async_trait::async_trait;
use mongodb::bson::{self, doc, Bson, Document};
use mongodb::{Client, Database, IndexModel};
use serde_json::Value;

pub struct MongoStore {
    db: Database,
}

impl MongoStore {
    /// Connect to the datastore address handed in by the CLI layer.
    pub async fn connect(uri: &str, database: &str) -> Result<Self, StoreError> {
        let client = Client::with_uri_str(uri)
            .await
            .map_err(|e| StoreError::Connect(e.to_string()))?;
        Ok(Self {
            db: client.database(database),
        })
    }
}

fn index_keys(spec: &IndexSpec) -> Document {
    let mut keys = Document::new();
    match spec.kind {
        IndexKind::Lookup => keys.insert(spec.field, Bson::Int32(1)),
        IndexKind::Text => keys.insert(spec.field, Bson::String("text".to_string())),
    };
    keys
}

#[async_trait]
impl DocumentStore for MongoStore {
    async fn ensure_indexes(
        &self,
        collection: &str,
        specs: &[IndexSpec],
    ) -> Result<(), StoreError> {
        if specs.is_empty() {
            return Ok(());
        }
        let models: Vec<IndexModel> = specs
            .iter()
            .map(|spec| IndexModel::builder().keys(index_keys(spec)).build())
            .collect();
        self.db
            .collection::<Document>(collection)
            .create_indexes(models)
            .await
            .map_err(|e| StoreError::Index {
                collection: collection.to_string(),
                message: e.to_string(),
            })?;
        Ok(())
    }

    async fn upsert(
        &self,
        collection: &str,
        uri: &str,
        document: Value,
    ) -> Result<(), StoreError> {
        let document =
            bson::to_document(&document).map_err(|e| StoreError::Document(e.to_string()))?;
        self.db
            .collection::<Document>(collection)
            .update_one(doc! { "uri": uri }, doc! { "$set": document })
            .upsert(true)
            .await
            .map_err(|e| StoreError::Upsert {
                collection: collection.to_string(),
                uri: uri.to_string(),
                message: e.to_string(),
            })?;
        Ok(())
    }
}
