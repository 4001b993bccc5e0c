//! Document-store boundary and the partitioned bulk writer.
//!
//! The target datastore is an external collaborator: a schema-less document
//! collection per namespace, reachable only through upsert and
//! index-creation. Everything above talks to the [`DocumentStore`] trait;
//! [`MongoStore`] is the production implementation and [`MemoryStore`] backs
//! tests and dry runs.

pub mod memory;
pub mod mongo;
pub mod writer;

pub use memory::MemoryStore;
pub use mongo::MongoStore;
pub use writer::BulkWriter;

use async_trait::async_trait;
use serde_json::Value;

/// Errors at the datastore boundary. All of them are fatal to the run; the
/// idempotent-upsert design means a re-run safely repairs partial state.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("failed to connect to datastore: {0}")]
    Connect(String),
    #[error("failed to create indexes on {collection}: {message}")]
    Index { collection: String, message: String },
    #[error("failed to upsert {uri} into {collection}: {message}")]
    Upsert {
        collection: String,
        uri: String,
        message: String,
    },
    #[error("unsupported document shape: {0}")]
    Document(String),
    #[error("writer worker panicked: {0}")]
    Worker(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexKind {
    /// Plain lookup index.
    Lookup,
    /// Free-text index.
    Text,
}

/// One required secondary index on a collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexSpec {
    pub field: &'static str,
    pub kind: IndexKind,
}

impl IndexSpec {
    pub const fn lookup(field: &'static str) -> Self {
        Self {
            field,
            kind: IndexKind::Lookup,
        }
    }

    pub const fn text(field: &'static str) -> Self {
        Self {
            field,
            kind: IndexKind::Text,
        }
    }
}

/// Indexes for entity collections (proteins, genes). Gene collections also
/// index the `encodes` relation.
pub fn entity_indexes(include_encodes: bool) -> Vec<IndexSpec> {
    let mut specs = vec![
        IndexSpec::lookup("uri"),
        IndexSpec::lookup("lcLabel"),
        IndexSpec::lookup("lcSynonyms"),
        IndexSpec::lookup("refScore"),
        IndexSpec::lookup("taxon"),
        IndexSpec::lookup("instances"),
        IndexSpec::text("definition"),
    ];
    if include_encodes {
        specs.push(IndexSpec::lookup("encodes"));
    }
    specs
}

/// Indexes for reified-relation collections.
pub fn statement_indexes() -> Vec<IndexSpec> {
    vec![
        IndexSpec::lookup("uri"),
        IndexSpec::lookup("lcLabel"),
        IndexSpec::lookup("subject"),
        IndexSpec::lookup("object"),
        IndexSpec::lookup("predicate"),
        IndexSpec::lookup("taxon"),
    ]
}

/// Indexes for ontology-term and disease collections.
pub fn simple_entity_indexes() -> Vec<IndexSpec> {
    vec![
        IndexSpec::lookup("uri"),
        IndexSpec::lookup("lcLabel"),
        IndexSpec::lookup("lcSynonyms"),
        IndexSpec::lookup("refScore"),
        IndexSpec::text("definition"),
    ]
}

/// Minimal write surface of the target datastore.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Create the given secondary indexes if they do not already exist.
    /// Idempotent and safe to race across writer workers.
    async fn ensure_indexes(
        &self,
        collection: &str,
        specs: &[IndexSpec],
    ) -> Result<(), StoreError>;

    /// Update-or-insert keyed by `uri`, fully replacing the document's
    /// mutable fields (`$set` semantics).
    async fn upsert(&self, collection: &str, uri: &str, document: Value)
        -> Result<(), StoreError>;
}
