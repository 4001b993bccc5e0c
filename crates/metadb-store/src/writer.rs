//! Partitioned concurrent bulk writer.
//!
//! A finished record set is materialized sorted by URI and sliced into `W`
//! contiguous partitions: every record lands in exactly one partition, the
//! partitions are disjoint, and their union is the whole set. Each partition
//! goes to one spawned worker that ensures the collection's indexes and then
//! upserts its records, merging in the reference score looked up at write
//! time. The write call is a barrier: it returns only once every worker has
//! finished, and the first store error aborts the run.

use crate::{entity_indexes, simple_entity_indexes, statement_indexes};
use crate::{DocumentStore, IndexSpec, StoreError};
use metadb_ingest::schema::TAXON_PREFIX;
use metadb_ingest::{Entity, RefScoreTable, Statement};
use serde_json::{json, Value};
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::task::JoinSet;

/// Slice a sorted record sequence into at most `workers` contiguous,
/// non-empty chunks of roughly equal size.
pub fn partition<T>(records: Vec<T>, workers: usize) -> Vec<Vec<T>> {
    let workers = workers.max(1);
    if records.is_empty() {
        return Vec::new();
    }
    let per_worker = records.len().div_ceil(workers);
    let mut parts = Vec::with_capacity(workers);
    let mut rest = records;
    while !rest.is_empty() {
        let tail = rest.split_off(per_worker.min(rest.len()));
        parts.push(rest);
        rest = tail;
    }
    parts
}

pub struct BulkWriter {
    store: Arc<dyn DocumentStore>,
    workers: usize,
}

impl BulkWriter {
    pub fn new(store: Arc<dyn DocumentStore>, workers: usize) -> Self {
        Self {
            store,
            workers: workers.max(1),
        }
    }

    /// Write an entity namespace (proteins, genes). Gene-like collections
    /// also store and index the `encodes` relation.
    pub async fn write_entities(
        &self,
        collection: &str,
        entities: BTreeMap<String, Entity>,
        scores: &RefScoreTable,
        taxon: &str,
        include_encodes: bool,
    ) -> Result<(), StoreError> {
        let scores = Arc::new(scores.clone());
        let taxon_uri = format!("{TAXON_PREFIX}{taxon}");
        let records: Vec<Entity> = entities.into_values().collect();
        self.write_partitioned(
            collection,
            entity_indexes(include_encodes),
            records,
            move |e: &Entity| {
                let doc = entity_document(e, &taxon_uri, scores.get(&e.uri), include_encodes);
                (e.uri.clone(), doc)
            },
        )
        .await
    }

    /// Write a reified-relation namespace (e.g. protein-protein interaction).
    pub async fn write_statements(
        &self,
        collection: &str,
        statements: BTreeMap<String, Statement>,
        taxon: &str,
    ) -> Result<(), StoreError> {
        let taxon_uri = format!("{TAXON_PREFIX}{taxon}");
        let records: Vec<Statement> = statements.into_values().collect();
        self.write_partitioned(
            collection,
            statement_indexes(),
            records,
            move |s: &Statement| (s.uri.clone(), statement_document(s, &taxon_uri)),
        )
        .await
    }

    /// Write an ontology-term or disease namespace (label/definition only).
    pub async fn write_simple_entities(
        &self,
        collection: &str,
        entities: BTreeMap<String, Entity>,
        scores: &RefScoreTable,
    ) -> Result<(), StoreError> {
        let scores = Arc::new(scores.clone());
        let records: Vec<Entity> = entities.into_values().collect();
        self.write_partitioned(
            collection,
            simple_entity_indexes(),
            records,
            move |e: &Entity| (e.uri.clone(), simple_entity_document(e, scores.get(&e.uri))),
        )
        .await
    }

    async fn write_partitioned<T, F>(
        &self,
        collection: &str,
        indexes: Vec<IndexSpec>,
        records: Vec<T>,
        build: F,
    ) -> Result<(), StoreError>
    where
        T: Send + Sync + 'static,
        F: Fn(&T) -> (String, Value) + Send + Sync + 'static,
    {
        let total = records.len();
        let parts = partition(records, self.workers);
        let build = Arc::new(build);
        let indexes = Arc::new(indexes);

        let mut tasks: JoinSet<Result<(), StoreError>> = JoinSet::new();
        for (worker, part) in parts.into_iter().enumerate() {
            let store = Arc::clone(&self.store);
            let build = Arc::clone(&build);
            let indexes = Arc::clone(&indexes);
            let collection = collection.to_string();
            tasks.spawn(async move {
                // Index creation is idempotent; racing across workers is fine.
                store.ensure_indexes(&collection, &indexes).await?;
                let mut written = 0usize;
                for record in &part {
                    let (uri, document) = build(record);
                    store.upsert(&collection, &uri, document).await?;
                    written += 1;
                }
                tracing::debug!(worker, written, collection = %collection, "writer worker finished");
                Ok(())
            });
        }

        // Barrier: wait for every worker, then surface the first failure.
        let mut first_err: Option<StoreError> = None;
        while let Some(joined) = tasks.join_next().await {
            let result = match joined {
                Ok(result) => result,
                Err(join_err) => Err(StoreError::Worker(join_err.to_string())),
            };
            if let Err(err) = result {
                if first_err.is_none() {
                    first_err = Some(err);
                }
            }
        }
        match first_err {
            Some(err) => Err(err),
            None => {
                tracing::info!(collection = %collection, records = total, "bulk write complete");
                Ok(())
            }
        }
    }
}

pub fn entity_document(
    entity: &Entity,
    taxon_uri: &str,
    ref_score: i64,
    include_encodes: bool,
) -> Value {
    let lc_synonyms: Vec<String> = entity.synonyms.iter().map(|s| s.to_lowercase()).collect();
    let mut doc = json!({
        "uri": entity.uri,
        "prefLabel": entity.pref_label,
        "lcLabel": entity.pref_label.to_lowercase(),
        "definition": entity.definition,
        "annotationScore": entity.evidence_score,
        "synonyms": entity.synonyms,
        "lcSynonyms": lc_synonyms,
        "instances": entity.instances,
        "taxon": taxon_uri,
        "refScore": ref_score,
    });
    if include_encodes {
        doc["encodes"] = json!(entity.encodes);
    }
    doc
}

pub fn statement_document(statement: &Statement, taxon_uri: &str) -> Value {
    json!({
        "uri": statement.uri,
        "prefLabel": statement.pref_label,
        "lcLabel": statement.pref_label.to_lowercase(),
        "definition": statement.definition,
        "subject": statement.subject,
        "object": statement.object,
        "predicate": statement.predicate,
        "taxon": taxon_uri,
    })
}

pub fn simple_entity_document(entity: &Entity, ref_score: i64) -> Value {
    json!({
        "uri": entity.uri,
        "prefLabel": entity.pref_label,
        "lcLabel": entity.pref_label.to_lowercase(),
        "definition": entity.definition,
        "refScore": ref_score,
    })
}
