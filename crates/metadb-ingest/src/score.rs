//! Cross-reference scoring.
//!
//! The reference-score table is the one piece of state shared across passes.
//! It is owned by the orchestrator and threaded by value through every pass
//! (consume, update, return), so the fixed dependency order — tallies before
//! the passes that read them — is a type-level contract rather than a runtime
//! convention. The table is append/update-only; nothing ever deletes from it.

use crate::entity::Entity;
use crate::schema;
use metadb_rdf::{strip_angles, TripleReader};
use std::collections::BTreeMap;
use std::io::BufRead;

/// URI -> derived integer relevance score.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RefScoreTable {
    scores: BTreeMap<String, i64>,
}

impl RefScoreTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Score for a URI; missing entries read as zero.
    pub fn get(&self, uri: &str) -> i64 {
        self.scores.get(uri).copied().unwrap_or(0)
    }

    pub fn set(&mut self, uri: impl Into<String>, score: i64) {
        self.scores.insert(uri.into(), score);
    }

    /// Increment a URI's score by one, creating the entry if needed.
    pub fn bump(&mut self, uri: impl Into<String>) {
        *self.scores.entry(uri.into()).or_insert(0) += 1;
    }

    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }
}

/// How a source's entities derive their reference score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreStrategy {
    /// Count of literature references attached directly to the entity.
    DirectRefs,
    /// Sum of the current table scores of everything the entity encodes;
    /// missing or non-positive entries contribute zero.
    StructuralPropagation,
}

/// Seed the table with a score for every accumulated entity. Runs strictly
/// after the pass that produced `entities` and after any tally passes the
/// strategy depends on.
pub fn seed_entity_scores(
    entities: &BTreeMap<String, Entity>,
    strategy: ScoreStrategy,
    mut table: RefScoreTable,
) -> RefScoreTable {
    for (uri, entity) in entities {
        let score = match strategy {
            ScoreStrategy::DirectRefs => entity.literature_refs.len() as i64,
            ScoreStrategy::StructuralPropagation => entity
                .encodes
                .iter()
                .map(|target| table.get(target).max(0))
                .sum(),
        };
        table.set(uri.clone(), score);
    }
    table
}

/// Relation-tally pass: for every reified relation in the source whose
/// subject is under `prefix`, increment the table entry of the relation's
/// object URI by one — whether or not that URI has an entity record yet.
pub fn tally_relation_objects<R: BufRead>(
    reader: TripleReader<R>,
    prefix: &str,
    mut table: RefScoreTable,
) -> RefScoreTable {
    let mut reader = reader;
    let mut tallied = 0u64;
    for triple in reader.by_ref() {
        if !triple.subject.starts_with(prefix) {
            continue;
        }
        if triple.predicate == schema::STATEMENT_OBJECT {
            table.bump(strip_angles(&triple.object).to_string());
            tallied += 1;
        }
    }
    tracing::debug!(
        lines = reader.lines_read(),
        tallied,
        "relation tally pass consumed source"
    );
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;
    use std::io::Cursor;

    fn entity_with_refs(uri: &str, refs: &[&str]) -> Entity {
        Entity {
            uri: uri.to_string(),
            literature_refs: refs.iter().map(|r| r.to_string()).collect(),
            ..Entity::default()
        }
    }

    fn entity_encoding(uri: &str, targets: &[&str]) -> Entity {
        Entity {
            uri: uri.to_string(),
            encodes: targets.iter().map(|t| t.to_string()).collect::<BTreeSet<_>>(),
            ..Entity::default()
        }
    }

    #[test]
    fn direct_refs_counts_literature() {
        let mut entities = BTreeMap::new();
        entities.insert(
            "http://p/1".to_string(),
            entity_with_refs("http://p/1", &["http://pubmed/1", "http://pubmed/2"]),
        );

        let table = seed_entity_scores(&entities, ScoreStrategy::DirectRefs, RefScoreTable::new());
        assert_eq!(table.get("http://p/1"), 2);
    }

    #[test]
    fn structural_propagation_sums_children() {
        let mut table = RefScoreTable::new();
        table.set("http://p/a", 3);
        table.set("http://p/b", 2);
        table.set("http://p/neg", -5);

        let mut entities = BTreeMap::new();
        entities.insert(
            "http://g/1".to_string(),
            entity_encoding("http://g/1", &["http://p/a", "http://p/b", "http://p/neg", "http://p/missing"]),
        );

        let table = seed_entity_scores(&entities, ScoreStrategy::StructuralPropagation, table);
        // 3 + 2, negative and missing children contribute zero.
        assert_eq!(table.get("http://g/1"), 5);
    }

    #[test]
    fn propagation_is_deterministic_for_a_fixed_table() {
        let mut table = RefScoreTable::new();
        table.set("http://p/a", 7);

        let mut entities = BTreeMap::new();
        entities.insert(
            "http://g/1".to_string(),
            entity_encoding("http://g/1", &["http://p/a"]),
        );

        let a = seed_entity_scores(&entities, ScoreStrategy::StructuralPropagation, table.clone());
        let b = seed_entity_scores(&entities, ScoreStrategy::StructuralPropagation, table);
        assert_eq!(a, b);
    }

    #[test]
    fn relation_tally_counts_objects_exactly() {
        let prefix = "http://rdf.biogateway.eu/prot-onto/";
        let input = format!(
            "<{prefix}s1> {pred} <http://obo/GO_1> .\n\
             <{prefix}s2> {pred} <http://obo/GO_1> .\n\
             <{prefix}s3> {pred} <http://obo/GO_1> .\n\
             <{prefix}s4> {pred} <http://obo/GO_2> .\n\
             <http://elsewhere/s5> {pred} <http://obo/GO_1> .\n",
            pred = schema::STATEMENT_OBJECT,
        );

        let table = tally_relation_objects(
            TripleReader::new(Cursor::new(input)),
            prefix,
            RefScoreTable::new(),
        );
        assert_eq!(table.get("http://obo/GO_1"), 3);
        assert_eq!(table.get("http://obo/GO_2"), 1);
        assert_eq!(table.get("http://obo/GO_3"), 0);
    }

    #[test]
    fn tally_accumulates_across_passes() {
        let prefix = "http://rdf.biogateway.eu/prot-onto/";
        let input = format!("<{prefix}s1> {} <http://obo/GO_1> .\n", schema::STATEMENT_OBJECT);

        let table = tally_relation_objects(
            TripleReader::new(Cursor::new(input.clone())),
            prefix,
            RefScoreTable::new(),
        );
        let table = tally_relation_objects(TripleReader::new(Cursor::new(input)), prefix, table);
        assert_eq!(table.get("http://obo/GO_1"), 2);
    }
}
