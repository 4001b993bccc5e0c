//! Statement accumulation: the entity fold specialized for reified relation
//! records (protein-protein interaction graphs and similar).

use crate::schema;
use metadb_rdf::{strip_angles, Triple, TripleReader};
use std::collections::BTreeMap;
use std::io::BufRead;

/// One reified relation: label/definition plus the subject/predicate/object
/// triad. Same last-write-wins discipline as `Entity`'s scalar fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Statement {
    pub uri: String,
    pub pref_label: String,
    pub definition: String,
    pub subject: String,
    pub object: String,
    pub predicate: String,
}

impl Statement {
    fn new(uri: &str) -> Self {
        Self {
            uri: uri.to_string(),
            ..Self::default()
        }
    }
}

pub struct StatementAccumulator {
    prefix: String,
    statements: BTreeMap<String, Statement>,
}

impl StatementAccumulator {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            statements: BTreeMap::new(),
        }
    }

    pub fn consume<R: BufRead>(&mut self, reader: TripleReader<R>) {
        let mut reader = reader;
        for triple in reader.by_ref() {
            self.apply(&triple);
        }
        tracing::debug!(
            lines = reader.lines_read(),
            skipped = reader.lines_skipped(),
            subjects = self.statements.len(),
            "statement pass consumed source"
        );
    }

    pub fn apply(&mut self, triple: &Triple) {
        if !triple.subject.starts_with(&self.prefix) {
            return;
        }

        let entry = self
            .statements
            .entry(triple.subject.clone())
            .or_insert_with(|| Statement::new(&triple.subject));

        match triple.predicate.as_str() {
            schema::PREF_LABEL => entry.pref_label = triple.object.clone(),
            schema::DEFINITION => entry.definition = triple.object.clone(),
            schema::STATEMENT_SUBJECT => {
                entry.subject = strip_angles(&triple.object).to_string();
            }
            schema::STATEMENT_OBJECT => {
                entry.object = strip_angles(&triple.object).to_string();
            }
            schema::STATEMENT_PREDICATE => {
                entry.predicate = strip_angles(&triple.object).to_string();
            }
            _ => {}
        }
    }

    pub fn len(&self) -> usize {
        self.statements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }

    pub fn into_statements(self) -> BTreeMap<String, Statement> {
        self.statements
    }
}
