//! Entity accumulation: one pass over one triple stream, folding scattered
//! facts about each accepted subject into one record.

use crate::schema::{field_rule, FieldRule, CLASS_MARKER};
use metadb_rdf::{strip_angles, Triple, TripleReader};
use std::collections::{BTreeMap, BTreeSet};
use std::io::BufRead;

/// One aggregated record per distinct subject URI.
///
/// Scalar fields are last-write-wins; `synonyms` keeps insertion order; the
/// URI-valued collections are sets so re-runs and line reordering cannot
/// change the accumulated result.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Entity {
    pub uri: String,
    pub pref_label: String,
    pub definition: String,
    pub synonyms: Vec<String>,
    pub instances: BTreeSet<String>,
    pub encodes: BTreeSet<String>,
    pub literature_refs: BTreeSet<String>,
    pub evidence_score: f64,
    pub entity_type: String,
}

impl Entity {
    fn new(uri: &str) -> Self {
        Self {
            uri: uri.to_string(),
            ..Self::default()
        }
    }
}

/// Folds a triple stream into `uri -> Entity`, restricted to subjects under
/// the accepted namespace prefix. Everything outside the prefix is dropped
/// without side effects.
pub struct EntityAccumulator {
    prefix: String,
    entities: BTreeMap<String, Entity>,
}

impl EntityAccumulator {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            entities: BTreeMap::new(),
        }
    }

    /// Run one full pass over a reader.
    pub fn consume<R: BufRead>(&mut self, reader: TripleReader<R>) {
        let mut reader = reader;
        for triple in reader.by_ref() {
            self.apply(&triple);
        }
        tracing::debug!(
            lines = reader.lines_read(),
            skipped = reader.lines_skipped(),
            subjects = self.entities.len(),
            "entity pass consumed source"
        );
    }

    /// Fold a single triple into the mapping. Re-observing a predicate for an
    /// existing subject mutates the record in place, never duplicates it.
    pub fn apply(&mut self, triple: &Triple) {
        if !triple.subject.starts_with(&self.prefix) {
            return;
        }
        let Some(rule) = field_rule(&triple.predicate) else {
            return;
        };

        let entry = self
            .entities
            .entry(triple.subject.clone())
            .or_insert_with(|| Entity::new(&triple.subject));

        match rule {
            FieldRule::OverwriteLabel => {
                entry.pref_label = triple.object.clone();
            }
            FieldRule::OverwriteDefinition => {
                entry.definition = triple.object.clone();
            }
            FieldRule::AppendSynonym => {
                entry.synonyms.push(triple.object.clone());
            }
            FieldRule::AppendInstance => {
                entry.instances.insert(strip_angles(&triple.object).to_string());
            }
            FieldRule::AppendEncodes => {
                entry.encodes.insert(strip_angles(&triple.object).to_string());
            }
            FieldRule::AppendLiteratureRef => {
                entry
                    .literature_refs
                    .insert(strip_angles(&triple.object).to_string());
            }
            FieldRule::OverwriteEvidenceScore => {
                // Invalid numeric values leave the prior value untouched.
                if let Ok(value) = triple.object.parse::<f64>() {
                    entry.evidence_score = value;
                }
            }
            FieldRule::OverwriteTypeIfClass => {
                if triple.object == CLASS_MARKER {
                    entry.entity_type = strip_angles(&triple.object).to_string();
                }
                // Any other type object is an instance of another class and
                // is currently dropped (see schema::CLASS_MARKER).
            }
        }
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn into_entities(self) -> BTreeMap<String, Entity> {
        self.entities
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema;
    use metadb_rdf::TripleReader;
    use std::io::Cursor;

    const PREFIX: &str = "http://rdf.biogateway.eu/prot";

    fn consume(input: &str) -> BTreeMap<String, Entity> {
        let mut acc = EntityAccumulator::new(PREFIX);
        acc.consume(TripleReader::new(Cursor::new(input.to_string())));
        acc.into_entities()
    }

    fn line(subject: &str, predicate: &str, object: &str) -> String {
        format!("<{subject}> {predicate} {object} .\n")
    }

    #[test]
    fn folds_label_and_synonym_into_one_record() {
        let uri = "http://rdf.biogateway.eu/prot/P04637";
        let input = line(uri, schema::PREF_LABEL, "\"Foo\"")
            + &line(uri, schema::SYNONYM, "\"Bar\"");
        let entities = consume(&input);

        assert_eq!(entities.len(), 1);
        let e = &entities[uri];
        assert_eq!(e.pref_label, "Foo");
        assert_eq!(e.synonyms, vec!["Bar".to_string()]);
    }

    #[test]
    fn scalar_fields_are_last_write_wins() {
        let uri = "http://rdf.biogateway.eu/prot/P04637";
        let input = line(uri, schema::PREF_LABEL, "\"Old\"")
            + &line(uri, schema::DEFINITION, "\"first\"")
            + &line(uri, schema::PREF_LABEL, "\"New\"")
            + &line(uri, schema::DEFINITION, "\"second\"");
        let entities = consume(&input);

        let e = &entities[uri];
        assert_eq!(e.pref_label, "New");
        assert_eq!(e.definition, "second");
    }

    #[test]
    fn multi_valued_fields_are_order_insensitive_sets() {
        let uri = "http://rdf.biogateway.eu/prot/P04637";
        let forward = line(uri, schema::LITERATURE_REF, "<http://pubmed/1>")
            + &line(uri, schema::LITERATURE_REF, "<http://pubmed/2>");
        let reversed = line(uri, schema::LITERATURE_REF, "<http://pubmed/2>")
            + &line(uri, schema::LITERATURE_REF, "<http://pubmed/1>");

        let a = consume(&forward);
        let b = consume(&reversed);
        assert_eq!(a[uri].literature_refs, b[uri].literature_refs);
        assert_eq!(a[uri].literature_refs.len(), 2);
    }

    #[test]
    fn subjects_outside_prefix_are_dropped() {
        let input = line(
            "http://other.example.org/X",
            schema::PREF_LABEL,
            "\"nope\"",
        );
        assert!(consume(&input).is_empty());
    }

    #[test]
    fn invalid_evidence_score_leaves_prior_value() {
        let uri = "http://rdf.biogateway.eu/prot/P04637";
        let input = line(uri, schema::EVIDENCE_LEVEL, "\"4.5\"")
            + &line(uri, schema::EVIDENCE_LEVEL, "\"not-a-number\"");
        let entities = consume(&input);
        assert_eq!(entities[uri].evidence_score, 4.5);
    }

    #[test]
    fn only_class_marker_sets_entity_type() {
        let uri = "http://rdf.biogateway.eu/prot/P04637";
        let class = line(uri, schema::RDF_TYPE, schema::CLASS_MARKER);
        let other = line(uri, schema::RDF_TYPE, "<http://example.org/SomeClass>");

        let entities = consume(&(class + &other));
        assert_eq!(
            entities[uri].entity_type,
            "http://www.w3.org/2002/07/owl#Class"
        );

        let entities = consume(&line(
            uri,
            schema::RDF_TYPE,
            "<http://example.org/SomeClass>",
        ));
        assert_eq!(entities[uri].entity_type, "");
    }

    #[test]
    fn short_lines_do_not_abort_the_pass() {
        let uri = "http://rdf.biogateway.eu/prot/P04637";
        let input = format!(
            "garbage-line\n{}",
            line(uri, schema::PREF_LABEL, "\"Kept\"")
        );
        let entities = consume(&input);
        assert_eq!(entities[uri].pref_label, "Kept");
    }

    #[test]
    fn encodes_and_instances_strip_angles() {
        let uri = "http://rdf.biogateway.eu/prot/P04637";
        let input = line(uri, schema::ENCODES, "<http://rdf.biogateway.eu/prot/Q1>")
            + &line(uri, schema::INSTANCE, "<http://example.org/ev/1>");
        let entities = consume(&input);
        assert!(entities[uri]
            .encodes
            .contains("http://rdf.biogateway.eu/prot/Q1"));
        assert!(entities[uri].instances.contains("http://example.org/ev/1"));
    }
}
