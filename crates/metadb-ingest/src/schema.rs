//! Predicate schema: the fixed mapping from known predicate URIs to the
//! semantic field they populate, plus the accumulation policy for each.
//!
//! This is configuration data, not logic. Predicates are matched on the raw
//! token as it appears on the line (angle brackets included).

pub const PREF_LABEL: &str = "<http://www.w3.org/2004/02/skos/core#prefLabel>";
pub const LABEL: &str = "<http://www.w3.org/2000/01/rdf-schema#label>";
pub const DEFINITION: &str = "<http://www.w3.org/2004/02/skos/core#definition>";
pub const OBO_DEFINITION: &str = "<http://purl.obolibrary.org/obo/IAO_0000115>";
pub const SYNONYM: &str = "<http://www.w3.org/2004/02/skos/core#altLabel>";
pub const INSTANCE: &str = "<http://schema.org/evidenceOrigin>";
pub const EVIDENCE_LEVEL: &str = "<http://schema.org/evidenceLevel>";
pub const ENCODES: &str = "<http://semanticscience.org/resource/SIO_010078>";
pub const LITERATURE_REF: &str = "<http://semanticscience.org/resource/SIO_000772>";
pub const RDF_TYPE: &str = "<http://www.w3.org/1999/02/22-rdf-syntax-ns#type>";

pub const STATEMENT_SUBJECT: &str = "<http://www.w3.org/1999/02/22-rdf-syntax-ns#subject>";
pub const STATEMENT_PREDICATE: &str = "<http://www.w3.org/1999/02/22-rdf-syntax-ns#predicate>";
pub const STATEMENT_OBJECT: &str = "<http://www.w3.org/1999/02/22-rdf-syntax-ns#object>";

/// The only `rdf:type` object that sets `entity_type`. Type triples with any
/// other object are dropped.
/// TODO: link instances of non-class types back to their owning class.
pub const CLASS_MARKER: &str = "<http://www.w3.org/2002/07/owl#Class>";

/// Taxon URI prefix used when materializing the `taxon` document field.
pub const TAXON_PREFIX: &str = "http://purl.obolibrary.org/obo/NCBITaxon_";

/// Which entity field a predicate populates, with its accumulation policy
/// baked into the variant: `Overwrite*` fields are last-write-wins, `Append*`
/// fields collect every observed value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldRule {
    /// prefLabel (and its derived lower-cased form). Overwrite.
    OverwriteLabel,
    /// definition. Overwrite.
    OverwriteDefinition,
    /// synonyms. Append.
    AppendSynonym,
    /// instances (evidence-origin URIs). Append.
    AppendInstance,
    /// encodes (gene → protein). Append.
    AppendEncodes,
    /// literature references. Append.
    AppendLiteratureRef,
    /// evidence score; invalid numeric values are ignored. Overwrite.
    OverwriteEvidenceScore,
    /// entity type, only when the object equals [`CLASS_MARKER`]. Overwrite.
    OverwriteTypeIfClass,
}

/// Look up the rule for a predicate token, if it is one the entity
/// accumulator knows about.
pub fn field_rule(predicate: &str) -> Option<FieldRule> {
    match predicate {
        PREF_LABEL | LABEL => Some(FieldRule::OverwriteLabel),
        DEFINITION | OBO_DEFINITION => Some(FieldRule::OverwriteDefinition),
        SYNONYM => Some(FieldRule::AppendSynonym),
        INSTANCE => Some(FieldRule::AppendInstance),
        ENCODES => Some(FieldRule::AppendEncodes),
        LITERATURE_REF => Some(FieldRule::AppendLiteratureRef),
        EVIDENCE_LEVEL => Some(FieldRule::OverwriteEvidenceScore),
        RDF_TYPE => Some(FieldRule::OverwriteTypeIfClass),
        _ => None,
    }
}
