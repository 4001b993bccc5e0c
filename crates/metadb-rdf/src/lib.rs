//! Source readers for the MetaDB generator (interop boundary).
//!
//! Two line-oriented grammars come in from upstream dumps, both untrusted:
//!
//! - N-Triples-shaped statement files (`.nt`), one triple per line. These are
//!   multi-million-line exports; a malformed line must never abort a pass, so
//!   the reader tokenizes best-effort and skips what it cannot split.
//! - OBO term stanzas (`[Term]` blocks with `id:` / `name:` / ... lines) for
//!   the ontology-term source. A different grammar with its own reader — it
//!   is not shoehorned into the triple reader.

pub mod literal;
pub mod ntriples;
pub mod obo;

pub use literal::{decode_literal, strip_angles};
pub use ntriples::{Triple, TripleReader};
pub use obo::{TermReader, TermStanza};

use std::path::PathBuf;

/// Errors surfaced by the readers. Only failing to open a source is fatal;
/// everything below line granularity is absorbed.
#[derive(Debug, thiserror::Error)]
pub enum RdfError {
    #[error("failed to open source {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
