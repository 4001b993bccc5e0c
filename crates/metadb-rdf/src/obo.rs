//! Reader for OBO-style term stanzas.
//!
//! The ontology-term source may arrive as a flat stanza file instead of
//! triples:
//!
//! ```text
//! [Term]
//! id: GO:0008150
//! name: biological_process
//! namespace: biological_process
//! def: "Any process specifically pertinent to ..." [GOC:pdt]
//! synonym: "biological process" EXACT []
//! ```
//!
//! Stanzas without an `id:` line are dropped; unknown keys are ignored.

use crate::RdfError;
use std::fs::File;
use std::io::{BufRead, BufReader, Lines};
use std::path::Path;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TermStanza {
    pub id: String,
    pub name: Option<String>,
    pub namespace: Option<String>,
    pub definition: Option<String>,
    pub synonyms: Vec<String>,
}

/// Lazy stream of `[Term]` stanzas.
pub struct TermReader<R: BufRead> {
    lines: Lines<R>,
    in_term: bool,
    current: TermStanza,
    done: bool,
}

impl TermReader<BufReader<File>> {
    pub fn open(path: &Path) -> Result<Self, RdfError> {
        let file = File::open(path).map_err(|source| RdfError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::new(BufReader::new(file)))
    }
}

impl<R: BufRead> TermReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
            in_term: false,
            current: TermStanza::default(),
            done: false,
        }
    }

    fn take_current(&mut self) -> Option<TermStanza> {
        let stanza = std::mem::take(&mut self.current);
        if stanza.id.is_empty() {
            None
        } else {
            Some(stanza)
        }
    }
}

/// `def:` values carry a quoted text plus trailing provenance brackets;
/// `synonym:` values a quoted text plus scope keyword. Take the quoted part.
fn quoted_or_whole(value: &str) -> String {
    let value = value.trim();
    if let Some(rest) = value.strip_prefix('"') {
        if let Some(end) = rest.find('"') {
            return rest[..end].to_string();
        }
    }
    value.to_string()
}

impl<R: BufRead> Iterator for TermReader<R> {
    type Item = TermStanza;

    fn next(&mut self) -> Option<TermStanza> {
        if self.done {
            return None;
        }
        loop {
            let Some(line) = self.lines.next() else {
                self.done = true;
                return if self.in_term { self.take_current() } else { None };
            };
            let Ok(line) = line else { continue };
            let line = line.trim();

            if line == "[Term]" {
                let finished = if self.in_term { self.take_current() } else { None };
                self.in_term = true;
                self.current = TermStanza::default();
                if finished.is_some() {
                    return finished;
                }
                continue;
            }

            // Other stanza kinds ([Typedef], [Instance]) end the current term.
            if line.starts_with('[') {
                let finished = if self.in_term { self.take_current() } else { None };
                self.in_term = false;
                if finished.is_some() {
                    return finished;
                }
                continue;
            }

            if !self.in_term {
                continue;
            }
            let Some((key, value)) = line.split_once(':') else {
                continue;
            };
            let value = value.trim();
            match key {
                "id" => self.current.id = value.to_string(),
                "name" => self.current.name = Some(value.to_string()),
                "namespace" => self.current.namespace = Some(value.to_string()),
                "def" => self.current.definition = Some(quoted_or_whole(value)),
                "synonym" => self.current.synonyms.push(quoted_or_whole(value)),
                _ => {}
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const SAMPLE: &str = "\
format-version: 1.2

[Term]
id: GO:0008150
name: biological_process
namespace: biological_process
def: \"Any process specifically pertinent to the functioning of integrated living units.\" [GOC:pdt]
synonym: \"biological process\" EXACT []

[Term]
id: GO:0003674
name: molecular_function
namespace: molecular_function

[Typedef]
id: part_of
name: part of
";

    #[test]
    fn parses_term_stanzas() {
        let terms: Vec<TermStanza> = TermReader::new(Cursor::new(SAMPLE)).collect();
        assert_eq!(terms.len(), 2);

        assert_eq!(terms[0].id, "GO:0008150");
        assert_eq!(terms[0].name.as_deref(), Some("biological_process"));
        assert_eq!(terms[0].namespace.as_deref(), Some("biological_process"));
        assert_eq!(
            terms[0].definition.as_deref(),
            Some("Any process specifically pertinent to the functioning of integrated living units.")
        );
        assert_eq!(terms[0].synonyms, vec!["biological process".to_string()]);

        assert_eq!(terms[1].id, "GO:0003674");
        assert!(terms[1].definition.is_none());
    }

    #[test]
    fn typedef_stanzas_are_not_terms() {
        let terms: Vec<TermStanza> = TermReader::new(Cursor::new(SAMPLE)).collect();
        assert!(terms.iter().all(|t| !t.id.starts_with("part_of")));
    }

    #[test]
    fn term_without_id_is_dropped() {
        let input = "[Term]\nname: orphan\n\n[Term]\nid: GO:1\nname: kept\n";
        let terms: Vec<TermStanza> = TermReader::new(Cursor::new(input)).collect();
        assert_eq!(terms.len(), 1);
        assert_eq!(terms[0].id, "GO:1");
    }
}
