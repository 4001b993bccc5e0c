//! Streaming reader for N-Triples-shaped statement files.

use crate::literal::{decode_literal, strip_angles};
use crate::RdfError;
use std::fs::File;
use std::io::{BufRead, BufReader, Lines};
use std::path::Path;

/// One statement: subject URI (angle brackets stripped), predicate token
/// (kept verbatim, including angle brackets, for schema lookup), and the
/// decoded object value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Triple {
    pub subject: String,
    pub predicate: String,
    pub object: String,
}

/// Lazy, non-restartable triple stream over a buffered source.
///
/// Each line is split on the first two spaces only; the remainder is the
/// object and may itself contain spaces. Lines that do not split into three
/// fields are skipped and counted, never fatal.
#[derive(Debug)]
pub struct TripleReader<R: BufRead> {
    lines: Lines<R>,
    lines_read: u64,
    lines_skipped: u64,
}

impl TripleReader<BufReader<File>> {
    pub fn open(path: &Path) -> Result<Self, RdfError> {
        let file = File::open(path).map_err(|source| RdfError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::new(BufReader::new(file)))
    }
}

impl<R: BufRead> TripleReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
            lines_read: 0,
            lines_skipped: 0,
        }
    }

    /// Total lines consumed so far, including skipped ones.
    pub fn lines_read(&self) -> u64 {
        self.lines_read
    }

    /// Lines that failed to split into three fields.
    pub fn lines_skipped(&self) -> u64 {
        self.lines_skipped
    }
}

impl<R: BufRead> Iterator for TripleReader<R> {
    type Item = Triple;

    fn next(&mut self) -> Option<Triple> {
        loop {
            let line = match self.lines.next()? {
                Ok(line) => line,
                // Undecodable line (e.g. invalid UTF-8): skip, keep going.
                Err(_) => {
                    self.lines_read += 1;
                    self.lines_skipped += 1;
                    continue;
                }
            };
            self.lines_read += 1;

            if line.trim().is_empty() {
                continue;
            }

            let mut fields = line.splitn(3, ' ');
            let (Some(subject), Some(predicate), Some(object)) =
                (fields.next(), fields.next(), fields.next())
            else {
                self.lines_skipped += 1;
                tracing::debug!(line = self.lines_read, "skipping short statement line");
                continue;
            };

            return Some(Triple {
                subject: strip_angles(subject).to_string(),
                predicate: predicate.to_string(),
                object: decode_literal(object),
            });
        }
    }
}
