//! Flat `key=value` response bodies.
//!
//! Every status-bearing reply is a list of lines of the form
//! `mount.axis0.position_degs=45.0`. Only the first `=` splits a line, so
//! values may contain `=` themselves.
//!
//! Lines without any `=` are handled by an explicit policy: the lenient
//! [`FlatResponse::parse`] skips them (and counts them, so callers can tell),
//! while [`FlatResponse::parse_strict`] rejects any such line that isn't blank.

use crate::errors::DecodeError;
use indexmap::IndexMap;

/// Ordered mapping of dotted status keys to their raw string values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlatResponse {
    entries: IndexMap<String, String>,
    skipped_lines: usize,
}

impl FlatResponse {
    /// Parse a body, skipping lines that don't contain `=`.
    pub fn parse(body: &str) -> Self {
        let mut response = Self::default();

        for line in body.lines() {
            match line.split_once('=') {
                Some((key, value)) => response.push(key, value),
                None if line.trim().is_empty() => {}
                None => {
                    tracing::debug!(line, "Skipping response line without '='");
                    response.skipped_lines += 1;
                }
            }
        }

        response
    }

    /// Parse a body, rejecting non-blank lines that don't contain `=`.
    pub fn parse_strict(body: &str) -> Result<Self, DecodeError> {
        let mut response = Self::default();

        for (index, line) in body.lines().enumerate() {
            match line.split_once('=') {
                Some((key, value)) => response.push(key, value),
                None if line.trim().is_empty() => {}
                None => {
                    return Err(DecodeError::MalformedLine {
                        line_number: index + 1,
                        line: line.to_owned(),
                    });
                }
            }
        }

        Ok(response)
    }

    /// Lenient parse of a raw body that must be UTF-8.
    pub fn from_bytes(body: &[u8]) -> Result<Self, DecodeError> {
        std::str::from_utf8(body)
            .map(Self::parse)
            .map_err(|err| DecodeError::InvalidUtf8 {
                reason: err.to_string(),
            })
    }

    fn push(&mut self, key: &str, value: &str) {
        // Later duplicates win, same as assigning into a dictionary.
        let _ = self.entries.insert(key.to_owned(), value.to_owned());
    }

    /// Raw value for a key.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Raw value for a key that must be present.
    pub fn require(&self, key: &'static str) -> Result<&str, DecodeError> {
        self.get(key).ok_or(DecodeError::MissingKey { key })
    }

    /// Number of non-blank lines that were skipped for lacking `=`.
    pub const fn skipped_lines(&self) -> usize {
        self.skipped_lines
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no entries were parsed.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over `(key, value)` pairs in the order they were received.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_str()))
    }
}
