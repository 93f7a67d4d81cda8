//! Loader for satellite catalogs in the three-line TLE text format.
//!
//! Each entry is a title line followed by the two element lines, as served
//! by CelesTrak and similar sources:
//!
//! ```text
//! ISS (ZARYA)
//! 1 25544U 98067A   20140.34419374 -.00000374  00000-0  13653-5 0  9990
//! 2 25544  51.6433 131.2277 0001338 330.3524 173.1622 15.49372617227549
//! ```

use crate::api::Tle;
use crate::errors::UsageError;
use indexmap::IndexMap;
use std::str::FromStr;

/// Satellites keyed by name, in file order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TleCatalog {
    entries: IndexMap<String, Tle>,
}

impl TleCatalog {
    /// Parse catalog text.
    ///
    /// Trailing whitespace (including `\r`) is stripped from every line and
    /// blank lines at the end are ignored. A later entry with the same name
    /// replaces an earlier one.
    pub fn parse(text: &str) -> Result<Self, UsageError> {
        let mut lines = text.lines().map(str::trim_end).collect::<Vec<_>>();
        while lines.last().is_some_and(|line| line.is_empty()) {
            let _ = lines.pop();
        }

        let mut entries = IndexMap::new();
        for chunk in lines.chunks(3) {
            let [name, line1, line2] = chunk else {
                return Err(UsageError::IncompleteCatalogEntry {
                    name: chunk.first().copied().unwrap_or_default().to_owned(),
                });
            };
            let _ = entries.insert((*name).to_owned(), Tle::new(*name, *line1, *line2));
        }

        tracing::debug!(count = entries.len(), "Parsed TLE catalog");
        Ok(Self { entries })
    }

    /// Names containing `query`, ignoring case, in file order.
    pub fn search<'catalog>(&'catalog self, query: &str) -> Vec<&'catalog str> {
        let query = query.to_lowercase();
        self.entries
            .keys()
            .filter(|name| name.to_lowercase().contains(&query))
            .map(String::as_str)
            .collect()
    }

    /// Entry with exactly this name.
    pub fn get(&self, name: &str) -> Option<&Tle> {
        self.entries.get(name)
    }

    /// The single entry matching `query`, if exactly one does.
    pub fn find_unique(&self, query: &str) -> Option<&Tle> {
        match self.search(query).as_slice() {
            [name] => self.get(name),
            _ => None,
        }
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the catalog has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over entries in file order.
    pub fn iter(&self) -> impl Iterator<Item = &Tle> {
        self.entries.values()
    }
}

impl FromStr for TleCatalog {
    type Err = UsageError;

    fn from_str(text: &str) -> Result<Self, UsageError> {
        Self::parse(text)
    }
}
