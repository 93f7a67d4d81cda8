use crate::errors::UsageError;
use crate::params::{Params, params};
use indexmap::IndexMap;
use std::collections::{BTreeMap, HashMap};
use std::fmt::{self, Display};

/// A Two-Line Element set with its title line.
///
/// Sent to the mount as the `line0`, `line1` and `line2` parameters.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Tle {
    /// Satellite name (title line).
    pub name: String,
    /// First element line.
    pub line1: String,
    /// Second element line.
    pub line2: String,
}

impl Tle {
    /// Create a TLE from its three lines.
    pub fn new(name: impl Into<String>, line1: impl Into<String>, line2: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            line1: line1.into(),
            line2: line2.into(),
        }
    }

    pub(crate) fn to_params(&self) -> Params {
        params! {
            line0: &self.name,
            line1: &self.line1,
            line2: &self.line2,
        }
    }
}

impl Display for Tle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\n{}\n{}", self.name, self.line1, self.line2)
    }
}

/// Any of the accepted shapes of a TLE argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TleInput {
    /// All three lines in a single string.
    Text(String),
    /// One string per line.
    Lines(Vec<String>),
    /// Lines keyed by `line0`, `line1` and `line2`.
    Named(IndexMap<String, String>),
    /// Already normalized.
    Tle(Tle),
}

impl TleInput {
    /// Normalize into a [`Tle`], rejecting anything that isn't exactly three lines.
    pub fn normalize(self) -> Result<Tle, UsageError> {
        match self {
            Self::Text(text) => Self::from_lines(text.lines().map(str::to_owned).collect()),
            Self::Lines(lines) => Self::from_lines(lines),
            Self::Named(mut map) => {
                let mut take = |key: &'static str| {
                    map.shift_remove(key)
                        .ok_or(UsageError::TleMissingKey { key })
                };
                Ok(Tle {
                    name: take("line0")?,
                    line1: take("line1")?,
                    line2: take("line2")?,
                })
            }
            Self::Tle(tle) => Ok(tle),
        }
    }

    fn from_lines(lines: Vec<String>) -> Result<Tle, UsageError> {
        match <[String; 3]>::try_from(lines) {
            Ok([name, line1, line2]) => Ok(Tle { name, line1, line2 }),
            Err(lines) => Err(UsageError::TleLineCount { count: lines.len() }),
        }
    }
}

impl TryFrom<TleInput> for Tle {
    type Error = UsageError;

    fn try_from(input: TleInput) -> Result<Self, UsageError> {
        input.normalize()
    }
}

impl From<Tle> for TleInput {
    fn from(tle: Tle) -> Self {
        Self::Tle(tle)
    }
}

impl From<&Tle> for TleInput {
    fn from(tle: &Tle) -> Self {
        Self::Tle(tle.clone())
    }
}

impl From<String> for TleInput {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<&str> for TleInput {
    fn from(text: &str) -> Self {
        Self::Text(text.to_owned())
    }
}

impl<S: Into<String>> From<Vec<S>> for TleInput {
    fn from(lines: Vec<S>) -> Self {
        Self::Lines(lines.into_iter().map(Into::into).collect())
    }
}

impl<S: Into<String>, const N: usize> From<[S; N]> for TleInput {
    fn from(lines: [S; N]) -> Self {
        Self::Lines(lines.into_iter().map(Into::into).collect())
    }
}

impl<K: Into<String>, V: Into<String>> From<IndexMap<K, V>> for TleInput {
    fn from(map: IndexMap<K, V>) -> Self {
        Self::Named(map.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

impl<K: Into<String>, V: Into<String>> From<HashMap<K, V>> for TleInput {
    fn from(map: HashMap<K, V>) -> Self {
        Self::Named(map.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

impl<K: Into<String>, V: Into<String>> From<BTreeMap<K, V>> for TleInput {
    fn from(map: BTreeMap<K, V>) -> Self {
        Self::Named(map.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ISS: [&str; 3] = [
        "ISS (ZARYA)",
        "1 25544U 98067A   20140.34419374 -.00000374  00000-0  13653-5 0  9990",
        "2 25544  51.6433 131.2277 0001338 330.3524 173.1622 15.49372617227549",
    ];

    #[test]
    fn all_shapes_normalize_to_the_same_tle() {
        let expected = Tle::new(ISS[0], ISS[1], ISS[2]);

        let shapes = [
            TleInput::from(ISS),
            TleInput::from(ISS.to_vec()),
            TleInput::from(ISS.join("\n")),
            TleInput::from(format!("{}\r\n", ISS.join("\r\n"))),
            TleInput::from(HashMap::from([
                ("line2", ISS[2]),
                ("line0", ISS[0]),
                ("line1", ISS[1]),
            ])),
            TleInput::from(expected.clone()),
        ];

        for shape in shapes {
            assert_eq!(shape.normalize().unwrap(), expected);
        }
    }

    #[test]
    fn wrong_line_counts_are_rejected() {
        assert_eq!(
            TleInput::from(ISS[..2].to_vec()).normalize(),
            Err(UsageError::TleLineCount { count: 2 })
        );
        assert_eq!(
            TleInput::from(format!("{}\nextra", ISS.join("\n"))).normalize(),
            Err(UsageError::TleLineCount { count: 4 })
        );
        assert_eq!(
            TleInput::from("").normalize(),
            Err(UsageError::TleLineCount { count: 0 })
        );
    }

    #[test]
    fn named_mapping_needs_every_line() {
        assert_eq!(
            TleInput::from(HashMap::from([("line0", ISS[0]), ("line2", ISS[2])])).normalize(),
            Err(UsageError::TleMissingKey { key: "line1" })
        );
    }

    #[test]
    fn encodes_as_numbered_lines() {
        let params = Tle::new(ISS[0], ISS[1], ISS[2]).to_params();
        assert_eq!(
            params.iter().map(|(name, _)| name).collect::<Vec<_>>(),
            ["line0", "line1", "line2"]
        );
    }
}
