use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A single scalar command parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, derive_more::Display)]
#[serde(untagged)]
pub enum ParamValue {
    /// Free-form text, sent as-is (percent-encoded on HTTP).
    Str(String),
    /// Integer, rendered in plain decimal.
    Int(i64),
    /// Float, rendered in the shortest decimal form that round-trips.
    Float(f64),
}

macro_rules! param_value_from {
    ($variant:ident => $($ty:ty),*) => {
        $(
            impl From<$ty> for ParamValue {
                fn from(value: $ty) -> Self {
                    Self::$variant(value.into())
                }
            }
        )*
    };
}

param_value_from!(Str => String, &str, &String);
param_value_from!(Int => i64, i32, u32, u16, u8);
param_value_from!(Float => f64, f32);

/// Ordered mapping of parameter name to value.
///
/// Iteration follows insertion order so that encoded requests are
/// deterministic.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Params(IndexMap<String, ParamValue>);

impl Params {
    /// Create an empty parameter set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a parameter, returning the previous value under that name.
    pub fn insert(
        &mut self,
        name: impl Into<String>,
        value: impl Into<ParamValue>,
    ) -> Option<ParamValue> {
        self.0.insert(name.into(), value.into())
    }

    /// Builder-style variant of [`Params::insert`].
    pub fn with(mut self, name: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        let _ = self.insert(name, value);
        self
    }

    /// Look up a parameter by name.
    pub fn get(&self, name: &str) -> Option<&ParamValue> {
        self.0.get(name)
    }

    /// Number of parameters.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether there are no parameters.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over `(name, value)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParamValue)> {
        self.0.iter().map(|(name, value)| (name.as_str(), value))
    }

    /// Iterate over values in insertion order.
    pub fn values(&self) -> impl Iterator<Item = &ParamValue> {
        self.0.values()
    }
}

impl<K: Into<String>, V: Into<ParamValue>> FromIterator<(K, V)> for Params {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(name, value)| (name.into(), value.into()))
                .collect(),
        )
    }
}

impl<K: Into<String>, V: Into<ParamValue>> Extend<(K, V)> for Params {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        self.0.extend(
            iter.into_iter()
                .map(|(name, value)| (name.into(), value.into())),
        );
    }
}

/// Build [`Params`] from `name: value` pairs, keeping their order.
macro_rules! params {
    ($($key:ident: $value:expr),* $(,)?) => {{
        #[allow(unused_mut)]
        let mut params = $crate::params::Params::new();
        $(
            let _ = params.insert(stringify!($key), $value);
        )*
        params
    }};
}
pub(crate) use params;
