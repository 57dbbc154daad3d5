//! Core types: engine identification, filter sets and normalised results.

use crate::error::SearchError;
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Supported search backends.
///
/// This is the strategy registry: each variant maps to exactly one
/// implementation of [`crate::engine::SearchEngineTrait`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchEngine {
    /// Meilisearch, queried through its REST search API.
    Meilisearch,
}

impl SearchEngine {
    /// Returns the registry key for this engine.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Meilisearch => "meilisearch",
        }
    }

    /// Returns all registered engines.
    pub fn all() -> &'static [SearchEngine] {
        &[Self::Meilisearch]
    }

    /// Resolve a registry key to an engine.
    ///
    /// Matching ignores ASCII case and surrounding whitespace.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Config`] if no engine is registered under `name`.
    pub fn from_name(name: &str) -> Result<Self, SearchError> {
        let wanted = name.trim();
        Self::all()
            .iter()
            .copied()
            .find(|engine| engine.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| SearchError::Config(format!("unknown search engine: {wanted:?}")))
    }
}

impl fmt::Display for SearchEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SearchEngine {
    type Err = SearchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s)
    }
}

/// Which search endpoint a client targets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchEndpoint {
    /// Per-index search. The index id is part of the URL path.
    #[default]
    Single,
    /// Multi-search. The index id travels inside each query of the payload.
    Multi,
}

/// How filter values are written into a filter expression.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FilterQuoting {
    /// Values are written verbatim: list items unquoted, scalars single-quoted
    /// with no escaping. Values containing `,` or `'` produce broken
    /// expressions.
    #[default]
    Legacy,
    /// Every value is single-quoted and `\` / `'` are backslash-escaped.
    Escaped,
}

/// A single filter value: string, number or boolean.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ScalarValue {
    /// Boolean value, rendered as `true`/`false`.
    Bool(bool),
    /// Numeric value, rendered in its JSON form.
    Number(serde_json::Number),
    /// String value, rendered as-is.
    String(String),
}

impl fmt::Display for ScalarValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::Number(n) => write!(f, "{n}"),
            Self::String(s) => f.write_str(s),
        }
    }
}

impl From<&str> for ScalarValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_owned())
    }
}

impl From<String> for ScalarValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<bool> for ScalarValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for ScalarValue {
    fn from(value: i64) -> Self {
        Self::Number(value.into())
    }
}

impl From<i32> for ScalarValue {
    fn from(value: i32) -> Self {
        Self::Number(value.into())
    }
}

impl From<u64> for ScalarValue {
    fn from(value: u64) -> Self {
        Self::Number(value.into())
    }
}

impl From<serde_json::Number> for ScalarValue {
    fn from(value: serde_json::Number) -> Self {
        Self::Number(value)
    }
}

/// The value side of a filter set entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FilterValue {
    /// A single value: `field='value'`.
    Scalar(ScalarValue),
    /// A list of values: `field IN [a,b]`.
    List(Vec<ScalarValue>),
    /// A nested mapping. Accepted on input but not expressible as a filter;
    /// query builders skip it.
    Nested(serde_json::Map<String, serde_json::Value>),
}

impl From<ScalarValue> for FilterValue {
    fn from(value: ScalarValue) -> Self {
        Self::Scalar(value)
    }
}

impl From<Vec<ScalarValue>> for FilterValue {
    fn from(values: Vec<ScalarValue>) -> Self {
        Self::List(values)
    }
}

macro_rules! impl_filter_value_from {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for FilterValue {
                fn from(value: $ty) -> Self {
                    Self::Scalar(value.into())
                }
            }

            impl From<Vec<$ty>> for FilterValue {
                fn from(values: Vec<$ty>) -> Self {
                    Self::List(values.into_iter().map(Into::into).collect())
                }
            }
        )*
    };
}

impl_filter_value_from!(&str, String, bool, i32, i64, u64);

/// Caller-supplied field constraints, kept in insertion order.
///
/// Deserialising from a JSON object or TOML table keeps the document order,
/// so the resulting filter expression lists clauses in the order the caller
/// wrote them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterSet {
    entries: Vec<(String, FilterValue)>,
}

impl FilterSet {
    /// Create an empty filter set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a constraint, replacing any existing value for `field` in place.
    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<FilterValue>) {
        let field = field.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(name, _)| *name == field) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((field, value)),
        }
    }

    /// Builder-style [`insert`](Self::insert).
    pub fn with(mut self, field: impl Into<String>, value: impl Into<FilterValue>) -> Self {
        self.insert(field, value);
        self
    }

    /// Look up the value for `field`.
    pub fn get(&self, field: &str) -> Option<&FilterValue> {
        self.entries
            .iter()
            .find(|(name, _)| name == field)
            .map(|(_, value)| value)
    }

    /// Iterate entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FilterValue)> {
        self.entries.iter().map(|(name, value)| (name.as_str(), value))
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the set has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, V: Into<FilterValue>> FromIterator<(K, V)> for FilterSet {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut set = Self::new();
        for (field, value) in iter {
            set.insert(field, value);
        }
        set
    }
}

impl Serialize for FilterSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (field, value) in &self.entries {
            map.serialize_entry(field, value)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for FilterSet {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct FilterSetVisitor;

        impl<'de> Visitor<'de> for FilterSetVisitor {
            type Value = FilterSet;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of field names to filter values")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<FilterSet, A::Error> {
                let mut set = FilterSet::new();
                while let Some((field, value)) = access.next_entry::<String, FilterValue>()? {
                    set.insert(field, value);
                }
                Ok(set)
            }
        }

        deserializer.deserialize_map(FilterSetVisitor)
    }
}

/// Engine-agnostic search results handed to the UI layer.
///
/// Every strategy produces this exact shape. Values the backend did not
/// report are `None` (serialised as `null`), never zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResults {
    /// Hit records, passed through untouched.
    pub results: Vec<serde_json::Value>,
    /// Page size the backend applied.
    pub limit: u64,
    /// Offset of the first hit.
    pub offset: u64,
    /// Total (possibly estimated) number of matches.
    pub total: Option<u64>,
    /// Backend processing time in milliseconds.
    pub took: Option<u64>,
    /// Highest relevance score, for engines that report one.
    pub max_score: Option<f64>,
}
