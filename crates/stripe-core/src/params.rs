//! Request parameters and bracket-path flattening.
//!
//! Stripe takes form-encoded bodies where nesting is expressed in the key:
//! `{"metadata": {"order_id": "42"}}` travels as `metadata[order_id]=42`.
//! Callers build a [`ParamTree`] (usually a [`ParamMap`] at the root) and
//! [`flatten`] turns it into an ordered list of [`WireParam`]s.
//!
//! Lists are always encoded with explicit indices (`expand[0]=a&expand[1]=b`),
//! which is also the only form that can carry lists of maps
//! (`items[0][price]=price_123`).
//!
//! There is no null variant: an absent optional is simply never inserted, so it
//! can never reach the wire as `key=`.

use std::collections::{BTreeMap, HashMap};
use std::fmt;

/// A leaf value.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    /// A string value.
    String(String),
    /// An integer value (amounts in the smallest currency unit, counts, timestamps).
    Integer(i64),
    /// A floating point value.
    Float(f64),
    /// A boolean, sent as `true` / `false`.
    Bool(bool),
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String(s) => f.write_str(s),
            Self::Integer(n) => write!(f, "{n}"),
            Self::Float(n) => write!(f, "{n}"),
            Self::Bool(b) => write!(f, "{b}"),
        }
    }
}

/// A recursive request parameter value.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamTree {
    /// A single value.
    Scalar(Scalar),
    /// An ordered list.
    List(Vec<ParamTree>),
    /// An ordered mapping from key to value.
    Map(ParamMap),
}

/// An insertion-ordered map of parameters with unique keys.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParamMap {
    entries: Vec<(String, ParamTree)>,
}

impl ParamMap {
    /// Create an empty map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a value. An existing entry with the same key is replaced in place.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<ParamTree>) -> &mut Self {
        let key = key.into();
        let value = value.into();
        if let Some(slot) = self.entries.iter_mut().find(|(k, _)| *k == key) {
            slot.1 = value;
        } else {
            self.entries.push((key, value));
        }
        self
    }

    /// Insert a value only if it is present.
    pub fn insert_opt<V: Into<ParamTree>>(
        &mut self,
        key: impl Into<String>,
        value: Option<V>,
    ) -> &mut Self {
        if let Some(value) = value {
            self.insert(key, value);
        }
        self
    }

    /// Builder form of [`ParamMap::insert`].
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<ParamTree>) -> Self {
        self.insert(key, value);
        self
    }

    /// Look up a value by key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&ParamTree> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// Number of top-level entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the map has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParamTree)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Flatten this map into wire parameters.
    #[must_use]
    pub fn flatten(&self) -> Vec<WireParam> {
        let mut out = Vec::new();
        flatten_map(self, None, &mut out);
        out
    }
}

impl<K: Into<String>, V: Into<ParamTree>> FromIterator<(K, V)> for ParamMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (k, v) in iter {
            map.insert(k, v);
        }
        map
    }
}

/// A flat `(key, value)` pair as sent on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct WireParam {
    /// Bracket-path key, e.g. `shipping[address][city]`.
    pub key: String,
    /// Rendered value.
    pub value: String,
}

impl WireParam {
    /// Create a wire parameter.
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Flatten a parameter tree into ordered wire parameters.
///
/// A bare scalar at the root yields a single pair with an empty key, and a
/// list at the root yields index-only keys (`[0]`, `[1]`, ...) with no parent
/// name. Request bodies and queries always flatten from a map.
#[must_use]
pub fn flatten(tree: &ParamTree) -> Vec<WireParam> {
    let mut out = Vec::new();
    match tree {
        ParamTree::Scalar(value) => out.push(WireParam::new("", value.to_string())),
        ParamTree::List(items) => flatten_list(items, "", &mut out),
        ParamTree::Map(map) => flatten_map(map, None, &mut out),
    }
    out
}

/// Form-urlencode wire parameters (`application/x-www-form-urlencoded`).
#[must_use]
pub fn encode_form(params: &[WireParam]) -> String {
    let mut serializer = url::form_urlencoded::Serializer::new(String::new());
    for param in params {
        serializer.append_pair(&param.key, &param.value);
    }
    serializer.finish()
}

fn flatten_map(map: &ParamMap, prefix: Option<&str>, out: &mut Vec<WireParam>) {
    for (key, value) in &map.entries {
        let path = match prefix {
            Some(prefix) => format!("{prefix}[{key}]"),
            None => key.clone(),
        };
        flatten_value(value, &path, out);
    }
}

fn flatten_list(items: &[ParamTree], prefix: &str, out: &mut Vec<WireParam>) {
    for (index, item) in items.iter().enumerate() {
        flatten_value(item, &format!("{prefix}[{index}]"), out);
    }
}

fn flatten_value(value: &ParamTree, path: &str, out: &mut Vec<WireParam>) {
    match value {
        ParamTree::Scalar(scalar) => out.push(WireParam::new(path, scalar.to_string())),
        ParamTree::List(items) => flatten_list(items, path, out),
        ParamTree::Map(map) => flatten_map(map, Some(path), out),
    }
}

impl From<Scalar> for ParamTree {
    fn from(value: Scalar) -> Self {
        Self::Scalar(value)
    }
}

impl From<ParamMap> for ParamTree {
    fn from(value: ParamMap) -> Self {
        Self::Map(value)
    }
}

impl From<&str> for ParamTree {
    fn from(value: &str) -> Self {
        Self::Scalar(Scalar::String(value.to_string()))
    }
}

impl From<String> for ParamTree {
    fn from(value: String) -> Self {
        Self::Scalar(Scalar::String(value))
    }
}

impl From<&String> for ParamTree {
    fn from(value: &String) -> Self {
        Self::Scalar(Scalar::String(value.clone()))
    }
}

impl From<bool> for ParamTree {
    fn from(value: bool) -> Self {
        Self::Scalar(Scalar::Bool(value))
    }
}

impl From<f64> for ParamTree {
    fn from(value: f64) -> Self {
        Self::Scalar(Scalar::Float(value))
    }
}

macro_rules! integer_param {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for ParamTree {
                fn from(value: $ty) -> Self {
                    Self::Scalar(Scalar::Integer(i64::from(value)))
                }
            }
        )*
    };
}

integer_param!(i8, i16, i32, i64, u8, u16, u32);

impl<T: Into<ParamTree>> From<Vec<T>> for ParamTree {
    fn from(value: Vec<T>) -> Self {
        Self::List(value.into_iter().map(Into::into).collect())
    }
}

impl<V: Into<ParamTree>, S> From<HashMap<String, V, S>> for ParamTree {
    /// Hash maps have no stable order, so keys are sorted to keep output reproducible.
    fn from(value: HashMap<String, V, S>) -> Self {
        let sorted: BTreeMap<String, V> = value.into_iter().collect();
        Self::from(sorted)
    }
}

impl<V: Into<ParamTree>> From<BTreeMap<String, V>> for ParamTree {
    fn from(value: BTreeMap<String, V>) -> Self {
        Self::Map(value.into_iter().collect())
    }
}
