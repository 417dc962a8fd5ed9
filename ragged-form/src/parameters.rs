use std::collections::BTreeMap;

use serde_json::Value;

/// The parameter naming the logical interpretation of a node, e.g. `"string"`.
pub const ARRAY_PARAMETER: &str = "__array__";
/// The parameter naming the record type of a record node.
pub const RECORD_PARAMETER: &str = "__record__";

/// String-keyed JSON metadata attached to any node of a layout.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct Parameters(BTreeMap<String, Value>);

impl Parameters {
    /// An empty set of parameters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the value of `key`, treating JSON `null` as absent.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key).filter(|v| !v.is_null())
    }

    /// Set `key` to `value`.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(key.into(), value.into());
    }

    /// Builder-style [`Parameters::insert`].
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    /// Whether no parameter is set.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate the parameters in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    /// The `__array__` parameter, if it is a string.
    pub fn array(&self) -> Option<&str> {
        self.get(ARRAY_PARAMETER).and_then(Value::as_str)
    }

    /// The `__record__` parameter, if it is a string.
    pub fn record(&self) -> Option<&str> {
        self.get(RECORD_PARAMETER).and_then(Value::as_str)
    }

    /// Whether a list carrying these parameters is a string or bytestring, i.e. a terminal
    /// dimension rather than a nested list.
    pub fn is_string_like(&self) -> bool {
        matches!(self.array(), Some("string" | "bytestring"))
    }

    /// Equality restricted to the `__array__` and `__record__` keys, the only parameters that
    /// change how a layout is interpreted.
    pub fn array_record_eq(&self, other: &Self) -> bool {
        self.get(ARRAY_PARAMETER) == other.get(ARRAY_PARAMETER)
            && self.get(RECORD_PARAMETER) == other.get(RECORD_PARAMETER)
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Parameters {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}
