//! Named parameters bound into stored queries.

use serde_json::Value;

/// An ordered collection of name/value pairs.
///
/// Parameters keep insertion order; when a name is set more than once the
/// last write wins on lookup. The engine binds `styled_id` here for batch
/// and nested calls, everything else comes from the caller.
///
/// # Example
///
/// ```rust
/// use serde_json::json;
/// use styledout_query::Params;
///
/// let params = Params::new()
///     .with("category", json!("shoes"))
///     .with("styled_id", json!(5));
/// assert_eq!(params.get("styled_id"), Some(&json!(5)));
/// assert_eq!(params.get("missing"), None);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Params(Vec<(String, Value)>);

impl Params {
    /// Creates an empty parameter list.
    pub fn new() -> Self {
        Params::default()
    }

    /// Adds a parameter, builder style.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set(name, value);
        self
    }

    /// Adds a parameter.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.0.push((name.into(), value.into()));
    }

    /// Looks a parameter up by name. The most recent write wins.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0
            .iter()
            .rev()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v)
    }

    /// Returns `true` if no parameters are bound.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of bound pairs, duplicates included.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Iterates over the pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.0.iter().map(|(n, v)| (n.as_str(), v))
    }
}
