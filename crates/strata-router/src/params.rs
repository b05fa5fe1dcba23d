//! Typed path variable bindings.
//!
//! A successful match produces a [`MatchResult`]: an insertion-ordered map from
//! variable name to [`PathValue`]. Scalar variables bind a single value, while
//! `+`/`*` variables bind a [`PathValue::List`] in path order.

use indexmap::IndexMap;
use serde::Serialize;

/// A converted path segment (or sequence of segments).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum PathValue {
    /// Text captured by the `str`, `unicode`, `path` or raw converters.
    Text(String),
    /// Integer captured by the `int` converter.
    Int(i64),
    /// Finite float captured by the `float` converter.
    Float(f64),
    /// Values bound by a one-or-more / zero-or-more variable.
    List(Vec<PathValue>),
}

impl PathValue {
    /// Returns the text if this is a [`PathValue::Text`].
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Returns the integer if this is a [`PathValue::Int`].
    #[must_use]
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(value) => Some(*value),
            _ => None,
        }
    }

    /// Returns the float if this is a [`PathValue::Float`] or an integer.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Self::Float(value) => Some(*value),
            Self::Int(value) => Some(*value as f64),
            _ => None,
        }
    }

    /// Returns the items if this is a [`PathValue::List`].
    #[must_use]
    pub fn as_list(&self) -> Option<&[PathValue]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }
}

impl std::fmt::Display for PathValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Text(text) => f.write_str(text),
            Self::Int(value) => write!(f, "{value}"),
            Self::Float(value) => write!(f, "{value}"),
            Self::List(items) => {
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str("/")?;
                    }
                    write!(f, "{item}")?;
                }
                Ok(())
            }
        }
    }
}

impl From<&str> for PathValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for PathValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<i64> for PathValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<i32> for PathValue {
    fn from(value: i32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<f64> for PathValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl<T: Into<PathValue>> From<Vec<T>> for PathValue {
    fn from(values: Vec<T>) -> Self {
        Self::List(values.into_iter().map(Into::into).collect())
    }
}

/// Variable bindings extracted from a matched path.
///
/// # Example
///
/// ```rust
/// use strata_router::{CompiledPattern, PathValue, SlashMode};
///
/// let pattern = CompiledPattern::compile("/users/<id:int>", SlashMode::Strict).unwrap();
/// let result = pattern.match_path("/users/42").unwrap();
///
/// assert_eq!(result.get("id"), Some(&PathValue::Int(42)));
/// assert_eq!(result.get("unknown"), None);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct MatchResult {
    values: IndexMap<String, PathValue>,
}

impl MatchResult {
    /// Creates an empty result.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn insert(&mut self, name: impl Into<String>, value: PathValue) {
        self.values.insert(name.into(), value);
    }

    /// Returns the binding for `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&PathValue> {
        self.values.get(name)
    }

    /// Returns true if `name` is bound.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Returns true if nothing is bound.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Returns the number of bindings.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Iterates over bindings in pattern order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &PathValue)> {
        self.values.iter().map(|(n, v)| (n.as_str(), v))
    }
}

impl IntoIterator for MatchResult {
    type Item = (String, PathValue);
    type IntoIter = indexmap::map::IntoIter<String, PathValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.into_iter()
    }
}

impl<K: Into<String>> FromIterator<(K, PathValue)> for MatchResult {
    fn from_iter<I: IntoIterator<Item = (K, PathValue)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_result_new() {
        let result = MatchResult::new();
        assert!(result.is_empty());
        assert_eq!(result.len(), 0);
    }

    #[test]
    fn test_result_insert_and_get() {
        let mut result = MatchResult::new();
        result.insert("id", PathValue::Int(7));
        result.insert("name", PathValue::from("alice"));

        assert_eq!(result.get("id").and_then(PathValue::as_int), Some(7));
        assert_eq!(result.get("name").and_then(PathValue::as_str), Some("alice"));
        assert!(result.contains("id"));
        assert!(!result.contains("unknown"));
    }

    #[test]
    fn test_result_preserves_order() {
        let result: MatchResult = vec![
            ("b", PathValue::from(2)),
            ("a", PathValue::from(1)),
        ]
        .into_iter()
        .collect();

        let names: Vec<_> = result.iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["b", "a"]);
    }

    #[test]
    fn test_value_from_vec() {
        let value = PathValue::from(vec![1, 2, 3]);
        assert_eq!(
            value.as_list(),
            Some(&[PathValue::Int(1), PathValue::Int(2), PathValue::Int(3)][..])
        );
    }

    #[test]
    fn test_value_display() {
        assert_eq!(PathValue::from(vec!["a", "b"]).to_string(), "a/b");
        assert_eq!(PathValue::Int(3).to_string(), "3");
    }

    #[test]
    fn test_result_serializes_as_map() {
        let result: MatchResult = vec![
            ("t", PathValue::from(1)),
            ("das", PathValue::from(vec![1, 2])),
        ]
        .into_iter()
        .collect();

        let json = serde_json::to_string(&result).unwrap();
        assert_eq!(json, r#"{"t":1,"das":[1,2]}"#);
    }
}
