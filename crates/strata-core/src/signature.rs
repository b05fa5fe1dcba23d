//! Declared parameter lists.

use std::fmt;

/// A single declared parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
    name: String,
    optional: bool,
}

impl Parameter {
    /// Returns the parameter name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns true if the parameter has a default and may be omitted.
    #[must_use]
    pub const fn is_optional(&self) -> bool {
        self.optional
    }
}

/// The ordered parameter list of a [`Function`](crate::Function) or
/// middleware phase.
///
/// Required parameters must be satisfied by some provider when a chain is
/// compiled. Optional parameters are passed only when a provider exists.
///
/// # Example
///
/// ```rust
/// use strata_core::ParameterSpec;
///
/// let spec = ParameterSpec::new().required("next").required("request").optional("limit");
///
/// assert_eq!(spec.first(), Some("next"));
/// assert_eq!(spec.required_names().collect::<Vec<_>>(), ["next", "request"]);
/// assert_eq!(spec.optional_names().collect::<Vec<_>>(), ["limit"]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParameterSpec {
    params: Vec<Parameter>,
}

impl ParameterSpec {
    /// Creates an empty parameter list.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a list of required parameters.
    #[must_use]
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        names.into_iter().fold(Self::new(), Self::required)
    }

    /// Appends a required parameter. Repeated names are ignored.
    #[must_use]
    pub fn required(mut self, name: impl Into<String>) -> Self {
        self.push(name.into(), false);
        self
    }

    /// Appends an optional parameter. Repeated names are ignored.
    #[must_use]
    pub fn optional(mut self, name: impl Into<String>) -> Self {
        self.push(name.into(), true);
        self
    }

    fn push(&mut self, name: String, optional: bool) {
        if !self.contains(&name) {
            self.params.push(Parameter { name, optional });
        }
    }

    /// Iterates over all parameters in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &Parameter> {
        self.params.iter()
    }

    /// Iterates over all parameter names in declaration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.params.iter().map(Parameter::name)
    }

    /// Iterates over the required parameter names.
    pub fn required_names(&self) -> impl Iterator<Item = &str> {
        self.params
            .iter()
            .filter(|p| !p.optional)
            .map(Parameter::name)
    }

    /// Iterates over the optional parameter names.
    pub fn optional_names(&self) -> impl Iterator<Item = &str> {
        self.params
            .iter()
            .filter(|p| p.optional)
            .map(Parameter::name)
    }

    /// Returns the first parameter name.
    #[must_use]
    pub fn first(&self) -> Option<&str> {
        self.params.first().map(Parameter::name)
    }

    /// Returns true if `name` is declared.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.params.iter().any(|p| p.name == name)
    }

    /// Returns the number of parameters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.params.len()
    }

    /// Returns true if nothing is declared.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }
}

impl fmt::Display for ParameterSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("(")?;
        for (i, param) in self.params.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            f.write_str(&param.name)?;
            if param.optional {
                f.write_str("=?")?;
            }
        }
        f.write_str(")")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_and_kinds() {
        let spec = ParameterSpec::new()
            .required("a")
            .optional("b")
            .required("c");
        assert_eq!(spec.names().collect::<Vec<_>>(), ["a", "b", "c"]);
        assert_eq!(spec.required_names().collect::<Vec<_>>(), ["a", "c"]);
        assert_eq!(spec.optional_names().collect::<Vec<_>>(), ["b"]);
        assert_eq!(spec.len(), 3);
    }

    #[test]
    fn test_duplicates_ignored() {
        let spec = ParameterSpec::new().required("a").optional("a");
        assert_eq!(spec.len(), 1);
        assert!(!spec.iter().next().unwrap().is_optional());
    }

    #[test]
    fn test_from_names() {
        let spec = ParameterSpec::from_names(["request", "user"]);
        assert_eq!(spec.first(), Some("request"));
        assert!(spec.optional_names().next().is_none());
    }

    #[test]
    fn test_display() {
        let spec = ParameterSpec::new().required("next").optional("limit");
        assert_eq!(spec.to_string(), "(next, limit=?)");
        assert_eq!(ParameterSpec::new().to_string(), "()");
    }
}
