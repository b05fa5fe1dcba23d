//! Allowed HTTP methods for a route.

use http::Method;
use smallvec::SmallVec;

/// The set of HTTP methods a route accepts.
///
/// An empty set accepts every method.
///
/// # Example
///
/// ```rust
/// use strata_router::MethodSet;
/// use http::Method;
///
/// let methods = MethodSet::new().get().post();
/// assert!(methods.allows(&Method::GET));
/// assert!(!methods.allows(&Method::DELETE));
///
/// assert!(MethodSet::any().allows(&Method::DELETE));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MethodSet {
    methods: SmallVec<[Method; 4]>,
}

impl MethodSet {
    /// Creates an empty set, which allows every method.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Alias for [`MethodSet::new`], reads better at call sites.
    #[must_use]
    pub fn any() -> Self {
        Self::default()
    }

    /// Adds a method.
    #[must_use]
    pub fn method(mut self, method: Method) -> Self {
        if !self.methods.contains(&method) {
            self.methods.push(method);
        }
        self
    }

    /// Adds GET.
    #[must_use]
    pub fn get(self) -> Self {
        self.method(Method::GET)
    }

    /// Adds POST.
    #[must_use]
    pub fn post(self) -> Self {
        self.method(Method::POST)
    }

    /// Adds PUT.
    #[must_use]
    pub fn put(self) -> Self {
        self.method(Method::PUT)
    }

    /// Adds DELETE.
    #[must_use]
    pub fn delete(self) -> Self {
        self.method(Method::DELETE)
    }

    /// Adds PATCH.
    #[must_use]
    pub fn patch(self) -> Self {
        self.method(Method::PATCH)
    }

    /// Returns true if `method` is accepted.
    #[must_use]
    pub fn allows(&self, method: &Method) -> bool {
        self.methods.is_empty() || self.methods.contains(method)
    }

    /// Returns true if the set accepts every method.
    #[must_use]
    pub fn is_any(&self) -> bool {
        self.methods.is_empty()
    }

    /// Returns the explicitly listed methods.
    pub fn iter(&self) -> impl Iterator<Item = &Method> {
        self.methods.iter()
    }
}

impl FromIterator<Method> for MethodSet {
    fn from_iter<I: IntoIterator<Item = Method>>(iter: I) -> Self {
        iter.into_iter().fold(Self::new(), Self::method)
    }
}

impl<const N: usize> From<[Method; N]> for MethodSet {
    fn from(methods: [Method; N]) -> Self {
        methods.into_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_allows_all() {
        let methods = MethodSet::new();
        assert!(methods.is_any());
        assert!(methods.allows(&Method::GET));
        assert!(methods.allows(&Method::OPTIONS));
    }

    #[test]
    fn test_explicit_methods() {
        let methods = MethodSet::from([Method::GET, Method::HEAD]);
        assert!(methods.allows(&Method::GET));
        assert!(methods.allows(&Method::HEAD));
        assert!(!methods.allows(&Method::POST));
    }

    #[test]
    fn test_duplicates_collapse() {
        let methods = MethodSet::new().get().get().post();
        assert_eq!(methods.iter().count(), 2);
    }
}
