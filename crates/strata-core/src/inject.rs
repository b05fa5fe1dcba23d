//! Named value injection.
//!
//! Every value that flows through a chain is an [`Injectable`]: a shared,
//! type-erased value addressed by *name*. An [`Injectables`] map is the
//! environment a chain runs in; [`Args`] is the slice of that environment a
//! single function receives.
//!
//! # Example
//!
//! ```rust
//! use strata_core::Injectables;
//!
//! let mut env = Injectables::new();
//! env.insert("greeting", "hello".to_string());
//! env.insert("count", 3_u32);
//!
//! let args = env.select(["greeting"]);
//! assert_eq!(args.get::<String>("greeting").map(String::as_str), Some("hello"));
//! assert!(args.get::<u32>("count").is_none());
//! ```

use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use strata_router::{MatchResult, PathValue};

use crate::error::{Error, Result};

/// A shared, type-erased value.
pub type Injectable = Arc<dyn Any + Send + Sync>;

/// Wraps a value as an [`Injectable`].
pub fn injectable<T: Any + Send + Sync>(value: T) -> Injectable {
    Arc::new(value)
}

/// Reserved argument names the framework provides itself.
pub mod builtins {
    /// The incoming request.
    pub const REQUEST: &str = "request";
    /// The continuation passed to middleware phases.
    pub const NEXT: &str = "next";
    /// The endpoint's return value, passed to the render phase.
    pub const CONTEXT: &str = "context";
    /// The application handling the request.
    pub const APPLICATION: &str = "_application";
    /// The bound route that matched.
    pub const ROUTE: &str = "_route";
    /// The route's endpoint function.
    pub const ENDPOINT: &str = "_endpoint";

    /// Every reserved name.
    pub const ALL: [&str; 6] = [REQUEST, NEXT, CONTEXT, APPLICATION, ROUTE, ENDPOINT];

    /// Returns true if `name` is reserved.
    #[must_use]
    pub fn is_reserved(name: &str) -> bool {
        ALL.contains(&name)
    }
}

/// A named environment of injectable values.
#[derive(Clone, Default)]
pub struct Injectables {
    values: HashMap<String, Injectable>,
}

impl Injectables {
    /// Creates an empty environment.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a plain value under `name`, wrapping it.
    ///
    /// To insert a value that is already an [`Injectable`], use
    /// [`insert_shared`](Self::insert_shared); passing an `Arc<dyn Any>` here
    /// would wrap it twice.
    pub fn insert<T: Any + Send + Sync>(&mut self, name: impl Into<String>, value: T) {
        self.values.insert(name.into(), Arc::new(value));
    }

    /// Inserts an already shared value under `name`.
    pub fn insert_shared(&mut self, name: impl Into<String>, value: Injectable) {
        self.values.insert(name.into(), value);
    }

    /// Inserts every URL variable binding as a [`PathValue`].
    pub fn insert_path_values(&mut self, values: &MatchResult) {
        for (name, value) in values.iter() {
            self.insert(name, value.clone());
        }
    }

    /// Copies every entry of `other` over this environment.
    pub fn extend(&mut self, other: &Injectables) {
        for (name, value) in &other.values {
            self.values.insert(name.clone(), Arc::clone(value));
        }
    }

    /// Returns the value under `name` downcast to `T`.
    #[must_use]
    pub fn get<T: Any>(&self, name: &str) -> Option<&T> {
        self.values.get(name)?.downcast_ref()
    }

    /// Returns the shared value under `name`.
    #[must_use]
    pub fn get_shared(&self, name: &str) -> Option<&Injectable> {
        self.values.get(name)
    }

    /// Returns true if `name` is bound.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Iterates over the bound names, in no particular order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    /// Returns the number of bound names.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true if nothing is bound.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Builds the argument view for the given names. Unbound names are skipped.
    pub fn select<'a>(&self, names: impl IntoIterator<Item = &'a str>) -> Args {
        let mut selected = HashMap::new();
        for name in names {
            if let Some(value) = self.values.get(name) {
                selected.insert(name.to_string(), Arc::clone(value));
            }
        }
        Args { values: selected }
    }
}

impl fmt::Debug for Injectables {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&str> = self.names().collect();
        names.sort_unstable();
        f.debug_struct("Injectables").field("names", &names).finish()
    }
}

/// The arguments a single function call receives.
///
/// Only names the function declares are present.
#[derive(Clone, Default)]
pub struct Args {
    values: HashMap<String, Injectable>,
}

impl Args {
    /// Creates an empty argument set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the argument `name` downcast to `T`.
    #[must_use]
    pub fn get<T: Any>(&self, name: &str) -> Option<&T> {
        self.values.get(name)?.downcast_ref()
    }

    /// Returns the argument `name` downcast to `T`, or an error naming it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidEndpoint`] if the argument is absent or holds a
    /// different type.
    pub fn require<T: Any>(&self, name: &str) -> Result<&T> {
        let value = self.values.get(name).ok_or_else(|| {
            Error::invalid_endpoint(name, format!("argument '{name}' was not provided"))
        })?;
        value.downcast_ref().ok_or_else(|| {
            Error::invalid_endpoint(
                name,
                format!(
                    "argument '{name}' is not a {}",
                    std::any::type_name::<T>()
                ),
            )
        })
    }

    /// Returns a URL variable binding.
    #[must_use]
    pub fn path(&self, name: &str) -> Option<&PathValue> {
        self.get(name)
    }

    /// Returns the shared handle of argument `name`.
    #[must_use]
    pub fn shared(&self, name: &str) -> Option<Injectable> {
        self.values.get(name).cloned()
    }

    /// Returns true if `name` was passed.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Iterates over the passed names.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    /// Returns the number of arguments.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true if no arguments were passed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl fmt::Debug for Args {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&str> = self.names().collect();
        names.sort_unstable();
        f.debug_struct("Args").field("names", &names).finish()
    }
}
