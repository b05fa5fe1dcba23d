//! Named callables with declared parameters.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use crate::error::Result;
use crate::inject::{builtins, Args, Injectable};
use crate::signature::ParameterSpec;

type Body = dyn Fn(&Args) -> Result<Injectable> + Send + Sync;

/// An endpoint or render callable.
///
/// A function declares the names it wants injected; at call time it receives
/// exactly those that are bound in the chain environment.
///
/// # Example
///
/// ```rust
/// use strata_core::{Function, Injectables, ParameterSpec};
///
/// let hello = Function::new("hello", ParameterSpec::from_names(["name"]), |args| {
///     let name: &String = args.require("name")?;
///     Ok(format!("Hello, {name}!"))
/// });
///
/// let mut env = Injectables::new();
/// env.insert("name", "world".to_string());
///
/// let out = hello.call(&env.select(hello.params().names())).unwrap();
/// assert_eq!(out.downcast_ref::<String>().unwrap(), "Hello, world!");
/// ```
#[derive(Clone)]
pub struct Function {
    name: Arc<str>,
    params: ParameterSpec,
    body: Arc<Body>,
}

impl Function {
    /// Creates a function whose result is wrapped as an [`Injectable`].
    pub fn new<F, T>(name: impl Into<Arc<str>>, params: ParameterSpec, body: F) -> Self
    where
        F: Fn(&Args) -> Result<T> + Send + Sync + 'static,
        T: Any + Send + Sync,
    {
        Self::new_shared(name, params, move |args| {
            body(args).map(|value| Arc::new(value) as Injectable)
        })
    }

    /// Creates a function that returns an already shared value.
    pub fn new_shared<F>(name: impl Into<Arc<str>>, params: ParameterSpec, body: F) -> Self
    where
        F: Fn(&Args) -> Result<Injectable> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            params,
            body: Arc::new(body),
        }
    }

    /// The render used when a route names none: passes `context` through.
    #[must_use]
    pub fn identity_render() -> Self {
        Self::new_shared(
            "render_basic",
            ParameterSpec::from_names([builtins::CONTEXT]),
            |args| {
                args.shared(builtins::CONTEXT).ok_or_else(|| {
                    crate::Error::invalid_endpoint("render_basic", "no context to render")
                })
            },
        )
    }

    /// Returns the function's name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the declared parameters.
    #[must_use]
    pub fn params(&self) -> &ParameterSpec {
        &self.params
    }

    /// Calls the function.
    ///
    /// # Errors
    ///
    /// Propagates whatever the function body returns.
    pub fn call(&self, args: &Args) -> Result<Injectable> {
        (self.body)(args)
    }
}

impl fmt::Debug for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Function")
            .field("name", &self.name)
            .field("params", &self.params.to_string())
            .finish_non_exhaustive()
    }
}
