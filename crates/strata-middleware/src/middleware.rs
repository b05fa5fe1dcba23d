//! Core middleware trait and types.
//!
//! A [`Middleware`] contributes up to three phase functions to a compiled
//! chain. Each phase receives a [`Next`] continuation plus the arguments it
//! declares, and decides whether and how to continue.
//!
//! # Example
//!
//! ```rust
//! use strata_core::ParameterSpec;
//! use strata_middleware::{FnMiddleware, Middleware};
//!
//! let auth = FnMiddleware::new("auth")
//!     .provides(["user"])
//!     .request(ParameterSpec::from_names(["next", "request"]), |next, _args| {
//!         let mut provided = strata_core::Injectables::new();
//!         provided.insert("user", "ferris".to_string());
//!         next.run(provided)
//!     });
//!
//! // The builder methods shadow the trait accessors, so name the trait.
//! assert_eq!(Middleware::name(&auth), "auth");
//! assert_eq!(Middleware::provides(&auth), ["user".to_string()]);
//! assert!(Middleware::request(&auth).is_some());
//! ```

use std::fmt;
use std::sync::Arc;

use strata_core::{builtins, Args, Error, Injectable, ParameterSpec, Phase, Result};

use crate::chain::Next;

type PhaseBody = dyn Fn(Next, &Args) -> Result<Injectable> + Send + Sync;

/// One phase function of a middleware.
///
/// The first declared parameter must be `next`; the continuation is passed
/// separately and never appears in [`Args`].
#[derive(Clone)]
pub struct PhaseHandler {
    params: ParameterSpec,
    body: Arc<PhaseBody>,
}

impl PhaseHandler {
    /// Creates a phase handler.
    pub fn new<F>(params: ParameterSpec, body: F) -> Self
    where
        F: Fn(Next, &Args) -> Result<Injectable> + Send + Sync + 'static,
    {
        Self {
            params,
            body: Arc::new(body),
        }
    }

    /// Returns the declared parameters, `next` included.
    #[must_use]
    pub fn params(&self) -> &ParameterSpec {
        &self.params
    }

    /// Invokes the phase.
    ///
    /// # Errors
    ///
    /// Propagates whatever the phase body returns.
    pub fn call(&self, next: Next, args: &Args) -> Result<Injectable> {
        (self.body)(next, args)
    }
}

impl fmt::Debug for PhaseHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PhaseHandler")
            .field("params", &self.params.to_string())
            .finish_non_exhaustive()
    }
}

/// The core middleware trait.
///
/// # Invariants
///
/// - Every present phase declares `next` as its first parameter
/// - Values passed to [`Next::run`] are filtered: the request phase may pass
///   its [`provides`](Self::provides), the endpoint phase its
///   [`endpoint_provides`](Self::endpoint_provides), the render phase only
///   `context`; anything else is dropped
pub trait Middleware: Send + Sync + 'static {
    /// Returns the middleware name, used for uniqueness and error messages.
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }

    /// Whether the middleware may appear only once in a merged list.
    fn unique(&self) -> bool {
        true
    }

    /// Whether a duplicate inclusion may be silently dropped.
    fn reorderable(&self) -> bool {
        true
    }

    /// Names the request phase injects into everything downstream.
    fn provides(&self) -> &[String] {
        &[]
    }

    /// Names the endpoint phase injects into later endpoint-phase functions.
    fn endpoint_provides(&self) -> &[String] {
        &[]
    }

    /// The request phase, wrapping the whole chain.
    fn request(&self) -> Option<PhaseHandler> {
        None
    }

    /// The endpoint phase, wrapping the endpoint.
    fn endpoint(&self) -> Option<PhaseHandler> {
        None
    }

    /// The render phase, wrapping the render step.
    fn render(&self) -> Option<PhaseHandler> {
        None
    }
}

/// A shared middleware handle.
pub type BoxedMiddleware = Arc<dyn Middleware>;

impl fmt::Debug for dyn Middleware {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Middleware")
            .field("name", &self.name())
            .field("provides", &self.provides())
            .finish_non_exhaustive()
    }
}

/// Returns the handler for `phase`, if the middleware has one.
pub(crate) fn phase_of(mw: &dyn Middleware, phase: Phase) -> Option<PhaseHandler> {
    match phase {
        Phase::Request => mw.request(),
        Phase::Endpoint => mw.endpoint(),
        Phase::Render => mw.render(),
    }
}

/// Checks that every phase of `mw` takes `next` first.
///
/// # Errors
///
/// Returns [`Error::InvalidMiddleware`] naming the offending phase.
pub fn check_middleware(mw: &dyn Middleware) -> Result<()> {
    for phase in Phase::ALL {
        if let Some(handler) = phase_of(mw, phase) {
            if handler.params().first() != Some(builtins::NEXT) {
                return Err(Error::invalid_middleware(
                    mw.name(),
                    format!("{phase} phase must take 'next' as its first parameter"),
                ));
            }
        }
    }
    Ok(())
}

/// A middleware assembled from closures.
#[derive(Debug, Clone)]
pub struct FnMiddleware {
    name: String,
    unique: bool,
    reorderable: bool,
    provides: Vec<String>,
    endpoint_provides: Vec<String>,
    request: Option<PhaseHandler>,
    endpoint: Option<PhaseHandler>,
    render: Option<PhaseHandler>,
}

impl FnMiddleware {
    /// Creates a middleware with no phases.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            unique: true,
            reorderable: true,
            provides: Vec::new(),
            endpoint_provides: Vec::new(),
            request: None,
            endpoint: None,
            render: None,
        }
    }

    /// Sets whether the middleware is unique.
    #[must_use]
    pub fn unique(mut self, unique: bool) -> Self {
        self.unique = unique;
        self
    }

    /// Sets whether a duplicate may be dropped during merge.
    #[must_use]
    pub fn reorderable(mut self, reorderable: bool) -> Self {
        self.reorderable = reorderable;
        self
    }

    /// Declares the names the request phase provides.
    #[must_use]
    pub fn provides<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.provides = names.into_iter().map(Into::into).collect();
        self
    }

    /// Declares the names the endpoint phase provides.
    #[must_use]
    pub fn endpoint_provides<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.endpoint_provides = names.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the request phase.
    #[must_use]
    pub fn request<F>(mut self, params: ParameterSpec, body: F) -> Self
    where
        F: Fn(Next, &Args) -> Result<Injectable> + Send + Sync + 'static,
    {
        self.request = Some(PhaseHandler::new(params, body));
        self
    }

    /// Sets the endpoint phase.
    #[must_use]
    pub fn endpoint<F>(mut self, params: ParameterSpec, body: F) -> Self
    where
        F: Fn(Next, &Args) -> Result<Injectable> + Send + Sync + 'static,
    {
        self.endpoint = Some(PhaseHandler::new(params, body));
        self
    }

    /// Sets the render phase.
    #[must_use]
    pub fn render<F>(mut self, params: ParameterSpec, body: F) -> Self
    where
        F: Fn(Next, &Args) -> Result<Injectable> + Send + Sync + 'static,
    {
        self.render = Some(PhaseHandler::new(params, body));
        self
    }

    /// Wraps the middleware for registration.
    #[must_use]
    pub fn boxed(self) -> BoxedMiddleware {
        Arc::new(self)
    }
}

impl Middleware for FnMiddleware {
    fn name(&self) -> &str {
        &self.name
    }

    fn unique(&self) -> bool {
        self.unique
    }

    fn reorderable(&self) -> bool {
        self.reorderable
    }

    fn provides(&self) -> &[String] {
        &self.provides
    }

    fn endpoint_provides(&self) -> &[String] {
        &self.endpoint_provides
    }

    fn request(&self) -> Option<PhaseHandler> {
        self.request.clone()
    }

    fn endpoint(&self) -> Option<PhaseHandler> {
        self.endpoint.clone()
    }

    fn render(&self) -> Option<PhaseHandler> {
        self.render.clone()
    }
}
