//! The application: an ordered route table plus shared resources,
//! middleware and render factory.
//!
//! Routes are bound when they are added. Dispatch walks the table in
//! registration order and runs the first route whose methods and pattern
//! match.

use std::fmt;
use std::sync::Arc;

use http::Method;
use strata_config::StrataConfig;
use strata_core::{builtins, Error, Injectable, Injectables, Request, Result};
use strata_middleware::BoxedMiddleware;
use strata_router::SlashMode;
use tracing::{debug, info, trace};

use crate::render::{BoxedRenderFactory, RenderFactory};
use crate::route::{BoundRoute, RouteEntry};

/// Result of a successful dispatch.
#[derive(Clone)]
pub enum Outcome {
    /// The value returned by the route's chain.
    Response(Injectable),
    /// The request path was not canonical and the route redirects.
    Redirect {
        /// Canonical path.
        location: String,
    },
}

impl Outcome {
    /// Returns the response value, if this is a response.
    #[must_use]
    pub fn response(&self) -> Option<&Injectable> {
        match self {
            Self::Response(value) => Some(value),
            Self::Redirect { .. } => None,
        }
    }

    /// Downcasts the response value.
    #[must_use]
    pub fn downcast_ref<T: std::any::Any>(&self) -> Option<&T> {
        self.response().and_then(|value| value.downcast_ref::<T>())
    }

    /// Returns the redirect location, if this is a redirect.
    #[must_use]
    pub fn redirect_location(&self) -> Option<&str> {
        match self {
            Self::Redirect { location } => Some(location),
            Self::Response(_) => None,
        }
    }
}

impl fmt::Debug for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Response(_) => f.write_str("Response(..)"),
            Self::Redirect { location } => {
                f.debug_struct("Redirect").field("location", location).finish()
            }
        }
    }
}

#[derive(Clone)]
struct AppState {
    routes: Vec<Arc<BoundRoute>>,
    resources: Injectables,
    middlewares: Vec<BoxedMiddleware>,
    render_factory: Option<BoxedRenderFactory>,
    default_slash_mode: SlashMode,
}

/// A dispatching application.
///
/// Cheap to clone; clones share the route table until one of them adds a
/// route.
///
/// # Example
///
/// ```rust
/// use http::Method;
/// use strata::prelude::*;
///
/// let hello = Function::new("hello", ParameterSpec::from_names(["name"]), |args| {
///     Ok(format!("Hello, {}!", args.require::<PathValue>("name")?))
/// });
///
/// let app = Application::new([("/hello/<name>", hello)]).unwrap();
/// let out = app.dispatch(&Method::GET, "/hello/world", None).unwrap();
/// assert_eq!(out.downcast_ref::<String>().unwrap(), "Hello, world!");
/// ```
#[derive(Clone)]
pub struct Application {
    state: Arc<AppState>,
}

impl Application {
    /// Creates an application with no resources or middleware.
    ///
    /// # Errors
    ///
    /// Returns the first route's compile or bind error.
    pub fn new<I, R>(routes: I) -> Result<Self>
    where
        I: IntoIterator<Item = R>,
        R: Into<RouteEntry>,
    {
        Self::builder().routes(routes).build()
    }

    /// Starts building an application.
    #[must_use]
    pub fn builder() -> ApplicationBuilder {
        ApplicationBuilder::default()
    }

    /// Binds and appends a route.
    ///
    /// On error the route table is unchanged.
    ///
    /// # Errors
    ///
    /// Returns the route's compile or bind error.
    pub fn add(&mut self, entry: impl Into<RouteEntry>) -> Result<&BoundRoute> {
        let entry: RouteEntry = entry.into();
        let route = entry.into_route(self.state.default_slash_mode)?;
        let bound = route.bind(
            &self.state.resources,
            &self.state.middlewares,
            self.state.render_factory.as_deref(),
        )?;
        info!(
            pattern = %bound.pattern(),
            slash_mode = %bound.pattern().slash_mode(),
            endpoint = %bound.chain().endpoint().name(),
            "route added"
        );

        let state = Arc::make_mut(&mut self.state);
        state.routes.push(Arc::new(bound));
        let index = state.routes.len() - 1;
        Ok(self.state.routes[index].as_ref())
    }

    /// Returns the bound routes in registration order.
    #[must_use]
    pub fn routes(&self) -> &[Arc<BoundRoute>] {
        &self.state.routes
    }

    /// Returns the application resources.
    #[must_use]
    pub fn resources(&self) -> &Injectables {
        &self.state.resources
    }

    /// Returns the application middleware.
    #[must_use]
    pub fn middlewares(&self) -> &[BoxedMiddleware] {
        &self.state.middlewares
    }

    /// Returns the slash mode applied to routes registered from specs.
    #[must_use]
    pub fn default_slash_mode(&self) -> SlashMode {
        self.state.default_slash_mode
    }

    /// Dispatches `method` and `path` to the first matching route.
    ///
    /// URL variables, `_application` and then `overrides` are bound on top of
    /// the route's resources and builtins. No `request` is bound; use
    /// [`Application::handle`] for that.
    ///
    /// # Errors
    ///
    /// - [`Error::NoMatch`] if no route matches
    /// - any error raised while running the matched route
    pub fn dispatch(
        &self,
        method: &Method,
        path: &str,
        overrides: Option<&Injectables>,
    ) -> Result<Outcome> {
        self.dispatch_with(method, path, Injectables::new(), overrides)
    }

    /// Dispatches an HTTP request, binding it as `request`.
    ///
    /// # Errors
    ///
    /// Same as [`Application::dispatch`].
    pub fn handle(&self, request: Request, overrides: Option<&Injectables>) -> Result<Outcome> {
        let method = request.method().clone();
        let path = request.uri().path().to_string();
        let mut extra = Injectables::new();
        extra.insert(builtins::REQUEST, request);
        self.dispatch_with(&method, &path, extra, overrides)
    }

    fn dispatch_with(
        &self,
        method: &Method,
        path: &str,
        mut env: Injectables,
        overrides: Option<&Injectables>,
    ) -> Result<Outcome> {
        for route in &self.state.routes {
            trace!(pattern = %route.pattern(), method = %method, path = %path, "trying route");
            if !route.methods().allows(method) {
                continue;
            }
            let Some(matched) = route.pattern().match_request(path) else {
                continue;
            };

            if let Some(location) = matched.redirect {
                if route.pattern().slash_mode() == SlashMode::Redirect {
                    debug!(
                        pattern = %route.pattern(),
                        path = %path,
                        location = %location,
                        "redirecting to canonical path"
                    );
                    return Ok(Outcome::Redirect { location });
                }
            }

            debug!(pattern = %route.pattern(), method = %method, path = %path, "route matched");
            env.insert(builtins::APPLICATION, self.clone());
            env.insert_path_values(&matched.values);
            if let Some(overrides) = overrides {
                env.extend(overrides);
            }
            return route.execute(&env).map(Outcome::Response);
        }

        debug!(method = %method, path = %path, "no route matched");
        Err(Error::no_match(method, path))
    }
}

impl fmt::Debug for Application {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let patterns: Vec<&str> = self
            .state
            .routes
            .iter()
            .map(|r| r.pattern().as_str())
            .collect();
        f.debug_struct("Application")
            .field("routes", &patterns)
            .field("resources", &self.state.resources)
            .field("middlewares", &self.state.middlewares.len())
            .field("default_slash_mode", &self.state.default_slash_mode)
            .finish()
    }
}

/// Builder for [`Application`].
#[derive(Default)]
pub struct ApplicationBuilder {
    routes: Vec<RouteEntry>,
    resources: Injectables,
    middlewares: Vec<BoxedMiddleware>,
    render_factory: Option<BoxedRenderFactory>,
    default_slash_mode: SlashMode,
}

impl ApplicationBuilder {
    /// Adds an application resource.
    pub fn resource<T: std::any::Any + Send + Sync>(
        mut self,
        name: impl Into<String>,
        value: T,
    ) -> Self {
        self.resources.insert(name, value);
        self
    }

    /// Adds every resource in `resources`.
    pub fn resources(mut self, resources: &Injectables) -> Self {
        self.resources.extend(resources);
        self
    }

    /// Appends an application middleware.
    pub fn middleware(mut self, middleware: BoxedMiddleware) -> Self {
        self.middlewares.push(middleware);
        self
    }

    /// Sets the render factory used for template render arguments.
    pub fn render_factory(mut self, factory: impl RenderFactory) -> Self {
        self.render_factory = Some(Arc::new(factory));
        self
    }

    /// Applies configuration: the routing section's default slash mode.
    pub fn config(mut self, config: &StrataConfig) -> Self {
        self.default_slash_mode = config.routing.default_slash_mode;
        self
    }

    /// Sets the slash mode for routes registered from specs.
    pub fn default_slash_mode(mut self, mode: SlashMode) -> Self {
        self.default_slash_mode = mode;
        self
    }

    /// Appends a route.
    pub fn route(mut self, entry: impl Into<RouteEntry>) -> Self {
        self.routes.push(entry.into());
        self
    }

    /// Appends routes in order.
    pub fn routes<I, R>(mut self, routes: I) -> Self
    where
        I: IntoIterator<Item = R>,
        R: Into<RouteEntry>,
    {
        self.routes.extend(routes.into_iter().map(Into::into));
        self
    }

    /// Binds every route and builds the application.
    ///
    /// # Errors
    ///
    /// Returns the first route's compile or bind error.
    pub fn build(self) -> Result<Application> {
        let mut app = Application {
            state: Arc::new(AppState {
                routes: Vec::with_capacity(self.routes.len()),
                resources: self.resources,
                middlewares: self.middlewares,
                render_factory: self.render_factory,
                default_slash_mode: self.default_slash_mode,
            }),
        };
        for entry in self.routes {
            app.add(entry)?;
        }
        Ok(app)
    }
}

impl fmt::Debug for ApplicationBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApplicationBuilder")
            .field("routes", &self.routes.len())
            .field("resources", &self.resources)
            .field("middlewares", &self.middlewares.len())
            .field("default_slash_mode", &self.default_slash_mode)
            .finish_non_exhaustive()
    }
}
