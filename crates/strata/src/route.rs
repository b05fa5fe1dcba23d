//! Routes and bound routes.
//!
//! A [`Route`] pairs a compiled URL pattern with an endpoint, an optional
//! render argument, route-local middleware and resources. Binding it to an
//! application's resources and middleware checks every argument once and
//! yields a [`BoundRoute`] whose chain runs without further analysis.

use std::fmt;
use std::sync::Arc;

use http::Method;
use strata_core::{builtins, Error, Function, Injectable, Injectables, Result};
use strata_middleware::{
    check_providers, compile_chain, merge_middlewares, BoxedMiddleware, CompiledChain, Middleware,
};
use strata_router::{CompiledPattern, MethodSet, SlashMode};
use tracing::{debug, warn};

use crate::render::{RenderArg, RenderFactory};

/// Names bound before a chain starts, besides URL variables and resources.
const EXTERNAL_BUILTINS: [&str; 4] = [
    builtins::REQUEST,
    builtins::APPLICATION,
    builtins::ROUTE,
    builtins::ENDPOINT,
];

/// A route: URL pattern, methods, endpoint and render.
///
/// # Example
///
/// ```rust
/// use strata::core::{Function, Injectables, ParameterSpec};
/// use strata::route::Route;
///
/// let echo = Function::new("echo", ParameterSpec::from_names(["word"]), |args| {
///     Ok(args.require::<String>("word")?.clone())
/// });
/// let route = Route::new("/echo", echo).unwrap();
///
/// let mut env = Injectables::new();
/// env.insert("word", "hi".to_string());
/// let out = route.execute(&env).unwrap();
/// assert_eq!(out.downcast_ref::<String>().unwrap(), "hi");
/// ```
#[derive(Clone)]
pub struct Route {
    pattern: CompiledPattern,
    methods: MethodSet,
    endpoint: Option<Function>,
    render: Option<RenderArg>,
    middlewares: Vec<BoxedMiddleware>,
    resources: Injectables,
}

impl Route {
    /// Creates a route for any method in the default slash mode.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidUrlPattern`] if the pattern does not compile.
    pub fn new(pattern: &str, endpoint: Function) -> Result<Self> {
        Self::builder(pattern).endpoint(endpoint).build()
    }

    /// Starts building a route.
    #[must_use]
    pub fn builder(pattern: impl Into<String>) -> RouteBuilder {
        RouteBuilder::new(pattern)
    }

    /// Creates a route from a registration spec, in the default slash mode
    /// unless `spec` sets one.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidUrlPattern`] if the pattern does not compile.
    pub fn from_spec(spec: RouteSpec) -> Result<Self> {
        Self::from_spec_with_default(spec, SlashMode::default())
    }

    pub(crate) fn from_spec_with_default(spec: RouteSpec, default_mode: SlashMode) -> Result<Self> {
        let mut builder = Self::builder(spec.pattern)
            .methods(spec.methods)
            .slash_mode(spec.slash_mode.unwrap_or(default_mode))
            .endpoint(spec.endpoint);
        if let Some(render) = spec.render {
            builder = builder.render(render);
        }
        builder.build()
    }

    /// Copies a route's pattern, methods, endpoint, render and local
    /// middleware. Resources are not carried over.
    #[must_use]
    pub fn from_route(other: &Route) -> Self {
        Self {
            resources: Injectables::new(),
            ..other.clone()
        }
    }

    /// Returns the compiled pattern.
    #[must_use]
    pub fn pattern(&self) -> &CompiledPattern {
        &self.pattern
    }

    /// Returns the allowed methods.
    #[must_use]
    pub fn methods(&self) -> &MethodSet {
        &self.methods
    }

    /// Returns the endpoint, if any.
    #[must_use]
    pub fn endpoint(&self) -> Option<&Function> {
        self.endpoint.as_ref()
    }

    /// Returns the render argument, if any.
    #[must_use]
    pub fn render(&self) -> Option<&RenderArg> {
        self.render.as_ref()
    }

    /// Returns the route-local middleware.
    #[must_use]
    pub fn middlewares(&self) -> &[BoxedMiddleware] {
        &self.middlewares
    }

    /// Returns the route-local resources.
    #[must_use]
    pub fn resources(&self) -> &Injectables {
        &self.resources
    }

    /// Runs the route outside an application.
    ///
    /// `injectables` together with the route's resources form the whole
    /// environment; only route-local middleware participate. The chain is
    /// checked and compiled on every call; [`Route::bind`] does that once.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidEndpoint`] if the route has no endpoint or a
    /// required endpoint parameter has no provider,
    /// [`Error::ProviderConflict`] if two route-local middleware provide the
    /// same name, or whatever the chain returns.
    pub fn execute(&self, injectables: &Injectables) -> Result<Injectable> {
        let endpoint = self.require_endpoint()?;
        check_providers(&self.middlewares, &[])?;

        let mut env = self.resources.clone();
        env.extend(injectables);

        let missing: Vec<&str> = endpoint
            .params()
            .required_names()
            .filter(|name| !env.contains(name) && !self.locally_provided(name))
            .collect();
        if !missing.is_empty() {
            return Err(Error::invalid_endpoint(
                endpoint.name(),
                format!("no value for required argument(s): {}", missing.join(", ")),
            ));
        }

        let render = match &self.render {
            Some(RenderArg::Function(f)) => f.clone(),
            _ => Function::identity_render(),
        };
        let names: Vec<String> = env.names().map(str::to_string).collect();
        let chain = compile_chain(&self.middlewares, endpoint, &render, names)?;
        chain.execute(env)
    }

    /// Binds the route to an application's resources, middleware and render
    /// factory.
    ///
    /// Application resources override route-local ones of the same name.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidEndpoint`] if the route has no endpoint
    /// - [`Error::DuplicateMiddleware`] / [`Error::InvalidMiddleware`] for bad middleware
    /// - [`Error::ProviderConflict`] if a name has two providers
    /// - [`Error::UnresolvedArgument`] if a required argument has no provider
    /// - any error from the render factory
    pub fn bind(
        &self,
        resources: &Injectables,
        middlewares: &[BoxedMiddleware],
        render_factory: Option<&dyn RenderFactory>,
    ) -> Result<BoundRoute> {
        let endpoint = self.require_endpoint()?;

        let mut merged_resources = self.resources.clone();
        merged_resources.extend(resources);
        let merged = merge_middlewares(&self.middlewares, middlewares)?;

        let url: Vec<String> = self.pattern.variable_names().map(str::to_string).collect();
        let builtin: Vec<String> = builtins::ALL.iter().map(|s| (*s).to_string()).collect();
        let mut resource_names: Vec<String> =
            merged_resources.names().map(str::to_string).collect();
        resource_names.sort();

        check_providers(
            &merged,
            &[
                ("url", url.clone()),
                ("builtins", builtin),
                ("resources", resource_names.clone()),
            ],
        )?;

        let render = match &self.render {
            Some(RenderArg::Function(f)) => f.clone(),
            Some(RenderArg::Template(template)) => match render_factory {
                Some(factory) => factory.render_for(template)?,
                None => {
                    warn!(
                        pattern = %self.pattern,
                        template = %template,
                        "no render factory for template; passing context through"
                    );
                    Function::identity_render()
                }
            },
            None => Function::identity_render(),
        };

        let external = url
            .iter()
            .map(String::as_str)
            .chain(EXTERNAL_BUILTINS)
            .chain(resource_names.iter().map(String::as_str));
        let chain = compile_chain(&merged, endpoint, &render, external)?;

        debug!(
            pattern = %self.pattern,
            endpoint = %endpoint.name(),
            middleware = merged.len(),
            resources = resource_names.len(),
            "bound route"
        );

        Ok(BoundRoute {
            route: Arc::new(Self::from_route(self)),
            middlewares: merged,
            resources: merged_resources,
            chain,
        })
    }

    fn require_endpoint(&self) -> Result<&Function> {
        self.endpoint.as_ref().ok_or_else(|| {
            Error::invalid_endpoint(
                self.pattern.as_str(),
                "route has no endpoint to execute",
            )
        })
    }

    fn locally_provided(&self, name: &str) -> bool {
        self.middlewares.iter().any(|mw| {
            Middleware::provides(&**mw)
                .iter()
                .chain(Middleware::endpoint_provides(&**mw))
                .any(|p| p == name)
        })
    }
}

impl fmt::Debug for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Route")
            .field("pattern", &self.pattern.as_str())
            .field("slash_mode", &self.pattern.slash_mode())
            .field("methods", &self.methods)
            .field("endpoint", &self.endpoint.as_ref().map(Function::name))
            .field("render", &self.render)
            .field("middlewares", &self.middlewares.len())
            .field("resources", &self.resources)
            .finish()
    }
}

/// Builder for [`Route`].
pub struct RouteBuilder {
    pattern: String,
    slash_mode: SlashMode,
    methods: MethodSet,
    endpoint: Option<Function>,
    render: Option<RenderArg>,
    middlewares: Vec<BoxedMiddleware>,
    resources: Injectables,
}

impl RouteBuilder {
    fn new(pattern: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            slash_mode: SlashMode::default(),
            methods: MethodSet::any(),
            endpoint: None,
            render: None,
            middlewares: Vec::new(),
            resources: Injectables::new(),
        }
    }

    /// Restricts the route to `methods`.
    pub fn methods(mut self, methods: MethodSet) -> Self {
        self.methods = methods;
        self
    }

    /// Adds one allowed method.
    pub fn method(mut self, method: Method) -> Self {
        self.methods = self.methods.method(method);
        self
    }

    /// Sets the slash mode.
    pub fn slash_mode(mut self, mode: SlashMode) -> Self {
        self.slash_mode = mode;
        self
    }

    /// Sets the endpoint.
    pub fn endpoint(mut self, endpoint: Function) -> Self {
        self.endpoint = Some(endpoint);
        self
    }

    /// Sets the render function or template name.
    pub fn render(mut self, render: impl Into<RenderArg>) -> Self {
        self.render = Some(render.into());
        self
    }

    /// Appends a route-local middleware.
    pub fn middleware(mut self, middleware: BoxedMiddleware) -> Self {
        self.middlewares.push(middleware);
        self
    }

    /// Adds a route-local resource.
    pub fn resource<T: std::any::Any + Send + Sync>(mut self, name: impl Into<String>, value: T) -> Self {
        self.resources.insert(name, value);
        self
    }

    /// Compiles the pattern and builds the route.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidUrlPattern`] if the pattern does not compile.
    pub fn build(self) -> Result<Route> {
        let pattern = CompiledPattern::compile(&self.pattern, self.slash_mode)?;
        Ok(Route {
            pattern,
            methods: self.methods,
            endpoint: self.endpoint,
            render: self.render,
            middlewares: self.middlewares,
            resources: self.resources,
        })
    }
}

impl fmt::Debug for RouteBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouteBuilder")
            .field("pattern", &self.pattern)
            .field("slash_mode", &self.slash_mode)
            .finish_non_exhaustive()
    }
}

/// A route registration: pattern, endpoint, and optional render, methods
/// and slash mode.
///
/// # Example
///
/// ```rust
/// use strata::core::{Function, ParameterSpec};
/// use strata::route::RouteSpec;
///
/// let index = Function::new("index", ParameterSpec::new(), |_| Ok("home"));
/// let spec = RouteSpec::get("/", index);
/// assert!(spec.methods.allows(&http::Method::GET));
/// assert!(!spec.methods.allows(&http::Method::POST));
/// ```
#[derive(Clone)]
pub struct RouteSpec {
    /// Pattern source text.
    pub pattern: String,
    /// Endpoint function.
    pub endpoint: Function,
    /// Render function or template name.
    pub render: Option<RenderArg>,
    /// Allowed methods.
    pub methods: MethodSet,
    /// Slash mode; the application default when `None`.
    pub slash_mode: Option<SlashMode>,
}

impl RouteSpec {
    /// Creates a spec for any method.
    pub fn new(pattern: impl Into<String>, endpoint: Function) -> Self {
        Self {
            pattern: pattern.into(),
            endpoint,
            render: None,
            methods: MethodSet::any(),
            slash_mode: None,
        }
    }

    /// A `GET` route.
    pub fn get(pattern: impl Into<String>, endpoint: Function) -> Self {
        Self::new(pattern, endpoint).with_methods(MethodSet::new().get())
    }

    /// A `POST` route.
    pub fn post(pattern: impl Into<String>, endpoint: Function) -> Self {
        Self::new(pattern, endpoint).with_methods(MethodSet::new().post())
    }

    /// A `PUT` route.
    pub fn put(pattern: impl Into<String>, endpoint: Function) -> Self {
        Self::new(pattern, endpoint).with_methods(MethodSet::new().put())
    }

    /// A `DELETE` route.
    pub fn delete(pattern: impl Into<String>, endpoint: Function) -> Self {
        Self::new(pattern, endpoint).with_methods(MethodSet::new().delete())
    }

    /// A `PATCH` route.
    pub fn patch(pattern: impl Into<String>, endpoint: Function) -> Self {
        Self::new(pattern, endpoint).with_methods(MethodSet::new().patch())
    }

    /// Sets the render function or template name.
    pub fn with_render(mut self, render: impl Into<RenderArg>) -> Self {
        self.render = Some(render.into());
        self
    }

    /// Sets the allowed methods.
    pub fn with_methods(mut self, methods: MethodSet) -> Self {
        self.methods = methods;
        self
    }

    /// Sets the slash mode.
    pub fn with_slash_mode(mut self, mode: SlashMode) -> Self {
        self.slash_mode = Some(mode);
        self
    }
}

impl fmt::Debug for RouteSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouteSpec")
            .field("pattern", &self.pattern)
            .field("endpoint", &self.endpoint.name())
            .field("render", &self.render)
            .field("methods", &self.methods)
            .field("slash_mode", &self.slash_mode)
            .finish()
    }
}

impl From<(&str, Function)> for RouteSpec {
    fn from((pattern, endpoint): (&str, Function)) -> Self {
        Self::new(pattern, endpoint)
    }
}

impl From<(&str, Function, RenderArg)> for RouteSpec {
    fn from((pattern, endpoint, render): (&str, Function, RenderArg)) -> Self {
        Self::new(pattern, endpoint).with_render(render)
    }
}

impl From<(&str, Function, Function)> for RouteSpec {
    fn from((pattern, endpoint, render): (&str, Function, Function)) -> Self {
        Self::new(pattern, endpoint).with_render(render)
    }
}

impl From<(&str, Function, &str)> for RouteSpec {
    fn from((pattern, endpoint, template): (&str, Function, &str)) -> Self {
        Self::new(pattern, endpoint).with_render(template)
    }
}

/// Anything an application accepts as a route.
#[derive(Debug, Clone)]
pub enum RouteEntry {
    /// An already built route, used with its own slash mode.
    Route(Route),
    /// A registration spec, compiled with the application's default slash mode.
    Spec(RouteSpec),
}

impl From<Route> for RouteEntry {
    fn from(route: Route) -> Self {
        Self::Route(route)
    }
}

impl From<RouteSpec> for RouteEntry {
    fn from(spec: RouteSpec) -> Self {
        Self::Spec(spec)
    }
}

impl From<(&str, Function)> for RouteEntry {
    fn from(tuple: (&str, Function)) -> Self {
        Self::Spec(tuple.into())
    }
}

impl From<(&str, Function, RenderArg)> for RouteEntry {
    fn from(tuple: (&str, Function, RenderArg)) -> Self {
        Self::Spec(tuple.into())
    }
}

impl From<(&str, Function, Function)> for RouteEntry {
    fn from(tuple: (&str, Function, Function)) -> Self {
        Self::Spec(tuple.into())
    }
}

impl From<(&str, Function, &str)> for RouteEntry {
    fn from(tuple: (&str, Function, &str)) -> Self {
        Self::Spec(tuple.into())
    }
}

impl RouteEntry {
    pub(crate) fn into_route(self, default_mode: SlashMode) -> Result<Route> {
        match self {
            Self::Route(route) => Ok(route),
            Self::Spec(spec) => Route::from_spec_with_default(spec, default_mode),
        }
    }
}

/// A route bound to an application.
///
/// Holds the merged middleware, the resource snapshot and the compiled
/// chain. Immutable and shared across concurrent requests.
pub struct BoundRoute {
    route: Arc<Route>,
    middlewares: Vec<BoxedMiddleware>,
    resources: Injectables,
    chain: CompiledChain,
}

impl BoundRoute {
    /// Returns the route as registered.
    #[must_use]
    pub fn route(&self) -> &Route {
        &self.route
    }

    /// Returns the compiled pattern.
    #[must_use]
    pub fn pattern(&self) -> &CompiledPattern {
        self.route.pattern()
    }

    /// Returns the allowed methods.
    #[must_use]
    pub fn methods(&self) -> &MethodSet {
        self.route.methods()
    }

    /// Returns the merged middleware, application middleware first.
    #[must_use]
    pub fn middlewares(&self) -> &[BoxedMiddleware] {
        &self.middlewares
    }

    /// Returns the resource snapshot taken at bind time.
    #[must_use]
    pub fn resources(&self) -> &Injectables {
        &self.resources
    }

    /// Returns the compiled chain.
    #[must_use]
    pub fn chain(&self) -> &CompiledChain {
        &self.chain
    }

    /// Runs the chain.
    ///
    /// The environment is the resource snapshot, `_route` (the [`Route`]),
    /// `_endpoint` (the endpoint [`Function`]) and then `injectables`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidEndpoint`] if a required argument is unbound
    /// when its function is reached, or any error raised by the chain.
    pub fn execute(&self, injectables: &Injectables) -> Result<Injectable> {
        let mut env = self.resources.clone();
        env.insert_shared(builtins::ROUTE, Arc::clone(&self.route) as Injectable);
        env.insert(builtins::ENDPOINT, self.chain.endpoint().clone());
        env.extend(injectables);
        self.chain.execute(env)
    }
}

impl fmt::Debug for BoundRoute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoundRoute")
            .field("pattern", &self.route.pattern().as_str())
            .field("methods", self.route.methods())
            .field("chain", &self.chain)
            .field("resources", &self.resources)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strata_core::{ErrorKind, ParameterSpec};
    use strata_middleware::FnMiddleware;

    fn hello() -> Function {
        Function::new("hello", ParameterSpec::from_names(["name"]), |args| {
            Ok(format!("hello {}", args.require::<String>("name")?))
        })
    }

    #[test]
    fn test_execute_without_endpoint() {
        let route = Route::builder("/a/b/<t:int>/thing/<das+int>").build().unwrap();
        let err = route.execute(&Injectables::new()).unwrap_err();
        assert!(matches!(err, Error::InvalidEndpoint { .. }));
    }

    #[test]
    fn test_execute_missing_argument() {
        let route = Route::new("/", hello()).unwrap();
        let err = route.execute(&Injectables::new()).unwrap_err();
        assert!(matches!(err, Error::InvalidEndpoint { .. }));
        assert!(err.to_string().contains("name"));
    }

    #[test]
    fn test_execute_uses_route_resources() {
        let route = Route::builder("/")
            .endpoint(hello())
            .resource("name", "ada".to_string())
            .build()
            .unwrap();
        let out = route.execute(&Injectables::new()).unwrap();
        assert_eq!(out.downcast_ref::<String>().unwrap(), "hello ada");
    }

    #[test]
    fn test_execute_with_local_provider() {
        let named = FnMiddleware::new("namer")
            .provides(["name"])
            .request(ParameterSpec::from_names(["next"]), |next, _| {
                let mut provided = Injectables::new();
                provided.insert("name", "grace".to_string());
                next.run(provided)
            })
            .boxed();
        let route = Route::builder("/").endpoint(hello()).middleware(named).build().unwrap();
        let out = route.execute(&Injectables::new()).unwrap();
        assert_eq!(out.downcast_ref::<String>().unwrap(), "hello grace");
    }

    fn provider(name: &'static str, provides: &'static str) -> BoxedMiddleware {
        FnMiddleware::new(name)
            .provides([provides])
            .request(ParameterSpec::from_names(["next"]), |next, _| next.run_empty())
            .boxed()
    }

    fn conflict_sources(err: Error, expected_name: &str) -> Vec<String> {
        match err {
            Error::ProviderConflict { name, sources } => {
                assert_eq!(name, expected_name);
                sources
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_execute_rejects_local_provider_conflict() {
        let route = Route::builder("/")
            .endpoint(hello())
            .middleware(provider("first", "name"))
            .middleware(provider("second", "name"))
            .build()
            .unwrap();
        let err = route.execute(&Injectables::new()).unwrap_err();
        assert_eq!(conflict_sources(err, "name"), ["first", "second"]);
    }

    #[test]
    fn test_bind_middleware_conflicts_with_resource() {
        let route = Route::new("/", hello()).unwrap();
        let mut resources = Injectables::new();
        resources.insert("name", "res".to_string());
        let err = route
            .bind(&resources, &[provider("loader", "name")], None)
            .unwrap_err();
        assert_eq!(conflict_sources(err, "name"), ["resources", "loader"]);
    }

    #[test]
    fn test_bind_middleware_conflicts_with_builtin() {
        let route = Route::new("/hello/<name>", hello()).unwrap();
        let err = route
            .bind(&Injectables::new(), &[provider("spoof", "request")], None)
            .unwrap_err();
        assert_eq!(conflict_sources(err, "request"), ["builtins", "spoof"]);
    }

    #[test]
    fn test_bad_pattern() {
        let err = Route::new("alf", hello()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Compile);
    }

    #[test]
    fn test_bind_url_provides_argument() {
        let route = Route::new("/hello/<name>", hello()).unwrap();
        let bound = route.bind(&Injectables::new(), &[], None).unwrap();
        let mut env = Injectables::new();
        env.insert("name", "url".to_string());
        let out = bound.execute(&env).unwrap();
        assert_eq!(out.downcast_ref::<String>().unwrap(), "hello url");
    }

    #[test]
    fn test_bind_unresolved() {
        let route = Route::new("/hello", hello()).unwrap();
        let err = route.bind(&Injectables::new(), &[], None).unwrap_err();
        match err {
            Error::UnresolvedArgument { missing, .. } => assert_eq!(missing, ["name"]),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_bind_resource_conflicts_with_url() {
        let route = Route::new("/hello/<name>", hello()).unwrap();
        let mut resources = Injectables::new();
        resources.insert("name", "res".to_string());
        let err = route.bind(&resources, &[], None).unwrap_err();
        assert!(matches!(err, Error::ProviderConflict { ref name, .. } if name == "name"));
    }

    #[test]
    fn test_application_resource_overrides_local() {
        let route = Route::builder("/")
            .endpoint(hello())
            .resource("name", "local".to_string())
            .build()
            .unwrap();
        let mut resources = Injectables::new();
        resources.insert("name", "app".to_string());
        let bound = route.bind(&resources, &[], None).unwrap();
        let out = bound.execute(&Injectables::new()).unwrap();
        assert_eq!(out.downcast_ref::<String>().unwrap(), "hello app");
    }

    #[test]
    fn test_bind_template_uses_factory() {
        let index = Function::new("index", ParameterSpec::new(), |_| Ok(3_i64));
        let route = Route::builder("/").endpoint(index).render("count.txt").build().unwrap();
        let factory = |template: &str| -> Result<Function> {
            let template = template.to_string();
            Ok(Function::new(
                "count_render",
                ParameterSpec::from_names(["context"]),
                move |args| Ok(format!("{template}: {}", args.require::<i64>("context")?)),
            ))
        };
        let bound = route.bind(&Injectables::new(), &[], Some(&factory)).unwrap();
        let out = bound.execute(&Injectables::new()).unwrap();
        assert_eq!(out.downcast_ref::<String>().unwrap(), "count.txt: 3");
    }

    #[test]
    fn test_bind_template_without_factory_passes_context() {
        let index = Function::new("index", ParameterSpec::new(), |_| Ok(3_i64));
        let route = Route::builder("/").endpoint(index).render("count.txt").build().unwrap();
        let bound = route.bind(&Injectables::new(), &[], None).unwrap();
        let out = bound.execute(&Injectables::new()).unwrap();
        assert_eq!(out.downcast_ref::<i64>(), Some(&3));
    }

    #[test]
    fn test_builtins_injected() {
        let probe = Function::new(
            "probe",
            ParameterSpec::from_names(["_route", "_endpoint"]),
            |args| {
                let route = args.require::<Route>("_route")?;
                let endpoint = args.require::<Function>("_endpoint")?;
                Ok(format!("{} {}", route.pattern(), endpoint.name()))
            },
        );
        let bound = Route::new("/probe", probe)
            .unwrap()
            .bind(&Injectables::new(), &[], None)
            .unwrap();
        let out = bound.execute(&Injectables::new()).unwrap();
        assert_eq!(out.downcast_ref::<String>().unwrap(), "/probe probe");
    }

    #[test]
    fn test_from_route_drops_resources() {
        let route = Route::builder("/x")
            .endpoint(hello())
            .resource("name", "n".to_string())
            .build()
            .unwrap();
        let copy = Route::from_route(&route);
        assert_eq!(copy.pattern(), route.pattern());
        assert!(copy.resources().is_empty());
    }

    #[test]
    fn test_spec_tuple_forms() {
        let spec: RouteSpec = ("/p", hello(), "page.html").into();
        assert!(matches!(spec.render, Some(RenderArg::Template(_))));
        assert!(spec.methods.is_any());

        let route = Route::from_spec(spec.with_slash_mode(SlashMode::Strict)).unwrap();
        assert_eq!(route.pattern().slash_mode(), SlashMode::Strict);
    }
}
