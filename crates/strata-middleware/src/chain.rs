//! Chain compiler.
//!
//! [`compile_chain`] statically checks that every argument a middleware phase,
//! endpoint or render function requires has a provider, then builds a
//! [`CompiledChain`]: an immutable list of layers that runs as
//!
//! ```text
//! request mw 0 → request mw 1 → … ┐
//!   ┌─────────────────────────────┘
//!   ├→ endpoint mw 0 → … → endpoint          (result bound as `context`)
//!   └→ render mw 0   → … → render            (result returned)
//! ```
//!
//! Each middleware phase gets a [`Next`] that continues at the following
//! layer. A phase may skip `next` to short-circuit, or inspect the `Err` it
//! returns.

use std::fmt;
use std::sync::Arc;

use indexmap::{IndexMap, IndexSet};
use strata_core::{
    builtins, Error, Function, Injectable, Injectables, ParameterSpec, Phase, Result,
};
use tracing::{debug, trace};

use crate::middleware::{check_middleware, phase_of, BoxedMiddleware, PhaseHandler};

/// Checks that no argument name has more than one provider.
///
/// `sources` lists the non-middleware providers by label, for example
/// `("url", ["id"])` or `("resources", ["db"])`. Each middleware contributes
/// its `provides` and `endpoint_provides` under its own name.
///
/// # Errors
///
/// Returns [`Error::ProviderConflict`] for the first contested name.
pub fn check_providers(
    middlewares: &[BoxedMiddleware],
    sources: &[(&str, Vec<String>)],
) -> Result<()> {
    let mut provided_by: IndexMap<&str, Vec<String>> = IndexMap::new();

    for (label, names) in sources {
        let unique: IndexSet<&str> = names.iter().map(String::as_str).collect();
        for name in unique {
            provided_by.entry(name).or_default().push((*label).to_string());
        }
    }
    for mw in middlewares {
        let unique: IndexSet<&str> = mw
            .provides()
            .iter()
            .chain(mw.endpoint_provides())
            .map(String::as_str)
            .collect();
        for name in unique {
            provided_by
                .entry(name)
                .or_default()
                .push(mw.name().to_string());
        }
    }

    match provided_by.into_iter().find(|(_, sources)| sources.len() > 1) {
        Some((name, sources)) => Err(Error::provider_conflict(name, sources)),
        None => Ok(()),
    }
}

/// Accumulated argument requirements of one phase list.
#[derive(Default)]
struct Residual {
    required: IndexSet<String>,
}

impl Residual {
    /// Walks `params` in order; each entry's provides become visible to the
    /// entries after it.
    fn accumulate<'a>(specs: impl IntoIterator<Item = (&'a ParameterSpec, &'a [String])>) -> Self {
        let mut provided: IndexSet<&str> = IndexSet::from([builtins::NEXT]);
        let mut residual = Self::default();
        for (params, provides) in specs {
            for name in params.required_names() {
                if !provided.contains(name) {
                    residual.required.insert(name.to_string());
                }
            }
            provided.extend(provides.iter().map(String::as_str));
        }
        residual
    }

    fn unresolved(&self, available: &IndexSet<String>) -> Vec<String> {
        self.required
            .iter()
            .filter(|name| !available.contains(name.as_str()))
            .cloned()
            .collect()
    }
}

/// Resolved argument list of one callable.
#[derive(Debug, Clone)]
struct Binding {
    /// Every name passed: required ones plus optional ones with a provider.
    args: Vec<String>,
    /// Names that must be bound at call time.
    required: Vec<String>,
}

impl Binding {
    fn resolve(params: &ParameterSpec, reachable: &IndexSet<String>) -> Self {
        let required: Vec<String> = params
            .required_names()
            .filter(|name| *name != builtins::NEXT)
            .map(str::to_string)
            .collect();
        let args = params
            .iter()
            .filter(|p| p.name() != builtins::NEXT)
            .filter(|p| !p.is_optional() || reachable.contains(p.name()))
            .map(|p| p.name().to_string())
            .collect();
        Self { args, required }
    }

    fn select(&self, function: &str, env: &Injectables) -> Result<strata_core::Args> {
        if let Some(missing) = self.required.iter().find(|name| !env.contains(name)) {
            return Err(Error::invalid_endpoint(
                function,
                format!("missing required argument '{missing}'"),
            ));
        }
        Ok(env.select(self.args.iter().map(String::as_str)))
    }
}

/// A middleware phase in a compiled chain.
struct Layer {
    name: String,
    phase: Phase,
    handler: PhaseHandler,
    binding: Binding,
    accepts: Arc<[String]>,
}

/// The endpoint or render function at the end of a phase list.
struct Terminal {
    function: Function,
    binding: Binding,
}

impl Terminal {
    fn invoke(&self, env: &Injectables) -> Result<Injectable> {
        let args = self.binding.select(self.function.name(), env)?;
        trace!(function = %self.function.name(), "calling function");
        self.function.call(&args)
    }
}

struct ChainInner {
    requests: Vec<Layer>,
    endpoints: Vec<Layer>,
    renders: Vec<Layer>,
    endpoint: Terminal,
    render: Terminal,
}

/// Position of a continuation inside a chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Cursor {
    phase: Phase,
    index: usize,
}

impl Cursor {
    const fn start(phase: Phase) -> Self {
        Self { phase, index: 0 }
    }
}

/// The continuation handed to a middleware phase.
///
/// Running it consumes it, so the rest of the chain executes at most once per
/// phase invocation.
pub struct Next {
    chain: Arc<ChainInner>,
    cursor: Cursor,
    accepts: Arc<[String]>,
    env: Injectables,
}

impl Next {
    /// Continues the chain, injecting `provided` downstream.
    ///
    /// Only names the calling phase declares as provided are kept.
    ///
    /// # Errors
    ///
    /// Returns whatever the rest of the chain returns.
    pub fn run(self, provided: Injectables) -> Result<Injectable> {
        let Self {
            chain,
            cursor,
            accepts,
            mut env,
        } = self;
        for name in accepts.iter() {
            if let Some(value) = provided.get_shared(name) {
                env.insert_shared(name.clone(), Arc::clone(value));
            }
        }
        chain.resume(cursor, env)
    }

    /// Continues the chain without providing anything.
    ///
    /// # Errors
    ///
    /// Returns whatever the rest of the chain returns.
    pub fn run_empty(self) -> Result<Injectable> {
        self.run(Injectables::new())
    }
}

impl fmt::Debug for Next {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Next")
            .field("cursor", &self.cursor)
            .field("accepts", &self.accepts)
            .finish_non_exhaustive()
    }
}

impl ChainInner {
    fn layers(&self, phase: Phase) -> &[Layer] {
        match phase {
            Phase::Request => &self.requests,
            Phase::Endpoint => &self.endpoints,
            Phase::Render => &self.renders,
        }
    }

    fn resume(self: Arc<Self>, cursor: Cursor, env: Injectables) -> Result<Injectable> {
        if cursor.index < self.layers(cursor.phase).len() {
            return self.enter(cursor, env);
        }
        match cursor.phase {
            Phase::Request => self.inner(env),
            Phase::Endpoint => self.endpoint.invoke(&env),
            Phase::Render => self.render.invoke(&env),
        }
    }

    /// Runs the endpoint list, binds its result as `context`, then runs the
    /// render list.
    fn inner(self: Arc<Self>, env: Injectables) -> Result<Injectable> {
        let context = Arc::clone(&self).resume(Cursor::start(Phase::Endpoint), env.clone())?;
        let mut env = env;
        env.insert_shared(builtins::CONTEXT, context);
        self.resume(Cursor::start(Phase::Render), env)
    }

    fn enter(self: Arc<Self>, cursor: Cursor, env: Injectables) -> Result<Injectable> {
        let layer = &self.layers(cursor.phase)[cursor.index];
        let args = layer.binding.select(&layer.name, &env)?;
        let handler = layer.handler.clone();
        let accepts = Arc::clone(&layer.accepts);
        trace!(middleware = %layer.name, phase = %cursor.phase, "entering middleware");
        let next = Next {
            chain: self,
            cursor: Cursor {
                phase: cursor.phase,
                index: cursor.index + 1,
            },
            accepts,
            env,
        };
        handler.call(next, &args)
    }
}

/// An executable chain produced by [`compile_chain`].
#[derive(Clone)]
pub struct CompiledChain {
    inner: Arc<ChainInner>,
}

impl CompiledChain {
    /// Runs the chain in the environment `env`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidEndpoint`] when a required argument is not
    /// bound when its function is reached, or any error raised by a phase,
    /// endpoint or render function.
    pub fn execute(&self, env: Injectables) -> Result<Injectable> {
        Arc::clone(&self.inner).resume(Cursor::start(Phase::Request), env)
    }

    /// Names of the middleware participating in `phase`, outermost first.
    pub fn middleware_names(&self, phase: Phase) -> impl Iterator<Item = &str> {
        self.inner.layers(phase).iter().map(|l| l.name.as_str())
    }

    /// Returns the endpoint function.
    #[must_use]
    pub fn endpoint(&self) -> &Function {
        &self.inner.endpoint.function
    }

    /// Returns the render function.
    #[must_use]
    pub fn render(&self) -> &Function {
        &self.inner.render.function
    }
}

impl fmt::Debug for CompiledChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names = |phase| self.middleware_names(phase).collect::<Vec<_>>();
        f.debug_struct("CompiledChain")
            .field("request", &names(Phase::Request))
            .field("endpoint", &names(Phase::Endpoint))
            .field("render", &names(Phase::Render))
            .field("endpoint_fn", &self.inner.endpoint.function.name())
            .field("render_fn", &self.inner.render.function.name())
            .finish()
    }
}

/// Compiles `middlewares`, `endpoint` and `render` into one chain.
///
/// `external_names` are the names bound before the chain starts: URL
/// variables, resources and builtins.
///
/// # Errors
///
/// - [`Error::InvalidMiddleware`] if a phase does not take `next` first
/// - [`Error::UnresolvedArgument`] if a required argument has no provider
pub fn compile_chain<I, S>(
    middlewares: &[BoxedMiddleware],
    endpoint: &Function,
    render: &Function,
    external_names: I,
) -> Result<CompiledChain>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    for mw in middlewares {
        check_middleware(&**mw)?;
    }

    let external: IndexSet<String> = external_names
        .into_iter()
        .map(|name| name.as_ref().to_string())
        .collect();
    let context: Arc<[String]> = Arc::from(vec![builtins::CONTEXT.to_string()]);

    let phased = |phase| {
        middlewares
            .iter()
            .filter_map(move |mw| phase_of(&**mw, phase).map(|h| (mw, h)))
            .collect::<Vec<_>>()
    };
    let requests = phased(Phase::Request);
    let endpoints = phased(Phase::Endpoint);
    let renders = phased(Phase::Render);

    let request_residual = Residual::accumulate(
        requests
            .iter()
            .map(|(mw, h)| (h.params(), mw.provides())),
    );
    let nothing: &[String] = &[];
    let endpoint_residual = Residual::accumulate(
        endpoints
            .iter()
            .map(|(mw, h)| (h.params(), mw.endpoint_provides()))
            .chain(std::iter::once((endpoint.params(), nothing))),
    );
    let render_residual = Residual::accumulate(
        renders
            .iter()
            .map(|(_, h)| (h.params(), &context[..]))
            .chain(std::iter::once((render.params(), &context[..]))),
    );

    let missing = request_residual.unresolved(&external);
    if !missing.is_empty() {
        return Err(Error::unresolved(Phase::Request, missing));
    }

    let mut available = external.clone();
    for (mw, _) in &requests {
        available.extend(mw.provides().iter().cloned());
    }

    let missing = endpoint_residual.unresolved(&available);
    if !missing.is_empty() {
        return Err(Error::unresolved(Phase::Endpoint, missing));
    }

    let mut render_available = available.clone();
    render_available.insert(builtins::CONTEXT.to_string());
    let missing = render_residual.unresolved(&render_available);
    if !missing.is_empty() {
        return Err(Error::unresolved(Phase::Render, missing));
    }

    // Reachable names grow layer by layer inside each phase list.
    let mut reachable = external;
    let mut request_layers = Vec::with_capacity(requests.len());
    for (mw, handler) in requests {
        let accepts: Arc<[String]> = Arc::from(mw.provides().to_vec());
        request_layers.push(Layer {
            name: mw.name().to_string(),
            phase: Phase::Request,
            binding: Binding::resolve(handler.params(), &reachable),
            handler,
            accepts: Arc::clone(&accepts),
        });
        reachable.extend(accepts.iter().cloned());
    }

    let mut reachable_ep = available;
    let mut endpoint_layers = Vec::with_capacity(endpoints.len());
    for (mw, handler) in endpoints {
        let accepts: Arc<[String]> = Arc::from(mw.endpoint_provides().to_vec());
        endpoint_layers.push(Layer {
            name: mw.name().to_string(),
            phase: Phase::Endpoint,
            binding: Binding::resolve(handler.params(), &reachable_ep),
            handler,
            accepts: Arc::clone(&accepts),
        });
        reachable_ep.extend(accepts.iter().cloned());
    }
    let endpoint_terminal = Terminal {
        binding: Binding::resolve(endpoint.params(), &reachable_ep),
        function: endpoint.clone(),
    };

    let render_layers = renders
        .into_iter()
        .map(|(mw, handler)| Layer {
            name: mw.name().to_string(),
            phase: Phase::Render,
            binding: Binding::resolve(handler.params(), &render_available),
            handler,
            accepts: Arc::clone(&context),
        })
        .collect::<Vec<_>>();
    let render_terminal = Terminal {
        binding: Binding::resolve(render.params(), &render_available),
        function: render.clone(),
    };

    let inner = ChainInner {
        requests: request_layers,
        endpoints: endpoint_layers,
        renders: render_layers,
        endpoint: endpoint_terminal,
        render: render_terminal,
    };
    debug!(
        endpoint = %endpoint.name(),
        render = %render.name(),
        request_layers = inner.requests.len(),
        endpoint_layers = inner.endpoints.len(),
        render_layers = inner.renders.len(),
        "compiled middleware chain"
    );
    Ok(CompiledChain {
        inner: Arc::new(inner),
    })
}

impl fmt::Debug for Layer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Layer")
            .field("name", &self.name)
            .field("phase", &self.phase)
            .field("binding", &self.binding)
            .finish_non_exhaustive()
    }
}
