//! Render functions and render factories.
//!
//! A route names its render either directly, as a [`Function`], or by a
//! template name that the application's [`RenderFactory`] turns into a
//! function when the route is bound.

use std::fmt;
use std::sync::Arc;

use strata_core::{builtins, Error, Function, Injectable, ParameterSpec, Result};
use strata_router::PathValue;

/// The render argument of a route.
#[derive(Clone)]
pub enum RenderArg {
    /// A render function used as is.
    Function(Function),
    /// A template name resolved by the application's [`RenderFactory`].
    Template(String),
}

impl RenderArg {
    /// Returns the function or template name, for logging.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Function(f) => f.name(),
            Self::Template(t) => t,
        }
    }
}

impl fmt::Debug for RenderArg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Function(func) => f.debug_tuple("Function").field(&func.name()).finish(),
            Self::Template(name) => f.debug_tuple("Template").field(name).finish(),
        }
    }
}

impl From<Function> for RenderArg {
    fn from(function: Function) -> Self {
        Self::Function(function)
    }
}

impl From<&str> for RenderArg {
    fn from(template: &str) -> Self {
        Self::Template(template.to_string())
    }
}

impl From<String> for RenderArg {
    fn from(template: String) -> Self {
        Self::Template(template)
    }
}

/// Turns a template name into a render function at bind time.
///
/// Implemented for any `Fn(&str) -> Result<Function>`.
///
/// # Example
///
/// ```rust
/// use strata::core::{Function, Result};
/// use strata::render::{render_basic, RenderFactory};
///
/// let factory = |_template: &str| -> Result<Function> { Ok(render_basic()) };
/// let render = factory.render_for("home.html").unwrap();
/// assert_eq!(render.name(), "render_basic");
/// ```
pub trait RenderFactory: Send + Sync + 'static {
    /// Returns the render function for `template`.
    ///
    /// # Errors
    ///
    /// Returns an error if the template cannot be loaded.
    fn render_for(&self, template: &str) -> Result<Function>;
}

impl<F> RenderFactory for F
where
    F: Fn(&str) -> Result<Function> + Send + Sync + 'static,
{
    fn render_for(&self, template: &str) -> Result<Function> {
        self(template)
    }
}

/// Shared render factory.
pub type BoxedRenderFactory = Arc<dyn RenderFactory>;

/// A render function that formats common context types as text.
///
/// Handles `String`, `&'static str`, integers, floats, `bool`, [`PathValue`]
/// and `serde_json::Value` (compact JSON). Any other context is a handler
/// error.
///
/// # Example
///
/// ```rust
/// use strata::core::Injectables;
/// use strata::render::render_basic;
///
/// let render = render_basic();
/// let mut env = Injectables::new();
/// env.insert("context", 42_i64);
///
/// let out = render.call(&env.select(render.params().names())).unwrap();
/// assert_eq!(out.downcast_ref::<String>().unwrap(), "42");
/// ```
#[must_use]
pub fn render_basic() -> Function {
    Function::new(
        "render_basic",
        ParameterSpec::from_names([builtins::CONTEXT]),
        |args| {
            let context = args.shared(builtins::CONTEXT).ok_or_else(|| {
                Error::invalid_endpoint("render_basic", "no context to render")
            })?;
            render_text(&context)
        },
    )
}

fn render_text(context: &Injectable) -> Result<String> {
    macro_rules! try_display {
        ($($ty:ty),*) => {
            $(
                if let Some(value) = context.downcast_ref::<$ty>() {
                    return Ok(value.to_string());
                }
            )*
        };
    }

    try_display!(String, &'static str, i64, i32, u64, u32, usize, f64, f32, bool, PathValue);

    if let Some(value) = context.downcast_ref::<serde_json::Value>() {
        return serde_json::to_string(value).map_err(Error::handler);
    }
    Err(Error::handler(anyhow::anyhow!(
        "render_basic cannot render this context type"
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use strata_core::{injectable, Injectables};

    fn render(value: Injectable) -> Result<String> {
        let f = render_basic();
        let mut env = Injectables::new();
        env.insert_shared(builtins::CONTEXT, value);
        let out = f.call(&env.select(f.params().names()))?;
        Ok(out.downcast_ref::<String>().cloned().unwrap_or_default())
    }

    #[test]
    fn test_render_text_types() {
        assert_eq!(render(injectable("hi".to_string())).unwrap(), "hi");
        assert_eq!(render(injectable("static")).unwrap(), "static");
        assert_eq!(render(injectable(7_i64)).unwrap(), "7");
        assert_eq!(render(injectable(true)).unwrap(), "true");
        assert_eq!(render(injectable(1.5_f64)).unwrap(), "1.5");
    }

    #[test]
    fn test_render_json() {
        let value = serde_json::json!({"user": "ada"});
        assert_eq!(render(injectable(value)).unwrap(), r#"{"user":"ada"}"#);
    }

    #[test]
    fn test_render_path_value() {
        let value = PathValue::List(vec![PathValue::Int(1), PathValue::Int(2)]);
        assert!(render(injectable(value)).is_ok());
    }

    #[test]
    fn test_render_unknown_type_is_handler_error() {
        struct Opaque;
        let err = render(injectable(Opaque)).unwrap_err();
        assert!(matches!(err, Error::Handler(_)));
    }

    #[test]
    fn test_render_arg_from() {
        let arg = RenderArg::from("home.html");
        assert!(matches!(arg, RenderArg::Template(ref t) if t == "home.html"));
        assert_eq!(RenderArg::from(render_basic()).name(), "render_basic");
    }

    #[test]
    fn test_closure_factory() {
        let factory: BoxedRenderFactory = Arc::new(|template: &str| {
            if template.is_empty() {
                Err(Error::invalid_endpoint("factory", "empty template name"))
            } else {
                Ok(render_basic())
            }
        });
        assert!(factory.render_for("page").is_ok());
        assert!(factory.render_for("").is_err());
    }
}
