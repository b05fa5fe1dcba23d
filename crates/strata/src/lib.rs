//! # Strata
//!
//! **A request-dispatch core: typed URL patterns, composable middleware and
//! argument injection by name.**
//!
//! - 🧭 **Typed patterns** – `<id:int>`, `<tags*>`, `<page?int>` compile once at registration
//! - 🔗 **Checked chains** – every argument a middleware, endpoint or render needs is
//!   resolved when the route is bound, not when a request arrives
//! - 🧩 **Injection by name** – URL variables, resources, builtins and middleware
//!   outputs share one namespace; conflicts are bind errors
//!
//! ## Quick Start
//!
//! ```rust
//! use http::Method;
//! use strata::prelude::*;
//!
//! let greeting = Function::new("greeting", ParameterSpec::from_names(["prefix", "name"]), |args| {
//!     Ok(format!("{} {}", args.require::<String>("prefix")?, args.require::<PathValue>("name")?))
//! });
//!
//! let app = Application::builder()
//!     .resource("prefix", "Hello,".to_string())
//!     .route(RouteSpec::get("/hello/<name>", greeting).with_render(render_basic()))
//!     .build()?;
//!
//! let out = app.dispatch(&Method::GET, "/hello/strata", None)?;
//! assert_eq!(out.downcast_ref::<String>().unwrap(), "Hello, strata");
//! # Ok::<(), strata::core::Error>(())
//! ```
//!
//! ## Architecture
//!
//! ```text
//! path ─→ first route whose methods + pattern match ─→ bindings
//!                                                        ↓
//! request mw → … → endpoint mw → … → endpoint ──context──→ render mw → … → render
//! ```

#![doc(html_root_url = "https://docs.rs/strata/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod application;
pub mod render;
pub mod route;

// Re-export core types
pub use strata_core as core;

// Re-export router types
pub use strata_router as router;

// Re-export middleware types
pub use strata_middleware as middleware;

// Re-export configuration types
pub use strata_config as config;

// Re-export telemetry types
pub use strata_telemetry as telemetry;

pub use application::{Application, ApplicationBuilder, Outcome};
pub use render::{render_basic, BoxedRenderFactory, RenderArg, RenderFactory};
pub use route::{BoundRoute, Route, RouteBuilder, RouteEntry, RouteSpec};

/// Prelude module for convenient imports.
///
/// # Example
///
/// ```rust
/// use strata::prelude::*;
/// ```
pub mod prelude {
    pub use strata_core::{
        builtins, injectable, Args, Error, Function, Injectable, Injectables, ParameterSpec,
        Phase, Request, Result,
    };

    pub use strata_router::{MethodSet, PathValue, SlashMode};

    pub use strata_middleware::{BoxedMiddleware, FnMiddleware, Middleware, Next};

    pub use strata_config::{ConfigLoader, StrataConfig};

    pub use strata_telemetry::{init_logging, LogConfig};

    pub use crate::application::{Application, Outcome};
    pub use crate::render::{render_basic, RenderArg, RenderFactory};
    pub use crate::route::{Route, RouteSpec};
}
