//! # Strata Middleware
//!
//! Composable middleware and the chain compiler for the Strata dispatch
//! framework.
//!
//! Middleware contribute up to three phases:
//!
//! | Phase      | Wraps                  | `next` accepts        |
//! |------------|------------------------|-----------------------|
//! | `request`  | the whole chain        | `provides`            |
//! | `endpoint` | the endpoint function  | `endpoint_provides`   |
//! | `render`   | the render function    | `context`             |
//!
//! [`compile_chain`] verifies at bind time that every required argument has a
//! provider and produces a [`CompiledChain`] that runs without further
//! analysis.
//!
//! ## Example
//!
//! ```
//! use strata_core::{Function, Injectables, ParameterSpec};
//! use strata_middleware::{compile_chain, FnMiddleware};
//!
//! let timing = FnMiddleware::new("timing")
//!     .request(ParameterSpec::from_names(["next"]), |next, _| next.run_empty())
//!     .boxed();
//! let endpoint = Function::new("index", ParameterSpec::new(), |_| Ok("hi"));
//!
//! let chain = compile_chain(&[timing], &endpoint, &Function::identity_render(), ["request"]).unwrap();
//! let out = chain.execute(Injectables::new()).unwrap();
//! assert_eq!(out.downcast_ref::<&str>(), Some(&"hi"));
//! ```

#![doc(html_root_url = "https://docs.rs/strata-middleware/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod chain;
mod merge;
pub mod middleware;

pub use chain::{check_providers, compile_chain, CompiledChain, Next};
pub use merge::merge_middlewares;
pub use middleware::{check_middleware, BoxedMiddleware, FnMiddleware, Middleware, PhaseHandler};
