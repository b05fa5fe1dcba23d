//! # Strata Core
//!
//! Core types for the Strata dispatch framework.
//!
//! - [`Error`] / [`ErrorKind`] - The error taxonomy shared by every crate
//! - [`Injectables`] / [`Args`] - Name-addressed value injection
//! - [`ParameterSpec`] - Declared parameter lists
//! - [`Function`] - Endpoint and render callables
//! - [`Phase`] - The three phases of a compiled chain

#![doc(html_root_url = "https://docs.rs/strata-core/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod error;
mod function;
mod inject;
mod phase;
mod signature;

pub use error::{Error, ErrorKind, Result};
pub use function::Function;
pub use inject::{builtins, injectable, Args, Injectable, Injectables};
pub use phase::Phase;
pub use signature::{Parameter, ParameterSpec};

/// The request type dispatched through an application.
pub type Request = http::Request<bytes::Bytes>;
