//! Typed configuration for Strata.
//!
//! - TOML and JSON configuration files
//! - Environment variable overrides
//! - Strict validation (fails on unknown fields)
//! - Layered configuration (defaults → file → env)
//!
//! # Configuration File Format
//!
//! ```toml
//! [routing]
//! default_slash_mode = "redirect"   # strict | rewrite | redirect
//!
//! [logging]
//! enabled = true
//! level = "info"
//! format = "json"                   # json | pretty
//! include_location = false
//! ```
//!
//! # Environment Variable Overrides
//!
//! - `STRATA__ROUTING__DEFAULT_SLASH_MODE=strict`
//! - `STRATA__LOGGING__LEVEL=strata=debug`
//! - `STRATA__LOGGING__FORMAT=pretty`

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod config;
mod error;
mod loader;
mod schema;

pub use config::{StrataConfig, StrataConfigBuilder};
pub use error::ConfigError;
pub use loader::ConfigLoader;
pub use schema::{LogFormat, LoggingConfig, RoutingConfig};
