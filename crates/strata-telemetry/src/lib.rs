//! Logging setup for Strata.
//!
//! Every Strata crate reports through `tracing`. This crate provides the
//! subscriber side:
//!
//! | Level   | Events                                              |
//! |---------|-----------------------------------------------------|
//! | `info`  | route added to an application                        |
//! | `debug` | chain compiled, request matched or unmatched, redirect |
//! | `trace` | pattern compiled, candidate route tried, layer entered |
//!
//! # Example
//!
//! ```rust,ignore
//! use strata_telemetry::{init_logging, LogConfig};
//!
//! init_logging(&LogConfig::production()).expect("logging");
//! ```

#![doc(html_root_url = "https://docs.rs/strata-telemetry/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod error;
pub mod logging;

pub use error::TelemetryError;
pub use logging::{create_env_filter, init_logging, LogConfig};

/// Result type for telemetry operations.
pub type TelemetryResult<T> = Result<T, TelemetryError>;
