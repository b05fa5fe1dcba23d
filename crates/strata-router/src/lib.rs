//! URL pattern compiler and path matcher for Strata.
//!
//! Route patterns are compiled once, at registration time, into a sequence of
//! literal and variable segments. Matching a request path walks those segments
//! in order and yields typed variable bindings.
//!
//! # Pattern Grammar
//!
//! ```text
//! pattern  := "/" segment ("/" segment)* ["/"]  |  "/"
//! segment  := literal | "<" name [marker] [":"] [converter] ">"
//! marker   := "?" | "+" | "*"
//! ```
//!
//! | Converter    | Binds                                  |
//! |--------------|----------------------------------------|
//! | *(none)*/`str` | non-empty text                       |
//! | `int`        | `i64`                                  |
//! | `float`      | finite `f64`                           |
//! | `unicode`    | percent-decoded UTF-8 text             |
//! | `path`       | non-empty text, verbatim               |
//! | `:` (bare)   | raw text, empty allowed                |
//!
//! # Example
//!
//! ```rust
//! use strata_router::{CompiledPattern, PathValue, SlashMode};
//!
//! let pattern = CompiledPattern::compile("/a/b/<t:int>/thing/<das*int>", SlashMode::Redirect).unwrap();
//!
//! let result = pattern.match_path("/a/b/1/thing").unwrap();
//! assert_eq!(result.get("t"), Some(&PathValue::Int(1)));
//! assert_eq!(result.get("das"), Some(&PathValue::List(vec![])));
//! ```
//!
//! # Slash Modes
//!
//! [`SlashMode::Strict`] requires the request's trailing slash to match the
//! pattern's. [`SlashMode::Rewrite`] and [`SlashMode::Redirect`] accept either
//! form and report the canonical path through [`PathMatch::redirect`].

#![doc(html_root_url = "https://docs.rs/strata-router/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod converter;
mod error;
mod matcher;
mod methods;
mod params;
mod pattern;

pub use converter::Converter;
pub use error::PatternError;
pub use matcher::PathMatch;
pub use methods::MethodSet;
pub use params::{MatchResult, PathValue};
pub use pattern::{CompiledPattern, Multiplicity, Segment, SlashMode};
