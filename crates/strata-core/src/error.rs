//! Error types for Strata.
//!
//! [`Error`] is the single error type surfaced by the dispatch core. Errors
//! fall into three kinds (see [`ErrorKind`]):
//!
//! | Kind | Variants | When |
//! |---|---|---|
//! | `Compile` | `InvalidUrlPattern`, `ProviderConflict`, `UnresolvedArgument`, `InvalidMiddleware`, `DuplicateMiddleware` | route registration / application bind |
//! | `MatchMiss` | `NoMatch` | dispatch found no route |
//! | `Runtime` | `InvalidEndpoint`, `Handler` | executing a chain |
//!
//! Compile errors are fatal: they abort the bind and no partial route table is
//! ever kept.

use std::fmt;

use strata_router::PatternError;
use thiserror::Error;

use crate::phase::Phase;

/// Result type alias using [`Error`].
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Classification of [`Error`] variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Raised while compiling patterns or chains, before any request.
    Compile,
    /// No route matched; a normal negative outcome.
    MatchMiss,
    /// Raised while executing a compiled chain.
    Runtime,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Compile => "compile",
            Self::MatchMiss => "match_miss",
            Self::Runtime => "runtime",
        })
    }
}

/// Standard error type for Strata.
#[derive(Error, Debug)]
pub enum Error {
    /// A route pattern could not be compiled.
    #[error(transparent)]
    InvalidUrlPattern(#[from] PatternError),

    /// No registered route accepts the method and path.
    #[error("no route matches {method} {path}")]
    NoMatch {
        /// Request method.
        method: String,
        /// Request path.
        path: String,
    },

    /// A chain was executed without a value its functions require, or a route
    /// without an endpoint was executed.
    #[error("invalid endpoint {function}: {message}")]
    InvalidEndpoint {
        /// Name of the function that could not be called.
        function: String,
        /// Human-readable explanation.
        message: String,
    },

    /// More than one source provides the same argument name.
    #[error("conflicting providers for argument '{name}': {}", .sources.join(", "))]
    ProviderConflict {
        /// The contested argument name.
        name: String,
        /// Every source that provides it.
        sources: Vec<String>,
    },

    /// Required arguments have no provider.
    #[error("unresolved {phase} arguments: {}", .missing.join(", "))]
    UnresolvedArgument {
        /// The chain phase that needs them.
        phase: Phase,
        /// The missing argument names, sorted.
        missing: Vec<String>,
    },

    /// A middleware phase is malformed.
    #[error("invalid middleware {name}: {reason}")]
    InvalidMiddleware {
        /// Middleware name.
        name: String,
        /// Human-readable explanation.
        reason: String,
    },

    /// A unique, non-reorderable middleware was included twice.
    #[error("multiple inclusion of unique middleware {name}")]
    DuplicateMiddleware {
        /// Middleware name.
        name: String,
    },

    /// An endpoint, render or middleware function failed.
    #[error("handler failed: {0}")]
    Handler(#[from] anyhow::Error),
}

impl Error {
    /// Creates a no-match error.
    #[must_use]
    pub fn no_match(method: impl fmt::Display, path: impl Into<String>) -> Self {
        Self::NoMatch {
            method: method.to_string(),
            path: path.into(),
        }
    }

    /// Creates an invalid endpoint error.
    #[must_use]
    pub fn invalid_endpoint(function: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidEndpoint {
            function: function.into(),
            message: message.into(),
        }
    }

    /// Creates a provider conflict error.
    #[must_use]
    pub fn provider_conflict(name: impl Into<String>, sources: Vec<String>) -> Self {
        Self::ProviderConflict {
            name: name.into(),
            sources,
        }
    }

    /// Creates an unresolved argument error. Names are sorted for stable output.
    #[must_use]
    pub fn unresolved(phase: Phase, missing: impl IntoIterator<Item = impl Into<String>>) -> Self {
        let mut missing: Vec<String> = missing.into_iter().map(Into::into).collect();
        missing.sort();
        Self::UnresolvedArgument { phase, missing }
    }

    /// Creates an invalid middleware error.
    #[must_use]
    pub fn invalid_middleware(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidMiddleware {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// Creates a duplicate middleware error.
    #[must_use]
    pub fn duplicate_middleware(name: impl Into<String>) -> Self {
        Self::DuplicateMiddleware { name: name.into() }
    }

    /// Wraps a failure raised by user code.
    #[must_use]
    pub fn handler(error: impl Into<anyhow::Error>) -> Self {
        Self::Handler(error.into())
    }

    /// Returns the kind of this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidUrlPattern(_)
            | Self::ProviderConflict { .. }
            | Self::UnresolvedArgument { .. }
            | Self::InvalidMiddleware { .. }
            | Self::DuplicateMiddleware { .. } => ErrorKind::Compile,
            Self::NoMatch { .. } => ErrorKind::MatchMiss,
            Self::InvalidEndpoint { .. } | Self::Handler(_) => ErrorKind::Runtime,
        }
    }

    /// Returns true for errors raised before any request is served.
    #[must_use]
    pub const fn is_compile_error(&self) -> bool {
        matches!(self.kind(), ErrorKind::Compile)
    }

    /// Returns true if no route matched.
    #[must_use]
    pub const fn is_no_match(&self) -> bool {
        matches!(self, Self::NoMatch { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kinds() {
        assert_eq!(
            Error::from(PatternError::new("alf", "no slash")).kind(),
            ErrorKind::Compile
        );
        assert_eq!(Error::no_match("GET", "/x").kind(), ErrorKind::MatchMiss);
        assert_eq!(
            Error::invalid_endpoint("index", "no endpoint").kind(),
            ErrorKind::Runtime
        );
        assert_eq!(
            Error::handler(anyhow::anyhow!("boom")).kind(),
            ErrorKind::Runtime
        );
        assert!(Error::duplicate_middleware("Auth").is_compile_error());
        assert!(Error::no_match("GET", "/").is_no_match());
    }

    #[test]
    fn test_provider_conflict_display() {
        let err = Error::provider_conflict("user", vec!["AuthA".to_string(), "AuthB".to_string()]);
        let msg = err.to_string();
        assert!(msg.contains("'user'"));
        assert!(msg.contains("AuthA, AuthB"));
    }

    #[test]
    fn test_unresolved_sorted() {
        let err = Error::unresolved(Phase::Endpoint, ["zeta", "alpha"]);
        match &err {
            Error::UnresolvedArgument { phase, missing } => {
                assert_eq!(*phase, Phase::Endpoint);
                assert_eq!(missing, &vec!["alpha".to_string(), "zeta".to_string()]);
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(err.to_string(), "unresolved endpoint arguments: alpha, zeta");
    }

    #[test]
    fn test_pattern_error_is_transparent() {
        let err = Error::from(PatternError::new("/bet//", "empty path segment"));
        assert!(err.to_string().contains("/bet//"));
    }
}
