//! Pattern compilation errors.

use thiserror::Error;

/// A route pattern that could not be compiled.
///
/// Every way a pattern can be malformed (missing leading slash, empty segment,
/// illegal variable name, unknown converter, misplaced multiplicity) produces
/// this one error kind. The `reason` is for humans only.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid URL pattern {pattern:?}: {reason}")]
pub struct PatternError {
    /// The offending pattern text.
    pub pattern: String,
    /// Human-readable explanation.
    pub reason: String,
}

impl PatternError {
    /// Creates a new pattern error.
    pub fn new(pattern: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            reason: reason.into(),
        }
    }
}
