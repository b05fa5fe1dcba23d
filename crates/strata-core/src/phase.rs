//! Chain phases.

use std::fmt;

/// The three phases of a compiled chain.
///
/// ```text
/// request middleware → endpoint middleware → endpoint
///                    → render middleware   → render
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Wraps the whole request; sees only externally provided names.
    Request,
    /// Wraps the endpoint; its result becomes `context`.
    Endpoint,
    /// Wraps the render step; receives `context`.
    Render,
}

impl Phase {
    /// All phases in execution order.
    pub const ALL: [Phase; 3] = [Phase::Request, Phase::Endpoint, Phase::Render];

    /// Returns the lowercase phase name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Request => "request",
            Self::Endpoint => "endpoint",
            Self::Render => "render",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
