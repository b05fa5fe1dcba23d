//! Route pattern compiler.
//!
//! Patterns are `/`-separated sequences of literal segments and variables:
//!
//! ```text
//! /a/b/<t:int>/thing/<das+int>
//!       │             │  │ └── converter
//!       │             │  └──── multiplicity marker (?, +, *)
//!       │             └─────── variable name
//!       └───────────────────── literal
//! ```
//!
//! A bare `<name:>` selects the raw converter. Only the final segment may
//! carry the `+` or `*` marker, since those consume every remaining segment.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::converter::Converter;
use crate::error::PatternError;

/// Number of segments stored inline before spilling to the heap.
const INLINE_SEGMENTS: usize = 6;

/// How many path segments a variable binds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Multiplicity {
    /// Exactly one segment.
    #[default]
    One,
    /// Zero or one segment (`?`).
    Optional,
    /// One or more trailing segments (`+`).
    OneOrMore,
    /// Zero or more trailing segments (`*`).
    ZeroOrMore,
}

impl Multiplicity {
    fn from_marker(marker: char) -> Option<Self> {
        match marker {
            '?' => Some(Self::Optional),
            '+' => Some(Self::OneOrMore),
            '*' => Some(Self::ZeroOrMore),
            _ => None,
        }
    }

    /// Returns true for `+` and `*`, which bind a list of segments.
    #[must_use]
    pub const fn is_multi(&self) -> bool {
        matches!(self, Self::OneOrMore | Self::ZeroOrMore)
    }
}

/// One compiled pattern segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Matched verbatim against the path segment.
    Literal(String),
    /// Binds and converts path segments.
    Variable {
        /// Variable name (letters, digits, underscore).
        name: String,
        /// Converter applied to each bound segment.
        converter: Converter,
        /// How many segments the variable binds.
        multiplicity: Multiplicity,
    },
}

/// Trailing-slash canonicalization policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SlashMode {
    /// The path's trailing slash must match the pattern's exactly.
    Strict,
    /// Either form matches; the request is served as if canonical.
    Rewrite,
    /// Either form matches; the caller should redirect to the canonical form.
    #[default]
    Redirect,
}

impl SlashMode {
    /// Returns the lowercase name of the mode.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Strict => "strict",
            Self::Rewrite => "rewrite",
            Self::Redirect => "redirect",
        }
    }
}

impl fmt::Display for SlashMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SlashMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "strict" => Ok(Self::Strict),
            "rewrite" => Ok(Self::Rewrite),
            "redirect" => Ok(Self::Redirect),
            other => Err(format!(
                "unknown slash mode '{other}', expected 'strict', 'rewrite' or 'redirect'"
            )),
        }
    }
}

/// A route pattern compiled into segments.
///
/// # Example
///
/// ```rust
/// use strata_router::{CompiledPattern, SlashMode};
///
/// let pattern = CompiledPattern::compile("/a/b/<t:int>/thing/<das+int>", SlashMode::Redirect).unwrap();
/// assert_eq!(pattern.segments().len(), 5);
/// assert_eq!(pattern.variable_names().collect::<Vec<_>>(), vec!["t", "das"]);
///
/// assert!(CompiledPattern::compile("alf", SlashMode::Strict).is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledPattern {
    source: String,
    segments: SmallVec<[Segment; INLINE_SEGMENTS]>,
    trailing_slash: bool,
    slash_mode: SlashMode,
}

impl CompiledPattern {
    /// Compiles a pattern string.
    ///
    /// # Errors
    ///
    /// Returns [`PatternError`] if the pattern does not start with `/`, contains
    /// an empty segment, declares an illegal variable name, names an unknown
    /// converter, or places a `+`/`*` variable anywhere but last.
    pub fn compile(pattern: &str, slash_mode: SlashMode) -> Result<Self, PatternError> {
        let fail = |reason: String| PatternError::new(pattern, reason);

        let Some(body) = pattern.strip_prefix('/') else {
            return Err(fail("pattern must start with '/'".to_string()));
        };

        let mut tokens: Vec<&str> = body.split('/').collect();

        let trailing_slash = tokens.last().is_some_and(|last| last.is_empty());
        if trailing_slash {
            tokens.pop();
        }

        let mut segments = SmallVec::with_capacity(tokens.len());
        for token in &tokens {
            if token.is_empty() {
                return Err(fail("empty path segment".to_string()));
            }
            segments.push(parse_segment(token).map_err(fail)?);
        }

        let last = segments.len().saturating_sub(1);
        for (i, segment) in segments.iter().enumerate() {
            if let Segment::Variable { name, multiplicity, .. } = segment {
                if multiplicity.is_multi() && i != last {
                    return Err(fail(format!(
                        "variable '{name}' consumes remaining segments and must be last"
                    )));
                }
            }
        }

        tracing::trace!(pattern, segments = segments.len(), "compiled URL pattern");

        Ok(Self {
            source: pattern.to_string(),
            segments,
            trailing_slash,
            slash_mode,
        })
    }

    /// Returns the original pattern text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Returns the compiled segments in order.
    #[must_use]
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Returns true if the pattern ends with `/`.
    #[must_use]
    pub fn has_trailing_slash(&self) -> bool {
        self.trailing_slash
    }

    /// Returns the slash canonicalization mode.
    #[must_use]
    pub fn slash_mode(&self) -> SlashMode {
        self.slash_mode
    }

    /// Returns the names of all variables, in pattern order.
    pub fn variable_names(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(|segment| match segment {
            Segment::Variable { name, .. } => Some(name.as_str()),
            Segment::Literal(_) => None,
        })
    }
}

impl fmt::Display for CompiledPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

fn parse_segment(token: &str) -> Result<Segment, String> {
    let Some(inner) = token.strip_prefix('<').and_then(|t| t.strip_suffix('>')) else {
        if token.contains('<') || token.contains('>') {
            return Err(format!("unbalanced variable delimiters in '{token}'"));
        }
        return Ok(Segment::Literal(token.to_string()));
    };

    let name_len = inner
        .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
        .unwrap_or(inner.len());
    let (name, rest) = inner.split_at(name_len);
    if name.is_empty() {
        return Err(format!("variable in '{token}' has no name"));
    }

    let mut chars = rest.chars();
    let (multiplicity, rest) = match chars.next().and_then(Multiplicity::from_marker) {
        Some(multiplicity) => (multiplicity, chars.as_str()),
        None => (Multiplicity::One, rest),
    };

    let spelling = match rest.strip_prefix(':') {
        Some(converter) => Some(converter),
        None if rest.is_empty() => None,
        None if multiplicity != Multiplicity::One => Some(rest),
        None => {
            return Err(format!("illegal character in variable name '{inner}'"));
        }
    };

    let converter = Converter::from_spelling(spelling).ok_or_else(|| {
        format!(
            "unknown converter '{}' for variable '{name}'",
            spelling.unwrap_or_default()
        )
    })?;

    Ok(Segment::Variable {
        name: name.to_string(),
        converter,
        multiplicity,
    })
}
