//! Segment converters.
//!
//! A converter turns the raw text of one path segment into a [`PathValue`],
//! or rejects it. Rejection is a match miss, never an error.

use crate::params::PathValue;

/// A named segment converter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Converter {
    /// Generic text (`str`, or no converter given). Rejects empty segments.
    #[default]
    Text,
    /// Signed 64-bit integer (`int`).
    Int,
    /// Finite float (`float`).
    Float,
    /// Percent-decoded UTF-8 text (`unicode`).
    Unicode,
    /// Verbatim text (`path`). Rejects empty segments.
    Path,
    /// No-op converter, spelled as a bare trailing `:`. Accepts anything.
    Raw,
}

impl Converter {
    /// Resolves a converter from its pattern spelling.
    ///
    /// `None` means no converter was written; `Some("")` is the raw converter.
    /// Unknown names return `None`.
    #[must_use]
    pub fn from_spelling(spelling: Option<&str>) -> Option<Self> {
        match spelling {
            None => Some(Self::Text),
            Some("") => Some(Self::Raw),
            Some("str") => Some(Self::Text),
            Some("int") => Some(Self::Int),
            Some("float") => Some(Self::Float),
            Some("unicode") => Some(Self::Unicode),
            Some("path") => Some(Self::Path),
            Some(_) => None,
        }
    }

    /// Converts one raw path segment.
    #[must_use]
    pub fn convert(&self, segment: &str) -> Option<PathValue> {
        match self {
            Self::Raw => Some(PathValue::Text(segment.to_string())),
            _ if segment.is_empty() => None,
            Self::Text | Self::Path => Some(PathValue::Text(segment.to_string())),
            Self::Unicode => urlencoding::decode(segment)
                .ok()
                .map(|text| PathValue::Text(text.into_owned())),
            Self::Int => segment.parse::<i64>().ok().map(PathValue::Int),
            Self::Float => segment
                .parse::<f64>()
                .ok()
                .filter(|value| value.is_finite())
                .map(PathValue::Float),
        }
    }
}
