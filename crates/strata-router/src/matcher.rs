//! Path matching against compiled patterns.
//!
//! Matching walks the pattern's segments in order against the request path's
//! segments. There is no backtracking: an optional variable takes a segment
//! whenever one remains and converts, and a `+`/`*` variable takes everything
//! left. A miss is `None`, never an error.

use crate::params::{MatchResult, PathValue};
use crate::pattern::{CompiledPattern, Multiplicity, Segment, SlashMode};

/// Result of matching a request path, including slash canonicalization.
#[derive(Debug, Clone, PartialEq)]
pub struct PathMatch {
    /// The extracted variable bindings.
    pub values: MatchResult,
    /// Canonical path when the request's trailing slash differs from the
    /// pattern's (only under [`SlashMode::Rewrite`] or [`SlashMode::Redirect`]).
    pub redirect: Option<String>,
}

impl PathMatch {
    /// Returns true if the request path was not in canonical form.
    #[must_use]
    pub fn needs_redirect(&self) -> bool {
        self.redirect.is_some()
    }
}

/// A request path split into segments.
#[derive(Debug)]
struct SplitPath<'a> {
    segments: Vec<&'a str>,
    trailing_slash: bool,
    /// The bare root path, canonical under every pattern.
    root: bool,
}

fn split_path(path: &str) -> SplitPath<'_> {
    let body = path.strip_prefix('/').unwrap_or(path);
    if body.is_empty() {
        return SplitPath {
            segments: Vec::new(),
            trailing_slash: true,
            root: true,
        };
    }

    let (body, trailing_slash) = match body.strip_suffix('/') {
        Some(stripped) => (stripped, true),
        None => (body, false),
    };

    SplitPath {
        segments: body.split('/').collect(),
        trailing_slash,
        root: false,
    }
}

impl CompiledPattern {
    /// Matches a path, returning the variable bindings.
    ///
    /// Slash canonicalization is applied according to the pattern's
    /// [`SlashMode`], but the canonical form is discarded; use
    /// [`match_request`](Self::match_request) to learn about redirects.
    ///
    /// # Example
    ///
    /// ```rust
    /// use strata_router::{CompiledPattern, MatchResult, PathValue, SlashMode};
    ///
    /// let pattern = CompiledPattern::compile("/a/b/<t:int>/thing/<das+int>", SlashMode::Redirect).unwrap();
    ///
    /// let expected: MatchResult = vec![
    ///     ("t", PathValue::from(1)),
    ///     ("das", PathValue::from(vec![1, 2, 3, 4])),
    /// ]
    /// .into_iter()
    /// .collect();
    /// assert_eq!(pattern.match_path("/a/b/1/thing/1/2/3/4"), Some(expected));
    ///
    /// assert_eq!(pattern.match_path("/a/b/1/thing/hi/"), None);
    /// assert_eq!(pattern.match_path("/a/b/1/thing/"), None);
    /// ```
    #[must_use]
    pub fn match_path(&self, path: &str) -> Option<MatchResult> {
        self.match_request(path).map(|m| m.values)
    }

    /// Matches a path and reports whether it should be canonicalized.
    #[must_use]
    pub fn match_request(&self, path: &str) -> Option<PathMatch> {
        let split = split_path(path);

        let slash_differs = !split.root && split.trailing_slash != self.has_trailing_slash();
        if slash_differs && self.slash_mode() == SlashMode::Strict {
            return None;
        }

        let values = self.bind_segments(&split.segments)?;

        let redirect = slash_differs.then(|| self.canonical_path(path));
        if let Some(location) = &redirect {
            tracing::trace!(
                pattern = self.as_str(),
                path,
                location = location.as_str(),
                "path matched in non-canonical form"
            );
        }

        Some(PathMatch { values, redirect })
    }

    fn bind_segments(&self, segments: &[&str]) -> Option<MatchResult> {
        let mut values = MatchResult::new();
        let mut index = 0;

        for segment in self.segments() {
            match segment {
                Segment::Literal(text) => {
                    if segments.get(index) != Some(&text.as_str()) {
                        return None;
                    }
                    index += 1;
                }
                Segment::Variable {
                    name,
                    converter,
                    multiplicity,
                } => match multiplicity {
                    Multiplicity::One => {
                        let raw = segments.get(index)?;
                        values.insert(name.as_str(), converter.convert(raw)?);
                        index += 1;
                    }
                    Multiplicity::Optional => {
                        if let Some(value) = segments.get(index).and_then(|raw| converter.convert(raw)) {
                            values.insert(name.as_str(), value);
                            index += 1;
                        }
                    }
                    Multiplicity::OneOrMore | Multiplicity::ZeroOrMore => {
                        let rest = segments.get(index..).unwrap_or_default();
                        if rest.is_empty() && *multiplicity == Multiplicity::OneOrMore {
                            return None;
                        }
                        let items = rest
                            .iter()
                            .map(|raw| converter.convert(raw))
                            .collect::<Option<Vec<_>>>()?;
                        values.insert(name.as_str(), PathValue::List(items));
                        index = segments.len();
                    }
                },
            }
        }

        (index == segments.len()).then_some(values)
    }

    fn canonical_path(&self, path: &str) -> String {
        if self.has_trailing_slash() {
            format!("{path}/")
        } else {
            match path.trim_end_matches('/') {
                "" => "/".to_string(),
                trimmed => trimmed.to_string(),
            }
        }
    }
}
