//! Merging route-local and application middleware.

use strata_core::{Error, Result};
use tracing::trace;

use crate::middleware::BoxedMiddleware;

/// Merges route-local middleware into the application's list.
///
/// Application middleware comes first, then the route-local ones in order.
/// A unique middleware whose name is already present is skipped when it is
/// reorderable.
///
/// # Errors
///
/// Returns [`Error::DuplicateMiddleware`] when a unique, non-reorderable
/// middleware would be included twice.
pub fn merge_middlewares(
    route_local: &[BoxedMiddleware],
    application: &[BoxedMiddleware],
) -> Result<Vec<BoxedMiddleware>> {
    let mut merged: Vec<BoxedMiddleware> = application.to_vec();
    for mw in route_local {
        let present = merged.iter().any(|m| m.name() == mw.name());
        if mw.unique() && present {
            if mw.reorderable() {
                trace!(middleware = %mw.name(), "skipping duplicate middleware");
                continue;
            }
            return Err(Error::duplicate_middleware(mw.name()));
        }
        merged.push(mw.clone());
    }
    Ok(merged)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FnMiddleware;

    fn names(list: &[BoxedMiddleware]) -> Vec<&str> {
        list.iter().map(|m| m.name()).collect()
    }

    #[test]
    fn test_application_first() {
        let app = vec![FnMiddleware::new("a").boxed()];
        let local = vec![FnMiddleware::new("b").boxed()];
        let merged = merge_middlewares(&local, &app).unwrap();
        assert_eq!(names(&merged), ["a", "b"]);
    }

    #[test]
    fn test_reorderable_duplicate_is_skipped() {
        let app = vec![FnMiddleware::new("session").boxed()];
        let local = vec![
            FnMiddleware::new("session").boxed(),
            FnMiddleware::new("form").boxed(),
        ];
        let merged = merge_middlewares(&local, &app).unwrap();
        assert_eq!(names(&merged), ["session", "form"]);
    }

    #[test]
    fn test_non_reorderable_duplicate_is_rejected() {
        let app = vec![FnMiddleware::new("tx").boxed()];
        let local = vec![FnMiddleware::new("tx").reorderable(false).boxed()];
        let err = merge_middlewares(&local, &app).unwrap_err();
        assert!(matches!(err, Error::DuplicateMiddleware { ref name } if name == "tx"));
    }

    #[test]
    fn test_non_unique_may_repeat() {
        let app = vec![FnMiddleware::new("log").unique(false).boxed()];
        let local = vec![FnMiddleware::new("log").unique(false).boxed()];
        let merged = merge_middlewares(&local, &app).unwrap();
        assert_eq!(names(&merged), ["log", "log"]);
    }

    #[test]
    fn test_duplicates_within_route_list() {
        let local = vec![
            FnMiddleware::new("x").reorderable(false).boxed(),
            FnMiddleware::new("x").reorderable(false).boxed(),
        ];
        assert!(merge_middlewares(&local, &[]).is_err());
    }
}
