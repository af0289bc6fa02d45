//! Concrete request path to catalog page matching.
//!
//! Catalog keys use `[id]` for dynamic segments. Matching converts them into
//! Casbin `keyMatch2` patterns (`:id`) so `/blog/42/edit` resolves to
//! `/blog/[id]/edit`. Static pages are tried before dynamic ones, which keeps
//! `/blog/create` from being captured by `/blog/[id]`.
use crate::{AuthzError, AuthzResult, Page};
use casbin::function_map::key_match2;

/// Casbin `keyMatch2` pattern for a catalog page.
pub fn page_pattern(page: Page) -> String {
    page.path()
        .split('/')
        .map(|segment| {
            match segment
                .strip_prefix('[')
                .and_then(|rest| rest.strip_suffix(']'))
            {
                Some(name) => format!(":{name}"),
                None => segment.to_string(),
            }
        })
        .collect::<Vec<_>>()
        .join("/")
}

/// Map a concrete request path onto its catalog page.
pub fn resolve_path(path: &str) -> AuthzResult<Page> {
    let normalized = normalize(path);
    if let Ok(page) = normalized.parse::<Page>() {
        if !page.is_dynamic() {
            return Ok(page);
        }
    }
    Page::ALL
        .into_iter()
        .filter(|page| page.is_dynamic())
        .find(|page| key_match2(normalized, &page_pattern(*page)))
        .ok_or_else(|| AuthzError::UnmatchedPath(path.to_string()))
}

fn normalize(path: &str) -> &str {
    let path = path.split(['?', '#']).next().unwrap_or(path);
    match path.trim_end_matches('/') {
        "" => "/",
        trimmed => trimmed,
    }
}
