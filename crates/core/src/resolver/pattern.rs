//! Regex searches for Inertia render calls.

use once_cell::sync::Lazy;
use regex::Regex;

static RENDER_CALL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"Inertia::render\(\s*['"]([^'"]+)['"]\s*(?:,|\))"#)
        .expect("Inertia::render pattern is valid")
});

static HELPER_CALL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"\binertia\(\s*['"]([^'"]+)['"]\s*(?:,|\))"#)
        .expect("inertia() pattern is valid")
});

/// First component literal passed to `Inertia::render(...)`, falling back to
/// the `inertia(...)` helper. Non-literal arguments never match.
pub fn parse_source_for_component(source: &str) -> Option<String> {
    RENDER_CALL
        .captures(source)
        .or_else(|| HELPER_CALL.captures(source))
        .map(|caps| caps[1].to_string())
}

/// Component rendered by a `Fortify::<view_method>(...)` registration.
pub fn parse_fortify_provider(source: &str, view_method: &str) -> Option<String> {
    let pattern = format!(
        r#"Fortify::{}\s*\([\s\S]*?Inertia::render\(\s*['"]([^'"]+)['"]"#,
        regex::escape(view_method)
    );
    let regex = Regex::new(&pattern).ok()?;
    regex.captures(source).map(|caps| caps[1].to_string())
}
