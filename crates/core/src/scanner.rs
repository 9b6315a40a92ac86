//! Route scanning and manifest assembly.

use crate::config::RouteFilter;
use crate::manifest::{ManifestEntry, RouteParameter};
use crate::resolver::{ComponentResolver, SkipReason, diagnose_skip_reason};
use crate::route::{Route, RouteSource};
use glob::Pattern;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, warn};

static OPTIONAL_PARAM: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{(\w+)\?\}").expect("optional parameter pattern is valid"));

static REQUIRED_PARAM: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{(\w+)\}").expect("parameter pattern is valid"));

static ANY_PARAM: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{(\w+)(\?)?\}").expect("parameter pattern is valid"));

/// Verbose generation report.
#[derive(Debug, Default)]
pub struct ScanReport {
    pub included: Vec<(String, String)>,
    pub skipped: Vec<(String, SkipReason)>,
}

pub struct RouteScanner<S> {
    source: S,
    resolver: ComponentResolver,
}

impl<S: RouteSource> RouteScanner<S> {
    pub fn new(source: S, resolver: ComponentResolver) -> Self {
        Self { source, resolver }
    }

    pub fn resolver(&self) -> &ComponentResolver {
        &self.resolver
    }

    /// All GET routes that are not in the `api` middleware group.
    pub fn scan(&self) -> Vec<Route> {
        self.source
            .routes()
            .into_iter()
            .filter(|route| route.is_get() && !route.middleware_groups.iter().any(|g| g == "api"))
            .collect()
    }

    /// Keep routes whose raw URI matches an include glob (if any) and no exclude glob.
    pub fn filter_by_config(&self, routes: Vec<Route>, filter: &RouteFilter) -> Vec<Route> {
        let include = compile_patterns(&filter.include);
        let exclude = compile_patterns(&filter.exclude);

        routes
            .into_iter()
            .filter(|route| {
                let included =
                    include.is_empty() || include.iter().any(|p| p.matches(&route.uri));
                included && !exclude.iter().any(|p| p.matches(&route.uri))
            })
            .collect()
    }

    /// Build manifest entries; routes without a resolvable component are dropped.
    pub fn build_manifest(&self, filter: &RouteFilter) -> Vec<ManifestEntry> {
        let routes = self.filter_by_config(self.scan(), filter);

        routes
            .iter()
            .filter_map(|route| {
                let Some(component) = self.resolver.resolve(route) else {
                    debug!("No component for {}", route.uri);
                    return None;
                };
                Some(ManifestEntry {
                    pattern: route_pattern(&route.uri),
                    component,
                    middleware: route.effective_middleware(),
                    parameters: route_parameters(&route.uri),
                    name: route.name.clone(),
                })
            })
            .collect()
    }

    /// Per-route inclusion/exclusion with reasons. Does not affect the manifest.
    pub fn report(&self, filter: &RouteFilter) -> ScanReport {
        let all = self.scan();
        let filtered = self.filter_by_config(all.clone(), filter);

        let mut report = ScanReport::default();
        for route in &filtered {
            match self.resolver.resolve(route) {
                Some(component) => report.included.push((route.uri.clone(), component)),
                None => report
                    .skipped
                    .push((route.uri.clone(), diagnose_skip_reason(route))),
            }
        }

        for route in &all {
            if !filtered.iter().any(|f| f.uri == route.uri) {
                report
                    .skipped
                    .push((route.uri.clone(), SkipReason::ExcludedByConfig));
            }
        }
        report
    }
}

/// `*` already crosses `/`, so a run of stars means the same as one; `glob`
/// only accepts `**` as a whole path component.
fn collapse_stars(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        if c == '*' && out.ends_with('*') {
            continue;
        }
        out.push(c);
    }
    out
}

fn compile_patterns(patterns: &[String]) -> Vec<Pattern> {
    patterns
        .iter()
        .filter_map(|raw| match Pattern::new(&collapse_stars(raw)) {
            Ok(pattern) => Some(pattern),
            Err(e) => {
                warn!("Ignoring invalid route pattern '{}': {}", raw, e);
                None
            }
        })
        .collect()
}

/// `users/{user?}` -> `/users/:user?`, `users/{user}` -> `/users/:user`.
pub fn route_pattern(uri: &str) -> String {
    let pattern = OPTIONAL_PARAM.replace_all(uri, ":$1?");
    let pattern = REQUIRED_PARAM.replace_all(&pattern, ":$1");
    if pattern.starts_with('/') {
        pattern.into_owned()
    } else {
        format!("/{}", pattern)
    }
}

/// Route parameters in URI order.
pub fn route_parameters(uri: &str) -> Vec<RouteParameter> {
    ANY_PARAM
        .captures_iter(uri)
        .map(|caps| RouteParameter {
            name: caps[1].to_string(),
            required: caps.get(2).is_none(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::route::RouteAction;

    fn scanner(routes: Vec<Route>) -> RouteScanner<Vec<Route>> {
        RouteScanner::new(routes, ComponentResolver::new())
    }

    fn uris(routes: &[Route]) -> Vec<&str> {
        routes.iter().map(|r| r.uri.as_str()).collect()
    }

    #[test]
    fn test_route_pattern() {
        assert_eq!(route_pattern("users/{user}"), "/users/:user");
        assert_eq!(
            route_pattern("users/{user}/posts/{post}"),
            "/users/:user/posts/:post"
        );
        assert_eq!(route_pattern("users/{user?}"), "/users/:user?");
        assert_eq!(route_pattern("/"), "/");
        assert_eq!(route_pattern(""), "/");
    }

    #[test]
    fn test_route_parameters() {
        assert_eq!(
            route_parameters("users/{user}/posts/{post?}"),
            vec![
                RouteParameter {
                    name: "user".to_string(),
                    required: true
                },
                RouteParameter {
                    name: "post".to_string(),
                    required: false
                },
            ]
        );
        assert!(route_parameters("about").is_empty());
    }

    #[test]
    fn test_scan_keeps_get_and_drops_api() {
        let s = scanner(vec![
            Route::new("test", RouteAction::None),
            Route::new("test", RouteAction::None).with_methods(["POST"]),
            Route::new("api/data", RouteAction::None).with_groups(["api"]),
            Route::new("lower", RouteAction::None).with_methods(["get"]),
        ]);
        assert_eq!(uris(&s.scan()), vec!["test", "lower"]);
    }

    #[test]
    fn test_filter_by_exclude() {
        let s = scanner(Vec::new());
        let routes = vec![
            Route::new("users", RouteAction::None),
            Route::new("admin/dashboard", RouteAction::None),
            Route::new("api/data", RouteAction::None),
        ];
        let filter = RouteFilter {
            include: Vec::new(),
            exclude: vec!["admin*".to_string(), "api*".to_string()],
        };
        assert_eq!(uris(&s.filter_by_config(routes, &filter)), vec!["users"]);
    }

    #[test]
    fn test_filter_matches_raw_uri() {
        let s = scanner(Vec::new());
        let routes = vec![
            Route::new("users/{user}", RouteAction::None),
            Route::new("posts", RouteAction::None),
        ];
        let filter = RouteFilter {
            include: vec!["users/{user}".to_string()],
            exclude: Vec::new(),
        };
        assert_eq!(
            uris(&s.filter_by_config(routes, &filter)),
            vec!["users/{user}"]
        );
    }

    #[test]
    fn test_double_star_matches_like_single() {
        let s = scanner(Vec::new());
        let routes = vec![
            Route::new("admin/dashboard", RouteAction::None),
            Route::new("users", RouteAction::None),
            Route::new("reports/2024/q1", RouteAction::None),
        ];
        let filter = RouteFilter {
            include: Vec::new(),
            exclude: vec!["admin**".to_string(), "reports/**/q1".to_string()],
        };
        assert_eq!(uris(&s.filter_by_config(routes, &filter)), vec!["users"]);
        assert_eq!(collapse_stars("a***b*"), "a*b*");
    }

    #[test]
    fn test_invalid_pattern_is_ignored() {
        let s = scanner(Vec::new());
        let routes = vec![Route::new("users", RouteAction::None)];
        let filter = RouteFilter {
            include: Vec::new(),
            exclude: vec!["[".to_string()],
        };
        assert_eq!(uris(&s.filter_by_config(routes, &filter)), vec!["users"]);
    }

    #[test]
    fn test_build_manifest_drops_unresolved() {
        let s = RouteScanner::new(
            vec![
                Route::new("about", RouteAction::None)
                    .with_default("component", "About")
                    .with_groups(["web"])
                    .with_middleware(["web", "auth", "auth"])
                    .named("about"),
                Route::new("contact", RouteAction::None),
            ],
            ComponentResolver::new().with(crate::resolver::RouteDefaults),
        );

        let entries = s.build_manifest(&RouteFilter::default());
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].pattern, "/about");
        assert_eq!(entries[0].component, "About");
        assert_eq!(entries[0].middleware, vec!["web", "auth"]);
        assert_eq!(entries[0].name.as_deref(), Some("about"));
    }

    #[test]
    fn test_report_reasons() {
        let s = RouteScanner::new(
            vec![
                Route::new("about", RouteAction::None).with_default("component", "About"),
                Route::new("contact", RouteAction::None),
                Route::new("telescope/requests", RouteAction::None),
            ],
            ComponentResolver::new().with(crate::resolver::RouteDefaults),
        );
        let filter = RouteFilter {
            include: Vec::new(),
            exclude: vec!["telescope*".to_string()],
        };

        let report = s.report(&filter);
        assert_eq!(
            report.included,
            vec![("about".to_string(), "About".to_string())]
        );
        assert_eq!(
            report.skipped,
            vec![
                ("contact".to_string(), SkipReason::NoAction),
                ("telescope/requests".to_string(), SkipReason::ExcludedByConfig),
            ]
        );
        assert_eq!(s.build_manifest(&filter).len(), 1);
    }
}
