//! Component resolution.
//!
//! Each strategy implements [`ResolveStrategy`] and maps a route to an
//! optional Inertia component name. [`ComponentResolver`] tries them in
//! priority order and keeps the first hit:
//!
//! 1. `Route::inertia('/path', 'Component')`: read from route defaults
//! 2. closures: `Inertia::render('Component')` / `inertia('Component')` in the closure source
//! 3. Fortify controllers: the matching `Fortify::*View()` registration
//! 4. controllers (including invokable ones): the same calls inside the method body
//!
//! Dynamic names (`Inertia::render($component)`), renders behind helper
//! methods and any render call after the first one are not resolved.

mod combinator;
pub mod pattern;
pub mod strategy;

pub use combinator::OrElse;
pub use pattern::{parse_fortify_provider, parse_source_for_component};
pub use strategy::{
    ClosureSource, ControllerSource, FortifyViews, RouteDefaults, parse_controller_file,
};

use crate::project::ProjectLayout;
use crate::route::{Route, RouteAction};
use std::fmt;
use std::sync::Arc;
use tracing::trace;

/// A component resolution heuristic.
pub trait ResolveStrategy: Send + Sync {
    /// Returns `None` if the strategy doesn't apply or finds nothing.
    fn resolve(&self, route: &Route) -> Option<String>;

    fn name(&self) -> &'static str;

    /// If `self` returns `None`, try `other`.
    fn or_else<S: ResolveStrategy>(self, other: S) -> OrElse<Self, S>
    where
        Self: Sized,
    {
        OrElse::new(self, other)
    }
}

/// Ordered chain of strategies; the first non-`None` result wins.
pub struct ComponentResolver {
    strategies: Vec<Box<dyn ResolveStrategy>>,
}

impl ComponentResolver {
    pub fn new() -> Self {
        Self {
            strategies: Vec::new(),
        }
    }

    /// The four built-in strategies in contract order.
    pub fn standard(project: Arc<ProjectLayout>) -> Self {
        Self::new()
            .with(RouteDefaults)
            .with(ClosureSource::new(project.clone()))
            .with(FortifyViews::new(project.clone()))
            .with(ControllerSource::new(project))
    }

    pub fn with(mut self, strategy: impl ResolveStrategy + 'static) -> Self {
        self.push(strategy);
        self
    }

    /// Append a strategy with the lowest priority.
    pub fn push(&mut self, strategy: impl ResolveStrategy + 'static) {
        self.strategies.push(Box::new(strategy));
    }

    /// Insert a strategy at `index` in the priority order.
    pub fn insert(&mut self, index: usize, strategy: impl ResolveStrategy + 'static) {
        let index = index.min(self.strategies.len());
        self.strategies.insert(index, Box::new(strategy));
    }

    pub fn strategy_names(&self) -> Vec<&'static str> {
        self.strategies.iter().map(|s| s.name()).collect()
    }

    pub fn resolve(&self, route: &Route) -> Option<String> {
        self.strategies.iter().find_map(|strategy| {
            let found = strategy.resolve(route);
            if let Some(component) = &found {
                trace!("{} resolved {} -> {}", strategy.name(), route.uri, component);
            }
            found
        })
    }
}

impl Default for ComponentResolver {
    fn default() -> Self {
        Self::new()
    }
}

/// Why a route produced no manifest entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    NoRenderInClosure,
    NoAction,
    NoRenderInController,
    ExcludedByConfig,
}

impl SkipReason {
    pub fn message(&self) -> &'static str {
        match self {
            SkipReason::NoRenderInClosure => {
                "No Inertia::render() or inertia() call found in closure"
            }
            SkipReason::NoAction => "No action defined",
            SkipReason::NoRenderInController => {
                "No Inertia::render() or inertia() call found in controller method"
            }
            SkipReason::ExcludedByConfig => "Excluded by config filter",
        }
    }
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// Re-derive a reason for an unresolved route from its action shape.
pub fn diagnose_skip_reason(route: &Route) -> SkipReason {
    match route.action {
        RouteAction::Closure { .. } => SkipReason::NoRenderInClosure,
        RouteAction::None => SkipReason::NoAction,
        RouteAction::Controller { .. } | RouteAction::Invokable { .. } => {
            SkipReason::NoRenderInController
        }
    }
}
