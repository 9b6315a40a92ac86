//! Combinator implementations for ResolveStrategy.

use super::ResolveStrategy;
use crate::route::Route;

/// Or-else combinator: try first, then second if first returns None.
pub struct OrElse<A, B> {
    first: A,
    second: B,
}

impl<A, B> OrElse<A, B> {
    pub fn new(first: A, second: B) -> Self {
        Self { first, second }
    }
}

impl<A: ResolveStrategy, B: ResolveStrategy> ResolveStrategy for OrElse<A, B> {
    fn resolve(&self, route: &Route) -> Option<String> {
        self.first
            .resolve(route)
            .or_else(|| self.second.resolve(route))
    }

    fn name(&self) -> &'static str {
        "or-else"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::RouteDefaults;
    use crate::route::RouteAction;

    struct Fallback;
    impl ResolveStrategy for Fallback {
        fn resolve(&self, _: &Route) -> Option<String> {
            Some("Fallback".to_string())
        }
        fn name(&self) -> &'static str {
            "fallback"
        }
    }

    #[test]
    fn test_or_else_fallback() {
        let chain = RouteDefaults.or_else(Fallback);
        let bare = Route::new("x", RouteAction::None);
        assert_eq!(chain.resolve(&bare), Some("Fallback".to_string()));

        let with_default = bare.with_default("component", "Home");
        assert_eq!(chain.resolve(&with_default), Some("Home".to_string()));
    }
}
