use crate::resolver::ResolveStrategy;
use crate::route::Route;
use serde_json::Value;

/// `Route::inertia()` routes carry their component in `defaults['component']`.
pub struct RouteDefaults;

impl ResolveStrategy for RouteDefaults {
    fn resolve(&self, route: &Route) -> Option<String> {
        match route.defaults.get("component")? {
            Value::Null => None,
            Value::String(component) if component.is_empty() => None,
            Value::String(component) => Some(component.clone()),
            other => Some(other.to_string()),
        }
    }

    fn name(&self) -> &'static str {
        "route-defaults"
    }
}
