//! Read-only view of host framework routes.
//!
//! The host router is not reachable from here, so routes arrive as a JSON
//! dump (one record per route) and are exposed through [`RouteSource`].

use crate::error::{Force10Error, Result};
use indexmap::IndexSet;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Location of a closure action inside its defining file (1-based, inclusive).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SourceSpan {
    pub file: PathBuf,
    pub start_line: usize,
    pub end_line: usize,
}

/// What a route dispatches to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteAction {
    Closure { location: Option<SourceSpan> },
    Controller { class: String, method: String },
    Invokable { class: String },
    None,
}

impl RouteAction {
    /// Parse a Laravel `uses` string (`Class@method`, `Class` or `Closure`).
    pub fn from_uses(uses: &str) -> Self {
        let uses = uses.trim();
        if uses.is_empty() {
            return RouteAction::None;
        }
        if uses == "Closure" {
            return RouteAction::Closure { location: None };
        }
        match uses.split_once('@') {
            Some((class, method)) => RouteAction::Controller {
                class: class.to_string(),
                method: method.to_string(),
            },
            None => RouteAction::Invokable {
                class: uses.to_string(),
            },
        }
    }

    /// The `uses` identifier the host would report for class-based actions.
    pub fn uses(&self) -> Option<String> {
        match self {
            RouteAction::Controller { class, method } => Some(format!("{}@{}", class, method)),
            RouteAction::Invokable { class } => Some(class.clone()),
            _ => None,
        }
    }

    /// Class and method to inspect; invokable classes dispatch to `__invoke`.
    pub fn class_method(&self) -> Option<(&str, &str)> {
        match self {
            RouteAction::Controller { class, method } => Some((class.as_str(), method.as_str())),
            RouteAction::Invokable { class } => Some((class.as_str(), "__invoke")),
            _ => None,
        }
    }

    pub fn is_closure(&self) -> bool {
        matches!(self, RouteAction::Closure { .. })
    }
}

#[derive(Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
enum TaggedAction {
    Closure {
        #[serde(flatten)]
        location: Option<SourceSpan>,
    },
    Controller {
        class: String,
        method: String,
    },
    Invokable {
        class: String,
    },
    None,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawAction {
    Uses(String),
    Tagged(TaggedAction),
}

impl<'de> Deserialize<'de> for RouteAction {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = Option::<RawAction>::deserialize(deserializer)?;
        Ok(match raw {
            None => RouteAction::None,
            Some(RawAction::Uses(uses)) => RouteAction::from_uses(&uses),
            Some(RawAction::Tagged(tagged)) => match tagged {
                TaggedAction::Closure { location } => RouteAction::Closure { location },
                TaggedAction::Controller { class, method } => {
                    RouteAction::Controller { class, method }
                }
                TaggedAction::Invokable { class } => RouteAction::Invokable { class },
                TaggedAction::None => RouteAction::None,
            },
        })
    }
}

fn default_action() -> RouteAction {
    RouteAction::None
}

#[derive(Debug, Clone, Deserialize)]
pub struct Route {
    pub uri: String,
    pub methods: Vec<String>,
    #[serde(default = "default_action")]
    pub action: RouteAction,
    /// Middleware attached directly to the route's action (group names included).
    #[serde(default)]
    pub middleware_groups: Vec<String>,
    /// Middleware gathered from the route and its controller.
    #[serde(default)]
    pub middleware: Vec<String>,
    #[serde(default)]
    pub defaults: HashMap<String, Value>,
    #[serde(default)]
    pub name: Option<String>,
}

impl Route {
    pub fn new(uri: impl Into<String>, action: RouteAction) -> Self {
        Self {
            uri: uri.into(),
            methods: vec!["GET".to_string(), "HEAD".to_string()],
            action,
            middleware_groups: Vec::new(),
            middleware: Vec::new(),
            defaults: HashMap::new(),
            name: None,
        }
    }

    pub fn with_methods<I, S>(mut self, methods: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.methods = methods.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_groups<I, S>(mut self, groups: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.middleware_groups = groups.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_middleware<I, S>(mut self, middleware: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.middleware = middleware.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_default(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.defaults.insert(key.into(), value.into());
        self
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn is_get(&self) -> bool {
        self.methods.iter().any(|m| m.eq_ignore_ascii_case("GET"))
    }

    /// All middleware effective on the route, deduplicated in first-seen order.
    pub fn effective_middleware(&self) -> Vec<String> {
        self.middleware_groups
            .iter()
            .chain(self.middleware.iter())
            .cloned()
            .collect::<IndexSet<_>>()
            .into_iter()
            .collect()
    }
}

pub trait RouteSource {
    fn routes(&self) -> Vec<Route>;
}

impl RouteSource for Vec<Route> {
    fn routes(&self) -> Vec<Route> {
        self.clone()
    }
}

/// Routes loaded from a JSON dump of the host router.
pub struct RouteListFile {
    routes: Vec<Route>,
}

impl RouteListFile {
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            Force10Error::RouteList(format!("cannot read {}: {}", path.display(), e))
        })?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self> {
        let routes: Vec<Route> = serde_json::from_str(content)?;
        Ok(Self { routes })
    }
}

impl RouteSource for RouteListFile {
    fn routes(&self) -> Vec<Route> {
        self.routes.clone()
    }
}
