//! Server-side middleware state shared with the client.
//!
//! A [`PreflightChecker`] owns a registry of evaluators keyed by middleware
//! base name. Register everything before the first `evaluate`; the
//! registry takes `&mut self`, so sharing a checker across threads means
//! finishing registration first or putting it behind a lock.

use crate::config::PreflightConfig;
use crate::manifest::ManifestText;
use indexmap::IndexMap;
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::sync::Arc;

/// Key under which the preflight payload is shared with the client.
pub const PREFLIGHT_SHARE_KEY: &str = "_force10_preflight";

/// Session key written by the host when a password is confirmed.
pub const PASSWORD_CONFIRMED_AT: &str = "auth.password_confirmed_at";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthUser {
    pub email_verified: bool,
}

/// Request-time view of the host's auth and session state.
pub trait RequestContext {
    /// Authenticated user on `guard` (`None` = default guard).
    fn user(&self, guard: Option<&str>) -> Option<AuthUser>;

    fn session(&self, key: &str) -> Option<Value>;

    /// Current time in unix seconds.
    fn now(&self) -> i64 {
        chrono::Utc::now().timestamp()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PreflightResult {
    pub pass: bool,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl PreflightResult {
    pub fn new(pass: bool) -> Self {
        Self {
            pass,
            extra: Map::new(),
        }
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.extra.get(key)
    }
}

pub type Evaluator =
    Arc<dyn Fn(&dyn RequestContext, Option<&str>) -> PreflightResult + Send + Sync>;

pub struct PreflightChecker {
    evaluators: HashMap<String, Evaluator>,
}

impl PreflightChecker {
    /// Checker with the built-in `auth`, `guest`, `verified` and
    /// `password.confirm` evaluators.
    pub fn new(config: PreflightConfig) -> Self {
        let mut checker = Self::empty();
        let config = Arc::new(config);

        let guards = config.clone();
        checker.register("auth", move |ctx, guard| {
            PreflightResult::new(ctx.user(resolve_guard(&guards, guard)).is_some())
        });

        let guards = config.clone();
        checker.register("guest", move |ctx, guard| {
            PreflightResult::new(ctx.user(resolve_guard(&guards, guard)).is_none())
        });

        let guards = config.clone();
        checker.register("verified", move |ctx, guard| {
            let verified = ctx
                .user(resolve_guard(&guards, guard))
                .is_some_and(|user| user.email_verified);
            PreflightResult::new(verified)
        });

        let timeout = config.password_timeout;
        checker.register("password.confirm", move |ctx, _| {
            let Some(confirmed_at) = ctx
                .session(PASSWORD_CONFIRMED_AT)
                .and_then(|v| as_timestamp(&v))
            else {
                return PreflightResult::new(false);
            };
            let Some(expires_at) = confirmed_at.checked_add(timeout) else {
                return PreflightResult::new(false);
            };
            PreflightResult::new(ctx.now() < expires_at).with("expiresAt", expires_at)
        });

        checker
    }

    /// Checker with no evaluators at all.
    pub fn empty() -> Self {
        Self {
            evaluators: HashMap::new(),
        }
    }

    /// Bind `middleware` (base name, no `:params`); overwrites an existing binding.
    pub fn register<F>(&mut self, middleware: impl Into<String>, evaluator: F)
    where
        F: Fn(&dyn RequestContext, Option<&str>) -> PreflightResult + Send + Sync + 'static,
    {
        self.evaluators.insert(middleware.into(), Arc::new(evaluator));
    }

    pub fn is_registered(&self, middleware: &str) -> bool {
        self.evaluators.contains_key(middleware)
    }

    /// Evaluate each distinct middleware string. Results are keyed by the full
    /// original string (`auth:sanctum` stays distinct from `auth`); unregistered
    /// base names are left out.
    pub fn evaluate<I, S>(
        &self,
        ctx: &dyn RequestContext,
        middleware: I,
    ) -> IndexMap<String, PreflightResult>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut results = IndexMap::new();

        for mw in middleware {
            let mw = mw.as_ref();
            if results.contains_key(mw) {
                continue;
            }
            let (name, params) = match mw.split_once(':') {
                Some((name, params)) => (name, Some(params)),
                None => (mw, None),
            };
            if let Some(evaluator) = self.evaluators.get(name) {
                results.insert(mw.to_string(), evaluator(ctx, params));
            }
        }

        results
    }

    /// Evaluate every middleware referenced by a written manifest module.
    pub fn evaluate_manifest(
        &self,
        ctx: &dyn RequestContext,
        manifest: &str,
    ) -> IndexMap<String, PreflightResult> {
        self.evaluate(ctx, ManifestText(manifest).middleware())
    }
}

impl Default for PreflightChecker {
    fn default() -> Self {
        Self::new(PreflightConfig::default())
    }
}

/// Unconfigured guard names fall back to the default guard.
fn resolve_guard<'a>(config: &PreflightConfig, guard: Option<&'a str>) -> Option<&'a str> {
    guard.filter(|g| config.guards.iter().any(|known| known.as_str() == *g))
}

fn as_timestamp(value: &Value) -> Option<i64> {
    let ts = match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    };
    ts.filter(|ts| *ts != 0)
}
