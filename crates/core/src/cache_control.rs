//! Client cache invalidation directives (`force10.cache` middleware).

use serde::Serialize;

/// Middleware alias the host registers for cache control.
pub const CACHE_MIDDLEWARE: &str = "force10.cache";

/// Key under which the invalidation payload is shared with the client.
pub const SERVER_SHARE_KEY: &str = "_force10_server";

const INVALIDATE_PREFIX: &str = "invalidate:";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InvalidationPayload {
    pub invalidate: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheControl {
    invalidate: Vec<String>,
}

impl CacheControl {
    /// Collect `invalidate:<pattern>` directives; anything else is ignored.
    pub fn from_directives<I, S>(directives: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let invalidate = directives
            .into_iter()
            .filter_map(|d| d.as_ref().strip_prefix(INVALIDATE_PREFIX).map(str::to_string))
            .collect();
        Self { invalidate }
    }

    /// Parse a middleware string such as
    /// `force10.cache:invalidate:/users/*,invalidate:/dashboard`.
    pub fn from_middleware(middleware: &str) -> Option<Self> {
        let (name, params) = match middleware.split_once(':') {
            Some((name, params)) => (name, params),
            None => (middleware, ""),
        };
        if name != CACHE_MIDDLEWARE {
            return None;
        }
        Some(Self::from_directives(
            params.split(',').filter(|p| !p.is_empty()),
        ))
    }

    pub fn patterns(&self) -> &[String] {
        &self.invalidate
    }

    /// `None` when there is nothing to invalidate; no empty list is sent.
    pub fn payload(&self) -> Option<InvalidationPayload> {
        if self.invalidate.is_empty() {
            None
        } else {
            Some(InvalidationPayload {
                invalidate: self.invalidate.clone(),
            })
        }
    }
}
