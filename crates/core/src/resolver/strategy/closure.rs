use crate::project::ProjectLayout;
use crate::resolver::{ResolveStrategy, parse_source_for_component};
use crate::route::{Route, RouteAction};
use crate::source::read_line_span;
use std::sync::Arc;
use tracing::debug;

/// Reads the closure's own source lines and searches them for a render call.
pub struct ClosureSource {
    project: Arc<ProjectLayout>,
}

impl ClosureSource {
    pub fn new(project: Arc<ProjectLayout>) -> Self {
        Self { project }
    }
}

impl ResolveStrategy for ClosureSource {
    fn resolve(&self, route: &Route) -> Option<String> {
        let RouteAction::Closure { location } = &route.action else {
            return None;
        };
        let Some(span) = location else {
            debug!("Closure for {} has no recorded source location", route.uri);
            return None;
        };

        let file = self.project.resolve(&span.file);
        let source = read_line_span(&file, span.start_line, span.end_line)?;
        parse_source_for_component(&source)
    }

    fn name(&self) -> &'static str {
        "closure"
    }
}
