use crate::project::ProjectLayout;
use crate::resolver::{ResolveStrategy, parse_source_for_component};
use crate::route::Route;
use crate::source::read_method_body;
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

/// Locates the controller class and searches the dispatched method's body.
pub struct ControllerSource {
    project: Arc<ProjectLayout>,
}

impl ControllerSource {
    pub fn new(project: Arc<ProjectLayout>) -> Self {
        Self { project }
    }
}

/// Find the component rendered by `method_name` in a controller file.
pub fn parse_controller_file(path: &Path, method_name: &str) -> Option<String> {
    let body = read_method_body(path, method_name)?;
    parse_source_for_component(&body)
}

impl ResolveStrategy for ControllerSource {
    fn resolve(&self, route: &Route) -> Option<String> {
        let (class, method) = route.action.class_method()?;
        let Some(path) = self.project.locator.locate(class) else {
            debug!("Cannot locate source for class {}", class);
            return None;
        };
        parse_controller_file(&path, method)
    }

    fn name(&self) -> &'static str {
        "controller"
    }
}
