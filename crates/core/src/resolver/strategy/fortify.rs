use crate::project::ProjectLayout;
use crate::resolver::{ResolveStrategy, parse_fortify_provider};
use crate::route::Route;
use std::fs;
use std::sync::Arc;
use tracing::debug;

pub const FORTIFY_PACKAGE: &str = "laravel/fortify";

/// Fortify controller actions and the `Fortify::*View()` method that
/// registers their response.
pub const FORTIFY_VIEW_METHODS: [(&str, &str); 7] = [
    (
        "Laravel\\Fortify\\Http\\Controllers\\AuthenticatedSessionController@create",
        "loginView",
    ),
    (
        "Laravel\\Fortify\\Http\\Controllers\\RegisteredUserController@create",
        "registerView",
    ),
    (
        "Laravel\\Fortify\\Http\\Controllers\\PasswordResetLinkController@create",
        "requestPasswordResetLinkView",
    ),
    (
        "Laravel\\Fortify\\Http\\Controllers\\NewPasswordController@create",
        "resetPasswordView",
    ),
    (
        "Laravel\\Fortify\\Http\\Controllers\\EmailVerificationPromptController",
        "verifyEmailView",
    ),
    (
        "Laravel\\Fortify\\Http\\Controllers\\ConfirmablePasswordController@show",
        "confirmPasswordView",
    ),
    (
        "Laravel\\Fortify\\Http\\Controllers\\TwoFactorAuthenticatedSessionController@create",
        "twoFactorChallengeView",
    ),
];

pub fn fortify_view_method(uses: &str) -> Option<&'static str> {
    let uses = uses.trim_start_matches('\\');
    FORTIFY_VIEW_METHODS
        .iter()
        .find(|(action, _)| *action == uses)
        .map(|(_, method)| *method)
}

/// Fortify controllers delegate rendering to closures registered in the
/// app's `FortifyServiceProvider`; this reads the matching registration.
pub struct FortifyViews {
    project: Arc<ProjectLayout>,
}

impl FortifyViews {
    pub fn new(project: Arc<ProjectLayout>) -> Self {
        Self { project }
    }

    pub fn parse_service_provider(&self, view_method: &str) -> Option<String> {
        let path = self.project.fortify_provider();
        let Ok(content) = fs::read_to_string(&path) else {
            debug!("No Fortify provider at {}", path.display());
            return None;
        };
        parse_fortify_provider(&content, view_method)
    }
}

impl ResolveStrategy for FortifyViews {
    fn resolve(&self, route: &Route) -> Option<String> {
        if !self.project.has_package(FORTIFY_PACKAGE) {
            return None;
        }
        let uses = route.action.uses()?;
        let view_method = fortify_view_method(&uses)?;
        self.parse_service_provider(view_method)
    }

    fn name(&self) -> &'static str {
        "fortify"
    }
}
