use force10_core::manifest::{ManifestText, RouteParameter};
use force10_core::project::{ProjectLayout, Psr4Locator};
use force10_core::resolver::{FortifyViews, ResolveStrategy, SkipReason, parse_controller_file};
use force10_core::route::{Route, RouteAction, RouteListFile, SourceSpan};
use force10_core::{ComponentResolver, Force10Config, ManifestWriter, RouteScanner};
use std::fs;
use std::path::Path;
use std::sync::Arc;
use tempfile::{TempDir, tempdir};

const USER_CONTROLLER: &str = r#"<?php
namespace App\Http\Controllers;

use Inertia\Inertia;

class UserController extends Controller
{
    public function index(): Response
    {
        return Inertia::render('Users/Index', ['users' => User::all()]);
    }

    public function show(User $user)
    {
        return inertia('Users/Show', ['user' => $user]);
    }

    public function export()
    {
        return response()->json(['data' => []]);
    }
}
"#;

const SHOW_DASHBOARD: &str = r#"<?php
namespace App\Http\Controllers;

class ShowDashboard
{
    public function __invoke()
    {
        return Inertia::render('Dashboard');
    }
}
"#;

const WEB_ROUTES: &str = r#"<?php

Route::get('/closure-test', function () {
    return \Inertia\Inertia::render('ClosurePage', ['data' => []]);
});
Route::get('/arrow-test', fn () => \Inertia\Inertia::render('ArrowPage'));
Route::get('/plain', fn () => 'plain');
"#;

const FORTIFY_PROVIDER: &str = r#"<?php
namespace App\Providers;

class FortifyServiceProvider
{
    public function boot(): void
    {
        Fortify::loginView(fn () => Inertia::render('auth/login'));
        Fortify::registerView(fn () => Inertia::render('auth/register'));
    }
}
"#;

const ROUTES_JSON: &str = r#"[
    {"uri": "about", "methods": ["GET", "HEAD"], "action": "Closure",
     "defaults": {"component": "About"}, "middleware_groups": ["web"], "middleware": ["web"]},
    {"uri": "users", "methods": ["GET", "HEAD"],
     "action": "App\\Http\\Controllers\\UserController@index",
     "middleware_groups": ["web"], "middleware": ["web", "auth", "verified"], "name": "users.index"},
    {"uri": "users/{user}/posts/{post?}", "methods": ["GET", "HEAD"],
     "action": {"type": "controller", "class": "App\\Http\\Controllers\\UserController", "method": "show"},
     "middleware_groups": ["web"], "middleware": ["web", "auth:sanctum"]},
    {"uri": "users", "methods": ["POST"],
     "action": "App\\Http\\Controllers\\UserController@store"},
    {"uri": "export", "methods": ["GET"],
     "action": "App\\Http\\Controllers\\UserController@export"},
    {"uri": "dashboard", "methods": ["GET"],
     "action": "App\\Http\\Controllers\\ShowDashboard"},
    {"uri": "closure-test", "methods": ["GET"],
     "action": {"type": "closure", "file": "routes/web.php", "start_line": 3, "end_line": 5}},
    {"uri": "arrow-test", "methods": ["GET"],
     "action": {"type": "closure", "file": "routes/web.php", "start_line": 6, "end_line": 6}},
    {"uri": "plain", "methods": ["GET"],
     "action": {"type": "closure", "file": "routes/web.php", "start_line": 7, "end_line": 7}},
    {"uri": "login", "methods": ["GET"],
     "action": "Laravel\\Fortify\\Http\\Controllers\\AuthenticatedSessionController@create",
     "middleware_groups": ["web"], "middleware": ["web", "guest:web"]},
    {"uri": "api/users", "methods": ["GET"],
     "action": "App\\Http\\Controllers\\UserController@index", "middleware_groups": ["api"]},
    {"uri": "telescope/requests", "methods": ["GET"], "action": null},
    {"uri": "legacy", "methods": ["GET"], "action": "App\\Http\\Controllers\\MissingController@index"}
]"#;

fn write(root: &Path, relative: &str, content: &str) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn fixture_project() -> TempDir {
    let dir = tempdir().unwrap();
    let root = dir.path();
    write(
        root,
        "composer.json",
        r#"{"autoload": {"psr-4": {"App\\": "app/"}}}"#,
    );
    write(root, "app/Http/Controllers/UserController.php", USER_CONTROLLER);
    write(root, "app/Http/Controllers/ShowDashboard.php", SHOW_DASHBOARD);
    write(root, "app/Providers/FortifyServiceProvider.php", FORTIFY_PROVIDER);
    write(root, "routes/web.php", WEB_ROUTES);
    write(root, "routes.json", ROUTES_JSON);
    fs::create_dir_all(root.join("vendor/laravel/fortify")).unwrap();
    dir
}

fn scanner(root: &Path) -> RouteScanner<RouteListFile> {
    let project = Arc::new(ProjectLayout::discover(root));
    let routes = RouteListFile::load(&root.join("routes.json")).unwrap();
    RouteScanner::new(routes, ComponentResolver::standard(project))
}

#[test]
fn builds_manifest_from_route_dump() {
    let dir = fixture_project();
    let config = Force10Config::default();
    let entries = scanner(dir.path()).build_manifest(&config.routes);

    let summary: Vec<(&str, &str)> = entries
        .iter()
        .map(|e| (e.pattern.as_str(), e.component.as_str()))
        .collect();
    assert_eq!(
        summary,
        vec![
            ("/about", "About"),
            ("/users", "Users/Index"),
            ("/users/:user/posts/:post?", "Users/Show"),
            ("/dashboard", "Dashboard"),
            ("/closure-test", "ClosurePage"),
            ("/arrow-test", "ArrowPage"),
            ("/login", "auth/login"),
        ]
    );

    let users = &entries[1];
    assert_eq!(users.middleware, vec!["web", "auth", "verified"]);
    assert_eq!(users.name.as_deref(), Some("users.index"));

    let posts = &entries[2];
    assert_eq!(
        posts.parameters,
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
}

#[test]
fn verbose_report_does_not_change_manifest() {
    let dir = fixture_project();
    let scanner = scanner(dir.path());
    let config = Force10Config::default();

    let report = scanner.report(&config.routes);
    assert_eq!(report.included.len(), 7);
    assert!(
        report
            .skipped
            .contains(&("export".to_string(), SkipReason::NoRenderInController))
    );
    assert!(
        report
            .skipped
            .contains(&("plain".to_string(), SkipReason::NoRenderInClosure))
    );
    assert!(
        report
            .skipped
            .contains(&("legacy".to_string(), SkipReason::NoRenderInController))
    );
    assert!(
        report
            .skipped
            .contains(&("telescope/requests".to_string(), SkipReason::ExcludedByConfig))
    );
    assert!(!report.skipped.iter().any(|(uri, _)| uri == "api/users"));

    assert_eq!(scanner.build_manifest(&config.routes).len(), 7);
}

#[test]
fn fortify_requires_installed_package() {
    let dir = fixture_project();
    fs::remove_dir_all(dir.path().join("vendor")).unwrap();

    let project = Arc::new(ProjectLayout::discover(dir.path()));
    let login = Route::new(
        "login",
        RouteAction::from_uses(
            "Laravel\\Fortify\\Http\\Controllers\\AuthenticatedSessionController@create",
        ),
    );
    assert_eq!(FortifyViews::new(project.clone()).resolve(&login), None);
    assert_eq!(
        FortifyViews::new(project).parse_service_provider("registerView"),
        Some("auth/register".to_string())
    );
}

#[test]
fn missing_fortify_provider_falls_through_to_controller() {
    let dir = fixture_project();
    let root = dir.path();
    fs::remove_file(root.join("app/Providers/FortifyServiceProvider.php")).unwrap();
    write(
        root,
        "vendor/laravel/fortify/src/Http/Controllers/AuthenticatedSessionController.php",
        r#"<?php
class AuthenticatedSessionController
{
    public function create(Request $request)
    {
        return Inertia::render('fortify/login');
    }
}
"#,
    );

    let project = Arc::new(ProjectLayout::discover(root).with_locator(
        Psr4Locator::from_composer(root)
            .with_prefix("Laravel\\Fortify\\", ["vendor/laravel/fortify/src"]),
    ));
    let login = Route::new(
        "login",
        RouteAction::from_uses(
            "Laravel\\Fortify\\Http\\Controllers\\AuthenticatedSessionController@create",
        ),
    );

    assert!(project.has_package("laravel/fortify"));
    assert_eq!(FortifyViews::new(project.clone()).resolve(&login), None);
    assert_eq!(
        ComponentResolver::standard(project).resolve(&login),
        Some("fortify/login".to_string())
    );
}

#[test]
fn defaults_short_circuit_source_inspection() {
    let dir = fixture_project();
    let project = Arc::new(ProjectLayout::discover(dir.path()));
    let resolver = ComponentResolver::standard(project);

    let route = Route::new(
        "users",
        RouteAction::from_uses("App\\Http\\Controllers\\UserController@index"),
    )
    .with_default("component", "Override");
    assert_eq!(resolver.resolve(&route), Some("Override".to_string()));
}

#[test]
fn closure_without_readable_source_resolves_nothing() {
    let dir = fixture_project();
    let project = Arc::new(ProjectLayout::discover(dir.path()));
    let resolver = ComponentResolver::standard(project);

    let route = Route::new(
        "gone",
        RouteAction::Closure {
            location: Some(SourceSpan {
                file: "routes/missing.php".into(),
                start_line: 1,
                end_line: 3,
            }),
        },
    );
    assert_eq!(resolver.resolve(&route), None);
}

#[test]
fn parses_controller_files_directly() {
    let dir = fixture_project();
    let file = dir.path().join("app/Http/Controllers/UserController.php");

    assert_eq!(
        parse_controller_file(&file, "index"),
        Some("Users/Index".to_string())
    );
    assert_eq!(
        parse_controller_file(&file, "show"),
        Some("Users/Show".to_string())
    );
    assert_eq!(parse_controller_file(&file, "export"), None);
    assert_eq!(parse_controller_file(&file, "missing"), None);
    assert_eq!(
        parse_controller_file(&dir.path().join("nope.php"), "index"),
        None
    );
}

#[test]
fn written_manifest_round_trips_through_scraper() {
    let dir = fixture_project();
    let entries = scanner(dir.path()).build_manifest(&Force10Config::default().routes);
    let output = dir.path().join("resources/js/force10-manifest.ts");

    ManifestWriter::default().write(&entries, &output).unwrap();
    let written = fs::read_to_string(&output).unwrap();

    assert!(written.contains("export default {"));
    assert!(!written.contains("users.index"));

    let text = ManifestText(&written);
    assert_eq!(text.components().len(), 7);
    assert_eq!(
        text.middleware(),
        vec!["web", "auth", "verified", "auth:sanctum", "guest:web"]
    );
}
