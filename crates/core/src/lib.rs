pub mod cache_control;
pub mod config;
pub mod error;
pub mod logging;
pub mod manifest;
pub mod preflight;
pub mod preload;
pub mod project;
pub mod resolver;
pub mod route;
pub mod scanner;
pub mod source;

pub use config::Force10Config;
pub use error::{Force10Error, Result};
pub use manifest::{ManifestEntry, ManifestWriter};
pub use preflight::PreflightChecker;
pub use resolver::ComponentResolver;
pub use route::{Route, RouteAction};
pub use scanner::RouteScanner;
