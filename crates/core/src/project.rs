//! Project layout and class-to-file lookup.

use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Maps a fully-qualified class name to its source file.
pub trait ClassLocator: Send + Sync {
    fn locate(&self, class: &str) -> Option<PathBuf>;
}

/// Try `first`, then `second`.
pub struct ChainLocator<A, B> {
    first: A,
    second: B,
}

impl<A, B> ChainLocator<A, B> {
    pub fn new(first: A, second: B) -> Self {
        Self { first, second }
    }
}

impl<A: ClassLocator, B: ClassLocator> ClassLocator for ChainLocator<A, B> {
    fn locate(&self, class: &str) -> Option<PathBuf> {
        self.first
            .locate(class)
            .or_else(|| self.second.locate(class))
    }
}

impl<F> ClassLocator for F
where
    F: Fn(&str) -> Option<PathBuf> + Send + Sync,
{
    fn locate(&self, class: &str) -> Option<PathBuf> {
        self(class)
    }
}

#[derive(Deserialize, Default)]
struct ComposerAutoload {
    #[serde(rename = "psr-4", default)]
    psr4: HashMap<String, Value>,
}

#[derive(Deserialize, Default)]
struct ComposerJson {
    #[serde(default)]
    autoload: ComposerAutoload,
    #[serde(rename = "autoload-dev", default)]
    autoload_dev: ComposerAutoload,
}

/// PSR-4 locator built from a project's `composer.json`.
pub struct Psr4Locator {
    root: PathBuf,
    /// Namespace prefix (with trailing `\`) to base directories
    prefixes: Vec<(String, Vec<PathBuf>)>,
}

impl Psr4Locator {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            prefixes: Vec::new(),
        }
    }

    /// Read `composer.json` under `root`. A missing or malformed file yields
    /// a locator that finds nothing.
    pub fn from_composer(root: &Path) -> Self {
        let mut locator = Self::new(root);
        let composer = fs::read_to_string(root.join("composer.json"))
            .ok()
            .and_then(|content| serde_json::from_str::<ComposerJson>(&content).ok());

        match composer {
            Some(composer) => {
                for (prefix, dirs) in composer
                    .autoload
                    .psr4
                    .into_iter()
                    .chain(composer.autoload_dev.psr4)
                {
                    let dirs = match dirs {
                        Value::String(dir) => vec![dir],
                        Value::Array(items) => items
                            .into_iter()
                            .filter_map(|v| v.as_str().map(str::to_string))
                            .collect(),
                        _ => continue,
                    };
                    locator = locator.with_prefix(&prefix, dirs);
                }
            }
            None => debug!("No usable composer.json under {}", root.display()),
        }
        locator
    }

    pub fn with_prefix<I, P>(mut self, prefix: &str, dirs: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        let mut prefix = prefix.trim_start_matches('\\').to_string();
        if !prefix.is_empty() && !prefix.ends_with('\\') {
            prefix.push('\\');
        }
        let dirs = dirs
            .into_iter()
            .map(|d| self.root.join(d.as_ref()))
            .collect();
        self.prefixes.push((prefix, dirs));
        // Longest prefix first
        self.prefixes.sort_by(|a, b| b.0.len().cmp(&a.0.len()));
        self
    }
}

impl ClassLocator for Psr4Locator {
    fn locate(&self, class: &str) -> Option<PathBuf> {
        let class = class.trim_start_matches('\\');
        for (prefix, dirs) in &self.prefixes {
            let Some(relative) = class.strip_prefix(prefix.as_str()) else {
                continue;
            };
            let relative = format!("{}.php", relative.replace('\\', "/"));
            for dir in dirs {
                let candidate = dir.join(&relative);
                if candidate.is_file() {
                    return Some(candidate);
                }
            }
        }
        None
    }
}

/// Looks for controllers by the part of the class name after `Controllers\`,
/// then by the bare class name, under each configured directory.
pub struct ControllerDirs {
    dirs: Vec<PathBuf>,
}

impl ControllerDirs {
    pub fn new(dirs: Vec<PathBuf>) -> Self {
        Self { dirs }
    }
}

impl ClassLocator for ControllerDirs {
    fn locate(&self, class: &str) -> Option<PathBuf> {
        let class = class.trim_start_matches('\\');
        let short = class.rsplit('\\').next()?;
        let nested = class
            .split_once("Controllers\\")
            .map(|(_, rest)| rest.replace('\\', "/"));

        self.dirs.iter().find_map(|dir| {
            nested
                .iter()
                .map(String::as_str)
                .chain(std::iter::once(short))
                .map(|relative| dir.join(format!("{}.php", relative)))
                .find(|candidate| candidate.is_file())
        })
    }
}

/// Where things live inside the host application.
pub struct ProjectLayout {
    pub root: PathBuf,
    pub app_dir: PathBuf,
    pub locator: Box<dyn ClassLocator>,
}

impl ProjectLayout {
    /// Standard Laravel layout: `app/` plus PSR-4 lookup from `composer.json`.
    pub fn discover(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        Self {
            app_dir: root.join("app"),
            locator: Box::new(Psr4Locator::from_composer(&root)),
            root,
        }
    }

    pub fn with_app_dir(mut self, app_dir: impl Into<PathBuf>) -> Self {
        self.app_dir = app_dir.into();
        self
    }

    pub fn with_locator(mut self, locator: impl ClassLocator + 'static) -> Self {
        self.locator = Box::new(locator);
        self
    }

    /// Resolve a path relative to the project root; absolute paths pass through.
    pub fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        }
    }

    /// Whether a Composer package is installed under `vendor/`.
    pub fn has_package(&self, package: &str) -> bool {
        self.root.join("vendor").join(package).is_dir()
    }

    pub fn fortify_provider(&self) -> PathBuf {
        self.app_dir.join("Providers/FortifyServiceProvider.php")
    }
}
