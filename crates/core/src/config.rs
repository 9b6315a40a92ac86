//! `force10.json` configuration. Every key is optional.

use crate::error::{Force10Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

pub const CONFIG_FILE: &str = "force10.json";

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct RouteFilter {
    /// Only include routes matching these patterns (empty = all)
    pub include: Vec<String>,
    pub exclude: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ResolutionConfig {
    /// Fallback directories for controllers PSR-4 lookup cannot find
    pub controller_paths: Vec<PathBuf>,
}

impl Default for ResolutionConfig {
    fn default() -> Self {
        Self {
            controller_paths: vec![PathBuf::from("app/Http/Controllers")],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PreflightConfig {
    pub enabled: bool,
    /// Guards configured in the host application
    pub guards: Vec<String>,
    /// Seconds a password confirmation stays valid
    pub password_timeout: i64,
}

impl Default for PreflightConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            guards: vec!["web".to_string()],
            password_timeout: 10800,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Force10Config {
    pub enabled: bool,
    pub manifest_path: PathBuf,
    pub routes: RouteFilter,
    pub resolution: ResolutionConfig,
    pub preflight: PreflightConfig,
    pub pages_directory: String,
    /// Vite build output directory, relative to `public_dir`
    pub build_path: String,
    pub public_dir: PathBuf,
    pub app_dir: PathBuf,
    /// Prefix for preload hrefs; empty gives root-relative URLs
    pub asset_url: String,
}

impl Default for Force10Config {
    fn default() -> Self {
        Self {
            enabled: true,
            manifest_path: PathBuf::from("resources/js/force10-manifest.ts"),
            routes: RouteFilter {
                include: Vec::new(),
                exclude: vec![
                    "telescope*".to_string(),
                    "horizon*".to_string(),
                    "_debugbar*".to_string(),
                ],
            },
            resolution: ResolutionConfig::default(),
            preflight: PreflightConfig::default(),
            pages_directory: "resources/js/pages".to_string(),
            build_path: "build".to_string(),
            public_dir: PathBuf::from("public"),
            app_dir: PathBuf::from("app"),
            asset_url: String::new(),
        }
    }
}

impl Force10Config {
    /// Load from `path`; a missing file yields defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let mut config = if path.exists() {
            let content = fs::read_to_string(path)?;
            serde_json::from_str::<Self>(&content)
                .map_err(|e| Force10Error::Config(format!("{}: {}", path.display(), e)))?
        } else {
            debug!("No config at {}, using defaults", path.display());
            Self::default()
        };
        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Load `force10.json` from the project root.
    pub fn load_from_project(root: &Path) -> Result<Self> {
        Self::load(&root.join(CONFIG_FILE))
    }

    /// `FORCE10_ENABLED` / `FORCE10_PREFLIGHT` override the file.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup("FORCE10_ENABLED").and_then(|v| parse_bool(&v)) {
            self.enabled = value;
        }
        if let Some(value) = lookup("FORCE10_PREFLIGHT").and_then(|v| parse_bool(&v)) {
            self.preflight.enabled = value;
        }
    }

    pub fn resolve_path(root: &Path, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            root.join(path)
        }
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "on" | "yes" => Some(true),
        "0" | "false" | "off" | "no" => Some(false),
        _ => None,
    }
}
