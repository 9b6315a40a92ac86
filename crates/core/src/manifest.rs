//! Manifest entries, the module writer and scraping of written manifests.

use crate::error::Result;
use indexmap::IndexSet;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::fmt::Write as _;
use std::fs;
use std::path::Path;
use tracing::info;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RouteParameter {
    pub name: String,
    pub required: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ManifestEntry {
    pub pattern: String,
    pub component: String,
    pub middleware: Vec<String>,
    pub parameters: Vec<RouteParameter>,
    /// Route name; kept for diagnostics, never written.
    #[serde(skip)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ManifestFormat {
    #[default]
    TypeScript,
    Json,
}

impl ManifestFormat {
    /// `.json` outputs are written as JSON, everything else as a module.
    pub fn for_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => ManifestFormat::Json,
            _ => ManifestFormat::TypeScript,
        }
    }
}

const HEADER: &str = "// This file is generated by `force10 generate`. Do not edit it by hand.\n";

#[derive(Serialize)]
struct JsonManifest<'a> {
    routes: &'a [ManifestEntry],
}

pub struct ManifestWriter {
    format: ManifestFormat,
}

impl ManifestWriter {
    pub fn new(format: ManifestFormat) -> Self {
        Self { format }
    }

    pub fn render(&self, entries: &[ManifestEntry]) -> Result<String> {
        match self.format {
            ManifestFormat::TypeScript => Ok(render_module(entries)),
            ManifestFormat::Json => {
                let mut out = serde_json::to_string_pretty(&JsonManifest { routes: entries })?;
                out.push('\n');
                Ok(out)
            }
        }
    }

    /// Render and write, creating parent directories.
    pub fn write(&self, entries: &[ManifestEntry], path: &Path) -> Result<()> {
        let content = self.render(entries)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, content)?;
        info!("Wrote {} routes to {}", entries.len(), path.display());
        Ok(())
    }
}

impl Default for ManifestWriter {
    fn default() -> Self {
        Self::new(ManifestFormat::TypeScript)
    }
}

fn quote(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('\'');
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            _ => out.push(c),
        }
    }
    out.push('\'');
    out
}

fn render_module(entries: &[ManifestEntry]) -> String {
    let mut out = String::from(HEADER);
    out.push('\n');
    out.push_str("export default {\n  routes: [\n");

    for entry in entries {
        let middleware = entry
            .middleware
            .iter()
            .map(|m| quote(m))
            .collect::<Vec<_>>()
            .join(", ");
        let parameters = entry
            .parameters
            .iter()
            .map(|p| format!("{{ name: {}, required: {} }}", quote(&p.name), p.required))
            .collect::<Vec<_>>()
            .join(", ");

        // Writing to a String cannot fail
        let _ = writeln!(
            out,
            "    {{ pattern: {}, component: {}, middleware: [{}], parameters: [{}] }},",
            quote(&entry.pattern),
            quote(&entry.component),
            middleware,
            parameters
        );
    }

    out.push_str("  ],\n};\n");
    out
}

static COMPONENT_FIELD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"component:\s*'([^']+)'").expect("component pattern is valid"));

static MIDDLEWARE_FIELD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"middleware:\s*\[([^\]]*)\]").expect("middleware pattern is valid"));

static QUOTED: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"'([^']+)'").expect("quoted string pattern is valid"));

/// Text of an already-written manifest module, scraped without re-resolving.
pub struct ManifestText<'a>(pub &'a str);

impl<'a> ManifestText<'a> {
    /// Distinct component names in first-seen order.
    pub fn components(&self) -> Vec<String> {
        COMPONENT_FIELD
            .captures_iter(self.0)
            .map(|caps| caps[1].to_string())
            .collect::<IndexSet<_>>()
            .into_iter()
            .collect()
    }

    /// Distinct middleware identifiers across all routes.
    pub fn middleware(&self) -> Vec<String> {
        MIDDLEWARE_FIELD
            .captures_iter(self.0)
            .flat_map(|caps| {
                let list = caps.get(1).map_or("", |m| m.as_str());
                QUOTED
                    .captures_iter(list)
                    .map(|q| q[1].to_string())
                    .collect::<Vec<_>>()
            })
            .collect::<IndexSet<_>>()
            .into_iter()
            .collect()
    }
}
