//! `<link rel="modulepreload">` hints for manifest route components.
//!
//! Only produces output after a Vite build; without a build manifest the
//! result is the empty string.

use crate::config::Force10Config;
use crate::manifest::ManifestText;
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

pub const PAGE_EXTENSIONS: [&str; 5] = ["tsx", "jsx", "ts", "js", "vue"];

const TAG_SEPARATOR: &str = "\n    ";

#[derive(Debug, Clone, Deserialize)]
pub struct ViteChunk {
    pub file: String,
}

pub type ViteManifest = HashMap<String, ViteChunk>;

pub struct PreloadTagGenerator {
    manifest_path: PathBuf,
    public_dir: PathBuf,
    build_path: String,
    pages_directory: String,
    asset_url: String,
}

impl PreloadTagGenerator {
    /// Paths in `config` are resolved against `root`.
    pub fn new(root: &Path, config: &Force10Config) -> Self {
        Self {
            manifest_path: Force10Config::resolve_path(root, &config.manifest_path),
            public_dir: Force10Config::resolve_path(root, &config.public_dir),
            build_path: config.build_path.trim_matches('/').to_string(),
            pages_directory: config.pages_directory.trim_end_matches('/').to_string(),
            asset_url: config.asset_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn generate(&self) -> String {
        let Some(vite) = self.load_vite_manifest() else {
            return String::new();
        };
        let components = self.extract_components();
        if components.is_empty() {
            return String::new();
        }
        self.tags(&vite, &components).join(TAG_SEPARATOR)
    }

    /// One tag per component found in `vite`, first matching extension wins.
    pub fn tags(&self, vite: &ViteManifest, components: &[String]) -> Vec<String> {
        components
            .iter()
            .filter_map(|component| {
                let chunk = PAGE_EXTENSIONS.iter().find_map(|ext| {
                    vite.get(&format!("{}/{}.{}", self.pages_directory, component, ext))
                })?;
                Some(format!(
                    "<link rel=\"modulepreload\" href=\"{}\">",
                    self.href(&chunk.file)
                ))
            })
            .collect()
    }

    /// `<asset_url>/<build_path>/<file>`, leaving out an empty build path.
    fn href(&self, file: &str) -> String {
        let file = file.trim_start_matches('/');
        if self.build_path.is_empty() {
            format!("{}/{}", self.asset_url, file)
        } else {
            format!("{}/{}/{}", self.asset_url, self.build_path, file)
        }
    }

    /// Vite 5 writes `.vite/manifest.json`; older versions write `manifest.json`.
    pub fn vite_manifest_candidates(&self) -> [PathBuf; 2] {
        let build = self.public_dir.join(&self.build_path);
        [build.join(".vite/manifest.json"), build.join("manifest.json")]
    }

    pub fn load_vite_manifest(&self) -> Option<ViteManifest> {
        for path in self.vite_manifest_candidates() {
            let Ok(content) = fs::read_to_string(&path) else {
                continue;
            };
            match serde_json::from_str::<HashMap<String, serde_json::Value>>(&content) {
                Ok(raw) => {
                    // Entries without a `file` (e.g. css-only) are skipped
                    let manifest = raw
                        .into_iter()
                        .filter_map(|(key, value)| {
                            serde_json::from_value::<ViteChunk>(value)
                                .ok()
                                .map(|chunk| (key, chunk))
                        })
                        .collect();
                    return Some(manifest);
                }
                Err(e) => warn!("Ignoring unreadable Vite manifest {}: {}", path.display(), e),
            }
        }
        debug!("No Vite build manifest under {}", self.public_dir.display());
        None
    }

    pub fn extract_components(&self) -> Vec<String> {
        match fs::read_to_string(&self.manifest_path) {
            Ok(content) => ManifestText(&content).components(),
            Err(_) => Vec::new(),
        }
    }
}
