//! Configuration file support for build-license.
//!
//! Provides YAML-based configuration through `build-license.config.yml` files,
//! including data structures, file discovery, loading, and validation.

use anyhow::{bail, Context};
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

use crate::license_resolution::services::ExclusionFilter;
use crate::shared::path::normalize_path;
use crate::shared::Result;

pub const CONFIG_FILENAME: &str = "build-license.config.yml";

/// Environment variable overriding the default cache root
pub const CACHE_ENV_VAR: &str = "BUILD_LICENSE_CACHE";

const DEFAULT_CACHE_DIR: &str = ".build-license/packages";

/// Top-level configuration file schema.
#[derive(Debug, Deserialize, Default)]
pub struct ConfigFile {
    pub sources: Option<Vec<SourceEntry>>,
    pub cache_root: Option<String>,
    pub exclude: Option<String>,
    pub recursive: Option<bool>,
    pub offline: Option<bool>,
    pub always_report: Option<bool>,
    pub max_concurrent_fetches: Option<usize>,
    pub fetch_timeout_secs: Option<u64>,
    pub known_license_urls: Option<BTreeMap<String, String>>,
    /// Directory relative paths in the file are resolved against.
    #[serde(skip)]
    pub base_dir: PathBuf,
    /// Captures unknown fields for warnings.
    #[serde(flatten)]
    pub unknown_fields: HashMap<String, serde_yaml_ng::Value>,
}

/// One package source, either an HTTP feed or a folder feed.
#[derive(Debug, Deserialize)]
pub struct SourceEntry {
    pub name: String,
    pub url: Option<String>,
    pub path: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceLocation {
    Url(String),
    Directory(PathBuf),
}

impl ConfigFile {
    /// Configured sources in declaration order, folder paths made absolute.
    pub fn resolved_sources(&self) -> Vec<(String, SourceLocation)> {
        self.sources
            .iter()
            .flatten()
            .filter_map(|source| {
                let location = match (&source.url, &source.path) {
                    (Some(url), None) => SourceLocation::Url(url.trim().to_string()),
                    (None, Some(path)) => SourceLocation::Directory(self.resolve_path(path)),
                    _ => return None,
                };
                Some((source.name.trim().to_string(), location))
            })
            .collect()
    }

    /// The configured cache root, `~` expanded and made absolute.
    pub fn cache_root(&self) -> Option<PathBuf> {
        self.cache_root
            .as_deref()
            .map(str::trim)
            .filter(|root| !root.is_empty())
            .map(|root| self.resolve_path(root))
    }

    fn resolve_path(&self, path: &str) -> PathBuf {
        let expanded = match (path.strip_prefix("~/"), home_dir()) {
            (Some(rest), Some(home)) => home.join(rest),
            _ => PathBuf::from(path),
        };
        normalize_path(&self.base_dir, &expanded)
    }
}

/// Load config from an explicit path. Returns an error if the file is not found.
pub fn load_config_from_path(path: &Path) -> Result<ConfigFile> {
    let content = std::fs::read_to_string(path).with_context(|| {
        format!(
            "Failed to read config file: {}\n\n💡 Hint: Check that the file exists and is readable.",
            path.display()
        )
    })?;

    let mut config: ConfigFile = serde_yaml_ng::from_str(&content).with_context(|| {
        format!(
            "Failed to parse config file: {}\n\n💡 Hint: Ensure the file contains valid YAML syntax.",
            path.display()
        )
    })?;
    config.base_dir = path
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));

    validate_config(&config)?;
    warn_unknown_fields(&config);

    Ok(config)
}

/// Auto-discover config from `start_dir` up to the filesystem root; the first
/// hit wins. Returns `None` silently if not found.
pub fn discover_config(start_dir: &Path) -> Result<Option<ConfigFile>> {
    for dir in start_dir.ancestors() {
        let config_path = dir.join(CONFIG_FILENAME);
        if config_path.is_file() {
            return load_config_from_path(&config_path).map(Some);
        }
    }
    Ok(None)
}

/// `$BUILD_LICENSE_CACHE`, else `<home>/.build-license/packages`.
pub fn default_cache_root() -> Option<PathBuf> {
    cache_root_from(std::env::var_os(CACHE_ENV_VAR).map(PathBuf::from), home_dir())
}

fn cache_root_from(env: Option<PathBuf>, home: Option<PathBuf>) -> Option<PathBuf> {
    env.filter(|path| !path.as_os_str().is_empty())
        .or_else(|| home.map(|home| home.join(DEFAULT_CACHE_DIR)))
}

fn home_dir() -> Option<PathBuf> {
    std::env::var_os("HOME")
        .or_else(|| std::env::var_os("USERPROFILE"))
        .filter(|home| !home.is_empty())
        .map(PathBuf::from)
}

/// Validate the loaded configuration.
fn validate_config(config: &ConfigFile) -> Result<()> {
    if let Some(ref sources) = config.sources {
        for (i, source) in sources.iter().enumerate() {
            if source.name.trim().is_empty() {
                bail!(
                    "Invalid config: sources[{}].name must not be empty.\n\n\
                     💡 Hint: Each source needs a name used in diagnostics (e.g., \"company-feed\").",
                    i
                );
            }
            if source.url.is_some() == source.path.is_some() {
                bail!(
                    "Invalid config: sources[{}] ('{}') must set exactly one of 'url' or 'path'.",
                    i,
                    source.name
                );
            }
        }
    }

    if config.max_concurrent_fetches == Some(0) {
        bail!("Invalid config: max_concurrent_fetches must be at least 1.");
    }
    if config.fetch_timeout_secs == Some(0) {
        bail!("Invalid config: fetch_timeout_secs must be at least 1.");
    }

    if let Some(ref pattern) = config.exclude {
        ExclusionFilter::new(pattern).context("Invalid config: exclude")?;
    }
    Ok(())
}

/// Warn about unknown fields in the config file.
fn warn_unknown_fields(config: &ConfigFile) {
    for key in config.unknown_fields.keys() {
        eprintln!(
            "⚠️  Warning: Unknown config field '{}' will be ignored.",
            key
        );
    }
}
