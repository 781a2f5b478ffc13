use super::{ComponentIdentity, TargetPlatform};
use crate::shared::security::read_regular_file;
use crate::shared::{path::portable, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Component, Path, PathBuf};

/// File name of the manifest at the root of every component archive
pub const MANIFEST_FILE_NAME: &str = "component.json";

/// License metadata declared by a component
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum LicenseMetadata {
    /// SPDX-style license expression, e.g. `MIT OR Apache-2.0`
    Expression(String),
    /// Path of a license file bundled inside the archive
    File(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentDependency {
    pub id: String,
    /// Version or version range; absent for bare listings
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DependencyGroup {
    /// Empty or absent means platform-neutral
    #[serde(default)]
    pub target_framework: String,
    #[serde(default)]
    pub dependencies: Vec<ComponentDependency>,
}

/// Metadata carried by `component.json`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentManifest {
    pub id: String,
    pub version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub license: Option<LicenseMetadata>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub license_url: Option<String>,
    #[serde(default)]
    pub dependency_groups: Vec<DependencyGroup>,
}

impl ComponentManifest {
    pub fn parse(content: &str) -> Result<Self> {
        serde_json::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse {}: {}", MANIFEST_FILE_NAME, e))
    }

    /// Non-empty project URL, if any
    pub fn project_url(&self) -> Option<&str> {
        self.project_url.as_deref().filter(|url| !url.trim().is_empty())
    }

    /// Title for display, falling back to the id
    pub fn display_title(&self) -> &str {
        self.title
            .as_deref()
            .filter(|title| !title.trim().is_empty())
            .unwrap_or(&self.id)
    }
}

/// Where the files of an archive live
#[derive(Debug, Clone)]
pub enum ArchiveEntries {
    /// Extracted on disk (folder feeds and the local cache)
    Directory(PathBuf),
    /// Downloaded entries held in memory
    InMemory(HashMap<String, String>),
}

/// A fetched component: its manifest plus access to the bundled files
#[derive(Debug, Clone)]
pub struct ComponentArchive {
    identity: ComponentIdentity,
    manifest: ComponentManifest,
    entries: ArchiveEntries,
}

impl ComponentArchive {
    /// Creates an archive, checking that the manifest describes `identity`.
    pub fn new(
        identity: ComponentIdentity,
        manifest: ComponentManifest,
        entries: ArchiveEntries,
    ) -> Result<Self> {
        let declared = ComponentIdentity::parse(&manifest.id, &manifest.version)?;
        if !declared.same_component(&identity) || declared.version() != identity.version() {
            anyhow::bail!(
                "archive manifest describes {} but {} was requested",
                declared,
                identity
            );
        }
        // The manifest spelling wins for display and sorting
        Ok(Self {
            identity: declared,
            manifest,
            entries,
        })
    }

    pub fn identity(&self) -> &ComponentIdentity {
        &self.identity
    }

    pub fn manifest(&self) -> &ComponentManifest {
        &self.manifest
    }

    pub fn entries(&self) -> &ArchiveEntries {
        &self.entries
    }

    pub fn project_url(&self) -> Option<&str> {
        self.manifest.project_url()
    }

    pub fn dependency_groups(&self) -> Vec<(TargetPlatform, &DependencyGroup)> {
        self.manifest
            .dependency_groups
            .iter()
            .filter_map(|group| {
                TargetPlatform::parse(&group.target_framework)
                    .ok()
                    .map(|platform| (platform, group))
            })
            .collect()
    }

    /// Reads a file entry as text.
    pub fn read_entry(&self, entry: &str) -> Result<String> {
        let relative = safe_entry_path(entry)?;
        match &self.entries {
            ArchiveEntries::Directory(root) => {
                read_regular_file(&root.join(&relative), "archive entry")
            }
            ArchiveEntries::InMemory(files) => {
                let key = relative.to_string_lossy().to_string();
                files
                    .get(&key)
                    .cloned()
                    .ok_or_else(|| anyhow::anyhow!("archive has no entry {}", entry))
            }
        }
    }
}

/// Rejects absolute entry paths and `..` segments.
pub fn safe_entry_path(entry: &str) -> Result<PathBuf> {
    let path = portable(entry.trim());
    if path.as_os_str().is_empty() {
        anyhow::bail!("empty archive entry path");
    }
    let mut safe = PathBuf::new();
    for component in path.components() {
        match component {
            Component::Normal(part) => safe.push(part),
            Component::CurDir => {}
            _ => anyhow::bail!("archive entry {} escapes the archive root", entry),
        }
    }
    Ok(safe)
}

/// Relative location of an identity inside a feed or cache:
/// `<lowercase id>/<lowercase normalized version>`
pub fn archive_location(identity: &ComponentIdentity) -> PathBuf {
    Path::new(&identity.name().key()).join(identity.version().normalized().to_lowercase())
}
