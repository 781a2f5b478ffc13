use crate::license_resolution::domain::archive::{
    archive_location, safe_entry_path, MANIFEST_FILE_NAME,
};
use crate::license_resolution::domain::{
    ArchiveEntries, ComponentArchive, ComponentIdentity, ComponentManifest, LicenseMetadata,
};
use crate::ports::outbound::{FetchOutcome, PackageSource};
use crate::shared::security::read_regular_file;
use crate::shared::Result;
use async_trait::async_trait;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Name of the local cache in diagnostics
pub const CACHE_SOURCE_NAME: &str = "local cache";

/// DirectoryPackageSource adapter for archives extracted on disk
///
/// Serves both folder feeds and the local cache. Archives live at
/// `<root>/<lowercase id>/<lowercase version>/component.json`. Only the cache
/// answers [`PackageSource::cached`] lookups.
#[derive(Debug, Clone)]
pub struct DirectoryPackageSource {
    name: String,
    root: PathBuf,
    is_cache: bool,
}

impl DirectoryPackageSource {
    /// A configured folder feed
    pub fn feed(name: impl Into<String>, root: PathBuf) -> Self {
        Self {
            name: name.into(),
            root,
            is_cache: false,
        }
    }

    /// The local cache that network feeds write through to
    pub fn cache(root: PathBuf) -> Self {
        Self {
            name: CACHE_SOURCE_NAME.to_string(),
            root,
            is_cache: true,
        }
    }

    fn directory_of(&self, identity: &ComponentIdentity) -> PathBuf {
        self.root.join(archive_location(identity))
    }

    /// Loads an archive; `None` if this directory doesn't hold it
    pub fn load(&self, identity: &ComponentIdentity) -> Result<Option<ComponentArchive>> {
        let directory = self.directory_of(identity);
        let manifest_path = directory.join(MANIFEST_FILE_NAME);
        if !manifest_path.exists() {
            return Ok(None);
        }

        let manifest = ComponentManifest::parse(&read_regular_file(&manifest_path, "component manifest")?)?;
        let archive = ComponentArchive::new(
            identity.clone(),
            manifest,
            ArchiveEntries::Directory(directory),
        )?;
        Ok(Some(archive))
    }

    /// Writes an archive into this directory's layout.
    ///
    /// The referenced license file is written first and the manifest last, so
    /// a partially stored archive is never picked up. Each file is renamed into
    /// place, so concurrent readers see either no file or a complete one.
    pub fn store(&self, archive: &ComponentArchive) -> Result<()> {
        let directory = self.directory_of(archive.identity());
        fs::create_dir_all(&directory)
            .map_err(|e| anyhow::anyhow!("Failed to create {}: {}", directory.display(), e))?;

        if let Some(LicenseMetadata::File(entry)) = &archive.manifest().license {
            let target = directory.join(safe_entry_path(entry)?);
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent)?;
            }
            write_atomically(&target, &archive.read_entry(entry)?)?;
        }

        let manifest = serde_json::to_string_pretty(archive.manifest())?;
        write_atomically(&directory.join(MANIFEST_FILE_NAME), &manifest)
    }
}

fn write_atomically(target: &Path, content: &str) -> Result<()> {
    let directory = target.parent().unwrap_or_else(|| Path::new("."));

    let mut temp = NamedTempFile::new_in(directory)
        .map_err(|e| anyhow::anyhow!("Failed to write {}: {}", target.display(), e))?;
    temp.write_all(content.as_bytes())
        .and_then(|_| temp.flush())
        .map_err(|e| anyhow::anyhow!("Failed to write {}: {}", target.display(), e))?;
    temp.persist(target)
        .map_err(|e| anyhow::anyhow!("Failed to write {}: {}", target.display(), e.error))?;
    Ok(())
}

#[async_trait]
impl PackageSource for DirectoryPackageSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn cached(&self, identity: &ComponentIdentity) -> Option<ComponentArchive> {
        if !self.is_cache {
            return None;
        }
        self.load(identity).ok().flatten()
    }

    async fn fetch(&self, identity: &ComponentIdentity) -> Result<FetchOutcome> {
        Ok(match self.load(identity)? {
            Some(archive) => FetchOutcome::Available(archive),
            None => FetchOutcome::NotFound,
        })
    }
}
