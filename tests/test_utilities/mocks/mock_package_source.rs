use async_trait::async_trait;
use build_license::license_resolution::domain::{ArchiveEntries, ComponentManifest};
use build_license::prelude::*;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Mock PackageSource serving in-memory archives keyed by lowercase `id/version`
pub struct MockPackageSource {
    name: String,
    archives: HashMap<String, (String, HashMap<String, String>)>,
    failure: Option<String>,
    fetches: Arc<AtomicUsize>,
}

impl MockPackageSource {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            archives: HashMap::new(),
            failure: None,
            fetches: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Adds a component; `fields` is appended to the manifest's id and version
    pub fn with_component(self, id: &str, version: &str, fields: &str) -> Self {
        self.with_files(id, version, fields, &[])
    }

    pub fn with_files(mut self, id: &str, version: &str, fields: &str, files: &[(&str, &str)]) -> Self {
        let manifest = format!(r#"{{ "id": "{}", "version": "{}"{} }}"#, id, version, fields);
        let files = files
            .iter()
            .map(|(name, content)| (name.to_string(), content.to_string()))
            .collect();
        self.archives
            .insert(format!("{}/{}", id, version).to_lowercase(), (manifest, files));
        self
    }

    /// Every fetch fails with `message`
    pub fn failing(name: &str, message: &str) -> Self {
        Self {
            failure: Some(message.to_string()),
            ..Self::new(name)
        }
    }

    /// Shared counter of fetch calls, usable after the source is moved
    pub fn fetch_counter(&self) -> Arc<AtomicUsize> {
        self.fetches.clone()
    }
}

#[async_trait]
impl PackageSource for MockPackageSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn cached(&self, _identity: &ComponentIdentity) -> Option<ComponentArchive> {
        None
    }

    async fn fetch(&self, identity: &ComponentIdentity) -> Result<FetchOutcome> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        if let Some(message) = &self.failure {
            anyhow::bail!("{}", message);
        }

        let key = format!("{}/{}", identity.name(), identity.version().normalized()).to_lowercase();
        let Some((manifest, files)) = self.archives.get(&key) else {
            return Ok(FetchOutcome::NotFound);
        };
        Ok(FetchOutcome::Available(ComponentArchive::new(
            identity.clone(),
            ComponentManifest::parse(manifest)?,
            ArchiveEntries::InMemory(files.clone()),
        )?))
    }
}
