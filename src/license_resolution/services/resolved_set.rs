use crate::license_resolution::domain::{ComponentArchive, ComponentIdentity};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::sync::Arc;

/// ResolvedComponentSet - the highest version resolved so far, per component
///
/// Keys are case-insensitive component names. Every insertion is a single
/// check-and-set under the entry's shard lock, so two branches racing on the
/// same name can never leave the lower version behind.
#[derive(Debug, Default)]
pub struct ResolvedComponentSet {
    entries: DashMap<String, Arc<ComponentArchive>>,
}

impl ResolvedComponentSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if an equal or higher version of the same component is
    /// already retained; the caller skips the fetch in that case.
    pub fn is_satisfied(&self, identity: &ComponentIdentity) -> bool {
        self.entries
            .get(&identity.name().key())
            .map(|existing| existing.identity().version() >= identity.version())
            .unwrap_or(false)
    }

    /// Retains the archive if its version is higher than the current entry.
    ///
    /// Returns the retained archive, or `None` when an equal or higher
    /// version was already present (a no-op).
    pub fn try_insert(&self, archive: ComponentArchive) -> Option<Arc<ComponentArchive>> {
        let key = archive.identity().name().key();
        match self.entries.entry(key) {
            Entry::Occupied(mut occupied) => {
                if occupied.get().identity().version() >= archive.identity().version() {
                    return None;
                }
                let archive = Arc::new(archive);
                occupied.insert(archive.clone());
                Some(archive)
            }
            Entry::Vacant(vacant) => {
                let archive = Arc::new(archive);
                vacant.insert(archive.clone());
                Some(archive)
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<Arc<ComponentArchive>> {
        self.entries
            .get(&name.to_lowercase())
            .map(|entry| entry.value().clone())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Snapshot of the retained archives in no particular order
    pub fn archives(&self) -> Vec<Arc<ComponentArchive>> {
        self.entries
            .iter()
            .map(|entry| entry.value().clone())
            .collect()
    }
}
