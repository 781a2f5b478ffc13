use crate::license_resolution::domain::{ComponentArchive, ComponentIdentity};
use crate::ports::outbound::{FetchOutcome, PackageSource};
use crate::shared::error::NoticeError;
use crate::shared::Result;
use std::sync::Arc;
use std::time::Duration;

/// Default timeout of a single fetch attempt
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// MultiSourceFetcher - retrieves archives from an ordered list of sources
///
/// Local caches are consulted first. Then the sources are asked strictly in
/// order, and the first one that has the archive wins. Failures of a single
/// source are recorded and the next source is tried.
pub struct MultiSourceFetcher {
    sources: Vec<Arc<dyn PackageSource>>,
    timeout: Duration,
}

impl MultiSourceFetcher {
    pub fn new(sources: Vec<Arc<dyn PackageSource>>, timeout: Duration) -> Self {
        Self { sources, timeout }
    }

    /// Fetches the archive for `identity`.
    ///
    /// # Errors
    /// Returns [`NoticeError::UnresolvedComponent`] carrying every recorded
    /// source error when no source yields the archive
    pub async fn fetch(&self, identity: &ComponentIdentity) -> Result<ComponentArchive> {
        if let Some(archive) = self.sources.iter().find_map(|source| source.cached(identity)) {
            return Ok(archive);
        }

        let mut errors = Vec::new();

        for source in &self.sources {
            match tokio::time::timeout(self.timeout, source.fetch(identity)).await {
                Ok(Ok(FetchOutcome::Available(archive))) => return Ok(archive),
                Ok(Ok(FetchOutcome::NotFound)) => {}
                Ok(Err(e)) => errors.push(format!("{}: {:#}", source.name(), e)),
                Err(_) => errors.push(format!(
                    "{}: timed out after {}s",
                    source.name(),
                    self.timeout.as_secs()
                )),
            }
        }

        Err(NoticeError::UnresolvedComponent {
            identity: identity.to_string(),
            errors,
        }
        .into())
    }
}
