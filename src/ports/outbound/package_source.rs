use crate::license_resolution::domain::{ComponentArchive, ComponentIdentity};
use crate::shared::Result;
use async_trait::async_trait;

/// Result of asking one source for a component
#[derive(Debug)]
pub enum FetchOutcome {
    Available(ComponentArchive),
    /// The source answered but does not carry this identity
    NotFound,
}

/// PackageSource port for retrieving component archives
///
/// Implementations must be `Send + Sync`; independent requirements are fetched
/// concurrently.
#[async_trait]
pub trait PackageSource: Send + Sync {
    /// Name used in diagnostics and aggregated error messages
    fn name(&self) -> &str;

    /// Looks the identity up in the local cache only; never touches the network
    fn cached(&self, identity: &ComponentIdentity) -> Option<ComponentArchive>;

    /// Fetches the archive for a concrete identity
    ///
    /// # Errors
    /// Returns an error for transport or protocol failures. A source that
    /// simply doesn't carry the identity returns `Ok(FetchOutcome::NotFound)`.
    async fn fetch(&self, identity: &ComponentIdentity) -> Result<FetchOutcome>;
}
