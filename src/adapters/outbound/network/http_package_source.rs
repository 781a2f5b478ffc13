use crate::adapters::outbound::filesystem::DirectoryPackageSource;
use crate::license_resolution::domain::{
    ArchiveEntries, ComponentArchive, ComponentIdentity, ComponentManifest, LicenseMetadata,
};
use crate::ports::outbound::{FetchOutcome, PackageSource};
use crate::shared::Result;
use async_trait::async_trait;
use reqwest::StatusCode;
use std::collections::HashMap;
use std::time::Duration;

/// HttpPackageSource adapter for a remote component feed
///
/// Archives are served as `{base}/{id}/{version}/component.json` plus the
/// license file the manifest references, from the same folder. A 404 means the
/// feed doesn't carry the identity. Fetched archives are written through to
/// the local cache when one is configured.
pub struct HttpPackageSource {
    name: String,
    base_url: String,
    client: reqwest::Client,
    cache: Option<DirectoryPackageSource>,
    max_retries: u32,
}

impl HttpPackageSource {
    pub fn new(
        name: impl Into<String>,
        base_url: &str,
        timeout: Duration,
        cache: Option<DirectoryPackageSource>,
    ) -> Result<Self> {
        let version = env!("CARGO_PKG_VERSION");
        let user_agent = format!("build-license/{}", version);
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()?;

        Ok(Self {
            name: name.into(),
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
            cache,
            max_retries: 3,
        })
    }

    /// Validates a URL path component
    fn validate_url_component(component: &str, component_type: &str) -> Result<()> {
        if component.contains('/') || component.contains('\\') {
            anyhow::bail!(
                "Security: {} contains path separators which are not allowed",
                component_type
            );
        }
        if component.contains("..") {
            anyhow::bail!(
                "Security: {} contains '..' which is not allowed",
                component_type
            );
        }
        Ok(())
    }

    /// URL of the folder holding an archive
    fn archive_url(&self, identity: &ComponentIdentity) -> Result<String> {
        let id = identity.name().key();
        let version = identity.version().normalized().to_lowercase();
        Self::validate_url_component(&id, "Component id")?;
        Self::validate_url_component(&version, "Version")?;

        Ok(format!(
            "{}/{}/{}",
            self.base_url,
            urlencoding::encode(&id),
            urlencoding::encode(&version)
        ))
    }

    fn entry_url(archive_url: &str, entry: &str) -> String {
        let encoded: Vec<String> = entry
            .split(['/', '\\'])
            .filter(|segment| !segment.is_empty())
            .map(|segment| urlencoding::encode(segment).into_owned())
            .collect();
        format!("{}/{}", archive_url, encoded.join("/"))
    }

    /// GET with retry on transport errors; `None` on 404
    async fn get_text(&self, url: &str) -> Result<Option<String>> {
        let mut last_error = None;

        for attempt in 1..=self.max_retries {
            match self.client.get(url).send().await {
                Ok(response) if response.status() == StatusCode::NOT_FOUND => return Ok(None),
                Ok(response) if !response.status().is_success() => {
                    anyhow::bail!("{} returned status code {}", url, response.status());
                }
                Ok(response) => return Ok(Some(response.text().await?)),
                Err(e) => {
                    last_error = Some(e);
                    if attempt < self.max_retries {
                        tokio::time::sleep(Duration::from_millis(100 * attempt as u64)).await;
                    }
                }
            }
        }

        match last_error {
            Some(e) => Err(e.into()),
            None => anyhow::bail!("no request was sent to {}", url),
        }
    }
}

#[async_trait]
impl PackageSource for HttpPackageSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn cached(&self, identity: &ComponentIdentity) -> Option<ComponentArchive> {
        self.cache.as_ref()?.cached(identity)
    }

    async fn fetch(&self, identity: &ComponentIdentity) -> Result<FetchOutcome> {
        let archive_url = self.archive_url(identity)?;
        let Some(manifest_text) = self
            .get_text(&format!("{}/component.json", archive_url))
            .await?
        else {
            return Ok(FetchOutcome::NotFound);
        };
        let manifest = ComponentManifest::parse(&manifest_text)?;

        let mut entries = HashMap::new();
        if let Some(LicenseMetadata::File(entry)) = &manifest.license {
            let url = Self::entry_url(&archive_url, entry);
            let text = self
                .get_text(&url)
                .await?
                .ok_or_else(|| anyhow::anyhow!("license file {} not found at {}", entry, url))?;
            entries.insert(entry.replace('\\', "/"), text);
        }

        let archive = ComponentArchive::new(identity.clone(), manifest, ArchiveEntries::InMemory(entries))?;

        if let Some(cache) = &self.cache {
            // Write-through is best-effort; the archive is already in memory
            let _ = cache.store(&archive);
        }

        Ok(FetchOutcome::Available(archive))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source(base: &str) -> HttpPackageSource {
        HttpPackageSource::new("feed", base, Duration::from_secs(5), None).unwrap()
    }

    #[test]
    fn test_archive_url_is_lowercase_and_normalized() {
        let identity = ComponentIdentity::parse("Newtonsoft.Json", "13.0.3.0").unwrap();
        assert_eq!(
            source("https://feed.example.com/components/").archive_url(&identity).unwrap(),
            "https://feed.example.com/components/newtonsoft.json/13.0.3"
        );
    }

    #[test]
    fn test_prerelease_version_in_url() {
        let identity = ComponentIdentity::parse("Foo", "2.0.0-Beta.1").unwrap();
        assert_eq!(
            source("https://feed.example.com").archive_url(&identity).unwrap(),
            "https://feed.example.com/foo/2.0.0-beta.1"
        );
    }

    #[test]
    fn test_entry_url_encodes_segments() {
        assert_eq!(
            HttpPackageSource::entry_url("https://f/foo/1.0.0", "docs\\LICENSE file.txt"),
            "https://f/foo/1.0.0/docs/LICENSE%20file.txt"
        );
    }

    #[test]
    fn test_validate_url_component() {
        assert!(HttpPackageSource::validate_url_component("foo", "Component id").is_ok());
        assert!(HttpPackageSource::validate_url_component("../etc", "Component id").is_err());
        assert!(HttpPackageSource::validate_url_component("a/b", "Component id").is_err());
    }

    #[test]
    fn test_cached_without_cache_is_none() {
        let identity = ComponentIdentity::parse("Foo", "1.0.0").unwrap();
        assert!(source("https://feed.example.com").cached(&identity).is_none());
    }
}
