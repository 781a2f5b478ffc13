use crate::ports::outbound::LicenseTextFetcher;
use async_trait::async_trait;
use dashmap::DashMap;

/// CachingLicenseTextFetcher wraps a LicenseTextFetcher and adds in-memory caching.
///
/// Many components point at the same license URL; each URL is downloaded at
/// most once per run. The cache is thread-safe and suitable for concurrent access.
pub struct CachingLicenseTextFetcher<F: LicenseTextFetcher> {
    inner: F,
    cache: DashMap<String, String>,
}

impl<F: LicenseTextFetcher> CachingLicenseTextFetcher<F> {
    pub fn new(inner: F) -> Self {
        Self {
            inner,
            cache: DashMap::new(),
        }
    }

    /// Returns the current cache size (for testing/monitoring)
    #[cfg(test)]
    pub fn cache_size(&self) -> usize {
        self.cache.len()
    }
}

#[async_trait]
impl<F: LicenseTextFetcher> LicenseTextFetcher for CachingLicenseTextFetcher<F> {
    async fn fetch_text(&self, url: &str) -> String {
        if let Some(cached) = self.cache.get(url) {
            return cached.clone();
        }

        let text = self.inner.fetch_text(url).await;
        self.cache.insert(url.to_string(), text.clone());
        text
    }
}
