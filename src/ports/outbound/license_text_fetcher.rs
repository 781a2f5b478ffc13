use async_trait::async_trait;

/// LicenseTextFetcher port for downloading license text by URL
///
/// Best-effort by contract: any failure yields an empty string.
#[async_trait]
pub trait LicenseTextFetcher: Send + Sync {
    async fn fetch_text(&self, url: &str) -> String;
}
