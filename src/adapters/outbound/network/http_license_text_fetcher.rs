use crate::ports::outbound::LicenseTextFetcher;
use crate::shared::Result;
use async_trait::async_trait;
use std::time::Duration;

/// HttpLicenseTextFetcher adapter for downloading license text
///
/// Best-effort: any transport error or non-success status yields empty text.
pub struct HttpLicenseTextFetcher {
    client: reqwest::Client,
}

impl HttpLicenseTextFetcher {
    pub fn new(timeout: Duration) -> Result<Self> {
        let version = env!("CARGO_PKG_VERSION");
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(format!("build-license/{}", version))
            .build()?;
        Ok(Self { client })
    }

    async fn try_fetch(&self, url: &str) -> Result<String> {
        let response = self.client.get(url).send().await?;
        if !response.status().is_success() {
            anyhow::bail!("{} returned status code {}", url, response.status());
        }
        Ok(response.text().await?)
    }
}

#[async_trait]
impl LicenseTextFetcher for HttpLicenseTextFetcher {
    async fn fetch_text(&self, url: &str) -> String {
        self.try_fetch(url).await.unwrap_or_default()
    }
}

/// Offline stand-in: never touches the network
pub struct OfflineLicenseTextFetcher;

#[async_trait]
impl LicenseTextFetcher for OfflineLicenseTextFetcher {
    async fn fetch_text(&self, _url: &str) -> String {
        String::new()
    }
}
