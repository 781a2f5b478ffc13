use async_trait::async_trait;
use build_license::prelude::*;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Mock LicenseTextFetcher serving fixed texts; unknown URLs yield ""
#[derive(Default, Clone)]
pub struct MockLicenseTextFetcher {
    texts: HashMap<String, String>,
    pub requests: Arc<Mutex<Vec<String>>>,
}

impl MockLicenseTextFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_text(mut self, url: &str, text: &str) -> Self {
        self.texts.insert(url.to_string(), text.to_string());
        self
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl LicenseTextFetcher for MockLicenseTextFetcher {
    async fn fetch_text(&self, url: &str) -> String {
        self.requests.lock().unwrap().push(url.to_string());
        self.texts.get(url).cloned().unwrap_or_default()
    }
}
