use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Duration;

/// Default number of top-level components fetched at the same time
pub const DEFAULT_MAX_CONCURRENT_FETCHES: usize = 8;

/// NoticeRequest - Internal request DTO for the notice generation use case
#[derive(Debug, Clone)]
pub struct NoticeRequest {
    /// Path to the solution manifest
    pub solution_path: PathBuf,
    /// Regular expression of component ids left out of the report
    pub exclude: Option<String>,
    /// Scan the dependencies of every component, not only of untraceable ones
    pub recursive: bool,
    /// Report components without a project URL instead of skipping them
    pub always_report: bool,
    pub max_concurrent_fetches: usize,
    pub fetch_timeout: Duration,
    /// Additional vendor boilerplate license URLs and their fixed report line
    pub known_license_urls: BTreeMap<String, String>,
}

impl NoticeRequest {
    pub fn new(solution_path: PathBuf) -> Self {
        Self {
            solution_path,
            exclude: None,
            recursive: false,
            always_report: false,
            max_concurrent_fetches: DEFAULT_MAX_CONCURRENT_FETCHES,
            fetch_timeout: Duration::from_secs(30),
            known_license_urls: BTreeMap::new(),
        }
    }
}
