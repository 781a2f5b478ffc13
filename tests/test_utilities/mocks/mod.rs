/// Mock implementations for testing
mod mock_license_text_fetcher;
mod mock_package_source;
mod mock_progress_reporter;

pub use mock_license_text_fetcher::MockLicenseTextFetcher;
pub use mock_package_source::MockPackageSource;
pub use mock_progress_reporter::MockProgressReporter;
