/// Network adapters for package feeds and license downloads
mod caching_license_text_fetcher;
mod http_license_text_fetcher;
mod http_package_source;

pub use caching_license_text_fetcher::CachingLicenseTextFetcher;
pub use http_license_text_fetcher::{HttpLicenseTextFetcher, OfflineLicenseTextFetcher};
pub use http_package_source::HttpPackageSource;
