/// Outbound ports (Driven ports) - Infrastructure interfaces
///
/// These ports define the interfaces that the application core uses
/// to interact with external systems (build tool, package feeds, network, console).
pub mod license_text_fetcher;
pub mod output_presenter;
pub mod package_source;
pub mod progress_reporter;
pub mod project_provider;

pub use license_text_fetcher::LicenseTextFetcher;
pub use output_presenter::OutputPresenter;
pub use package_source::{FetchOutcome, PackageSource};
pub use progress_reporter::ProgressReporter;
pub use project_provider::{ProjectProvider, RESTORE_LOCK_PROPERTY, TARGET_PLATFORM_PROPERTY};
