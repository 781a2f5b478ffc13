//! build-license - third-party license notice generator
//!
//! This library walks a solution's build units from their deployment roots,
//! resolves every bundled component to a pinned identity, fetches component
//! archives from ranked sources, and classifies each component's license into
//! a plain-text notice file. It follows hexagonal architecture and
//! Domain-Driven Design principles.
//!
//! # Architecture
//!
//! The library is organized into the following layers:
//!
//! - **Domain Layer** (`license_resolution`): Pure business logic and domain models
//! - **Application Layer** (`application`): Use cases and application services
//! - **Ports** (`ports`): Interface definitions for infrastructure
//! - **Adapters** (`adapters`): Concrete implementations of ports
//! - **Shared** (`shared`): Common utilities and error types
//!
//! # Example
//!
//! ```no_run
//! use build_license::prelude::*;
//! use std::path::PathBuf;
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<()> {
//! // Create adapters
//! let cache = DirectoryPackageSource::cache(PathBuf::from("/var/cache/components"));
//! let use_case = GenerateNoticeUseCase::new(
//!     FileSystemReader::new(),
//!     vec![Arc::new(cache) as Arc<dyn PackageSource>],
//!     OfflineLicenseTextFetcher,
//!     StderrProgressReporter::new(),
//! );
//!
//! // Execute
//! let response = use_case
//!     .execute(NoticeRequest::new(PathBuf::from("app.sln.toml")))
//!     .await?;
//!
//! // Present output
//! FileSystemWriter::new(PathBuf::from("Notice.txt")).present(&response.content)?;
//! # Ok(())
//! # }
//! ```

pub mod adapters;
pub mod application;
pub mod config;
pub mod license_resolution;
pub mod ports;
pub mod shared;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::adapters::outbound::console::StderrProgressReporter;
    pub use crate::adapters::outbound::filesystem::{
        DirectoryPackageSource, FileSystemReader, FileSystemWriter,
    };
    pub use crate::adapters::outbound::network::{
        CachingLicenseTextFetcher, HttpLicenseTextFetcher, HttpPackageSource,
        OfflineLicenseTextFetcher,
    };
    pub use crate::application::dto::{NoticeRequest, NoticeResponse};
    pub use crate::application::use_cases::GenerateNoticeUseCase;
    pub use crate::license_resolution::domain::{
        ComponentArchive, ComponentIdentity, ComponentName, ComponentVersion, NoticeEntry,
        Solution, TargetPlatform,
    };
    pub use crate::license_resolution::policies::LicenseFingerprint;
    pub use crate::license_resolution::services::{
        DependencyExpander, LicenseClassifier, MultiSourceFetcher, ReportAssembler,
    };
    pub use crate::ports::outbound::{
        FetchOutcome, LicenseTextFetcher, OutputPresenter, PackageSource, ProgressReporter,
        ProjectProvider,
    };
    pub use crate::shared::error::NoticeError;
    pub use crate::shared::Result;
}
