pub mod archive;
pub mod build_unit;
pub mod component;
pub mod evaluated_project;
pub mod license_evidence;
pub mod restore_lock;
pub mod solution;
pub mod target_platform;

pub use archive::{
    ArchiveEntries, ComponentArchive, ComponentDependency, ComponentManifest, DependencyGroup,
    LicenseMetadata,
};
pub use build_unit::{BuildUnit, FrameworkView, UnitId, DEPLOYMENT_ROOT_PROPERTY};
pub use component::{ComponentIdentity, ComponentName, ComponentRequirement, ComponentVersion};
pub use evaluated_project::{EvaluatedProject, ProjectItem};
pub use license_evidence::{ClassifiedLicense, LicenseEvidence, NoticeEntry};
pub use restore_lock::{LockedLibrary, RestoreLock};
pub use solution::Solution;
pub use target_platform::{PlatformFamily, TargetPlatform};
