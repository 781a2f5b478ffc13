use crate::license_resolution::domain::{EvaluatedProject, RestoreLock, Solution, TargetPlatform};
use crate::shared::Result;
use std::path::Path;

/// Property naming the restore lock of an evaluated project
pub const RESTORE_LOCK_PROPERTY: &str = "ProjectAssetsFile";

/// Global property used to evaluate a unit under one target platform
pub const TARGET_PLATFORM_PROPERTY: &str = "TargetFramework";

/// ProjectProvider port for loading and evaluating build unit declarations
///
/// This port abstracts the build tool: parsing the solution, evaluating a
/// declaration into properties and items, and reading the restore lock the
/// restore step produced.
pub trait ProjectProvider: Send + Sync {
    /// Reads the solution manifest
    ///
    /// # Errors
    /// Returns an error if the manifest does not exist or cannot be parsed
    fn load_solution(&self, path: &Path) -> Result<Solution>;

    /// Evaluates a build unit declaration
    ///
    /// # Arguments
    /// * `path` - Normalized absolute path of the declaration file
    /// * `platform` - Target platform override, set as the global
    ///   [`TARGET_PLATFORM_PROPERTY`] when present
    ///
    /// # Errors
    /// Returns an error if the declaration cannot be read or evaluated
    fn evaluate(&self, path: &Path, platform: Option<&TargetPlatform>) -> Result<EvaluatedProject>;

    /// Loads the restore lock referenced by [`RESTORE_LOCK_PROPERTY`]
    ///
    /// # Errors
    /// Returns an error if the lock file is missing or malformed
    fn load_restore_lock(&self, project: &EvaluatedProject) -> Result<RestoreLock>;
}
