use super::{EvaluatedProject, RestoreLock, TargetPlatform};
use crate::shared::Result;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};

/// Property that marks a build unit as a deployment root
pub const DEPLOYMENT_ROOT_PROPERTY: &str = "IsDeploymentTarget";

/// Identity of a build unit: its normalized absolute declaration path,
/// compared case-insensitively.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UnitId(String);

impl UnitId {
    pub fn from_path(normalized: &Path) -> Self {
        Self(normalized.to_string_lossy().to_lowercase())
    }
}

impl fmt::Display for UnitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A buildable project within the solution, loaded once with the graph.
#[derive(Debug, Clone)]
pub struct BuildUnit {
    id: UnitId,
    path: PathBuf,
    relative_path: String,
    platforms: Vec<TargetPlatform>,
    project: EvaluatedProject,
}

impl BuildUnit {
    pub fn new(
        path: PathBuf,
        relative_path: impl Into<String>,
        platforms: Vec<TargetPlatform>,
        project: EvaluatedProject,
    ) -> Self {
        let platforms = if platforms.is_empty() {
            vec![TargetPlatform::any()]
        } else {
            platforms
        };
        Self {
            id: UnitId::from_path(&path),
            path,
            relative_path: relative_path.into(),
            platforms,
            project,
        }
    }

    pub fn id(&self) -> &UnitId {
        &self.id
    }

    /// Normalized absolute path of the declaration file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Path as written in the solution manifest
    pub fn relative_path(&self) -> &str {
        &self.relative_path
    }

    /// Declared target platforms; never empty
    pub fn platforms(&self) -> &[TargetPlatform] {
        &self.platforms
    }

    pub fn is_multi_targeted(&self) -> bool {
        self.platforms.len() > 1
    }

    /// Evaluation without a target platform override
    pub fn project(&self) -> &EvaluatedProject {
        &self.project
    }

    /// A unit is a deployment root iff its flag evaluates to boolean `true`.
    pub fn is_deployment_root(&self) -> bool {
        self.project.bool_property(DEPLOYMENT_ROOT_PROPERTY) == Some(true)
    }
}

/// A build unit evaluated under one concrete target platform.
///
/// The restore lock is loaded on first use and kept for the view's lifetime.
#[derive(Debug)]
pub struct FrameworkView {
    unit: UnitId,
    relative_path: String,
    platform: TargetPlatform,
    project: EvaluatedProject,
    restore_lock: OnceLock<Arc<RestoreLock>>,
}

impl FrameworkView {
    pub fn new(unit: &BuildUnit, platform: TargetPlatform, project: EvaluatedProject) -> Self {
        Self {
            unit: unit.id().clone(),
            relative_path: unit.relative_path().to_string(),
            platform,
            project,
            restore_lock: OnceLock::new(),
        }
    }

    pub fn unit(&self) -> &UnitId {
        &self.unit
    }

    pub fn relative_path(&self) -> &str {
        &self.relative_path
    }

    pub fn platform(&self) -> &TargetPlatform {
        &self.platform
    }

    pub fn project(&self) -> &EvaluatedProject {
        &self.project
    }

    /// Returns the cached restore lock, loading it with `load` on first use.
    /// A failed load is not cached.
    pub fn restore_lock<F>(&self, load: F) -> Result<Arc<RestoreLock>>
    where
        F: FnOnce(&EvaluatedProject) -> Result<RestoreLock>,
    {
        if let Some(lock) = self.restore_lock.get() {
            return Ok(lock.clone());
        }
        let lock = Arc::new(load(&self.project)?);
        // A concurrent caller may have won; either copy is equivalent
        Ok(self.restore_lock.get_or_init(|| lock).clone())
    }
}
