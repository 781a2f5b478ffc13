use crate::license_resolution::domain::{
    ComponentIdentity, ComponentName, ComponentRequirement, ComponentVersion, FrameworkView,
    Solution,
};
use crate::ports::outbound::{ProgressReporter, ProjectProvider};
use crate::shared::error::NoticeError;
use crate::shared::Result;

const PACKAGE_REFERENCE_ITEM: &str = "PackageReference";
const CENTRAL_MANAGEMENT_PROPERTY: &str = "ManagePackageVersionsCentrally";

/// IdentityResolver - turns declared requirements into concrete identities
///
/// A declared version that is a single concrete version is used as-is. Ranges,
/// wildcards and missing versions fall back to the version the restore step
/// pinned in the view's restore lock.
pub struct IdentityResolver;

impl IdentityResolver {
    /// Resolves one component for a view.
    ///
    /// # Errors
    /// Returns [`NoticeError::Resolution`] if `name` is not a valid component
    /// id, or if the restore lock can't be read or holds zero or several
    /// entries for `name`
    pub fn resolve(
        view: &FrameworkView,
        provider: &dyn ProjectProvider,
        name: &str,
        declared_version: Option<&str>,
    ) -> Result<ComponentIdentity> {
        let name = ComponentName::new(name).map_err(|e| NoticeError::Resolution {
            component: name.to_string(),
            reason: e.to_string(),
        })?;

        if let Some(version) = declared_version.and_then(|v| ComponentVersion::parse(v).ok()) {
            return Ok(ComponentIdentity::new(name, version));
        }

        let resolution_error = |reason: String| NoticeError::Resolution {
            component: name.to_string(),
            reason,
        };

        let lock = view
            .restore_lock(|project| provider.load_restore_lock(project))
            .map_err(|e| resolution_error(format!("{:#}", e)))?;
        let version = lock
            .unique_version(name.as_str())
            .map_err(|e| resolution_error(e.to_string()))?
            .clone();

        Ok(ComponentIdentity::new(name, version))
    }

    /// Enumerates the component requirements a view declares.
    ///
    /// With central version management active, the version comes from the
    /// solution's map unless the item carries a `VersionOverride`.
    pub fn requirements(view: &FrameworkView, solution: &Solution) -> Vec<ComponentRequirement> {
        let project = view.project();
        let central = project.bool_property(CENTRAL_MANAGEMENT_PROPERTY) == Some(true);

        project
            .items(PACKAGE_REFERENCE_ITEM)
            .map(|item| {
                let version = if central {
                    item.metadata("VersionOverride")
                        .or_else(|| solution.central_version(&item.include))
                        .or_else(|| item.metadata("Version"))
                } else {
                    item.metadata("Version")
                };

                ComponentRequirement {
                    name: item.include.trim().to_string(),
                    version: version.map(str::to_string),
                    private_assets: item.metadata("PrivateAssets").is_some(),
                    exclude_assets: item.metadata("ExcludeAssets").map(str::to_string),
                }
            })
            .collect()
    }

    /// Resolves every bundled requirement of a view.
    ///
    /// Private and runtime-excluded requirements are skipped silently;
    /// requirements without a version are reported and skipped.
    ///
    /// # Errors
    /// Any resolution failure of a declared requirement is fatal and returned
    pub fn resolve_requirements(
        view: &FrameworkView,
        solution: &Solution,
        provider: &dyn ProjectProvider,
        reporter: &dyn ProgressReporter,
    ) -> Result<Vec<ComponentIdentity>> {
        let mut identities = Vec::new();

        for requirement in Self::requirements(view, solution) {
            if !requirement.reaches_bundle() {
                continue;
            }
            let Some(version) = requirement.version.as_deref() else {
                reporter.report_warning(&format!(
                    "{} ({}): no version declared for {}, skipped",
                    view.relative_path(),
                    view.platform(),
                    requirement.name
                ));
                continue;
            };
            identities.push(Self::resolve(view, provider, &requirement.name, Some(version))?);
        }

        Ok(identities)
    }
}
