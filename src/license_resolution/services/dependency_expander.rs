use crate::license_resolution::domain::{ComponentArchive, ComponentDependency, TargetPlatform};
use std::collections::HashSet;

/// Components that are references only and never bundle files of their own
pub const PSEUDO_COMPONENTS: &[&str] = &["NETStandard.Library"];

/// Why an archive's own dependencies are scanned
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expansion {
    /// Not expanded
    Skip,
    /// Full recursive scanning was requested
    Recursive,
    /// The archive has no project URL, so its licensing lives in what it bundles
    NoProjectUrl,
}

/// DependencyExpander - decides whether and how to recurse into an archive
///
/// A component with a project URL is terminal: its license is attributed
/// directly. Without one it is treated as a transparent wrapper and its
/// dependencies for the consuming platform are scanned instead.
#[derive(Debug, Clone, Copy, Default)]
pub struct DependencyExpander {
    recursive: bool,
}

impl DependencyExpander {
    pub fn new(recursive: bool) -> Self {
        Self { recursive }
    }

    pub fn is_pseudo_component(name: &str) -> bool {
        PSEUDO_COMPONENTS
            .iter()
            .any(|pseudo| pseudo.eq_ignore_ascii_case(name))
    }

    pub fn expansion(&self, archive: &ComponentArchive) -> Expansion {
        if Self::is_pseudo_component(archive.identity().name().as_str()) {
            Expansion::Skip
        } else if self.recursive {
            Expansion::Recursive
        } else if archive.project_url().is_none() {
            Expansion::NoProjectUrl
        } else {
            Expansion::Skip
        }
    }

    /// Dependencies of `archive` as seen by a consumer on `consumer`.
    ///
    /// Uses the nearest compatible dependency group; when no group is
    /// compatible, the union of every group deduplicated by identifier.
    pub fn dependencies_for(
        archive: &ComponentArchive,
        consumer: &TargetPlatform,
    ) -> Vec<ComponentDependency> {
        let groups = archive.dependency_groups();
        if let Some((_, group)) = TargetPlatform::nearest(&groups, consumer, |(platform, _)| platform) {
            return group.dependencies.clone();
        }

        let mut seen = HashSet::new();
        archive
            .manifest()
            .dependency_groups
            .iter()
            .flat_map(|group| group.dependencies.iter())
            .filter(|dependency| seen.insert(dependency.id.to_lowercase()))
            .cloned()
            .collect()
    }
}
