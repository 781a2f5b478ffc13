use crate::license_resolution::domain::{
    BuildUnit, EvaluatedProject, FrameworkView, Solution, TargetPlatform, UnitId,
};
use crate::ports::outbound::{ProgressReporter, ProjectProvider};
use crate::shared::path::{normalize_path, portable};
use crate::shared::Result;
use dashmap::DashMap;
use std::collections::HashMap;
use std::sync::Arc;

const PROJECT_REFERENCE_ITEM: &str = "ProjectReference";
const TARGET_FRAMEWORKS_PROPERTY: &str = "TargetFrameworks";
const TARGET_FRAMEWORK_PROPERTY: &str = "TargetFramework";

/// Index of a build unit inside a [`ProjectGraph`]
pub type UnitIndex = usize;

/// ProjectGraph - arena of the solution's build units and their references
///
/// Units are stored once, keyed by their normalized declaration path;
/// reference edges are arena indices, so cycles and diamonds need no owning
/// pointers. Per-platform evaluations are memoized for the graph's lifetime.
#[derive(Debug, Default)]
pub struct ProjectGraph {
    units: Vec<BuildUnit>,
    index: HashMap<UnitId, UnitIndex>,
    references: Vec<Vec<UnitIndex>>,
    views: DashMap<(UnitIndex, TargetPlatform), Arc<FrameworkView>>,
}

impl ProjectGraph {
    /// Loads every unit the solution lists. Units that fail to load are
    /// reported as warnings and left out of the graph.
    pub fn load(
        provider: &dyn ProjectProvider,
        solution: &Solution,
        reporter: &dyn ProgressReporter,
    ) -> Self {
        let mut units = Vec::new();

        for relative in solution.projects() {
            let path = normalize_path(solution.directory(), &portable(relative));
            match provider.evaluate(&path, None) {
                Ok(project) => {
                    let platforms = declared_platforms(&project, relative, reporter);
                    units.push(BuildUnit::new(path, relative.clone(), platforms, project));
                }
                Err(e) => {
                    reporter.report_warning(&format!("Failed to load {}: {:#}", relative, e));
                }
            }
        }

        Self::from_units(units)
    }

    /// Builds the graph from already evaluated units. Later duplicates of the
    /// same physical unit are ignored.
    pub fn from_units(units: Vec<BuildUnit>) -> Self {
        let mut graph = Self::default();
        for unit in units {
            if graph.index.contains_key(unit.id()) {
                continue;
            }
            graph.index.insert(unit.id().clone(), graph.units.len());
            graph.units.push(unit);
        }

        graph.references = graph
            .units
            .iter()
            .map(|unit| graph.resolve_references(unit.project()))
            .collect();
        graph
    }

    /// Resolves `ProjectReference` items relative to the declaring unit.
    /// References to units outside the graph are dropped.
    fn resolve_references(&self, project: &EvaluatedProject) -> Vec<UnitIndex> {
        project
            .items(PROJECT_REFERENCE_ITEM)
            .filter_map(|item| {
                let target = normalize_path(project.directory(), &portable(&item.include));
                self.find(&UnitId::from_path(&target))
            })
            .collect()
    }

    pub fn units(&self) -> &[BuildUnit] {
        &self.units
    }

    pub fn unit(&self, index: UnitIndex) -> &BuildUnit {
        &self.units[index]
    }

    pub fn find(&self, id: &UnitId) -> Option<UnitIndex> {
        self.index.get(id).copied()
    }

    pub fn references(&self, index: UnitIndex) -> &[UnitIndex] {
        &self.references[index]
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    /// Returns the unit evaluated under `platform`, evaluating it on first use.
    ///
    /// Single-targeted units reuse their initial evaluation; multi-targeted
    /// units are re-evaluated with the platform as a global override.
    pub fn view(
        &self,
        provider: &dyn ProjectProvider,
        index: UnitIndex,
        platform: &TargetPlatform,
    ) -> Result<Arc<FrameworkView>> {
        let key = (index, platform.clone());
        if let Some(view) = self.views.get(&key) {
            return Ok(view.value().clone());
        }

        let unit = &self.units[index];
        let project = if unit.is_multi_targeted() {
            provider.evaluate(unit.path(), Some(platform))?
        } else {
            unit.project().clone()
        };
        let view = Arc::new(FrameworkView::new(unit, platform.clone(), project));

        Ok(self.views.entry(key).or_insert(view).value().clone())
    }

    /// Every per-platform view of a unit, in declaration order
    pub fn views(
        &self,
        provider: &dyn ProjectProvider,
        index: UnitIndex,
    ) -> Result<Vec<Arc<FrameworkView>>> {
        self.units[index]
            .platforms()
            .iter()
            .map(|platform| self.view(provider, index, platform))
            .collect()
    }
}

/// Target platforms from `TargetFrameworks` (`;`-separated) or
/// `TargetFramework`. Unparsable entries are reported and skipped.
fn declared_platforms(
    project: &EvaluatedProject,
    relative_path: &str,
    reporter: &dyn ProgressReporter,
) -> Vec<TargetPlatform> {
    let declared = project
        .property(TARGET_FRAMEWORKS_PROPERTY)
        .or_else(|| project.property(TARGET_FRAMEWORK_PROPERTY))
        .unwrap_or_default();

    let mut platforms: Vec<TargetPlatform> = Vec::new();
    for name in declared.split(';').map(str::trim).filter(|name| !name.is_empty()) {
        match TargetPlatform::parse(name) {
            Ok(platform) if !platforms.contains(&platform) => platforms.push(platform),
            Ok(_) => {}
            Err(e) => reporter.report_warning(&format!("{}: {}", relative_path, e)),
        }
    }
    platforms
}
