use super::project_graph::{ProjectGraph, UnitIndex};
use crate::ports::outbound::ProgressReporter;
use crate::shared::error::NoticeError;
use crate::shared::Result;
use std::collections::HashSet;
use std::path::Path;

/// ProjectGraphWalker - computes the build units in scope for the notice
///
/// Deployment roots are visited in solution order; each root contributes
/// itself and everything it transitively references. The visited set is keyed
/// by unit, which both deduplicates and terminates cycles.
pub struct ProjectGraphWalker;

impl ProjectGraphWalker {
    /// Walks the graph from its deployment roots.
    ///
    /// # Returns
    /// The in-scope units in visiting order, each exactly once
    ///
    /// # Errors
    /// Returns [`NoticeError::GraphEmpty`] when no unit is a deployment root
    pub fn walk(
        graph: &ProjectGraph,
        solution: &Path,
        reporter: &dyn ProgressReporter,
    ) -> Result<Vec<UnitIndex>> {
        let mut visited = HashSet::new();
        let mut included = Vec::new();

        for (root, unit) in graph.units().iter().enumerate() {
            if !unit.is_deployment_root() || visited.contains(&root) {
                continue;
            }
            reporter.report(&format!("Include: {}", unit.relative_path()));
            Self::visit(graph, root, &mut visited, &mut included, reporter);
        }

        if included.is_empty() {
            return Err(NoticeError::GraphEmpty {
                solution: solution.to_path_buf(),
            }
            .into());
        }

        Ok(included)
    }

    /// Depth-first pre-order traversal from `root`
    fn visit(
        graph: &ProjectGraph,
        root: UnitIndex,
        visited: &mut HashSet<UnitIndex>,
        included: &mut Vec<UnitIndex>,
        reporter: &dyn ProgressReporter,
    ) {
        let mut stack = vec![(root, 0usize)];

        while let Some((index, depth)) = stack.pop() {
            if !visited.insert(index) {
                continue;
            }
            included.push(index);

            if depth > 0 {
                reporter.report(&format!(
                    "{}- {}",
                    " ".repeat(2 * depth),
                    graph.unit(index).relative_path()
                ));
            }

            for &reference in graph.references(index).iter().rev() {
                if !visited.contains(&reference) {
                    stack.push((reference, depth + 1));
                }
            }
        }
    }
}
