use crate::application::dto::{NoticeRequest, NoticeResponse};
use crate::license_resolution::domain::{ComponentIdentity, FrameworkView, NoticeEntry, Solution};
use crate::license_resolution::policies::LicenseFingerprint;
use crate::license_resolution::services::{
    DependencyExpander, ExclusionFilter, Expansion, IdentityResolver, LicenseClassifier,
    MultiSourceFetcher, ProjectGraph, ProjectGraphWalker, ReportAssembler,
    ResolvedComponentSet,
};
use crate::ports::outbound::{LicenseTextFetcher, PackageSource, ProgressReporter, ProjectProvider};
use crate::shared::error::NoticeError;
use crate::shared::Result;
use futures::future::BoxFuture;
use futures::{FutureExt, StreamExt, TryStreamExt};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// State shared by every fetch of one run
struct RunContext {
    fetcher: MultiSourceFetcher,
    expander: DependencyExpander,
    resolved: ResolvedComponentSet,
}

/// A directly declared requirement together with the view declaring it
type TopLevelRequirement = (Arc<FrameworkView>, ComponentIdentity);

/// GenerateNoticeUseCase - Core use case for notice generation
///
/// Orchestrates walker, resolver, fetcher, expander, classifier and assembler
/// using generic dependency injection for the infrastructure.
///
/// # Type Parameters
/// * `P` - ProjectProvider implementation
/// * `T` - LicenseTextFetcher implementation
/// * `R` - ProgressReporter implementation
pub struct GenerateNoticeUseCase<P, T, R> {
    project_provider: P,
    package_sources: Vec<Arc<dyn PackageSource>>,
    license_text_fetcher: T,
    progress_reporter: R,
}

impl<P, T, R> GenerateNoticeUseCase<P, T, R>
where
    P: ProjectProvider,
    T: LicenseTextFetcher,
    R: ProgressReporter,
{
    /// Creates a new GenerateNoticeUseCase with injected dependencies
    ///
    /// # Arguments
    /// * `package_sources` - Sources in the order they are tried
    pub fn new(
        project_provider: P,
        package_sources: Vec<Arc<dyn PackageSource>>,
        license_text_fetcher: T,
        progress_reporter: R,
    ) -> Self {
        Self {
            project_provider,
            package_sources,
            license_text_fetcher,
            progress_reporter,
        }
    }

    /// Executes the notice generation use case
    ///
    /// # Returns
    /// NoticeResponse carrying the rendered notice
    ///
    /// # Errors
    /// Fails when no unit is a deployment root, a declared requirement can't be
    /// resolved or fetched, or license evidence is unreadable
    pub async fn execute(&self, request: NoticeRequest) -> Result<NoticeResponse> {
        let classifier = Self::build_classifier(&request)?;

        // Step 1: Load the solution and its build units
        let solution_path = std::path::absolute(&request.solution_path).map_err(|e| {
            NoticeError::InvalidInput {
                path: request.solution_path.clone(),
                reason: e.to_string(),
            }
        })?;
        self.progress_reporter
            .report(&format!("Solution: '{}'", solution_path.display()));
        let solution = self.project_provider.load_solution(&solution_path)?;
        let graph = ProjectGraph::load(&self.project_provider, &solution, &self.progress_reporter);

        // Step 2: Compute the units in scope
        let included = ProjectGraphWalker::walk(&graph, solution.path(), &self.progress_reporter)?;
        let included_units = included
            .iter()
            .map(|&index| graph.unit(index).relative_path().to_string())
            .collect();

        // Step 3: Resolve every declared requirement
        let requirements = self.collect_requirements(&graph, &included, &solution)?;

        // Step 4: Fetch components, expanding where needed
        let context = RunContext {
            fetcher: MultiSourceFetcher::new(self.package_sources.clone(), request.fetch_timeout),
            expander: DependencyExpander::new(request.recursive),
            resolved: ResolvedComponentSet::new(),
        };
        self.load_components(&context, requirements, request.max_concurrent_fetches)
            .await?;

        // Step 5: Classify and render
        let entries = self.classify_components(&classifier, &context.resolved).await?;
        if let Some(pattern) = classifier.exclusion().and_then(|f| f.unmatched_pattern()) {
            self.progress_reporter.report_warning(&format!(
                "Exclude pattern '{}' did not match any component",
                pattern
            ));
        }

        let reported_components = entries.len();
        Ok(NoticeResponse {
            content: ReportAssembler::assemble(entries),
            included_units,
            resolved_components: context.resolved.len(),
            reported_components,
        })
    }

    fn build_classifier(request: &NoticeRequest) -> Result<LicenseClassifier> {
        let exclusion = match request.exclude.as_deref().filter(|p| !p.trim().is_empty()) {
            Some(pattern) => Some(ExclusionFilter::new(pattern).map_err(|e| {
                NoticeError::ConfigError {
                    message: e.to_string(),
                }
            })?),
            None => None,
        };

        Ok(LicenseClassifier::new(
            LicenseFingerprint::new(request.known_license_urls.clone()),
            exclusion,
            request.always_report,
        ))
    }

    /// Enumerates and resolves the requirements of every in-scope unit, per
    /// target platform. Resolution failures here are fatal.
    fn collect_requirements(
        &self,
        graph: &ProjectGraph,
        included: &[usize],
        solution: &Solution,
    ) -> Result<Vec<TopLevelRequirement>> {
        let mut requirements = Vec::new();

        for &index in included {
            for view in graph.views(&self.project_provider, index)? {
                let identities = IdentityResolver::resolve_requirements(
                    &view,
                    solution,
                    &self.project_provider,
                    &self.progress_reporter,
                )?;
                requirements.extend(identities.into_iter().map(|identity| (view.clone(), identity)));
            }
        }

        Ok(requirements)
    }

    /// Loads top-level requirements concurrently, bounded by `max_concurrent`.
    /// The first failure drops the remaining fetches.
    async fn load_components(
        &self,
        context: &RunContext,
        requirements: Vec<TopLevelRequirement>,
        max_concurrent: usize,
    ) -> Result<()> {
        let total = requirements.len();
        let done = AtomicUsize::new(0);

        futures::stream::iter(requirements)
            .map(|(view, identity)| {
                let done = &done;
                async move {
                    let label = identity.to_string();
                    self.load_component(context, view, identity).await?;
                    let current = done.fetch_add(1, Ordering::Relaxed) + 1;
                    self.progress_reporter
                        .report_progress(current, total, Some(&label));
                    Ok::<(), anyhow::Error>(())
                }
            })
            .buffer_unordered(max_concurrent.max(1))
            .try_collect::<Vec<()>>()
            .await?;

        self.progress_reporter.report(&format!(
            "Resolved {} component(s) from {} requirement(s)",
            context.resolved.len(),
            total
        ));
        Ok(())
    }

    /// Fetches one component and, if it is expanded, its dependencies for the
    /// consuming view's platform, depth-first.
    fn load_component<'a>(
        &'a self,
        context: &'a RunContext,
        view: Arc<FrameworkView>,
        identity: ComponentIdentity,
    ) -> BoxFuture<'a, Result<()>> {
        async move {
            if context.resolved.is_satisfied(&identity) {
                return Ok(());
            }

            self.progress_reporter.report(&format!("Load: {}", identity));
            let archive = context.fetcher.fetch(&identity).await?;
            let Some(archive) = context.resolved.try_insert(archive) else {
                return Ok(());
            };

            match context.expander.expansion(&archive) {
                Expansion::Skip => return Ok(()),
                Expansion::NoProjectUrl => self.progress_reporter.report(&format!(
                    "  - No project url found in {}, scanning dependencies",
                    archive.identity()
                )),
                Expansion::Recursive => {}
            }

            for dependency in DependencyExpander::dependencies_for(&archive, view.platform()) {
                let loaded = match IdentityResolver::resolve(
                    &view,
                    &self.project_provider,
                    &dependency.id,
                    dependency.version.as_deref(),
                ) {
                    Ok(identity) => {
                        self.load_component(context, view.clone(), identity).await
                    }
                    Err(e) => Err(e),
                };

                if let Err(e) = loaded {
                    if !is_droppable(&e) {
                        return Err(e);
                    }
                    self.progress_reporter.report_warning(&format!(
                        "Dropped dependency {} of {}: {}",
                        dependency.id,
                        archive.identity(),
                        first_line(&e)
                    ));
                }
            }

            Ok(())
        }
        .boxed()
    }

    /// Classifies every resolved component in identifier order.
    async fn classify_components(
        &self,
        classifier: &LicenseClassifier,
        resolved: &ResolvedComponentSet,
    ) -> Result<Vec<NoticeEntry>> {
        let mut archives = resolved.archives();
        archives.sort_by(|a, b| a.manifest().id.cmp(&b.manifest().id));

        let mut entries = Vec::new();
        for archive in archives {
            if let Some(entry) = classifier
                .classify(&archive, &self.license_text_fetcher, &self.progress_reporter)
                .await?
            {
                entries.push(entry);
            }
        }
        Ok(entries)
    }
}

/// Transitive dependencies that can't be resolved or fetched are dropped
fn is_droppable(error: &anyhow::Error) -> bool {
    matches!(
        error.downcast_ref::<NoticeError>(),
        Some(NoticeError::Resolution { .. }) | Some(NoticeError::UnresolvedComponent { .. })
    )
}

fn first_line(error: &anyhow::Error) -> String {
    error.to_string().lines().next().unwrap_or_default().to_string()
}

#[cfg(test)]
mod tests;
