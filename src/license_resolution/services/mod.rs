mod dependency_expander;
mod exclusion_filter;
mod identity_resolver;
mod license_classifier;
mod multi_source_fetcher;
mod project_graph;
mod project_graph_walker;
mod report_assembler;
mod resolved_set;

pub use dependency_expander::{DependencyExpander, Expansion, PSEUDO_COMPONENTS};
pub use exclusion_filter::ExclusionFilter;
pub use identity_resolver::IdentityResolver;
pub use license_classifier::LicenseClassifier;
pub use multi_source_fetcher::{MultiSourceFetcher, DEFAULT_FETCH_TIMEOUT};
pub use project_graph::{ProjectGraph, UnitIndex};
pub use project_graph_walker::ProjectGraphWalker;
pub use report_assembler::{ReportAssembler, NOTICE_HEADER};
pub use resolved_set::ResolvedComponentSet;
