use super::*;
use crate::license_resolution::domain::{
    ArchiveEntries, ComponentArchive, ComponentManifest, ComponentVersion, EvaluatedProject,
    LockedLibrary, ProjectItem, RestoreLock, TargetPlatform,
};
use crate::ports::outbound::FetchOutcome;
use async_trait::async_trait;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

const SOLUTION: &str = "/repo/app.sln.toml";

// Mock implementations for testing
struct MockProjectProvider {
    solution: Solution,
    projects: HashMap<PathBuf, EvaluatedProject>,
    lock: Vec<(&'static str, &'static str)>,
}

impl MockProjectProvider {
    fn new(projects: Vec<(&str, EvaluatedProject)>) -> Self {
        Self {
            solution: Solution::new(
                PathBuf::from(SOLUTION),
                projects.iter().map(|(relative, _)| relative.to_string()).collect(),
            ),
            projects: projects
                .into_iter()
                .map(|(_, project)| (project.path().to_path_buf(), project))
                .collect(),
            lock: Vec::new(),
        }
    }

    fn with_locked(mut self, name: &'static str, version: &'static str) -> Self {
        self.lock.push((name, version));
        self
    }
}

impl ProjectProvider for MockProjectProvider {
    fn load_solution(&self, _path: &Path) -> Result<Solution> {
        Ok(self.solution.clone())
    }

    fn evaluate(&self, path: &Path, _platform: Option<&TargetPlatform>) -> Result<EvaluatedProject> {
        self.projects
            .get(path)
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("{} does not exist", path.display()))
    }

    fn load_restore_lock(&self, _project: &EvaluatedProject) -> Result<RestoreLock> {
        Ok(RestoreLock::from_libraries(
            self.lock
                .iter()
                .map(|(name, version)| LockedLibrary {
                    name: name.to_string(),
                    version: ComponentVersion::parse(version).unwrap(),
                })
                .collect(),
        ))
    }
}

/// Serves archives from memory, keyed by lowercase `id/version`
#[derive(Default)]
struct MockPackageSource {
    manifests: HashMap<String, String>,
}

impl MockPackageSource {
    fn with(mut self, id: &str, version: &str, fields: &str) -> Self {
        self.manifests.insert(
            format!("{}/{}", id, version).to_lowercase(),
            format!(r#"{{ "id": "{}", "version": "{}"{} }}"#, id, version, fields),
        );
        self
    }
}

#[async_trait]
impl PackageSource for MockPackageSource {
    fn name(&self) -> &str {
        "mock"
    }

    fn cached(&self, _identity: &ComponentIdentity) -> Option<ComponentArchive> {
        None
    }

    async fn fetch(&self, identity: &ComponentIdentity) -> Result<FetchOutcome> {
        let key = format!("{}/{}", identity.name(), identity.version().normalized()).to_lowercase();
        let Some(manifest) = self.manifests.get(&key) else {
            return Ok(FetchOutcome::NotFound);
        };
        Ok(FetchOutcome::Available(ComponentArchive::new(
            identity.clone(),
            ComponentManifest::parse(manifest)?,
            ArchiveEntries::InMemory(HashMap::new()),
        )?))
    }
}

struct MockLicenseTextFetcher;

#[async_trait]
impl LicenseTextFetcher for MockLicenseTextFetcher {
    async fn fetch_text(&self, _url: &str) -> String {
        String::new()
    }
}

#[derive(Default)]
struct MockProgressReporter {
    messages: Mutex<Vec<String>>,
    warnings: Mutex<Vec<String>>,
}

impl ProgressReporter for MockProgressReporter {
    fn report(&self, message: &str) {
        self.messages.lock().unwrap().push(message.to_string());
    }
    fn report_progress(&self, _current: usize, _total: usize, _message: Option<&str>) {}
    fn report_warning(&self, message: &str) {
        self.warnings.lock().unwrap().push(message.to_string());
    }
    fn report_error(&self, _message: &str) {}
    fn report_completion(&self, _message: &str) {}
}

const MIT: &str = r#", "projectUrl": "https://example.com", "license": { "type": "expression", "value": "MIT" }"#;

fn unit(path: &str, root: bool) -> EvaluatedProject {
    let project = EvaluatedProject::new(PathBuf::from(path)).with_property("TargetFramework", "net8.0");
    if root {
        project.with_property("IsDeploymentTarget", "true")
    } else {
        project
    }
}

fn package(name: &str, version: &str) -> ProjectItem {
    ProjectItem::new("PackageReference", name).with_metadata("Version", version)
}

fn use_case(
    provider: MockProjectProvider,
    source: MockPackageSource,
) -> GenerateNoticeUseCase<MockProjectProvider, MockLicenseTextFetcher, MockProgressReporter> {
    GenerateNoticeUseCase::new(
        provider,
        vec![Arc::new(source)],
        MockLicenseTextFetcher,
        MockProgressReporter::default(),
    )
}

fn request() -> NoticeRequest {
    NoticeRequest::new(PathBuf::from(SOLUTION))
}

#[tokio::test]
async fn test_execute_single_component() {
    let provider = MockProjectProvider::new(vec![(
        "App/App.unit.toml",
        unit("/repo/App/App.unit.toml", true).with_item(package("Foo", "1.0.0")),
    )]);
    let source = MockPackageSource::default().with("Foo", "1.0.0", MIT);

    let response = use_case(provider, source).execute(request()).await.unwrap();

    assert_eq!(response.included_units, vec!["App/App.unit.toml".to_string()]);
    assert_eq!(response.resolved_components, 1);
    assert_eq!(response.reported_components, 1);
    assert!(response.content.starts_with(
        "This product bundles the following components under the described licenses:\r\n\r\n"
    ));
    assert!(response.content.contains(
        "Id:      Foo\r\nVersion: 1.0.0\r\nProject: https://example.com\r\nLicense: MIT\r\n"
    ));
}

#[tokio::test]
async fn test_execute_without_deployment_root_fails() {
    let provider = MockProjectProvider::new(vec![(
        "Lib/Lib.unit.toml",
        unit("/repo/Lib/Lib.unit.toml", false).with_item(package("Foo", "1.0.0")),
    )]);

    let error = use_case(provider, MockPackageSource::default())
        .execute(request())
        .await
        .unwrap_err();

    assert!(matches!(
        error.downcast_ref::<NoticeError>(),
        Some(NoticeError::GraphEmpty { .. })
    ));
}

#[tokio::test]
async fn test_referenced_unit_requirements_are_included() {
    let provider = MockProjectProvider::new(vec![
        (
            "App/App.unit.toml",
            unit("/repo/App/App.unit.toml", true)
                .with_item(ProjectItem::new("ProjectReference", "../Lib/Lib.unit.toml")),
        ),
        (
            "Lib/Lib.unit.toml",
            unit("/repo/Lib/Lib.unit.toml", false).with_item(package("Bar", "2.0.0")),
        ),
        (
            "Tools/Tools.unit.toml",
            unit("/repo/Tools/Tools.unit.toml", false).with_item(package("Unused", "1.0.0")),
        ),
    ]);
    let source = MockPackageSource::default().with("Bar", "2.0.0", MIT);

    let response = use_case(provider, source).execute(request()).await.unwrap();

    assert_eq!(
        response.included_units,
        vec!["App/App.unit.toml".to_string(), "Lib/Lib.unit.toml".to_string()]
    );
    assert!(response.content.contains("Id:      Bar\r\n"));
    assert!(!response.content.contains("Unused"));
}

#[tokio::test]
async fn test_wrapper_without_project_url_is_expanded() {
    let provider = MockProjectProvider::new(vec![(
        "App/App.unit.toml",
        unit("/repo/App/App.unit.toml", true).with_item(package("Wrapper", "1.0.0")),
    )])
    .with_locked("Inner", "2.1.0");
    let source = MockPackageSource::default()
        .with(
            "Wrapper",
            "1.0.0",
            r#", "dependencyGroups": [{ "targetFramework": "net8.0", "dependencies": [{ "id": "Inner", "version": "[2.0.0, )" }] }]"#,
        )
        .with("Inner", "2.1.0", MIT);
    let use_case = use_case(provider, source);

    let response = use_case.execute(request()).await.unwrap();

    assert_eq!(response.resolved_components, 2);
    assert_eq!(response.reported_components, 1);
    assert!(response.content.contains("Id:      Inner\r\nVersion: 2.1.0\r\n"));
    assert!(!response.content.contains("Id:      Wrapper"));
    let messages = use_case.progress_reporter.messages.lock().unwrap();
    assert!(messages.contains(&"  - No project url found in Wrapper 1.0.0, scanning dependencies".to_string()));
    assert!(messages.contains(&"Skip Wrapper: No project URL".to_string()));
}

#[tokio::test]
async fn test_component_with_project_url_is_not_expanded() {
    let provider = MockProjectProvider::new(vec![(
        "App/App.unit.toml",
        unit("/repo/App/App.unit.toml", true).with_item(package("Foo", "1.0.0")),
    )]);
    let fields = format!(
        r#"{}, "dependencyGroups": [{{ "dependencies": [{{ "id": "Dep", "version": "1.0.0" }}] }}]"#,
        MIT
    );
    let source = MockPackageSource::default()
        .with("Foo", "1.0.0", &fields)
        .with("Dep", "1.0.0", MIT);

    let response = use_case(provider, source).execute(request()).await.unwrap();

    assert_eq!(response.resolved_components, 1);
    assert!(!response.content.contains("Id:      Dep"));
}

#[tokio::test]
async fn test_recursive_mode_expands_every_component() {
    let provider = MockProjectProvider::new(vec![(
        "App/App.unit.toml",
        unit("/repo/App/App.unit.toml", true).with_item(package("Foo", "1.0.0")),
    )]);
    let fields = format!(
        r#"{}, "dependencyGroups": [{{ "dependencies": [{{ "id": "Dep", "version": "1.0.0" }}, {{ "id": "NETStandard.Library", "version": "2.0.3" }}] }}]"#,
        MIT
    );
    let source = MockPackageSource::default()
        .with("Foo", "1.0.0", &fields)
        .with("Dep", "1.0.0", MIT)
        .with("NETStandard.Library", "2.0.3", "");
    let mut request = request();
    request.recursive = true;

    let response = use_case(provider, source).execute(request).await.unwrap();

    assert_eq!(response.resolved_components, 3);
    assert_eq!(response.reported_components, 2);
    let dep = response.content.find("Id:      Dep").unwrap();
    let foo = response.content.find("Id:      Foo").unwrap();
    assert!(dep < foo);
}

#[tokio::test]
async fn test_unavailable_transitive_dependency_is_dropped() {
    let provider = MockProjectProvider::new(vec![(
        "App/App.unit.toml",
        unit("/repo/App/App.unit.toml", true).with_item(package("Wrapper", "1.0.0")),
    )]);
    let source = MockPackageSource::default().with(
        "Wrapper",
        "1.0.0",
        r#", "dependencyGroups": [{ "dependencies": [{ "id": "Gone", "version": "1.0.0" }, { "id": "Unpinned" }] }]"#,
    );
    let use_case = use_case(provider, source);

    let response = use_case.execute(request()).await.unwrap();

    assert_eq!(response.resolved_components, 1);
    let warnings = use_case.progress_reporter.warnings.lock().unwrap();
    assert_eq!(warnings.len(), 2);
    assert!(warnings[0].starts_with("Dropped dependency Gone of Wrapper 1.0.0"));
    assert!(warnings[1].starts_with("Dropped dependency Unpinned of Wrapper 1.0.0"));
}

#[tokio::test]
async fn test_malformed_transitive_dependency_id_is_dropped() {
    let provider = MockProjectProvider::new(vec![(
        "App/App.unit.toml",
        unit("/repo/App/App.unit.toml", true).with_item(package("Wrapper", "1.0.0")),
    )])
    .with_locked("Inner", "2.1.0");
    let source = MockPackageSource::default()
        .with(
            "Wrapper",
            "1.0.0",
            r#", "dependencyGroups": [{ "dependencies": [{ "id": "Foo Bar", "version": "[1.0,)" }, { "id": "Inner", "version": "2.1.0" }] }]"#,
        )
        .with("Inner", "2.1.0", MIT);
    let use_case = use_case(provider, source);

    let response = use_case.execute(request()).await.unwrap();

    assert_eq!(response.resolved_components, 2);
    assert!(response.content.contains("Id:      Inner\r\n"));
    let warnings = use_case.progress_reporter.warnings.lock().unwrap();
    assert_eq!(warnings.len(), 1);
    assert!(warnings[0].starts_with("Dropped dependency Foo Bar of Wrapper 1.0.0"));
}

#[tokio::test]
async fn test_unavailable_declared_requirement_is_fatal() {
    let provider = MockProjectProvider::new(vec![(
        "App/App.unit.toml",
        unit("/repo/App/App.unit.toml", true).with_item(package("Missing", "1.0.0")),
    )]);

    let error = use_case(provider, MockPackageSource::default())
        .execute(request())
        .await
        .unwrap_err();

    assert!(matches!(
        error.downcast_ref::<NoticeError>(),
        Some(NoticeError::UnresolvedComponent { .. })
    ));
}

#[tokio::test]
async fn test_exclude_pattern_filters_report() {
    let provider = MockProjectProvider::new(vec![(
        "App/App.unit.toml",
        unit("/repo/App/App.unit.toml", true)
            .with_item(package("Foo", "1.0.0"))
            .with_item(package("Contoso.Internal", "3.0.0")),
    )]);
    let source = MockPackageSource::default()
        .with("Foo", "1.0.0", MIT)
        .with("Contoso.Internal", "3.0.0", MIT);
    let mut request = request();
    request.exclude = Some("^contoso\\.".to_string());

    let response = use_case(provider, source).execute(request).await.unwrap();

    assert_eq!(response.resolved_components, 2);
    assert_eq!(response.reported_components, 1);
    assert!(!response.content.contains("Contoso.Internal"));
}

#[tokio::test]
async fn test_unmatched_exclude_pattern_warns() {
    let provider = MockProjectProvider::new(vec![(
        "App/App.unit.toml",
        unit("/repo/App/App.unit.toml", true).with_item(package("Foo", "1.0.0")),
    )]);
    let source = MockPackageSource::default().with("Foo", "1.0.0", MIT);
    let mut request = request();
    request.exclude = Some("^Nothing$".to_string());
    let use_case = use_case(provider, source);

    use_case.execute(request).await.unwrap();

    let warnings = use_case.progress_reporter.warnings.lock().unwrap();
    assert_eq!(
        warnings.as_slice(),
        &["Exclude pattern '^Nothing$' did not match any component".to_string()]
    );
}

#[tokio::test]
async fn test_invalid_exclude_pattern_is_config_error() {
    let provider = MockProjectProvider::new(vec![]);
    let mut request = request();
    request.exclude = Some("(unclosed".to_string());

    let error = use_case(provider, MockPackageSource::default())
        .execute(request)
        .await
        .unwrap_err();

    assert!(matches!(
        error.downcast_ref::<NoticeError>(),
        Some(NoticeError::ConfigError { .. })
    ));
}

#[tokio::test]
async fn test_output_is_identical_across_runs() {
    let build = || {
        let provider = MockProjectProvider::new(vec![(
            "App/App.unit.toml",
            unit("/repo/App/App.unit.toml", true)
                .with_item(package("Zeta", "1.0.0"))
                .with_item(package("Alpha", "1.0.0"))
                .with_item(package("beta", "1.0.0")),
        )]);
        let source = MockPackageSource::default()
            .with("Zeta", "1.0.0", MIT)
            .with("Alpha", "1.0.0", MIT)
            .with("beta", "1.0.0", MIT);
        use_case(provider, source)
    };

    let mut first_request = request();
    first_request.max_concurrent_fetches = 1;
    let first = build().execute(first_request).await.unwrap();
    let second = build().execute(request()).await.unwrap();

    assert_eq!(first.content, second.content);
    let alpha = first.content.find("Id:      Alpha").unwrap();
    let zeta = first.content.find("Id:      Zeta").unwrap();
    let beta = first.content.find("Id:      beta").unwrap();
    assert!(alpha < zeta && zeta < beta);
}
