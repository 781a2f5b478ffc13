use crate::license_resolution::domain::{
    EvaluatedProject, ProjectItem, RestoreLock, Solution, TargetPlatform,
};
use crate::ports::outbound::{ProjectProvider, RESTORE_LOCK_PROPERTY, TARGET_PLATFORM_PROPERTY};
use crate::shared::error::NoticeError;
use crate::shared::path::{normalize_path, portable};
use crate::shared::security::read_regular_file;
use crate::shared::Result;
use regex::{Captures, Regex};
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::Path;
use std::sync::OnceLock;

/// Restore lock location when a unit doesn't set `ProjectAssetsFile`
pub const DEFAULT_RESTORE_LOCK: &str = "obj/project.assets.json";

/// Maximum nesting of `$(Name)` references
const MAX_EXPANSION_DEPTH: usize = 16;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case")]
struct SolutionFile {
    #[serde(default, rename = "project")]
    projects: Vec<SolutionProject>,
    #[serde(default)]
    central_versions: BTreeMap<String, String>,
}

#[derive(Debug, Deserialize)]
struct SolutionProject {
    path: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
struct UnitFile {
    #[serde(default)]
    properties: BTreeMap<String, toml::Value>,
    #[serde(default)]
    property_group: Vec<PropertyGroup>,
    #[serde(default)]
    item: Vec<ItemEntry>,
}

#[derive(Debug, Deserialize)]
struct PropertyGroup {
    #[serde(default)]
    when: BTreeMap<String, toml::Value>,
    #[serde(default)]
    properties: BTreeMap<String, toml::Value>,
}

#[derive(Debug, Deserialize)]
struct ItemEntry {
    #[serde(rename = "type")]
    item_type: String,
    include: String,
    #[serde(default)]
    metadata: BTreeMap<String, toml::Value>,
    #[serde(default)]
    when: BTreeMap<String, toml::Value>,
}

/// FileSystemReader adapter for reading solution and build unit declarations
///
/// This adapter implements the ProjectProvider port over TOML declarations:
/// a solution manifest listing the units, one declaration per unit, and the
/// JSON restore lock each unit points to.
pub struct FileSystemReader;

impl FileSystemReader {
    pub fn new() -> Self {
        Self
    }
}

impl Default for FileSystemReader {
    fn default() -> Self {
        Self::new()
    }
}

impl ProjectProvider for FileSystemReader {
    fn load_solution(&self, path: &Path) -> Result<Solution> {
        if !path.exists() {
            return Err(NoticeError::InvalidInput {
                path: path.to_path_buf(),
                reason: "solution manifest does not exist".to_string(),
            }
            .into());
        }

        let content = read_regular_file(path, "solution manifest").map_err(|e| {
            NoticeError::FileReadError {
                path: path.to_path_buf(),
                details: e.to_string(),
            }
        })?;
        let file: SolutionFile = toml::from_str(&content).map_err(|e| NoticeError::InvalidInput {
            path: path.to_path_buf(),
            reason: format!("Failed to parse solution manifest: {}", e),
        })?;

        let projects = file.projects.into_iter().map(|p| p.path).collect();
        Ok(file
            .central_versions
            .into_iter()
            .fold(Solution::new(path.to_path_buf(), projects), |solution, (name, version)| {
                solution.with_central_version(&name, version)
            }))
    }

    fn evaluate(&self, path: &Path, platform: Option<&TargetPlatform>) -> Result<EvaluatedProject> {
        let content = read_regular_file(path, "build unit declaration")?;
        let file: UnitFile = toml::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Failed to parse {}: {}", path.display(), e))?;

        let mut global = HashMap::new();
        if let Some(platform) = platform {
            global.insert(
                TARGET_PLATFORM_PROPERTY.to_lowercase(),
                platform.short_name().to_string(),
            );
        }

        Evaluator::new(global).evaluate(path, file)
    }

    fn load_restore_lock(&self, project: &EvaluatedProject) -> Result<RestoreLock> {
        let declared = project
            .property(RESTORE_LOCK_PROPERTY)
            .unwrap_or(DEFAULT_RESTORE_LOCK);
        let lock_path = normalize_path(project.directory(), &portable(declared));

        if !lock_path.exists() {
            anyhow::bail!("restore lock {} does not exist", lock_path.display());
        }
        let content = read_regular_file(&lock_path, "restore lock")?;
        RestoreLock::parse(&content)
    }
}

/// Evaluates one declaration: global properties win over file properties,
/// conditional groups and items apply when every `when` key matches.
struct Evaluator {
    global: HashMap<String, String>,
    properties: HashMap<String, (String, String)>,
}

impl Evaluator {
    fn new(global: HashMap<String, String>) -> Self {
        Self {
            global,
            properties: HashMap::new(),
        }
    }

    fn evaluate(mut self, path: &Path, file: UnitFile) -> Result<EvaluatedProject> {
        self.define_all(&file.properties)?;
        for group in &file.property_group {
            if self.matches(&group.when)? {
                self.define_all(&group.properties)?;
            }
        }

        let mut project = EvaluatedProject::new(path.to_path_buf());
        let names: Vec<(String, String)> = self
            .properties
            .values()
            .map(|(name, _)| (name.clone(), self.value_of(&name.to_lowercase())))
            .collect();
        for (name, value) in names {
            project.set_property(&name, value);
        }
        for (name, value) in &self.global {
            project.set_property(name, value.clone());
        }

        for entry in &file.item {
            if !self.matches(&entry.when)? {
                continue;
            }
            let mut item = ProjectItem::new(entry.item_type.clone(), self.expand(&entry.include));
            for (name, value) in &entry.metadata {
                item = item.with_metadata(name, self.expand(&scalar(name, value)?));
            }
            project.push_item(item);
        }

        Ok(project)
    }

    fn define_all(&mut self, properties: &BTreeMap<String, toml::Value>) -> Result<()> {
        for (name, value) in properties {
            let key = name.to_lowercase();
            if self.global.contains_key(&key) {
                continue;
            }
            self.properties.insert(key, (name.clone(), scalar(name, value)?));
        }
        Ok(())
    }

    fn matches(&self, when: &BTreeMap<String, toml::Value>) -> Result<bool> {
        for (name, expected) in when {
            let expected = self.expand(&scalar(name, expected)?);
            if !self.value_of(&name.to_lowercase()).eq_ignore_ascii_case(expected.trim()) {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// Expanded value of a property; undefined properties are empty
    fn value_of(&self, key: &str) -> String {
        self.lookup(key, &mut HashSet::new(), 0)
    }

    fn lookup(&self, key: &str, seen: &mut HashSet<String>, depth: usize) -> String {
        if let Some(value) = self.global.get(key) {
            return value.clone();
        }
        let Some((_, raw)) = self.properties.get(key) else {
            return String::new();
        };
        if depth >= MAX_EXPANSION_DEPTH || !seen.insert(key.to_string()) {
            return String::new();
        }
        let value = self.expand_with(raw, seen, depth + 1);
        seen.remove(key);
        value
    }

    fn expand(&self, text: &str) -> String {
        self.expand_with(text, &mut HashSet::new(), 0)
    }

    fn expand_with(&self, text: &str, seen: &mut HashSet<String>, depth: usize) -> String {
        property_reference()
            .replace_all(text, |captures: &Captures| {
                self.lookup(&captures[1].to_lowercase(), seen, depth)
            })
            .into_owned()
    }
}

fn property_reference() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"\$\(([A-Za-z_][A-Za-z0-9_.\-]*)\)")
            .expect("Failed to compile property reference pattern")
    })
}

/// Declarations may write scalars without quotes; they evaluate as text.
fn scalar(name: &str, value: &toml::Value) -> Result<String> {
    match value {
        toml::Value::String(text) => Ok(text.clone()),
        toml::Value::Boolean(flag) => Ok(flag.to_string()),
        toml::Value::Integer(number) => Ok(number.to_string()),
        toml::Value::Float(number) => Ok(number.to_string()),
        _ => anyhow::bail!("{} must be a string, boolean or number", name),
    }
}
