use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// The solution: the list of build unit declarations plus the per-solution
/// central version map.
#[derive(Debug, Clone, Default)]
pub struct Solution {
    path: PathBuf,
    projects: Vec<String>,
    central_versions: HashMap<String, String>,
}

impl Solution {
    pub fn new(path: PathBuf, projects: Vec<String>) -> Self {
        Self {
            path,
            projects,
            central_versions: HashMap::new(),
        }
    }

    pub fn with_central_version(mut self, name: &str, version: impl Into<String>) -> Self {
        self.central_versions
            .insert(name.to_lowercase(), version.into());
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn directory(&self) -> &Path {
        self.path.parent().unwrap_or_else(|| Path::new("."))
    }

    /// Declaration paths relative to the solution directory, in solution order
    pub fn projects(&self) -> &[String] {
        &self.projects
    }

    /// Centrally managed version of a component (case-insensitive)
    pub fn central_version(&self, name: &str) -> Option<&str> {
        self.central_versions
            .get(&name.to_lowercase())
            .map(String::as_str)
    }
}
