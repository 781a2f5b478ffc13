use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// An item of an evaluated project (`PackageReference`, `ProjectReference`, ...)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectItem {
    pub item_type: String,
    pub include: String,
    metadata: HashMap<String, String>,
}

impl ProjectItem {
    pub fn new(item_type: impl Into<String>, include: impl Into<String>) -> Self {
        Self {
            item_type: item_type.into(),
            include: include.into(),
            metadata: HashMap::new(),
        }
    }

    pub fn with_metadata(mut self, name: &str, value: impl Into<String>) -> Self {
        self.metadata.insert(name.to_lowercase(), value.into());
        self
    }

    /// Metadata lookup by name (case-insensitive). Empty values count as absent.
    pub fn metadata(&self, name: &str) -> Option<&str> {
        self.metadata
            .get(&name.to_lowercase())
            .map(String::as_str)
            .filter(|value| !value.is_empty())
    }
}

/// A build unit's declaration evaluated under a set of global properties.
///
/// Produced by a [`crate::ports::outbound::ProjectProvider`]; the resolution
/// engine only queries it.
#[derive(Debug, Clone, Default)]
pub struct EvaluatedProject {
    path: PathBuf,
    properties: HashMap<String, String>,
    items: Vec<ProjectItem>,
}

impl EvaluatedProject {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            properties: HashMap::new(),
            items: Vec::new(),
        }
    }

    pub fn with_property(mut self, name: &str, value: impl Into<String>) -> Self {
        self.set_property(name, value);
        self
    }

    pub fn with_item(mut self, item: ProjectItem) -> Self {
        self.items.push(item);
        self
    }

    pub fn set_property(&mut self, name: &str, value: impl Into<String>) {
        self.properties.insert(name.to_lowercase(), value.into());
    }

    pub fn push_item(&mut self, item: ProjectItem) {
        self.items.push(item);
    }

    /// Path of the declaration file this project was evaluated from
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn directory(&self) -> &Path {
        self.path.parent().unwrap_or_else(|| Path::new("."))
    }

    /// Property lookup by name (case-insensitive). Empty values count as absent.
    pub fn property(&self, name: &str) -> Option<&str> {
        self.properties
            .get(&name.to_lowercase())
            .map(String::as_str)
            .filter(|value| !value.trim().is_empty())
    }

    /// Strict boolean property: only `true`/`false` (any case) parse.
    pub fn bool_property(&self, name: &str) -> Option<bool> {
        match self.property(name)?.trim().to_lowercase().as_str() {
            "true" => Some(true),
            "false" => Some(false),
            _ => None,
        }
    }

    pub fn items<'a>(&'a self, item_type: &'a str) -> impl Iterator<Item = &'a ProjectItem> + 'a {
        self.items
            .iter()
            .filter(move |item| item.item_type.eq_ignore_ascii_case(item_type))
    }
}
