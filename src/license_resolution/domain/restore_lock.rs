use super::ComponentVersion;
use crate::shared::Result;
use serde::Deserialize;
use std::collections::BTreeMap;

#[derive(Debug, Deserialize)]
struct RestoreLockFile {
    #[serde(default)]
    libraries: BTreeMap<String, serde_json::Value>,
}

/// A library pinned by the restore step
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LockedLibrary {
    pub name: String,
    pub version: ComponentVersion,
}

/// The restore lock of one build unit: every component pinned to one version.
///
/// Libraries are keyed `name/version` in the file; keys that don't split into
/// a name and an exact version are ignored.
#[derive(Debug, Clone, Default)]
pub struct RestoreLock {
    libraries: Vec<LockedLibrary>,
}

impl RestoreLock {
    pub fn parse(content: &str) -> Result<Self> {
        let file: RestoreLockFile = serde_json::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse restore lock: {}", e))?;

        let libraries = file
            .libraries
            .keys()
            .filter_map(|key| {
                let (name, version) = key.rsplit_once('/')?;
                Some(LockedLibrary {
                    name: name.to_string(),
                    version: ComponentVersion::parse(version).ok()?,
                })
            })
            .collect();

        Ok(Self { libraries })
    }

    pub fn from_libraries(libraries: Vec<LockedLibrary>) -> Self {
        Self { libraries }
    }

    pub fn libraries(&self) -> &[LockedLibrary] {
        &self.libraries
    }

    /// Finds the single pinned version of `name` (case-insensitive).
    ///
    /// # Errors
    /// Returns an error if the lock holds no entry or more than one entry for `name`.
    pub fn unique_version(&self, name: &str) -> Result<&ComponentVersion> {
        let mut matches = self
            .libraries
            .iter()
            .filter(|library| library.name.eq_ignore_ascii_case(name));

        match (matches.next(), matches.next()) {
            (Some(library), None) => Ok(&library.version),
            (None, _) => anyhow::bail!("no entry for {} in restore lock", name),
            (Some(_), Some(_)) => anyhow::bail!("multiple entries for {} in restore lock", name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LOCK: &str = r#"{
        "version": 3,
        "libraries": {
            "Foo/1.2.3": { "type": "package" },
            "Bar/2.0.0": { "type": "package" },
            "Bar/2.1.0": { "type": "package" },
            "Lib/1.0.0": { "type": "project" },
            "broken": {}
        }
    }"#;

    #[test]
    fn test_parse_libraries() {
        let lock = RestoreLock::parse(LOCK).unwrap();
        assert_eq!(lock.libraries().len(), 4);
    }

    #[test]
    fn test_unique_version_found_case_insensitive() {
        let lock = RestoreLock::parse(LOCK).unwrap();
        assert_eq!(lock.unique_version("foo").unwrap().original(), "1.2.3");
    }

    #[test]
    fn test_unique_version_missing() {
        let lock = RestoreLock::parse(LOCK).unwrap();
        let err = lock.unique_version("Baz").unwrap_err().to_string();
        assert!(err.contains("no entry for Baz"));
    }

    #[test]
    fn test_unique_version_ambiguous() {
        let lock = RestoreLock::parse(LOCK).unwrap();
        let err = lock.unique_version("Bar").unwrap_err().to_string();
        assert!(err.contains("multiple entries for Bar"));
    }

    #[test]
    fn test_parse_invalid_json() {
        assert!(RestoreLock::parse("not json").is_err());
    }
}
