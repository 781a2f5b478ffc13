use crate::shared::Result;
use std::cmp::Ordering;
use std::fmt;

/// Maximum length for component names (security limit)
const MAX_COMPONENT_NAME_LENGTH: usize = 255;

/// Maximum length for version strings (security limit)
const MAX_VERSION_LENGTH: usize = 100;

/// NewType wrapper for a component name as declared.
///
/// Display and report ordering use the declared spelling; [`ComponentName::key`]
/// is the case-insensitive form used for deduplication.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ComponentName(String);

impl ComponentName {
    pub fn new(name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            anyhow::bail!("Component name cannot be empty");
        }

        if name.len() > MAX_COMPONENT_NAME_LENGTH {
            anyhow::bail!(
                "Component name is too long ({} bytes). Maximum allowed: {} bytes",
                name.len(),
                MAX_COMPONENT_NAME_LENGTH
            );
        }

        // Names end up in URLs and cache paths
        if !name
            .chars()
            .all(|c| c.is_alphanumeric() || c == '-' || c == '_' || c == '.')
        {
            anyhow::bail!(
                "Component name '{}' contains invalid characters. Only alphanumeric, hyphens, underscores and dots are allowed.",
                name
            );
        }

        Ok(Self(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Case-insensitive key used by the resolved component set
    pub fn key(&self) -> String {
        self.0.to_lowercase()
    }
}

impl fmt::Display for ComponentName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A concrete component version: `major[.minor[.patch[.revision]]][-pre][+meta]`.
///
/// The first three parts and the prerelease label are held as a
/// [`semver::Version`]; the optional fourth part is a revision compared after
/// the patch number. Build metadata never takes part in comparisons.
#[derive(Debug, Clone)]
pub struct ComponentVersion {
    semver: semver::Version,
    revision: u64,
    original: String,
}

impl ComponentVersion {
    /// Parses an exact version. Ranges, wildcards and empty strings are rejected.
    pub fn parse(input: &str) -> Result<Self> {
        let original = input.trim();
        if original.is_empty() {
            anyhow::bail!("Version cannot be empty");
        }
        if original.len() > MAX_VERSION_LENGTH {
            anyhow::bail!(
                "Version is too long ({} bytes). Maximum allowed: {} bytes",
                original.len(),
                MAX_VERSION_LENGTH
            );
        }

        let (without_meta, _metadata) = match original.split_once('+') {
            Some((head, meta)) => (head, Some(meta)),
            None => (original, None),
        };
        let (numbers, pre) = match without_meta.split_once('-') {
            Some((head, pre)) => (head, pre),
            None => (without_meta, ""),
        };

        let parts: Vec<&str> = numbers.split('.').collect();
        if parts.is_empty() || parts.len() > 4 {
            anyhow::bail!("'{}' is not an exact version", original);
        }

        let mut numeric = [0u64; 4];
        for (slot, part) in numeric.iter_mut().zip(&parts) {
            if part.is_empty() || !part.chars().all(|c| c.is_ascii_digit()) {
                anyhow::bail!("'{}' is not an exact version", original);
            }
            *slot = part
                .parse()
                .map_err(|e| anyhow::anyhow!("Invalid version number in '{}': {}", original, e))?;
        }

        let mut semver = semver::Version::new(numeric[0], numeric[1], numeric[2]);
        if !pre.is_empty() {
            semver.pre = semver::Prerelease::new(pre)
                .map_err(|e| anyhow::anyhow!("Invalid prerelease label in '{}': {}", original, e))?;
        }

        Ok(Self {
            semver,
            revision: numeric[3],
            original: original.to_string(),
        })
    }

    /// The version as it was declared
    pub fn original(&self) -> &str {
        &self.original
    }

    /// Normalized form: three parts minimum, revision only when non-zero,
    /// prerelease kept, metadata dropped. Used for cache paths and feed URLs.
    pub fn normalized(&self) -> String {
        let mut out = format!(
            "{}.{}.{}",
            self.semver.major, self.semver.minor, self.semver.patch
        );
        if self.revision != 0 {
            out.push_str(&format!(".{}", self.revision));
        }
        if !self.semver.pre.is_empty() {
            out.push('-');
            out.push_str(self.semver.pre.as_str());
        }
        out
    }
}

impl PartialEq for ComponentVersion {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for ComponentVersion {}

impl PartialOrd for ComponentVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ComponentVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.semver.major, self.semver.minor, self.semver.patch, self.revision)
            .cmp(&(
                other.semver.major,
                other.semver.minor,
                other.semver.patch,
                other.revision,
            ))
            // semver orders a release above its prereleases
            .then_with(|| self.semver.pre.cmp(&other.semver.pre))
    }
}

impl fmt::Display for ComponentVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.original)
    }
}

/// Resolved key of a component: a name pinned to one concrete version
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentIdentity {
    name: ComponentName,
    version: ComponentVersion,
}

impl ComponentIdentity {
    pub fn new(name: ComponentName, version: ComponentVersion) -> Self {
        Self { name, version }
    }

    pub fn parse(name: &str, version: &str) -> Result<Self> {
        Ok(Self::new(
            ComponentName::new(name)?,
            ComponentVersion::parse(version)?,
        ))
    }

    pub fn name(&self) -> &ComponentName {
        &self.name
    }

    pub fn version(&self) -> &ComponentVersion {
        &self.version
    }

    /// Returns true if both identities name the same component (case-insensitive)
    pub fn same_component(&self, other: &ComponentIdentity) -> bool {
        self.name.key() == other.name.key()
    }
}

impl fmt::Display for ComponentIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.name, self.version)
    }
}

/// A component reference declared by a build unit under one target platform
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentRequirement {
    pub name: String,
    /// Declared version, range or wildcard; `None` when nothing resolvable was declared
    pub version: Option<String>,
    pub private_assets: bool,
    pub exclude_assets: Option<String>,
}

impl ComponentRequirement {
    pub fn new(name: impl Into<String>, version: Option<String>) -> Self {
        Self {
            name: name.into(),
            version,
            private_assets: false,
            exclude_assets: None,
        }
    }

    /// Private requirements and those excluding runtime assets never reach
    /// the deployed bundle.
    pub fn reaches_bundle(&self) -> bool {
        if self.private_assets {
            return false;
        }
        !self
            .exclude_assets
            .as_deref()
            .map(|flags| flags.to_lowercase().contains("runtime"))
            .unwrap_or(false)
    }
}
