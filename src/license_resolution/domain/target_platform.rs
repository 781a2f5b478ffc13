use crate::shared::Result;
use std::fmt;

/// Platform family a target platform belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PlatformFamily {
    /// Platform-neutral; compatible with every consumer
    Any,
    /// `net11`..`net48`
    NetFramework,
    /// `netcoreapp*` and `net5.0`+
    NetCoreApp,
    /// `netstandard*`
    NetStandard,
    /// Any other identifier, only compatible with itself
    Other(String),
}

/// A target platform such as `net6.0`, `net48`, `netstandard2.0` or
/// `net6.0-windows7.0`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TargetPlatform {
    family: PlatformFamily,
    version: (u32, u32, u32),
    os: Option<String>,
    os_version: (u32, u32, u32),
    short_name: String,
}

impl TargetPlatform {
    pub fn any() -> Self {
        Self {
            family: PlatformFamily::Any,
            version: (0, 0, 0),
            os: None,
            os_version: (0, 0, 0),
            short_name: "any".to_string(),
        }
    }

    /// Parses a short folder name. An empty string means [`TargetPlatform::any`].
    pub fn parse(input: &str) -> Result<Self> {
        let short_name = input.trim().to_lowercase();
        if short_name.is_empty() || short_name == "any" {
            return Ok(Self::any());
        }

        let (framework, os_part) = match short_name.split_once('-') {
            Some((framework, os)) => (framework, Some(os)),
            None => (short_name.as_str(), None),
        };

        let identifier: String = framework
            .chars()
            .take_while(|c| c.is_ascii_alphabetic())
            .collect();
        let version_text = &framework[identifier.len()..];
        if identifier.is_empty() {
            anyhow::bail!("'{}' is not a valid target platform", input);
        }
        let version = parse_platform_version(version_text)
            .ok_or_else(|| anyhow::anyhow!("'{}' has an invalid platform version", input))?;

        let family = match identifier.as_str() {
            "netcoreapp" => PlatformFamily::NetCoreApp,
            "netstandard" => PlatformFamily::NetStandard,
            "net" if version.0 >= 5 => PlatformFamily::NetCoreApp,
            "net" => PlatformFamily::NetFramework,
            other => PlatformFamily::Other(other.to_string()),
        };

        let (os, os_version) = match os_part {
            Some(os) => {
                let name: String = os.chars().take_while(|c| c.is_ascii_alphabetic()).collect();
                if name.is_empty() {
                    anyhow::bail!("'{}' has an invalid platform qualifier", input);
                }
                let os_version = parse_platform_version(&os[name.len()..]).ok_or_else(|| {
                    anyhow::anyhow!("'{}' has an invalid platform qualifier version", input)
                })?;
                (Some(name), os_version)
            }
            None => (None, (0, 0, 0)),
        };

        Ok(Self {
            family,
            version,
            os,
            os_version,
            short_name,
        })
    }

    pub fn family(&self) -> &PlatformFamily {
        &self.family
    }

    pub fn short_name(&self) -> &str {
        &self.short_name
    }

    /// Drops the platform qualifier version so that `net6.0-windows7.0` and
    /// `net6.0-windows` compare as the same platform.
    pub fn without_os_version(&self) -> Self {
        let mut stripped = self.clone();
        stripped.os_version = (0, 0, 0);
        if let (Some(os), Some((framework, _))) = (&self.os, self.short_name.split_once('-')) {
            stripped.short_name = format!("{}-{}", framework, os);
        }
        stripped
    }

    /// Returns true if a component built for `self` can be consumed by `consumer`
    pub fn is_compatible_with(&self, consumer: &TargetPlatform) -> bool {
        if self.family == PlatformFamily::Any {
            return true;
        }

        let framework_ok = match (&self.family, &consumer.family) {
            (candidate, target) if candidate == target => self.version <= consumer.version,
            (PlatformFamily::NetStandard, PlatformFamily::NetCoreApp) => {
                let max = if consumer.version >= (3, 0, 0) { (2, 1, 0) } else { (2, 0, 0) };
                self.version <= max
            }
            (PlatformFamily::NetStandard, PlatformFamily::NetFramework) => {
                consumer.version >= (4, 6, 1) && self.version <= (2, 0, 0)
            }
            _ => false,
        };
        if !framework_ok {
            return false;
        }

        match (&self.os, &consumer.os) {
            (None, _) => true,
            (Some(candidate), Some(target)) => {
                candidate == target && self.os_version <= consumer.os_version
            }
            (Some(_), None) => false,
        }
    }

    /// Ranks a compatible candidate; higher is nearer to `consumer`.
    fn nearness(&self, consumer: &TargetPlatform) -> (u8, (u32, u32, u32), u8, (u32, u32, u32)) {
        let family_rank = match &self.family {
            family if *family == consumer.family => 3,
            PlatformFamily::NetStandard => 2,
            PlatformFamily::Any => 0,
            _ => 1,
        };
        let os_rank = u8::from(self.os.is_some());
        (family_rank, self.version, os_rank, self.os_version)
    }

    /// Selects the candidate nearest to `consumer`.
    ///
    /// Exact matches win; otherwise the compatible candidate with the closest
    /// family and highest version. When nothing is compatible, platform
    /// qualifier versions are ignored on both sides and the search repeats.
    pub fn nearest<'a, T, F>(candidates: &'a [T], consumer: &TargetPlatform, platform_of: F) -> Option<&'a T>
    where
        F: Fn(&T) -> &TargetPlatform,
    {
        let search = |strip: bool| {
            let target = if strip { consumer.without_os_version() } else { consumer.clone() };
            let project = |item: &T| {
                let platform = platform_of(item);
                if strip {
                    platform.without_os_version()
                } else {
                    platform.clone()
                }
            };

            if let Some(exact) = candidates.iter().find(|&item| project(item) == target) {
                return Some(exact);
            }

            candidates
                .iter()
                .filter(|&item| project(item).is_compatible_with(&target))
                .max_by_key(|&item| project(item).nearness(&target))
        };

        search(false).or_else(|| search(true))
    }
}

impl fmt::Display for TargetPlatform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.short_name)
    }
}

/// Parses `6.0`, `2.1`, compact `48` (4.8) / `461` (4.6.1), or an empty string.
fn parse_platform_version(text: &str) -> Option<(u32, u32, u32)> {
    if text.is_empty() {
        return Some((0, 0, 0));
    }
    let parts: Vec<u32> = if text.contains('.') {
        text.split('.')
            .map(|part| part.parse().ok())
            .collect::<Option<Vec<_>>>()?
    } else {
        text.chars()
            .map(|c| c.to_digit(10))
            .collect::<Option<Vec<_>>>()?
    };
    if parts.is_empty() || parts.len() > 3 {
        return None;
    }
    let part = |index: usize| parts.get(index).copied().unwrap_or(0);
    Some((part(0), part(1), part(2)))
}
