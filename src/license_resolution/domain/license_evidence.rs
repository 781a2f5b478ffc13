use super::{ComponentArchive, LicenseMetadata};

/// License evidence extracted from an archive, in decreasing order of
/// authority.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LicenseEvidence {
    /// Machine-readable expression, reported verbatim
    Expression(String),
    /// License file bundled in the archive
    BundledFile(String),
    /// Only a license URL
    Url(String),
    /// Nothing at all
    None,
}

impl LicenseEvidence {
    pub fn from_archive(archive: &ComponentArchive) -> Self {
        let manifest = archive.manifest();
        match &manifest.license {
            Some(LicenseMetadata::Expression(expression)) => {
                LicenseEvidence::Expression(expression.trim().to_string())
            }
            Some(LicenseMetadata::File(file)) => LicenseEvidence::BundledFile(file.clone()),
            None => match manifest.license_url.as_deref().map(str::trim) {
                Some(url) if !url.is_empty() => LicenseEvidence::Url(url.to_string()),
                _ => LicenseEvidence::None,
            },
        }
    }
}

/// The license section of a notice block
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClassifiedLicense {
    /// `License: <identifier>`
    Identifier(String),
    /// A fixed vendor line, written as-is
    Fixed(String),
    /// `License:` followed by the quoted text
    Text(Vec<String>),
    /// `License: <url>` optionally followed by the quoted downloaded text
    Url { url: String, text: Vec<String> },
    /// `License: unknown`
    Unknown,
}

/// One component ready to be rendered into the notice
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoticeEntry {
    pub id: String,
    pub version: String,
    pub title: String,
    pub project_url: String,
    pub license: ClassifiedLicense,
}
