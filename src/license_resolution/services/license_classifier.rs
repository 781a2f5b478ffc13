use super::exclusion_filter::ExclusionFilter;
use crate::license_resolution::domain::{
    ClassifiedLicense, ComponentArchive, LicenseEvidence, NoticeEntry,
};
use crate::license_resolution::policies::license_fingerprint::{
    split_lines, LicenseFingerprint, APACHE_LICENSE_EXPRESSION,
};
use crate::ports::outbound::{LicenseTextFetcher, ProgressReporter};
use crate::shared::error::NoticeError;
use crate::shared::Result;

/// LicenseClassifier - turns an archive's license evidence into a notice entry
///
/// Skip rules run first, in this order: a component without a project URL is
/// skipped (unless always-report mode is on), then an excluded component is
/// skipped. The remaining components dispatch on their strongest evidence.
#[derive(Debug, Default)]
pub struct LicenseClassifier {
    fingerprint: LicenseFingerprint,
    exclusion: Option<ExclusionFilter>,
    always_report: bool,
}

impl LicenseClassifier {
    pub fn new(
        fingerprint: LicenseFingerprint,
        exclusion: Option<ExclusionFilter>,
        always_report: bool,
    ) -> Self {
        Self {
            fingerprint,
            exclusion,
            always_report,
        }
    }

    pub fn exclusion(&self) -> Option<&ExclusionFilter> {
        self.exclusion.as_ref()
    }

    /// Classifies one archive.
    ///
    /// # Returns
    /// `None` if the component is skipped from the report
    ///
    /// # Errors
    /// Returns [`NoticeError::LicenseEvidence`] if the evidence is present but
    /// unreadable; such a failure aborts the run
    pub async fn classify(
        &self,
        archive: &ComponentArchive,
        fetcher: &dyn LicenseTextFetcher,
        reporter: &dyn ProgressReporter,
    ) -> Result<Option<NoticeEntry>> {
        let manifest = archive.manifest();
        let id = manifest.id.as_str();

        let project_url = match archive.project_url() {
            Some(url) => url.to_string(),
            None if self.always_report => String::new(),
            None => {
                reporter.report(&format!("Skip {}: No project URL", id));
                return Ok(None);
            }
        };

        if self
            .exclusion
            .as_ref()
            .is_some_and(|filter| filter.is_excluded(id))
        {
            reporter.report(&format!("Skip {}: Excluded", id));
            return Ok(None);
        }

        let license = match self.license(archive, fetcher).await {
            Ok(license) => license,
            Err(e) => {
                reporter.report_error(&format!("Error loading license metadata for component {}", id));
                return Err(NoticeError::LicenseEvidence {
                    component: id.to_string(),
                    details: format!("{:#}", e),
                }
                .into());
            }
        };

        Ok(Some(NoticeEntry {
            id: id.to_string(),
            version: manifest.version.clone(),
            title: manifest.display_title().to_string(),
            project_url,
            license,
        }))
    }

    async fn license(
        &self,
        archive: &ComponentArchive,
        fetcher: &dyn LicenseTextFetcher,
    ) -> Result<ClassifiedLicense> {
        match LicenseEvidence::from_archive(archive) {
            LicenseEvidence::Expression(expression) => Ok(Self::classify_expression(expression)),
            LicenseEvidence::BundledFile(entry) => Self::classify_file(archive, &entry),
            LicenseEvidence::Url(url) => Ok(self.classify_url(url, fetcher).await),
            LicenseEvidence::None => Ok(ClassifiedLicense::Unknown),
        }
    }

    fn classify_expression(expression: String) -> ClassifiedLicense {
        if expression.is_empty() {
            ClassifiedLicense::Unknown
        } else {
            ClassifiedLicense::Identifier(expression)
        }
    }

    fn classify_file(archive: &ComponentArchive, entry: &str) -> Result<ClassifiedLicense> {
        let text = archive.read_entry(entry)?;
        let lines = split_lines(&text);

        Ok(match LicenseFingerprint::identify_text(&lines) {
            Some(identifier) => ClassifiedLicense::Identifier(identifier.to_string()),
            None => ClassifiedLicense::Text(lines),
        })
    }

    /// Network failures degrade to empty text, never to an error
    async fn classify_url(&self, url: String, fetcher: &dyn LicenseTextFetcher) -> ClassifiedLicense {
        if LicenseFingerprint::is_apache_url(&url) {
            return ClassifiedLicense::Identifier(APACHE_LICENSE_EXPRESSION.to_string());
        }
        if let Some(line) = self.fingerprint.vendor_line(&url) {
            return ClassifiedLicense::Fixed(line.to_string());
        }

        let lines = split_lines(&fetcher.fetch_text(&url).await);
        if let Some(identifier) = LicenseFingerprint::identify_text(&lines) {
            return ClassifiedLicense::Identifier(identifier.to_string());
        }

        let text = if LicenseFingerprint::looks_like_html(&lines) {
            Vec::new()
        } else {
            lines
        };
        ClassifiedLicense::Url { url, text }
    }
}
