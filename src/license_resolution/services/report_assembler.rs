use crate::license_resolution::domain::{ClassifiedLicense, NoticeEntry};
use crate::license_resolution::policies::LicenseFingerprint;

pub const NOTICE_HEADER: &str =
    "This product bundles the following components under the described licenses:";

const LINE_ENDING: &str = "\r\n";
const DELIMITER_WIDTH: usize = 80;

/// ReportAssembler - renders classified components into the notice text
///
/// Components are sorted by identifier (ordinal, case-sensitive). Every line
/// ends in CRLF. The output depends only on the entries, so assembling the
/// same set twice yields identical bytes.
pub struct ReportAssembler;

impl ReportAssembler {
    pub fn assemble(mut entries: Vec<NoticeEntry>) -> String {
        entries.sort_by(|a, b| a.id.cmp(&b.id));

        let mut lines = vec![NOTICE_HEADER.to_string(), String::new()];
        for entry in &entries {
            lines.extend(Self::render_entry(entry));
        }

        let mut content = lines.join(LINE_ENDING);
        content.push_str(LINE_ENDING);
        content
    }

    /// Lines of one component block, without line endings
    pub fn render_entry(entry: &NoticeEntry) -> Vec<String> {
        let mut lines = vec![
            "-".repeat(DELIMITER_WIDTH),
            String::new(),
            entry.title.clone(),
            String::new(),
            format!("Id:      {}", entry.id),
            format!("Version: {}", entry.version),
            format!("Project: {}", entry.project_url),
        ];
        lines.extend(Self::render_license(&entry.license));
        lines.push(String::new());
        lines
    }

    fn render_license(license: &ClassifiedLicense) -> Vec<String> {
        match license {
            ClassifiedLicense::Identifier(identifier) => vec![format!("License: {}", identifier)],
            ClassifiedLicense::Fixed(line) => vec![line.clone()],
            ClassifiedLicense::Text(text) => {
                let mut lines = vec!["License:".to_string()];
                lines.extend(LicenseFingerprint::quote(text));
                lines.push(String::new());
                lines
            }
            ClassifiedLicense::Url { url, text } => {
                let mut lines = vec![format!("License: {}", url)];
                if !text.is_empty() {
                    lines.extend(LicenseFingerprint::quote(text));
                    lines.push(String::new());
                }
                lines
            }
            ClassifiedLicense::Unknown => vec!["License: unknown".to_string()],
        }
    }
}
