use std::collections::BTreeMap;

pub const MIT_LICENSE_EXPRESSION: &str = "MIT";
pub const MIT_LICENSE_TITLE: &str = "MIT License";
pub const APACHE_LICENSE_EXPRESSION: &str = "Apache-2.0";
pub const APACHE_LICENSE_URL: &str = "http://www.apache.org/licenses/LICENSE-2.0";
pub const APACHE_LICENSE_TITLE: &str = "Apache License, Version 2.0";

/// Vendor boilerplate license URL recognized without a download
pub const MICROSOFT_NET_LIBRARY_URL: &str = "http://go.microsoft.com/fwlink/?LinkId=329770";
pub const MICROSOFT_NET_LIBRARY_LINE: &str =
    "License: MICROSOFT .NET LIBRARY (http://go.microsoft.com/fwlink/?LinkId=329770)";

/// LicenseFingerprint policy: heuristic recognition of well-known licenses
/// from free text and URLs.
///
/// Only two licenses are fingerprinted:
/// 1. MIT: the first line contains "MIT License"
/// 2. Apache-2.0: any line carries the canonical URL (http or https) or the
///    canonical title
///
/// Vendor boilerplate URLs map to a fixed report line.
#[derive(Debug, Clone)]
pub struct LicenseFingerprint {
    vendor_lines: BTreeMap<String, String>,
}

impl Default for LicenseFingerprint {
    fn default() -> Self {
        Self::new(BTreeMap::new())
    }
}

impl LicenseFingerprint {
    /// Creates the policy with additional vendor URLs; the built-in vendor
    /// boilerplate is always present.
    pub fn new(extra_vendor_lines: BTreeMap<String, String>) -> Self {
        let mut vendor_lines = BTreeMap::new();
        vendor_lines.insert(
            normalize_url(MICROSOFT_NET_LIBRARY_URL),
            MICROSOFT_NET_LIBRARY_LINE.to_string(),
        );
        for (url, line) in extra_vendor_lines {
            vendor_lines.insert(normalize_url(&url), line);
        }
        Self { vendor_lines }
    }

    /// Recognizes MIT or Apache-2.0 license text.
    pub fn identify_text(lines: &[String]) -> Option<&'static str> {
        if lines
            .first()
            .map(|line| line.contains(MIT_LICENSE_TITLE))
            .unwrap_or(false)
        {
            return Some(MIT_LICENSE_EXPRESSION);
        }
        if lines.iter().any(|line| Self::is_apache_line(line)) {
            return Some(APACHE_LICENSE_EXPRESSION);
        }
        None
    }

    /// Returns true if the URL is the canonical Apache-2.0 license URL
    pub fn is_apache_url(url: &str) -> bool {
        contains_apache_url(url)
    }

    /// Fixed report line for a known vendor boilerplate URL
    pub fn vendor_line(&self, url: &str) -> Option<&str> {
        self.vendor_lines.get(&normalize_url(url)).map(String::as_str)
    }

    fn is_apache_line(line: &str) -> bool {
        contains_apache_url(line) || line.trim().eq_ignore_ascii_case(APACHE_LICENSE_TITLE)
    }

    /// Returns true if downloaded text is an HTML page (typically an error
    /// page or a login wall) rather than a license.
    pub fn looks_like_html(lines: &[String]) -> bool {
        lines.iter().any(|line| {
            let line = line.trim_start().to_lowercase();
            line.starts_with("<html") || line.starts_with("<!doctype html")
        })
    }

    /// Block-quotes license text line by line.
    pub fn quote(lines: &[String]) -> Vec<String> {
        lines.iter().map(|line| format!("> {}", line)).collect()
    }
}

fn contains_apache_url(text: &str) -> bool {
    let text = text.to_lowercase();
    let canonical = APACHE_LICENSE_URL.to_lowercase();
    let secure = canonical.replacen("http://", "https://", 1);
    text.contains(&canonical) || text.contains(&secure)
}

fn normalize_url(url: &str) -> String {
    url.trim().trim_end_matches('/').to_lowercase()
}

/// Splits text into lines, dropping a trailing `\r` from each.
pub fn split_lines(text: &str) -> Vec<String> {
    text.lines()
        .map(|line| line.trim_end_matches('\r').to_string())
        .collect()
}
