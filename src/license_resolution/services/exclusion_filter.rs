use crate::shared::Result;
use regex::{Regex, RegexBuilder};
use std::sync::atomic::{AtomicBool, Ordering};

/// Maximum length of the exclusion pattern
const MAX_PATTERN_LENGTH: usize = 1024;

/// ExclusionFilter - Drops components from the report by identifier
///
/// The pattern is a regular expression matched case-insensitively against the
/// component identifier as declared in its manifest. Matching components are
/// still fetched and expanded; only their report block is suppressed.
#[derive(Debug)]
pub struct ExclusionFilter {
    original: String,
    regex: Regex,
    matched: AtomicBool,
}

impl ExclusionFilter {
    /// Compiles the exclusion pattern
    ///
    /// # Errors
    /// Returns an error if the pattern is empty, too long, or not a valid
    /// regular expression
    pub fn new(pattern: &str) -> Result<Self> {
        if pattern.trim().is_empty() {
            anyhow::bail!("Exclusion pattern cannot be empty");
        }
        if pattern.len() > MAX_PATTERN_LENGTH {
            anyhow::bail!(
                "Exclusion pattern is too long: {} characters (maximum: {})",
                pattern.len(),
                MAX_PATTERN_LENGTH
            );
        }
        let regex = RegexBuilder::new(pattern)
            .case_insensitive(true)
            .build()
            .map_err(|e| anyhow::anyhow!("Invalid exclusion pattern '{}': {}", pattern, e))?;

        Ok(Self {
            original: pattern.to_string(),
            regex,
            matched: AtomicBool::new(false),
        })
    }

    /// Returns true if the identifier is excluded
    pub fn is_excluded(&self, component_id: &str) -> bool {
        let excluded = self.regex.is_match(component_id);
        if excluded {
            self.matched.store(true, Ordering::Relaxed);
        }
        excluded
    }

    /// The pattern if it has not matched anything so far
    pub fn unmatched_pattern(&self) -> Option<&str> {
        if self.matched.load(Ordering::Relaxed) {
            None
        } else {
            Some(&self.original)
        }
    }
}
