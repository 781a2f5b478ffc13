use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Exit codes for the CLI application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Notice file written
    Success = 0,
    /// Any failure that aborted the run (no output file was written)
    Failure = 1,
    /// Invalid command-line arguments (clap parsing errors)
    InvalidArguments = 2,
}

impl ExitCode {
    /// Convert to i32 for use with std::process::exit
    pub fn as_i32(self) -> i32 {
        self as i32
    }
}

impl fmt::Display for ExitCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExitCode::Success => write!(f, "Success (0)"),
            ExitCode::Failure => write!(f, "Failure (1)"),
            ExitCode::InvalidArguments => write!(f, "Invalid Arguments (2)"),
        }
    }
}

/// Errors raised while building a notice file.
///
/// `GraphEmpty`, `UnresolvedComponent` and `LicenseEvidence` always abort the run.
/// `Resolution` aborts the run for directly declared requirements only; the
/// dependency expansion path downcasts to it and drops the dependency instead.
#[derive(Debug, Error)]
pub enum NoticeError {
    #[error("No projects to include in {solution}\n\n💡 Hint: Set the `IsDeploymentTarget` property to `true` in at least one project")]
    GraphEmpty { solution: PathBuf },

    #[error("Unable to find unique version of component {component}: {reason}\n\n💡 Hint: Restoring the solution first may fix this")]
    Resolution { component: String, reason: String },

    #[error("Component {identity} not found in any of the configured sources: {}", source_errors(.errors))]
    UnresolvedComponent {
        identity: String,
        errors: Vec<String>,
    },

    #[error("Error loading license metadata for component {component}\nDetails: {details}")]
    LicenseEvidence { component: String, details: String },

    #[error("Invalid input: {path}\nReason: {reason}\n\n💡 Hint: Please specify an existing solution manifest")]
    InvalidInput { path: PathBuf, reason: String },

    #[error("Failed to read file: {path}\nDetails: {details}\n\n💡 Hint: Please verify that the file exists and you have read permissions")]
    FileReadError { path: PathBuf, details: String },

    #[error("Failed to write to file: {path}\nDetails: {details}\n\n💡 Hint: Please verify that the directory exists and you have write permissions")]
    FileWriteError { path: PathBuf, details: String },

    #[error("Invalid configuration: {message}")]
    ConfigError { message: String },

    #[error("Run cancelled, no notice file was written")]
    Cancelled,
}

fn source_errors(errors: &[String]) -> String {
    if errors.is_empty() {
        "no source has it".to_string()
    } else {
        errors.join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_code_values() {
        assert_eq!(ExitCode::Success.as_i32(), 0);
        assert_eq!(ExitCode::Failure.as_i32(), 1);
        assert_eq!(ExitCode::InvalidArguments.as_i32(), 2);
    }

    #[test]
    fn test_exit_code_display() {
        assert_eq!(format!("{}", ExitCode::Success), "Success (0)");
        assert_eq!(format!("{}", ExitCode::Failure), "Failure (1)");
        assert_eq!(
            format!("{}", ExitCode::InvalidArguments),
            "Invalid Arguments (2)"
        );
    }

    #[test]
    fn test_graph_empty_display() {
        let error = NoticeError::GraphEmpty {
            solution: PathBuf::from("/repo/app.sln.toml"),
        };
        let display = format!("{}", error);
        assert!(display.contains("No projects to include"));
        assert!(display.contains("/repo/app.sln.toml"));
        assert!(display.contains("IsDeploymentTarget"));
    }

    #[test]
    fn test_resolution_display_carries_restore_hint() {
        let error = NoticeError::Resolution {
            component: "Foo".to_string(),
            reason: "no entry in restore lock".to_string(),
        };
        let display = format!("{}", error);
        assert!(display.contains("Foo"));
        assert!(display.contains("no entry in restore lock"));
        assert!(display.contains("Restoring the solution first"));
    }

    #[test]
    fn test_unresolved_component_without_source_errors() {
        let error = NoticeError::UnresolvedComponent {
            identity: "Foo 1.0.0".to_string(),
            errors: vec![],
        };
        assert!(format!("{}", error).ends_with("sources: no source has it"));
    }

    #[test]
    fn test_unresolved_component_aggregates_source_errors() {
        let error = NoticeError::UnresolvedComponent {
            identity: "Foo 1.0.0".to_string(),
            errors: vec![
                "feed-a: connection refused".to_string(),
                "feed-b: HTTP 500".to_string(),
            ],
        };
        let display = format!("{}", error);
        assert!(display.contains("Foo 1.0.0"));
        assert!(display.contains("feed-a: connection refused, feed-b: HTTP 500"));
    }

    #[test]
    fn test_license_evidence_display() {
        let error = NoticeError::LicenseEvidence {
            component: "Foo".to_string(),
            details: "missing entry LICENSE.txt".to_string(),
        };
        let display = format!("{}", error);
        assert!(display.contains("Error loading license metadata for component Foo"));
        assert!(display.contains("missing entry LICENSE.txt"));
    }

    #[test]
    fn test_file_write_error_display() {
        let error = NoticeError::FileWriteError {
            path: PathBuf::from("/test/Notice.txt"),
            details: "Permission denied".to_string(),
        };
        let display = format!("{}", error);
        assert!(display.contains("Failed to write to file"));
        assert!(display.contains("/test/Notice.txt"));
        assert!(display.contains("Permission denied"));
        assert!(display.contains("💡 Hint:"));
    }
}
