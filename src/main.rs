mod cli;

use build_license::adapters::outbound::console::StderrProgressReporter;
use build_license::adapters::outbound::filesystem::{
    DirectoryPackageSource, FileSystemReader, FileSystemWriter,
};
use build_license::adapters::outbound::network::{
    CachingLicenseTextFetcher, HttpLicenseTextFetcher, HttpPackageSource,
    OfflineLicenseTextFetcher,
};
use build_license::application::dto::{NoticeRequest, NoticeResponse, DEFAULT_MAX_CONCURRENT_FETCHES};
use build_license::application::use_cases::GenerateNoticeUseCase;
use build_license::config::{
    default_cache_root, discover_config, load_config_from_path, ConfigFile, SourceLocation,
};
use build_license::license_resolution::services::DEFAULT_FETCH_TIMEOUT;
use build_license::ports::outbound::{
    LicenseTextFetcher, OutputPresenter, PackageSource, ProgressReporter,
};
use build_license::shared::error::{ExitCode, NoticeError};
use build_license::shared::Result;
use cli::Args;
use std::path::{Path, PathBuf};
use std::process;
use std::sync::Arc;
use std::time::Duration;

#[tokio::main]
async fn main() {
    // clap exits with code 2 on invalid arguments
    let args = Args::parse_args();

    let result = tokio::select! {
        result = run(args) => result,
        _ = tokio::signal::ctrl_c() => Err(NoticeError::Cancelled.into()),
    };

    if let Err(e) = result {
        eprintln!("\n❌ An error occurred:\n");
        eprintln!("{}", e);

        // Display error chain
        let mut source = e.source();
        while let Some(err) = source {
            eprintln!("\nCaused by: {}", err);
            source = err.source();
        }

        eprintln!();
        process::exit(ExitCode::Failure.as_i32());
    }
}

/// Run settings after merging CLI flags over the configuration file
struct Settings {
    request: NoticeRequest,
    offline: bool,
    cache_root: Option<PathBuf>,
    sources: Vec<(String, SourceLocation)>,
}

async fn run(args: Args) -> Result<()> {
    let solution_path = validate_solution_path(&args.input)?;
    let solution_dir = solution_path
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));

    let config = match &args.config {
        Some(path) => load_config_from_path(path)?,
        None => discover_config(&solution_dir)?.unwrap_or_default(),
    };
    let settings = merge_settings(&args, solution_path.clone(), config);
    let output_path = args.output_path(&solution_path);

    let package_sources = build_sources(&settings)?;
    let fetch_timeout = settings.request.fetch_timeout;

    let response = if settings.offline {
        generate(package_sources, OfflineLicenseTextFetcher, settings.request).await?
    } else {
        let text_fetcher = CachingLicenseTextFetcher::new(HttpLicenseTextFetcher::new(fetch_timeout)?);
        generate(package_sources, text_fetcher, settings.request).await?
    };

    let writer = FileSystemWriter::new(output_path);
    writer.present(&response.content)?;

    StderrProgressReporter::new().report_completion(&format!(
        "✅ Notice written to {} ({} of {} component(s) reported)",
        writer.output_path().display(),
        response.reported_components,
        response.resolved_components
    ));
    Ok(())
}

async fn generate<T: LicenseTextFetcher>(
    package_sources: Vec<Arc<dyn PackageSource>>,
    license_text_fetcher: T,
    request: NoticeRequest,
) -> Result<NoticeResponse> {
    // Create use case with injected dependencies
    let use_case = GenerateNoticeUseCase::new(
        FileSystemReader::new(),
        package_sources,
        license_text_fetcher,
        StderrProgressReporter::new(),
    );
    use_case.execute(request).await
}

fn merge_settings(args: &Args, solution_path: PathBuf, config: ConfigFile) -> Settings {
    let mut request = NoticeRequest::new(solution_path);
    request.exclude = args.exclude.clone().or_else(|| config.exclude.clone());
    request.recursive = args.recursive || config.recursive.unwrap_or(false);
    request.always_report = args.always_report || config.always_report.unwrap_or(false);
    request.max_concurrent_fetches = args
        .max_concurrent
        .map(usize::from)
        .or(config.max_concurrent_fetches)
        .unwrap_or(DEFAULT_MAX_CONCURRENT_FETCHES);
    request.fetch_timeout = config
        .fetch_timeout_secs
        .map(Duration::from_secs)
        .unwrap_or(DEFAULT_FETCH_TIMEOUT);
    request.known_license_urls = config.known_license_urls.clone().unwrap_or_default();

    Settings {
        request,
        offline: args.offline || config.offline.unwrap_or(false),
        cache_root: config.cache_root().or_else(default_cache_root),
        sources: config.resolved_sources(),
    }
}

/// The local cache first, then the configured feeds in order. Offline runs
/// and runs without configured feeds use the cache alone.
fn build_sources(settings: &Settings) -> Result<Vec<Arc<dyn PackageSource>>> {
    let cache = settings.cache_root.clone().map(DirectoryPackageSource::cache);
    let mut sources: Vec<Arc<dyn PackageSource>> = Vec::new();
    if let Some(cache) = &cache {
        sources.push(Arc::new(cache.clone()));
    }

    if !settings.offline {
        for (name, location) in &settings.sources {
            let source: Arc<dyn PackageSource> = match location {
                SourceLocation::Url(url) => Arc::new(HttpPackageSource::new(
                    name.clone(),
                    url,
                    settings.request.fetch_timeout,
                    cache.clone(),
                )?),
                SourceLocation::Directory(path) => {
                    Arc::new(DirectoryPackageSource::feed(name.clone(), path.clone()))
                }
            };
            sources.push(source);
        }
    }

    if sources.is_empty() {
        return Err(NoticeError::ConfigError {
            message: format!(
                "No package source available: configure 'sources' or 'cache_root', or set {}",
                build_license::config::CACHE_ENV_VAR
            ),
        }
        .into());
    }
    Ok(sources)
}

fn validate_solution_path(path: &Path) -> Result<PathBuf> {
    let invalid = |reason: String| NoticeError::InvalidInput {
        path: path.to_path_buf(),
        reason,
    };

    // Security check: Reject symbolic links for the solution manifest
    let metadata = std::fs::symlink_metadata(path)
        .map_err(|e| invalid(format!("Failed to read path metadata: {}", e)))?;

    if metadata.is_symlink() {
        return Err(invalid(
            "Security: Solution path is a symbolic link. For security reasons, symbolic links are not allowed.".to_string(),
        )
        .into());
    }

    if !metadata.is_file() {
        return Err(invalid("Not a file".to_string()).into());
    }

    std::path::absolute(path)
        .map_err(|e| invalid(format!("Failed to resolve path: {}", e)).into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_validate_solution_path_valid_file() {
        let temp_dir = TempDir::new().unwrap();
        let solution = temp_dir.path().join("app.sln.toml");
        fs::write(&solution, "").unwrap();

        let result = validate_solution_path(&solution).unwrap();
        assert!(result.is_absolute());
    }

    #[test]
    fn test_validate_solution_path_nonexistent() {
        let result = validate_solution_path(Path::new("/nonexistent/app.sln.toml"));
        let err_string = format!("{}", result.unwrap_err());
        assert!(err_string.contains("Invalid input"));
    }

    #[test]
    fn test_validate_solution_path_directory() {
        let temp_dir = TempDir::new().unwrap();
        let result = validate_solution_path(temp_dir.path());
        let err_string = format!("{}", result.unwrap_err());
        assert!(err_string.contains("Not a file"));
    }

    #[test]
    fn test_cli_flags_win_over_config() {
        let args = Args::parse_from([
            "build-license",
            "-i",
            "/repo/app.sln.toml",
            "-e",
            "^Cli$",
            "--max-concurrent",
            "2",
        ]);
        let config = ConfigFile {
            exclude: Some("^Config$".to_string()),
            recursive: Some(true),
            max_concurrent_fetches: Some(16),
            fetch_timeout_secs: Some(5),
            cache_root: Some("/cache".to_string()),
            ..ConfigFile::default()
        };

        let settings = merge_settings(&args, PathBuf::from("/repo/app.sln.toml"), config);

        assert_eq!(settings.request.exclude.as_deref(), Some("^Cli$"));
        assert!(settings.request.recursive);
        assert_eq!(settings.request.max_concurrent_fetches, 2);
        assert_eq!(settings.request.fetch_timeout, Duration::from_secs(5));
        assert_eq!(settings.cache_root, Some(PathBuf::from("/cache")));
        assert!(!settings.offline);
    }

    #[test]
    fn test_offline_uses_cache_only() {
        let settings = Settings {
            request: NoticeRequest::new(PathBuf::from("/repo/app.sln.toml")),
            offline: true,
            cache_root: Some(PathBuf::from("/cache")),
            sources: vec![(
                "feed".to_string(),
                SourceLocation::Directory(PathBuf::from("/feed")),
            )],
        };

        let sources = build_sources(&settings).unwrap();
        assert_eq!(sources.len(), 1);
        assert_eq!(sources[0].name(), "local cache");
    }

    #[test]
    fn test_online_sources_follow_cache_in_order() {
        let settings = Settings {
            request: NoticeRequest::new(PathBuf::from("/repo/app.sln.toml")),
            offline: false,
            cache_root: Some(PathBuf::from("/cache")),
            sources: vec![
                ("folder".to_string(), SourceLocation::Directory(PathBuf::from("/feed"))),
                (
                    "remote".to_string(),
                    SourceLocation::Url("https://feed.example.com".to_string()),
                ),
            ],
        };

        let sources = build_sources(&settings).unwrap();
        let names: Vec<&str> = sources.iter().map(|source| source.name()).collect();
        assert_eq!(names, vec!["local cache", "folder", "remote"]);
    }

    #[test]
    fn test_no_source_is_config_error() {
        let settings = Settings {
            request: NoticeRequest::new(PathBuf::from("/repo/app.sln.toml")),
            offline: true,
            cache_root: None,
            sources: vec![],
        };

        let err = build_sources(&settings).err().unwrap();
        assert!(format!("{}", err).contains("No package source available"));
    }
}
