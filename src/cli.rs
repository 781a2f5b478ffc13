use clap::Parser;
use std::path::{Component, Path, PathBuf};

/// File name of the notice written when `--output` is not given
pub const DEFAULT_OUTPUT_FILE: &str = "Notice.txt";

/// Generate third-party license notices for deployable build units
#[derive(Parser, Debug)]
#[command(name = "build-license")]
#[command(version)]
#[command(about = "Generate third-party license notices for deployable build units", long_about = None)]
pub struct Args {
    /// Path to the solution manifest
    #[arg(short, long, value_name = "SOLUTION")]
    pub input: PathBuf,

    /// Output file path (defaults to Notice.txt next to the solution; a bare
    /// file name is placed in the solution directory)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Regular expression of component ids left out of the notice (case-insensitive)
    #[arg(short, long, value_name = "REGEX")]
    pub exclude: Option<String>,

    /// Scan the dependencies of every component, not only of those without a project URL
    #[arg(long)]
    pub recursive: bool,

    /// Use the local component cache only
    #[arg(long)]
    pub offline: bool,

    /// Report components without a project URL instead of skipping them
    #[arg(long)]
    pub always_report: bool,

    /// Configuration file (defaults to the nearest build-license.config.yml)
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Maximum number of components fetched at the same time
    #[arg(long, value_name = "N", value_parser = clap::value_parser!(u16).range(1..))]
    pub max_concurrent: Option<u16>,
}

impl Args {
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Where the notice is written for a solution at `solution`
    pub fn output_path(&self, solution: &Path) -> PathBuf {
        let solution_dir = solution.parent().unwrap_or_else(|| Path::new("."));
        match &self.output {
            None => solution_dir.join(DEFAULT_OUTPUT_FILE),
            Some(output) if is_bare_file_name(output) => solution_dir.join(output),
            Some(output) => output.clone(),
        }
    }
}

fn is_bare_file_name(path: &Path) -> bool {
    let mut components = path.components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(argv: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("build-license").chain(argv.iter().copied())).unwrap()
    }

    #[test]
    fn test_parse_minimal() {
        let args = args(&["--input", "app.sln.toml"]);
        assert_eq!(args.input, PathBuf::from("app.sln.toml"));
        assert!(args.output.is_none());
        assert!(args.exclude.is_none());
        assert!(!args.recursive);
        assert!(!args.offline);
        assert!(!args.always_report);
        assert!(args.max_concurrent.is_none());
    }

    #[test]
    fn test_parse_all_flags() {
        let args = args(&[
            "-i",
            "app.sln.toml",
            "-o",
            "out/NOTICE",
            "-e",
            "^Microsoft\\.",
            "--recursive",
            "--offline",
            "--always-report",
            "--config",
            "cfg.yml",
            "--max-concurrent",
            "4",
        ]);
        assert_eq!(args.output, Some(PathBuf::from("out/NOTICE")));
        assert_eq!(args.exclude.as_deref(), Some("^Microsoft\\."));
        assert!(args.recursive && args.offline && args.always_report);
        assert_eq!(args.config, Some(PathBuf::from("cfg.yml")));
        assert_eq!(args.max_concurrent, Some(4));
    }

    #[test]
    fn test_input_is_required() {
        assert!(Args::try_parse_from(["build-license"]).is_err());
    }

    #[test]
    fn test_zero_concurrency_rejected() {
        assert!(Args::try_parse_from(["build-license", "-i", "a", "--max-concurrent", "0"]).is_err());
    }

    #[test]
    fn test_default_output_next_to_solution() {
        let args = args(&["-i", "/repo/app.sln.toml"]);
        assert_eq!(
            args.output_path(Path::new("/repo/app.sln.toml")),
            PathBuf::from("/repo/Notice.txt")
        );
    }

    #[test]
    fn test_bare_output_name_goes_to_solution_directory() {
        let args = args(&["-i", "/repo/app.sln.toml", "-o", "THIRD-PARTY.txt"]);
        assert_eq!(
            args.output_path(Path::new("/repo/app.sln.toml")),
            PathBuf::from("/repo/THIRD-PARTY.txt")
        );
    }

    #[test]
    fn test_output_with_directory_is_kept() {
        let args = args(&["-i", "/repo/app.sln.toml", "-o", "/tmp/out/Notice.txt"]);
        assert_eq!(
            args.output_path(Path::new("/repo/app.sln.toml")),
            PathBuf::from("/tmp/out/Notice.txt")
        );
    }

    #[test]
    fn test_relative_output_with_directory_is_kept() {
        let args = args(&["-i", "/repo/app.sln.toml", "-o", "dist/Notice.txt"]);
        assert_eq!(
            args.output_path(Path::new("/repo/app.sln.toml")),
            PathBuf::from("dist/Notice.txt")
        );
    }
}
