//! Command-line interface for langmod.

use clap::{Args, Parser, Subcommand};
use globset::{Glob, GlobSet, GlobSetBuilder};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

use crate::catalog::{self, LanguageCatalog};
use crate::language::LanguageRegistry;
use crate::report::{self, DetectionSummary};

/// Exit codes.
pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_NOT_FOUND: i32 = 1;
pub const EXIT_ERROR: i32 = 2;

/// Inspect language modules: versions, aliases, defaults and extensions.
#[derive(Parser)]
#[command(name = "langmod")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable debug logging (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List all known languages
    #[command(visible_alias = "ls")]
    Languages(ListArgs),
    /// Show the versions of one language
    Versions(VersionsArgs),
    /// Resolve a version id or alias (or the default version)
    Resolve(ResolveArgs),
    /// Count files per language under a path
    Detect(DetectArgs),
}

/// Options shared by every command.
#[derive(Args)]
pub struct CatalogArgs {
    /// Path to a language catalog YAML file (default: builtin catalog)
    #[arg(short, long)]
    pub catalog: Option<PathBuf>,

    /// Output format: pretty or json
    #[arg(short, long, default_value = "pretty")]
    pub format: String,
}

/// Arguments for the languages command.
#[derive(Args)]
pub struct ListArgs {
    #[command(flatten)]
    pub catalog: CatalogArgs,
}

/// Arguments for the versions command.
#[derive(Args)]
pub struct VersionsArgs {
    /// Language name or terse name (e.g., "Java" or "java")
    pub language: String,

    #[command(flatten)]
    pub catalog: CatalogArgs,
}

/// Arguments for the resolve command.
#[derive(Args)]
pub struct ResolveArgs {
    /// Language name or terse name
    pub language: String,

    /// Version id or alias (default version when omitted)
    pub version: Option<String>,

    #[command(flatten)]
    pub catalog: CatalogArgs,
}

/// Arguments for the detect command.
#[derive(Args)]
pub struct DetectArgs {
    /// Path to scan (file or directory)
    pub path: PathBuf,

    /// Glob patterns for paths to skip (e.g., "**/target/**")
    #[arg(short, long)]
    pub exclude: Vec<String>,

    #[command(flatten)]
    pub catalog: CatalogArgs,
}

impl CatalogArgs {
    fn validate_format(&self) -> bool {
        if self.format != "pretty" && self.format != "json" {
            eprintln!("Error: invalid format {:?}, must be 'pretty' or 'json'", self.format);
            return false;
        }
        true
    }

    fn is_json(&self) -> bool {
        self.format == "json"
    }
}

/// Load the registry named by the arguments.
///
/// Custom catalogs are loaded fresh; the builtin one is shared process-wide.
fn with_registry<F>(args: &CatalogArgs, f: F) -> anyhow::Result<i32>
where
    F: FnOnce(&LanguageRegistry) -> anyhow::Result<i32>,
{
    match &args.catalog {
        Some(path) => {
            debug!(path = %path.display(), "loading catalog");
            let registry = match LanguageCatalog::parse_file(path).and_then(|c| c.build_registry()) {
                Ok(r) => r,
                Err(e) => {
                    eprintln!("Error loading catalog: {:#}", e);
                    return Ok(EXIT_ERROR);
                }
            };
            f(&registry)
        }
        None => f(catalog::builtin_registry()?),
    }
}

/// Run the languages command.
pub fn run_languages(args: &ListArgs) -> anyhow::Result<i32> {
    if !args.catalog.validate_format() {
        return Ok(EXIT_ERROR);
    }

    with_registry(&args.catalog, |registry| {
        let mut out = io::stdout().lock();
        if args.catalog.is_json() {
            report::write_languages_json(&mut out, registry)?;
        } else {
            report::write_languages_pretty(&mut out, registry)?;
        }
        Ok(EXIT_SUCCESS)
    })
}

/// Run the versions command.
pub fn run_versions(args: &VersionsArgs) -> anyhow::Result<i32> {
    if !args.catalog.validate_format() {
        return Ok(EXIT_ERROR);
    }

    with_registry(&args.catalog, |registry| {
        let module = match registry.lookup(&args.language) {
            Some(m) => m,
            None => {
                eprintln!("Error: unknown language {:?}", args.language);
                eprintln!("Run 'langmod languages' to see available languages");
                return Ok(EXIT_NOT_FOUND);
            }
        };

        let mut out = io::stdout().lock();
        if args.catalog.is_json() {
            report::write_language_json(&mut out, module)?;
        } else {
            report::write_language_pretty(&mut out, module)?;
        }
        Ok(EXIT_SUCCESS)
    })
}

/// Run the resolve command.
pub fn run_resolve(args: &ResolveArgs) -> anyhow::Result<i32> {
    if !args.catalog.validate_format() {
        return Ok(EXIT_ERROR);
    }

    with_registry(&args.catalog, |registry| {
        let module = match registry.lookup(&args.language) {
            Some(m) => m,
            None => {
                eprintln!("Error: unknown language {:?}", args.language);
                return Ok(EXIT_NOT_FOUND);
            }
        };

        let version = match &args.version {
            Some(key) => match module.get_version(key) {
                Some(v) => v,
                None => {
                    eprintln!("Error: {} has no version {:?}", module.name(), key);
                    eprintln!("Run 'langmod versions {}' to see available versions", module.terse_name());
                    return Ok(EXIT_NOT_FOUND);
                }
            },
            None => module.default_version(),
        };

        let mut out = io::stdout().lock();
        if args.catalog.is_json() {
            let json = serde_json::json!({
                "language": module.name(),
                "version": version.version(),
                "name": version.name(),
                "terse_name": version.terse_name(),
                "default": module.default_version() == version,
            });
            writeln!(out, "{}", serde_json::to_string_pretty(&json)?)?;
        } else {
            writeln!(out, "{}", version.terse_name())?;
        }
        Ok(EXIT_SUCCESS)
    })
}

/// Run the detect command.
pub fn run_detect(args: &DetectArgs) -> anyhow::Result<i32> {
    if !args.catalog.validate_format() {
        return Ok(EXIT_ERROR);
    }

    let excludes = match build_excludes(&args.exclude) {
        Ok(set) => set,
        Err(e) => {
            eprintln!("Error: invalid exclude pattern: {}", e);
            return Ok(EXIT_ERROR);
        }
    };

    if let Err(e) = std::fs::metadata(&args.path) {
        eprintln!("Error: cannot access path {:?}: {}", args.path, e);
        return Ok(EXIT_ERROR);
    }

    with_registry(&args.catalog, |registry| {
        let summary = detect_languages(registry, &args.path, &excludes);
        let mut out = io::stdout().lock();
        if args.catalog.is_json() {
            report::write_detection_json(&mut out, &summary)?;
        } else {
            report::write_detection_pretty(&mut out, &summary)?;
        }
        Ok(EXIT_SUCCESS)
    })
}

fn build_excludes(patterns: &[String]) -> Result<GlobSet, globset::Error> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        builder.add(Glob::new(pattern)?);
    }
    builder.build()
}

/// Walk `root` and count files per language, skipping excluded paths.
pub fn detect_languages(registry: &LanguageRegistry, root: &Path, excludes: &GlobSet) -> DetectionSummary {
    let mut summary = DetectionSummary::default();

    let walker = WalkDir::new(root)
        .follow_links(false)
        .into_iter()
        .filter_entry(|e| !excludes.is_match(e.path()))
        .filter_map(|e| e.ok());

    for entry in walker {
        if !entry.file_type().is_file() {
            continue;
        }
        summary.files_scanned += 1;

        match registry.detect_language(entry.path()) {
            Some(module) => {
                *summary.by_language.entry(module.name().to_string()).or_insert(0) += 1;
            }
            None => summary.unrecognized += 1,
        }
    }

    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_detect_languages_counts_and_excludes() {
        let temp = TempDir::new().unwrap();
        let src = temp.path().join("src");
        let target = temp.path().join("target");
        std::fs::create_dir_all(&src).unwrap();
        std::fs::create_dir_all(&target).unwrap();
        std::fs::write(src.join("Main.java"), "class Main {}").unwrap();
        std::fs::write(src.join("util.py"), "x = 1").unwrap();
        std::fs::write(src.join("notes.txt"), "hello").unwrap();
        std::fs::write(target.join("Gen.java"), "class Gen {}").unwrap();

        let registry = catalog::builtin_registry().unwrap();
        let excludes = build_excludes(&["**/target".to_string()]).unwrap();
        let summary = detect_languages(registry, temp.path(), &excludes);

        assert_eq!(summary.files_scanned, 3);
        assert_eq!(summary.by_language.get("Java"), Some(&1));
        assert_eq!(summary.by_language.get("Python"), Some(&1));
        assert_eq!(summary.unrecognized, 1);
    }

    #[test]
    fn test_invalid_exclude_pattern() {
        assert!(build_excludes(&["a[".to_string()]).is_err());
    }

    #[test]
    fn test_cli_parses_resolve() {
        let cli = Cli::try_parse_from(["langmod", "resolve", "java", "preview", "-f", "json"]).unwrap();
        match cli.command {
            Commands::Resolve(args) => {
                assert_eq!(args.language, "java");
                assert_eq!(args.version.as_deref(), Some("preview"));
                assert!(args.catalog.is_json());
            }
            _ => panic!("expected resolve command"),
        }
    }
}
