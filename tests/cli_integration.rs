//! Integration tests for the CLI commands and output formats.

use std::path::PathBuf;

use clap::Parser;
use globset::{Glob, GlobSetBuilder};
use langmod::cli::{self, Cli, Commands, EXIT_ERROR, EXIT_NOT_FOUND, EXIT_SUCCESS};
use langmod::report::{self, JsonLanguage};
use langmod::LanguageCatalog;

fn testdata_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("testdata")
}

fn catalog_arg() -> String {
    testdata_path().join("catalog.yaml").to_string_lossy().to_string()
}

#[test]
fn test_detect_over_testdata_tree() {
    let registry = LanguageCatalog::parse_file(testdata_path().join("catalog.yaml"))
        .unwrap()
        .build_registry()
        .unwrap();

    let mut excludes = GlobSetBuilder::new();
    excludes.add(Glob::new("**/build").unwrap());
    let excludes = excludes.build().unwrap();

    let summary = cli::detect_languages(&registry, &testdata_path().join("tree"), &excludes);

    assert_eq!(summary.files_scanned, 5);
    assert_eq!(summary.by_language.get("Java"), Some(&2));
    assert_eq!(summary.by_language.get("Apex"), Some(&2));
    assert_eq!(summary.unrecognized, 1);

    let mut out = Vec::new();
    report::write_detection_json(&mut out, &summary).unwrap();
    let json: serde_json::Value = serde_json::from_slice(&out).unwrap();
    assert_eq!(json["by_language"]["Java"], 2);
}

#[test]
fn test_resolve_exit_codes() {
    let run = |args: &[&str]| {
        let cli = Cli::try_parse_from(args).unwrap();
        match cli.command {
            Commands::Resolve(args) => cli::run_resolve(&args).unwrap(),
            _ => panic!("expected resolve"),
        }
    };
    let catalog = catalog_arg();

    assert_eq!(run(&["langmod", "resolve", "java", "latest", "-c", &catalog]), EXIT_SUCCESS);
    assert_eq!(run(&["langmod", "resolve", "Apex", "-c", &catalog]), EXIT_SUCCESS);
    assert_eq!(run(&["langmod", "resolve", "java", "99", "-c", &catalog]), EXIT_NOT_FOUND);
    assert_eq!(run(&["langmod", "resolve", "cobol", "-c", &catalog]), EXIT_NOT_FOUND);
    assert_eq!(run(&["langmod", "resolve", "java", "-f", "xml"]), EXIT_ERROR);
}

#[test]
fn test_versions_with_bad_catalog() {
    let bad = testdata_path().join("two-defaults.yaml");
    let cli = Cli::try_parse_from([
        "langmod",
        "versions",
        "java",
        "--catalog",
        bad.to_str().unwrap(),
    ])
    .unwrap();
    match cli.command {
        Commands::Versions(args) => assert_eq!(cli::run_versions(&args).unwrap(), EXIT_ERROR),
        _ => panic!("expected versions"),
    }
}

#[test]
fn test_builtin_catalog_json_round_trip() {
    let registry = langmod::builtin_registry().unwrap();
    let mut out = Vec::new();
    report::write_languages_json(&mut out, registry).unwrap();

    let languages: Vec<JsonLanguage> = serde_json::from_slice(&out).unwrap();
    let java = languages.iter().find(|l| l.terse_name == "java").unwrap();
    assert_eq!(java.dispatch, "kind-indexed");
    assert_eq!(java.versions.iter().filter(|v| v.default).count(), 1);
    assert!(java
        .versions
        .iter()
        .any(|v| v.aliases.contains(&"preview".to_string())));
}
