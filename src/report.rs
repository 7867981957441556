//! Output formatting for langmod commands.
//!
//! Supports two output formats:
//! - Pretty: colored terminal output for human readability
//! - JSON: structured output for programmatic consumption

use colored::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::io::Write;

use crate::catalog::CatalogHandler;
use crate::language::{LanguageModule, LanguageRegistry, LanguageVersion};

/// JSON description of one language.
#[derive(Debug, Serialize, Deserialize)]
pub struct JsonLanguage {
    pub name: String,
    pub short_name: String,
    pub terse_name: String,
    pub extensions: Vec<String>,
    pub dispatch: String,
    pub default_version: String,
    pub versions: Vec<JsonVersion>,
}

/// JSON description of one version.
#[derive(Debug, Serialize, Deserialize)]
pub struct JsonVersion {
    pub version: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub aliases: Vec<String>,
    pub default: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl JsonVersion {
    fn from_version(module: &LanguageModule, version: &LanguageVersion) -> Self {
        Self {
            version: version.version().to_string(),
            name: version.name(),
            aliases: module
                .aliases_of(version)
                .into_iter()
                .map(str::to_string)
                .collect(),
            default: module.default_version() == version,
            description: description_of(version).map(str::to_string),
        }
    }
}

impl From<&LanguageModule> for JsonLanguage {
    fn from(module: &LanguageModule) -> Self {
        Self {
            name: module.name().to_string(),
            short_name: module.short_name().to_string(),
            terse_name: module.terse_name().to_string(),
            extensions: module.extensions().to_vec(),
            dispatch: module.dispatch_strategy().to_string(),
            default_version: module.default_version().version().to_string(),
            versions: module
                .versions()
                .iter()
                .map(|v| JsonVersion::from_version(module, v))
                .collect(),
        }
    }
}

fn description_of(version: &LanguageVersion) -> Option<&str> {
    version
        .handler_as::<CatalogHandler>()
        .and_then(|h| h.description.as_deref())
}

fn write_json_value<W: Write, T: Serialize + ?Sized>(w: &mut W, value: &T) -> anyhow::Result<()> {
    serde_json::to_writer_pretty(&mut *w, value)?;
    writeln!(w)?;
    Ok(())
}

/// Write all languages of a registry as JSON.
pub fn write_languages_json<W: Write>(w: &mut W, registry: &LanguageRegistry) -> anyhow::Result<()> {
    let languages: Vec<JsonLanguage> = registry.languages().map(JsonLanguage::from).collect();
    write_json_value(w, &languages)
}

/// Write one language as JSON.
pub fn write_language_json<W: Write>(w: &mut W, module: &LanguageModule) -> anyhow::Result<()> {
    write_json_value(w, &JsonLanguage::from(module))
}

/// Write a table of languages.
pub fn write_languages_pretty<W: Write>(w: &mut W, registry: &LanguageRegistry) -> anyhow::Result<()> {
    writeln!(w, "{}", "Languages".bold())?;
    writeln!(w)?;
    for module in registry.languages() {
        let exts: Vec<String> = module.extensions().iter().map(|e| format!(".{}", e)).collect();
        writeln!(
            w,
            "  {:<20} {:<12} default {:<8} {}",
            module.name().cyan(),
            module.terse_name(),
            module.default_version().version().green(),
            exts.join(" ").dimmed()
        )?;
    }
    writeln!(w)?;
    writeln!(w, "{} languages", registry.len())?;
    Ok(())
}

/// Write the versions of one language.
pub fn write_language_pretty<W: Write>(w: &mut W, module: &LanguageModule) -> anyhow::Result<()> {
    writeln!(
        w,
        "{} ({}), dispatch: {}",
        module.name().bold(),
        module.terse_name(),
        module.dispatch_strategy()
    )?;
    writeln!(w)?;

    for version in module.versions() {
        let id = if version.version().is_empty() {
            "(unversioned)".to_string()
        } else {
            version.version().to_string()
        };
        let marker = if module.default_version() == version {
            "*".green().bold()
        } else {
            " ".normal()
        };
        let aliases = module.aliases_of(version);
        let aliases = if aliases.is_empty() {
            String::new()
        } else {
            format!("aliases: {}", aliases.join(", "))
        };
        write!(w, "  {} {:<14} {}", marker, id, aliases.dimmed())?;
        if let Some(description) = description_of(version) {
            write!(w, "  {}", description)?;
        }
        writeln!(w)?;
    }
    Ok(())
}

/// Per-language file counts from a directory scan.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct DetectionSummary {
    pub files_scanned: usize,
    pub by_language: BTreeMap<String, usize>,
    pub unrecognized: usize,
}

/// Write a detection summary.
pub fn write_detection_pretty<W: Write>(w: &mut W, summary: &DetectionSummary) -> anyhow::Result<()> {
    if summary.by_language.is_empty() {
        writeln!(w, "{}", "No recognized source files".yellow())?;
    } else {
        for (language, count) in &summary.by_language {
            writeln!(w, "  {:<20} {:>6}", language.cyan(), count)?;
        }
    }
    writeln!(w)?;
    writeln!(
        w,
        "{} files scanned, {} unrecognized",
        summary.files_scanned, summary.unrecognized
    )?;
    Ok(())
}

/// Write a detection summary as JSON.
pub fn write_detection_json<W: Write>(w: &mut W, summary: &DetectionSummary) -> anyhow::Result<()> {
    write_json_value(w, summary)
}
