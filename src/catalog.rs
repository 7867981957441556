//! Language catalog: YAML description of languages and their versions.
//!
//! A catalog is the configuration form of a set of language modules. Each
//! entry is fed through [`LanguageModuleBuilder`], so a catalog obeys the
//! same rules as modules built in code (unique keys, exactly one default).

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use once_cell::sync::OnceCell;
use tracing::info;

use crate::dispatch::DispatchStrategy;
use crate::language::{LanguageModule, LanguageModuleBuilder, LanguageRegistry, VersionHandler};

/// Catalog shipped with the binary.
pub const BUILTIN_CATALOG: &str = include_str!("catalogs/builtin.yaml");

/// Top-level catalog definition.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct LanguageCatalog {
    #[serde(default)]
    pub languages: Vec<LanguageEntry>,
}

/// One language in a catalog.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LanguageEntry {
    pub name: String,
    #[serde(default)]
    pub short_name: Option<String>,
    pub terse_name: String,
    #[serde(default)]
    pub extensions: Vec<String>,
    #[serde(default)]
    pub dispatch: DispatchStrategy,
    #[serde(default)]
    pub versions: Vec<VersionEntry>,
}

/// One version of a catalog language.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct VersionEntry {
    pub version: String,
    #[serde(default)]
    pub aliases: Vec<String>,
    #[serde(default)]
    pub default: bool,
    #[serde(default)]
    pub description: Option<String>,
}

/// Handler attached to catalog versions when no other handler is supplied.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CatalogHandler {
    pub description: Option<String>,
}

impl LanguageCatalog {
    /// Parse a catalog from YAML text.
    pub fn parse(content: &str) -> anyhow::Result<Self> {
        let catalog: LanguageCatalog = serde_yaml::from_str(content)?;
        Ok(catalog)
    }

    /// Parse a catalog from a YAML file.
    pub fn parse_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("cannot read catalog {}", path.display()))?;
        Self::parse(&content).with_context(|| format!("invalid catalog {}", path.display()))
    }

    /// The catalog shipped with the binary.
    pub fn builtin() -> anyhow::Result<Self> {
        Self::parse(BUILTIN_CATALOG)
    }

    /// Build modules, attaching a [`CatalogHandler`] to every version.
    pub fn build_modules(&self) -> anyhow::Result<Vec<LanguageModule>> {
        self.build_modules_with(|_, version| {
            Arc::new(CatalogHandler {
                description: version.description.clone(),
            })
        })
    }

    /// Build modules, asking `handler_for` for each version's handler.
    pub fn build_modules_with<F>(&self, mut handler_for: F) -> anyhow::Result<Vec<LanguageModule>>
    where
        F: FnMut(&LanguageEntry, &VersionEntry) -> Arc<dyn VersionHandler>,
    {
        self.languages
            .iter()
            .map(|entry| entry.build_module(&mut handler_for))
            .collect()
    }

    /// Build modules and collect them into a registry.
    pub fn build_registry(&self) -> anyhow::Result<LanguageRegistry> {
        let registry = LanguageRegistry::from_modules(self.build_modules()?)?;
        info!(languages = registry.len(), "language catalog loaded");
        Ok(registry)
    }
}

impl LanguageEntry {
    fn build_module<F>(&self, handler_for: &mut F) -> anyhow::Result<LanguageModule>
    where
        F: FnMut(&LanguageEntry, &VersionEntry) -> Arc<dyn VersionHandler>,
    {
        let mut builder = LanguageModuleBuilder::new(&self.name, &self.terse_name)
            .extensions(&self.extensions)
            .dispatch_strategy(self.dispatch);
        if let Some(short_name) = &self.short_name {
            builder = builder.short_name(short_name);
        }

        for version in &self.versions {
            let aliases: Vec<&str> = version.aliases.iter().map(String::as_str).collect();
            builder.register_shared(
                &version.version,
                handler_for(self, version),
                version.default,
                &aliases,
            )?;
        }

        Ok(builder.build()?)
    }
}

static BUILTIN_REGISTRY: OnceCell<LanguageRegistry> = OnceCell::new();

/// Process-wide registry built from the builtin catalog on first use.
pub fn builtin_registry() -> anyhow::Result<&'static LanguageRegistry> {
    BUILTIN_REGISTRY.get_or_try_init(|| LanguageCatalog::builtin()?.build_registry())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::language::RegistryError;

    const SAMPLE: &str = r#"
languages:
  - name: Java
    terse_name: java
    extensions: [java]
    dispatch: kind-indexed
    versions:
      - version: "8"
        aliases: ["1.8"]
      - version: "17"
        default: true
        description: LTS
"#;

    #[test]
    fn test_parse_and_build() {
        let catalog = LanguageCatalog::parse(SAMPLE).unwrap();
        let modules = catalog.build_modules().unwrap();
        assert_eq!(modules.len(), 1);

        let java = &modules[0];
        assert_eq!(java.dispatch_strategy(), DispatchStrategy::KindIndexed);
        assert_eq!(java.get_version("1.8").unwrap().version(), "8");
        assert_eq!(java.default_version().version(), "17");
        assert_eq!(
            java.default_version().handler_as::<CatalogHandler>(),
            Some(&CatalogHandler {
                description: Some("LTS".to_string())
            })
        );
    }

    #[test]
    fn test_dispatch_defaults_to_baseline() {
        let catalog = LanguageCatalog::parse(
            "languages:\n  - name: Go\n    terse_name: go\n    versions:\n      - version: \"1.22\"\n        default: true\n",
        )
        .unwrap();
        let modules = catalog.build_modules().unwrap();
        assert_eq!(modules[0].dispatch_strategy(), DispatchStrategy::Baseline);
        assert_eq!(modules[0].short_name(), "Go");
    }

    #[test]
    fn test_missing_default_is_rejected() {
        let catalog = LanguageCatalog::parse(
            "languages:\n  - name: Go\n    terse_name: go\n    versions:\n      - version: \"1.22\"\n",
        )
        .unwrap();
        let err = catalog.build_modules().unwrap_err();
        assert!(matches!(
            err.downcast_ref::<RegistryError>(),
            Some(RegistryError::MissingDefaultVersion { .. })
        ));
    }

    #[test]
    fn test_unknown_strategy_is_a_parse_error() {
        let result = LanguageCatalog::parse(
            "languages:\n  - name: Go\n    terse_name: go\n    dispatch: turbo\n",
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_custom_handlers() {
        let catalog = LanguageCatalog::parse(SAMPLE).unwrap();
        let modules = catalog
            .build_modules_with(|lang, version| {
                Arc::new(format!("{}:{}", lang.terse_name, version.version))
            })
            .unwrap();
        assert_eq!(
            modules[0].get_version("1.8").unwrap().handler_as::<String>(),
            Some(&"java:8".to_string())
        );
    }

    #[test]
    fn test_builtin_catalog_is_valid() {
        let registry = builtin_registry().unwrap();
        assert!(!registry.is_empty());
        for module in registry.languages() {
            assert!(!module.versions().is_empty(), "{} has no versions", module.name());
        }
    }
}
