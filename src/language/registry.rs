//! Ordered set of language modules.
//!
//! Modules are kept sorted by name, which is also their identity, so a
//! registry can never hold two modules for one language.

use std::collections::BTreeSet;
use std::path::Path;

use tracing::debug;

use super::{LanguageModule, LanguageVersion, RegistryError};

/// Registry of finalized language modules.
#[derive(Debug, Default)]
pub struct LanguageRegistry {
    modules: BTreeSet<LanguageModule>,
}

impl LanguageRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry from modules, rejecting duplicate names.
    pub fn from_modules<I>(modules: I) -> Result<Self, RegistryError>
    where
        I: IntoIterator<Item = LanguageModule>,
    {
        let mut registry = Self::new();
        for module in modules {
            registry.insert(module)?;
        }
        Ok(registry)
    }

    /// Add a module. Fails if a module with the same name is present.
    pub fn insert(&mut self, module: LanguageModule) -> Result<(), RegistryError> {
        if self.modules.contains(&module) {
            return Err(RegistryError::DuplicateLanguage {
                name: module.name().to_string(),
            });
        }
        debug!(language = module.name(), "added language to registry");
        self.modules.insert(module);
        Ok(())
    }

    /// Modules sorted by name.
    pub fn languages(&self) -> impl Iterator<Item = &LanguageModule> {
        self.modules.iter()
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    /// Look up a language by its display name.
    pub fn get(&self, name: &str) -> Option<&LanguageModule> {
        self.modules.iter().find(|m| m.name() == name)
    }

    /// Look up a language by terse name (e.g., "java").
    pub fn find_by_terse_name(&self, terse_name: &str) -> Option<&LanguageModule> {
        self.modules.iter().find(|m| m.terse_name() == terse_name)
    }

    /// Look up by display name first, then terse name.
    pub fn lookup(&self, name: &str) -> Option<&LanguageModule> {
        self.get(name).or_else(|| self.find_by_terse_name(name))
    }

    /// All languages that handle `ext`, sorted by name.
    pub fn find_by_extension(&self, ext: &str) -> Vec<&LanguageModule> {
        self.modules.iter().filter(|m| m.has_extension(ext)).collect()
    }

    /// The first language (by name) handling the file's extension.
    pub fn detect_language(&self, path: &Path) -> Option<&LanguageModule> {
        let ext = path.extension()?.to_str()?;
        self.modules.iter().find(|m| m.has_extension(ext))
    }

    /// Resolve a string such as "java 17" or "java".
    ///
    /// The part before the first space is the terse name, the remainder a
    /// version key. Without a version part the default version is returned.
    pub fn find_version_by_terse_name(&self, terse: &str) -> Option<&LanguageVersion> {
        let terse = terse.trim();
        let (language, version) = match terse.split_once(' ') {
            Some((language, version)) => (language, Some(version.trim())),
            None => (terse, None),
        };
        let module = self.find_by_terse_name(language)?;
        match version {
            Some(key) => module.get_version(key),
            None => Some(module.default_version()),
        }
    }
}
