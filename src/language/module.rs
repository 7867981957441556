//! Language modules: the per-language version registry.
//!
//! A module is assembled with [`LanguageModuleBuilder`] during startup and
//! then frozen into a [`LanguageModule`]. Only the frozen value is handed to
//! readers, so lookups never race with registration.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use tracing::{debug, info, warn};

use super::version::{LanguageId, LanguageVersion, VersionHandler};
use super::RegistryError;
use crate::dispatch::DispatchStrategy;

/// Build-phase accumulator for a [`LanguageModule`].
pub struct LanguageModuleBuilder {
    id: Arc<LanguageId>,
    extensions: Vec<String>,
    strategy: DispatchStrategy,
    versions: Vec<LanguageVersion>,
    keys: HashMap<String, usize>,
    default: Option<usize>,
}

impl LanguageModuleBuilder {
    /// Start a module with the given display name and terse name.
    pub fn new(name: impl Into<String>, terse_name: impl Into<String>) -> Self {
        Self {
            id: Arc::new(LanguageId {
                name: name.into(),
                short_name: None,
                terse_name: terse_name.into(),
            }),
            extensions: Vec::new(),
            strategy: DispatchStrategy::default(),
            versions: Vec::new(),
            keys: HashMap::new(),
            default: None,
        }
    }

    /// Set the short name (defaults to the name).
    pub fn short_name(mut self, short_name: impl Into<String>) -> Self {
        Arc::make_mut(&mut self.id).short_name = Some(short_name.into());
        self.refresh_versions();
        self
    }

    /// Add file extensions handled by this language. A leading dot is stripped.
    pub fn extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for ext in extensions {
            let ext = normalize_extension(ext.as_ref());
            if !ext.is_empty() && !self.extensions.iter().any(|e| e == ext) {
                self.extensions.push(ext.to_string());
            }
        }
        self
    }

    /// Select the rule-chain dispatch strategy.
    pub fn dispatch_strategy(mut self, strategy: DispatchStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// The language name this builder registers versions for.
    pub fn name(&self) -> &str {
        &self.id.name
    }

    /// Register a non-default version under `version` and every alias.
    ///
    /// Fails with [`RegistryError::DuplicateKey`] if any key is already taken.
    /// A failed call leaves the builder untouched.
    pub fn register_version<H>(
        &mut self,
        version: &str,
        handler: H,
        aliases: &[&str],
    ) -> Result<&mut Self, RegistryError>
    where
        H: VersionHandler + 'static,
    {
        self.add_version(version, into_shared(handler), false, aliases)
    }

    /// Register a version and mark it as the module's default.
    ///
    /// Fails with [`RegistryError::DefaultAlreadySet`] if a default exists,
    /// or with [`RegistryError::DuplicateKey`] on a key collision.
    pub fn register_default_version<H>(
        &mut self,
        version: &str,
        handler: H,
        aliases: &[&str],
    ) -> Result<&mut Self, RegistryError>
    where
        H: VersionHandler + 'static,
    {
        self.add_version(version, into_shared(handler), true, aliases)
    }

    /// Register an already shared handler. Used when several versions share one.
    pub fn register_shared(
        &mut self,
        version: &str,
        handler: Arc<dyn VersionHandler>,
        is_default: bool,
        aliases: &[&str],
    ) -> Result<&mut Self, RegistryError> {
        self.add_version(version, handler, is_default, aliases)
    }

    /// Whether `key` is registered as a version id or alias so far.
    pub fn has_version(&self, key: &str) -> bool {
        self.keys.contains_key(key)
    }

    fn add_version(
        &mut self,
        version: &str,
        handler: Arc<dyn VersionHandler>,
        is_default: bool,
        aliases: &[&str],
    ) -> Result<&mut Self, RegistryError> {
        if let Err(e) = self.check_registration(version, is_default, aliases) {
            warn!(language = %self.id.name, version, error = %e, "rejected version registration");
            return Err(e);
        }

        let ordinal = self.versions.len();
        self.versions.push(LanguageVersion::new(
            self.id.clone(),
            version.to_string(),
            handler,
            ordinal,
        ));
        self.keys.insert(version.to_string(), ordinal);
        for alias in aliases {
            self.keys.insert((*alias).to_string(), ordinal);
        }
        if is_default {
            self.default = Some(ordinal);
        }

        debug!(
            language = %self.id.name,
            version,
            ?aliases,
            default = is_default,
            "registered language version"
        );
        Ok(self)
    }

    /// Validate a registration without mutating anything.
    ///
    /// Primary id first, then aliases in order; the first collision wins.
    fn check_registration(
        &self,
        version: &str,
        is_default: bool,
        aliases: &[&str],
    ) -> Result<(), RegistryError> {
        let keys = std::iter::once(version).chain(aliases.iter().copied());
        for (i, key) in keys.enumerate() {
            let repeated = i > 0 && (key == version || aliases[..i - 1].contains(&key));
            if repeated || self.keys.contains_key(key) {
                return Err(RegistryError::DuplicateKey {
                    language: self.id.name.clone(),
                    key: key.to_string(),
                });
            }
        }

        if is_default {
            if let Some(existing) = self.default {
                return Err(RegistryError::DefaultAlreadySet {
                    language: self.id.name.clone(),
                    existing: self.versions[existing].version().to_string(),
                    attempted: version.to_string(),
                });
            }
        }
        Ok(())
    }

    /// Re-point already registered versions at the current identity record.
    fn refresh_versions(&mut self) {
        for v in &mut self.versions {
            *v = LanguageVersion::new(
                self.id.clone(),
                v.version().to_string(),
                v.handler().clone(),
                v.ordinal(),
            );
        }
    }

    /// Freeze the module.
    ///
    /// Fails with [`RegistryError::MissingDefaultVersion`] if no default
    /// version was registered.
    pub fn build(self) -> Result<LanguageModule, RegistryError> {
        let default = self.default.ok_or_else(|| RegistryError::MissingDefaultVersion {
            language: self.id.name.clone(),
        })?;

        info!(
            language = %self.id.name,
            versions = self.versions.len(),
            default = self.versions[default].version(),
            "language module ready"
        );

        Ok(LanguageModule {
            id: self.id,
            extensions: self.extensions,
            strategy: self.strategy,
            versions: self.versions,
            keys: self.keys,
            default,
        })
    }
}

/// Wrap a handler for storage. A handler that is already an
/// `Arc<dyn VersionHandler>` is reused instead of nested in a second `Arc`,
/// so `handler_as` still sees the concrete type.
fn into_shared<H: VersionHandler + 'static>(handler: H) -> Arc<dyn VersionHandler> {
    let wrapped: Arc<dyn VersionHandler> = Arc::new(handler);
    let shared = {
        let inner: &dyn VersionHandler = &*wrapped;
        inner.as_any().downcast_ref::<Arc<dyn VersionHandler>>().cloned()
    };
    shared.unwrap_or(wrapped)
}

fn normalize_extension(ext: &str) -> &str {
    ext.strip_prefix('.').unwrap_or(ext)
}

/// Finalized, read-only registry for one language.
///
/// Identity is the name alone: equality, hashing and ordering ignore every
/// other attribute.
pub struct LanguageModule {
    id: Arc<LanguageId>,
    extensions: Vec<String>,
    strategy: DispatchStrategy,
    versions: Vec<LanguageVersion>,
    keys: HashMap<String, usize>,
    default: usize,
}

impl LanguageModule {
    /// Start building a module.
    pub fn builder(name: impl Into<String>, terse_name: impl Into<String>) -> LanguageModuleBuilder {
        LanguageModuleBuilder::new(name, terse_name)
    }

    pub fn name(&self) -> &str {
        &self.id.name
    }

    pub fn short_name(&self) -> &str {
        self.id.short_name()
    }

    pub fn terse_name(&self) -> &str {
        &self.id.terse_name
    }

    /// Shared identity record, the same one each version points at.
    pub fn id(&self) -> &LanguageId {
        &self.id
    }

    /// File extensions, without leading dots.
    pub fn extensions(&self) -> &[String] {
        &self.extensions
    }

    /// Whether this language handles `ext` (with or without a leading dot).
    pub fn has_extension(&self, ext: &str) -> bool {
        let ext = normalize_extension(ext);
        self.extensions.iter().any(|e| e == ext)
    }

    pub fn dispatch_strategy(&self) -> DispatchStrategy {
        self.strategy
    }

    /// Distinct versions in registration order.
    pub fn versions(&self) -> &[LanguageVersion] {
        &self.versions
    }

    /// Resolve a version id or alias.
    pub fn get_version(&self, key: &str) -> Option<&LanguageVersion> {
        self.keys.get(key).map(|&i| &self.versions[i])
    }

    pub fn has_version(&self, key: &str) -> bool {
        self.keys.contains_key(key)
    }

    pub fn default_version(&self) -> &LanguageVersion {
        &self.versions[self.default]
    }

    /// Keys (ids and aliases) that resolve to `version`, sorted.
    pub fn keys_for(&self, version: &LanguageVersion) -> Vec<&str> {
        let mut keys: Vec<&str> = self
            .keys
            .iter()
            .filter(|(_, &i)| i == version.ordinal() && self.versions[i] == *version)
            .map(|(k, _)| k.as_str())
            .collect();
        keys.sort_unstable();
        keys
    }

    /// Aliases of `version`, excluding its primary id.
    pub fn aliases_of(&self, version: &LanguageVersion) -> Vec<&str> {
        self.keys_for(version)
            .into_iter()
            .filter(|k| *k != version.version())
            .collect()
    }
}

impl fmt::Debug for LanguageModule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LanguageModule")
            .field("name", &self.id.name)
            .field("terse_name", &self.id.terse_name)
            .field("extensions", &self.extensions)
            .field("versions", &self.versions)
            .field("default", &self.default_version().version())
            .finish()
    }
}

impl fmt::Display for LanguageModule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LanguageModule:{}", self.id.name)
    }
}

impl PartialEq for LanguageModule {
    fn eq(&self, other: &Self) -> bool {
        self.id.name == other.id.name
    }
}

impl Eq for LanguageModule {}

impl Hash for LanguageModule {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.name.hash(state);
    }
}

impl PartialOrd for LanguageModule {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for LanguageModule {
    fn cmp(&self, other: &Self) -> Ordering {
        self.id.name.cmp(&other.id.name)
    }
}
