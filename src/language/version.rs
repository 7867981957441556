//! Language versions and their opaque handlers.

use std::any::Any;
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// Opaque per-version behavior bundle.
///
/// The registry stores handlers and hands them back, it never calls into
/// them. Any `Send + Sync + 'static` type is a handler; consumers recover the
/// concrete type with [`LanguageVersion::handler_as`].
pub trait VersionHandler: Send + Sync {
    /// Upcast for downcasting to the concrete handler type.
    fn as_any(&self) -> &dyn Any;
}

impl<T: Any + Send + Sync> VersionHandler for T {
    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Identity record shared by a language module and all of its versions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguageId {
    pub name: String,
    pub short_name: Option<String>,
    pub terse_name: String,
}

impl LanguageId {
    /// Short name, falling back to the full name.
    pub fn short_name(&self) -> &str {
        self.short_name.as_deref().unwrap_or(&self.name)
    }
}

/// One registered version of a language.
///
/// Immutable once created. Holds a shared reference to the owning
/// language's identity rather than to the module itself, so a version can
/// be handed out without keeping the module's tables alive.
#[derive(Clone)]
pub struct LanguageVersion {
    language: Arc<LanguageId>,
    version: String,
    handler: Arc<dyn VersionHandler>,
    ordinal: usize,
}

impl LanguageVersion {
    pub(crate) fn new(
        language: Arc<LanguageId>,
        version: String,
        handler: Arc<dyn VersionHandler>,
        ordinal: usize,
    ) -> Self {
        Self {
            language,
            version,
            handler,
            ordinal,
        }
    }

    /// Identity of the owning language.
    pub fn language(&self) -> &LanguageId {
        &self.language
    }

    /// The primary version identifier (e.g., "17").
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Position of this version in its module's registration order.
    pub fn ordinal(&self) -> usize {
        self.ordinal
    }

    /// The opaque handler registered with this version.
    pub fn handler(&self) -> &Arc<dyn VersionHandler> {
        &self.handler
    }

    /// The handler as its concrete type, if it is a `T`.
    pub fn handler_as<T: Any>(&self) -> Option<&T> {
        // Go through the trait object, `Arc<dyn VersionHandler>` is itself a handler.
        let handler: &dyn VersionHandler = &*self.handler;
        handler.as_any().downcast_ref::<T>()
    }

    /// Display name, e.g. "Java 17".
    pub fn name(&self) -> String {
        qualify(&self.language.name, &self.version)
    }

    /// Short display name, e.g. "Java 17".
    pub fn short_name(&self) -> String {
        qualify(self.language.short_name(), &self.version)
    }

    /// Terse name, e.g. "java 17". Accepted by
    /// [`LanguageRegistry::find_version_by_terse_name`](super::LanguageRegistry::find_version_by_terse_name).
    pub fn terse_name(&self) -> String {
        qualify(&self.language.terse_name, &self.version)
    }
}

fn qualify(prefix: &str, version: &str) -> String {
    if version.is_empty() {
        prefix.to_string()
    } else {
        format!("{} {}", prefix, version)
    }
}

impl fmt::Debug for LanguageVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LanguageVersion")
            .field("language", &self.language.name)
            .field("version", &self.version)
            .field("ordinal", &self.ordinal)
            .finish_non_exhaustive()
    }
}

impl fmt::Display for LanguageVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LanguageVersion[{}]", self.name())
    }
}

impl PartialEq for LanguageVersion {
    fn eq(&self, other: &Self) -> bool {
        self.language.name == other.language.name
            && self.ordinal == other.ordinal
            && self.version == other.version
    }
}

impl Eq for LanguageVersion {}

impl Hash for LanguageVersion {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.language.name.hash(state);
        self.ordinal.hash(state);
        self.version.hash(state);
    }
}

impl PartialOrd for LanguageVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for LanguageVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        self.language
            .name
            .cmp(&other.language.name)
            .then(self.ordinal.cmp(&other.ordinal))
            .then_with(|| self.version.cmp(&other.version))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct Handler(u32);

    fn java() -> Arc<LanguageId> {
        Arc::new(LanguageId {
            name: "Java".to_string(),
            short_name: None,
            terse_name: "java".to_string(),
        })
    }

    #[test]
    fn test_names() {
        let v = LanguageVersion::new(java(), "17".to_string(), Arc::new(Handler(1)), 0);
        assert_eq!(v.name(), "Java 17");
        assert_eq!(v.short_name(), "Java 17");
        assert_eq!(v.terse_name(), "java 17");
        assert_eq!(v.to_string(), "LanguageVersion[Java 17]");
    }

    #[test]
    fn test_empty_version_uses_bare_language_name() {
        let v = LanguageVersion::new(java(), String::new(), Arc::new(Handler(1)), 0);
        assert_eq!(v.name(), "Java");
        assert_eq!(v.terse_name(), "java");
    }

    #[test]
    fn test_handler_downcast() {
        let v = LanguageVersion::new(java(), "17".to_string(), Arc::new(Handler(7)), 0);
        assert_eq!(v.handler_as::<Handler>(), Some(&Handler(7)));
        assert!(v.handler_as::<String>().is_none());
    }

    #[test]
    fn test_eq_agrees_with_ordering() {
        let lang = java();
        let versions = [
            LanguageVersion::new(lang.clone(), "17".to_string(), Arc::new(()), 0),
            LanguageVersion::new(lang.clone(), "17".to_string(), Arc::new(()), 1),
            LanguageVersion::new(lang.clone(), "21".to_string(), Arc::new(()), 1),
            LanguageVersion::new(lang, "17".to_string(), Arc::new(Handler(3)), 0),
        ];

        for a in &versions {
            for b in &versions {
                assert_eq!(a == b, a.cmp(b) == Ordering::Equal, "{:?} vs {:?}", a, b);
            }
        }
        // Same id at different positions (e.g. two modules sharing a name).
        assert_ne!(versions[0], versions[1]);
        assert_eq!(versions[0], versions[3]);
    }

    #[test]
    fn test_ordering_follows_registration() {
        let lang = java();
        let newer = LanguageVersion::new(lang.clone(), "9".to_string(), Arc::new(()), 0);
        let older = LanguageVersion::new(lang, "17".to_string(), Arc::new(()), 1);
        assert!(newer < older);
    }
}
