//! Language modules, their versions, and the process-wide language registry.
//!
//! - `LanguageModuleBuilder`: build-phase registration of versions and aliases
//! - `LanguageModule`: frozen per-language registry, identity is the name
//! - `LanguageVersion`: one version of a language plus its opaque handler
//! - `LanguageRegistry`: ordered set of modules with extension lookup

mod module;
mod registry;
mod version;

pub use module::{LanguageModule, LanguageModuleBuilder};
pub use registry::LanguageRegistry;
pub use version::{LanguageId, LanguageVersion, VersionHandler};

use thiserror::Error;

/// Errors raised while assembling language modules.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("version key '{key}' is duplicated in language {language}")]
    DuplicateKey { language: String, key: String },
    #[error("default version of {language} already set to {existing}, cannot set it to {attempted}")]
    DefaultAlreadySet {
        language: String,
        existing: String,
        attempted: String,
    },
    #[error("language {language} has no default version")]
    MissingDefaultVersion { language: String },
    #[error("language {name} is registered twice")]
    DuplicateLanguage { name: String },
}
