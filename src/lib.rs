//! langmod - language-module registry for multi-language analyzers.
//!
//! A language module describes one source language to the rest of an
//! analysis system: its names, file extensions, the versions it understands,
//! version aliases, and its single default version. It also selects how
//! analysis rules are dispatched to parsed nodes.
//!
//! # Architecture
//!
//! - `language`: modules, versions, builder and the multi-language registry
//! - `dispatch`: the index-then-visit rule-chain contract and its strategies
//! - `catalog`: YAML language catalogs that build modules
//! - `report`: output formatting (pretty, JSON)
//! - `cli`: the `langmod` command
//!
//! # Building a Module
//!
//! ```
//! use langmod::LanguageModule;
//!
//! let mut builder = LanguageModule::builder("Java", "java").extensions(["java"]);
//! builder
//!     .register_default_version("17", (), &[])?
//!     .register_version("21", (), &["latest"])?;
//! let java = builder.build()?;
//!
//! assert_eq!(java.default_version().version(), "17");
//! assert_eq!(java.get_version("latest"), java.get_version("21"));
//! # Ok::<(), langmod::RegistryError>(())
//! ```

pub mod catalog;
pub mod cli;
pub mod dispatch;
pub mod language;
pub mod report;

pub use catalog::{builtin_registry, LanguageCatalog};
pub use dispatch::{
    BaselineDispatcher, DispatchStrategy, KindIndexedDispatcher, Node, Rule, RuleChain,
    RuleChainDispatcher,
};
pub use language::{
    LanguageId, LanguageModule, LanguageModuleBuilder, LanguageRegistry, LanguageVersion,
    RegistryError, VersionHandler,
};
