// Diagnostics go through tracing; the host decides where they end up
#![deny(clippy::print_stderr)]

//! Grammar metadata and query resource resolution for tree-sitter grammars.
//!
//! Parsing is left entirely to tree-sitter. This crate wraps a compiled
//! grammar, exposes its symbol and field tables, finds the loose query files
//! (`highlights.scm`, `injections.scm`) a grammar ships in a resource bundle,
//! and compiles them against the grammar.
//!
//! # Architecture
//!
//! * [`grammar`]: [`GrammarHandle`] and grammar introspection
//! * [`provider`]: [`DirectoryProvider`] strategies for finding a grammar's resource root
//! * [`locate`]: bundle discovery and recursive file search
//! * [`query`]: conventional query resource names
//! * [`loader`]: reading and compiling query files (feature `fs`)
//!
//! Absence is never an error. A grammar without a provider, a bundle that
//! cannot be found and a missing file all resolve to `None`, and
//! [`GrammarHandle::load_query`] turns that into `Ok(None)`.

pub mod grammar;
#[cfg(feature = "fs")]
pub mod loader;
pub mod locate;
pub mod provider;
pub mod query;

// Grammar crates are only exercised by the integration tests.
#[cfg(test)]
use {tree_sitter_json as _, tree_sitter_rust as _};

pub use grammar::{GrammarHandle, engine_version, minimum_compatible_version};
#[cfg(feature = "fs")]
pub use loader::{LanguageQueries, QueryLoadError, load_query};
pub use locate::{BundleLocator, RESOURCE_ROOT_ENV, SearchRoot, find_file};
pub use provider::{BundleDirectory, DirectoryProvider, FixedDirectory};
pub use query::QueryKind;
pub use tree_sitter::{Language, Query, QueryError, QueryErrorKind};
