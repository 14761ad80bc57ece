//! The external package-loader collaborator.
//!
//! The MOD extractor never parses `go.mod` text itself; it delegates to
//! whatever loads the full transitive import graph with module-level
//! metadata. [`PackageLoader`] is that seam — implementations may shell out
//! to the `go` toolchain (see [`crate::golist::GoListLoader`]) or, in tests,
//! return a graph built by hand.

use std::path::Path;

use thiserror::Error;

/// A module's `replace` directive, if any.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplaceInfo {
    pub path: String,
    pub version: String,
}

/// Module-level metadata the loader attaches to each package it returns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleInfo {
    pub path: String,
    pub version: String,
    pub is_main: bool,
    /// The language/runtime version declared by the main module's `go`
    /// directive. Only ever populated on the main module.
    pub language_version: Option<String>,
    pub replace: Option<ReplaceInfo>,
}

/// One package as returned by the loader: its import path, the module that
/// owns it (absent for standard-library/builtin packages), and the import
/// paths of the packages it directly imports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageRecord {
    pub import_path: String,
    pub module: Option<ModuleInfo>,
    pub imports: Vec<String>,
}

/// The full result of one load: the packages directly matched by the
/// loader's target patterns (the BFS roots) plus the complete set of
/// packages reachable from them, keyed by import path so imports can be
/// looked up without re-querying the loader.
#[derive(Debug, Clone, Default)]
pub struct LoadResult {
    pub roots: Vec<String>,
    pub packages: std::collections::HashMap<String, PackageRecord>,
}

#[derive(Debug, Error)]
#[error("{0}")]
pub struct LoaderError(pub String);

/// Loads the transitive package graph rooted at a module directory,
/// configured for read-only module mode and the `tools` build tag, over the
/// `./...` and `./tools` target patterns.
pub trait PackageLoader: Send + Sync {
    fn load(&self, dir: &Path) -> Result<LoadResult, LoaderError>;
}
