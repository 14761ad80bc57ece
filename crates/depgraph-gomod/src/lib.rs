//! MOD ecosystem extractor: the external package-loader collaborator seam,
//! a default `go list`-backed implementation, and the BFS that collapses
//! the loaded package graph into module-level dependency edges.

pub mod error;
pub mod extractor;
pub mod golist;
pub mod loader;

pub use error::ModError;
pub use extractor::{extract, extract_or_report};
pub use golist::GoListLoader;
pub use loader::{LoadResult, LoaderError, ModuleInfo, PackageLoader, PackageRecord, ReplaceInfo};
