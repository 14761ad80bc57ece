//! NPM ecosystem extractor: v1 (nested) and v2/v3 (flat) lockfile walkers,
//! plus the nearest-ancestor `node_modules` resolver the flat walker needs.

pub mod error;
pub mod extractor;
pub mod path_resolver;
pub mod v1;
pub mod v2;

pub use error::NpmError;
pub use extractor::{extract, extract_or_report};
pub use path_resolver::candidate_paths;
