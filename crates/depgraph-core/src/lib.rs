//! Shared types for depgraph's dependency-graph extraction engine.
//!
//! This crate has no knowledge of any particular ecosystem. It provides:
//! - [`identity::canonical`], the `name@version` identity rule every
//!   extractor keys its resolved packages by.
//! - [`model`], the report/document shapes extractors and the orchestrator
//!   exchange.

pub mod identity;
pub mod model;

pub use identity::canonical;
pub use model::{Document, Ecosystem, PackageFile, ResolvedPackage};
