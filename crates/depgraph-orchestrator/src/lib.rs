//! Per-manifest deadline driver and the parallel orchestrator that fans a
//! discovered-manifest list out across both ecosystem extractors.

pub mod driver;
pub mod orchestrator;

pub use driver::{drive, DEADLINE};
pub use orchestrator::{run, DiscoveredManifest};
