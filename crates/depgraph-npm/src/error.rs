//! Error taxonomy for NPM manifest extraction.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum NpmError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    MalformedJson {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("unsupported lockfile version {0}")]
    UnsupportedLockfileVersion(i64),

    #[error("couldn't find requirement {requirement:?} referenced by {consumer:?}")]
    UnresolvedRequirement { requirement: String, consumer: String },

    #[error("couldn't find dependency {dependency:?} declared by {consumer:?}")]
    UnresolvedDependency { dependency: String, consumer: String },

    #[error("resolved pointer {pointer:?} referenced by {consumer:?} does not exist")]
    UnresolvedLink { pointer: String, consumer: String },
}
