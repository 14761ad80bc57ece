//! Shared data model for resolved dependency-graph reports.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Which packaging ecosystem a manifest belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Ecosystem {
    /// Module-graph ecosystem identified by `go.mod`.
    #[serde(rename = "gomod")]
    Mod,
    /// Lock-file ecosystem identified by `package.json` + `package-lock.json`.
    Npm,
}

impl Ecosystem {
    pub fn as_str(&self) -> &'static str {
        match self {
            Ecosystem::Mod => "gomod",
            Ecosystem::Npm => "npm",
        }
    }
}

/// A single resolved package within one manifest's report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedPackage {
    pub name: String,
    pub version: String,
    pub is_local: bool,
    /// Canonical identities of the other resolved packages this package
    /// directly depends on, in lexicographic order with no duplicates.
    pub dependencies: Vec<String>,
}

/// The outcome of extracting one manifest: either a full resolved mapping or
/// a structured error. Exactly one of the two is populated; no report carries
/// both a mapping and an error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackageFile {
    pub path: String,
    #[serde(rename = "type")]
    pub kind: Ecosystem,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", rename = "go_version")]
    pub go_version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty", default)]
    pub packages: BTreeMap<String, ResolvedPackage>,
}

impl PackageFile {
    /// Construct a successful report. `name`/`go_version` are MOD-only
    /// metadata captured from the main module; callers pass `None` for NPM.
    pub fn success(
        path: impl Into<String>,
        kind: Ecosystem,
        name: Option<String>,
        go_version: Option<String>,
        packages: BTreeMap<String, ResolvedPackage>,
    ) -> Self {
        Self {
            path: path.into(),
            kind,
            name,
            go_version,
            error: None,
            packages,
        }
    }

    /// Construct a failed report. The manifest path and ecosystem tag remain
    /// populated; the mapping stays empty.
    pub fn failure(path: impl Into<String>, kind: Ecosystem, error: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            kind,
            name: None,
            go_version: None,
            error: Some(error.into()),
            packages: BTreeMap::new(),
        }
    }

    pub fn is_failure(&self) -> bool {
        self.error.is_some()
    }

    /// Check the invariant that every identity named in a `dependencies`
    /// set is itself a key of the mapping. Returns the first dangling
    /// identity found, if any. Each extractor upholds this by construction
    /// (the NPM walkers reject an unresolvable entry with a structured
    /// error instead of recording it; the MOD walker only ever records a
    /// dependency edge to a module it also enqueues for traversal) — this
    /// is the property tests assert against, not a check extractors run.
    pub fn dangling_dependency(&self) -> Option<&str> {
        for record in self.packages.values() {
            for dep in &record.dependencies {
                if !self.packages.contains_key(dep) {
                    return Some(dep.as_str());
                }
            }
        }
        None
    }
}

/// Top-level output document: one report per discovered manifest, tagged
/// with the repository identity the caller supplied.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    pub repository: String,
    pub commit: String,
    pub files: Vec<PackageFile>,
}

impl Document {
    pub fn new(repository: impl Into<String>, commit: impl Into<String>) -> Self {
        Self {
            repository: repository.into(),
            commit: commit.into(),
            files: Vec::new(),
        }
    }

    pub fn failed_files(&self) -> impl Iterator<Item = &PackageFile> {
        self.files.iter().filter(|f| f.is_failure())
    }
}
