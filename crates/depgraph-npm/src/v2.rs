//! npm v2/v3 (flat) lockfile extraction.
//!
//! A v2/v3 lockfile has a single flat `packages` map keyed by install path.
//! Attributing a `dependencies` entry to a concrete installed version is the
//! hard part: it requires the nearest-ancestor [`crate::path_resolver`] walk
//! over that same map.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use depgraph_core::{canonical, ResolvedPackage};
use serde::Deserialize;

use crate::error::NpmError;
use crate::path_resolver::candidate_paths;

#[derive(Debug, Default, Deserialize)]
pub struct LockfileV2 {
    #[serde(default)]
    pub packages: HashMap<String, DependencyV2>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DependencyV2 {
    pub name: Option<String>,
    pub version: Option<String>,
    #[serde(default)]
    #[allow(dead_code)]
    pub dev: Option<bool>,
    #[serde(default, rename = "devDependencies")]
    pub dev_dependencies: HashMap<String, String>,
    #[serde(default)]
    pub dependencies: HashMap<String, String>,
    pub link: Option<bool>,
    pub resolved: Option<String>,
}

/// Derive a package's effective name from its install-path key: everything
/// after the last `node_modules/` segment, which is also the bare key for
/// the project root (empty string) and workspace/local-package roots.
fn derive_name(key: &str) -> String {
    if key.is_empty() {
        return String::new();
    }
    match key.rsplit_once("node_modules/") {
        Some((_, last)) => last.to_string(),
        None => key.to_string(),
    }
}

/// Follow a link entry's `resolved` pointer one hop, returning the target
/// entry and its key.
fn follow_link<'a>(
    packages: &'a HashMap<String, DependencyV2>,
    link_key: &str,
    link: &DependencyV2,
) -> Result<(&'a str, &'a DependencyV2), NpmError> {
    let target_key = link.resolved.clone().ok_or_else(|| NpmError::UnresolvedLink {
        pointer: String::new(),
        consumer: link_key.to_string(),
    })?;
    match packages.get_key_value(&target_key) {
        Some((key, target)) => Ok((key.as_str(), target)),
        None => Err(NpmError::UnresolvedLink {
            pointer: target_key,
            consumer: link_key.to_string(),
        }),
    }
}

pub fn extract(mut lockfile: LockfileV2) -> Result<BTreeMap<String, ResolvedPackage>, NpmError> {
    // Direct dependencies are the union of the root's dependencies and
    // devDependencies; on a name collision the dev range wins, matching the
    // way the root entry's dependencies map is populated in place.
    if let Some(root) = lockfile.packages.get("").cloned() {
        let mut merged = root.dependencies;
        for (name, range) in root.dev_dependencies {
            merged.insert(name, range);
        }
        if let Some(root_mut) = lockfile.packages.get_mut("") {
            root_mut.dependencies = merged;
        }
    }

    let mut out = BTreeMap::new();

    for (key, entry) in &lockfile.packages {
        let (is_local, effective_name, effective) = if entry.link.unwrap_or(false) {
            let (_, target) = follow_link(&lockfile.packages, key, entry)?;
            (true, target.name.clone().unwrap_or_default(), target)
        } else {
            (false, derive_name(key), entry)
        };

        let version = effective.version.clone().unwrap_or_default();
        let id = canonical(&effective_name, &version);

        let mut dependencies = BTreeSet::new();
        for dep_name in effective.dependencies.keys() {
            let mut matched = None;
            for candidate in candidate_paths(key, dep_name) {
                if let Some(info) = lockfile.packages.get(&candidate) {
                    matched = Some(if info.link.unwrap_or(false) {
                        let (_, target) = follow_link(&lockfile.packages, &candidate, info)?;
                        canonical(
                            &target.name.clone().unwrap_or_default(),
                            &target.version.clone().unwrap_or_default(),
                        )
                    } else {
                        canonical(dep_name, &info.version.clone().unwrap_or_default())
                    });
                    break;
                }
            }

            match matched {
                Some(id) => {
                    dependencies.insert(id);
                }
                None => {
                    return Err(NpmError::UnresolvedDependency {
                        dependency: dep_name.clone(),
                        consumer: key.clone(),
                    });
                }
            }
        }

        out.insert(
            id,
            ResolvedPackage {
                name: effective_name,
                version,
                is_local,
                dependencies: dependencies.into_iter().collect(),
            },
        );
    }

    Ok(out)
}
