//! npm v1 (nested) lockfile extraction.
//!
//! A v1 lockfile is a recursive tree: the root has a `dependencies` map;
//! each entry carries `version`, `requires` (name -> range) and a possibly
//! empty `dependencies` sub-map representing packages nested under that
//! entry's own `node_modules`. Resolving a `requires` entry means walking
//! the lineage of `dependencies` maps from the current entry back to the
//! root, innermost first, and taking the first one that names it.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use depgraph_core::{canonical, ResolvedPackage};
use serde::Deserialize;

use crate::error::NpmError;

#[derive(Debug, Default, Deserialize)]
pub struct LockfileV1 {
    #[serde(default)]
    pub dependencies: HashMap<String, DependencyV1>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DependencyV1 {
    pub version: String,
    #[serde(default)]
    #[allow(dead_code)]
    pub dev: bool,
    #[serde(default)]
    pub requires: HashMap<String, String>,
    #[serde(default)]
    pub dependencies: HashMap<String, DependencyV1>,
}

const NPM_LOCAL_PREFIX: &str = "file://";

/// Extract a resolved mapping from a v1 lockfile's root dependency map and
/// the manifest's direct dependencies (name -> range).
///
/// The direct dependencies are folded in as a synthetic root entry keyed by
/// the empty string, whose `requires` is the manifest's own dependency map —
/// the same trick the lineage walk uses for every other entry.
pub fn extract(
    direct_deps: HashMap<String, String>,
    mut root: HashMap<String, DependencyV1>,
) -> Result<BTreeMap<String, ResolvedPackage>, NpmError> {
    root.insert(
        String::new(),
        DependencyV1 {
            version: String::new(),
            dev: false,
            requires: direct_deps,
            dependencies: HashMap::new(),
        },
    );

    let mut out = BTreeMap::new();
    let mut lineage: Vec<&HashMap<String, DependencyV1>> = vec![&root];
    walk(&mut out, &mut lineage)?;
    Ok(out)
}

fn walk<'a>(
    out: &mut BTreeMap<String, ResolvedPackage>,
    lineage: &mut Vec<&'a HashMap<String, DependencyV1>>,
) -> Result<(), NpmError> {
    let current = *lineage.last().expect("lineage always has a root frame");

    for (name, dep) in current {
        let is_local = dep.version.starts_with(NPM_LOCAL_PREFIX);
        let id = canonical(name, &dep.version);

        lineage.push(&dep.dependencies);

        let mut dependencies = BTreeSet::new();
        for req_name in dep.requires.keys() {
            let resolved = lineage
                .iter()
                .rev()
                .find_map(|frame| frame.get(req_name).map(|d| d.version.clone()));

            match resolved {
                Some(version) => {
                    dependencies.insert(canonical(req_name, &version));
                }
                None => {
                    lineage.pop();
                    return Err(NpmError::UnresolvedRequirement {
                        requirement: req_name.clone(),
                        consumer: name.clone(),
                    });
                }
            }
        }

        out.insert(
            id,
            ResolvedPackage {
                name: name.clone(),
                version: dep.version.clone(),
                is_local,
                dependencies: dependencies.into_iter().collect(),
            },
        );

        walk(out, lineage)?;
        lineage.pop();
    }

    Ok(())
}
