//! MOD extractor: breadth-first walk over the transitive import graph,
//! collapsed from package-level imports down to module-level dependency
//! edges.

use std::collections::{BTreeMap, BTreeSet, HashSet, VecDeque};
use std::path::Path;

use depgraph_core::{canonical, Ecosystem, PackageFile, ResolvedPackage};

use crate::error::ModError;
use crate::loader::{LoadResult, ModuleInfo, PackageLoader};

/// Run the MOD extractor against `dir` (the directory containing `go.mod`),
/// delegating the actual graph load to `loader`.
pub fn extract(loader: &dyn PackageLoader, dir: &Path) -> Result<PackageFile, ModError> {
    let manifest_path = dir.join("go.mod").display().to_string();
    let load_result = loader.load(dir).map_err(|e| ModError::Loader(e.0))?;
    Ok(build_report(manifest_path, load_result))
}

/// Same as [`extract`], but never returns `Err`: loader failures become a
/// failed [`PackageFile`] so callers (the per-manifest driver) don't need a
/// separate error path for "the collaborator blew up" versus "extraction
/// completed with a structured error".
pub fn extract_or_report(loader: &dyn PackageLoader, dir: &Path) -> PackageFile {
    let manifest_path = dir.join("go.mod").display().to_string();
    match loader.load(dir) {
        Ok(load_result) => build_report(manifest_path, load_result),
        Err(e) => PackageFile::failure(manifest_path, Ecosystem::Mod, e.0),
    }
}

fn effective_identity(module: &ModuleInfo) -> (String, String) {
    let mut version = module.version.clone();
    if module.is_main {
        version = module.language_version.clone().unwrap_or_default();
    }
    if let Some(replace) = &module.replace {
        if replace.path == module.path {
            version = replace.version.clone();
        }
    }
    if is_local_replace(module) {
        version = String::new();
    }
    (module.path.clone(), version)
}

fn is_local_replace(module: &ModuleInfo) -> bool {
    module
        .replace
        .as_ref()
        .is_some_and(|r| r.path.starts_with("./"))
}

fn build_report(manifest_path: String, load_result: LoadResult) -> PackageFile {
    let LoadResult { roots, packages } = load_result;

    let mut main_name = None;
    let mut main_go_version = None;
    for root in &roots {
        if let Some(module) = packages.get(root).and_then(|p| p.module.as_ref()) {
            if module.is_main {
                main_name = Some(module.path.clone());
                main_go_version = module.language_version.clone();
                break;
            }
        }
    }

    let mut visited: HashSet<String> = HashSet::new();
    let mut queue: VecDeque<String> = roots.into_iter().collect();
    let mut modules: BTreeMap<String, ResolvedPackage> = BTreeMap::new();
    let mut dep_sets: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();

    while let Some(import_path) = queue.pop_front() {
        let Some(pkg) = packages.get(&import_path) else {
            continue;
        };
        let Some(module) = &pkg.module else {
            tracing::debug!(import_path = %import_path, "skipping package with no module metadata");
            continue;
        };
        if visited.contains(&import_path) {
            continue;
        }
        visited.insert(import_path.clone());

        let (name, version) = effective_identity(module);
        let id = canonical(&name, &version);
        let is_local = is_local_replace(module);

        modules.entry(id.clone()).or_insert_with(|| ResolvedPackage {
            name: name.clone(),
            version: version.clone(),
            is_local,
            dependencies: Vec::new(),
        });
        dep_sets.entry(id.clone()).or_default();

        for imported_path in &pkg.imports {
            let Some(imported_module) = packages.get(imported_path).and_then(|p| p.module.as_ref())
            else {
                continue;
            };

            let (imp_name, imp_version) = effective_identity(imported_module);
            let imp_id = canonical(&imp_name, &imp_version);

            if imp_id != id {
                dep_sets.get_mut(&id).unwrap().insert(imp_id);
            }

            if !visited.contains(imported_path) {
                queue.push_back(imported_path.clone());
            }
        }
    }

    for (id, deps) in dep_sets {
        if let Some(record) = modules.get_mut(&id) {
            record.dependencies = deps.into_iter().collect();
        }
    }

    PackageFile::success(manifest_path, Ecosystem::Mod, main_name, main_go_version, modules)
}
