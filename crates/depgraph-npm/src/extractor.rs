//! Per-manifest entry point: reads `package.json` and its sibling
//! `package-lock.json`, dispatches to the v1 or v2/v3 walker based on the
//! lockfile's `lockfileVersion`, and packages the outcome into a
//! [`depgraph_core::PackageFile`].

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use depgraph_core::{Ecosystem, PackageFile};
use serde::Deserialize;

use crate::error::NpmError;
use crate::v1::{self, LockfileV1};
use crate::v2::{self, LockfileV2};

#[derive(Debug, Default, Deserialize)]
struct PackageJson {
    #[serde(default)]
    #[allow(dead_code)]
    name: Option<String>,
    #[serde(default)]
    dependencies: HashMap<String, String>,
}

#[derive(Debug, Deserialize)]
struct LockfileVersionProbe {
    #[serde(rename = "lockfileVersion")]
    lockfile_version: i64,
}

/// Extract the dependency graph for one `package.json`/`package-lock.json`
/// pair. Returns `Ok(None)` when the manifest declares fewer than two direct
/// dependencies — per the ecosystem format contract such a manifest produces
/// no report at all, success or failure.
pub fn extract(manifest_path: &Path) -> Result<Option<PackageFile>, NpmError> {
    let manifest_display = manifest_path.display().to_string();

    let manifest_bytes = std::fs::read(manifest_path).map_err(|source| NpmError::Io {
        path: manifest_display.clone(),
        source,
    })?;
    let package_json: PackageJson =
        serde_json::from_slice(&manifest_bytes).map_err(|source| NpmError::MalformedJson {
            path: manifest_display.clone(),
            source,
        })?;

    if package_json.dependencies.len() < 2 {
        return Ok(None);
    }

    let lockfile_path: PathBuf = manifest_path
        .parent()
        .unwrap_or_else(|| Path::new("."))
        .join("package-lock.json");
    let lockfile_display = lockfile_path.display().to_string();

    let lockfile_bytes = std::fs::read(&lockfile_path).map_err(|source| NpmError::Io {
        path: lockfile_display.clone(),
        source,
    })?;
    let probe: LockfileVersionProbe =
        serde_json::from_slice(&lockfile_bytes).map_err(|source| NpmError::MalformedJson {
            path: lockfile_display.clone(),
            source,
        })?;

    let packages = match probe.lockfile_version {
        1 => {
            let lockfile: LockfileV1 = serde_json::from_slice(&lockfile_bytes).map_err(|source| {
                NpmError::MalformedJson {
                    path: lockfile_display.clone(),
                    source,
                }
            })?;
            v1::extract(package_json.dependencies, lockfile.dependencies)?
        }
        2 | 3 => {
            let lockfile: LockfileV2 = serde_json::from_slice(&lockfile_bytes).map_err(|source| {
                NpmError::MalformedJson {
                    path: lockfile_display.clone(),
                    source,
                }
            })?;
            v2::extract(lockfile)?
        }
        other => return Err(NpmError::UnsupportedLockfileVersion(other)),
    };

    Ok(Some(PackageFile::success(
        lockfile_display,
        Ecosystem::Npm,
        None,
        None,
        packages,
    )))
}

/// Drive [`extract`] the way the orchestrator's per-manifest driver expects:
/// failures become a failed report rather than a propagated error, with the
/// manifest path and ecosystem tag populated either way.
pub fn extract_or_report(manifest_path: &Path) -> Option<PackageFile> {
    match extract(manifest_path) {
        Ok(report) => report,
        Err(err) => Some(PackageFile::failure(
            manifest_path.display().to_string(),
            Ecosystem::Npm,
            err.to_string(),
        )),
    }
}
