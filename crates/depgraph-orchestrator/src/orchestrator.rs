//! Manifest discovery result and the bounded-concurrency fan-out that turns
//! a list of discovered manifests into one [`Document`].

use std::path::PathBuf;
use std::sync::Arc;

use depgraph_core::{Document, Ecosystem, PackageFile};
use depgraph_gomod::PackageLoader;
use futures::stream::{self, StreamExt};

use crate::driver::drive;

/// One manifest found while walking a repository, tagged with the
/// ecosystem its filename identified it as.
#[derive(Debug, Clone)]
pub enum DiscoveredManifest {
    /// Directory containing a `go.mod`.
    Mod(PathBuf),
    /// Path to a `package.json`.
    Npm(PathBuf),
}

impl DiscoveredManifest {
    fn display_path(&self) -> String {
        match self {
            DiscoveredManifest::Mod(dir) => dir.join("go.mod").display().to_string(),
            DiscoveredManifest::Npm(path) => path.display().to_string(),
        }
    }

    fn ecosystem(&self) -> Ecosystem {
        match self {
            DiscoveredManifest::Mod(_) => Ecosystem::Mod,
            DiscoveredManifest::Npm(_) => Ecosystem::Npm,
        }
    }
}

/// Extract every discovered manifest under a bounded-concurrency pool sized
/// to the host's CPU count, and assemble the results into a [`Document`].
///
/// Each manifest runs through the same per-manifest [`drive`] deadline
/// regardless of ecosystem; a `None` outcome (an NPM manifest the format
/// contract says to skip) contributes no entry to the resulting document.
pub async fn run(
    loader: Arc<dyn PackageLoader>,
    manifests: Vec<DiscoveredManifest>,
    repository: String,
    commit: String,
) -> Document {
    let concurrency = num_cpus::get().max(1);

    let results: Vec<Option<PackageFile>> = stream::iter(manifests.into_iter())
        .map(|manifest| {
            let loader = Arc::clone(&loader);
            async move {
                let manifest_path = manifest.display_path();
                let kind = manifest.ecosystem();

                let handle = tokio::spawn(async move {
                    match manifest {
                        DiscoveredManifest::Mod(dir) => {
                            drive(manifest_path, kind, move || {
                                Some(depgraph_gomod::extract_or_report(loader.as_ref(), &dir))
                            })
                            .await
                        }
                        DiscoveredManifest::Npm(path) => {
                            drive(manifest_path, kind, move || {
                                depgraph_npm::extract_or_report(&path)
                            })
                            .await
                        }
                    }
                });

                match handle.await {
                    Ok(outcome) => outcome,
                    Err(_) => None,
                }
            }
        })
        .buffer_unordered(concurrency)
        .collect()
        .await;

    let mut document = Document::new(repository, commit);
    document.files = results.into_iter().flatten().collect();
    document
}

#[cfg(test)]
mod tests {
    use super::*;
    use depgraph_gomod::{LoadResult, LoaderError};
    use std::path::Path;
    use tempfile::TempDir;

    struct EmptyLoader;
    impl PackageLoader for EmptyLoader {
        fn load(&self, _dir: &Path) -> Result<LoadResult, LoaderError> {
            Ok(LoadResult {
                roots: vec![],
                packages: Default::default(),
            })
        }
    }

    #[tokio::test]
    async fn empty_manifest_list_produces_an_empty_document() {
        let document = run(
            Arc::new(EmptyLoader),
            vec![],
            "example/repo".to_string(),
            "abc123".to_string(),
        )
        .await;

        assert_eq!(document.repository, "example/repo");
        assert!(document.files.is_empty());
    }

    #[tokio::test]
    async fn skipped_npm_manifest_contributes_no_file() {
        let dir = TempDir::new().unwrap();
        let manifest = dir.path().join("package.json");
        std::fs::write(&manifest, r#"{"name":"x","dependencies":{"left-pad":"^1.0.0"}}"#)
            .unwrap();

        let document = run(
            Arc::new(EmptyLoader),
            vec![DiscoveredManifest::Npm(manifest)],
            "example/repo".to_string(),
            "abc123".to_string(),
        )
        .await;

        assert!(document.files.is_empty());
    }

    #[tokio::test]
    async fn go_mod_manifest_with_no_roots_produces_an_empty_success_report() {
        let dir = TempDir::new().unwrap();

        let document = run(
            Arc::new(EmptyLoader),
            vec![DiscoveredManifest::Mod(dir.path().to_path_buf())],
            "example/repo".to_string(),
            "abc123".to_string(),
        )
        .await;

        assert_eq!(document.files.len(), 1);
        assert!(!document.files[0].is_failure());
        assert!(document.files[0].packages.is_empty());
    }
}
