//! Repository walk: find every `go.mod` and `package.json` under a root,
//! skipping the directories that never hold a manifest worth extracting.

use std::path::Path;

use depgraph_orchestrator::DiscoveredManifest;
use walkdir::WalkDir;

const SKIPPED_DIRS: &[&str] = &["vendor", "node_modules", ".git"];

/// Walk `root` and return one [`DiscoveredManifest`] per `go.mod`/
/// `package.json` found, in the order the walk encounters them.
pub fn find_manifests(root: &Path) -> Vec<DiscoveredManifest> {
    let mut manifests = Vec::new();

    for entry in WalkDir::new(root)
        .follow_links(false)
        .into_iter()
        .filter_entry(|e| {
            e.file_name()
                .to_str()
                .map(|name| !SKIPPED_DIRS.contains(&name))
                .unwrap_or(true)
        })
        .filter_map(|e| e.ok())
    {
        if !entry.file_type().is_file() {
            continue;
        }
        match entry.file_name().to_str() {
            Some("go.mod") => {
                let dir = entry
                    .path()
                    .parent()
                    .unwrap_or_else(|| Path::new("."))
                    .to_path_buf();
                manifests.push(DiscoveredManifest::Mod(dir));
            }
            Some("package.json") => {
                manifests.push(DiscoveredManifest::Npm(entry.path().to_path_buf()));
            }
            _ => {}
        }
    }

    manifests
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn finds_manifests_and_skips_vendored_directories() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("go.mod"), "module example.com/repo\n").unwrap();
        fs::create_dir_all(dir.path().join("node_modules/left-pad")).unwrap();
        fs::write(
            dir.path().join("node_modules/left-pad/package.json"),
            "{}",
        )
        .unwrap();
        fs::create_dir_all(dir.path().join("web")).unwrap();
        fs::write(dir.path().join("web/package.json"), "{}").unwrap();

        let found = find_manifests(dir.path());
        assert_eq!(found.len(), 2);
        assert!(found
            .iter()
            .any(|m| matches!(m, DiscoveredManifest::Mod(_))));
        assert!(found
            .iter()
            .any(|m| matches!(m, DiscoveredManifest::Npm(p) if p.ends_with("web/package.json"))));
    }
}
