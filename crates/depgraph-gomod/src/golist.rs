//! Default [`PackageLoader`] backed by the `go` toolchain's `list` command.
//!
//! `go list -json` prints one JSON object per package, concatenated rather
//! than wrapped in an array, which is exactly what [`serde_json::Deserializer`]'s
//! streaming mode is for.

use std::collections::HashMap;
use std::path::Path;
use std::process::Command;

use serde::Deserialize;

use crate::loader::{LoadResult, LoaderError, ModuleInfo, PackageLoader, PackageRecord, ReplaceInfo};

/// Shells out to `go list` with the same load mode the original module
/// loader used: read-only module mode, the `tools` build tag, test
/// variants included, over `./...` and `./tools`.
pub struct GoListLoader {
    go_binary: String,
}

impl GoListLoader {
    pub fn new() -> Self {
        Self {
            go_binary: "go".to_string(),
        }
    }

    pub fn with_binary(go_binary: impl Into<String>) -> Self {
        Self {
            go_binary: go_binary.into(),
        }
    }
}

impl Default for GoListLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl PackageLoader for GoListLoader {
    fn load(&self, dir: &Path) -> Result<LoadResult, LoaderError> {
        // First pass: just the packages the patterns directly match, to
        // determine the BFS roots.
        let root_output = self.run(dir, false)?;
        let roots = parse_stream(&root_output)?;

        // Second pass: the full transitive closure, with each package's
        // direct imports attached so the extractor can walk the graph
        // without re-invoking the loader.
        let full_output = self.run(dir, true)?;
        let full = parse_stream(&full_output)?;

        let mut packages = HashMap::with_capacity(full.len());
        for pkg in full {
            packages.insert(pkg.import_path.clone(), to_record(pkg));
        }

        Ok(LoadResult {
            roots: roots.into_iter().map(|p| p.import_path).collect(),
            packages,
        })
    }
}

fn to_record(pkg: GoListPackage) -> PackageRecord {
    PackageRecord {
        import_path: pkg.import_path,
        module: pkg.module.map(|m| ModuleInfo {
            path: m.path,
            version: m.version.unwrap_or_default(),
            is_main: m.main,
            language_version: m.go_version,
            replace: m.replace.map(|r| ReplaceInfo {
                path: r.path,
                version: r.version.unwrap_or_default(),
            }),
        }),
        imports: pkg.imports,
    }
}

impl GoListLoader {
    fn run(&self, dir: &Path, deps: bool) -> Result<String, LoaderError> {
        let mut cmd = Command::new(&self.go_binary);
        cmd.current_dir(dir)
            .arg("list")
            .arg("-mod=readonly")
            .arg("-tags")
            .arg("tools")
            .arg("-test")
            .arg("-json");
        if deps {
            cmd.arg("-deps");
        }
        cmd.arg("./...").arg("./tools");

        let output = cmd
            .output()
            .map_err(|e| LoaderError(format!("failed to run {}: {e}", self.go_binary)))?;

        if !output.status.success() {
            return Err(LoaderError(
                String::from_utf8_lossy(&output.stderr).trim().to_string(),
            ));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

fn parse_stream(raw: &str) -> Result<Vec<GoListPackage>, LoaderError> {
    serde_json::Deserializer::from_str(raw)
        .into_iter::<GoListPackage>()
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| LoaderError(format!("failed to parse go list output: {e}")))
}

#[derive(Debug, Deserialize)]
struct GoListPackage {
    #[serde(rename = "ImportPath")]
    import_path: String,
    #[serde(rename = "Module", default)]
    module: Option<GoListModule>,
    #[serde(rename = "Imports", default)]
    imports: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct GoListModule {
    #[serde(rename = "Path")]
    path: String,
    #[serde(rename = "Version", default)]
    version: Option<String>,
    #[serde(rename = "Main", default)]
    main: bool,
    #[serde(rename = "GoVersion", default)]
    go_version: Option<String>,
    #[serde(rename = "Replace", default)]
    replace: Option<GoListReplace>,
}

#[derive(Debug, Deserialize)]
struct GoListReplace {
    #[serde(rename = "Path")]
    path: String,
    #[serde(rename = "Version", default)]
    version: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_concatenated_json_objects() {
        let raw = r#"{"ImportPath":"a","Imports":["b"]}{"ImportPath":"b","Imports":[]}"#;
        let pkgs = parse_stream(raw).unwrap();
        assert_eq!(pkgs.len(), 2);
        assert_eq!(pkgs[0].import_path, "a");
        assert_eq!(pkgs[1].import_path, "b");
    }

    #[test]
    fn module_without_replace_has_none() {
        let raw = r#"{"ImportPath":"a","Module":{"Path":"example.com/a","Version":"v1.0.0","Main":false}}"#;
        let pkgs = parse_stream(raw).unwrap();
        let record = to_record(pkgs.into_iter().next().unwrap());
        let module = record.module.unwrap();
        assert_eq!(module.path, "example.com/a");
        assert!(module.replace.is_none());
    }

    #[test]
    fn local_replace_is_captured() {
        let raw = r#"{"ImportPath":"a","Module":{"Path":"example.com/a","Version":"v1.0.0","Replace":{"Path":"./vendor/a"}}}"#;
        let pkgs = parse_stream(raw).unwrap();
        let record = to_record(pkgs.into_iter().next().unwrap());
        let replace = record.module.unwrap().replace.unwrap();
        assert_eq!(replace.path, "./vendor/a");
        assert_eq!(replace.version, "");
    }
}
