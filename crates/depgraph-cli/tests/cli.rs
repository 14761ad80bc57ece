use std::fs;
use std::path::Path;

use predicates::prelude::*;
use serde_json::Value;
use tempfile::TempDir;

fn depgraph_bin() -> std::path::PathBuf {
    std::path::PathBuf::from(assert_cmd::cargo::cargo_bin!("depgraph"))
}

fn write_npm_fixture(dir: &Path) {
    fs::write(
        dir.join("package.json"),
        r#"{"name":"fixture","dependencies":{"left-pad":"^1.3.0","right-pad":"^1.0.0"}}"#,
    )
    .unwrap();
    fs::write(
        dir.join("package-lock.json"),
        r#"{
            "lockfileVersion": 2,
            "packages": {
                "": {"dependencies": {"left-pad": "^1.3.0", "right-pad": "^1.0.0"}},
                "node_modules/left-pad": {"name": "left-pad", "version": "1.3.0"},
                "node_modules/right-pad": {"name": "right-pad", "version": "1.0.0"}
            }
        }"#,
    )
    .unwrap();
}

#[test]
fn missing_positional_arguments_is_a_fatal_usage_error() {
    assert_cmd::Command::new(depgraph_bin())
        .arg("--dir")
        .arg(".")
        .assert()
        .failure()
        .stderr(predicate::str::contains("usage: depgraph"));
}

#[test]
fn version_flag_prints_the_crate_version_and_exits() {
    assert_cmd::Command::new(depgraph_bin())
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn scans_an_npm_fixture_and_writes_a_document_with_one_file() {
    let dir = TempDir::new().unwrap();
    write_npm_fixture(dir.path());

    let output_path = dir.path().join("out.json");

    assert_cmd::Command::new(depgraph_bin())
        .arg("--dir")
        .arg(dir.path())
        .arg("--output")
        .arg(&output_path)
        .arg("example/repo")
        .arg("abc123")
        .assert()
        .success();

    let document: Value =
        serde_json::from_str(&fs::read_to_string(&output_path).unwrap()).unwrap();

    assert_eq!(document["repository"], "example/repo");
    assert_eq!(document["commit"], "abc123");
    let files = document["files"].as_array().unwrap();
    assert_eq!(files.len(), 1);
    assert_eq!(files[0]["type"], "npm");
}

/// Drop a fake `go` executable into `dir` that answers every `go list -json`
/// invocation with a single-package, single-main-module graph, regardless of
/// arguments. Returns the directory holding it, meant to be prepended to
/// `PATH` so [`depgraph_gomod::GoListLoader`]'s `Command::new("go")` finds it
/// ahead of (or instead of) any real toolchain on the host.
#[cfg(unix)]
fn write_fake_go_binary(dir: &Path) -> std::path::PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let bin_dir = dir.join("fakebin");
    fs::create_dir_all(&bin_dir).unwrap();
    let go_path = bin_dir.join("go");
    fs::write(
        &go_path,
        "#!/bin/sh\n\
         echo '{\"ImportPath\":\"example.com/repo\",\"Module\":{\"Path\":\"example.com/repo\",\"Version\":\"\",\"Main\":true,\"GoVersion\":\"1.21\"},\"Imports\":[]}'\n",
    )
    .unwrap();
    let mut perms = fs::metadata(&go_path).unwrap().permissions();
    perms.set_mode(0o755);
    fs::set_permissions(&go_path, perms).unwrap();
    bin_dir
}

#[cfg(unix)]
#[test]
fn scans_a_repo_with_both_ecosystems_and_tags_each_file() {
    let dir = TempDir::new().unwrap();
    write_npm_fixture(dir.path());
    fs::write(dir.path().join("go.mod"), "module example.com/repo\n\ngo 1.21\n").unwrap();

    let bin_dir = write_fake_go_binary(dir.path());
    let path_var = format!(
        "{}:{}",
        bin_dir.display(),
        std::env::var("PATH").unwrap_or_default()
    );

    let output_path = dir.path().join("out.json");

    assert_cmd::Command::new(depgraph_bin())
        .env("PATH", path_var)
        .arg("--dir")
        .arg(dir.path())
        .arg("--output")
        .arg(&output_path)
        .arg("example/repo")
        .arg("abc123")
        .assert()
        .success();

    let document: Value =
        serde_json::from_str(&fs::read_to_string(&output_path).unwrap()).unwrap();

    let files = document["files"].as_array().unwrap();
    assert_eq!(files.len(), 2);

    let kinds: std::collections::BTreeSet<&str> =
        files.iter().map(|f| f["type"].as_str().unwrap()).collect();
    assert!(kinds.contains("gomod"));
    assert!(kinds.contains("npm"));

    let gomod_file = files.iter().find(|f| f["type"] == "gomod").unwrap();
    assert_eq!(gomod_file["name"], "example.com/repo");
    assert_eq!(gomod_file["go_version"], "1.21");
}
