//! Nearest-ancestor `node_modules` resolution.
//!
//! Implements npm's "innermost wins, then walk outward, then root" lookup
//! rule as a pure function over install-path strings, independent of any
//! parsed lockfile.

/// Given the install path of a consumer package in a v2/v3 lockfile's flat
/// `packages` map (e.g. `node_modules/a/node_modules/b`, possibly empty,
/// possibly a workspace directory like `packages/foo`) and the bare name of
/// a dependency it declares, produce the ordered list of keys to probe. The
/// first key present in the map wins.
pub fn candidate_paths(consumer_path: &str, dep_name: &str) -> Vec<String> {
    if consumer_path.is_empty() {
        return vec![format!("node_modules/{dep_name}")];
    }

    let mut pkg = consumer_path.to_string();
    if !pkg.ends_with('/') {
        pkg.push('/');
    }

    let segments: Vec<&str> = pkg.split("node_modules/").collect();
    let mut paths = Vec::with_capacity(segments.len() + 1);
    for i in (1..=segments.len()).rev() {
        let prefix = segments[0..i].join("node_modules/");
        paths.push(format!("{prefix}node_modules/{dep_name}"));
    }

    if !pkg.starts_with("node_modules/") {
        paths.push(format!("node_modules/{dep_name}"));
    }

    paths
}
