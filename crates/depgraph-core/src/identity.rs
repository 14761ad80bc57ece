//! Canonical package identity.

/// Sentinel prefix npm uses in a lockfile `version` field to mark a dependency
/// that resolves to a local, on-disk path rather than a registry tarball.
const NPM_LOCAL_PREFIX: &str = "file://";

/// Build the canonical `name@version` identity string used to key resolved
/// packages within a single report.
///
/// A `version` beginning with the local-path sentinel collapses to an empty
/// suffix, so `canonical("left-pad", "file://../left-pad")` is `"left-pad@"`.
/// Callers in the MOD extractor achieve the same collapse by passing an
/// already-empty version for self-replaced local modules, since a `go.mod`
/// replace directive targeting a filesystem path carries no version.
pub fn canonical(name: &str, version: &str) -> String {
    if version.starts_with(NPM_LOCAL_PREFIX) {
        format!("{name}@")
    } else {
        format!("{name}@{version}")
    }
}
