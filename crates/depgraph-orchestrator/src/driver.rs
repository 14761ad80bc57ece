//! Per-manifest driver: runs one extractor under a hard deadline, packaging
//! either outcome into a uniform report.
//!
//! Internally this uses one task for the extraction itself and the calling
//! task's own timer as the deadline clock; the two sides of that rendezvous
//! are a single-item [`tokio::sync::oneshot`] channel, same as the original
//! driver's ticker-plus-proxy-channel `select`.

use std::time::{Duration, Instant};

use depgraph_core::{Ecosystem, PackageFile};

/// The per-manifest extraction budget. An extraction still running past this
/// point produces a failed report; the in-flight task is abandoned (best
/// effort abort via [`tokio::task::JoinHandle::abort`]) but is not required
/// to stop promptly.
pub const DEADLINE: Duration = Duration::from_secs(15);

/// Run `extract` to completion or until [`DEADLINE`] elapses, whichever
/// comes first. `extract` returns `None` when the manifest warrants no
/// report at all (e.g. an NPM manifest with fewer than two direct
/// dependencies) — that `None` passes straight through on the happy path.
pub async fn drive<F>(manifest_path: String, kind: Ecosystem, extract: F) -> Option<PackageFile>
where
    F: FnOnce() -> Option<PackageFile> + Send + 'static,
{
    let start = Instant::now();
    let handle = tokio::task::spawn_blocking(extract);
    tokio::pin!(handle);

    let mut ticker = tokio::time::interval(Duration::from_secs(1));
    ticker.tick().await; // the first tick fires immediately; discard it

    loop {
        tokio::select! {
            res = &mut handle => {
                return match res {
                    Ok(outcome) => outcome,
                    Err(_) => Some(PackageFile::failure(
                        manifest_path,
                        kind,
                        "extraction task panicked",
                    )),
                };
            }
            _ = ticker.tick() => {
                let elapsed = start.elapsed();
                tracing::info!(path = %manifest_path, elapsed_secs = elapsed.as_secs_f64(), "processing");
                if elapsed >= DEADLINE {
                    return Some(PackageFile::failure(
                        manifest_path.clone(),
                        kind,
                        format!("processing file {manifest_path} timed out at 15 seconds"),
                    ));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[tokio::test(start_paused = true)]
    async fn fast_extraction_returns_before_the_deadline() {
        let report = drive("go.mod".to_string(), Ecosystem::Mod, || {
            Some(PackageFile::success(
                "go.mod",
                Ecosystem::Mod,
                Some("example.com/repo".to_string()),
                Some("1.21".to_string()),
                Default::default(),
            ))
        })
        .await
        .unwrap();

        assert!(!report.is_failure());
    }

    #[tokio::test(start_paused = true)]
    async fn none_outcome_passes_through() {
        let report = drive("package.json".to_string(), Ecosystem::Npm, || None).await;
        assert!(report.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn blocked_extraction_times_out_at_fifteen_seconds() {
        let handle = tokio::spawn(drive("go.mod".to_string(), Ecosystem::Mod, || {
            thread::sleep(Duration::from_secs(20));
            Some(PackageFile::success(
                "go.mod",
                Ecosystem::Mod,
                None,
                None,
                Default::default(),
            ))
        }));

        tokio::time::advance(Duration::from_secs(16)).await;
        let report = handle.await.unwrap().unwrap();

        assert!(report.is_failure());
        assert!(report
            .error
            .as_deref()
            .unwrap()
            .contains("timed out at 15 seconds"));
    }
}
