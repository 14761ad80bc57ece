//! `depgraph`: walks a repository for `go.mod`/`package.json` manifests and
//! emits a single JSON document describing the resolved dependency graph of
//! each one.

use std::fs::File;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use depgraph_gomod::GoListLoader;
use depgraph_orchestrator::DiscoveredManifest;

mod cli;
mod discover;

use cli::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    if cli.version {
        println!(env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    let (repo_name, commit_sha) = match (&cli.repo_name, &cli.commit_sha) {
        (Some(repo_name), Some(commit_sha)) => (repo_name.clone(), commit_sha.clone()),
        _ => anyhow::bail!("usage: depgraph <flags...> <repo_name> <commit_sha>"),
    };

    let root = PathBuf::from(&cli.dir);
    let manifests: Vec<DiscoveredManifest> = discover::find_manifests(&root);

    tracing::info!(count = manifests.len(), dir = %cli.dir, "discovered manifests");

    let loader: Arc<dyn depgraph_gomod::PackageLoader> = Arc::new(GoListLoader::new());
    let document = depgraph_orchestrator::run(loader, manifests, repo_name, commit_sha).await;

    let failed: Vec<&depgraph_core::PackageFile> = document.failed_files().collect();
    if !failed.is_empty() {
        tracing::warn!(count = failed.len(), "found manifest(s) with errors:");
        for file in &failed {
            tracing::warn!(path = %file.path, error = file.error.as_deref().unwrap_or(""), "");
        }
    }

    let json = if cli.pretty {
        serde_json::to_string_pretty(&document)
    } else {
        serde_json::to_string(&document)
    }
    .context("encoding result document")?;

    let mut out = File::create(&cli.output)
        .with_context(|| format!("opening {:?}", cli.output))?;
    out.write_all(json.as_bytes())
        .with_context(|| format!("writing {:?}", cli.output))?;
    out.write_all(b"\n")?;

    Ok(())
}
