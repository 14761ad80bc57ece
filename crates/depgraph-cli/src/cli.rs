use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "depgraph", about = "Dependency-graph extraction for Go modules and npm packages", long_about = None)]
pub struct Cli {
    /// Directory to scan for go.mod/package.json manifests
    #[arg(long, default_value = ".")]
    pub dir: String,

    /// Output file location
    #[arg(long, default_value = "/dev/stdout")]
    pub output: String,

    /// Prettify JSON output
    #[arg(long, default_value_t = true)]
    pub pretty: bool,

    /// Print version and exit
    #[arg(long)]
    pub version: bool,

    /// Name of the repository being scanned
    pub repo_name: Option<String>,

    /// Commit SHA the scan corresponds to
    pub commit_sha: Option<String>,
}
