use anyhow::{Context as AnyhowContext, Result};
use clap::Parser;
use context_repo_prep::{PrepConfig, RepoManifest, RepoPreparer};
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Parser)]
#[command(name = "context-prep")]
#[command(about = "Triage a repository into a token-budgeted manifest", long_about = None)]
#[command(version)]
struct Cli {
    /// Repository root
    #[arg(default_value = ".")]
    path: PathBuf,

    /// TOML config file (skip_dirs, max_tokens, max_file_size, respect_gitignore)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Token budget for the whole manifest
    #[arg(long)]
    max_tokens: Option<usize>,

    /// Skip files larger than this many bytes
    #[arg(long)]
    max_file_size: Option<u64>,

    /// Extra directory name to skip (repeatable)
    #[arg(long = "skip-dir", value_name = "NAME")]
    skip_dirs: Vec<String>,

    /// Honour .gitignore rules
    #[arg(long)]
    respect_gitignore: bool,

    /// Abort if preparation takes longer than this
    #[arg(long)]
    timeout_secs: Option<u64>,

    /// Print a one-line summary instead of the JSON manifest
    #[arg(long)]
    summary: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Quiet mode: log only warnings/errors (stdout is reserved for output)
    #[arg(long)]
    quiet: bool,
}

impl Cli {
    fn resolve_config(&self) -> Result<PrepConfig> {
        let mut config = match &self.config {
            Some(path) => PrepConfig::load(path)
                .with_context(|| format!("Failed to load config {}", path.display()))?,
            None => PrepConfig::default(),
        };
        if let Some(max_tokens) = self.max_tokens {
            config.max_tokens = max_tokens;
        }
        if let Some(max_file_size) = self.max_file_size {
            config.max_file_size = max_file_size;
        }
        config.skip_dirs.extend(self.skip_dirs.iter().cloned());
        if self.respect_gitignore {
            config.respect_gitignore = true;
        }
        Ok(config)
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if cli.quiet {
        builder.filter_level(log::LevelFilter::Warn);
    } else if cli.verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.target(env_logger::Target::Stderr).init();

    let config = cli.resolve_config()?;
    let preparer = RepoPreparer::new(config).context("Invalid configuration")?;

    let rt = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("Failed to start runtime")?;
    let result = rt.block_on(run_prepare(preparer, &cli.path, cli.timeout_secs));
    // A timed-out walk is still running on a blocking thread; do not wait for it.
    rt.shutdown_background();
    let manifest = result?;

    if cli.summary {
        println!(
            "{}: {} ~{} tokens [{}]",
            manifest.repo_name,
            manifest.summary(),
            manifest.estimated_tokens,
            manifest.fingerprint()
        );
    } else {
        println!("{}", serde_json::to_string_pretty(&manifest)?);
    }
    Ok(())
}

/// Run the blocking preparation off the async runtime, optionally bounded
async fn run_prepare(
    preparer: RepoPreparer,
    path: &Path,
    timeout_secs: Option<u64>,
) -> Result<RepoManifest> {
    let root = path.to_path_buf();
    let task = tokio::task::spawn_blocking(move || preparer.prepare(root));

    let joined = match timeout_secs {
        Some(secs) => tokio::time::timeout(Duration::from_secs(secs), task)
            .await
            .with_context(|| format!("Preparation timed out after {secs}s"))?,
        None => task.await,
    };

    joined
        .context("Preparation task failed")?
        .with_context(|| format!("Failed to prepare {}", path.display()))
}
