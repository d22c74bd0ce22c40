//! imgid command-line entry point.
//!
//! Prints the cache identity of an image source on stdout.
//! Logging goes to stderr so the identity can be captured by scripts.

use std::io::Read;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::Parser;
use imgid_core::{AppConfig, DigestAlgorithm, IdentityDeriver, SourceLocation, Strategy};
use tracing_subscriber::EnvFilter;

/// Derive the cache identity of an image asset.
#[derive(Debug, Parser)]
#[command(name = "imgid", version)]
struct Args {
    /// Image path or URL.
    source: String,

    /// `exact` hashes content, `proxy` hashes the file size.
    #[arg(long)]
    strategy: Option<Strategy>,

    /// Transform configuration as a JSON object.
    #[arg(long, default_value = "{}")]
    config: String,

    /// Directory local sources are made relative to.
    #[arg(long)]
    root: Option<PathBuf>,

    /// Digest algorithm (`sha256` or `sha1`).
    #[arg(long)]
    algorithm: Option<DigestAlgorithm>,

    /// Read content bytes from stdin instead of the source file (exact only).
    #[arg(long)]
    stdin: bool,

    /// Also print the canonical location on stderr.
    #[arg(long)]
    show_location: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .json()
        .init();

    let args = Args::parse();

    let mut config = AppConfig::load().context("loading configuration")?;
    if let Some(strategy) = args.strategy {
        config.strategy = strategy;
    }
    if let Some(algorithm) = args.algorithm {
        config.algorithm = algorithm;
    }
    if let Some(root) = args.root {
        let root = if root.is_absolute() { root } else { std::env::current_dir()?.join(root) };
        config.reference_root = Some(root);
    }
    config.validate()?;

    let deriver = IdentityDeriver::from_config(&config)?;
    let location = SourceLocation::parse(&args.source)?;
    let transform: serde_json::Value =
        serde_json::from_str(&args.config).with_context(|| format!("parsing --config {}", args.config))?;

    tracing::info!(source = %location, strategy = %config.strategy, root = %deriver.root().display(), "deriving identity");

    if args.show_location {
        eprintln!("{}", deriver.canonical_location(&location)?);
    }

    let identity = if args.stdin {
        if config.strategy != Strategy::Exact {
            bail!("--stdin supplies content and requires the exact strategy");
        }
        let mut content = Vec::new();
        std::io::stdin().read_to_end(&mut content).context("reading content from stdin")?;
        deriver.exact_identity(&location, &transform, &content)?
    } else {
        deriver.identity_for_source(&location, &transform, config.strategy).await?
    };

    println!("{identity}");

    Ok(())
}
