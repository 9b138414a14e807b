//! mongodb-download-url - print where a MongoDB build can be downloaded
#![allow(missing_docs)]
#![allow(clippy::missing_errors_doc)]
//!
//! ```text
//! mongodb-download-url                          # stable, for this machine
//! mongodb-download-url 3.0.x --platform win32   # newest 3.0 release for Windows
//! mongodb-download-url stable latest --json     # batch, full JSON
//! ```

pub mod output;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use mdu_core::{Config, HostEnvironment, Resolver};
use mdu_schema::Query;

#[derive(Debug, Parser)]
#[command(name = "mongodb-download-url")]
#[command(author, version, about = "Resolve the download URL of a MongoDB build")]
pub struct Cli {
    /// Version(s): `3.1.6`, `~3.1.8`, `stable`, `latest`, `unstable` or a commit id
    pub versions: Vec<String>,

    /// Target platform (linux, osx, win32; darwin and windows are accepted)
    #[arg(long)]
    pub platform: Option<String>,

    /// CPU architecture (`x86_64`, `i686`, `ppc64le`, `s390x`, `arm64` ...)
    #[arg(long)]
    pub arch: Option<String>,

    /// Bit width (32 or 64)
    #[arg(long)]
    pub bits: Option<String>,

    /// Distribution suffix (e.g. debian71, ubuntu1604)
    #[arg(long)]
    pub distro: Option<String>,

    /// Branch for commit builds
    #[arg(long)]
    pub branch: Option<String>,

    /// Debug-symbols build
    #[arg(long)]
    pub debug: bool,

    /// Enterprise edition
    #[arg(long)]
    pub enterprise: bool,

    /// Print the full resolution as JSON
    #[arg(long)]
    pub json: bool,

    /// Print normalized options without resolving
    #[arg(long)]
    pub options: bool,

    /// Config file (TOML)
    #[arg(long, env = "MDU_CONFIG")]
    pub config: Option<PathBuf>,

    /// Log resolution steps to stderr
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// One query per requested version; none means the configured default.
    pub fn queries(&self) -> Vec<Query> {
        if self.versions.is_empty() {
            return vec![self.query(None)];
        }
        self.versions
            .iter()
            .map(|v| self.query(Some(v.clone())))
            .collect()
    }

    fn query(&self, version: Option<String>) -> Query {
        Query {
            version,
            platform: self.platform.clone(),
            arch: self.arch.clone(),
            bits: self.bits.clone(),
            distro: self.distro.clone(),
            branch: self.branch.clone(),
            debug: self.debug.then_some(true),
            enterprise: self.enterprise.then_some(true),
        }
    }
}

/// Run the command line.
pub async fn run(cli: &Cli) -> Result<()> {
    let config = Config::load(cli.config.as_deref()).context("Failed to load config")?;
    tracing::debug!(
        "Config loaded: default_version={} catalog={}",
        config.default_version,
        config.catalog_url
    );
    let resolver = Resolver::from_config(&config, HostEnvironment::detect())
        .context("Failed to set up HTTP client")?;
    let mut queries = cli.queries();
    tracing::debug!("Resolving {} quer(ies)", queries.len());

    if cli.options {
        let opts: Vec<_> = queries.iter().map(|q| resolver.normalize(q)).collect();
        println!("{}", serde_json::to_string_pretty(&opts)?);
        return Ok(());
    }

    if queries.len() == 1 {
        let query = queries.remove(0);
        let resolution = resolver.resolve(&query).await?;
        println!("{}", output::single(&resolution, cli.json)?);
    } else {
        let results = resolver.resolve_all(queries).await?;
        println!("{}", output::batch(&results, cli.json)?);
    }
    Ok(())
}
