//! Entry point tying normalization, version resolution and naming together.

use std::collections::BTreeMap;
use std::sync::Arc;

use mdu_schema::{Query, Resolution, ResolvedOptions, VersionQuery};

use crate::build_index::{self, BuildIndex, EvergreenClient};
use crate::catalog::{HttpCatalog, VersionCatalog};
use crate::config::Config;
use crate::error::{ConfigError, ResolveError};
use crate::naming::{self, DownloadHosts};
use crate::normalize::{self, NormalizeContext};
use crate::probe::HostEnvironment;
use crate::version;

/// Resolves queries into download locations.
///
/// Cheap to clone: collaborators are shared behind `Arc`, and a resolution
/// keeps no state beyond its own call.
#[derive(Debug, Clone)]
pub struct Resolver {
    catalog: Arc<dyn VersionCatalog>,
    build_index: Arc<dyn BuildIndex>,
    context: NormalizeContext,
    hosts: DownloadHosts,
    bucket_url: String,
}

impl Resolver {
    /// Resolver with explicit collaborators and the default hosts and bucket.
    pub fn new(
        catalog: Arc<dyn VersionCatalog>,
        build_index: Arc<dyn BuildIndex>,
        context: NormalizeContext,
    ) -> Self {
        Self {
            catalog,
            build_index,
            context,
            hosts: DownloadHosts::default(),
            bucket_url: Config::default().build_bucket_url,
        }
    }

    /// Resolver talking to the endpoints in `config`, with defaults taken
    /// from `host`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn from_config(config: &Config, host: HostEnvironment) -> Result<Self, ConfigError> {
        let client = config.http_client()?;
        let catalog = Arc::new(HttpCatalog::new(client.clone(), &config.catalog_url));
        let build_index = Arc::new(EvergreenClient::new(client, &config.build_index_url));
        let context =
            NormalizeContext::new(host).with_default_version(config.default_version.clone());

        Ok(Self::new(catalog, build_index, context)
            .with_hosts(config.hosts())
            .with_bucket_url(&config.build_bucket_url))
    }

    /// Replace the download hosts.
    pub fn with_hosts(mut self, hosts: DownloadHosts) -> Self {
        self.hosts = hosts;
        self
    }

    /// Replace the CI bucket URL.
    pub fn with_bucket_url(mut self, url: impl Into<String>) -> Self {
        self.bucket_url = url.into();
        self
    }

    /// Normalized options for `query`, without resolving anything.
    pub fn normalize(&self, query: &Query) -> ResolvedOptions {
        normalize::normalize(query, &self.context)
    }

    /// Resolve one query.
    ///
    /// # Errors
    ///
    /// Returns the first failure of the catalog, the build index, or version
    /// and build selection.
    pub async fn resolve(&self, query: &Query) -> Result<Resolution, ResolveError> {
        let opts = self.normalize(query);
        tracing::debug!("Building URL for `{}`", opts.version);

        if let VersionQuery::Commit(commit) = &opts.version {
            return build_index::resolve_commit(
                &opts,
                commit,
                self.build_index.as_ref(),
                &self.bucket_url,
            )
            .await;
        }

        let concrete = version::resolve_version(&opts.version, self.catalog.as_ref()).await?;
        let resolution = naming::build_artifact(&opts, &concrete, &self.hosts);
        tracing::debug!("Fully resolved: {resolution:?}");
        Ok(resolution)
    }

    /// Resolve several queries concurrently, keyed by their version query.
    ///
    /// All or nothing: the first failure cancels the remaining tasks and is
    /// returned. A query without a version is keyed by the default version.
    ///
    /// # Errors
    ///
    /// Returns the first error any query produced.
    pub async fn resolve_all(
        &self,
        queries: Vec<Query>,
    ) -> Result<BTreeMap<String, Resolution>, ResolveError> {
        let mut set: tokio::task::JoinSet<Result<(String, Resolution), ResolveError>> =
            tokio::task::JoinSet::new();

        for query in queries {
            let resolver = self.clone();
            let key = query
                .version
                .clone()
                .unwrap_or_else(|| self.context.default_version.clone());
            set.spawn(async move {
                let resolution = resolver.resolve(&query).await?;
                Ok((key, resolution))
            });
        }

        let mut results = BTreeMap::new();
        while let Some(joined) = set.join_next().await {
            let outcome = match joined {
                Ok(outcome) => outcome,
                Err(e) => Err(ResolveError::Task(e.to_string())),
            };
            match outcome {
                Ok((key, resolution)) => {
                    results.insert(key, resolution);
                }
                Err(e) => {
                    tracing::debug!("Batch aborted: {e}");
                    set.abort_all();
                    return Err(e);
                }
            }
        }
        Ok(results)
    }
}
