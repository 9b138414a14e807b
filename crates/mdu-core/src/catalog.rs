//! Published version catalog.

use std::fmt::Debug;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::error::ResolveError;

/// Source of the ordered list of published versions, newest first.
///
/// Fetched fresh for every resolution; nothing is cached.
#[async_trait]
pub trait VersionCatalog: Send + Sync + Debug {
    /// List every published version string in publication order.
    async fn list_versions(&self) -> Result<Vec<String>, ResolveError>;
}

/// Catalog read from the release feed (`full.json`).
#[derive(Debug, Clone)]
pub struct HttpCatalog {
    client: Client,
    url: String,
}

#[derive(Debug, Deserialize)]
struct Feed {
    versions: Vec<FeedEntry>,
}

#[derive(Debug, Deserialize)]
struct FeedEntry {
    version: String,
}

impl HttpCatalog {
    /// Catalog served at `url`.
    pub fn new(client: Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }
}

#[async_trait]
impl VersionCatalog for HttpCatalog {
    async fn list_versions(&self) -> Result<Vec<String>, ResolveError> {
        tracing::debug!("Fetching version catalog from {}", self.url);
        let resp = self
            .client
            .get(&self.url)
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(ResolveError::catalog)?;
        let feed: Feed = resp.json().await.map_err(ResolveError::catalog)?;

        let versions: Vec<String> = feed.versions.into_iter().map(|e| e.version).collect();
        tracing::debug!("Catalog lists {} versions", versions.len());
        Ok(versions)
    }
}

/// A fixed list, for offline use and tests.
#[derive(Debug, Clone, Default)]
pub struct StaticCatalog {
    versions: Vec<String>,
}

impl StaticCatalog {
    /// Catalog returning `versions` in the given order.
    pub fn new<I, S>(versions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            versions: versions.into_iter().map(Into::into).collect(),
        }
    }
}

#[async_trait]
impl VersionCatalog for StaticCatalog {
    async fn list_versions(&self) -> Result<Vec<String>, ResolveError> {
        Ok(self.versions.clone())
    }
}
