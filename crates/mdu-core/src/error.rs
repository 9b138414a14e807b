//! Error types for the resolution engine.

use thiserror::Error;

/// Boxed collaborator failure (transport, decoding).
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Everything that can stop a single resolution.
///
/// Collaborator failures are passed through as-is; the engine never retries.
#[derive(Error, Debug)]
pub enum ResolveError {
    /// The release catalog could not be fetched or decoded.
    #[error("Version catalog unavailable: {0}")]
    CatalogUnavailable(#[source] BoxError),

    /// No catalog entry satisfies the query.
    #[error("Could not find a MongoDB version matching `{query}`")]
    VersionNotFound {
        /// The query as given.
        query: String,
    },

    /// The query is not a channel, range or exact version.
    #[error("Invalid version query `{query}`: {reason}")]
    InvalidVersionQuery {
        /// The query as given.
        query: String,
        /// Why it was rejected.
        reason: String,
    },

    /// The CI build index could not be reached or decoded.
    #[error("Build index unavailable: {0}")]
    BuildIndexUnavailable(#[source] BoxError),

    /// The build index has no record of the commit.
    #[error("Revision not found: {message}")]
    RevisionNotFound {
        /// Message returned by the build index.
        message: String,
    },

    /// The revision has no build for the requested target.
    #[error("No build matching `{prefix}` in revision")]
    ArtifactNotFound {
        /// Build id prefix that was searched for.
        prefix: String,
    },

    /// More than one build matches and none is an exact fit.
    #[error("Several builds match `{prefix}`: {}", .candidates.join(", "))]
    AmbiguousArtifact {
        /// Build id prefix that was searched for.
        prefix: String,
        /// Every build id containing the prefix.
        candidates: Vec<String>,
    },

    /// A batch task panicked or was cancelled.
    #[error("Resolution task failed: {0}")]
    Task(String),
}

impl ResolveError {
    /// Wrap a transport error from the version catalog.
    pub fn catalog(err: impl Into<BoxError>) -> Self {
        Self::CatalogUnavailable(err.into())
    }

    /// Wrap a transport error from the build index.
    pub fn build_index(err: impl Into<BoxError>) -> Self {
        Self::BuildIndexUnavailable(err.into())
    }
}

/// Failures while loading configuration or building the HTTP client.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("IO error reading {path}: {source}")]
    Io {
        /// Path of the config file.
        path: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The config file is not valid TOML for [`Config`](crate::Config).
    #[error("Invalid config file {path}: {source}")]
    Parse {
        /// Path of the config file.
        path: String,
        /// Underlying TOML error.
        #[source]
        source: toml::de::Error,
    },

    /// The shared HTTP client could not be built.
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),
}
