//! Version specifiers accepted in a query.

use serde::{Deserialize, Serialize};

/// Length of a full git commit id, which selects the build-index path.
pub const COMMIT_ID_LEN: usize = 40;

/// Symbolic release channels understood by the resolver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    /// Newest release with no pre-release tag and an even minor number.
    Stable,
    /// Newest published entry, pre-releases included.
    Latest,
    /// Alias of [`Channel::Latest`].
    Unstable,
}

impl Channel {
    /// Convert to string representation
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Stable => "stable",
            Self::Latest => "latest",
            Self::Unstable => "unstable",
        }
    }
}

/// A full git commit id identifying one CI build.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CommitId(String);

impl CommitId {
    /// Return the commit id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CommitId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// What the caller asked for in the `version` field.
///
/// Classification never fails: anything that is not a channel name or a
/// 40-character commit id is kept as a semver range and validated later,
/// against the catalog.
///
/// # Example
///
/// ```
/// use mdu_schema::{Channel, VersionQuery};
///
/// assert_eq!(VersionQuery::from("stable"), VersionQuery::Channel(Channel::Stable));
/// assert!(VersionQuery::from("610765fdb94eebf612bd0172ec081ccc21110103").is_commit());
/// assert_eq!(VersionQuery::from("~3.1.8").as_str(), "~3.1.8");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum VersionQuery {
    /// `stable`, `latest` or `unstable`.
    Channel(Channel),
    /// A 40-character commit id.
    Commit(CommitId),
    /// An exact version or a range such as `~3.1.8` or `>=3.0 <3.2`.
    Range(String),
}

impl VersionQuery {
    /// The query exactly as the caller spelled it.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Channel(c) => c.as_str(),
            Self::Commit(c) => c.as_str(),
            Self::Range(r) => r,
        }
    }

    /// Whether this query takes the build-index path.
    pub fn is_commit(&self) -> bool {
        matches!(self, Self::Commit(_))
    }
}

impl Default for VersionQuery {
    fn default() -> Self {
        Self::Channel(Channel::Stable)
    }
}

impl From<&str> for VersionQuery {
    fn from(s: &str) -> Self {
        match s {
            "stable" => Self::Channel(Channel::Stable),
            "latest" => Self::Channel(Channel::Latest),
            "unstable" => Self::Channel(Channel::Unstable),
            _ if s.chars().count() == COMMIT_ID_LEN => Self::Commit(CommitId(s.to_string())),
            _ => Self::Range(s.to_string()),
        }
    }
}

impl From<String> for VersionQuery {
    fn from(s: String) -> Self {
        Self::from(s.as_str())
    }
}

impl From<VersionQuery> for String {
    fn from(v: VersionQuery) -> Self {
        v.as_str().to_string()
    }
}

impl std::fmt::Display for VersionQuery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
