//! Resolve a version query to one published version.
//!
//! Supports:
//! - `latest` / `unstable`: first catalog entry, pre-releases included
//! - `stable`: first entry with no pre-release tag and an even minor number
//! - `3.1.6`: exact match
//! - `~3.1.8`, `^3.0`, `>=3.0.0 <3.2.0`, `3.1.x`, `3.1`, `3.0 - 3.2`, `a || b`
//!
//! The catalog is scanned in the order it was published (newest first) and
//! the first satisfying entry wins, even if a later entry is numerically
//! greater.

use mdu_schema::{Channel, VersionQuery};
use semver::{Version, VersionReq};

use crate::catalog::VersionCatalog;
use crate::error::ResolveError;

const OPERATORS: &[char] = &['=', '>', '<', '~', '^'];

/// Why a range failed to parse.
#[derive(Debug, thiserror::Error)]
pub enum RangeError {
    /// An operator with no version after it, such as `>=` or `~`.
    #[error("operator `{0}` has no version")]
    DanglingOperator(String),

    /// The translated range is not valid semver.
    #[error(transparent)]
    Syntax(#[from] semver::Error),
}

/// A node-style semver range: one or more alternatives joined by `||`.
#[derive(Debug, Clone)]
pub struct VersionRange {
    alternatives: Vec<VersionReq>,
}

impl VersionRange {
    /// Parse a range.
    ///
    /// # Errors
    ///
    /// Returns the error for the first alternative that does not parse.
    pub fn parse(raw: &str) -> Result<Self, RangeError> {
        let alternatives = raw
            .split("||")
            .map(|alt| -> Result<VersionReq, RangeError> {
                Ok(VersionReq::parse(&translate(alt)?)?)
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { alternatives })
    }

    /// Whether `version` satisfies any alternative.
    pub fn matches(&self, version: &Version) -> bool {
        self.alternatives.iter().any(|req| req.matches(version))
    }
}

/// Rewrite one node-style alternative into `semver` crate syntax.
fn translate(alt: &str) -> Result<String, RangeError> {
    let alt = alt.trim();

    // Hyphen range: `a - b` is `>=a, <=b`.
    if let Some((lo, hi)) = alt.split_once(" - ") {
        return Ok(format!(">={}, <={}", bare(lo.trim()), bare(hi.trim())));
    }

    // Comparators may be separated by spaces or commas, and an operator may be
    // separated from its version (`>= 3.0`).
    let mut comparators: Vec<String> = Vec::new();
    let mut pending_op = String::new();
    for token in alt.split(|c: char| c.is_whitespace() || c == ',') {
        if token.is_empty() {
            continue;
        }
        if token.chars().all(|c| OPERATORS.contains(&c)) {
            pending_op.push_str(token);
            continue;
        }
        let token = format!("{}{token}", std::mem::take(&mut pending_op));
        comparators.push(comparator(&token));
    }

    if !pending_op.is_empty() {
        return Err(RangeError::DanglingOperator(pending_op));
    }

    comparators.retain(|c| c != "*");
    if comparators.is_empty() {
        Ok("*".to_string())
    } else {
        Ok(comparators.join(", "))
    }
}

/// A single comparator; bare versions mean exact (or prefix) matches.
fn comparator(token: &str) -> String {
    let split = token
        .find(|c: char| !OPERATORS.contains(&c))
        .unwrap_or(token.len());
    let (op, version) = token.split_at(split);
    let version = bare(version);
    if version == "*" {
        return "*".to_string();
    }
    if op.is_empty() {
        format!("={version}")
    } else {
        format!("{op}{version}")
    }
}

/// Strip a leading `v` and cut the version at its first wildcard component.
fn bare(version: &str) -> String {
    let version = version.strip_prefix(['v', 'V']).unwrap_or(version);
    let parts: Vec<&str> = version
        .split('.')
        .take_while(|p| !matches!(*p, "x" | "X" | "*"))
        .collect();
    if parts.is_empty() {
        "*".to_string()
    } else {
        parts.join(".")
    }
}

/// Newest entry, whatever it is.
pub fn select_latest(catalog: &[String]) -> Option<&str> {
    catalog.first().map(String::as_str)
}

/// First entry without a pre-release tag and with an even minor number.
pub fn select_stable(catalog: &[String]) -> Option<&str> {
    catalog
        .iter()
        .find(|v| {
            Version::parse(v).is_ok_and(|parsed| parsed.pre.is_empty() && parsed.minor % 2 == 0)
        })
        .map(String::as_str)
}

/// First entry satisfying `range`; entries that are not semver are skipped.
pub fn select_matching<'a>(catalog: &'a [String], range: &VersionRange) -> Option<&'a str> {
    catalog
        .iter()
        .find(|v| match Version::parse(v) {
            Ok(parsed) => range.matches(&parsed),
            Err(_) => {
                tracing::trace!("Skipping non-semver catalog entry `{v}`");
                false
            }
        })
        .map(String::as_str)
}

/// Resolve `query` against the catalog.
///
/// # Errors
///
/// Returns [`ResolveError::CatalogUnavailable`] when the catalog cannot be
/// fetched, [`ResolveError::InvalidVersionQuery`] for an unparseable range or a
/// commit id, and [`ResolveError::VersionNotFound`] when nothing qualifies.
pub async fn resolve_version(
    query: &VersionQuery,
    catalog: &dyn VersionCatalog,
) -> Result<String, ResolveError> {
    let range = match query {
        VersionQuery::Commit(_) => {
            return Err(ResolveError::InvalidVersionQuery {
                query: query.to_string(),
                reason: "commit ids resolve through the build index".to_string(),
            });
        }
        VersionQuery::Range(raw) => Some(VersionRange::parse(raw).map_err(|e| {
            ResolveError::InvalidVersionQuery {
                query: raw.clone(),
                reason: e.to_string(),
            }
        })?),
        VersionQuery::Channel(_) => None,
    };

    tracing::debug!("Searching catalog for version `{query}`");
    let versions = catalog.list_versions().await?;

    let found = match (query, &range) {
        (VersionQuery::Channel(Channel::Latest | Channel::Unstable), _) => {
            select_latest(&versions)
        }
        (VersionQuery::Channel(Channel::Stable), _) => select_stable(&versions),
        (_, Some(range)) => select_matching(&versions, range),
        _ => None,
    };

    match found {
        Some(v) => {
            tracing::debug!("Version `{query}` resolved to {v}");
            Ok(v.to_string())
        }
        None => Err(ResolveError::VersionNotFound {
            query: query.to_string(),
        }),
    }
}
