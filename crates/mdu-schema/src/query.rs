//! The loose, caller-facing request.

use serde::{Deserialize, Deserializer, Serialize};

use crate::options::ResolvedOptions;

/// A partially specified download request.
///
/// Every field is optional and kept exactly as the caller wrote it; the
/// normalizer in `mdu-core` fills the gaps and folds aliases. A bare string
/// converts into a query carrying only a version.
///
/// # Example
///
/// ```
/// use mdu_schema::Query;
///
/// let q = Query::new("3.1.6").platform("win32").bits(64);
/// assert_eq!(q.version.as_deref(), Some("3.1.6"));
/// assert_eq!(q.bits.as_deref(), Some("64"));
///
/// let bare = Query::from("stable");
/// assert!(bare.platform.is_none());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Query {
    /// Exact version, semver range, channel name or commit id.
    pub version: Option<String>,
    /// `linux`, `osx`, `win32` or an alias such as `darwin` / `windows`.
    pub platform: Option<String>,
    /// CPU architecture, e.g. `x86_64` or `ppc64le`.
    pub arch: Option<String>,
    /// Bit width; anything that is not a digit is ignored (`"64bit"` is `64`).
    #[serde(deserialize_with = "number_or_string")]
    pub bits: Option<String>,
    /// Distribution suffix, e.g. `debian71` or `ubuntu1604`.
    pub distro: Option<String>,
    /// Source branch used for commit builds.
    pub branch: Option<String>,
    /// Request the debug-symbols build.
    pub debug: Option<bool>,
    /// Request the enterprise edition.
    pub enterprise: Option<bool>,
}

impl Query {
    /// Start a query for the given version specifier.
    pub fn new(version: impl Into<String>) -> Self {
        Self {
            version: Some(version.into()),
            ..Self::default()
        }
    }

    /// Set the platform.
    pub fn platform(mut self, platform: impl Into<String>) -> Self {
        self.platform = Some(platform.into());
        self
    }

    /// Set the architecture.
    pub fn arch(mut self, arch: impl Into<String>) -> Self {
        self.arch = Some(arch.into());
        self
    }

    /// Set the bit width (`64`, `"32"`, `"64bit"` ...).
    pub fn bits(mut self, bits: impl ToString) -> Self {
        self.bits = Some(bits.to_string());
        self
    }

    /// Set the distribution suffix.
    pub fn distro(mut self, distro: impl Into<String>) -> Self {
        self.distro = Some(distro.into());
        self
    }

    /// Set the branch used for commit builds.
    pub fn branch(mut self, branch: impl Into<String>) -> Self {
        self.branch = Some(branch.into());
        self
    }

    /// Set the debug flag.
    pub fn debug(mut self, debug: bool) -> Self {
        self.debug = Some(debug);
        self
    }

    /// Set the enterprise flag.
    pub fn enterprise(mut self, enterprise: bool) -> Self {
        self.enterprise = Some(enterprise);
        self
    }
}

impl From<&str> for Query {
    fn from(version: &str) -> Self {
        Self::new(version)
    }
}

impl From<String> for Query {
    fn from(version: String) -> Self {
        Self::new(version)
    }
}

/// A fully populated query that normalizes back to the same options.
impl From<&ResolvedOptions> for Query {
    fn from(opts: &ResolvedOptions) -> Self {
        Self {
            version: Some(opts.version.to_string()),
            platform: Some(opts.platform.to_string()),
            arch: Some(opts.arch.to_string()),
            bits: Some(opts.bits.to_string()),
            distro: Some(opts.distro.clone()),
            branch: Some(opts.branch.clone()),
            debug: Some(opts.debug),
            enterprise: Some(opts.enterprise),
        }
    }
}

fn number_or_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(u64),
        Text(String),
    }

    Ok(Option::<Raw>::deserialize(deserializer)?.map(|raw| match raw {
        Raw::Number(n) => n.to_string(),
        Raw::Text(s) => s,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_numeric_bits() {
        let q: Query =
            serde_json::from_str(r#"{"version":"3.1.6","platform":"win32","bits":64}"#).unwrap();
        assert_eq!(q.bits.as_deref(), Some("64"));
        assert_eq!(q.platform.as_deref(), Some("win32"));
        assert!(q.distro.is_none());
    }

    #[test]
    fn test_deserialize_missing_fields() {
        let q: Query = serde_json::from_str(r#"{"version":"latest","bits":"32bit"}"#).unwrap();
        assert_eq!(q.bits.as_deref(), Some("32bit"));
        assert_eq!(q.debug, None);
    }

    #[test]
    fn test_bare_string() {
        assert_eq!(Query::from("stable"), Query::new("stable"));
    }
}
