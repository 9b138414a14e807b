//! Fully determined options and the resolution result.

use serde::{Deserialize, Serialize};

use crate::{Arch, Platform, VersionQuery};

/// Bit width of the requested build.
///
/// Parsing keeps only the digits of the input, so `"64bit"`, `"64"` and
/// `64` are the same value. Input without any digits falls back to 64; a
/// width too large for `u16` saturates at `u16::MAX`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct Bits(u16);

impl Bits {
    /// 32-bit build.
    pub const B32: Self = Self(32);
    /// 64-bit build (the default).
    pub const B64: Self = Self(64);

    /// Parse a loose bit-width string.
    pub fn parse(raw: &str) -> Self {
        let digits: String = raw.chars().filter(char::is_ascii_digit).collect();
        if digits.is_empty() {
            return Self::B64;
        }
        // Only overflow can fail here.
        Self(digits.parse().unwrap_or(u16::MAX))
    }

    /// Numeric width.
    pub fn get(self) -> u16 {
        self.0
    }

    /// Whether this is a 32-bit request.
    pub fn is_32(self) -> bool {
        self == Self::B32
    }
}

impl Default for Bits {
    fn default() -> Self {
        Self::B64
    }
}

impl From<String> for Bits {
    fn from(s: String) -> Self {
        Self::parse(&s)
    }
}

impl From<Bits> for String {
    fn from(b: Bits) -> Self {
        b.0.to_string()
    }
}

impl std::fmt::Display for Bits {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Archive extension, fixed by platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Extension {
    /// Windows zip archive.
    #[serde(rename = ".zip")]
    Zip,
    /// Gzip-compressed tarball, everything else.
    #[serde(rename = ".tgz")]
    Tgz,
}

impl Extension {
    /// Extension for the given platform.
    pub fn for_platform(platform: &Platform) -> Self {
        if platform.is_windows() {
            Self::Zip
        } else {
            Self::Tgz
        }
    }

    /// The extension including its leading dot.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Zip => ".zip",
            Self::Tgz => ".tgz",
        }
    }
}

impl std::fmt::Display for Extension {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A [`Query`](crate::Query) after normalization: nothing left to default.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedOptions {
    /// The version specifier, not yet resolved against the catalog.
    pub version: VersionQuery,
    /// Canonical platform.
    pub platform: Platform,
    /// Canonical architecture.
    pub arch: Arch,
    /// Bit width.
    pub bits: Bits,
    /// Distribution suffix; empty means "no suffix".
    pub distro: String,
    /// Source branch for commit builds.
    pub branch: String,
    /// Debug-symbols build.
    pub debug: bool,
    /// Enterprise edition.
    pub enterprise: bool,
    /// Archive extension derived from the platform.
    pub ext: Extension,
}

/// A fully resolved download location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resolution {
    /// Package name, always [`PACKAGE_NAME`](crate::PACKAGE_NAME).
    pub name: String,
    /// Concrete version, or the commit id for CI builds.
    pub version: String,
    /// Artifact filename.
    pub artifact: String,
    /// Absolute download URL.
    pub url: String,
    /// The options that produced this result.
    pub options: ResolvedOptions,
}
