//! Target CPU architecture.

/// CPU architecture segment of a MongoDB artifact name.
///
/// The x86 family has fixed spellings on the download servers (`x86_64`,
/// `i686` for 32-bit Linux, `i386` for 32-bit Windows). Other architectures
/// (`ppc64le`, `s390x`, `arm64`, `aarch64`) are published under whatever name
/// the caller asks for, so they pass through untouched.
///
/// # Example
///
/// ```
/// use mdu_schema::Arch;
///
/// assert_eq!(Arch::from("x64"), Arch::X86_64);
/// assert_eq!(Arch::from("s390x").as_str(), "s390x");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Arch {
    /// 64-bit x86 (`x64` and `amd64` fold into this).
    X86_64,
    /// 32-bit x86, Linux spelling.
    I686,
    /// 32-bit x86, Windows spelling.
    I386,
    /// Any non-x86 architecture, lowercased.
    Other(String),
}

impl Arch {
    /// Get the current architecture
    pub fn current() -> Self {
        match std::env::consts::ARCH {
            "x86" => Self::I686,
            arch => Self::from(arch),
        }
    }

    /// Convert to string representation
    pub fn as_str(&self) -> &str {
        match self {
            Self::X86_64 => "x86_64",
            Self::I686 => "i686",
            Self::I386 => "i386",
            Self::Other(name) => name,
        }
    }

    /// Whether this belongs to the x86 family, whose name depends on bit width.
    pub fn is_x86(&self) -> bool {
        !matches!(self, Self::Other(_))
    }
}

impl From<&str> for Arch {
    fn from(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "x86_64" | "x64" | "amd64" => Self::X86_64,
            "i686" => Self::I686,
            "i386" => Self::I386,
            other => Self::Other(other.to_string()),
        }
    }
}

impl From<String> for Arch {
    fn from(s: String) -> Self {
        Self::from(s.as_str())
    }
}

impl From<Arch> for String {
    fn from(a: Arch) -> Self {
        a.as_str().to_string()
    }
}

impl std::fmt::Display for Arch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_x64_aliases() {
        assert_eq!(Arch::from("x64"), Arch::X86_64);
        assert_eq!(Arch::from("AMD64"), Arch::X86_64);
        assert_eq!(Arch::from("x86_64"), Arch::X86_64);
    }

    #[test]
    fn test_non_x86_is_untouched() {
        for name in ["ppc64le", "s390x", "arm64", "aarch64"] {
            let arch = Arch::from(name);
            assert!(!arch.is_x86());
            assert_eq!(arch.as_str(), name);
        }
    }
}
