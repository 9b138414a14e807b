//! Target operating system.

/// Operating system segment used in MongoDB download paths and filenames.
///
/// The download servers name macOS `osx` and Windows `win32` regardless of
/// what the host reports, so the aliases are folded here.
///
/// # Example
///
/// ```
/// use mdu_schema::Platform;
///
/// assert_eq!(Platform::from("darwin"), Platform::Osx);
/// assert_eq!(Platform::from("windows").as_str(), "win32");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Platform {
    /// Linux builds (`.tgz`).
    Linux,
    /// macOS builds (`.tgz`).
    Osx,
    /// Windows builds (`.zip`).
    Win32,
    /// Anything else, passed through lowercased (e.g. `sunos5`).
    Other(String),
}

impl Platform {
    /// Platform of the running process, in download-server terms.
    pub fn current() -> Self {
        match std::env::consts::OS {
            "macos" => Self::Osx,
            os => Self::from(os),
        }
    }

    /// Convert to string representation
    pub fn as_str(&self) -> &str {
        match self {
            Self::Linux => "linux",
            Self::Osx => "osx",
            Self::Win32 => "win32",
            Self::Other(name) => name,
        }
    }

    /// Whether this is the Windows platform.
    pub fn is_windows(&self) -> bool {
        matches!(self, Self::Win32)
    }
}

impl From<&str> for Platform {
    fn from(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "linux" => Self::Linux,
            "osx" | "darwin" => Self::Osx,
            "win32" | "windows" => Self::Win32,
            other => Self::Other(other.to_string()),
        }
    }
}

impl From<String> for Platform {
    fn from(s: String) -> Self {
        Self::from(s.as_str())
    }
}

impl From<Platform> for String {
    fn from(p: Platform) -> Self {
        p.as_str().to_string()
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
