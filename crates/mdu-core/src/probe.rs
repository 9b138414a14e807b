//! Host platform, architecture and Linux distribution.
//!
//! The probe runs once, up front; the normalizer only ever reads host facts
//! through [`HostProbe`], normally a [`HostEnvironment`] snapshot.

use std::process::Command;
use std::sync::LazyLock;

use mdu_schema::{Arch, Platform};
use regex::Regex;

/// Distribution suffix used when Ubuntu reports no release number.
const DEFAULT_UBUNTU: &str = "1604";

static ISSUE_VERSION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+\.?)+").expect("valid issue regex"));

/// Source of the host facts used as normalization defaults.
pub trait HostProbe: Send + Sync + std::fmt::Debug {
    /// Current operating system identifier.
    fn platform(&self) -> &Platform;

    /// Current CPU architecture identifier.
    fn arch(&self) -> &Arch;

    /// Coarse distribution identifier, only known on some Linux hosts.
    fn linux_distro(&self) -> Option<&str>;
}

/// What the local machine looks like, in download-server terms.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostEnvironment {
    platform: Platform,
    arch: Arch,
    linux_distro: Option<String>,
}

impl HostEnvironment {
    /// A fixed environment, for tests and for callers resolving on behalf of
    /// another machine.
    pub fn new(platform: Platform, arch: Arch) -> Self {
        Self {
            platform,
            arch,
            linux_distro: None,
        }
    }

    /// Attach a Linux distribution suffix such as `ubuntu1604`.
    pub fn with_linux_distro(mut self, distro: impl Into<String>) -> Self {
        self.linux_distro = Some(distro.into());
        self
    }

    /// Probe the running machine.
    ///
    /// Distribution detection on Linux shells out to `lsb_release`, falling
    /// back to `/etc/issue`. Failure there is logged and leaves the
    /// distribution unset.
    pub fn detect() -> Self {
        let mut env = Self::new(Platform::current(), Arch::current());
        if env.platform == Platform::Linux {
            env.linux_distro = detect_linux_distro();
        }
        tracing::debug!(
            "Host environment: platform={} arch={} distro={:?}",
            env.platform,
            env.arch,
            env.linux_distro
        );
        env
    }
}

impl HostProbe for HostEnvironment {
    fn platform(&self) -> &Platform {
        &self.platform
    }

    fn arch(&self) -> &Arch {
        &self.arch
    }

    fn linux_distro(&self) -> Option<&str> {
        self.linux_distro.as_deref()
    }
}

fn detect_linux_distro() -> Option<String> {
    let (id, version) = match lsb_release() {
        Some(info) => info,
        None => match std::fs::read_to_string("/etc/issue") {
            Ok(text) => parse_issue(&text)?,
            Err(e) => {
                tracing::warn!("Could not determine Linux distribution: {e}");
                return None;
            }
        },
    };
    distro_suffix(&id, &version)
}

fn lsb_release() -> Option<(String, String)> {
    let bin = which::which("lsb_release").ok()?;
    let run = |flag: &str| -> Option<String> {
        let out = Command::new(&bin).arg(flag).output().ok()?;
        if !out.status.success() {
            return None;
        }
        Some(String::from_utf8_lossy(&out.stdout).trim().to_string())
    };
    Some((run("-si")?, run("-sr")?))
}

/// Split an `/etc/issue` banner into distribution id and release number.
pub(crate) fn parse_issue(text: &str) -> Option<(String, String)> {
    let text = text.trim();
    let version = ISSUE_VERSION.find(text)?.as_str().to_string();
    let id = text
        .split("GNU/Linux")
        .next()
        .unwrap_or_default()
        .split_whitespace()
        .next()
        .unwrap_or_default()
        .to_string();
    Some((id, version))
}

/// Download-server suffix for a distribution; only Ubuntu has one.
pub(crate) fn distro_suffix(id: &str, version: &str) -> Option<String> {
    match id.trim() {
        "Ubuntu" => {
            let version = version.trim().replacen('.', "", 1);
            let version = if version.is_empty() {
                DEFAULT_UBUNTU.to_string()
            } else {
                version
            };
            Some(format!("ubuntu{version}"))
        }
        _ => None,
    }
}
