//! Artifact filenames and download URLs.
//!
//! Each template below is a naming convention the download servers actually
//! used at some point; all of them are kept verbatim because consumers compare
//! full URLs literally (including the doubled hyphen some debug builds get).

use mdu_schema::{PACKAGE_NAME, Platform, Resolution, ResolvedOptions, VersionQuery};

/// Marker inserted before the version of debug-symbol builds.
const DEBUG_MARKER: &str = "-debugsymbols-";

/// Prefix of the generic Linux distro placeholder (`linux_64`, `linux_32`).
pub(crate) const GENERIC_LINUX_DISTRO: &str = "linux_";

/// Hosts serving release builds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadHosts {
    /// Community edition host.
    pub community: String,
    /// Enterprise edition host.
    pub enterprise: String,
}

impl Default for DownloadHosts {
    fn default() -> Self {
        Self {
            community: "fastdl.mongodb.org".to_string(),
            enterprise: "downloads.mongodb.com".to_string(),
        }
    }
}

impl DownloadHosts {
    fn for_edition(&self, enterprise: bool) -> &str {
        if enterprise {
            &self.enterprise
        } else {
            &self.community
        }
    }
}

/// Release eras whose builds are named differently.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReleaseEra {
    /// 2.x: Windows builds shipped without SSL (`2008plus`).
    PreSsl,
    /// 3.0 onwards.
    Modern,
}

impl ReleaseEra {
    /// Era of a version query, judged by its leading character as the
    /// download servers did.
    pub fn of(version: &VersionQuery) -> Self {
        if version.as_str().starts_with('2') {
            Self::PreSsl
        } else {
            Self::Modern
        }
    }
}

struct Template {
    name: &'static str,
    applies: fn(&ResolvedOptions) -> bool,
    render: fn(&ResolvedOptions, &str) -> String,
}

/// First matching template wins.
const TEMPLATES: &[Template] = &[
    Template {
        name: "enterprise",
        applies: |o| o.enterprise,
        render: |o, v| {
            format!(
                "mongodb-{}-{}-enterprise-{}{}{}{v}{}",
                o.platform,
                o.arch,
                o.distro,
                dash(&o.distro),
                debug_marker(o),
                o.ext
            )
        },
    },
    Template {
        name: "linux",
        applies: |o| o.platform == Platform::Linux,
        render: |o, v| {
            let distro = if o.distro.is_empty() || o.distro.starts_with(GENERIC_LINUX_DISTRO) {
                String::new()
            } else {
                format!("{}-", o.distro)
            };
            format!(
                "mongodb-{}-{}-{distro}{}{v}{}",
                o.platform,
                o.arch,
                debug_marker(o),
                o.ext
            )
        },
    },
    Template {
        name: "community",
        applies: |_| true,
        render: |o, v| {
            format!(
                "mongodb-{}-{}-{}{}{}{v}{}",
                o.platform,
                o.arch,
                o.distro,
                dash(&o.distro),
                debug_marker(o),
                o.ext
            )
        },
    },
];

fn dash(distro: &str) -> &'static str {
    if distro.is_empty() { "" } else { "-" }
}

fn debug_marker(opts: &ResolvedOptions) -> &'static str {
    if opts.debug { DEBUG_MARKER } else { "" }
}

/// Filename of the release artifact for `version`.
pub fn artifact_name(opts: &ResolvedOptions, version: &str) -> String {
    TEMPLATES
        .iter()
        .find(|t| (t.applies)(opts))
        .map(|t| {
            tracing::trace!("Naming artifact with the `{}` template", t.name);
            (t.render)(opts, version)
        })
        .unwrap_or_default()
}

/// Build the final resolution for a concrete release version.
pub fn build_artifact(opts: &ResolvedOptions, version: &str, hosts: &DownloadHosts) -> Resolution {
    let artifact = artifact_name(opts, version);
    let url = format!(
        "http://{}/{}/{artifact}",
        hosts.for_edition(opts.enterprise),
        opts.platform
    );
    Resolution {
        name: PACKAGE_NAME.to_string(),
        version: version.to_string(),
        artifact,
        url,
        options: opts.clone(),
    }
}
