//! Turn a loose [`Query`] into fully determined [`ResolvedOptions`].
//!
//! Normalization never fails. Fields are settled in a fixed order because
//! later rules read earlier results: platform and bits first, then the
//! extension, the distro and finally the architecture. Distro and arch are
//! each decided by an ordered rule table; the first rule that applies wins.
//!
//! Normalizing the [`Query`] built from a [`ResolvedOptions`] returns the same
//! options.

use std::sync::Arc;

use mdu_schema::{Arch, Bits, Extension, Platform, Query, ResolvedOptions, VersionQuery};

use crate::naming::{GENERIC_LINUX_DISTRO, ReleaseEra};
use crate::probe::HostProbe;

/// Branch used for commit builds when none is given.
pub const DEFAULT_BRANCH: &str = "master";

const DEBUG_SUFFIX: &str = "_debug";

/// Everything the normalizer may consult besides the query itself.
#[derive(Debug, Clone)]
pub struct NormalizeContext {
    /// Version query used when the query has none.
    pub default_version: String,
    /// Host the defaults are taken from.
    pub host: Arc<dyn HostProbe>,
}

impl NormalizeContext {
    /// Context with the given host and the `stable` default version.
    pub fn new(host: impl HostProbe + 'static) -> Self {
        Self {
            default_version: "stable".to_string(),
            host: Arc::new(host),
        }
    }

    /// Replace the default version query.
    pub fn with_default_version(mut self, version: impl Into<String>) -> Self {
        self.default_version = version.into();
        self
    }
}

/// Facts the distro and arch rules decide on.
struct Facts<'a> {
    version: &'a VersionQuery,
    platform: &'a Platform,
    bits: Bits,
    enterprise: bool,
    host: &'a dyn HostProbe,
}

struct Rule<T> {
    name: &'static str,
    applies: fn(&Facts<'_>) -> bool,
    value: fn(&Facts<'_>) -> T,
}

impl<T> Rule<T> {
    fn first_match(rules: &[Self], facts: &Facts<'_>) -> Option<T> {
        rules.iter().find(|r| (r.applies)(facts)).map(|r| {
            tracing::trace!("Rule `{}` applied", r.name);
            (r.value)(facts)
        })
    }
}

const DISTRO_RULES: &[Rule<String>] = &[
    Rule {
        name: "linux",
        applies: |f| *f.platform == Platform::Linux,
        value: |f| match f.host.linux_distro() {
            Some(d) if f.host.platform() == f.platform => d.to_string(),
            _ => format!("{GENERIC_LINUX_DISTRO}{}", f.bits),
        },
    },
    Rule {
        name: "osx",
        applies: |f| *f.platform == Platform::Osx,
        value: |_| String::new(),
    },
    Rule {
        name: "enterprise",
        applies: |f| f.enterprise,
        value: |_| "windows-64".to_string(),
    },
    Rule {
        name: "pre-ssl",
        applies: |f| ReleaseEra::of(f.version) == ReleaseEra::PreSsl,
        value: |_| "2008plus".to_string(),
    },
    Rule {
        name: "win32-32bit",
        applies: |f| f.platform.is_windows() && f.bits.is_32(),
        value: |_| String::new(),
    },
    Rule {
        name: "ssl",
        applies: |_| true,
        value: |_| "2008plus-ssl".to_string(),
    },
];

const ARCH_RULES: &[Rule<Arch>] = &[
    Rule {
        name: "linux-32bit",
        applies: |f| *f.platform == Platform::Linux && f.bits.is_32(),
        value: |_| Arch::I686,
    },
    Rule {
        name: "win32-32bit",
        applies: |f| f.platform.is_windows() && f.bits.is_32(),
        value: |_| Arch::I386,
    },
    Rule {
        name: "host-non-x86",
        applies: |f| !f.host.arch().is_x86(),
        value: |f| f.host.arch().clone(),
    },
    Rule {
        name: "x86_64",
        applies: |_| true,
        value: |_| Arch::X86_64,
    },
];

/// Fill every unset field of `query` and fold aliases.
pub fn normalize(query: &Query, ctx: &NormalizeContext) -> ResolvedOptions {
    let version = VersionQuery::from(
        query
            .version
            .as_deref()
            .unwrap_or(ctx.default_version.as_str()),
    );
    let platform = query
        .platform
        .as_deref()
        .map_or_else(|| ctx.host.platform().clone(), Platform::from);
    let bits = query.bits.as_deref().map_or(Bits::B64, Bits::parse);
    let debug = query.debug.unwrap_or(false);
    let enterprise = query.enterprise.unwrap_or(false);
    let branch = query
        .branch
        .clone()
        .unwrap_or_else(|| DEFAULT_BRANCH.to_string());
    let ext = Extension::for_platform(&platform);

    let facts = Facts {
        version: &version,
        platform: &platform,
        bits,
        enterprise,
        host: ctx.host.as_ref(),
    };

    let distro = match &query.distro {
        Some(d) => d.clone(),
        None => {
            let mut d = Rule::first_match(DISTRO_RULES, &facts).unwrap_or_default();
            if debug {
                d.push_str(DEBUG_SUFFIX);
            }
            d
        }
    };

    // Only non-x86 architectures are taken verbatim; the x86 spelling always
    // follows from platform and bits.
    let arch = match query.arch.as_deref().map(Arch::from) {
        Some(a) if !a.is_x86() => a,
        _ => Rule::first_match(ARCH_RULES, &facts).unwrap_or(Arch::X86_64),
    };

    let opts = ResolvedOptions {
        version,
        platform,
        arch,
        bits,
        distro,
        branch,
        debug,
        enterprise,
        ext,
    };
    tracing::debug!("Normalized options: {opts:?}");
    opts
}
