//! Resolution engine for MongoDB download locations.
//!
//! A loose [`Query`](mdu_schema::Query) is normalized against the host
//! environment, its version is resolved against the published catalog (or,
//! for commit ids, against the CI build index), and a deterministic
//! artifact name and URL are built from the result.

pub mod build_index;
pub mod catalog;
pub mod config;
pub mod error;
pub mod naming;
pub mod normalize;
pub mod probe;
pub mod resolver;
pub mod version;

pub use build_index::{BuildIndex, BuildRevision, EvergreenClient};
pub use catalog::{HttpCatalog, StaticCatalog, VersionCatalog};
pub use config::Config;
pub use error::{ConfigError, ResolveError};
pub use naming::DownloadHosts;
pub use normalize::{NormalizeContext, normalize};
pub use probe::{HostEnvironment, HostProbe};
pub use resolver::Resolver;

/// User Agent string for catalog and build-index requests
pub const USER_AGENT: &str = concat!("mdu-core/", env!("CARGO_PKG_VERSION"));
