//! Shared types for resolving MongoDB download locations.
//!
//! Everything here is free of I/O: a loose [`Query`] goes in, the engine in
//! `mdu-core` turns it into [`ResolvedOptions`] and finally a [`Resolution`].

pub mod arch;
pub mod options;
pub mod platform;
pub mod query;
pub mod version;

// Re-exports
pub use arch::*;
pub use options::{Bits, Extension, Resolution, ResolvedOptions};
pub use platform::*;
pub use query::Query;
pub use version::{Channel, CommitId, VersionQuery};

/// Package name reported for every resolved artifact.
pub const PACKAGE_NAME: &str = "mongodb";
