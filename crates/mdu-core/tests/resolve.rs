//! Integration tests for dependency resolution.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use mdu_core::{
    BuildIndex, BuildRevision, HostEnvironment, NormalizeContext, ResolveError, Resolver,
    StaticCatalog, VersionCatalog,
};
use mdu_schema::{Arch, CommitId, Platform, Query};

const SHA: &str = "610765fdb94eebf612bd0172ec081ccc21110103";

/// Build index answering from a fixed table of project/commit pairs.
#[derive(Debug, Default)]
struct StubIndex {
    revisions: HashMap<(String, String), Vec<String>>,
}

impl StubIndex {
    fn with(mut self, project: &str, commit: &str, builds: &[&str]) -> Self {
        self.revisions.insert(
            (project.to_string(), commit.to_string()),
            builds.iter().map(ToString::to_string).collect(),
        );
        self
    }
}

#[async_trait]
impl BuildIndex for StubIndex {
    async fn get_revision(
        &self,
        project: &str,
        commit: &CommitId,
    ) -> Result<BuildRevision, ResolveError> {
        self.revisions
            .get(&(project.to_string(), commit.to_string()))
            .map(|builds| BuildRevision {
                builds: builds.clone(),
            })
            .ok_or_else(|| ResolveError::RevisionNotFound {
                message: format!("no revision {commit} in {project}"),
            })
    }
}

/// Catalog that is always down.
#[derive(Debug)]
struct DownCatalog;

#[async_trait]
impl VersionCatalog for DownCatalog {
    async fn list_versions(&self) -> Result<Vec<String>, ResolveError> {
        Err(ResolveError::catalog("connection refused"))
    }
}

fn host() -> HostEnvironment {
    HostEnvironment::new(Platform::Linux, Arch::X86_64)
}

fn catalog() -> StaticCatalog {
    StaticCatalog::new([
        "3.3.1", "3.2.1", "3.2.0", "3.1.9", "3.1.8", "3.1.6", "3.1.4", "3.0.7", "3.0.6",
        "2.6.11",
    ])
}

fn resolver() -> Resolver {
    Resolver::new(
        Arc::new(catalog()),
        Arc::new(StubIndex::default()),
        NormalizeContext::new(host()),
    )
}

#[tokio::test]
async fn test_windows_zip() {
    let r = resolver()
        .resolve(&Query::new("3.1.6").platform("win32").bits(64))
        .await
        .unwrap();
    assert_eq!(r.name, "mongodb");
    assert_eq!(r.version, "3.1.6");
    assert_eq!(r.artifact, "mongodb-win32-x86_64-2008plus-ssl-3.1.6.zip");
    assert_eq!(
        r.url,
        "http://fastdl.mongodb.org/win32/mongodb-win32-x86_64-2008plus-ssl-3.1.6.zip"
    );
}

#[tokio::test]
async fn test_osx_tgz() {
    let r = resolver()
        .resolve(&Query::new("3.1.6").platform("osx").bits(64))
        .await
        .unwrap();
    assert_eq!(r.artifact, "mongodb-osx-x86_64-3.1.6.tgz");
    assert_eq!(r.url, "http://fastdl.mongodb.org/osx/mongodb-osx-x86_64-3.1.6.tgz");
}

#[tokio::test]
async fn test_linux_named_distro() {
    let r = resolver()
        .resolve(&Query::new("3.1.4").platform("linux").distro("debian71").bits(64))
        .await
        .unwrap();
    assert_eq!(r.artifact, "mongodb-linux-x86_64-debian71-3.1.4.tgz");
}

#[tokio::test]
async fn test_windows_enterprise() {
    let r = resolver()
        .resolve(&Query::new("3.0.6").platform("win32").enterprise(true).bits(64))
        .await
        .unwrap();
    assert_eq!(r.artifact, "mongodb-win32-x86_64-enterprise-windows-64-3.0.6.zip");
    assert_eq!(
        r.url,
        "http://downloads.mongodb.com/win32/mongodb-win32-x86_64-enterprise-windows-64-3.0.6.zip"
    );
}

#[tokio::test]
async fn test_linux_32bit() {
    let r = resolver()
        .resolve(&Query::new("3.0.7").platform("linux").bits(32))
        .await
        .unwrap();
    assert_eq!(r.options.arch, Arch::I686);
    assert_eq!(r.artifact, "mongodb-linux-i686-3.0.7.tgz");
}

#[tokio::test]
async fn test_stable() {
    let r = resolver().resolve(&Query::new("stable")).await.unwrap();
    assert_eq!(r.version, "3.2.1");
    assert!(!r.url.is_empty());
    assert_eq!(r.artifact, "mongodb-linux-x86_64-3.2.1.tgz");
}

#[tokio::test]
async fn test_bare_query_uses_default_version() {
    let resolver = Resolver::new(
        Arc::new(catalog()),
        Arc::new(StubIndex::default()),
        NormalizeContext::new(host()).with_default_version("~3.0.0"),
    );
    let r = resolver.resolve(&Query::default()).await.unwrap();
    assert_eq!(r.version, "3.0.7");
}

#[tokio::test]
async fn test_range_first_catalog_match() {
    let resolver = Resolver::new(
        Arc::new(StaticCatalog::new(["3.2.0", "3.1.9", "3.1.8"])),
        Arc::new(StubIndex::default()),
        NormalizeContext::new(host()),
    );
    let r = resolver.resolve(&Query::new("~3.1.8")).await.unwrap();
    assert_eq!(r.version, "3.1.9");
}

#[tokio::test]
async fn test_commit_goes_to_build_index() {
    let build = format!("mongodb_mongo_master_windows_64_2k8_debug_{SHA}_15_07_20_20_04_03");
    let index = StubIndex::default().with("mongodb-mongo-master", SHA, &[build.as_str()]);
    // The catalog is down: a commit query must never touch it.
    let resolver = Resolver::new(
        Arc::new(DownCatalog),
        Arc::new(index),
        NormalizeContext::new(host()),
    );

    let r = resolver
        .resolve(&Query::new(SHA).platform("win32").bits(64).debug(true))
        .await
        .unwrap();
    assert_eq!(r.name, "mongodb");
    assert_eq!(r.version, SHA);
    assert_eq!(
        r.artifact,
        format!("binaries-mongodb_mongo_master_windows_64_2k8_debug_{SHA}_15_07_20_20_04_03.zip")
    );
    assert_eq!(
        r.url,
        format!(
            "https://s3.amazonaws.com/mciuploads/mongodb-mongo-master/windows_64_2k8_debug/{SHA}/binaries/binaries-mongodb_mongo_master_windows_64_2k8_debug_{SHA}_15_07_20_20_04_03.zip"
        )
    );
    assert_eq!(r.options.distro, "windows_64_2k8_debug");
}

#[tokio::test]
async fn test_commit_on_other_branch() {
    let build = format!("mongodb_mongo_v3.0_linux_64_{SHA}_15_07_20");
    let index = StubIndex::default().with("mongodb-mongo-v3.0", SHA, &[build.as_str()]);
    let resolver = Resolver::new(
        Arc::new(catalog()),
        Arc::new(index),
        NormalizeContext::new(host()),
    );

    let r = resolver
        .resolve(&Query::new(SHA).platform("linux").branch("v3.0"))
        .await
        .unwrap();
    assert_eq!(r.artifact, format!("binaries-{build}.tgz"));
    assert!(r.url.contains("/mongodb-mongo-v3.0/linux_64/"));
}

#[tokio::test]
async fn test_unknown_commit() {
    let err = resolver().resolve(&Query::new(SHA)).await.unwrap_err();
    assert!(matches!(err, ResolveError::RevisionNotFound { .. }));
}

#[tokio::test]
async fn test_catalog_failure_passes_through() {
    let resolver = Resolver::new(
        Arc::new(DownCatalog),
        Arc::new(StubIndex::default()),
        NormalizeContext::new(host()),
    );
    let err = resolver.resolve(&Query::new("latest")).await.unwrap_err();
    assert!(matches!(err, ResolveError::CatalogUnavailable(_)));
}

#[tokio::test]
async fn test_batch_keyed_by_version() {
    let results = resolver()
        .resolve_all(vec![Query::new("stable"), Query::new("latest")])
        .await
        .unwrap();
    assert_eq!(results.len(), 2);
    assert_eq!(results["stable"].version, "3.2.1");
    assert_eq!(results["latest"].version, "3.3.1");
}

#[tokio::test]
async fn test_batch_fails_as_a_whole() {
    let err = resolver()
        .resolve_all(vec![Query::new("stable"), Query::new("~9.9.0")])
        .await
        .unwrap_err();
    assert!(matches!(err, ResolveError::VersionNotFound { .. }));
}

#[tokio::test]
async fn test_normalize_without_resolving() {
    let opts = resolver().normalize(&Query::new("3.1.6").platform("windows").bits("64bit"));
    assert_eq!(opts.platform, Platform::Win32);
    assert_eq!(opts.distro, "2008plus-ssl");
}
