//! CI builds addressed by commit id.
//!
//! A 40-character version is not looked up in the release catalog. Instead
//! the CI build index is asked which builds it produced for that commit, and
//! the artifact URL points into the CI upload bucket.

use std::fmt::Debug;

use async_trait::async_trait;
use mdu_schema::{CommitId, PACKAGE_NAME, Resolution, ResolvedOptions};
use reqwest::{Client, StatusCode};
use serde::Deserialize;

use crate::error::ResolveError;

/// Distro of the Windows image every CI Windows build runs on.
const CI_WINDOWS_DISTRO: &str = "windows_64_2k8";

/// A revision record from the build index.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct BuildRevision {
    /// Build ids produced for the revision, e.g.
    /// `mongodb_mongo_master_linux_64_<sha>_15_07_20_20_04_03`.
    #[serde(default)]
    pub builds: Vec<String>,
}

/// Lookup of CI builds by project and commit.
#[async_trait]
pub trait BuildIndex: Send + Sync + Debug {
    /// Fetch the revision record for `commit` in `project`.
    async fn get_revision(
        &self,
        project: &str,
        commit: &CommitId,
    ) -> Result<BuildRevision, ResolveError>;
}

/// Client for the Evergreen REST API (`/rest/v1/projects/{project}/revisions/{commit}`).
#[derive(Debug, Clone)]
pub struct EvergreenClient {
    client: Client,
    endpoint: String,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

impl EvergreenClient {
    /// Client for the API rooted at `endpoint`.
    pub fn new(client: Client, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
        }
    }

    fn revision_url(&self, project: &str, commit: &CommitId) -> String {
        format!(
            "{}/rest/v1/projects/{project}/revisions/{commit}",
            self.endpoint.trim_end_matches('/')
        )
    }
}

#[async_trait]
impl BuildIndex for EvergreenClient {
    async fn get_revision(
        &self,
        project: &str,
        commit: &CommitId,
    ) -> Result<BuildRevision, ResolveError> {
        let url = self.revision_url(project, commit);
        tracing::debug!("Resolving git commit via build index `{url}`");

        let resp = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(ResolveError::build_index)?;

        if resp.status() == StatusCode::NOT_FOUND {
            let message = match resp.json::<ErrorBody>().await {
                Ok(body) => body.message,
                Err(_) => format!("revision {commit} not found in {project}"),
            };
            return Err(ResolveError::RevisionNotFound { message });
        }

        let resp = resp
            .error_for_status()
            .map_err(ResolveError::build_index)?;
        resp.json().await.map_err(ResolveError::build_index)
    }
}

/// Project holding the builds of `branch`.
pub fn project_name(branch: &str) -> String {
    format!("mongodb-mongo-{branch}")
}

/// Pick the one build whose id contains `prefix`.
///
/// When several ids contain the prefix (the plain `windows_64_2k8` prefix
/// also matches `windows_64_2k8_debug` builds), only ids continuing with
/// `_{commit}` are kept.
///
/// # Errors
///
/// Returns [`ResolveError::ArtifactNotFound`] when nothing matches and
/// [`ResolveError::AmbiguousArtifact`] when more than one build survives.
pub fn select_build<'a>(
    builds: &'a [String],
    prefix: &str,
    commit: &CommitId,
) -> Result<&'a str, ResolveError> {
    let candidates: Vec<&String> = builds.iter().filter(|b| b.contains(prefix)).collect();
    match candidates.as_slice() {
        [] => Err(ResolveError::ArtifactNotFound {
            prefix: prefix.to_string(),
        }),
        [only] => Ok(only.as_str()),
        _ => {
            let exact = format!("{prefix}_{commit}");
            let narrowed: Vec<&String> = candidates
                .iter()
                .copied()
                .filter(|b| b.starts_with(&exact))
                .collect();
            match narrowed.as_slice() {
                [only] => Ok(only.as_str()),
                _ => Err(ResolveError::AmbiguousArtifact {
                    prefix: prefix.to_string(),
                    candidates: candidates.iter().map(|b| (*b).clone()).collect(),
                }),
            }
        }
    }
}

/// Resolve a commit build to its artifact in the CI bucket.
///
/// Windows requests always use the CI Windows image distro, whatever the
/// normalizer chose.
///
/// # Errors
///
/// Propagates build-index failures and the selection errors of
/// [`select_build`].
pub async fn resolve_commit(
    opts: &ResolvedOptions,
    commit: &CommitId,
    index: &dyn BuildIndex,
    bucket_url: &str,
) -> Result<Resolution, ResolveError> {
    let mut opts = opts.clone();
    if opts.platform.is_windows() {
        opts.distro = if opts.debug {
            format!("{CI_WINDOWS_DISTRO}_debug")
        } else {
            CI_WINDOWS_DISTRO.to_string()
        };
    }

    let project = project_name(&opts.branch);
    let revision = index.get_revision(&project, commit).await?;

    let prefix = format!("mongodb_mongo_{}_{}", opts.branch, opts.distro);
    let build = select_build(&revision.builds, &prefix, commit)?;

    let artifact = format!("binaries-{build}{}", opts.ext);
    let url = format!(
        "{}/{project}/{}/{commit}/binaries/{artifact}",
        bucket_url.trim_end_matches('/'),
        opts.distro
    );
    tracing::debug!("Commit {commit} resolved to {url}");

    Ok(Resolution {
        name: PACKAGE_NAME.to_string(),
        version: commit.to_string(),
        artifact,
        url,
        options: opts,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use mdu_schema::VersionQuery;
    use mockito::Server;

    const SHA: &str = "610765fdb94eebf612bd0172ec081ccc21110103";

    fn commit() -> CommitId {
        match VersionQuery::from(SHA) {
            VersionQuery::Commit(c) => c,
            other => panic!("not a commit: {other}"),
        }
    }

    fn builds(names: &[&str]) -> Vec<String> {
        names.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn test_select_single_build() {
        let b = builds(&[
            "mongodb_mongo_master_linux_64_610765fdb94eebf612bd0172ec081ccc21110103_15_07_20",
            "mongodb_mongo_master_osx_108_610765fdb94eebf612bd0172ec081ccc21110103_15_07_20",
        ]);
        let picked = select_build(&b, "mongodb_mongo_master_osx_108", &commit()).unwrap();
        assert!(picked.contains("osx_108"));
    }

    #[test]
    fn test_select_narrows_debug_lookalikes() {
        let b = builds(&[
            "mongodb_mongo_master_windows_64_2k8_610765fdb94eebf612bd0172ec081ccc21110103_15_07_20",
            "mongodb_mongo_master_windows_64_2k8_debug_610765fdb94eebf612bd0172ec081ccc21110103_15_07_20",
        ]);
        let picked = select_build(&b, "mongodb_mongo_master_windows_64_2k8", &commit()).unwrap();
        assert!(!picked.contains("_debug"));
    }

    #[test]
    fn test_select_none_or_many() {
        let b = builds(&["mongodb_mongo_master_linux_64_abc_1", "mongodb_mongo_master_linux_64_abc_2"]);
        assert!(matches!(
            select_build(&b, "mongodb_mongo_master_rhel70", &commit()),
            Err(ResolveError::ArtifactNotFound { .. })
        ));
        match select_build(&b, "mongodb_mongo_master_linux_64", &commit()) {
            Err(ResolveError::AmbiguousArtifact { candidates, .. }) => {
                assert_eq!(candidates.len(), 2);
            }
            other => panic!("expected ambiguity, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_get_revision() {
        let mut server = Server::new_async().await;
        let body = format!(
            r#"{{"project":"mongodb-mongo-master","revision":"{SHA}","builds":["mongodb_mongo_master_linux_64_{SHA}_15_07_20"]}}"#
        );
        let _m = server
            .mock(
                "GET",
                format!("/rest/v1/projects/mongodb-mongo-master/revisions/{SHA}").as_str(),
            )
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(body)
            .create_async()
            .await;

        let client = EvergreenClient::new(Client::new(), server.url());
        let rev = client
            .get_revision("mongodb-mongo-master", &commit())
            .await
            .unwrap();
        assert_eq!(rev.builds.len(), 1);
    }

    #[tokio::test]
    async fn test_missing_revision_carries_remote_message() {
        let mut server = Server::new_async().await;
        let _m = server
            .mock(
                "GET",
                format!("/rest/v1/projects/mongodb-mongo-master/revisions/{SHA}").as_str(),
            )
            .with_status(404)
            .with_header("content-type", "application/json")
            .with_body(r#"{"message":"error finding revision"}"#)
            .create_async()
            .await;

        let client = EvergreenClient::new(Client::new(), server.url());
        match client.get_revision("mongodb-mongo-master", &commit()).await {
            Err(ResolveError::RevisionNotFound { message }) => {
                assert_eq!(message, "error finding revision");
            }
            other => panic!("expected RevisionNotFound, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_server_error_is_unavailable() {
        let mut server = Server::new_async().await;
        let _m = server
            .mock(
                "GET",
                format!("/rest/v1/projects/mongodb-mongo-master/revisions/{SHA}").as_str(),
            )
            .with_status(500)
            .create_async()
            .await;

        let client = EvergreenClient::new(Client::new(), server.url());
        assert!(matches!(
            client.get_revision("mongodb-mongo-master", &commit()).await,
            Err(ResolveError::BuildIndexUnavailable(_))
        ));
    }
}
