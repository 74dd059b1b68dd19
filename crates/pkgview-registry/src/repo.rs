//! Repository discovery: repository list, repository document and branch
//! catalog.

use pkgview_dl::utils::resolve_url;
use tracing::debug;

use crate::{
    documents::{ListVersion, PackageEntry, PackageManifest, RepoDocument, RepoListDocument},
    error::{RegistryError, Result},
    source::{fetch_json, Source},
};

/// The only repository list layout understood.
pub const SUPPORTED_LIST_VERSION: i64 = 1;

impl RepoListDocument {
    pub fn version(&self) -> Result<i64> {
        match &self.version {
            ListVersion::Number(n) => Ok(*n),
            ListVersion::String(s) => {
                s.trim()
                    .parse()
                    .map_err(|_| RegistryError::InvalidVersion(s.clone()))
            }
        }
    }

    /// Repository URLs in list order, resolved against `list_url`.
    ///
    /// Lists with an unsupported version yield no repositories.
    pub fn repo_urls(&self, list_url: &str) -> Result<Vec<String>> {
        let version = self.version()?;
        if version != SUPPORTED_LIST_VERSION {
            debug!("Ignoring repository list with unsupported version {version}");
            return Ok(Vec::new());
        }

        let Some(value) = &self.repo_list else {
            return Ok(Vec::new());
        };

        let urls: Vec<String> = serde_json::from_value(value.clone()).map_err(|source| {
            RegistryError::Json {
                url: list_url.to_string(),
                source,
            }
        })?;

        Ok(urls
            .iter()
            .map(|url| resolve_url(list_url, url))
            .collect())
    }
}

/// Fetches the repository list at `url` and returns the repository URLs.
pub fn fetch_repo_list<S: Source + ?Sized>(source: &S, url: &str) -> Result<Vec<String>> {
    let doc: RepoListDocument = fetch_json(source, url)?;
    doc.repo_urls(url)
}

/// Picks the repository to use. Always the first entry of the list.
pub fn select_repo(repos: &[String]) -> Result<&str> {
    repos
        .first()
        .map(String::as_str)
        .ok_or(RegistryError::NoRepositories)
}

pub fn fetch_repo<S: Source + ?Sized>(source: &S, url: &str) -> Result<RepoDocument> {
    fetch_json(source, url)
}

impl RepoDocument {
    /// Absolute URL of the manifest for `branch`.
    ///
    /// # Errors
    ///
    /// [`RegistryError::BranchNotFound`] when the repository does not publish
    /// the branch.
    pub fn manifest_url(&self, repo_url: &str, branch: &str) -> Result<String> {
        self.release_type
            .get(branch)
            .map(|url| resolve_url(repo_url, url))
            .ok_or_else(|| {
                RegistryError::BranchNotFound {
                    branch: branch.to_string(),
                    available: self.release_type.keys().cloned().collect(),
                }
            })
    }
}

/// Fetches the branch manifest and returns its packages in order.
pub fn fetch_catalog<S: Source + ?Sized>(source: &S, manifest_url: &str) -> Result<Vec<PackageEntry>> {
    let manifest: PackageManifest = fetch_json(source, manifest_url)?;
    debug!(
        "Branch manifest {} lists {} packages",
        manifest_url,
        manifest.packages.len()
    );
    Ok(manifest.packages)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::memory::MemorySource;

    const LIST_URL: &str = "https://index.example/repo_list.json";

    fn list(body: &str) -> Result<Vec<String>> {
        let source = MemorySource::default().with(LIST_URL, body);
        fetch_repo_list(&source, LIST_URL)
    }

    #[test]
    fn test_version_one_selects_first_repo() {
        let repos = list(r#"{"version":"1","repo_list":["http://x/repo.json"]}"#).unwrap();
        assert_eq!(select_repo(&repos).unwrap(), "http://x/repo.json");

        let repos = list(
            r#"{"version":1,"repo_list":["http://a/repo.json","http://b/repo.json","http://c/repo.json"]}"#,
        )
        .unwrap();
        assert_eq!(repos.len(), 3);
        assert_eq!(select_repo(&repos).unwrap(), "http://a/repo.json");
    }

    #[test]
    fn test_relative_repo_entries_resolve_against_list() {
        let repos = list(r#"{"version":"1","repo_list":["mirror/repo.json"]}"#).unwrap();
        assert_eq!(repos, vec!["https://index.example/mirror/repo.json"]);
    }

    #[test]
    fn test_unknown_version_yields_empty_list() {
        let repos = list(r#"{"version":"2","repo_list":{"main":"http://x/repo.json"}}"#).unwrap();
        assert!(repos.is_empty());
        assert!(matches!(
            select_repo(&repos),
            Err(RegistryError::NoRepositories)
        ));
    }

    #[test]
    fn test_non_numeric_version_fails() {
        assert!(matches!(
            list(r#"{"version":"one","repo_list":[]}"#),
            Err(RegistryError::InvalidVersion(v)) if v == "one"
        ));
    }

    #[test]
    fn test_malformed_list_fails() {
        assert!(matches!(list("not json"), Err(RegistryError::Json { .. })));
        assert!(matches!(
            list(r#"{"version":"1","repo_list":[1,2]}"#),
            Err(RegistryError::Json { .. })
        ));
    }

    #[test]
    fn test_manifest_url() {
        let repo: RepoDocument = serde_json::from_str(
            r#"{"name":"Main","release_type":{"stable":"stable/packages.json","beta":"https://beta.example/p.json"}}"#,
        )
        .unwrap();

        assert_eq!(
            repo.manifest_url("http://x/repos/repo.json", "stable").unwrap(),
            "http://x/repos/stable/packages.json"
        );
        assert_eq!(
            repo.manifest_url("http://x/repos/repo.json", "beta").unwrap(),
            "https://beta.example/p.json"
        );
    }

    #[test]
    fn test_missing_branch_is_an_error() {
        let repo: RepoDocument =
            serde_json::from_str(r#"{"release_type":{"beta":"b.json","alpha":"a.json"}}"#).unwrap();

        match repo.manifest_url("http://x/repo.json", "stable") {
            Err(RegistryError::BranchNotFound { branch, available }) => {
                assert_eq!(branch, "stable");
                assert_eq!(available, vec!["alpha", "beta"]);
            }
            other => panic!("Expected BranchNotFound, got {other:?}"),
        }
    }

    #[test]
    fn test_fetch_catalog_keeps_order() {
        let source = MemorySource::default().with(
            "http://x/stable.json",
            r#"{"packages":[{"name":"zeta","url":"zeta/r.json"},{"name":"alpha","url":"alpha/r.json"}]}"#,
        );
        let packages = fetch_catalog(&source, "http://x/stable.json").unwrap();
        let names: Vec<_> = packages.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["zeta", "alpha"]);
    }
}
