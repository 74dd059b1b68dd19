//! The resolved state of one browsing run.

use pkgview_dl::utils::resolve_url;

use crate::{
    documents::{PackageEntry, RepoDocument},
    error::Result,
    repo::{fetch_catalog, fetch_repo, fetch_repo_list, select_repo},
    source::Source,
};

/// A unit of work performed while opening a session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stage {
    FetchRepoList,
    SelectRepo,
    FetchRepo,
    FetchCatalog,
}

/// Progress reported while a session is opened.
#[derive(Debug)]
pub enum SessionEvent<'a> {
    Started(Stage),
    Finished(Stage),
    /// The repository document is loaded and `branch` is about to be resolved
    /// against it.
    RepoLoaded {
        url: &'a str,
        repo: &'a RepoDocument,
        branch: &'a str,
    },
}

/// A repository with one branch resolved and its catalog loaded.
///
/// Built once per run and passed to whatever needs the catalog; nothing in
/// it is refreshed.
#[derive(Clone, Debug)]
pub struct RepositorySession {
    pub repo_url: String,
    pub repo: RepoDocument,
    pub branch: String,
    /// Absolute URL of the branch manifest.
    pub branch_url: String,
    pub packages: Vec<PackageEntry>,
}

impl RepositorySession {
    pub fn new(
        repo_url: impl Into<String>,
        repo: RepoDocument,
        branch: impl Into<String>,
        branch_url: impl Into<String>,
        packages: Vec<PackageEntry>,
    ) -> Self {
        Self {
            repo_url: repo_url.into(),
            repo,
            branch: branch.into(),
            branch_url: branch_url.into(),
            packages,
        }
    }

    /// Resolves `branch` of the repository at `repo_url` and loads its catalog.
    pub fn open<S: Source + ?Sized>(source: &S, repo_url: &str, branch: &str) -> Result<Self> {
        Self::open_with(source, repo_url, branch, &mut |_| {})
    }

    /// Like [`RepositorySession::open`], reporting each stage to `on_event`.
    pub fn open_with<S: Source + ?Sized>(
        source: &S,
        repo_url: &str,
        branch: &str,
        on_event: &mut dyn FnMut(SessionEvent<'_>),
    ) -> Result<Self> {
        on_event(SessionEvent::Started(Stage::FetchRepo));
        let repo = fetch_repo(source, repo_url)?;
        on_event(SessionEvent::Finished(Stage::FetchRepo));

        on_event(SessionEvent::RepoLoaded {
            url: repo_url,
            repo: &repo,
            branch,
        });
        let branch_url = repo.manifest_url(repo_url, branch)?;

        on_event(SessionEvent::Started(Stage::FetchCatalog));
        let packages = fetch_catalog(source, &branch_url)?;
        on_event(SessionEvent::Finished(Stage::FetchCatalog));

        Ok(Self::new(repo_url, repo, branch, branch_url, packages))
    }

    /// Fetches the repository list, picks its first repository and opens it.
    pub fn discover<S: Source + ?Sized>(source: &S, list_url: &str, branch: &str) -> Result<Self> {
        Self::discover_with(source, list_url, branch, &mut |_| {})
    }

    /// Like [`RepositorySession::discover`], reporting each stage to `on_event`.
    pub fn discover_with<S: Source + ?Sized>(
        source: &S,
        list_url: &str,
        branch: &str,
        on_event: &mut dyn FnMut(SessionEvent<'_>),
    ) -> Result<Self> {
        on_event(SessionEvent::Started(Stage::FetchRepoList));
        let repos = fetch_repo_list(source, list_url)?;
        on_event(SessionEvent::Finished(Stage::FetchRepoList));

        on_event(SessionEvent::Started(Stage::SelectRepo));
        let repo_url = select_repo(&repos)?;
        on_event(SessionEvent::Finished(Stage::SelectRepo));

        Self::open_with(source, repo_url, branch, on_event)
    }

    /// First package whose name equals `name` exactly (case-sensitive).
    pub fn find_package(&self, name: &str) -> Option<&PackageEntry> {
        self.packages.iter().find(|pkg| pkg.name == name)
    }

    /// Absolute URL of the package's release index.
    pub fn package_url(&self, package: &PackageEntry) -> String {
        resolve_url(&self.branch_url, &package.url)
    }
}
