//! Release and artifact selection for a package.

use pkgview_dl::utils::resolve_url;
use tracing::debug;

use crate::{
    documents::{DownloadEntry, DownloadsIndex, PackageEntry, ReleaseIndex},
    error::Result,
    session::RepositorySession,
    source::{fetch_json, Source},
};

/// Matches any platform or architecture in a download entry.
pub const WILDCARD: &str = "*";

/// The platform/architecture pair artifacts are selected for.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Target {
    pub platform: String,
    pub arch: String,
}

impl Default for Target {
    fn default() -> Self {
        Self::new("windows", "x86_64")
    }
}

impl Target {
    pub fn new(platform: impl Into<String>, arch: impl Into<String>) -> Self {
        Self {
            platform: platform.into(),
            arch: arch.into(),
        }
    }
}

impl DownloadEntry {
    /// The entry's platform with a wildcard replaced by the target's.
    pub fn effective_platform<'a>(&'a self, target: &'a Target) -> &'a str {
        if self.platform == WILDCARD {
            &target.platform
        } else {
            &self.platform
        }
    }

    /// The entry's architecture with a wildcard replaced by the target's.
    pub fn effective_arch<'a>(&'a self, target: &'a Target) -> &'a str {
        if self.arch == WILDCARD {
            &target.arch
        } else {
            &self.arch
        }
    }

    pub fn matches(&self, target: &Target) -> bool {
        self.effective_platform(target) == target.platform
            && self.effective_arch(target) == target.arch
    }
}

/// First entry, in index order, that matches `target`.
pub fn select_download<'a>(entries: &'a [DownloadEntry], target: &Target) -> Option<&'a DownloadEntry> {
    entries.iter().find(|entry| entry.matches(target))
}

/// Outcome of looking up a downloadable artifact for a package.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Resolution {
    Found {
        package: String,
        download_url: String,
    },
    PackageNotFound,
    NoSuitableRelease,
}

/// Resolves the download URL of the `latest` release of `package` for
/// `target`, or `None` if no artifact matches.
pub fn resolve_download<S: Source + ?Sized>(
    source: &S,
    session: &RepositorySession,
    package: &PackageEntry,
    target: &Target,
) -> Result<Option<String>> {
    let package_url = session.package_url(package);
    let releases: ReleaseIndex = fetch_json(source, &package_url)?;

    let downloads_url = resolve_url(&package_url, &releases.latest.url);
    let index: DownloadsIndex = fetch_json(source, &downloads_url)?;

    let selected = select_download(&index.downloads, target);
    match selected {
        Some(entry) => debug!("Selected {} for {}/{}", entry.file, target.platform, target.arch),
        None => {
            debug!(
                "None of {} downloads match {}/{}",
                index.downloads.len(),
                target.platform,
                target.arch
            )
        }
    }

    Ok(selected.map(|entry| resolve_url(&downloads_url, &entry.file)))
}

/// Looks up `name` in the session's catalog and resolves its artifact.
pub fn resolve_release<S: Source + ?Sized>(
    source: &S,
    session: &RepositorySession,
    name: &str,
    target: &Target,
) -> Result<Resolution> {
    let Some(package) = session.find_package(name) else {
        return Ok(Resolution::PackageNotFound);
    };

    Ok(match resolve_download(source, session, package, target)? {
        Some(download_url) => {
            Resolution::Found {
                package: package.name.clone(),
                download_url,
            }
        }
        None => Resolution::NoSuitableRelease,
    })
}
