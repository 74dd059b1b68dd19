//! JSON documents published by a repository.
//!
//! Every URL field may be absolute or relative; relative values are resolved
//! against the URL of the document they were read from.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// The `version` field of a repository list, which is published either as a
/// number or as a numeric string.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum ListVersion {
    Number(i64),
    String(String),
}

/// Top-level document listing candidate repository URLs.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct RepoListDocument {
    pub version: ListVersion,
    /// Shape depends on `version`; only interpreted for version 1.
    #[serde(default)]
    pub repo_list: Option<serde_json::Value>,
}

/// Root document of a repository.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct RepoDocument {
    pub name: Option<String>,
    pub description: Option<String>,
    pub maintainer: Option<String>,
    /// Branch name to manifest URL.
    #[serde(default)]
    pub release_type: BTreeMap<String, String>,
}

/// Branch manifest listing the packages of one branch, in publication order.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct PackageManifest {
    pub packages: Vec<PackageEntry>,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct PackageEntry {
    pub name: String,
    /// Location of the package's release index.
    pub url: String,
}

/// Release index of a package. Only `latest` is used.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct ReleaseIndex {
    pub latest: ReleaseDescriptor,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct ReleaseDescriptor {
    /// Location of the release's downloads index.
    pub url: String,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct DownloadsIndex {
    pub downloads: Vec<DownloadEntry>,
}

/// One artifact of a release. `"*"` in `platform` or `arch` matches any value.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct DownloadEntry {
    pub platform: String,
    pub arch: String,
    pub file: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repo_list_version_forms() {
        let doc: RepoListDocument =
            serde_json::from_str(r#"{"version":"1","repo_list":["http://x/repo.json"]}"#).unwrap();
        assert_eq!(doc.version, ListVersion::String("1".into()));

        let doc: RepoListDocument = serde_json::from_str(r#"{"version":1}"#).unwrap();
        assert_eq!(doc.version, ListVersion::Number(1));
        assert!(doc.repo_list.is_none());
    }

    #[test]
    fn test_repo_document_optional_fields() {
        let doc: RepoDocument = serde_json::from_str(
            r#"{"name":"Main","release_type":{"stable":"stable/packages.json","beta":"beta.json"}}"#,
        )
        .unwrap();
        assert_eq!(doc.name.as_deref(), Some("Main"));
        assert!(doc.maintainer.is_none());
        assert_eq!(doc.release_type.len(), 2);
    }

    #[test]
    fn test_release_index_ignores_other_releases() {
        let index: ReleaseIndex = serde_json::from_str(
            r#"{"latest":{"url":"1.2/downloads.json"},"1.1":{"url":"1.1/downloads.json"}}"#,
        )
        .unwrap();
        assert_eq!(index.latest.url, "1.2/downloads.json");
    }

    #[test]
    fn test_missing_required_field_is_an_error() {
        assert!(serde_json::from_str::<PackageManifest>(r#"{"packages":[{"name":"a"}]}"#).is_err());
        assert!(serde_json::from_str::<ReleaseIndex>(r#"{"v1":{"url":"x"}}"#).is_err());
    }
}
