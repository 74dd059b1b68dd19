use std::path::{Path, PathBuf};

use url::Url;

use crate::error::DownloadError;

/// Resolves `candidate` against the URL of the document it was read from.
///
/// An absolute `http`/`https` `candidate` is returned unchanged. Anything
/// else, including strings that merely look like `scheme:rest`, is appended
/// to `base` cut just after its last `/`. No `.`/`..` normalization or
/// percent-encoding is applied.
///
/// # Examples
///
/// ```
/// use pkgview_dl::utils::resolve_url;
///
/// assert_eq!(
///     resolve_url("https://repo.example/stable/packages.json", "foo/releases.json"),
///     "https://repo.example/stable/foo/releases.json"
/// );
/// assert_eq!(
///     resolve_url("https://repo.example/repo.json", "https://cdn.example/a.exe"),
///     "https://cdn.example/a.exe"
/// );
/// ```
pub fn resolve_url(base: &str, candidate: &str) -> String {
    if is_absolute(candidate) {
        return candidate.to_string();
    }

    let prefix = base.rfind('/').map(|idx| &base[..=idx]).unwrap_or_default();
    format!("{prefix}{candidate}")
}

/// Schemes the HTTP agent can fetch.
const FETCHABLE_SCHEMES: [&str; 2] = ["http", "https"];

fn is_absolute(candidate: &str) -> bool {
    Url::parse(candidate).is_ok_and(|url| FETCHABLE_SCHEMES.contains(&url.scheme()))
}

/// Returns everything after the last `/` of `url`, if non-empty.
pub fn file_name_from_url(url: &str) -> Option<&str> {
    url.rsplit('/').next().filter(|name| !name.is_empty())
}

/// Computes `<dir>/<file name of url>`.
pub fn target_path(dir: &Path, url: &str) -> Result<PathBuf, DownloadError> {
    file_name_from_url(url)
        .map(|name| dir.join(name))
        .ok_or_else(|| {
            DownloadError::NoFilename {
                url: url.to_string(),
            }
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_url_relative() {
        assert_eq!(
            resolve_url("http://x/a/b/repo.json", "stable.json"),
            "http://x/a/b/stable.json"
        );
        assert_eq!(
            resolve_url("http://x/a/b/", "stable.json"),
            "http://x/a/b/stable.json"
        );
    }

    #[test]
    fn test_resolve_url_no_normalization() {
        assert_eq!(
            resolve_url("http://x/a/b/repo.json", "../c/./d.json"),
            "http://x/a/b/../c/./d.json"
        );
        assert_eq!(
            resolve_url("http://x/repo.json", "my%20file.json"),
            "http://x/my%20file.json"
        );
    }

    #[test]
    fn test_resolve_url_absolute_candidate() {
        for candidate in ["https://cdn.example/a.exe", "http://x/b", "HTTPS://CDN.example/c"] {
            assert_eq!(resolve_url("http://x/repo.json", candidate), candidate);
        }
    }

    #[test]
    fn test_resolve_url_scheme_like_candidate_is_relative() {
        assert_eq!(
            resolve_url("http://x/r/d.json", "v1.2:win.exe"),
            "http://x/r/v1.2:win.exe"
        );
        assert_eq!(
            resolve_url("http://x/r/d.json", "mailto:someone"),
            "http://x/r/mailto:someone"
        );
        assert_eq!(
            resolve_url("http://x/r/d.json", "ftp://mirror.example/pkg.zip"),
            "http://x/r/ftp://mirror.example/pkg.zip"
        );
    }

    #[test]
    fn test_resolve_url_base_without_slash() {
        assert_eq!(resolve_url("repo.json", "stable.json"), "stable.json");
    }

    #[test]
    fn test_resolve_url_absolute_path_candidate_is_relative() {
        // A leading slash is not a scheme, so it is concatenated verbatim.
        assert_eq!(
            resolve_url("http://x/a/repo.json", "/b.json"),
            "http://x/a//b.json"
        );
    }

    #[test]
    fn test_file_name_from_url() {
        assert_eq!(file_name_from_url("http://x/dl/app-1.0.exe"), Some("app-1.0.exe"));
        assert_eq!(file_name_from_url("http://x/dl/a.exe?raw=1"), Some("a.exe?raw=1"));
        assert_eq!(file_name_from_url("http://x/dl/"), None);
        assert_eq!(file_name_from_url("plain"), Some("plain"));
    }

    #[test]
    fn test_target_path() {
        let dir = Path::new("/home/user/Downloads");
        assert_eq!(
            target_path(dir, "https://cdn.example/releases/tool.zip").unwrap(),
            PathBuf::from("/home/user/Downloads/tool.zip")
        );
        assert!(matches!(
            target_path(dir, "https://cdn.example/releases/"),
            Err(DownloadError::NoFilename { .. })
        ));
    }
}
