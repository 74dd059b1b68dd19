use std::{
    io::{self, Write},
    path::{Path, PathBuf},
    sync::OnceLock,
};

use nu_ansi_term::Color::{Blue, Cyan, Green, Yellow};
use pkgview_config::config::Config;
use pkgview_dl::{
    download::Download,
    types::{DownloadStatus, OverwriteMode},
    utils::{file_name_from_url, target_path},
};
use pkgview_registry::{
    release::{resolve_release, Resolution, Target},
    HttpSource, RepositorySession, SessionEvent, Source, Stage,
};
use tracing::{info, warn};

use crate::{
    error::{CliResult, ErrorContext},
    progress::{create_download_job, handle_download_progress, Step},
    utils::{interactive_ask, Colored},
};

/// Where a download goes and what to do about an existing file.
pub struct DownloadOptions {
    pub yes: bool,
    pub output: Option<PathBuf>,
}

pub fn target_from_config(config: &Config) -> Target {
    Target::new(&config.platform, &config.arch)
}

fn stage_label(stage: Stage) -> &'static str {
    match stage {
        Stage::FetchRepoList => "Getting repo list",
        Stage::SelectRepo => "Choosing repo",
        Stage::FetchRepo => "Getting repo info",
        Stage::FetchCatalog => "Getting package list",
    }
}

/// Resolves the repository, its branch manifest and the package catalog,
/// reporting each step.
pub fn open_session<S: Source + ?Sized>(source: &S, config: &Config) -> CliResult<RepositorySession> {
    let mut step: Option<Step> = None;
    let mut report = |event: SessionEvent<'_>| {
        match event {
            SessionEvent::Started(stage) => step = Some(Step::start(stage_label(stage))),
            SessionEvent::Finished(_) => {
                if let Some(step) = step.take() {
                    step.done();
                }
            }
            SessionEvent::RepoLoaded {
                repo,
                branch,
                ..
            } => {
                info!("");
                info!("Using repo: {}", Colored(Cyan, field_or_unknown(&repo.name)));
                info!("Description: {}", field_or_unknown(&repo.description));
                info!("Maintainer: {}", field_or_unknown(&repo.maintainer));
                info!("");
                info!("Using branch: {}", Colored(Cyan, branch));
            }
        }
    };

    let session = match &config.repository {
        Some(url) => RepositorySession::open_with(source, url, &config.branch, &mut report),
        None => {
            RepositorySession::discover_with(
                source,
                &config.repo_list_url,
                &config.branch,
                &mut report,
            )
        }
    };

    Ok(session?)
}

fn field_or_unknown(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or("unknown")
}

/// Writes the numbered package list. This is the program's output rather
/// than a log, so `-q` does not hide it.
pub fn list_packages<W: Write>(session: &RepositorySession, out: &mut W) -> CliResult<()> {
    let mut write = || -> io::Result<()> {
        writeln!(out)?;
        writeln!(out, "Listing packages...")?;
        for (idx, package) in session.packages.iter().enumerate() {
            writeln!(out, "\t{}. {}", idx + 1, Colored(Blue, &package.name))?;
        }
        writeln!(out)
    };
    write().with_context(|| "writing package list".to_string())?;

    if session.packages.is_empty() {
        warn!("Branch {} has no packages", session.branch);
    }
    Ok(())
}

/// Lists the catalog, asks for a package name and downloads it.
pub fn browse(config: &Config, options: DownloadOptions) -> CliResult<()> {
    let session = open_session(&HttpSource, config)?;

    list_packages(&session, &mut io::stdout().lock())?;
    println!("Enter package to download");
    let name = interactive_ask("> ")?;

    download_package(&HttpSource, config, &session, &name, options)
}

/// Resolves `name` to an artifact for the configured target and downloads it.
///
/// An unknown package, a release without a matching artifact or a declined
/// overwrite are reported and end the run successfully.
pub fn download_package<S: Source + ?Sized>(
    source: &S,
    config: &Config,
    session: &RepositorySession,
    name: &str,
    options: DownloadOptions,
) -> CliResult<()> {
    let target = target_from_config(config);

    let step = Step::start("Finding suitable release");
    let download_url = match resolve_release(source, session, name, &target)? {
        Resolution::Found { download_url, .. } => {
            step.done();
            download_url
        }
        Resolution::PackageNotFound => {
            drop(step);
            info!("package not found: {}", Colored(Yellow, name));
            return Ok(());
        }
        Resolution::NoSuitableRelease => {
            drop(step);
            info!(
                "no suitable release of {} for {}/{}",
                Colored(Yellow, name),
                target.platform,
                target.arch
            );
            return Ok(());
        }
    };

    let dir = match options.output {
        Some(dir) => dir,
        None => config.get_download_dir()?,
    };

    info!("");
    info!("Download folder: {}", dir.display());

    let path = target_path(&dir, &download_url)?;
    let mode = if options.yes {
        OverwriteMode::Force
    } else {
        OverwriteMode::Prompt
    };

    match fetch_artifact(&download_url, &path, mode)? {
        DownloadStatus::Downloaded { path, bytes } => {
            info!("Downloading... {}", Colored(Green, "Done!"));
            info!("Saved {} ({} bytes)", path.display(), bytes);
        }
        DownloadStatus::Kept { .. } => info!("Aborted!"),
    }

    Ok(())
}

fn fetch_artifact(url: &str, path: &Path, mode: OverwriteMode) -> CliResult<DownloadStatus> {
    let prefix = file_name_from_url(url).unwrap_or("download").to_string();
    // Created on the first event so it never draws over the overwrite prompt.
    let bar = OnceLock::new();

    let status = Download::new(url, path)
        .overwrite(mode)
        .progress(move |state| {
            let pb = bar.get_or_init(|| create_download_job(&prefix));
            handle_download_progress(state, pb);
        })
        .execute()?;

    Ok(status)
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use pkgview_dl::error::DownloadError;
    use pkgview_registry::{documents::PackageEntry, RegistryError};

    use super::*;

    struct Fixture(HashMap<&'static str, &'static str>);

    impl Source for Fixture {
        fn fetch(&self, url: &str) -> pkgview_registry::Result<Vec<u8>> {
            self.0
                .get(url)
                .map(|body| body.as_bytes().to_vec())
                .ok_or_else(|| {
                    RegistryError::Fetch(DownloadError::HttpError {
                        status: 404,
                        url: url.to_string(),
                    })
                })
        }
    }

    fn fixture() -> Fixture {
        Fixture(HashMap::from([
            (
                "https://martinmimigames.github.io/repo_list.json",
                r#"{"version":"1","repo_list":["http://x/repo.json"]}"#,
            ),
            (
                "http://x/repo.json",
                r#"{"name":"X","release_type":{"stable":"stable.json"}}"#,
            ),
            (
                "http://x/stable.json",
                r#"{"packages":[{"name":"foo","url":"foo.json"}]}"#,
            ),
            (
                "http://x/foo.json",
                r#"{"latest":{"url":"foo/downloads.json"}}"#,
            ),
            (
                "http://x/foo/downloads.json",
                r#"{"downloads":[{"platform":"linux","arch":"*","file":"foo"}]}"#,
            ),
        ]))
    }

    #[test]
    fn test_open_session_through_repo_list() {
        let session = open_session(&fixture(), &Config::default()).unwrap();

        assert_eq!(session.repo_url, "http://x/repo.json");
        assert_eq!(session.branch_url, "http://x/stable.json");
        assert_eq!(
            session.packages,
            vec![PackageEntry {
                name: "foo".into(),
                url: "foo.json".into(),
            }]
        );
    }

    #[test]
    fn test_open_session_with_pinned_repository() {
        let mut source = fixture();
        source.0.remove("https://martinmimigames.github.io/repo_list.json");

        let config = Config {
            repository: Some("http://x/repo.json".into()),
            ..Config::default()
        };
        let session = open_session(&source, &config).unwrap();
        assert_eq!(session.packages.len(), 1);
    }

    #[test]
    fn test_list_packages_output() {
        let session = open_session(&fixture(), &Config::default()).unwrap();
        let mut out = Vec::new();
        list_packages(&session, &mut out).unwrap();

        let printed = String::from_utf8(out).unwrap();
        assert!(printed.contains("Listing packages...\n"));
        assert!(printed.contains("\t1. "));
        assert!(printed.contains("foo"));
    }

    #[test]
    fn test_stage_labels() {
        assert_eq!(stage_label(Stage::FetchRepoList), "Getting repo list");
        assert_eq!(stage_label(Stage::FetchCatalog), "Getting package list");
    }

    #[test]
    fn test_open_session_missing_branch() {
        let config = Config {
            branch: "beta".into(),
            ..Config::default()
        };
        assert!(open_session(&fixture(), &config).is_err());
    }

    #[test]
    fn test_graceful_outcomes_do_not_download() {
        let session = open_session(&fixture(), &Config::default()).unwrap();
        let dir = std::path::PathBuf::from("/nonexistent/pkgview-test");

        for name in ["Foo", "foo"] {
            download_package(
                &fixture(),
                &Config::default(),
                &session,
                name,
                DownloadOptions {
                    yes: true,
                    output: Some(dir.clone()),
                },
            )
            .unwrap();
        }
        assert!(!dir.exists());
    }

    #[test]
    fn test_target_from_config() {
        let config = Config {
            platform: "linux".into(),
            arch: "aarch64".into(),
            ..Config::default()
        };
        assert_eq!(target_from_config(&config), Target::new("linux", "aarch64"));
        assert_eq!(target_from_config(&Config::default()), Target::default());
    }
}
