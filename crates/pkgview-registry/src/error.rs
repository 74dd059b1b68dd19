//! Error types for the registry crate.

use miette::Diagnostic;
use thiserror::Error;

/// Errors that can occur while discovering a repository or resolving a
/// release.
///
/// Lookups that simply come up empty (an unknown package, no artifact for
/// the target) are not errors; see [`Resolution`](crate::release::Resolution).
#[derive(Error, Diagnostic, Debug)]
pub enum RegistryError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Fetch(#[from] pkgview_dl::error::DownloadError),

    #[error("Failed to parse {url}: {source}")]
    #[diagnostic(
        code(pkgview_registry::json),
        help("The document is not valid JSON or does not have the expected fields")
    )]
    Json {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid repository list version: {0}")]
    #[diagnostic(
        code(pkgview_registry::invalid_version),
        help("The `version` field must be a number")
    )]
    InvalidVersion(String),

    #[error("No repositories available")]
    #[diagnostic(
        code(pkgview_registry::no_repositories),
        help("The repository list is empty or uses an unsupported version")
    )]
    NoRepositories,

    #[error("Branch '{branch}' not found in repository")]
    #[diagnostic(
        code(pkgview_registry::branch_not_found),
        help("Available branches: {}", .available.join(", "))
    )]
    BranchNotFound {
        branch: String,
        available: Vec<String>,
    },
}

/// A specialized Result type for registry operations.
pub type Result<T> = std::result::Result<T, RegistryError>;
