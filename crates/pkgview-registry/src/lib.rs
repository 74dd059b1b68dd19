//! Repository discovery and release resolution for pkgview.
//!
//! A run walks a chain of JSON documents:
//! - the **repository list**, naming candidate repositories
//! - the **repository document**, mapping branches to manifests
//! - the **branch manifest**, listing packages
//! - a package's **release index**, pointing at its latest release
//! - the release's **downloads index**, listing per-platform artifacts
//!
//! # Example
//!
//! ```no_run
//! use pkgview_registry::{
//!     release::{resolve_release, Resolution, Target},
//!     HttpSource, RepositorySession,
//! };
//!
//! fn find(name: &str) -> pkgview_registry::Result<Option<String>> {
//!     let session = RepositorySession::discover(
//!         &HttpSource,
//!         "https://martinmimigames.github.io/repo_list.json",
//!         "stable",
//!     )?;
//!     match resolve_release(&HttpSource, &session, name, &Target::default())? {
//!         Resolution::Found { download_url, .. } => Ok(Some(download_url)),
//!         _ => Ok(None),
//!     }
//! }
//! ```

pub mod documents;
pub mod error;
pub mod release;
pub mod repo;
pub mod session;
pub mod source;

pub use error::{RegistryError, Result};
pub use session::{RepositorySession, SessionEvent, Stage};
pub use source::{HttpSource, Source};
