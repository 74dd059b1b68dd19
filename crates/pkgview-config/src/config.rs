use std::{
    env, fs,
    path::{Path, PathBuf},
    time::Duration,
};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use url::Url;

use crate::{
    error::{ConfigError, Result},
    paths::{absolute, downloads_dir, expand_path, xdg_config_home},
};

pub const DEFAULT_REPO_LIST_URL: &str = "https://martinmimigames.github.io/repo_list.json";
pub const DEFAULT_BRANCH: &str = "stable";
pub const DEFAULT_PLATFORM: &str = "windows";
pub const DEFAULT_ARCH: &str = "x86_64";

/// Application's configuration
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// URL of the document listing known repositories.
    /// Default: https://martinmimigames.github.io/repo_list.json
    pub repo_list_url: String,

    /// Repository document to use directly, skipping the repository list.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repository: Option<String>,

    /// Release channel looked up in the repository's `release_type` map.
    /// Default: stable
    pub branch: String,

    /// Platform that download entries are matched against.
    /// Default: windows
    pub platform: String,

    /// Architecture that download entries are matched against.
    /// Default: x86_64
    pub arch: String,

    /// Directory downloads are written to.
    /// Default: ~/Downloads
    #[serde(skip_serializing_if = "Option::is_none")]
    pub download_dir: Option<String>,

    /// User agent sent with every request.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,

    /// Global request timeout in seconds. Requests never time out when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            repo_list_url: DEFAULT_REPO_LIST_URL.to_string(),
            repository: None,
            branch: DEFAULT_BRANCH.to_string(),
            platform: DEFAULT_PLATFORM.to_string(),
            arch: DEFAULT_ARCH.to_string(),
            download_dir: None,
            user_agent: None,
            timeout_secs: None,
        }
    }
}

/// Location of the configuration file: `$PKGVIEW_CONFIG`, or
/// `$XDG_CONFIG_HOME/pkgview/config.toml`.
pub fn default_config_path() -> PathBuf {
    match env::var_os("PKGVIEW_CONFIG") {
        Some(path) => PathBuf::from(path),
        None => xdg_config_home().join("pkgview").join("config.toml"),
    }
}

impl Config {
    /// Loads the configuration from `path` (or [`default_config_path`]).
    ///
    /// A missing file yields the defaults. Environment overrides are applied
    /// before validation.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config_path = match path {
            Some(path) => path.to_path_buf(),
            None => default_config_path(),
        };

        let mut config = match fs::read_to_string(&config_path) {
            Ok(content) => {
                debug!("Loaded configuration from {}", config_path.display());
                toml::from_str(&content)?
            }
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                debug!(
                    "No configuration at {}, using defaults",
                    config_path.display()
                );
                Self::default()
            }
            Err(err) => return Err(ConfigError::IoError(err)),
        };

        config.apply_env_overrides();
        config.resolve()?;

        Ok(config)
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(branch) = env::var("PKGVIEW_BRANCH") {
            self.branch = branch;
        }
        if let Ok(dir) = env::var("PKGVIEW_DOWNLOAD_DIR") {
            self.download_dir = Some(dir);
        }
    }

    /// Validates the configuration and normalizes blank optional values.
    pub fn resolve(&mut self) -> Result<()> {
        self.branch = self.branch.trim().to_string();
        self.platform = self.platform.trim().to_string();
        self.arch = self.arch.trim().to_string();

        for (field, value) in [
            ("branch", &self.branch),
            ("platform", &self.platform),
            ("arch", &self.arch),
        ] {
            if value.is_empty() {
                return Err(ConfigError::EmptyValue(field));
            }
        }

        validate_url("repo_list_url", &self.repo_list_url)?;

        if self.repository.as_deref().is_some_and(|r| r.trim().is_empty()) {
            self.repository = None;
        }
        if let Some(repository) = &self.repository {
            validate_url("repository", repository)?;
        }

        Ok(())
    }

    /// Directory downloads are written to, with `~` and variables expanded.
    pub fn get_download_dir(&self) -> Result<PathBuf> {
        match self.download_dir.as_deref() {
            Some(dir) => absolute(&expand_path(dir)?),
            None => Ok(downloads_dir()),
        }
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }

    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }
}

fn validate_url(field: &'static str, value: &str) -> Result<()> {
    Url::parse(value).map(|_| ()).map_err(|source| {
        ConfigError::InvalidUrl {
            field,
            value: value.to_string(),
            source,
        }
    })
}

/// Writes the default configuration to `path`, refusing to replace an
/// existing file.
pub fn generate_default_config(path: &Path) -> Result<()> {
    if path.exists() {
        return Err(ConfigError::ConfigAlreadyExists(
            path.display().to_string(),
        ));
    }

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, Config::default().to_toml()?)?;
    info!("Default configuration file generated at: {}", path.display());

    Ok(())
}
