use miette::Diagnostic;
use pkgview_config::error::ConfigError;
use pkgview_dl::error::DownloadError;
use pkgview_registry::RegistryError;
use thiserror::Error;

#[derive(Error, Diagnostic, Debug)]
pub enum CliError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Registry(#[from] RegistryError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Download(#[from] DownloadError),

    #[error("Error while {action}: {source}")]
    #[diagnostic(code(pkgview::io))]
    IoError {
        action: String,
        source: std::io::Error,
    },

    #[error("Invalid proxy '{proxy}'")]
    #[diagnostic(
        code(pkgview::invalid_proxy),
        help("Use a proxy URL such as socks5://127.0.0.1:1080 or http://proxy:3128")
    )]
    InvalidProxy {
        proxy: String,
        #[source]
        source: ureq::Error,
    },

    #[error("Invalid header '{0}'")]
    #[diagnostic(
        code(pkgview::invalid_header),
        help("Headers must be given as 'Name: value'")
    )]
    InvalidHeader(String),
}

pub type CliResult<T> = std::result::Result<T, CliError>;

pub trait ErrorContext<T> {
    fn with_context<C>(self, context: C) -> CliResult<T>
    where
        C: FnOnce() -> String;
}

impl<T> ErrorContext<T> for std::io::Result<T> {
    fn with_context<C>(self, context: C) -> CliResult<T>
    where
        C: FnOnce() -> String,
    {
        self.map_err(|err| {
            CliError::IoError {
                action: context(),
                source: err,
            }
        })
    }
}
