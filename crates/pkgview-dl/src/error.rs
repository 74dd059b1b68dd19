use miette::Diagnostic;
use thiserror::Error;

#[derive(Error, Diagnostic, Debug)]
pub enum DownloadError {
    #[error("Invalid URL: {url}")]
    #[diagnostic(
        code(pkgview_dl::invalid_url),
        help("Only absolute http(s) URLs can be fetched")
    )]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error(transparent)]
    #[diagnostic(
        code(pkgview_dl::network),
        help("Check your internet connection or try again later")
    )]
    Network(Box<ureq::Error>),

    #[error("HTTP {status}: {url}")]
    #[diagnostic(code(pkgview_dl::http_error))]
    HttpError { status: u16, url: String },

    #[error("I/O error: {0}")]
    #[diagnostic(code(pkgview_dl::io))]
    Io(#[from] std::io::Error),

    #[error("Invalid response from {url}")]
    #[diagnostic(code(pkgview_dl::invalid_response))]
    InvalidResponse {
        url: String,
        #[source]
        source: Box<ureq::Error>,
    },

    #[error("File name could not be determined from {url}")]
    #[diagnostic(
        code(pkgview_dl::no_filename),
        help("The download URL must end with a file name")
    )]
    NoFilename { url: String },
}

impl DownloadError {
    /// Converts a `ureq::Error` raised while requesting `url`.
    ///
    /// Status errors keep the status code and URL so they render as
    /// `HTTP 404: <url>`; everything else is a network failure.
    pub fn from_ureq(err: ureq::Error, url: &str) -> Self {
        match err {
            ureq::Error::StatusCode(status) => {
                Self::HttpError {
                    status,
                    url: url.to_string(),
                }
            }
            err => Self::Network(Box::new(err)),
        }
    }
}
