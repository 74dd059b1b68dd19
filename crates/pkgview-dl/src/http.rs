use tracing::debug;
use ureq::{http::Response, Body};
use url::Url;

use crate::{error::DownloadError, http_client::SHARED_AGENT};

/// Upper bound for a buffered JSON document.
const MAX_DOCUMENT_SIZE: u64 = 16 * 1024 * 1024;

pub struct Http;

impl Http {
    /// Sends a GET request and returns the response with its body unread.
    ///
    /// `url` must be an absolute URL. A relative one (for example resolved
    /// against a base without any `/`) is rejected before anything is sent.
    pub fn fetch(url: &str) -> Result<Response<Body>, DownloadError> {
        Url::parse(url).map_err(|source| {
            DownloadError::InvalidUrl {
                url: url.to_string(),
                source,
            }
        })?;

        debug!(url, "GET");
        SHARED_AGENT
            .get(url)
            .call()
            .map_err(|err| DownloadError::from_ureq(err, url))
    }

    /// Fetches `url` and buffers the whole body in memory.
    pub fn bytes(url: &str) -> Result<Vec<u8>, DownloadError> {
        let mut resp = Self::fetch(url)?;
        resp.body_mut()
            .with_config()
            .limit(MAX_DOCUMENT_SIZE)
            .read_to_vec()
            .map_err(|err| {
                DownloadError::InvalidResponse {
                    url: url.to_string(),
                    source: Box::new(err),
                }
            })
    }
}
