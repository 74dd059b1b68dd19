//! Where documents come from.

use pkgview_dl::http::Http;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::{RegistryError, Result};

/// Fetches the raw body of a document by URL.
pub trait Source {
    fn fetch(&self, url: &str) -> Result<Vec<u8>>;
}

/// Fetches documents over HTTP with the shared agent.
#[derive(Clone, Copy, Debug, Default)]
pub struct HttpSource;

impl Source for HttpSource {
    fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        Ok(Http::bytes(url)?)
    }
}

/// Fetches `url` from `source` and deserializes it as JSON.
pub fn fetch_json<T, S>(source: &S, url: &str) -> Result<T>
where
    T: DeserializeOwned,
    S: Source + ?Sized,
{
    let body = source.fetch(url)?;
    debug!("Fetched {} bytes from {}", body.len(), url);
    serde_json::from_slice(&body).map_err(|source| {
        RegistryError::Json {
            url: url.to_string(),
            source,
        }
    })
}


#[cfg(test)]
mod tests {
    use pkgview_dl::error::DownloadError;
    use serde::Deserialize;

    use super::{memory::MemorySource, *};

    #[derive(Debug, Deserialize)]
    struct Doc {
        name: String,
    }

    #[test]
    fn test_fetch_json() {
        let source = MemorySource::default().with("http://x/doc.json", r#"{"name":"x"}"#);
        let doc: Doc = fetch_json(&source, "http://x/doc.json").unwrap();
        assert_eq!(doc.name, "x");
    }

    #[test]
    fn test_fetch_json_malformed() {
        let source = MemorySource::default().with("http://x/doc.json", "<html>");
        let err = fetch_json::<Doc, _>(&source, "http://x/doc.json").unwrap_err();
        assert!(matches!(err, RegistryError::Json { ref url, .. } if url == "http://x/doc.json"));
    }

    #[test]
    fn test_fetch_json_missing_document() {
        let source = MemorySource::default();
        let err = fetch_json::<Doc, _>(&source, "http://x/none.json").unwrap_err();
        assert!(matches!(
            err,
            RegistryError::Fetch(DownloadError::HttpError { status: 404, .. })
        ));
    }
}
