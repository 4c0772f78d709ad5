//! Blocking HTTP image fetcher.

use crate::USER_AGENT;
use deck_core::{Error, ImageData, ImageFetcher, Result};
use reqwest::blocking::Client;
use reqwest::header::CONTENT_TYPE;
use std::time::Duration;
use url::Url;

/// Timeout applied to each image download.
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// Downloads images over HTTP, one synchronous request per image.
///
/// The client must be created and dropped outside an async runtime; call
/// [`ImageFetcher::fetch`] from a blocking context.
#[derive(Clone)]
pub struct HttpImageFetcher {
    client: Client,
}

impl HttpImageFetcher {
    /// Create a fetcher with the given per-request timeout.
    pub fn new(timeout: Duration) -> reqwest::Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()?;
        Ok(Self { client })
    }
}

impl ImageFetcher for HttpImageFetcher {
    fn fetch(&self, url: &Url) -> Result<ImageData> {
        let fetch_error = |reason: String| Error::Fetch {
            src: url.to_string(),
            reason,
        };

        let response = self
            .client
            .get(url.clone())
            .send()
            .and_then(|r| r.error_for_status())
            .map_err(|e| fetch_error(e.to_string()))?;

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        let bytes = response.bytes().map_err(|e| fetch_error(e.to_string()))?;
        log::debug!(
            "Fetched {} ({} bytes, {})",
            url,
            bytes.len(),
            content_type.as_deref().unwrap_or("no content type")
        );

        ImageData::probe(bytes.to_vec(), content_type.as_deref())
    }
}
