//! Image retrieval collaborator.

use std::io::Read;
use std::time::Duration;

use thiserror::Error;
use tracing::debug;
use ureq::Agent;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] ureq::Error),

    #[error("Failed to read HTTP body: {0}")]
    Io(#[from] std::io::Error),
}

/// Binary image content with its advertised mime type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImageContent {
    pub data: Vec<u8>,
    pub mime_type: String,
}

/// Resolves an image URL into binary content.
///
/// Fetching happens on the caller's thread and may block; retry and
/// rate-limit policy belongs to implementations, not to the mapper.
pub trait ImageFetcher: Send + Sync {
    fn fetch(&self, url: &str) -> Result<ImageContent, FetchError>;
}

const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// Blocking HTTP fetcher with a global per-request timeout.
pub struct HttpImageFetcher {
    agent: Agent,
}

impl HttpImageFetcher {
    pub fn new() -> Self {
        Self::with_timeout(DEFAULT_FETCH_TIMEOUT)
    }

    pub fn with_timeout(timeout: Duration) -> Self {
        let config = Agent::config_builder()
            .timeout_global(Some(timeout))
            .build();

        Self {
            agent: config.into(),
        }
    }
}

impl Default for HttpImageFetcher {
    fn default() -> Self {
        Self::new()
    }
}

impl ImageFetcher for HttpImageFetcher {
    fn fetch(&self, url: &str) -> Result<ImageContent, FetchError> {
        debug!("Fetching image at {}", url);

        let response = self.agent.get(url).call()?;

        // response: http::Response<ureq::Body>
        let (parts, body) = response.into_parts();

        let mime_type = parts
            .headers
            .get("content-type")
            .and_then(|value| value.to_str().ok())
            .unwrap_or("application/octet-stream")
            .to_string();

        let mut data = Vec::new();
        body.into_reader().read_to_end(&mut data)?;

        Ok(ImageContent { data, mime_type })
    }
}
