//! Image download with a bounded timeout.
//!
//! Fetch failures are recoverable by contract: a mutation whose image
//! cannot be downloaded proceeds without it and leaves the template's
//! original picture untouched.

use std::time::Duration;
use thiserror::Error;

/// Hard ceiling on any single image download.
pub const FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// Why an image could not be fetched.
#[derive(Error, Debug)]
pub enum FetchError {
    /// Network failure, DNS error, or timeout
    #[error("image request failed: {0}")]
    Transport(String),

    /// Responded, but not with a success status
    #[error("image request returned status {0}")]
    Status(u16),
}

/// Resolves an image reference to its bytes.
///
/// The engine takes this as an injected dependency so orchestration code
/// and tests can substitute their own resolution (or none at all).
pub trait ImageFetcher {
    fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError>;
}

/// HTTP fetcher backed by a blocking reqwest client.
pub struct HttpImageFetcher {
    client: reqwest::blocking::Client,
}

impl HttpImageFetcher {
    /// Build a fetcher with the engine's fixed timeout.
    pub fn new() -> Result<Self, FetchError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(FETCH_TIMEOUT)
            .build()
            .map_err(|e| FetchError::Transport(e.to_string()))?;
        Ok(Self { client })
    }
}

impl ImageFetcher for HttpImageFetcher {
    fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        let response = self
            .client
            .get(url)
            .send()
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        response
            .bytes()
            .map(|bytes| bytes.to_vec())
            .map_err(|e| FetchError::Transport(e.to_string()))
    }
}

#[cfg(test)]
pub(crate) mod stubs {
    use super::*;
    use std::collections::HashMap;

    /// Fetcher that serves a fixed URL → bytes map; everything else is
    /// unreachable.
    pub(crate) struct MapFetcher {
        responses: HashMap<String, Vec<u8>>,
    }

    impl MapFetcher {
        pub(crate) fn new(responses: impl IntoIterator<Item = (String, Vec<u8>)>) -> Self {
            Self {
                responses: responses.into_iter().collect(),
            }
        }

        pub(crate) fn empty() -> Self {
            Self::new([])
        }
    }

    impl ImageFetcher for MapFetcher {
        fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError> {
            self.responses
                .get(url)
                .cloned()
                .ok_or_else(|| FetchError::Transport(format!("unreachable host: {url}")))
        }
    }
}
