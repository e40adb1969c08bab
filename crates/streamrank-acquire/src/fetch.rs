use std::time::Duration;
use thiserror::Error;

/// Wikipedia's ranking of the most-streamed songs on Spotify.
pub const SOURCE_URL: &str = "https://en.wikipedia.org/wiki/List_of_most-streamed_songs_on_Spotify";

/// Sent as-is; Wikipedia rejects requests without a browser-like agent.
pub const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64)";

pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Where and how to fetch the ranking page.
#[derive(Debug, Clone)]
pub struct FetchOptions {
    pub url: String,
    pub user_agent: String,
    /// Deadline for the whole request, connect through body.
    pub timeout: Duration,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            url: SOURCE_URL.to_string(),
            user_agent: USER_AGENT.to_string(),
            timeout: REQUEST_TIMEOUT,
        }
    }
}

/// A network-layer failure: the page could not be retrieved.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("HTTP {status} for {url}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },
}

impl FetchError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, FetchError::Request { source, .. } if source.is_timeout())
    }
}

/// Perform a single GET and return the body text.
///
/// Any transport error, timeout, or non-success status is a `FetchError`.
/// There is no retry.
pub async fn fetch_page(options: &FetchOptions) -> Result<String, FetchError> {
    let url = options.url.as_str();
    let request_error = |source| FetchError::Request {
        url: url.to_string(),
        source,
    };

    let client = reqwest::Client::builder()
        .user_agent(options.user_agent.as_str())
        .timeout(options.timeout)
        .build()
        .map_err(request_error)?;

    let response = client.get(url).send().await.map_err(request_error)?;

    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::Status {
            url: url.to_string(),
            status,
        });
    }

    response.text().await.map_err(request_error)
}
