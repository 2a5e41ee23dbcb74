use crate::types::*;
use anyhow::{anyhow, Result};
use reqwest::StatusCode;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, warn};
use url::Url;

/// Path of the backend search endpoint, relative to the configured base URL.
pub const SEARCH_PATH: &str = "api/search";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SearchError {
    /// The backend answered, but with a failure status or an `error` payload.
    #[error("{message}")]
    Service { status: u16, message: String },
    /// The request never produced a usable response.
    #[error("{0}")]
    Transport(String),
}

impl SearchError {
    /// Text shown to the user for this failure.
    pub fn message(&self) -> &str {
        match self {
            SearchError::Service { message, .. } => message,
            SearchError::Transport(message) => message,
        }
    }
}

impl From<reqwest::Error> for SearchError {
    fn from(e: reqwest::Error) -> Self {
        SearchError::Transport(e.to_string())
    }
}

/// HTTP client for the backend search service.
#[derive(Clone, Debug)]
pub struct SearchClient {
    endpoint: Url,
    http_client: reqwest::Client,
}

impl SearchClient {
    pub fn new(base_url: &str, http_client: reqwest::Client) -> Result<Self> {
        Ok(Self {
            endpoint: search_endpoint(base_url)?,
            http_client,
        })
    }

    /// Builds a client with its own reqwest client using `timeout`.
    pub fn with_timeout(base_url: &str, timeout: Duration) -> Result<Self> {
        let http_client = reqwest::Client::builder().timeout(timeout).build()?;
        Self::new(base_url, http_client)
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Sends exactly one `POST` to the search endpoint. Never retries.
    pub async fn search(&self, request: &SearchRequest) -> Result<SearchResult, SearchError> {
        info!("Searching {} for: {}", request.site, request.question);
        debug!("Search URL: {}", self.endpoint);

        let resp = self
            .http_client
            .post(self.endpoint.clone())
            .header("Accept", "application/json")
            .json(request)
            .send()
            .await?;

        let status = resp.status();
        let body = resp.bytes().await?;
        debug!("Search service answered {} with {} bytes", status, body.len());

        // The `error` field is read on its own so a malformed sibling field
        // cannot hide it.
        let error = serde_json::from_slice::<ErrorBody>(&body)
            .ok()
            .and_then(|b| b.error)
            .filter(|m| !m.is_empty());

        if !status.is_success() {
            let message = error.unwrap_or_else(|| status_text(status));
            warn!("Search service failed with status {}: {}", status, message);
            return Err(SearchError::Service {
                status: status.as_u16(),
                message,
            });
        }

        if let Some(message) = error {
            warn!("Search service reported an error: {}", message);
            return Err(SearchError::Service {
                status: status.as_u16(),
                message,
            });
        }

        let result = serde_json::from_slice::<SearchResult>(&body)
            .map_err(|e| SearchError::Transport(format!("Failed to parse search response: {}", e)))?;

        debug!("Search service returned {} citations", result.citations.len());
        Ok(result)
    }
}

/// Resolves `<base>/api/search`, keeping any path prefix on the base URL.
pub fn search_endpoint(base_url: &str) -> Result<Url> {
    let mut base = Url::parse(base_url.trim())
        .map_err(|e| anyhow!("Invalid search service URL '{}': {}", base_url, e))?;
    if base.scheme() != "http" && base.scheme() != "https" {
        return Err(anyhow!("Search service URL must use HTTP or HTTPS protocol"));
    }
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }
    Ok(base.join(SEARCH_PATH)?)
}

fn status_text(status: StatusCode) -> String {
    status
        .canonical_reason()
        .map(str::to_string)
        .unwrap_or_else(|| status.as_u16().to_string())
}
