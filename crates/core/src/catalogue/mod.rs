//! Library catalogue clients.
//!
//! Two backends are supported:
//! - the online library, a digital lending catalogue answering with HTML pages
//! - a Wise branch catalogue answering with JSON, which also exposes per-copy
//!   availability and extended title details
//!
//! Clients only fetch. Turning bodies into candidates is the matcher's job.

mod online_library;
mod types;
mod wise;

pub use online_library::OnlineLibraryClient;
pub use types::*;
pub use wise::WiseClient;

use async_trait::async_trait;
use thiserror::Error;

/// Network-level failures. Each one is recovered per entry by the pipeline.
#[derive(Debug, Error)]
pub enum CatalogueError {
    #[error("Request timed out")]
    Timeout,

    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("HTTP {status}: {message}")]
    HttpStatus { status: u16, message: String },

    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Failed to build HTTP client: {0}")]
    ClientBuild(String),
}

impl CatalogueError {
    /// Classify a transport error.
    pub(crate) fn from_transport(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            CatalogueError::Timeout
        } else if e.is_connect() {
            CatalogueError::ConnectionFailed(e.to_string())
        } else {
            CatalogueError::Request(e)
        }
    }
}

/// Read a response body, failing on non-2xx statuses.
pub(crate) async fn read_body(response: reqwest::Response) -> Result<String, CatalogueError> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(CatalogueError::HttpStatus {
            status: status.as_u16(),
            message: body.chars().take(200).collect(),
        });
    }

    response.text().await.map_err(CatalogueError::from_transport)
}

/// Searches a catalogue for a title.
#[async_trait]
pub trait SearchClient: Send + Sync {
    /// Name of this catalogue for logging.
    fn name(&self) -> &str;

    /// Run one search and return the raw body.
    async fn search(&self, query: &SearchQuery) -> Result<RawResponse, CatalogueError>;
}

/// Per-title holdings lookups offered by branch catalogues.
#[async_trait]
pub trait HoldingsClient: Send + Sync {
    /// Copy-level records for a title, as a raw JSON list.
    async fn copies(&self, external_id: &str) -> Result<String, CatalogueError>;

    /// Extended descriptive fields for a title, as a raw JSON object.
    async fn details(&self, external_id: &str) -> Result<String, CatalogueError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CatalogueError::HttpStatus {
            status: 503,
            message: "unavailable".to_string(),
        };
        assert_eq!(err.to_string(), "HTTP 503: unavailable");
        assert_eq!(CatalogueError::Timeout.to_string(), "Request timed out");
        assert_eq!(
            CatalogueError::ClientBuild("no TLS backend".to_string()).to_string(),
            "Failed to build HTTP client: no TLS backend"
        );
    }
}
