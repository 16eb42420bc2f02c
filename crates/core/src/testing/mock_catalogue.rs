//! Mock catalogue clients for testing.

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::catalogue::{
    CatalogueError, HoldingsClient, RawResponse, ResponseFormat, SearchClient, SearchQuery,
};

/// Mock implementation of the SearchClient trait.
///
/// Provides controllable behavior for testing:
/// - Return configured bodies per query text
/// - Fail selected queries with a connection error
/// - Record every query for assertions
///
/// # Example
///
/// ```rust,ignore
/// use shelfcheck_core::testing::{MockSearchClient, fixtures};
///
/// let search = MockSearchClient::json("https://example.org/detail/");
/// search.set_body("Heen", fixtures::wise_search_body(&[("1", "Verhagen, Laurens", "Heen")])).await;
/// search.fail_query("Stoner").await;
/// ```
#[derive(Debug, Clone)]
pub struct MockSearchClient {
    format: ResponseFormat,
    link_base: String,
    bodies: Arc<RwLock<HashMap<String, String>>>,
    failing: Arc<RwLock<HashSet<String>>>,
    queries: Arc<RwLock<Vec<SearchQuery>>>,
}

impl MockSearchClient {
    /// Create a mock answering with HTML result pages.
    pub fn html(link_base: &str) -> Self {
        Self::new(ResponseFormat::Html, link_base)
    }

    /// Create a mock answering with Wise JSON.
    pub fn json(link_base: &str) -> Self {
        Self::new(ResponseFormat::Json, link_base)
    }

    fn new(format: ResponseFormat, link_base: &str) -> Self {
        Self {
            format,
            link_base: link_base.to_string(),
            bodies: Arc::new(RwLock::new(HashMap::new())),
            failing: Arc::new(RwLock::new(HashSet::new())),
            queries: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Set the body returned for a query text.
    pub async fn set_body(&self, query_text: &str, body: impl Into<String>) {
        self.bodies
            .write()
            .await
            .insert(query_text.to_string(), body.into());
    }

    /// Make searches for a query text fail with a connection error.
    pub async fn fail_query(&self, query_text: &str) {
        self.failing.write().await.insert(query_text.to_string());
    }

    /// Get all recorded queries.
    pub async fn recorded_queries(&self) -> Vec<SearchQuery> {
        self.queries.read().await.clone()
    }

    fn empty_body(&self) -> String {
        match self.format {
            ResponseFormat::Html => "<html><body></body></html>".to_string(),
            ResponseFormat::Json => r#"{"objects": []}"#.to_string(),
        }
    }
}

#[async_trait]
impl SearchClient for MockSearchClient {
    fn name(&self) -> &str {
        "mock"
    }

    async fn search(&self, query: &SearchQuery) -> Result<RawResponse, CatalogueError> {
        self.queries.write().await.push(query.clone());

        if self.failing.read().await.contains(&query.query_text) {
            return Err(CatalogueError::ConnectionFailed(format!(
                "mock connection refused for '{}'",
                query.query_text
            )));
        }

        let body = self
            .bodies
            .read()
            .await
            .get(&query.query_text)
            .cloned()
            .unwrap_or_else(|| self.empty_body());

        Ok(RawResponse {
            format: self.format,
            body,
            link_base: self.link_base.clone(),
        })
    }
}

/// Mock implementation of the HoldingsClient trait.
///
/// Unknown titles have no copies (`[]`) and no details (`{}`).
#[derive(Debug, Clone, Default)]
pub struct MockHoldingsClient {
    copies: Arc<RwLock<HashMap<String, String>>>,
    details: Arc<RwLock<HashMap<String, String>>>,
    failing_copies: Arc<RwLock<HashSet<String>>>,
    failing_details: Arc<RwLock<HashSet<String>>>,
    copy_requests: Arc<RwLock<Vec<String>>>,
}

impl MockHoldingsClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the copy list body for a title.
    pub async fn set_copies(&self, external_id: &str, body: impl Into<String>) {
        self.copies
            .write()
            .await
            .insert(external_id.to_string(), body.into());
    }

    /// Set the details body for a title.
    pub async fn set_details(&self, external_id: &str, body: impl Into<String>) {
        self.details
            .write()
            .await
            .insert(external_id.to_string(), body.into());
    }

    /// Make copy lookups for a title time out.
    pub async fn fail_copies(&self, external_id: &str) {
        self.failing_copies
            .write()
            .await
            .insert(external_id.to_string());
    }

    /// Make details lookups for a title return HTTP 500.
    pub async fn fail_details(&self, external_id: &str) {
        self.failing_details
            .write()
            .await
            .insert(external_id.to_string());
    }

    /// Titles whose copies were requested, in order.
    pub async fn copy_requests(&self) -> Vec<String> {
        self.copy_requests.read().await.clone()
    }
}

#[async_trait]
impl HoldingsClient for MockHoldingsClient {
    async fn copies(&self, external_id: &str) -> Result<String, CatalogueError> {
        self.copy_requests
            .write()
            .await
            .push(external_id.to_string());

        if self.failing_copies.read().await.contains(external_id) {
            return Err(CatalogueError::Timeout);
        }

        Ok(self
            .copies
            .read()
            .await
            .get(external_id)
            .cloned()
            .unwrap_or_else(|| "[]".to_string()))
    }

    async fn details(&self, external_id: &str) -> Result<String, CatalogueError> {
        if self.failing_details.read().await.contains(external_id) {
            return Err(CatalogueError::HttpStatus {
                status: 500,
                message: "mock failure".to_string(),
            });
        }

        Ok(self
            .details
            .read()
            .await
            .get(external_id)
            .cloned()
            .unwrap_or_else(|| "{}".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalogue::MediaFilter;

    fn query(text: &str) -> SearchQuery {
        SearchQuery {
            query_text: text.to_string(),
            media_filter: MediaFilter::Any,
        }
    }

    #[tokio::test]
    async fn test_mock_search_records_and_fails() {
        let search = MockSearchClient::json("base/");
        search.set_body("Heen", "{\"objects\": [1]}").await;
        search.fail_query("Stoner").await;

        let ok = search.search(&query("Heen")).await.unwrap();
        assert_eq!(ok.body, "{\"objects\": [1]}");
        assert_eq!(ok.link_base, "base/");

        let empty = search.search(&query("Unknown")).await.unwrap();
        assert_eq!(empty.body, r#"{"objects": []}"#);

        assert!(matches!(
            search.search(&query("Stoner")).await,
            Err(CatalogueError::ConnectionFailed(_))
        ));
        assert_eq!(search.recorded_queries().await.len(), 3);
    }

    #[tokio::test]
    async fn test_mock_holdings_defaults() {
        let holdings = MockHoldingsClient::new();
        assert_eq!(holdings.copies("1").await.unwrap(), "[]");
        assert_eq!(holdings.details("1").await.unwrap(), "{}");

        holdings.fail_copies("2").await;
        assert!(matches!(holdings.copies("2").await, Err(CatalogueError::Timeout)));
        assert_eq!(holdings.copy_requests().await, vec!["1", "2"]);
    }
}
