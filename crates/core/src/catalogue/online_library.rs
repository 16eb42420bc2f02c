//! Online library (digital lending) search client.

use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::debug;

use crate::config::OnlineLibraryConfig;

use super::{
    read_body, CatalogueError, MediaFilter, RawResponse, ResponseFormat, SearchClient,
    SearchQuery,
};

/// Client for the online library search pages.
pub struct OnlineLibraryClient {
    client: Client,
    config: OnlineLibraryConfig,
}

impl OnlineLibraryClient {
    /// Create a new client with the given configuration.
    pub fn new(config: OnlineLibraryConfig) -> Result<Self, CatalogueError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs as u64))
            .build()
            .map_err(|e| CatalogueError::ClientBuild(e.to_string()))?;

        Ok(Self { client, config })
    }

    fn base_url(&self) -> &str {
        self.config.base_url.trim_end_matches('/')
    }

    /// Build the search URL for a query.
    pub fn search_url(&self, query: &SearchQuery) -> String {
        let mut url = format!(
            "{}/zoekresultaten.catalogus.html?q={}",
            self.base_url(),
            urlencoding::encode(&query.query_text)
        );

        match query.media_filter {
            MediaFilter::Ebook => url.push_str("&leesvorm=ereader"),
            MediaFilter::Audiobook => url.push_str("&type=Digitaal_luisterboek"),
            MediaFilter::Any => {}
        }

        url
    }
}

#[async_trait]
impl SearchClient for OnlineLibraryClient {
    fn name(&self) -> &str {
        "online_library"
    }

    async fn search(&self, query: &SearchQuery) -> Result<RawResponse, CatalogueError> {
        let url = self.search_url(query);
        debug!(url = %url, "Searching online library");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(CatalogueError::from_transport)?;
        let body = read_body(response).await?;

        debug!(bytes = body.len(), "Online library search complete");

        Ok(RawResponse {
            format: ResponseFormat::Html,
            body,
            link_base: self.base_url().to_string(),
        })
    }
}
