//! Wise branch catalogue client.
//!
//! Wise installations expose three endpoints used here:
//! - `POST /cgi-bin/bx.pl` for searching (form payload, JSON answer)
//! - `GET /restapi/title/{id}/iteminformation` for copy-level availability
//! - `GET /restapi/title/{id}/detail` for synopsis and acquisition notes
//!
//! Requests carry the `WISE_KEY` and `WISE_SESSION` headers from configuration.

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use std::time::Duration;
use tracing::debug;

use crate::config::WiseConfig;

use super::{
    read_body, CatalogueError, HoldingsClient, RawResponse, ResponseFormat, SearchClient,
    SearchQuery,
};

/// Client for a Wise catalogue.
pub struct WiseClient {
    client: Client,
    config: WiseConfig,
}

impl WiseClient {
    /// Create a new client with the given configuration.
    pub fn new(config: WiseConfig) -> Result<Self, CatalogueError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs as u64))
            .build()
            .map_err(|e| CatalogueError::ClientBuild(e.to_string()))?;

        Ok(Self { client, config })
    }

    fn base_url(&self) -> &str {
        self.config.base_url.trim_end_matches('/')
    }

    /// Prefix for detail page links; the title id is appended.
    pub fn detail_link_base(&self) -> String {
        format!(
            "{}/wise-apps/catalog/{}/detail/wise/",
            self.base_url(),
            self.config.branch_id
        )
    }

    /// Form payload for a search.
    pub fn search_form(&self, query: &SearchQuery) -> Vec<(&'static str, String)> {
        vec![
            ("prt", "INTERNET".to_string()),
            ("var", "portal".to_string()),
            ("vestnr", self.config.branch_id.clone()),
            ("fmt", "json".to_string()),
            ("search_in", "iets".to_string()),
            ("amount", self.config.result_count.to_string()),
            ("catalog", "default".to_string()),
            ("event", "osearch".to_string()),
            ("preset", "all".to_string()),
            ("offset", "0".to_string()),
            ("qs", query.query_text.clone()),
            ("vcgrpf", "0".to_string()),
            ("vcgrpt", "0".to_string()),
            ("backend", "wise".to_string()),
        ]
    }

    fn copies_url(&self, external_id: &str) -> String {
        format!(
            "{}/restapi/title/{}/iteminformation",
            self.base_url(),
            urlencoding::encode(external_id)
        )
    }

    fn details_url(&self, external_id: &str) -> String {
        format!(
            "{}/restapi/title/{}/detail",
            self.base_url(),
            urlencoding::encode(external_id)
        )
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        let mut request = request.header("Accept", "application/json, text/plain, */*");
        if !self.config.api_key.is_empty() {
            request = request.header("WISE_KEY", &self.config.api_key);
        }
        if !self.config.session.is_empty() {
            request = request.header("WISE_SESSION", &self.config.session);
        }
        request
    }

    async fn get(&self, url: &str, query: &[(&str, &str)]) -> Result<String, CatalogueError> {
        let response = self
            .authorize(self.client.get(url).query(query))
            .send()
            .await
            .map_err(CatalogueError::from_transport)?;
        read_body(response).await
    }
}

#[async_trait]
impl SearchClient for WiseClient {
    fn name(&self) -> &str {
        "wise"
    }

    async fn search(&self, query: &SearchQuery) -> Result<RawResponse, CatalogueError> {
        let url = format!("{}/cgi-bin/bx.pl", self.base_url());
        debug!(url = %url, query = %query.query_text, "Searching Wise catalogue");

        let response = self
            .authorize(self.client.post(&url).form(&self.search_form(query)))
            .send()
            .await
            .map_err(CatalogueError::from_transport)?;
        let body = read_body(response).await?;

        debug!(bytes = body.len(), "Wise search complete");

        Ok(RawResponse {
            format: ResponseFormat::Json,
            body,
            link_base: self.detail_link_base(),
        })
    }
}

#[async_trait]
impl HoldingsClient for WiseClient {
    async fn copies(&self, external_id: &str) -> Result<String, CatalogueError> {
        let url = self.copies_url(external_id);
        debug!(url = %url, "Fetching copy information");

        self.get(
            &url,
            &[
                ("branchCatGroups", "0"),
                ("branchId", self.config.branch_id.as_str()),
                ("clientType", "I"),
            ],
        )
        .await
    }

    async fn details(&self, external_id: &str) -> Result<String, CatalogueError> {
        let url = self.details_url(external_id);
        debug!(url = %url, "Fetching title details");

        self.get(&url, &[]).await
    }
}
