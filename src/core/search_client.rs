// src/core/search_client.rs
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::env;
use tracing::{error, info};

use super::config_manager::ServiceConfig;

const SEARCH_ENDPOINT: &str = "/search";

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SearchRequest {
    query: String,
    num_results: usize,
    start_published_date: String,
    contents: SearchContents,
}

#[derive(Serialize)]
struct SearchContents {
    text: bool,
}

#[derive(Deserialize)]
struct SearchResponse {
    results: Vec<SearchHit>,
}

/// One ranked document from the web-search provider
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchHit {
    pub title: Option<String>,
    pub url: String,
    pub text: Option<String>,
    pub published_date: Option<String>,
}

/// Client for the hosted web-search/content-retrieval endpoint
pub struct SearchClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl SearchClient {
    pub fn new(config: &ServiceConfig) -> Result<Self> {
        let api_key =
            env::var("EXA_API_KEY").context("EXA_API_KEY environment variable not set")?;

        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_seconds))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            api_key,
            base_url: config.search_api_url.clone(),
        })
    }

    /// Run one search with page text included in the results
    pub async fn search_with_contents(
        &self,
        query: &str,
        num_results: usize,
        start_published_date: DateTime<Utc>,
    ) -> Result<Vec<SearchHit>> {
        let request = SearchRequest {
            query: query.to_string(),
            num_results,
            start_published_date: start_published_date.to_rfc3339(),
            contents: SearchContents { text: true },
        };

        info!("Searching for: {}", query);

        let response = self
            .client
            .post(format!("{}{}", self.base_url, SEARCH_ENDPOINT))
            .header("x-api-key", &self.api_key)
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .context("Failed to send request to search API")?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            error!("Search API error {}: {}", status, error_text);
            anyhow::bail!("Search API returned error {}: {}", status, error_text);
        }

        let search_response: SearchResponse = response
            .json()
            .await
            .context("Failed to parse search API response")?;

        Ok(search_response.results)
    }
}
