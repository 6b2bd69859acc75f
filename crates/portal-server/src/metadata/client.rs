//! Jikan API client with retry logic.

use super::types::{JikanAnime, JikanItem, JikanPage, RecommendationEntry};
use anyhow::Context;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use shared::config::MetadataConfig;
use shared::SearchFilters;
use std::time::Duration;
use thiserror::Error;
use tokio::time::sleep;
use tracing::{debug, info, warn};

#[derive(Debug, Error)]
pub enum MetadataError {
    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Request failed with status {status}")]
    Status { status: u16, body: String },

    #[error("No data returned from Jikan")]
    NoData,
}

/// Jikan API v4 client
pub struct JikanClient {
    /// HTTP client
    client: Client,
    /// Base URL for Jikan API
    base_url: String,
    /// Maximum retries for failed search requests
    max_retries: u32,
    /// Base delay between retries, multiplied by the attempt number
    retry_backoff: Duration,
    details_timeout: Duration,
    recommendations_timeout: Duration,
}

impl JikanClient {
    /// Create a new Jikan client
    pub fn new(config: &MetadataConfig) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_millis(config.request_timeout_ms))
            .user_agent(concat!("anime-portal/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self::with_client(client, config))
    }

    pub fn with_client(client: Client, config: &MetadataConfig) -> Self {
        Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            max_retries: config.max_retries,
            retry_backoff: Duration::from_millis(config.retry_backoff_ms),
            details_timeout: Duration::from_millis(config.details_timeout_ms),
            recommendations_timeout: Duration::from_millis(config.recommendations_timeout_ms),
        }
    }

    /// Send a request, retrying server errors and network failures.
    ///
    /// Client errors (4xx) are returned immediately. The delay before retry
    /// `n` is `retry_backoff * n`.
    async fn send_with_retry(&self, request: RequestBuilder) -> Result<Response, MetadataError> {
        let mut attempt = 0;

        loop {
            let Some(this_try) = request.try_clone() else {
                return Ok(request.send().await?);
            };
            attempt += 1;
            let can_retry = attempt <= self.max_retries;

            match this_try.send().await {
                Ok(response) if response.status().is_success() => return Ok(response),
                Ok(response) => {
                    let status = response.status();
                    if status.is_server_error() && can_retry {
                        let delay = self.retry_backoff * attempt;
                        warn!(status = %status, attempt, delay_ms = delay.as_millis(), "Server error, retrying");
                        sleep(delay).await;
                        continue;
                    }

                    let body = response.text().await.unwrap_or_default();
                    warn!(status = %status, attempt, "Request failed");
                    return Err(MetadataError::Status {
                        status: status.as_u16(),
                        body,
                    });
                }
                Err(e) if can_retry => {
                    let delay = self.retry_backoff * attempt;
                    warn!(error = %e, attempt, delay_ms = delay.as_millis(), "Request error, retrying");
                    sleep(delay).await;
                }
                Err(e) => return Err(e.into()),
            }
        }
    }

    /// Search the catalog
    pub async fn search(&self, filters: &SearchFilters) -> Result<JikanPage<JikanAnime>, MetadataError> {
        let mut query: Vec<(&str, String)> = Vec::new();
        if let Some(q) = filters.query.as_deref().filter(|q| !q.is_empty()) {
            query.push(("q", q.to_string()));
        }
        if let Some(genre) = &filters.genre {
            query.push(("genres", genre.clone()));
        }
        if let Some(year) = &filters.year {
            query.push(("start_date", format!("{}-01-01", year)));
        }
        if let Some(status) = &filters.status {
            query.push(("status", status.clone()));
        }
        query.push(("page", filters.page.unwrap_or(1).to_string()));
        query.push(("limit", filters.limit.unwrap_or(20).to_string()));

        info!(query = ?filters.query, page = filters.page.unwrap_or(1), "Searching anime");

        let url = format!("{}/anime", self.base_url);
        let response = self
            .send_with_retry(self.client.get(&url).query(&query))
            .await?;
        Ok(response.json().await?)
    }

    /// Fetch full details; `Ok(None)` when Jikan has no data for the id
    pub async fn anime_full(&self, mal_id: u32) -> Result<Option<JikanAnime>, MetadataError> {
        debug!(mal_id = mal_id, "Fetching anime details");
        let url = format!("{}/anime/{}/full", self.base_url, mal_id);

        let response = self
            .client
            .get(&url)
            .timeout(self.details_timeout)
            .send()
            .await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let response = error_for_status(response).await?;
        let item: JikanItem<JikanAnime> = response.json().await?;
        Ok(item.data)
    }

    /// Fetch recommendations for an anime
    pub async fn recommendations(&self, mal_id: u32) -> Result<Vec<RecommendationEntry>, MetadataError> {
        debug!(mal_id = mal_id, "Fetching recommendations");
        let url = format!("{}/anime/{}/recommendations", self.base_url, mal_id);

        let response = self
            .client
            .get(&url)
            .timeout(self.recommendations_timeout)
            .send()
            .await?;
        let response = error_for_status(response).await?;
        let page: JikanPage<RecommendationEntry> = response.json().await?;
        page.data.ok_or(MetadataError::NoData)
    }
}

async fn error_for_status(response: Response) -> Result<Response, MetadataError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(MetadataError::Status {
        status: status.as_u16(),
        body,
    })
}
