//! AnimeVost provider.

use crate::api::{self, EpisodeUrlBody, QualitiesBody};
use crate::error::ProviderError;
use crate::provider::{default_qualities, DubProvider, EpisodeOptions, FALLBACK_URL};
use crate::scrape;
use async_trait::async_trait;
use reqwest::Client;
use tracing::warn;

pub const ANIMEVOST_BASE_URL: &str = "https://animevost.api/v1";

pub struct AnimeVostProvider {
    client: Client,
    base_url: String,
}

impl AnimeVostProvider {
    pub fn new(client: Client) -> Self {
        Self::with_base_url(client, ANIMEVOST_BASE_URL)
    }

    pub fn with_base_url(client: Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn fetch_episode_url(
        &self,
        anime_id: u32,
        episode: u32,
        quality: &str,
    ) -> Result<String, ProviderError> {
        let url = format!("{}/play/{}/{}", self.base_url, anime_id, episode);
        let body: EpisodeUrlBody = api::get_json(&self.client, &url, &[("quality", quality)]).await?;
        body.into_url()
    }

    async fn fetch_qualities(&self, anime_id: u32, episode: u32) -> Result<Vec<String>, ProviderError> {
        let url = format!("{}/play/{}/{}/qualities", self.base_url, anime_id, episode);
        let body: QualitiesBody = api::get_json(&self.client, &url, &[]).await?;
        body.into_qualities()
    }
}

#[async_trait]
impl DubProvider for AnimeVostProvider {
    fn name(&self) -> &str {
        "animevost"
    }

    async fn available_qualities(&self, anime_id: u32, episode: u32) -> Vec<String> {
        self.fetch_qualities(anime_id, episode)
            .await
            .unwrap_or_else(|e| {
                warn!(provider = "animevost", anime_id, episode, error = %e, "Quality lookup failed, using defaults");
                default_qualities()
            })
    }

    async fn episode_url(
        &self,
        anime_id: u32,
        episode: u32,
        quality: &str,
        options: &EpisodeOptions,
    ) -> String {
        if let Some(url) = scrape::scrape_page(&self.client, "animevost", options).await {
            return url;
        }

        self.fetch_episode_url(anime_id, episode, quality)
            .await
            .unwrap_or_else(|e| {
                warn!(provider = "animevost", anime_id, episode, quality, error = %e, "Episode lookup failed, using fallback");
                FALLBACK_URL.to_string()
            })
    }
}
