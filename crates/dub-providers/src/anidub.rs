//! AniDub provider.
//!
//! Resolves episodes by scraping a caller-supplied player page first, then
//! through the AniDub API, then falls back to the sample video.

use crate::api::{self, EpisodeUrlBody, QualitiesBody};
use crate::error::ProviderError;
use crate::provider::{default_qualities, DubProvider, EpisodeOptions, FALLBACK_URL};
use crate::scrape;
use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, warn};

pub const ANIDUB_BASE_URL: &str = "https://anidub.api/v1";

pub struct AniDubProvider {
    client: Client,
    base_url: String,
}

impl AniDubProvider {
    pub fn new(client: Client) -> Self {
        Self::with_base_url(client, ANIDUB_BASE_URL)
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
        let url = format!("{}/anime/{}/episode/{}", self.base_url, anime_id, episode);
        let body: EpisodeUrlBody = api::get_json(&self.client, &url, &[("quality", quality)]).await?;
        body.into_url()
    }

    async fn fetch_qualities(&self, anime_id: u32, episode: u32) -> Result<Vec<String>, ProviderError> {
        let url = format!("{}/anime/{}/episode/{}/qualities", self.base_url, anime_id, episode);
        let body: QualitiesBody = api::get_json(&self.client, &url, &[]).await?;
        body.into_qualities()
    }
}

#[async_trait]
impl DubProvider for AniDubProvider {
    fn name(&self) -> &str {
        "anidub"
    }

    async fn available_qualities(&self, anime_id: u32, episode: u32) -> Vec<String> {
        match self.fetch_qualities(anime_id, episode).await {
            Ok(qualities) => qualities,
            Err(e) => {
                warn!(provider = "anidub", anime_id, episode, error = %e, "Quality lookup failed, using defaults");
                default_qualities()
            }
        }
    }

    async fn episode_url(
        &self,
        anime_id: u32,
        episode: u32,
        quality: &str,
        options: &EpisodeOptions,
    ) -> String {
        if let Some(url) = scrape::scrape_page(&self.client, "anidub", options).await {
            return url;
        }

        match self.fetch_episode_url(anime_id, episode, quality).await {
            Ok(url) => {
                debug!(provider = "anidub", anime_id, episode, quality, "Resolved episode url");
                url
            }
            Err(e) => {
                warn!(provider = "anidub", anime_id, episode, quality, error = %e, "Episode lookup failed, using fallback");
                FALLBACK_URL.to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_is_normalized() {
        let provider = AniDubProvider::with_base_url(Client::new(), "http://localhost:8080/v1/");
        assert_eq!(provider.base_url(), "http://localhost:8080/v1");
        assert_eq!(AniDubProvider::new(Client::new()).base_url(), ANIDUB_BASE_URL);
    }
}
