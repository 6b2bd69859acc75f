//! The dub provider contract.

use async_trait::async_trait;
use std::collections::BTreeMap;

/// Quality labels returned whenever the real list cannot be obtained
pub const DEFAULT_QUALITIES: [&str; 3] = ["1080p", "720p", "480p"];

/// Always-available sample video used when resolution fails
pub const FALLBACK_URL: &str =
    "https://storage.googleapis.com/gtv-videos-bucket/sample/BigBuckBunny.mp4";

pub fn default_qualities() -> Vec<String> {
    DEFAULT_QUALITIES.iter().map(|q| q.to_string()).collect()
}

/// Extra inputs for episode resolution
///
/// Only scraping-capable providers look at these.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EpisodeOptions {
    /// Page expected to embed a direct stream link
    pub page_url: Option<String>,
    /// Extra headers sent with the page request
    pub headers: BTreeMap<String, String>,
}

impl EpisodeOptions {
    pub fn with_page_url(page_url: impl Into<String>) -> Self {
        Self {
            page_url: Some(page_url.into()),
            ..Default::default()
        }
    }
}

/// A source of dubbed episodes.
///
/// Implementations must not fail toward the caller: upstream errors are
/// absorbed and replaced with [`default_qualities`] or [`FALLBACK_URL`].
/// Callers still bound every call with a timeout.
#[async_trait]
pub trait DubProvider: Send + Sync {
    /// Registry name (matched case-insensitively)
    fn name(&self) -> &str;

    /// Quality labels available for an episode, best first
    async fn available_qualities(&self, anime_id: u32, episode: u32) -> Vec<String>;

    /// Playable URL for an episode in the requested quality
    async fn episode_url(
        &self,
        anime_id: u32,
        episode: u32,
        quality: &str,
        options: &EpisodeOptions,
    ) -> String;
}
