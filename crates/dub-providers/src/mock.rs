//! Network-free provider used in development.

use crate::provider::{default_qualities, DubProvider, EpisodeOptions, FALLBACK_URL};
use async_trait::async_trait;
use tracing::debug;

/// Provider that never touches the network.
///
/// Every episode has the default three qualities and plays the fallback
/// sample video, so the player works without reachable upstreams.
#[derive(Debug, Clone)]
pub struct MockProvider {
    name: String,
    /// Upstream this mock stands in for, only used in logs
    upstream: String,
}

impl MockProvider {
    pub fn new(name: impl Into<String>, upstream: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            upstream: upstream.into(),
        }
    }

    pub fn upstream(&self) -> &str {
        &self.upstream
    }
}

#[async_trait]
impl DubProvider for MockProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn available_qualities(&self, anime_id: u32, episode: u32) -> Vec<String> {
        debug!(provider = %self.name, upstream = %self.upstream, anime_id, episode, "Mock qualities");
        default_qualities()
    }

    async fn episode_url(
        &self,
        anime_id: u32,
        episode: u32,
        quality: &str,
        _options: &EpisodeOptions,
    ) -> String {
        debug!(provider = %self.name, upstream = %self.upstream, anime_id, episode, quality, "Mock episode url");
        FALLBACK_URL.to_string()
    }
}
