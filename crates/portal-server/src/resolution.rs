//! Episode and quality resolution.
//!
//! Every provider call is raced against a timer. A call that loses the race
//! is replaced by the default quality list or the fallback URL, so the player
//! always receives something playable. Results are memoized per request key;
//! whether substituted values are memoized too is set by [`CachePolicy`].
//!
//! The losing future is dropped when the timer fires, which also cancels the
//! provider's in-flight HTTP request.

use crate::cache::{cache_key, TtlCache};
use dub_providers::{default_qualities, EpisodeOptions, ProviderRegistry, FALLBACK_URL};
use shared::config::{CachePolicy, ProvidersConfig};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("Provider not found: {0}")]
    UnknownProvider(String),
}

/// A provider call that lost the race against its timer
#[derive(Debug, Error)]
#[error("Provider call timed out after {0:?}")]
pub struct TimedOut(pub Duration);

/// Await `future`, giving up after `limit`
pub async fn with_timeout<F: Future>(future: F, limit: Duration) -> Result<F::Output, TimedOut> {
    tokio::time::timeout(limit, future)
        .await
        .map_err(|_| TimedOut(limit))
}

/// Timeout, fallback and caching in front of the provider registry
pub struct ResolutionService {
    registry: Arc<ProviderRegistry>,
    timeout: Duration,
    policy: CachePolicy,
    qualities: TtlCache<Vec<String>>,
    episode_urls: TtlCache<String>,
}

impl ResolutionService {
    pub fn new(
        registry: Arc<ProviderRegistry>,
        timeout: Duration,
        policy: CachePolicy,
        qualities: TtlCache<Vec<String>>,
        episode_urls: TtlCache<String>,
    ) -> Self {
        Self {
            registry,
            timeout,
            policy,
            qualities,
            episode_urls,
        }
    }

    /// Build from the `[providers]` config section
    pub fn from_config(registry: Arc<ProviderRegistry>, config: &ProvidersConfig) -> Self {
        Self::new(
            registry,
            config.timeout(),
            config.cache_policy,
            TtlCache::new("provider_qualities", config.qualities_ttl()),
            TtlCache::new("provider_episode", config.episode_ttl()),
        )
    }

    pub fn registry(&self) -> &ProviderRegistry {
        &self.registry
    }

    /// Quality labels for an episode.
    ///
    /// Fails only for an unregistered provider.
    pub async fn qualities(
        &self,
        provider_name: &str,
        anime_id: u32,
        episode: u32,
        page_url: Option<&str>,
    ) -> Result<Vec<String>, ResolveError> {
        let provider_key = provider_name.to_lowercase();
        let key = cache_key(&[
            &provider_key,
            &anime_id.to_string(),
            &episode.to_string(),
            page_url.unwrap_or(""),
        ]);

        if let Some(qualities) = self.qualities.get(&key) {
            return Ok(qualities);
        }

        let provider = self
            .registry
            .get(&provider_key)
            .ok_or_else(|| ResolveError::UnknownProvider(provider_name.to_string()))?;

        match with_timeout(provider.available_qualities(anime_id, episode), self.timeout).await {
            Ok(qualities) if !qualities.is_empty() => {
                debug!(provider = %provider_key, anime_id, episode, count = qualities.len(), "Resolved qualities");
                self.qualities.insert(key, qualities.clone());
                Ok(qualities)
            }
            Ok(_) => {
                warn!(provider = %provider_key, anime_id, episode, "Provider returned no qualities, using defaults");
                Ok(self.fallback_qualities(key))
            }
            Err(e) => {
                warn!(provider = %provider_key, anime_id, episode, error = %e, "Quality lookup failed, using defaults");
                Ok(self.fallback_qualities(key))
            }
        }
    }

    fn fallback_qualities(&self, key: String) -> Vec<String> {
        let fallback = default_qualities();
        if self.policy == CachePolicy::CacheAll {
            self.qualities.insert(key, fallback.clone());
        }
        fallback
    }

    /// Playable URL for an episode.
    ///
    /// Fails only for an unregistered provider.
    pub async fn episode_url(
        &self,
        provider_name: &str,
        anime_id: u32,
        episode: u32,
        quality: &str,
        options: &EpisodeOptions,
    ) -> Result<String, ResolveError> {
        let provider_key = provider_name.to_lowercase();
        let key = cache_key(&[
            &provider_key,
            &anime_id.to_string(),
            &episode.to_string(),
            quality,
            options.page_url.as_deref().unwrap_or(""),
        ]);

        if let Some(url) = self.episode_urls.get(&key) {
            return Ok(url);
        }

        let provider = self
            .registry
            .get(&provider_key)
            .ok_or_else(|| ResolveError::UnknownProvider(provider_name.to_string()))?;

        let call = provider.episode_url(anime_id, episode, quality, options);
        match with_timeout(call, self.timeout).await {
            Ok(url) => {
                debug!(provider = %provider_key, anime_id, episode, quality, "Resolved episode url");
                self.episode_urls.insert(key, url.clone());
                Ok(url)
            }
            Err(e) => {
                warn!(provider = %provider_key, anime_id, episode, quality, error = %e, "Episode lookup failed, using fallback");
                let fallback = FALLBACK_URL.to_string();
                if self.policy == CachePolicy::CacheAll {
                    self.episode_urls.insert(key, fallback.clone());
                }
                Ok(fallback)
            }
        }
    }
}
