//! Provider registry.
//!
//! Maps lowercase provider names to provider instances. The registry is
//! assembled once at startup and never changes afterwards; which provider
//! set it holds is decided by [`RegistryMode`].

use crate::anidub::{AniDubProvider, ANIDUB_BASE_URL};
use crate::animevost::{AnimeVostProvider, ANIMEVOST_BASE_URL};
use crate::mock::MockProvider;
use crate::provider::DubProvider;
use reqwest::Client;
use shared::config::{Environment, ProvidersConfig};
use std::sync::Arc;
use tracing::info;

/// Which provider set the registry is built from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistryMode {
    /// Network-free mocks registered under the live names
    Mock,
    /// Real upstream-backed providers
    Live,
}

impl RegistryMode {
    pub fn for_environment(environment: Environment) -> Self {
        if environment.is_development() {
            RegistryMode::Mock
        } else {
            RegistryMode::Live
        }
    }
}

/// Upstream base addresses for the live providers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderEndpoints {
    pub anidub: String,
    pub animevost: String,
}

impl Default for ProviderEndpoints {
    fn default() -> Self {
        Self {
            anidub: ANIDUB_BASE_URL.to_string(),
            animevost: ANIMEVOST_BASE_URL.to_string(),
        }
    }
}

impl ProviderEndpoints {
    pub fn from_config(config: &ProvidersConfig) -> Self {
        let defaults = Self::default();
        Self {
            anidub: config.anidub_base_url.clone().unwrap_or(defaults.anidub),
            animevost: config.animevost_base_url.clone().unwrap_or(defaults.animevost),
        }
    }
}

/// Name → provider lookup table
#[derive(Clone, Default)]
pub struct ProviderRegistry {
    /// Registration order is preserved for listing
    providers: Vec<(String, Arc<dyn DubProvider>)>,
}

impl ProviderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the registry for `mode`
    pub fn build(mode: RegistryMode, client: Client, endpoints: &ProviderEndpoints) -> Self {
        let registry = match mode {
            RegistryMode::Mock => Self::new()
                .with_provider(Arc::new(MockProvider::new("anidub", "api.anidub.com")))
                .with_provider(Arc::new(MockProvider::new("animevost", "api.animevost.org"))),
            RegistryMode::Live => Self::new()
                .with_provider(Arc::new(AniDubProvider::with_base_url(
                    client.clone(),
                    &endpoints.anidub,
                )))
                .with_provider(Arc::new(AnimeVostProvider::with_base_url(
                    client,
                    &endpoints.animevost,
                ))),
        };

        info!(
            mode = ?mode,
            providers = ?registry.names(),
            "Provider registry initialized"
        );

        registry
    }

    /// Add a provider under its lowercased name, replacing any previous one
    pub fn with_provider(mut self, provider: Arc<dyn DubProvider>) -> Self {
        let key = provider.name().to_lowercase();
        match self.providers.iter_mut().find(|(name, _)| *name == key) {
            Some(entry) => entry.1 = provider,
            None => self.providers.push((key, provider)),
        }
        self
    }

    /// Case-insensitive lookup; `None` for unknown or empty names
    pub fn get(&self, name: &str) -> Option<Arc<dyn DubProvider>> {
        if name.is_empty() {
            return None;
        }
        let key = name.to_lowercase();
        self.providers
            .iter()
            .find(|(registered, _)| *registered == key)
            .map(|(_, provider)| Arc::clone(provider))
    }

    /// Registered names in registration order
    pub fn names(&self) -> Vec<String> {
        self.providers.iter().map(|(name, _)| name.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FALLBACK_URL;

    #[test]
    fn test_mode_for_environment() {
        assert_eq!(RegistryMode::for_environment(Environment::Development), RegistryMode::Mock);
        assert_eq!(RegistryMode::for_environment(Environment::Production), RegistryMode::Live);
    }

    #[test]
    fn test_live_registry_names() {
        let registry = ProviderRegistry::build(RegistryMode::Live, Client::new(), &ProviderEndpoints::default());
        assert_eq!(registry.names(), vec!["anidub", "animevost"]);
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_lookup_is_case_insensitive() {
        let registry = ProviderRegistry::build(RegistryMode::Live, Client::new(), &ProviderEndpoints::default());
        for name in ["anidub", "AniDub", "ANIDUB", "animevost", "AnimeVost"] {
            assert!(registry.get(name).is_some(), "{name} should resolve");
        }
        assert_eq!(registry.get("AniDub").unwrap().name(), "anidub");
    }

    #[test]
    fn test_unknown_names() {
        let registry = ProviderRegistry::build(RegistryMode::Mock, Client::new(), &ProviderEndpoints::default());
        for name in ["", "doesnotexist", "anidub2", "mock"] {
            assert!(registry.get(name).is_none(), "{name} should not resolve");
        }
        assert!(ProviderRegistry::new().is_empty());
    }

    #[tokio::test]
    async fn test_mock_registry_uses_live_names() {
        let registry = ProviderRegistry::build(RegistryMode::Mock, Client::new(), &ProviderEndpoints::default());
        assert_eq!(registry.names(), vec!["anidub", "animevost"]);

        let provider = registry.get("animevost").unwrap();
        let url = provider
            .episode_url(1, 1, "720p", &Default::default())
            .await;
        assert_eq!(url, FALLBACK_URL);
    }

    #[test]
    fn test_with_provider_replaces_same_name() {
        let registry = ProviderRegistry::new()
            .with_provider(Arc::new(MockProvider::new("Mock", "a")))
            .with_provider(Arc::new(MockProvider::new("mock", "b")));
        assert_eq!(registry.names(), vec!["mock"]);
    }

    #[test]
    fn test_endpoints_from_config() {
        let config = ProvidersConfig {
            anidub_base_url: Some("http://127.0.0.1:9000".to_string()),
            ..Default::default()
        };
        let endpoints = ProviderEndpoints::from_config(&config);
        assert_eq!(endpoints.anidub, "http://127.0.0.1:9000");
        assert_eq!(endpoints.animevost, ANIMEVOST_BASE_URL);
    }
}
