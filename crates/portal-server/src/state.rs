use crate::catalog::CatalogService;
use crate::episodes::EpisodeService;
use crate::metadata::JikanClient;
use crate::resolution::ResolutionService;
use dub_providers::ProviderRegistry;
use shared::Config;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub resolution: Arc<ResolutionService>,
    pub catalog: Arc<CatalogService>,
    pub episodes: Arc<EpisodeService>,
}

impl AppState {
    pub fn new(config: Config, registry: ProviderRegistry, jikan: JikanClient) -> Self {
        let registry = Arc::new(registry);
        let resolution = ResolutionService::from_config(registry, &config.providers);
        let catalog = CatalogService::new(jikan, config.metadata.cache_ttl());
        let episodes = EpisodeService::new(config.metadata.episode_count, config.metadata.cache_ttl());

        Self {
            config: Arc::new(config),
            resolution: Arc::new(resolution),
            catalog: Arc::new(catalog),
            episodes: Arc::new(episodes),
        }
    }
}
