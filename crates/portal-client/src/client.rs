use crate::error::ClientError;
use futures::future::{BoxFuture, FutureExt, Shared};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde_json::Value;
use shared::{
    AnimeDetails, EpisodeList, EpisodeUrlResponse, QualitiesResponse, SearchFilters, SearchPage,
};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// How long a successful response is served from memory
pub const DEFAULT_TTL: Duration = Duration::from_secs(5 * 60);

type PendingRequest = Shared<BoxFuture<'static, Result<Value, ClientError>>>;

#[derive(Default)]
struct ClientState {
    responses: HashMap<String, (Instant, Value)>,
    in_flight: HashMap<String, PendingRequest>,
}

/// Portal API client with a response cache and request de-duplication
///
/// Clones share the same cache.
#[derive(Clone)]
pub struct PortalClient {
    http: Client,
    base_url: String,
    ttl: Duration,
    state: Arc<Mutex<ClientState>>,
}

impl PortalClient {
    pub fn new(base_url: &str) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(http: Client, base_url: &str) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            ttl: DEFAULT_TTL,
            state: Arc::new(Mutex::new(ClientState::default())),
        }
    }

    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    /// Drop every cached response
    pub fn clear(&self) {
        self.lock().responses.clear();
    }

    /// `GET /anime`
    pub async fn search_anime(&self, filters: &SearchFilters) -> Result<SearchPage, ClientError> {
        let key = format!("search:{}", serde_json::to_string(filters)?);
        let query = serde_json::to_value(filters)?
            .as_object()
            .map(|fields| {
                fields
                    .iter()
                    .map(|(name, value)| (name.clone(), query_value(value)))
                    .collect()
            })
            .unwrap_or_default();

        self.fetch(key, "/anime".to_string(), query).await
    }

    /// `GET /anime/{id}`
    pub async fn anime_details(&self, id: u32) -> Result<AnimeDetails, ClientError> {
        self.fetch(format!("details:{}", id), format!("/anime/{}", id), Vec::new())
            .await
    }

    /// `GET /anime/{id}/episodes`
    pub async fn episodes(&self, id: u32, provider: &str) -> Result<EpisodeList, ClientError> {
        self.fetch(
            format!("episodes:{}:{}", id, provider),
            format!("/anime/{}/episodes", id),
            vec![("provider".to_string(), provider.to_string())],
        )
        .await
    }

    /// `GET /providers/{name}/qualities`
    ///
    /// `page_url` lets scraping providers read the player page.
    pub async fn qualities(
        &self,
        provider: &str,
        anime_id: u32,
        episode: u32,
        page_url: Option<&str>,
    ) -> Result<Vec<String>, ClientError> {
        let response: QualitiesResponse = self
            .fetch(
                format!(
                    "qualities:{}:{}:{}:{}",
                    provider,
                    anime_id,
                    episode,
                    page_url.unwrap_or("")
                ),
                format!("/providers/{}/qualities", provider),
                episode_query(anime_id, episode, page_url),
            )
            .await?;
        Ok(response.qualities)
    }

    /// `GET /providers/{name}/episode`
    pub async fn episode_url(
        &self,
        provider: &str,
        anime_id: u32,
        episode: u32,
        quality: &str,
        page_url: Option<&str>,
    ) -> Result<String, ClientError> {
        let mut query = episode_query(anime_id, episode, page_url);
        query.push(("quality".to_string(), quality.to_string()));

        let response: EpisodeUrlResponse = self
            .fetch(
                format!(
                    "episode:{}:{}:{}:{}:{}",
                    provider,
                    anime_id,
                    episode,
                    quality,
                    page_url.unwrap_or("")
                ),
                format!("/providers/{}/episode", provider),
                query,
            )
            .await?;
        Ok(response.url)
    }

    /// Serve `key` from the cache, join an identical in-flight request, or
    /// start a new one
    async fn fetch<T: DeserializeOwned>(
        &self,
        key: String,
        path: String,
        query: Vec<(String, String)>,
    ) -> Result<T, ClientError> {
        let pending = {
            let mut state = self.lock();

            if let Some((stored_at, value)) = state.responses.get(&key) {
                if stored_at.elapsed() < self.ttl {
                    debug!(key = %key, "Client cache hit");
                    return Ok(serde_json::from_value(value.clone())?);
                }
            }

            match state.in_flight.get(&key) {
                Some(pending) => {
                    debug!(key = %key, "Joining in-flight request");
                    pending.clone()
                }
                None => {
                    let url = format!("{}{}", self.base_url, path);
                    let pending = get_json(self.http.clone(), url, query).boxed().shared();
                    state.in_flight.insert(key.clone(), pending.clone());
                    pending
                }
            }
        };

        let result = pending.await;

        {
            let mut state = self.lock();
            state.in_flight.remove(&key);
            match &result {
                Ok(value) => {
                    state.responses.insert(key, (Instant::now(), value.clone()));
                }
                Err(e) => warn!(key = %key, error = %e, "Request failed"),
            }
        }

        Ok(serde_json::from_value(result?)?)
    }

    fn lock(&self) -> MutexGuard<'_, ClientState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

async fn get_json(
    http: Client,
    url: String,
    query: Vec<(String, String)>,
) -> Result<Value, ClientError> {
    let response = http.get(&url).query(&query).send().await?;
    let status = response.status();
    if !status.is_success() {
        let message = response.text().await.unwrap_or_default();
        return Err(ClientError::Status {
            status: status.as_u16(),
            message,
        });
    }
    Ok(response.json().await?)
}

fn episode_query(anime_id: u32, episode: u32, page_url: Option<&str>) -> Vec<(String, String)> {
    let mut query = vec![
        ("animeId".to_string(), anime_id.to_string()),
        ("episode".to_string(), episode.to_string()),
    ];
    if let Some(page_url) = page_url.filter(|p| !p.is_empty()) {
        query.push(("pageUrl".to_string(), page_url.to_string()));
    }
    query
}

fn query_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
