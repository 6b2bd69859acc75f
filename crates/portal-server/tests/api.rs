use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    Router,
};
use dub_providers::{DubProvider, EpisodeOptions, MockProvider, ProviderRegistry, FALLBACK_URL};
use portal_server::{create_router, metadata::JikanClient, AppState};
use serde_json::Value;
use shared::config::MetadataConfig;
use shared::Config;
use tower::ServiceExt;

/// Nothing listens here, so every request fails to connect
const UNREACHABLE: &str = "http://127.0.0.1:1";

/// Never answers; the resolution timeout must cut it off
struct StuckProvider;

#[async_trait]
impl DubProvider for StuckProvider {
    fn name(&self) -> &str {
        "stuck"
    }

    async fn available_qualities(&self, _anime_id: u32, _episode: u32) -> Vec<String> {
        std::future::pending().await
    }

    async fn episode_url(
        &self,
        _anime_id: u32,
        _episode: u32,
        _quality: &str,
        _options: &EpisodeOptions,
    ) -> String {
        std::future::pending().await
    }
}

/// Remembers the quality and page URL of every episode call
#[derive(Default)]
struct RecordingProvider {
    seen: Arc<Mutex<Vec<(String, Option<String>)>>>,
}

#[async_trait]
impl DubProvider for RecordingProvider {
    fn name(&self) -> &str {
        "recording"
    }

    async fn available_qualities(&self, _anime_id: u32, _episode: u32) -> Vec<String> {
        vec!["720p".to_string()]
    }

    async fn episode_url(
        &self,
        anime_id: u32,
        episode: u32,
        quality: &str,
        options: &EpisodeOptions,
    ) -> String {
        self.seen
            .lock()
            .unwrap()
            .push((quality.to_string(), options.page_url.clone()));
        format!("https://cdn.test/{anime_id}/{episode}/{quality}.m3u8")
    }
}

fn test_app() -> Router {
    app_with(
        ProviderRegistry::new()
            .with_provider(Arc::new(MockProvider::new("mock", "mock.test")))
            .with_provider(Arc::new(StuckProvider)),
    )
}

fn recording_app() -> (Router, Arc<Mutex<Vec<(String, Option<String>)>>>) {
    let provider = RecordingProvider::default();
    let seen = Arc::clone(&provider.seen);
    (app_with(ProviderRegistry::new().with_provider(Arc::new(provider))), seen)
}

fn app_with(registry: ProviderRegistry) -> Router {
    let mut config = Config::default();
    config.providers.timeout_ms = 50;
    config.metadata = MetadataConfig {
        base_url: UNREACHABLE.to_string(),
        max_retries: 0,
        ..Default::default()
    };

    let jikan = JikanClient::new(&config.metadata).unwrap();

    create_router(AppState::new(config, registry, jikan))
}

async fn get(app: Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

#[tokio::test]
async fn test_list_providers() {
    let (status, body) = get(test_app(), "/providers").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, serde_json::json!({ "providers": ["mock", "stuck"] }));
}

#[tokio::test]
async fn test_mock_qualities() {
    let (status, body) = get(test_app(), "/providers/mock/qualities?animeId=1&episode=1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        serde_json::json!({ "qualities": ["1080p", "720p", "480p"] })
    );
}

#[tokio::test]
async fn test_provider_name_is_case_insensitive() {
    let (status, _) = get(test_app(), "/providers/MOCK/qualities?animeId=1&episode=1").await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_mock_episode_url() {
    let (status, body) = get(
        test_app(),
        "/providers/mock/episode?animeId=1&episode=1&quality=720p",
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["url"], FALLBACK_URL);
}

#[tokio::test]
async fn test_quality_defaults_when_omitted() {
    let (status, body) = get(test_app(), "/providers/mock/episode?animeId=1&episode=1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["url"], FALLBACK_URL);
}

#[tokio::test]
async fn test_unknown_provider_is_not_found() {
    let (status, body) = get(
        test_app(),
        "/providers/doesnotexist/episode?animeId=1&episode=1&quality=720p",
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].as_str().unwrap().contains("doesnotexist"));

    let (status, _) = get(test_app(), "/providers/doesnotexist/qualities?animeId=1&episode=1").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_bad_query_is_rejected() {
    let (status, _) = get(test_app(), "/providers/mock/qualities?episode=1").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = get(test_app(), "/providers/mock/qualities?animeId=abc&episode=1").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_stuck_provider_times_out_to_fallback() {
    let app = test_app();

    let started = std::time::Instant::now();
    let (status, body) = get(app.clone(), "/providers/stuck/episode?animeId=1&episode=1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["url"], FALLBACK_URL);
    assert!(started.elapsed() < Duration::from_secs(2));

    let (status, body) = get(app, "/providers/stuck/qualities?animeId=1&episode=1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        serde_json::json!({ "qualities": ["1080p", "720p", "480p"] })
    );
}

#[tokio::test]
async fn test_episode_list() {
    let (status, body) = get(test_app(), "/anime/5/episodes?provider=animevost").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["animeId"], 5);
    assert_eq!(body["provider"], "animevost");
    assert_eq!(body["episodes"].as_array().unwrap().len(), 24);
    assert_eq!(
        body["episodes"][0]["sources"]["1080p"],
        "/providers/animevost/episode?animeId=5&episode=1&quality=1080p"
    );
}

#[tokio::test]
async fn test_episode_list_defaults_to_anidub() {
    let (status, body) = get(test_app(), "/anime/5/episodes").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["provider"], "anidub");
}

#[tokio::test]
async fn test_episode_list_rejects_odd_provider_names() {
    let (status, _) = get(test_app(), "/anime/5/episodes?provider=a%26b").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_catalog_upstream_failure_is_bad_gateway() {
    let (status, body) = get(test_app(), "/anime?q=naruto").await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["error"]["code"], 502);

    let (status, _) = get(test_app(), "/anime/20").await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
}

#[tokio::test]
async fn test_health() {
    let response = test_app()
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().get(header::CACHE_CONTROL).is_none());
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert_eq!(&bytes[..], b"ok");
}

#[tokio::test]
async fn test_empty_query_values_count_as_absent() {
    let (app, seen) = recording_app();

    let (status, body) = get(
        app.clone(),
        "/providers/recording/episode?animeId=1&episode=2&quality=&pageUrl=",
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["url"], "https://cdn.test/1/2/1080p.m3u8");

    // Same cache entry as the request without the empty parameters
    let (_, body) = get(app, "/providers/recording/episode?animeId=1&episode=2").await;
    assert_eq!(body["url"], "https://cdn.test/1/2/1080p.m3u8");

    assert_eq!(*seen.lock().unwrap(), vec![("1080p".to_string(), None)]);
}

#[tokio::test]
async fn test_page_url_reaches_the_provider() {
    let (app, seen) = recording_app();

    let (status, _) = get(
        app,
        "/providers/recording/episode?animeId=1&episode=2&quality=720p&pageUrl=https%3A%2F%2Fplayer.test%2Fep2",
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    assert_eq!(
        *seen.lock().unwrap(),
        vec![(
            "720p".to_string(),
            Some("https://player.test/ep2".to_string())
        )]
    );
}

#[tokio::test]
async fn test_empty_page_url_on_qualities() {
    let (app, _) = recording_app();
    let (status, body) = get(app, "/providers/recording/qualities?animeId=1&episode=1&pageUrl=").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, serde_json::json!({ "qualities": ["720p"] }));
}
