use axum::{
    extract::{Path, Query, State},
    Json,
};
use dub_providers::EpisodeOptions;
use serde::Deserialize;
use shared::{EpisodeUrlResponse, ProvidersResponse, QualitiesResponse};

use crate::{error::AppResult, state::AppState};

const DEFAULT_QUALITY: &str = "1080p";

/// Empty query values count as absent
fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QualitiesQuery {
    pub anime_id: u32,
    pub episode: u32,
    pub page_url: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EpisodeQuery {
    pub anime_id: u32,
    pub episode: u32,
    pub quality: Option<String>,
    pub page_url: Option<String>,
}

/// List registered provider names
pub async fn list_providers(State(state): State<AppState>) -> Json<ProvidersResponse> {
    Json(ProvidersResponse {
        providers: state.resolution.registry().names(),
    })
}

/// Quality labels a provider offers for one episode
pub async fn get_qualities(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Query(query): Query<QualitiesQuery>,
) -> AppResult<Json<QualitiesResponse>> {
    let qualities = state
        .resolution
        .qualities(
            &name,
            query.anime_id,
            query.episode,
            non_empty(query.page_url).as_deref(),
        )
        .await?;

    Ok(Json(QualitiesResponse { qualities }))
}

/// Playable URL for one episode
pub async fn get_episode_url(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Query(query): Query<EpisodeQuery>,
) -> AppResult<Json<EpisodeUrlResponse>> {
    let quality = non_empty(query.quality).unwrap_or_else(|| DEFAULT_QUALITY.to_string());
    let options = EpisodeOptions {
        page_url: non_empty(query.page_url),
        ..Default::default()
    };

    let url = state
        .resolution
        .episode_url(&name, query.anime_id, query.episode, &quality, &options)
        .await?;

    Ok(Json(EpisodeUrlResponse { url }))
}
