use axum::{
    extract::{Path, Query, State},
    http::header,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use shared::{EpisodeList, SearchFilters};

use crate::episodes::{is_valid_provider_name, DEFAULT_PROVIDER};
use crate::error::{AppError, AppResult};
use crate::state::AppState;

const SEARCH_CACHE_CONTROL: &str = "public, s-maxage=3600, stale-while-revalidate=59";
const DETAILS_CACHE_CONTROL: &str = "public, s-maxage=300, stale-while-revalidate=59";

#[derive(Debug, Deserialize)]
pub struct EpisodesQuery {
    pub provider: Option<String>,
}

/// Search the catalog
pub async fn search_anime(
    State(state): State<AppState>,
    Query(filters): Query<SearchFilters>,
) -> AppResult<impl IntoResponse> {
    let page = state.catalog.search(&filters).await?;
    Ok(([(header::CACHE_CONTROL, SEARCH_CACHE_CONTROL)], Json(page)))
}

/// Full details for one anime
pub async fn get_anime(
    State(state): State<AppState>,
    Path(id): Path<u32>,
) -> AppResult<impl IntoResponse> {
    let details = state
        .catalog
        .details(id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Anime not found: {}", id)))?;

    Ok(([(header::CACHE_CONTROL, DETAILS_CACHE_CONTROL)], Json(details)))
}

/// Episode list whose sources resolve through the provider endpoints
pub async fn get_episodes(
    State(state): State<AppState>,
    Path(id): Path<u32>,
    Query(query): Query<EpisodesQuery>,
) -> AppResult<Json<EpisodeList>> {
    let provider = query.provider.as_deref().unwrap_or(DEFAULT_PROVIDER);
    if !is_valid_provider_name(provider) {
        return Err(AppError::bad_request(format!("Invalid provider name: {}", provider)));
    }

    Ok(Json(state.episodes.list(id, provider)))
}
