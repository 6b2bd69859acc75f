use axum::{routing::get, Router};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

use super::handlers;

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/providers", get(handlers::list_providers))
        .route("/providers/{name}/qualities", get(handlers::get_qualities))
        .route("/providers/{name}/episode", get(handlers::get_episode_url))
        .route("/anime", get(handlers::search_anime))
        .route("/anime/{id}", get(handlers::get_anime))
        .route("/anime/{id}/episodes", get(handlers::get_episodes))
        .route("/health", get(handlers::health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
