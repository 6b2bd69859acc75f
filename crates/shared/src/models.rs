//! Data models for the portal.
//!
//! Catalog entries, episode descriptors and the JSON bodies exchanged between
//! the portal server and its clients.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Dub offered for an anime, as advertised in catalog responses
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DubInfo {
    pub provider: String,
    pub quality: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl DubInfo {
    pub fn new(provider: &str, quality: &[&str]) -> Self {
        Self {
            provider: provider.to_string(),
            quality: quality.iter().map(|q| q.to_string()).collect(),
            description: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Anime entry returned by catalog searches
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AnimeSummary {
    pub id: u32,
    pub title: String,
    pub title_english: Option<String>,
    pub title_japanese: Option<String>,
    pub synopsis: Option<String>,
    pub image: Option<String>,
    pub score: Option<f64>,
    pub episodes: Option<u32>,
    pub status: Option<String>,
    pub year: Option<i32>,
    #[serde(default)]
    pub genres: Vec<String>,
    #[serde(default)]
    pub studios: Vec<String>,
    #[serde(default)]
    pub available_dubs: Vec<DubInfo>,
    pub trailer: Option<String>,
}

/// Related title shown on the details page
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Recommendation {
    pub id: u32,
    pub title: String,
    pub image: Option<String>,
    pub votes: Option<u32>,
}

/// Full anime details
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AnimeDetails {
    pub id: u32,
    pub title: String,
    pub title_english: Option<String>,
    pub title_japanese: Option<String>,
    pub synopsis: Option<String>,
    pub background: Option<String>,
    pub image: Option<String>,
    pub trailer: Option<String>,
    pub score: Option<f64>,
    pub scored_by: Option<u32>,
    pub rank: Option<u32>,
    pub popularity: Option<u32>,
    pub episodes: Option<u32>,
    pub duration: Option<String>,
    pub status: Option<String>,
    pub season: Option<String>,
    pub year: Option<i32>,
    #[serde(default)]
    pub producers: Vec<String>,
    #[serde(default)]
    pub licensors: Vec<String>,
    #[serde(default)]
    pub studios: Vec<String>,
    #[serde(default)]
    pub genres: Vec<String>,
    #[serde(default)]
    pub themes: Vec<String>,
    #[serde(default)]
    pub demographics: Vec<String>,
    pub rating: Option<String>,
    #[serde(default)]
    pub available_dubs: Vec<DubInfo>,
    #[serde(default)]
    pub recommendations: Vec<Recommendation>,
}

/// Pagination metadata, passed through from the metadata source
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Pagination {
    pub last_visible_page: u32,
    pub has_next_page: bool,
    #[serde(default)]
    pub current_page: Option<u32>,
    #[serde(default)]
    pub items: Option<PaginationItems>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PaginationItems {
    pub count: u32,
    pub total: u32,
    pub per_page: u32,
}

/// One page of catalog search results
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SearchPage {
    pub data: Vec<AnimeSummary>,
    pub pagination: Option<Pagination>,
}

/// Catalog search filters
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct SearchFilters {
    #[serde(default, rename = "q", skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub genre: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}

/// Subtitle track attached to an episode
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SubtitleTrack {
    pub language: String,
    pub url: String,
}

/// Episode descriptor
///
/// `sources` maps a quality label to a URL; in the provider-backed pipeline
/// the URL points back at the episode resolution endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Episode {
    pub number: u32,
    pub title: String,
    pub description: String,
    pub thumbnail: String,
    pub duration: String,
    pub air_date: DateTime<Utc>,
    pub sources: BTreeMap<String, String>,
    #[serde(default)]
    pub subtitles: Vec<SubtitleTrack>,
}

/// Episode list for one anime and provider
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EpisodeList {
    pub anime_id: u32,
    pub provider: String,
    pub episodes: Vec<Episode>,
}

/// `GET /providers` body
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProvidersResponse {
    pub providers: Vec<String>,
}

/// `GET /providers/{name}/qualities` body
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct QualitiesResponse {
    pub qualities: Vec<String>,
}

/// `GET /providers/{name}/episode` body
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EpisodeUrlResponse {
    pub url: String,
}
