//! Catalog search and details, memoized in front of Jikan.

use crate::cache::TtlCache;
use crate::metadata::{names, JikanAnime, JikanClient, MetadataError, RecommendationEntry};
use shared::{AnimeDetails, AnimeSummary, DubInfo, Recommendation, SearchFilters, SearchPage};
use std::time::Duration;
use tracing::{info, warn};

const MAX_RECOMMENDATIONS: usize = 6;

/// Dubs advertised on search results
pub fn default_dubs() -> Vec<DubInfo> {
    vec![
        DubInfo::new("anidub", &["720p", "1080p"]),
        DubInfo::new("animevost", &["480p", "720p", "1080p"]),
    ]
}

/// Dubs advertised on the details page
pub fn detail_dubs() -> Vec<DubInfo> {
    vec![
        DubInfo::new("anidub", &["1080p", "720p", "480p"]).with_description("Voice-over by AniDub"),
        DubInfo::new("animevost", &["1080p", "720p"]).with_description("Voice-over by AnimeVost"),
    ]
}

pub struct CatalogService {
    jikan: JikanClient,
    searches: TtlCache<SearchPage>,
    details: TtlCache<AnimeDetails>,
}

impl CatalogService {
    pub fn new(jikan: JikanClient, ttl: Duration) -> Self {
        Self {
            jikan,
            searches: TtlCache::new("catalog_search", ttl),
            details: TtlCache::new("catalog_details", ttl),
        }
    }

    /// Search the catalog; failures are not cached
    pub async fn search(&self, filters: &SearchFilters) -> Result<SearchPage, MetadataError> {
        let key = serde_json::to_string(filters).unwrap_or_default();
        if let Some(page) = self.searches.get(&key) {
            return Ok(page);
        }

        let response = self.jikan.search(filters).await?;
        let data = response.data.ok_or(MetadataError::NoData)?;

        let page = SearchPage {
            data: data.into_iter().map(summary).collect(),
            pagination: response.pagination,
        };
        info!(results = page.data.len(), "Catalog search complete");

        self.searches.insert(key, page.clone());
        Ok(page)
    }

    /// Full details with recommendations; `Ok(None)` for an unknown id
    pub async fn details(&self, mal_id: u32) -> Result<Option<AnimeDetails>, MetadataError> {
        let key = mal_id.to_string();
        if let Some(details) = self.details.get(&key) {
            return Ok(Some(details));
        }

        let Some(anime) = self.jikan.anime_full(mal_id).await? else {
            return Ok(None);
        };

        let recommendations = match self.jikan.recommendations(mal_id).await {
            Ok(entries) => entries
                .into_iter()
                .take(MAX_RECOMMENDATIONS)
                .map(recommendation)
                .collect(),
            Err(e) => {
                warn!(mal_id, error = %e, "Failed to fetch recommendations, skipping");
                Vec::new()
            }
        };

        let details = details(anime, recommendations);
        self.details.insert(key, details.clone());
        Ok(Some(details))
    }
}

fn summary(anime: JikanAnime) -> AnimeSummary {
    AnimeSummary {
        id: anime.mal_id,
        image: anime.large_image(),
        trailer: anime.trailer_id(),
        genres: names(&anime.genres),
        studios: names(&anime.studios),
        title: anime.title,
        title_english: anime.title_english,
        title_japanese: anime.title_japanese,
        synopsis: anime.synopsis,
        score: anime.score,
        episodes: anime.episodes,
        status: anime.status,
        year: anime.year,
        available_dubs: default_dubs(),
    }
}

fn recommendation(entry: RecommendationEntry) -> Recommendation {
    Recommendation {
        id: entry.entry.mal_id,
        image: entry.entry.images.and_then(|i| i.jpg.image_url),
        title: entry.entry.title,
        votes: entry.votes,
    }
}

fn details(anime: JikanAnime, recommendations: Vec<Recommendation>) -> AnimeDetails {
    AnimeDetails {
        id: anime.mal_id,
        image: anime.large_image(),
        trailer: anime.trailer_id(),
        producers: names(&anime.producers),
        licensors: names(&anime.licensors),
        studios: names(&anime.studios),
        genres: names(&anime.genres),
        themes: names(&anime.themes),
        demographics: names(&anime.demographics),
        title: anime.title,
        title_english: anime.title_english,
        title_japanese: anime.title_japanese,
        synopsis: anime.synopsis,
        background: anime.background,
        score: anime.score,
        scored_by: anime.scored_by,
        rank: anime.rank,
        popularity: anime.popularity,
        episodes: anime.episodes,
        duration: anime.duration,
        status: anime.status,
        season: anime.season,
        year: anime.year,
        rating: anime.rating,
        available_dubs: detail_dubs(),
        recommendations,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_carries_default_dubs() {
        let anime: JikanAnime = serde_json::from_str(
            r#"{ "mal_id": 20, "title": "Naruto", "studios": [{ "name": "Pierrot" }] }"#,
        )
        .unwrap();
        let summary = summary(anime);
        assert_eq!(summary.id, 20);
        assert_eq!(summary.studios, vec!["Pierrot"]);
        assert_eq!(summary.available_dubs, default_dubs());
    }

    #[test]
    fn test_recommendation_uses_small_image() {
        let entry: RecommendationEntry = serde_json::from_str(
            r#"{ "entry": { "mal_id": 1, "title": "Trigun", "images": { "jpg": { "image_url": "s.jpg", "large_image_url": "l.jpg" } } }, "votes": 12 }"#,
        )
        .unwrap();
        let rec = recommendation(entry);
        assert_eq!(rec.image.as_deref(), Some("s.jpg"));
        assert_eq!(rec.votes, Some(12));
    }
}
