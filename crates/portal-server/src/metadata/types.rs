//! Jikan API v4 response types.
//!
//! Only the fields the portal shows are modelled; everything is optional
//! because Jikan omits or nulls fields freely.

use serde::Deserialize;
use shared::Pagination;

/// Search response: `{ data: [...], pagination: {...} }`
#[derive(Debug, Clone, Deserialize)]
pub struct JikanPage<T> {
    pub data: Option<Vec<T>>,
    pub pagination: Option<Pagination>,
}

/// Single-item response: `{ data: {...} }`
#[derive(Debug, Clone, Deserialize)]
pub struct JikanItem<T> {
    pub data: Option<T>,
}

/// Anime entry (search results and `/anime/{id}/full`)
#[derive(Debug, Clone, Deserialize)]
pub struct JikanAnime {
    pub mal_id: u32,
    #[serde(default)]
    pub title: String,
    pub title_english: Option<String>,
    pub title_japanese: Option<String>,
    pub synopsis: Option<String>,
    pub background: Option<String>,
    #[serde(default)]
    pub images: Option<AnimeImages>,
    #[serde(default)]
    pub trailer: Option<Trailer>,
    pub score: Option<f64>,
    pub scored_by: Option<u32>,
    pub rank: Option<u32>,
    pub popularity: Option<u32>,
    pub episodes: Option<u32>,
    pub duration: Option<String>,
    pub status: Option<String>,
    pub season: Option<String>,
    pub year: Option<i32>,
    pub rating: Option<String>,
    #[serde(default)]
    pub producers: Vec<MalEntity>,
    #[serde(default)]
    pub licensors: Vec<MalEntity>,
    #[serde(default)]
    pub studios: Vec<MalEntity>,
    #[serde(default)]
    pub genres: Vec<MalEntity>,
    #[serde(default)]
    pub themes: Vec<MalEntity>,
    #[serde(default)]
    pub demographics: Vec<MalEntity>,
}

impl JikanAnime {
    pub fn large_image(&self) -> Option<String> {
        self.images.as_ref().and_then(|i| i.jpg.large_image_url.clone())
    }

    pub fn trailer_id(&self) -> Option<String> {
        self.trailer.as_ref().and_then(|t| t.youtube_id.clone())
    }
}

/// Anime images
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AnimeImages {
    #[serde(default)]
    pub jpg: ImageSet,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ImageSet {
    pub image_url: Option<String>,
    pub large_image_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Trailer {
    pub youtube_id: Option<String>,
}

/// MAL entity (genre, studio, producer, etc.)
#[derive(Debug, Clone, Deserialize)]
pub struct MalEntity {
    pub name: String,
}

pub fn names(entities: &[MalEntity]) -> Vec<String> {
    entities.iter().map(|e| e.name.clone()).collect()
}

/// Entry in `/anime/{id}/recommendations`
#[derive(Debug, Clone, Deserialize)]
pub struct RecommendationEntry {
    pub entry: RecommendedAnime,
    pub votes: Option<u32>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RecommendedAnime {
    pub mal_id: u32,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub images: Option<AnimeImages>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sparse_anime_deserializes() {
        let anime: JikanAnime = serde_json::from_str(r#"{ "mal_id": 1, "title": "Cowboy Bebop" }"#).unwrap();
        assert_eq!(anime.mal_id, 1);
        assert!(anime.genres.is_empty());
        assert_eq!(anime.large_image(), None);
    }

    #[test]
    fn test_nested_fields() {
        let anime: JikanAnime = serde_json::from_str(
            r#"{
                "mal_id": 5114,
                "title": "Fullmetal Alchemist: Brotherhood",
                "images": { "jpg": { "image_url": "a.jpg", "large_image_url": "l.jpg" } },
                "trailer": { "youtube_id": "abc" },
                "genres": [{ "mal_id": 1, "type": "anime", "name": "Action", "url": "u" }]
            }"#,
        )
        .unwrap();
        assert_eq!(anime.large_image().as_deref(), Some("l.jpg"));
        assert_eq!(anime.trailer_id().as_deref(), Some("abc"));
        assert_eq!(names(&anime.genres), vec!["Action"]);
    }

    #[test]
    fn test_missing_data() {
        let page: JikanPage<JikanAnime> = serde_json::from_str("{}").unwrap();
        assert!(page.data.is_none());
        let item: JikanItem<JikanAnime> = serde_json::from_str(r#"{ "data": null }"#).unwrap();
        assert!(item.data.is_none());
        let item: JikanItem<JikanAnime> = serde_json::from_str("{}").unwrap();
        assert!(item.data.is_none());
    }

    #[test]
    fn test_recommendation_page_without_default_items() {
        let page: JikanPage<RecommendationEntry> = serde_json::from_str(
            r#"{ "data": [{ "entry": { "mal_id": 2, "title": "Trigun" }, "votes": 3 }] }"#,
        )
        .unwrap();
        let data = page.data.unwrap();
        assert_eq!(data[0].entry.mal_id, 2);
        assert!(page.pagination.is_none());

        let empty: JikanPage<RecommendationEntry> = serde_json::from_str("{}").unwrap();
        assert!(empty.data.is_none());
    }
}
