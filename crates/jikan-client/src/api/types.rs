//! Jikan API v4 response types.
//!
//! These types represent the JSON responses from the Jikan API. Every
//! endpoint wraps its payload in a `data` field; paginated endpoints add a
//! `pagination` sibling.

use serde::{Deserialize, Serialize};

/// Wrapper around a single `data` payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub data: T,
}

/// Paginated list response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PagedResponse<T> {
    pub data: Vec<T>,
    pub pagination: Pagination,
}

/// Pagination metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pagination {
    pub last_visible_page: u32,
    pub has_next_page: bool,
    pub current_page: u32,
    #[serde(default)]
    pub items: Option<PaginationItems>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginationItems {
    pub count: u32,
    pub total: u32,
    pub per_page: u32,
}

/// Anime resource as returned by list, detail and random endpoints.
///
/// The API returns the same shape everywhere, so a single type covers top
/// lists, search results and `/anime/{id}` lookups.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Anime {
    pub mal_id: u32,
    pub url: String,
    pub images: AnimeImages,

    // Titles
    pub title: String,
    pub title_english: Option<String>,
    pub title_japanese: Option<String>,

    // Type and status
    #[serde(rename = "type")]
    pub anime_type: Option<String>,
    pub source: Option<String>,
    pub episodes: Option<u32>,
    pub status: Option<String>,

    // Dates
    #[serde(default)]
    pub aired: Aired,
    pub duration: Option<String>,
    pub rating: Option<String>,

    // Scores and rankings
    pub score: Option<f64>,
    pub scored_by: Option<u32>,
    pub rank: Option<u32>,
    pub popularity: Option<u32>,
    pub members: Option<u32>,
    pub favorites: Option<u32>,

    // Synopsis
    pub synopsis: Option<String>,

    // Season
    pub season: Option<String>,
    pub year: Option<u32>,

    // Genres and studios
    #[serde(default)]
    pub genres: Vec<MalEntity>,
    #[serde(default)]
    pub studios: Vec<MalEntity>,
}

impl Anime {
    /// Best available cover image URL, preferring the regular JPEG size.
    pub fn image_url(&self) -> Option<&str> {
        self.images
            .jpg
            .image_url
            .as_deref()
            .or(self.images.jpg.large_image_url.as_deref())
            .or(self.images.jpg.small_image_url.as_deref())
    }
}

/// Anime images
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnimeImages {
    pub jpg: ImageSet,
    #[serde(default)]
    pub webp: Option<ImageSet>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ImageSet {
    pub image_url: Option<String>,
    pub small_image_url: Option<String>,
    pub large_image_url: Option<String>,
}

/// Aired dates
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Aired {
    pub from: Option<String>,
    pub to: Option<String>,
}

/// MAL entity (genre, studio, producer, etc.)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MalEntity {
    pub mal_id: u32,
    #[serde(rename = "type")]
    pub entity_type: String,
    pub name: String,
    pub url: String,
}

/// Genre list item from `/genres/anime`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Genre {
    pub mal_id: u32,
    pub name: String,
    pub url: String,
    pub count: u32,
}

/// One character credit from `/anime/{id}/characters`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CharacterEdge {
    pub character: CharacterInfo,
    pub role: String,
    #[serde(default)]
    pub favorites: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CharacterInfo {
    pub mal_id: u32,
    pub name: String,
    pub url: String,
}

/// One recommendation from `/anime/{id}/recommendations`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendationEdge {
    pub entry: RecommendationEntry,
    #[serde(default)]
    pub votes: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendationEntry {
    pub mal_id: u32,
    pub title: String,
    pub url: String,
}

/// Related entries grouped by relation kind, from `/anime/{id}/relations`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelationGroup {
    pub relation: String,
    pub entry: Vec<MalEntity>,
}

#[cfg(test)]
mod tests {
    use super::*;

    const ANIME_JSON: &str = r#"{
        "mal_id": 5114,
        "url": "https://myanimelist.net/anime/5114",
        "images": {
            "jpg": {
                "image_url": "https://cdn.myanimelist.net/images/anime/1208/94745.jpg",
                "small_image_url": null,
                "large_image_url": null
            }
        },
        "title": "Fullmetal Alchemist: Brotherhood",
        "title_english": "Fullmetal Alchemist: Brotherhood",
        "title_japanese": "鋼の錬金術師",
        "type": "TV",
        "source": "Manga",
        "episodes": 64,
        "status": "Finished Airing",
        "aired": { "from": "2009-04-05T00:00:00+00:00", "to": "2010-07-04T00:00:00+00:00" },
        "duration": "24 min per ep",
        "rating": "R - 17+ (violence & profanity)",
        "score": 9.1,
        "scored_by": 2000000,
        "rank": 1,
        "popularity": 3,
        "members": 3000000,
        "favorites": 200000,
        "synopsis": "After a horrific alchemy experiment goes wrong...",
        "season": "spring",
        "year": 2009,
        "genres": [
            { "mal_id": 1, "type": "anime", "name": "Action", "url": "https://myanimelist.net/anime/genre/1" }
        ],
        "studios": [
            { "mal_id": 4, "type": "anime", "name": "Bones", "url": "https://myanimelist.net/anime/producer/4" }
        ]
    }"#;

    #[test]
    fn test_decode_anime_envelope() {
        let envelope: Envelope<Anime> =
            serde_json::from_str(&format!("{{\"data\": {}}}", ANIME_JSON)).unwrap();
        let anime = envelope.data;

        assert_eq!(anime.mal_id, 5114);
        assert_eq!(anime.anime_type.as_deref(), Some("TV"));
        assert_eq!(anime.genres.len(), 1);
        assert_eq!(anime.genres[0].name, "Action");
        assert_eq!(
            anime.image_url(),
            Some("https://cdn.myanimelist.net/images/anime/1208/94745.jpg")
        );
    }

    #[test]
    fn test_decode_paged_response_with_sparse_entries() {
        // List entries sometimes omit optional blocks entirely
        let json = r#"{
            "data": [{
                "mal_id": 1,
                "url": "https://myanimelist.net/anime/1",
                "images": { "jpg": {} },
                "title": "Cowboy Bebop",
                "title_english": null,
                "title_japanese": null,
                "type": "TV",
                "source": null,
                "episodes": 26,
                "status": "Finished Airing",
                "duration": null,
                "rating": null,
                "score": 8.75,
                "scored_by": null,
                "rank": 47,
                "popularity": 43,
                "members": null,
                "favorites": null,
                "synopsis": null,
                "season": null,
                "year": null
            }],
            "pagination": {
                "last_visible_page": 20,
                "has_next_page": true,
                "current_page": 1
            }
        }"#;

        let page: PagedResponse<Anime> = serde_json::from_str(json).unwrap();
        assert_eq!(page.data.len(), 1);
        assert!(page.data[0].genres.is_empty());
        assert_eq!(page.data[0].image_url(), None);
        assert!(page.pagination.has_next_page);
    }

    #[test]
    fn test_decode_character_and_recommendation_edges() {
        let characters = r#"{ "data": [{
            "character": { "mal_id": 71, "name": "Edward Elric", "url": "https://myanimelist.net/character/11" },
            "role": "Main",
            "favorites": 50000
        }]}"#;
        let recs = r#"{ "data": [{
            "entry": { "mal_id": 11061, "title": "Hunter x Hunter (2011)", "url": "https://myanimelist.net/anime/11061" },
            "votes": 120
        }]}"#;

        let characters: Envelope<Vec<CharacterEdge>> = serde_json::from_str(characters).unwrap();
        assert_eq!(characters.data[0].role, "Main");

        let recs: Envelope<Vec<RecommendationEdge>> = serde_json::from_str(recs).unwrap();
        assert_eq!(recs.data[0].entry.mal_id, 11061);
        assert_eq!(recs.data[0].votes, 120);
    }

    #[test]
    fn test_decode_relation_groups() {
        let json = r#"{ "data": [{
            "relation": "Adaptation",
            "entry": [{ "mal_id": 25, "type": "manga", "name": "Fullmetal Alchemist", "url": "https://myanimelist.net/manga/25" }]
        }]}"#;

        let relations: Envelope<Vec<RelationGroup>> = serde_json::from_str(json).unwrap();
        assert_eq!(relations.data[0].relation, "Adaptation");
        assert_eq!(relations.data[0].entry[0].entity_type, "manga");
    }
}
