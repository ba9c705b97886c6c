//! Page controllers.
//!
//! A page owns one fetch -> render -> persist flow. Every run moves through
//! the same lifecycle: `Idle -> Loading -> (Content | Error)`. Only a failure
//! of the page's primary record produces `Error`; secondary sections degrade
//! independently and never block the transition to `Content`.

pub mod detail;
pub mod fallback;
pub mod home;

use chrono::Utc;
use jikan_client::api::types::Anime;
use shared::models::{FavoriteEntry, Preferences, ViewHistoryEntry};
use shared::VaultStore;
use tracing::warn;

use crate::view::{self, Notice};

/// Lifecycle of a page run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageState {
    /// Request rejected before any fetch (e.g. blank search)
    Idle,
    /// Primary fetch in flight
    Loading,
    /// Primary rendered; secondaries resolved or degraded
    Content,
    /// Primary fetch failed
    Error,
}

impl PageState {
    pub fn is_error(&self) -> bool {
        matches!(self, PageState::Error)
    }
}

impl std::fmt::Display for PageState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            PageState::Idle => "idle",
            PageState::Loading => "loading",
            PageState::Content => "content",
            PageState::Error => "error",
        };
        write!(f, "{}", name)
    }
}

/// Project a catalog record into a favorites entry
pub fn favorite_from(anime: &Anime) -> FavoriteEntry {
    FavoriteEntry {
        mal_id: anime.mal_id,
        title: anime.title.clone(),
        image_url: anime.image_url().map(str::to_string),
        score: anime.score,
        anime_type: anime.anime_type.clone(),
        added_at: Utc::now(),
    }
}

/// Project a catalog record into a view history entry
pub fn view_entry_from(anime: &Anime) -> ViewHistoryEntry {
    ViewHistoryEntry {
        mal_id: anime.mal_id,
        title: anime.title.clone(),
        image_url: anime.image_url().map(str::to_string),
        viewed_at: Utc::now(),
    }
}

/// Load preferences, degrading to defaults on a storage fault
pub(crate) fn preferences_or_default(store: &VaultStore) -> Preferences {
    match store.preferences() {
        Ok(prefs) => prefs,
        Err(e) => {
            warn!(error = %e, "Failed to load preferences, using defaults");
            println!(
                "{}",
                view::notification(Notice::Warning, "Preferences unavailable, using defaults")
            );
            Preferences::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Anime {
        serde_json::from_value(serde_json::json!({
            "mal_id": 9253,
            "url": "https://myanimelist.net/anime/9253",
            "images": { "jpg": { "image_url": "https://cdn.example/9253.jpg" } },
            "title": "Steins;Gate",
            "type": "TV",
            "score": 9.07
        }))
        .unwrap()
    }

    #[test]
    fn test_favorite_projection_keeps_catalog_fields() {
        let entry = favorite_from(&sample());

        assert_eq!(entry.mal_id, 9253);
        assert_eq!(entry.title, "Steins;Gate");
        assert_eq!(entry.image_url.as_deref(), Some("https://cdn.example/9253.jpg"));
        assert_eq!(entry.score, Some(9.07));
        assert_eq!(entry.anime_type.as_deref(), Some("TV"));
    }

    #[test]
    fn test_view_projection_keeps_catalog_fields() {
        let entry = view_entry_from(&sample());

        assert_eq!(entry.mal_id, 9253);
        assert_eq!(entry.title, "Steins;Gate");
        assert!(entry.image_url.is_some());
    }

    #[test]
    fn test_state_names() {
        assert_eq!(PageState::Idle.to_string(), "idle");
        assert_eq!(PageState::Loading.to_string(), "loading");
        assert_eq!(PageState::Content.to_string(), "content");
        assert_eq!(PageState::Error.to_string(), "error");
        assert!(PageState::Error.is_error());
        assert!(!PageState::Content.is_error());
    }
}
