//! Data models for the vault.
//!
//! Defines the persisted entry types (favorites, search history, view
//! history, preferences) and the collection types that own their rules:
//! per-collection caps, most-recent-first ordering, and deduplication.
//! The collections are plain values so the rules hold no matter which
//! storage backend loads and saves them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Maximum number of favorite entries kept (oldest evicted)
pub const FAVORITES_CAP: usize = 100;

/// Maximum number of search history entries kept
pub const SEARCH_HISTORY_CAP: usize = 20;

/// Maximum number of view history entries kept
pub const VIEW_HISTORY_CAP: usize = 50;

/// A favorited anime: projection of the catalog record plus a timestamp
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FavoriteEntry {
    pub mal_id: u32,
    pub title: String,
    pub image_url: Option<String>,
    pub score: Option<f64>,
    pub anime_type: Option<String>,
    pub added_at: DateTime<Utc>,
}

/// Favorites collection; unique by `mal_id`, most recent first, capped
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FavoriteList(Vec<FavoriteEntry>);

impl FavoriteList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[FavoriteEntry] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, mal_id: u32) -> bool {
        self.0.iter().any(|entry| entry.mal_id == mal_id)
    }

    /// Insert a favorite at the front.
    ///
    /// Returns false without modifying the list when the id is already
    /// present. When the cap is exceeded the oldest entry is evicted.
    pub fn insert(&mut self, entry: FavoriteEntry) -> bool {
        if self.contains(entry.mal_id) {
            return false;
        }
        self.0.insert(0, entry);
        self.0.truncate(FAVORITES_CAP);
        true
    }

    /// Remove by id. Idempotent: returns false when the id was absent.
    pub fn remove(&mut self, mal_id: u32) -> bool {
        let before = self.0.len();
        self.0.retain(|entry| entry.mal_id != mal_id);
        self.0.len() != before
    }
}

/// One remembered search: normalized form plus the casing the user typed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHistoryEntry {
    /// Trimmed, lowercased query used for deduplication
    pub normalized: String,
    /// The query exactly as submitted most recently
    pub query: String,
    pub searched_at: DateTime<Utc>,
}

/// Normalize a raw query for deduplication: trim and lowercase
pub fn normalize_query(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Search history; deduplicated by normalized query, most recent first
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SearchHistory(Vec<SearchHistoryEntry>);

impl SearchHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[SearchHistoryEntry] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Record a search at the front of the history.
    ///
    /// Queries that normalize to the empty string are rejected (returns
    /// false). A query that normalizes to an existing entry replaces it,
    /// keeping the most recent original casing.
    pub fn record(&mut self, raw: &str, at: DateTime<Utc>) -> bool {
        let normalized = normalize_query(raw);
        if normalized.is_empty() {
            return false;
        }

        self.0.retain(|entry| entry.normalized != normalized);
        self.0.insert(
            0,
            SearchHistoryEntry {
                normalized,
                query: raw.trim().to_string(),
                searched_at: at,
            },
        );
        self.0.truncate(SEARCH_HISTORY_CAP);
        true
    }
}

/// A viewed anime: projection of the catalog record plus a timestamp
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewHistoryEntry {
    pub mal_id: u32,
    pub title: String,
    pub image_url: Option<String>,
    pub viewed_at: DateTime<Utc>,
}

/// View history; deduplicated by `mal_id`, most recent first, capped
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ViewHistory(Vec<ViewHistoryEntry>);

impl ViewHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[ViewHistoryEntry] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Record a view at the front. A repeat view of the same id moves the
    /// entry to the front with a fresh timestamp instead of growing the list.
    pub fn record(&mut self, entry: ViewHistoryEntry) {
        self.0.retain(|existing| existing.mal_id != entry.mal_id);
        self.0.insert(0, entry);
        self.0.truncate(VIEW_HISTORY_CAP);
    }
}

/// Result ordering requested from the catalog
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Score,
    Popularity,
    Title,
}

impl SortOrder {
    /// Map to the catalog's `order_by` / `sort` query parameters
    pub fn query_params(&self) -> (&'static str, &'static str) {
        match self {
            SortOrder::Score => ("score", "desc"),
            // Lower popularity rank means more popular
            SortOrder::Popularity => ("popularity", "asc"),
            SortOrder::Title => ("title", "asc"),
        }
    }
}

impl std::fmt::Display for SortOrder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SortOrder::Score => write!(f, "score"),
            SortOrder::Popularity => write!(f, "popularity"),
            SortOrder::Title => write!(f, "title"),
        }
    }
}

impl std::str::FromStr for SortOrder {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "score" => Ok(SortOrder::Score),
            "popularity" => Ok(SortOrder::Popularity),
            "title" => Ok(SortOrder::Title),
            _ => Err(anyhow::anyhow!("Invalid sort order: {}", s)),
        }
    }
}

/// User preferences persisted alongside the collections.
///
/// Every field carries a default so values written by older versions
/// deserialize cleanly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Preferences {
    /// Append `sfw=true` to list and search queries
    pub sfw_only: bool,
    /// Rows shown per rendered list section
    pub page_size: usize,
    /// Default ordering for search results
    pub default_sort: SortOrder,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            sfw_only: true,
            page_size: 10,
            default_sort: SortOrder::Score,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn favorite(mal_id: u32, title: &str) -> FavoriteEntry {
        FavoriteEntry {
            mal_id,
            title: title.to_string(),
            image_url: None,
            score: Some(8.0),
            anime_type: Some("TV".to_string()),
            added_at: Utc::now(),
        }
    }

    #[test]
    fn test_favorite_duplicate_is_rejected() {
        let mut list = FavoriteList::new();

        assert!(list.insert(favorite(1, "Cowboy Bebop")));
        assert!(!list.insert(favorite(1, "Cowboy Bebop")));
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn test_favorite_cap_evicts_oldest() {
        let mut list = FavoriteList::new();

        for id in 0..FAVORITES_CAP as u32 + 5 {
            assert!(list.insert(favorite(id, "title")));
        }

        assert_eq!(list.len(), FAVORITES_CAP);
        // Most recent insertions survive; the first five were evicted.
        assert!(list.contains(FAVORITES_CAP as u32 + 4));
        assert!(!list.contains(0));
        assert!(!list.contains(4));
        assert!(list.contains(5));
    }

    #[test]
    fn test_favorite_remove_is_idempotent() {
        let mut list = FavoriteList::new();
        list.insert(favorite(7, "Mushishi"));

        assert!(list.remove(7));
        assert!(!list.remove(7));
        assert!(list.is_empty());
    }

    #[test]
    fn test_favorites_ordered_most_recent_first() {
        let mut list = FavoriteList::new();
        list.insert(favorite(1, "first"));
        list.insert(favorite(2, "second"));

        assert_eq!(list.entries()[0].mal_id, 2);
        assert_eq!(list.entries()[1].mal_id, 1);
    }

    #[test]
    fn test_search_history_collapses_casing() {
        let mut history = SearchHistory::new();

        assert!(history.record("Naruto", Utc::now()));
        assert!(history.record("naruto", Utc::now()));

        assert_eq!(history.len(), 1);
        assert_eq!(history.entries()[0].normalized, "naruto");
        // Most recent original casing wins.
        assert_eq!(history.entries()[0].query, "naruto");
    }

    #[test]
    fn test_search_history_rejects_blank() {
        let mut history = SearchHistory::new();

        assert!(!history.record("   ", Utc::now()));
        assert!(!history.record("", Utc::now()));
        assert!(history.is_empty());
    }

    #[test]
    fn test_search_history_cap() {
        let mut history = SearchHistory::new();

        for i in 0..SEARCH_HISTORY_CAP + 3 {
            assert!(history.record(&format!("query {}", i), Utc::now()));
        }

        assert_eq!(history.len(), SEARCH_HISTORY_CAP);
        assert_eq!(
            history.entries()[0].query,
            format!("query {}", SEARCH_HISTORY_CAP + 2)
        );
    }

    #[test]
    fn test_search_history_trims_stored_query() {
        let mut history = SearchHistory::new();

        assert!(history.record("  One Piece  ", Utc::now()));
        assert_eq!(history.entries()[0].query, "One Piece");
        assert_eq!(history.entries()[0].normalized, "one piece");
    }

    #[test]
    fn test_view_history_repeat_moves_to_front() {
        let mut history = ViewHistory::new();
        let view = |mal_id: u32| ViewHistoryEntry {
            mal_id,
            title: format!("anime {}", mal_id),
            image_url: None,
            viewed_at: Utc::now(),
        };

        history.record(view(1));
        history.record(view(2));
        history.record(view(1));

        assert_eq!(history.len(), 2);
        assert_eq!(history.entries()[0].mal_id, 1);
        assert_eq!(history.entries()[1].mal_id, 2);
    }

    #[test]
    fn test_view_history_cap() {
        let mut history = ViewHistory::new();

        for id in 0..VIEW_HISTORY_CAP as u32 + 10 {
            history.record(ViewHistoryEntry {
                mal_id: id,
                title: String::new(),
                image_url: None,
                viewed_at: Utc::now(),
            });
        }

        assert_eq!(history.len(), VIEW_HISTORY_CAP);
    }

    #[test]
    fn test_preferences_defaults() {
        let prefs: Preferences = serde_json::from_str("{}").unwrap();

        assert!(prefs.sfw_only);
        assert_eq!(prefs.page_size, 10);
        assert_eq!(prefs.default_sort, SortOrder::Score);
    }

    #[test]
    fn test_sort_order_round_trip() {
        for order in [SortOrder::Score, SortOrder::Popularity, SortOrder::Title] {
            let parsed: SortOrder = order.to_string().parse().unwrap();
            assert_eq!(parsed, order);
        }
    }
}
