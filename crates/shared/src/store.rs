//! Typed access to the persisted vault collections.
//!
//! `VaultStore` wraps the database and exposes get/set pairs for the four
//! named collections. Every accessor loads or saves the whole collection as
//! one JSON text value, mirroring the single-entry-per-collection layout of
//! the vault table. Deduplication no-ops are reported as `Ok(false)` so
//! callers can tell "nothing changed" apart from a storage fault.

use crate::models::{
    FavoriteEntry, FavoriteList, Preferences, SearchHistory, ViewHistory, ViewHistoryEntry,
};
use crate::Database;
use anyhow::{Context, Result};
use chrono::Utc;
use rusqlite::{params, OptionalExtension};
use serde::{de::DeserializeOwned, Serialize};
use tracing::debug;

/// Named rows in the vault table
const FAVORITES: &str = "favorites";
const SEARCH_HISTORY: &str = "search_history";
const VIEW_HISTORY: &str = "view_history";
const PREFERENCES: &str = "preferences";

/// Store over the four persisted collections
pub struct VaultStore {
    db: Database,
}

impl VaultStore {
    /// Create a store over an opened database
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Load one named collection, falling back to its default when the row
    /// is missing (a fresh database is seeded, but the default keeps even a
    /// hand-emptied table usable).
    fn load<T: DeserializeOwned + Default>(&self, name: &str) -> Result<T> {
        let text: Option<String> = self
            .db
            .conn()
            .query_row(
                "SELECT value FROM vault WHERE name = ?1",
                params![name],
                |row| row.get(0),
            )
            .optional()
            .with_context(|| format!("Failed to read vault entry '{}'", name))?;

        match text {
            Some(text) => serde_json::from_str(&text)
                .with_context(|| format!("Failed to decode vault entry '{}'", name)),
            None => Ok(T::default()),
        }
    }

    /// Save one named collection, replacing the previous value
    fn save<T: Serialize>(&self, name: &str, value: &T) -> Result<()> {
        let text = serde_json::to_string(value)
            .with_context(|| format!("Failed to encode vault entry '{}'", name))?;

        self.db
            .conn()
            .execute(
                "INSERT INTO vault (name, value, updated_at) VALUES (?1, ?2, datetime('now'))
                 ON CONFLICT(name) DO UPDATE SET
                     value = excluded.value,
                     updated_at = excluded.updated_at",
                params![name, text],
            )
            .with_context(|| format!("Failed to write vault entry '{}'", name))?;

        debug!(entry = name, bytes = text.len(), "Vault entry saved");
        Ok(())
    }

    // ========== Favorites ==========

    pub fn favorites(&self) -> Result<FavoriteList> {
        self.load(FAVORITES)
    }

    /// Add a favorite. Returns false (and writes nothing) when the id is
    /// already favorited.
    pub fn add_favorite(&self, entry: FavoriteEntry) -> Result<bool> {
        let mut list = self.favorites()?;
        let mal_id = entry.mal_id;

        if !list.insert(entry) {
            debug!(mal_id, "Favorite already present");
            return Ok(false);
        }

        self.save(FAVORITES, &list)?;
        Ok(true)
    }

    /// Remove a favorite. Idempotent: returns false when the id was absent.
    pub fn remove_favorite(&self, mal_id: u32) -> Result<bool> {
        let mut list = self.favorites()?;

        if !list.remove(mal_id) {
            return Ok(false);
        }

        self.save(FAVORITES, &list)?;
        Ok(true)
    }

    pub fn is_favorite(&self, mal_id: u32) -> Result<bool> {
        Ok(self.favorites()?.contains(mal_id))
    }

    // ========== Search history ==========

    pub fn search_history(&self) -> Result<SearchHistory> {
        self.load(SEARCH_HISTORY)
    }

    /// Record a search. Returns false for queries that normalize to the
    /// empty string; repeated queries collapse to one entry at the front.
    pub fn record_search(&self, raw: &str) -> Result<bool> {
        let mut history = self.search_history()?;

        if !history.record(raw, Utc::now()) {
            return Ok(false);
        }

        self.save(SEARCH_HISTORY, &history)?;
        Ok(true)
    }

    pub fn clear_search_history(&self) -> Result<()> {
        self.save(SEARCH_HISTORY, &SearchHistory::new())
    }

    // ========== View history ==========

    pub fn view_history(&self) -> Result<ViewHistory> {
        self.load(VIEW_HISTORY)
    }

    /// Record a viewed anime; repeat views move the entry to the front
    pub fn record_view(&self, entry: ViewHistoryEntry) -> Result<()> {
        let mut history = self.view_history()?;
        history.record(entry);
        self.save(VIEW_HISTORY, &history)
    }

    pub fn clear_view_history(&self) -> Result<()> {
        self.save(VIEW_HISTORY, &ViewHistory::new())
    }

    // ========== Preferences ==========

    pub fn preferences(&self) -> Result<Preferences> {
        self.load(PREFERENCES)
    }

    pub fn set_preferences(&self, preferences: &Preferences) -> Result<()> {
        self.save(PREFERENCES, preferences)
    }
}
