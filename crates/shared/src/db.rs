//! SQLite database handling for the vault.
//!
//! Opens or creates the database file and applies the embedded schema.
//! The schema is idempotent, so it runs on every open; first use seeds the
//! four named collections with empty defaults.

use anyhow::{Context, Result};
use rusqlite::Connection;
use std::path::Path;
use tracing::{debug, info};

/// Database connection wrapper
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open or create a database at the given path
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let is_new = !path.exists();

        debug!(path = %path.display(), "Opening vault database");

        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open database at {}", path.display()))?;

        let db = Self { conn };
        db.apply_schema()?;

        if is_new {
            info!(path = %path.display(), "Created new vault database");
        }

        Ok(db)
    }

    /// Open an in-memory database (used by tests and dry runs)
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().context("Failed to open in-memory database")?;

        let db = Self { conn };
        db.apply_schema()?;

        Ok(db)
    }

    /// Apply the embedded schema. Safe to call repeatedly.
    fn apply_schema(&self) -> Result<()> {
        self.conn
            .execute_batch(include_str!("../schema.sql"))
            .context("Failed to apply vault schema")?;
        Ok(())
    }

    /// Get a reference to the underlying connection
    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Check if a table exists
    pub fn table_exists(&self, table_name: &str) -> Result<bool> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name=?1",
            [table_name],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_create_database() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let db_path = temp_dir.path().join("vault.db");

        let db = Database::open(&db_path)?;
        assert!(db_path.exists());
        assert!(db.table_exists("vault")?);

        Ok(())
    }

    #[test]
    fn test_reopen_is_idempotent() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let db_path = temp_dir.path().join("vault.db");

        {
            let db = Database::open(&db_path)?;
            db.conn().execute(
                "UPDATE vault SET value = ?1 WHERE name = 'favorites'",
                ["[{\"marker\":true}]"],
            )?;
        }

        // Reopening applies the schema again but must not reset seeded rows.
        let db = Database::open(&db_path)?;
        let value: String = db.conn().query_row(
            "SELECT value FROM vault WHERE name = 'favorites'",
            [],
            |row| row.get(0),
        )?;
        assert_eq!(value, "[{\"marker\":true}]");

        Ok(())
    }

    #[test]
    fn test_seeds_named_collections() -> Result<()> {
        let db = Database::open_in_memory()?;

        let count: i64 = db
            .conn()
            .query_row("SELECT COUNT(*) FROM vault", [], |row| row.get(0))?;
        assert_eq!(count, 4);

        let prefs: String = db.conn().query_row(
            "SELECT value FROM vault WHERE name = 'preferences'",
            [],
            |row| row.get(0),
        )?;
        assert_eq!(prefs, "{}");

        Ok(())
    }
}
