//! Shared foundation for AnimeVault.
//!
//! This crate provides the functionality used across the workspace:
//! - Configuration management
//! - Persisted data models and their collection rules
//! - The SQLite-backed vault store
//! - File path utilities
//! - Logging infrastructure

pub mod config;
pub mod db;
pub mod logging;
pub mod models;
pub mod paths;
pub mod store;

// Re-export commonly used types
pub use config::Config;
pub use db::Database;
pub use logging::LogConfig;
pub use models::*;
pub use paths::DataPaths;
pub use store::VaultStore;

/// Common result type using anyhow::Error
pub type Result<T> = anyhow::Result<T>;
