//! Jikan API client library for AnimeVault.
//!
//! Provides a throttled, cache-backed HTTP client for the Jikan API v4,
//! the response types the catalog endpoints return, and the error taxonomy
//! request failures are reported through.

pub mod api;
pub mod cache;
pub mod error;

pub use api::{JikanClient, RateLimiter, SearchQuery, TopFilter};
pub use cache::{CacheStats, ResponseCache};
pub use error::ApiError;
