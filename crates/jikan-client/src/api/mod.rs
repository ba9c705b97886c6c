//! Jikan API v4 client implementation.
//!
//! This module provides a rate-limited, cache-backed client for interacting
//! with the Jikan API (MyAnimeList unofficial API).

pub mod client;
pub mod rate_limiter;
pub mod types;

pub use client::{JikanClient, SearchQuery, TopFilter};
pub use rate_limiter::RateLimiter;
pub use types::*;
