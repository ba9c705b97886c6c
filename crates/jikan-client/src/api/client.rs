//! Jikan API client with request throttling and response caching.

use super::rate_limiter::RateLimiter;
use super::types::*;
use crate::cache::{CacheStats, ResponseCache};
use crate::error::ApiError;
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, info, warn};

/// User agent sent with every request
const USER_AGENT: &str = "AnimeVault/0.1.0";

/// Filter for the top anime endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TopFilter {
    Airing,
    Upcoming,
    ByPopularity,
    Favorite,
}

impl TopFilter {
    pub fn as_str(&self) -> &'static str {
        match self {
            TopFilter::Airing => "airing",
            TopFilter::Upcoming => "upcoming",
            TopFilter::ByPopularity => "bypopularity",
            TopFilter::Favorite => "favorite",
        }
    }
}

/// Builder for the anime search endpoint.
///
/// Produces a deterministic endpoint string so identical queries map to the
/// same request path.
#[derive(Debug, Clone, Default)]
pub struct SearchQuery {
    query: String,
    page: Option<u32>,
    limit: Option<u32>,
    genres: Vec<u32>,
    sfw: bool,
    order_by: Option<(String, String)>,
}

impl SearchQuery {
    /// Start a search for `query`. An empty query lists anime by the other
    /// filters alone, which is how genre browsing works.
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            ..Self::default()
        }
    }

    pub fn page(mut self, page: u32) -> Self {
        self.page = Some(page);
        self
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn genre(mut self, genre_id: u32) -> Self {
        self.genres.push(genre_id);
        self
    }

    /// Restrict results to safe-for-work entries.
    pub fn sfw(mut self, sfw: bool) -> Self {
        self.sfw = sfw;
        self
    }

    /// Order results by `field` in `direction` ("asc" or "desc").
    pub fn order_by(mut self, field: impl Into<String>, direction: impl Into<String>) -> Self {
        self.order_by = Some((field.into(), direction.into()));
        self
    }

    /// Render the endpoint path, percent-encoding the query text.
    pub fn to_endpoint(&self) -> String {
        let mut params = Vec::new();

        if !self.query.is_empty() {
            params.push(format!("q={}", encode_query(&self.query)));
        }
        if let Some(page) = self.page {
            params.push(format!("page={}", page));
        }
        if let Some(limit) = self.limit {
            params.push(format!("limit={}", limit));
        }
        if !self.genres.is_empty() {
            let ids: Vec<String> = self.genres.iter().map(|id| id.to_string()).collect();
            params.push(format!("genres={}", ids.join(",")));
        }
        if self.sfw {
            params.push("sfw=true".to_string());
        }
        if let Some((field, direction)) = &self.order_by {
            params.push(format!("order_by={}&sort={}", field, direction));
        }

        format!("/anime?{}", params.join("&"))
    }
}

/// Percent-encode a query value per RFC 3986, leaving unreserved characters
/// untouched.
fn encode_query(value: &str) -> String {
    let mut encoded = String::with_capacity(value.len());
    for byte in value.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                encoded.push(byte as char);
            }
            _ => encoded.push_str(&format!("%{:02X}", byte)),
        }
    }
    encoded
}

/// Jikan API v4 client.
///
/// Requests pass through the rate limiter before hitting the network, and
/// cacheable responses are served from the in-memory cache keyed by endpoint
/// path. Search and random endpoints always skip the cache so repeated calls
/// observe fresh results.
pub struct JikanClient {
    client: Client,
    base_url: String,
    rate_limiter: RateLimiter,
    cache: ResponseCache,
}

impl JikanClient {
    /// Create a new Jikan client.
    pub fn new(
        base_url: String,
        timeout_secs: u64,
        throttle_interval_ms: u64,
        cache: ResponseCache,
    ) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .user_agent(USER_AGENT)
            .build()
            .map_err(|source| ApiError::Build { source })?;

        Ok(Self {
            client,
            base_url,
            rate_limiter: RateLimiter::new(throttle_interval_ms),
            cache,
        })
    }

    /// Make a GET request, consulting the cache first when `use_cache` is set.
    ///
    /// The endpoint path doubles as the cache key. Every network request
    /// waits on the rate limiter; cache hits do not.
    async fn get<T: DeserializeOwned>(&self, endpoint: &str, use_cache: bool) -> Result<T, ApiError> {
        if use_cache {
            if let Some(body) = self.cache.lookup(endpoint).await {
                return serde_json::from_str(&body).map_err(|source| ApiError::Decode {
                    endpoint: endpoint.to_string(),
                    source,
                });
            }
        }

        self.rate_limiter.acquire().await;

        let url = format!("{}{}", self.base_url, endpoint);
        debug!(url = %url, "Making API request");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|source| ApiError::Transport {
                endpoint: endpoint.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            warn!(url = %url, status = %status, "Request failed");
            return Err(ApiError::Status {
                endpoint: endpoint.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|source| ApiError::Transport {
                endpoint: endpoint.to_string(),
                source,
            })?;

        let data = serde_json::from_str(&body).map_err(|source| ApiError::Decode {
            endpoint: endpoint.to_string(),
            source,
        })?;

        if use_cache {
            self.cache.insert(endpoint, body).await;
        }

        Ok(data)
    }

    /// Fetch a page of top anime under the given ranking filter
    pub async fn top_anime(&self, filter: TopFilter, page: u32) -> Result<PagedResponse<Anime>, ApiError> {
        info!(filter = filter.as_str(), page = page, "Fetching top anime");
        self.get(&format!("/top/anime?filter={}&page={}", filter.as_str(), page), true)
            .await
    }

    /// Fetch anime airing in the current season
    pub async fn season_now(&self, page: u32) -> Result<PagedResponse<Anime>, ApiError> {
        info!(page = page, "Fetching current season");
        self.get(&format!("/seasons/now?page={}", page), true).await
    }

    /// Search anime. Never cached: repeated searches should see fresh results.
    pub async fn search_anime(&self, query: &SearchQuery) -> Result<PagedResponse<Anime>, ApiError> {
        let endpoint = query.to_endpoint();
        info!(endpoint = %endpoint, "Searching anime");
        self.get(&endpoint, false).await
    }

    /// Fetch full details for one anime by MAL ID
    pub async fn anime_details(&self, mal_id: u32) -> Result<Anime, ApiError> {
        debug!(mal_id = mal_id, "Fetching anime details");
        let response: Envelope<Anime> = self.get(&format!("/anime/{}", mal_id), true).await?;
        Ok(response.data)
    }

    /// Fetch the character credits for an anime
    pub async fn anime_characters(&self, mal_id: u32) -> Result<Vec<CharacterEdge>, ApiError> {
        debug!(mal_id = mal_id, "Fetching anime characters");
        let response: Envelope<Vec<CharacterEdge>> =
            self.get(&format!("/anime/{}/characters", mal_id), true).await?;
        Ok(response.data)
    }

    /// Fetch user-voted recommendations for an anime
    pub async fn anime_recommendations(&self, mal_id: u32) -> Result<Vec<RecommendationEdge>, ApiError> {
        debug!(mal_id = mal_id, "Fetching anime recommendations");
        let response: Envelope<Vec<RecommendationEdge>> =
            self.get(&format!("/anime/{}/recommendations", mal_id), true).await?;
        Ok(response.data)
    }

    /// Fetch related entries (sequels, adaptations, ...) for an anime
    pub async fn anime_relations(&self, mal_id: u32) -> Result<Vec<RelationGroup>, ApiError> {
        debug!(mal_id = mal_id, "Fetching anime relations");
        let response: Envelope<Vec<RelationGroup>> =
            self.get(&format!("/anime/{}/relations", mal_id), true).await?;
        Ok(response.data)
    }

    /// Fetch the full genre list
    pub async fn genres(&self) -> Result<Vec<Genre>, ApiError> {
        info!("Fetching anime genres");
        let response: Envelope<Vec<Genre>> = self.get("/genres/anime", true).await?;
        Ok(response.data)
    }

    /// Fetch a random anime. Never cached, each call should surprise.
    pub async fn random_anime(&self) -> Result<Anime, ApiError> {
        debug!("Fetching random anime");
        let response: Envelope<Anime> = self.get("/random/anime", false).await?;
        Ok(response.data)
    }

    /// Get current cache statistics
    pub async fn cache_stats(&self) -> CacheStats {
        self.cache.stats().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let cache = ResponseCache::new(Duration::from_secs(300), 100);
        let client = JikanClient::new("https://api.jikan.moe/v4".to_string(), 30, 1000, cache);
        assert!(client.is_ok());
    }

    #[test]
    fn test_search_query_full_endpoint() {
        let endpoint = SearchQuery::new("fullmetal alchemist")
            .page(2)
            .limit(10)
            .sfw(true)
            .order_by("score", "desc")
            .to_endpoint();

        assert_eq!(
            endpoint,
            "/anime?q=fullmetal%20alchemist&page=2&limit=10&sfw=true&order_by=score&sort=desc"
        );
    }

    #[test]
    fn test_search_query_genre_browse() {
        // Genre browsing is a search with no query text
        let endpoint = SearchQuery::new("").genre(1).genre(4).page(1).to_endpoint();
        assert_eq!(endpoint, "/anime?page=1&genres=1,4");
    }

    #[test]
    fn test_encode_query_keeps_unreserved_characters() {
        assert_eq!(encode_query("Steins.Gate-0_~"), "Steins.Gate-0_~");
    }

    #[test]
    fn test_encode_query_escapes_specials() {
        assert_eq!(encode_query("fate/stay night"), "fate%2Fstay%20night");
        assert_eq!(encode_query("a&b=c"), "a%26b%3Dc");
        // Multi-byte characters are encoded per byte
        assert_eq!(encode_query("é"), "%C3%A9");
    }

    #[test]
    fn test_top_filter_strings() {
        assert_eq!(TopFilter::ByPopularity.as_str(), "bypopularity");
        assert_eq!(TopFilter::Upcoming.as_str(), "upcoming");
    }
}
