//! Homepage controller: browse, search and genre listings.

use jikan_client::{JikanClient, SearchQuery, TopFilter};
use shared::models::normalize_query;
use shared::VaultStore;
use tracing::{debug, error, warn};

use crate::pages::{preferences_or_default, PageState};
use crate::view::{self, Notice};

/// What the homepage was asked to show
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HomeRequest {
    Browse { page: u32 },
    Search { query: String, page: u32 },
    Genre { genre: String, page: u32 },
}

pub struct HomePage<'a> {
    client: &'a JikanClient,
    store: &'a VaultStore,
}

impl<'a> HomePage<'a> {
    pub fn new(client: &'a JikanClient, store: &'a VaultStore) -> Self {
        Self { client, store }
    }

    pub async fn run(&self, request: HomeRequest) -> PageState {
        debug!(state = %PageState::Loading, request = ?request, "Homepage loading");

        let state = match request {
            HomeRequest::Browse { page } => self.browse(page).await,
            HomeRequest::Search { query, page } => self.search(&query, page).await,
            HomeRequest::Genre { genre, page } => self.genre(&genre, page).await,
        };

        debug!(state = %state, "Homepage finished");
        state
    }

    /// The default landing view: trending plus seasonal side sections.
    ///
    /// Trending is the primary listing; if it fails the page is an error.
    /// The side sections degrade to a warning line each so one flaky
    /// endpoint does not blank the whole page.
    async fn browse(&self, page: u32) -> PageState {
        let prefs = preferences_or_default(self.store);

        let trending = match self.client.top_anime(TopFilter::ByPopularity, page).await {
            Ok(listing) => listing,
            Err(e) => {
                error!(error = %e, "Could not load the catalog");
                println!(
                    "{}",
                    view::notification(Notice::Error, &format!("Could not load the catalog: {}", e))
                );
                return PageState::Error;
            }
        };

        println!("{}", view::section("Trending Now"));
        println!("{}", view::anime_rows(&trending.data, prefs.page_size));
        println!("{}", view::pagination_line(&trending.pagination));

        let (season, upcoming) = tokio::join!(
            self.client.season_now(1),
            self.client.top_anime(TopFilter::Upcoming, 1),
        );

        println!("{}", view::section("This Season"));
        match season {
            Ok(listing) => println!("{}", view::anime_rows(&listing.data, prefs.page_size)),
            Err(e) => {
                warn!(error = %e, "Season listing unavailable");
                println!("{}", view::notification(Notice::Warning, "Season listing unavailable"));
            }
        }

        println!("{}", view::section("Coming Up"));
        match upcoming {
            Ok(listing) => println!("{}", view::anime_rows(&listing.data, prefs.page_size)),
            Err(e) => {
                warn!(error = %e, "Upcoming listing unavailable");
                println!(
                    "{}",
                    view::notification(Notice::Warning, "Upcoming listing unavailable")
                );
            }
        }

        self.recently_viewed(prefs.page_size);

        PageState::Content
    }

    fn recently_viewed(&self, limit: usize) {
        match self.store.view_history() {
            Ok(history) => {
                if !history.is_empty() {
                    let shown = history.len().min(limit);
                    println!("{}", view::section("Recently Viewed"));
                    println!("{}", view::view_history_rows(&history.entries()[..shown]));
                }
            }
            Err(e) => warn!(error = %e, "View history unavailable"),
        }
    }

    async fn search(&self, raw: &str, page: u32) -> PageState {
        if normalize_query(raw).is_empty() {
            println!("{}", view::notification(Notice::Info, "Nothing to search for"));
            return PageState::Idle;
        }

        // History is best effort, a storage hiccup must not block the search
        if let Err(e) = self.store.record_search(raw) {
            warn!(error = %e, "Search was not saved to history");
            println!(
                "{}",
                view::notification(Notice::Warning, "Search was not saved to history")
            );
        }

        let prefs = preferences_or_default(self.store);
        let (order_by, direction) = prefs.default_sort.query_params();
        let query = SearchQuery::new(raw.trim())
            .page(page)
            .limit(prefs.page_size as u32)
            .sfw(prefs.sfw_only)
            .order_by(order_by, direction);

        let results = match self.client.search_anime(&query).await {
            Ok(listing) => listing,
            Err(e) => {
                error!(error = %e, query = raw.trim(), "Search failed");
                println!(
                    "{}",
                    view::notification(Notice::Error, &format!("Search failed: {}", e))
                );
                return PageState::Error;
            }
        };

        println!("{}", view::section(&format!("Results for \"{}\"", raw.trim())));
        println!("{}", view::anime_rows(&results.data, prefs.page_size));
        println!("{}", view::pagination_line(&results.pagination));

        PageState::Content
    }

    async fn genre(&self, genre: &str, page: u32) -> PageState {
        let (genre_id, genre_name) = match self.resolve_genre(genre).await {
            Some(found) => found,
            None => {
                println!(
                    "{}",
                    view::notification(Notice::Error, &format!("Unknown genre \"{}\"", genre.trim()))
                );
                return PageState::Error;
            }
        };

        let prefs = preferences_or_default(self.store);
        let (order_by, direction) = prefs.default_sort.query_params();
        let query = SearchQuery::new("")
            .page(page)
            .limit(prefs.page_size as u32)
            .genre(genre_id)
            .sfw(prefs.sfw_only)
            .order_by(order_by, direction);

        let results = match self.client.search_anime(&query).await {
            Ok(listing) => listing,
            Err(e) => {
                error!(error = %e, genre = genre_name.as_str(), "Genre browse failed");
                println!(
                    "{}",
                    view::notification(Notice::Error, &format!("Genre browse failed: {}", e))
                );
                return PageState::Error;
            }
        };

        println!("{}", view::section(&format!("{} Anime", genre_name)));
        println!("{}", view::anime_rows(&results.data, prefs.page_size));
        println!("{}", view::pagination_line(&results.pagination));

        PageState::Content
    }

    /// Accepts a numeric MAL genre id or a genre name.
    ///
    /// Ids are taken at face value even when the catalog lookup fails,
    /// names need a catalog match.
    async fn resolve_genre(&self, genre: &str) -> Option<(u32, String)> {
        let known = match self.client.genres().await {
            Ok(list) => list,
            Err(e) => {
                warn!(error = %e, "Genre catalog unavailable");
                Vec::new()
            }
        };

        if let Ok(id) = genre.trim().parse::<u32>() {
            let name = known
                .iter()
                .find(|g| g.mal_id == id)
                .map(|g| g.name.clone())
                .unwrap_or_else(|| format!("Genre #{}", id));
            return Some((id, name));
        }

        known
            .iter()
            .find(|g| g.name.eq_ignore_ascii_case(genre.trim()))
            .map(|g| (g.mal_id, g.name.clone()))
    }
}
