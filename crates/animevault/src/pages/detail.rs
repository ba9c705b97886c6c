//! Detail page controller: one title with its side sections.

use jikan_client::api::types::Anime;
use jikan_client::JikanClient;
use shared::VaultStore;
use tracing::{debug, error, warn};

use crate::pages::{fallback, preferences_or_default, view_entry_from, PageState};
use crate::view::{self, Notice};

pub struct DetailPage<'a> {
    client: &'a JikanClient,
    store: &'a VaultStore,
}

impl<'a> DetailPage<'a> {
    pub fn new(client: &'a JikanClient, store: &'a VaultStore) -> Self {
        Self { client, store }
    }

    pub async fn run(&self, mal_id: u32) -> PageState {
        debug!(state = %PageState::Loading, mal_id = mal_id, "Detail page loading");

        let anime = match self.client.anime_details(mal_id).await {
            Ok(anime) => anime,
            Err(e) => {
                error!(error = %e, mal_id = mal_id, "Could not load anime");
                let message = if e.is_not_found() {
                    format!("Anime #{} was not found", mal_id)
                } else {
                    format!("Could not load anime #{}: {}", mal_id, e)
                };
                println!("{}", view::notification(Notice::Error, &message));
                return PageState::Error;
            }
        };

        self.show(anime).await
    }

    /// Render a title that has already been fetched.
    ///
    /// Side sections are fetched concurrently and each degrades on its
    /// own; only the card itself is required for the page to count as
    /// content.
    pub async fn show(&self, anime: Anime) -> PageState {
        let prefs = preferences_or_default(self.store);

        let is_favorite = match self.store.is_favorite(anime.mal_id) {
            Ok(flag) => flag,
            Err(e) => {
                warn!(error = %e, mal_id = anime.mal_id, "Favorite lookup failed");
                false
            }
        };

        println!("{}", view::anime_card(&anime, is_favorite));

        let (characters, (recs, source), relations) = tokio::join!(
            self.client.anime_characters(anime.mal_id),
            fallback::recommendations_for(self.client, &anime, prefs.page_size),
            self.client.anime_relations(anime.mal_id),
        );

        println!("{}", view::section("Characters"));
        match characters {
            Ok(edges) => println!("{}", view::character_rows(&edges, prefs.page_size)),
            Err(e) => {
                warn!(error = %e, "Character list unavailable");
                println!(
                    "{}",
                    view::notification(Notice::Warning, "Character list unavailable")
                );
            }
        }

        if recs.is_empty() {
            println!("{}", view::section("Recommendations"));
        } else {
            println!("{}", view::section(&format!("Recommendations ({})", source)));
        }
        println!("{}", view::recommendation_rows(&recs));

        println!("{}", view::section("Related"));
        match relations {
            Ok(groups) => println!("{}", view::relation_rows(&groups)),
            Err(e) => {
                warn!(error = %e, "Related entries unavailable");
                println!(
                    "{}",
                    view::notification(Notice::Warning, "Related entries unavailable")
                );
            }
        }

        // Best effort, same as search history
        if let Err(e) = self.store.record_view(view_entry_from(&anime)) {
            warn!(error = %e, "View was not saved to history");
            println!(
                "{}",
                view::notification(Notice::Warning, "View was not saved to history")
            );
        }

        debug!(state = %PageState::Content, mal_id = anime.mal_id, "Detail page finished");
        PageState::Content
    }
}
