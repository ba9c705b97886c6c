//! AnimeVault CLI application.

use animevault::view::{self, Notice};
use animevault::{pages, DetailPage, HomePage, HomeRequest, PageState};
use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use jikan_client::{JikanClient, ResponseCache};
use shared::models::SortOrder;
use shared::{Config, DataPaths, Database, VaultStore};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, info};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "config.toml")]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show the homepage: trending, this season and coming up
    Home {
        /// Catalog page to show
        #[arg(short, long, default_value_t = 1)]
        page: u32,
    },
    /// Search the catalog by title
    Search {
        /// Text to search for
        query: String,

        /// Result page to show
        #[arg(short, long, default_value_t = 1)]
        page: u32,
    },
    /// Browse the catalog by genre
    Genre {
        /// Genre id or name, e.g. 1 or "Action"
        genre: String,

        /// Result page to show
        #[arg(short, long, default_value_t = 1)]
        page: u32,
    },
    /// Show one title in full
    Detail {
        /// MyAnimeList id of the title
        mal_id: u32,
    },
    /// Show a random title
    Random,
    /// Manage the favorites list
    Favorites {
        #[command(subcommand)]
        action: FavoritesAction,
    },
    /// Inspect or clear search and view history
    History {
        #[command(subcommand)]
        action: HistoryAction,
    },
    /// Show or change preferences
    Prefs {
        #[command(subcommand)]
        action: PrefsAction,
    },
}

#[derive(Subcommand, Debug)]
enum FavoritesAction {
    /// List favorites, newest first
    List,
    /// Add a title by MyAnimeList id
    Add { mal_id: u32 },
    /// Remove a title by MyAnimeList id
    Remove { mal_id: u32 },
}

#[derive(Subcommand, Debug)]
enum HistoryAction {
    /// Show recent searches
    Searches,
    /// Show recently viewed titles
    Views,
    /// Clear history
    Clear {
        #[arg(value_enum)]
        target: ClearTarget,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum ClearTarget {
    Searches,
    Views,
    All,
}

#[derive(Subcommand, Debug)]
enum PrefsAction {
    /// Show current preferences
    Show,
    /// Change one or more preferences
    Set {
        /// Filter adult entries out of listings (true/false)
        #[arg(long)]
        sfw: Option<bool>,

        /// Rows per listing section
        #[arg(long)]
        page_size: Option<usize>,

        /// Default sort order: score, popularity or title
        #[arg(long)]
        sort: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Load configuration
    let config = Config::from_file(&args.config)
        .with_context(|| format!("Failed to load config from {}", args.config.display()))?;

    // Initialize logging
    let log_level = if args.verbose {
        tracing::Level::DEBUG
    } else {
        config
            .logging
            .default_level
            .parse()
            .unwrap_or(tracing::Level::INFO)
    };

    shared::logging::init(shared::LogConfig {
        log_dir: config.log_dir().to_string_lossy().to_string(),
        component: "animevault".to_string(),
        default_level: log_level,
        console: config.logging.console,
        file: config.logging.file,
        json_format: config.logging.json_format,
    })?;

    info!("AnimeVault starting");
    info!(config_file = %args.config.display(), "Loaded configuration");

    // Initialize data paths
    let data_paths = DataPaths::new(config.data_dir());
    data_paths
        .create_dirs()
        .context("Failed to create data directories")?;

    // Initialize database
    let db_path = config.database_path();
    info!(db_path = %db_path.display(), "Opening database");
    let database = Database::open(&db_path).context("Failed to open database")?;
    let store = VaultStore::new(database);

    // Initialize API client
    let cache = if config.api.cache.enabled {
        ResponseCache::new(
            Duration::from_secs(config.api.cache.ttl_seconds),
            config.api.cache.capacity,
        )
    } else {
        ResponseCache::disabled()
    };

    let client = JikanClient::new(
        config.api.base_url.clone(),
        config.api.timeout_seconds,
        config.api.throttle_interval_ms,
        cache,
    )
    .context("Failed to create Jikan client")?;

    let state = dispatch(args.command, &client, &store).await?;

    let stats = client.cache_stats().await;
    debug!(
        hits = stats.hits,
        misses = stats.misses,
        insertions = stats.insertions,
        evictions = stats.evictions,
        "Response cache statistics"
    );

    if state.is_error() {
        std::process::exit(1);
    }

    Ok(())
}

async fn dispatch(command: Command, client: &JikanClient, store: &VaultStore) -> Result<PageState> {
    match command {
        Command::Home { page } => {
            let state = HomePage::new(client, store)
                .run(HomeRequest::Browse { page })
                .await;
            Ok(state)
        }
        Command::Search { query, page } => {
            let state = HomePage::new(client, store)
                .run(HomeRequest::Search { query, page })
                .await;
            Ok(state)
        }
        Command::Genre { genre, page } => {
            let state = HomePage::new(client, store)
                .run(HomeRequest::Genre { genre, page })
                .await;
            Ok(state)
        }
        Command::Detail { mal_id } => Ok(DetailPage::new(client, store).run(mal_id).await),
        Command::Random => match client.random_anime().await {
            Ok(anime) => Ok(DetailPage::new(client, store).show(anime).await),
            Err(e) => {
                println!(
                    "{}",
                    view::notification(Notice::Error, &format!("Could not pick a random title: {}", e))
                );
                Ok(PageState::Error)
            }
        },
        Command::Favorites { action } => favorites(action, client, store).await,
        Command::History { action } => history(action, store),
        Command::Prefs { action } => prefs(action, store),
    }
}

async fn favorites(
    action: FavoritesAction,
    client: &JikanClient,
    store: &VaultStore,
) -> Result<PageState> {
    match action {
        FavoritesAction::List => {
            let list = store.favorites().context("Failed to load favorites")?;
            println!("{}", view::section("Favorites"));
            println!("{}", view::favorite_rows(list.entries()));
        }
        FavoritesAction::Add { mal_id } => {
            // Fetch first so the stored entry carries a title and score
            let anime = match client.anime_details(mal_id).await {
                Ok(anime) => anime,
                Err(e) => {
                    let message = if e.is_not_found() {
                        format!("Anime #{} was not found", mal_id)
                    } else {
                        format!("Could not load anime #{}: {}", mal_id, e)
                    };
                    println!("{}", view::notification(Notice::Error, &message));
                    return Ok(PageState::Error);
                }
            };

            let title = anime.title.clone();
            let added = store
                .add_favorite(pages::favorite_from(&anime))
                .context("Failed to save the favorite")?;
            if added {
                println!(
                    "{}",
                    view::notification(Notice::Info, &format!("Added \"{}\" to favorites", title))
                );
            } else {
                println!(
                    "{}",
                    view::notification(Notice::Info, &format!("\"{}\" is already a favorite", title))
                );
            }
        }
        FavoritesAction::Remove { mal_id } => {
            let removed = store
                .remove_favorite(mal_id)
                .context("Failed to update favorites")?;
            if removed {
                println!(
                    "{}",
                    view::notification(Notice::Info, &format!("Removed #{} from favorites", mal_id))
                );
            } else {
                println!(
                    "{}",
                    view::notification(Notice::Info, &format!("#{} was not in favorites", mal_id))
                );
            }
        }
    }

    Ok(PageState::Content)
}

fn history(action: HistoryAction, store: &VaultStore) -> Result<PageState> {
    match action {
        HistoryAction::Searches => {
            let history = store
                .search_history()
                .context("Failed to load search history")?;
            println!("{}", view::section("Recent Searches"));
            println!("{}", view::search_history_rows(history.entries()));
        }
        HistoryAction::Views => {
            let history = store.view_history().context("Failed to load view history")?;
            println!("{}", view::section("Recently Viewed"));
            println!("{}", view::view_history_rows(history.entries()));
        }
        HistoryAction::Clear { target } => match target {
            ClearTarget::Searches => {
                store
                    .clear_search_history()
                    .context("Failed to clear search history")?;
                println!("{}", view::notification(Notice::Info, "Search history cleared"));
            }
            ClearTarget::Views => {
                store
                    .clear_view_history()
                    .context("Failed to clear view history")?;
                println!("{}", view::notification(Notice::Info, "View history cleared"));
            }
            ClearTarget::All => {
                store
                    .clear_search_history()
                    .context("Failed to clear search history")?;
                store
                    .clear_view_history()
                    .context("Failed to clear view history")?;
                println!("{}", view::notification(Notice::Info, "History cleared"));
            }
        },
    }

    Ok(PageState::Content)
}

fn prefs(action: PrefsAction, store: &VaultStore) -> Result<PageState> {
    match action {
        PrefsAction::Show => {
            let prefs = store.preferences().context("Failed to load preferences")?;
            println!("{}", view::section("Preferences"));
            println!("{}", view::preferences_block(&prefs));
        }
        PrefsAction::Set {
            sfw,
            page_size,
            sort,
        } => {
            let mut prefs = store.preferences().context("Failed to load preferences")?;
            if let Some(sfw) = sfw {
                prefs.sfw_only = sfw;
            }
            if let Some(size) = page_size {
                // Jikan caps list requests at 25 per page
                prefs.page_size = size.clamp(1, 25);
            }
            if let Some(sort) = sort {
                prefs.default_sort = sort
                    .parse::<SortOrder>()
                    .context("Unknown sort order (expected score, popularity or title)")?;
            }
            store
                .set_preferences(&prefs)
                .context("Failed to save preferences")?;
            println!("{}", view::notification(Notice::Info, "Preferences updated"));
            println!("{}", view::preferences_block(&prefs));
        }
    }

    Ok(PageState::Content)
}
