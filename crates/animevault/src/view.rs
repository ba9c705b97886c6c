//! UI component factories.
//!
//! Pure functions from catalog records and stored entries to rendered text
//! blocks. Controllers decide what to fetch and when to print; everything
//! here only formats. No I/O.

use jikan_client::api::types::{Anime, CharacterEdge, Pagination, RelationGroup};
use shared::models::{FavoriteEntry, Preferences, SearchHistoryEntry, ViewHistoryEntry};

use crate::pages::fallback::Recommendation;

/// Width of rendered section rules
const RULE_WIDTH: usize = 62;

/// Characters of synopsis shown on a card before truncation
const SYNOPSIS_CHARS: usize = 280;

/// Placeholder body for a section with nothing to render
const EMPTY_SECTION: &str = "  (nothing to show)";

/// Severity of a transient notification line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    Info,
    Warning,
    Error,
}

/// One-line user-facing notice
pub fn notification(notice: Notice, message: &str) -> String {
    let tag = match notice {
        Notice::Info => "info",
        Notice::Warning => "warn",
        Notice::Error => "error",
    };
    format!("[{}] {}", tag, message)
}

/// Section header with a trailing rule
pub fn section(title: &str) -> String {
    let used = title.chars().count() + 4;
    let fill = RULE_WIDTH.saturating_sub(used);
    format!("── {} {}", title, "─".repeat(fill))
}

/// Truncate to at most `max_chars` characters, appending an ellipsis only
/// when something was cut. Safe on multi-byte text.
pub fn truncate(text: &str, max_chars: usize) -> String {
    let mut chars = text.chars();
    let kept: String = chars.by_ref().take(max_chars).collect();
    if chars.next().is_some() {
        format!("{}…", kept.trim_end())
    } else {
        kept
    }
}

/// Detail card for one anime: titles, meta line, taxonomy, synopsis
pub fn anime_card(anime: &Anime, is_favorite: bool) -> String {
    let mut lines = Vec::new();

    let marker = if is_favorite { " ♥" } else { "" };
    lines.push(format!("{}{}  [#{}]", anime.title, marker, anime.mal_id));

    if let Some(english) = &anime.title_english {
        if english != &anime.title {
            lines.push(english.clone());
        }
    }

    let mut meta = Vec::new();
    if let Some(kind) = &anime.anime_type {
        meta.push(kind.clone());
    }
    if let Some(episodes) = anime.episodes {
        meta.push(format!("{} eps", episodes));
    }
    if let Some(status) = &anime.status {
        meta.push(status.clone());
    }
    if let Some(score) = anime.score {
        meta.push(match anime.rank {
            Some(rank) => format!("★ {:.2} (rank #{})", score, rank),
            None => format!("★ {:.2}", score),
        });
    }
    if !meta.is_empty() {
        lines.push(meta.join(" | "));
    }

    if let Some(aired) = aired_line(anime) {
        lines.push(aired);
    }

    let genres: Vec<&str> = anime.genres.iter().map(|g| g.name.as_str()).collect();
    if !genres.is_empty() {
        lines.push(format!("Genres: {}", genres.join(", ")));
    }
    let studios: Vec<&str> = anime.studios.iter().map(|s| s.name.as_str()).collect();
    if !studios.is_empty() {
        lines.push(format!("Studios: {}", studios.join(", ")));
    }

    if let Some(synopsis) = &anime.synopsis {
        if !synopsis.is_empty() {
            lines.push(String::new());
            lines.push(truncate(synopsis, SYNOPSIS_CHARS));
        }
    }

    lines.join("\n")
}

fn aired_line(anime: &Anime) -> Option<String> {
    let mut parts = Vec::new();

    if let Some(from) = anime.aired.from.as_deref() {
        parts.push(match anime.aired.to.as_deref() {
            Some(to) => format!("Aired {} to {}", date_only(from), date_only(to)),
            None => format!("Aired from {}", date_only(from)),
        });
    }
    if let (Some(season), Some(year)) = (&anime.season, anime.year) {
        parts.push(format!("{} {}", season, year));
    }

    if parts.is_empty() {
        None
    } else {
        Some(parts.join(" | "))
    }
}

/// Jikan timestamps are ISO 8601; the date is the first ten characters.
fn date_only(timestamp: &str) -> &str {
    if timestamp.len() >= 10 && timestamp.is_char_boundary(10) {
        &timestamp[..10]
    } else {
        timestamp
    }
}

/// Ranked list rows, one per anime, at most `limit`
pub fn anime_rows(list: &[Anime], limit: usize) -> String {
    if list.is_empty() {
        return EMPTY_SECTION.to_string();
    }
    list.iter()
        .take(limit)
        .enumerate()
        .map(|(i, anime)| anime_row(i + 1, anime))
        .collect::<Vec<_>>()
        .join("\n")
}

fn anime_row(position: usize, anime: &Anime) -> String {
    let kind = anime.anime_type.as_deref().unwrap_or("?");
    let score = match anime.score {
        Some(score) => format!("  ★ {:.2}", score),
        None => String::new(),
    };
    format!(
        "{:>3}. {} ({}){}  [#{}]",
        position, anime.title, kind, score, anime.mal_id
    )
}

/// Character credit rows, main cast first as the API orders them
pub fn character_rows(edges: &[CharacterEdge], limit: usize) -> String {
    if edges.is_empty() {
        return EMPTY_SECTION.to_string();
    }
    edges
        .iter()
        .take(limit)
        .map(|edge| format!("  - {} ({})", edge.character.name, edge.role))
        .collect::<Vec<_>>()
        .join("\n")
}

/// One row per relation kind, entries joined on the line
pub fn relation_rows(groups: &[RelationGroup]) -> String {
    if groups.is_empty() {
        return EMPTY_SECTION.to_string();
    }
    groups
        .iter()
        .map(|group| {
            let names: Vec<String> = group
                .entry
                .iter()
                .map(|entry| format!("{} ({})", entry.name, entry.entity_type))
                .collect();
            format!("  {}: {}", group.relation, names.join(", "))
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Numbered recommendation rows
pub fn recommendation_rows(recs: &[Recommendation]) -> String {
    if recs.is_empty() {
        return EMPTY_SECTION.to_string();
    }
    recs.iter()
        .enumerate()
        .map(|(i, rec)| format!("{:>3}. {}  [#{}]", i + 1, rec.title, rec.mal_id))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Numbered favorites rows with the date each was added
pub fn favorite_rows(entries: &[FavoriteEntry]) -> String {
    if entries.is_empty() {
        return EMPTY_SECTION.to_string();
    }
    entries
        .iter()
        .enumerate()
        .map(|(i, entry)| {
            let kind = entry.anime_type.as_deref().unwrap_or("?");
            let score = match entry.score {
                Some(score) => format!("  ★ {:.2}", score),
                None => String::new(),
            };
            format!(
                "{:>3}. {} ({}){}  added {}  [#{}]",
                i + 1,
                entry.title,
                kind,
                score,
                entry.added_at.format("%Y-%m-%d"),
                entry.mal_id
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Recent searches, most recent first
pub fn search_history_rows(entries: &[SearchHistoryEntry]) -> String {
    if entries.is_empty() {
        return EMPTY_SECTION.to_string();
    }
    entries
        .iter()
        .enumerate()
        .map(|(i, entry)| {
            format!(
                "{:>3}. \"{}\"  ({})",
                i + 1,
                entry.query,
                entry.searched_at.format("%Y-%m-%d %H:%M")
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Recently viewed anime, most recent first
pub fn view_history_rows(entries: &[ViewHistoryEntry]) -> String {
    if entries.is_empty() {
        return EMPTY_SECTION.to_string();
    }
    entries
        .iter()
        .enumerate()
        .map(|(i, entry)| {
            format!(
                "{:>3}. {}  viewed {}  [#{}]",
                i + 1,
                entry.title,
                entry.viewed_at.format("%Y-%m-%d"),
                entry.mal_id
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Current preference values, one per line
pub fn preferences_block(prefs: &Preferences) -> String {
    [
        format!("  sfw_only:     {}", prefs.sfw_only),
        format!("  page_size:    {}", prefs.page_size),
        format!("  default_sort: {}", prefs.default_sort),
    ]
    .join("\n")
}

/// Footer line describing where a paginated listing stands
pub fn pagination_line(pagination: &Pagination) -> String {
    if pagination.has_next_page {
        format!(
            "Page {} of {} (more available)",
            pagination.current_page, pagination.last_visible_page
        )
    } else {
        format!(
            "Page {} of {}",
            pagination.current_page, pagination.last_visible_page
        )
    }
}
