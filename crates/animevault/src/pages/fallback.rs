//! Recommendation sources with ordered fallback.
//!
//! The detail page wants a recommendations section even when the dedicated
//! endpoint has nothing for a title. Sources are tried in order and the
//! first one yielding a non-empty sanitized list wins. Sanitizing removes
//! the subject anime and duplicate ids and caps the list at the section
//! limit, so the subject never appears in its own recommendations no matter
//! which source produced them.

use async_trait::async_trait;
use jikan_client::api::types::Anime;
use jikan_client::{ApiError, JikanClient, SearchQuery};
use once_cell::sync::Lazy;
use std::collections::HashSet;
use tracing::{debug, warn};

/// How many of the subject's genres seed the similarity search
const GENRE_LIMIT: usize = 2;

/// A recommended title, reduced to what the section renders
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recommendation {
    pub mal_id: u32,
    pub title: String,
}

impl Recommendation {
    fn new(mal_id: u32, title: impl Into<String>) -> Self {
        Self {
            mal_id,
            title: title.into(),
        }
    }
}

/// One place recommendations can come from
#[async_trait]
pub trait RecommendationSource {
    /// Short label shown in the section header
    fn name(&self) -> &'static str;

    async fn recommend(&self, subject: &Anime) -> Result<Vec<Recommendation>, ApiError>;
}

/// The dedicated recommendations endpoint
pub struct EndpointSource<'a> {
    client: &'a JikanClient,
}

impl<'a> EndpointSource<'a> {
    pub fn new(client: &'a JikanClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl RecommendationSource for EndpointSource<'_> {
    fn name(&self) -> &'static str {
        "community picks"
    }

    async fn recommend(&self, subject: &Anime) -> Result<Vec<Recommendation>, ApiError> {
        let edges = self.client.anime_recommendations(subject.mal_id).await?;
        Ok(edges
            .into_iter()
            .map(|edge| Recommendation::new(edge.entry.mal_id, edge.entry.title))
            .collect())
    }
}

/// Catalog search seeded with the subject's genres
pub struct GenreSimilaritySource<'a> {
    client: &'a JikanClient,
}

impl<'a> GenreSimilaritySource<'a> {
    pub fn new(client: &'a JikanClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl RecommendationSource for GenreSimilaritySource<'_> {
    fn name(&self) -> &'static str {
        "genre similarity"
    }

    async fn recommend(&self, subject: &Anime) -> Result<Vec<Recommendation>, ApiError> {
        if subject.genres.is_empty() {
            return Ok(Vec::new());
        }

        let mut query = SearchQuery::new("").order_by("score", "desc");
        for genre in subject.genres.iter().take(GENRE_LIMIT) {
            query = query.genre(genre.mal_id);
        }

        let page = self.client.search_anime(&query).await?;
        Ok(page
            .data
            .into_iter()
            .map(|anime| Recommendation::new(anime.mal_id, anime.title))
            .collect())
    }
}

/// Hand-picked evergreen titles, the end of the chain
pub struct StaticSource;

static CURATED: Lazy<Vec<Recommendation>> = Lazy::new(|| {
    vec![
        Recommendation::new(5114, "Fullmetal Alchemist: Brotherhood"),
        Recommendation::new(9253, "Steins;Gate"),
        Recommendation::new(11061, "Hunter x Hunter (2011)"),
        Recommendation::new(16498, "Shingeki no Kyojin"),
        Recommendation::new(1535, "Death Note"),
        Recommendation::new(30276, "One Punch Man"),
        Recommendation::new(199, "Sen to Chihiro no Kamikakushi"),
        Recommendation::new(1, "Cowboy Bebop"),
        Recommendation::new(32281, "Kimi no Na wa."),
    ]
});

#[async_trait]
impl RecommendationSource for StaticSource {
    fn name(&self) -> &'static str {
        "curated picks"
    }

    async fn recommend(&self, _subject: &Anime) -> Result<Vec<Recommendation>, ApiError> {
        Ok(CURATED.clone())
    }
}

/// Try sources in order; the first non-empty sanitized result wins.
///
/// Returns the winning list and the winning source's name. An exhausted
/// chain returns an empty list.
pub async fn resolve(
    sources: &[&dyn RecommendationSource],
    subject: &Anime,
    limit: usize,
) -> (Vec<Recommendation>, &'static str) {
    for source in sources {
        match source.recommend(subject).await {
            Ok(found) => {
                let clean = sanitize(found, subject.mal_id, limit);
                if !clean.is_empty() {
                    debug!(
                        source = source.name(),
                        count = clean.len(),
                        "Recommendation source selected"
                    );
                    return (clean, source.name());
                }
                debug!(source = source.name(), "Recommendation source empty, falling through");
            }
            Err(e) => {
                warn!(
                    source = source.name(),
                    error = %e,
                    "Recommendation source failed, falling through"
                );
            }
        }
    }

    (Vec::new(), "none")
}

/// Drop the subject itself and duplicate ids, cap at `limit`
fn sanitize(found: Vec<Recommendation>, subject_id: u32, limit: usize) -> Vec<Recommendation> {
    let mut seen = HashSet::new();
    found
        .into_iter()
        .filter(|rec| rec.mal_id != subject_id && seen.insert(rec.mal_id))
        .take(limit)
        .collect()
}

/// The production chain: endpoint, then genre similarity, then curated picks
pub async fn recommendations_for(
    client: &JikanClient,
    subject: &Anime,
    limit: usize,
) -> (Vec<Recommendation>, &'static str) {
    let endpoint = EndpointSource::new(client);
    let similar = GenreSimilaritySource::new(client);
    let curated = StaticSource;
    let sources: [&dyn RecommendationSource; 3] = [&endpoint, &similar, &curated];

    resolve(&sources, subject, limit).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn subject(mal_id: u32) -> Anime {
        serde_json::from_value(serde_json::json!({
            "mal_id": mal_id,
            "url": "https://myanimelist.net/anime/0",
            "images": { "jpg": {} },
            "title": "Subject"
        }))
        .unwrap()
    }

    fn recs(ids: &[u32]) -> Vec<Recommendation> {
        ids.iter()
            .map(|id| Recommendation::new(*id, format!("anime {}", id)))
            .collect()
    }

    struct Fixed(&'static str, Vec<Recommendation>);

    #[async_trait]
    impl RecommendationSource for Fixed {
        fn name(&self) -> &'static str {
            self.0
        }

        async fn recommend(&self, _subject: &Anime) -> Result<Vec<Recommendation>, ApiError> {
            Ok(self.1.clone())
        }
    }

    struct Failing;

    #[async_trait]
    impl RecommendationSource for Failing {
        fn name(&self) -> &'static str {
            "failing"
        }

        async fn recommend(&self, _subject: &Anime) -> Result<Vec<Recommendation>, ApiError> {
            Err(ApiError::Status {
                endpoint: "/anime/1/recommendations".to_string(),
                status: 500,
            })
        }
    }

    struct Counting(AtomicUsize);

    #[async_trait]
    impl RecommendationSource for Counting {
        fn name(&self) -> &'static str {
            "counting"
        }

        async fn recommend(&self, _subject: &Anime) -> Result<Vec<Recommendation>, ApiError> {
            self.0.fetch_add(1, Ordering::SeqCst);
            Ok(recs(&[99]))
        }
    }

    #[tokio::test]
    async fn test_first_nonempty_source_wins() {
        let first = Fixed("first", recs(&[2, 3]));
        let second = Counting(AtomicUsize::new(0));
        let sources: [&dyn RecommendationSource; 2] = [&first, &second];

        let (found, source) = resolve(&sources, &subject(1), 5).await;

        assert_eq!(source, "first");
        assert_eq!(found.len(), 2);
        // Later sources are never consulted
        assert_eq!(second.0.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_failing_source_falls_through() {
        let next = Fixed("next", recs(&[7]));
        let sources: [&dyn RecommendationSource; 2] = [&Failing, &next];

        let (found, source) = resolve(&sources, &subject(1), 5).await;

        assert_eq!(source, "next");
        assert_eq!(found, recs(&[7]));
    }

    #[tokio::test]
    async fn test_empty_source_falls_through() {
        let empty = Fixed("empty", Vec::new());
        let next = Fixed("next", recs(&[7]));
        let sources: [&dyn RecommendationSource; 2] = [&empty, &next];

        let (_, source) = resolve(&sources, &subject(1), 5).await;

        assert_eq!(source, "next");
    }

    #[tokio::test]
    async fn test_subject_never_recommended_to_itself() {
        let only = Fixed("only", recs(&[1, 2]));
        let sources: [&dyn RecommendationSource; 1] = [&only];

        let (found, _) = resolve(&sources, &subject(1), 5).await;

        assert_eq!(found.len(), 1);
        assert!(found.iter().all(|rec| rec.mal_id != 1));
    }

    #[tokio::test]
    async fn test_subject_only_result_counts_as_empty() {
        // A source that yields just the subject itself must fall through
        let subject_only = Fixed("self", recs(&[1]));
        let next = Fixed("next", recs(&[7]));
        let sources: [&dyn RecommendationSource; 2] = [&subject_only, &next];

        let (_, source) = resolve(&sources, &subject(1), 5).await;

        assert_eq!(source, "next");
    }

    #[tokio::test]
    async fn test_duplicates_removed_and_limit_applied() {
        let only = Fixed("only", recs(&[2, 2, 3, 4, 5]));
        let sources: [&dyn RecommendationSource; 1] = [&only];

        let (found, _) = resolve(&sources, &subject(1), 3).await;

        let ids: Vec<u32> = found.iter().map(|rec| rec.mal_id).collect();
        assert_eq!(ids, vec![2, 3, 4]);
    }

    #[tokio::test]
    async fn test_exhausted_chain_yields_empty() {
        let empty = Fixed("empty", Vec::new());
        let sources: [&dyn RecommendationSource; 1] = [&empty];

        let (found, source) = resolve(&sources, &subject(1), 5).await;

        assert!(found.is_empty());
        assert_eq!(source, "none");
    }

    #[tokio::test]
    async fn test_curated_list_always_yields() {
        let sources: [&dyn RecommendationSource; 1] = [&StaticSource];

        let (found, source) = resolve(&sources, &subject(5114), 5).await;

        assert_eq!(source, "curated picks");
        assert_eq!(found.len(), 5);
        assert!(found.iter().all(|rec| rec.mal_id != 5114));
    }
}
