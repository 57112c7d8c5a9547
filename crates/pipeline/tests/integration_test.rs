//! Integration tests for the pipeline.
//!
//! These tests drive cache, fan-out and reducers together against a scripted
//! credits source, the way a report request does.

use async_trait::async_trait;
use catalog::{CastMember, Catalog, CreditsResult, TmdbId};
use pipeline::{
    ActorsWithMultipleCharactersReducer, Aggregation, CharacterAppearance,
    CharactersWithMultipleActorsReducer, FailurePolicy, FanOut, MovieCredits,
    MoviesPerActorReducer, TtlCache,
};
use sources::{CreditsSource, SourceError};
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

// ===== Test Fixtures =====

/// A scripted source: per-movie cast, delay and failure
#[derive(Default)]
struct ScriptedSource {
    casts: HashMap<TmdbId, Vec<CastMember>>,
    delays: HashMap<TmdbId, Duration>,
    failing: HashMap<TmdbId, SourceError>,
    calls: AtomicUsize,
}

impl ScriptedSource {
    fn with_cast(mut self, id: TmdbId, cast: &[(&str, &str)]) -> Self {
        let cast = cast.iter().map(|(n, c)| CastMember::new(*n, *c)).collect();
        self.casts.insert(id, cast);
        self
    }

    fn with_delay(mut self, id: TmdbId, millis: u64) -> Self {
        self.delays.insert(id, Duration::from_millis(millis));
        self
    }

    fn with_failure(mut self, id: TmdbId) -> Self {
        self.failing.insert(
            id,
            SourceError::Rejected {
                status: 404,
                message: "The resource you requested could not be found.".to_string(),
            },
        );
        self
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CreditsSource for ScriptedSource {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn fetch_credits(&self, movie_id: TmdbId) -> Result<CreditsResult, SourceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delays.get(&movie_id) {
            tokio::time::sleep(*delay).await;
        }
        if let Some(err) = self.failing.get(&movie_id) {
            return Err(err.clone());
        }
        Ok(CreditsResult::new(
            self.casts.get(&movie_id).cloned().unwrap_or_default(),
        ))
    }
}

type CreditsCache = TtlCache<Arc<CreditsResult>, SourceError>;

/// Fetch every catalogue movie through the cache under `policy`
async fn collect(
    catalog: &Catalog,
    source: Arc<ScriptedSource>,
    cache: Arc<CreditsCache>,
    policy: FailurePolicy,
) -> Result<Vec<MovieCredits>, SourceError> {
    let ids: Vec<TmdbId> = catalog.movies.iter().map(|m| m.external_id).collect();

    let outcomes = FanOut::new(2)
        .run(ids, policy, |id| {
            let source = Arc::clone(&source);
            let cache = Arc::clone(&cache);
            async move {
                cache
                    .get_or_compute(&format!("movie_credits_{}", id), None, || async move {
                        source.fetch_credits(id).await.map(Arc::new)
                    })
                    .await
            }
        })
        .await?;

    Ok(catalog
        .movies
        .iter()
        .zip(outcomes)
        .map(|(movie, outcome)| match outcome {
            Ok(credits) => MovieCredits::new(movie.display_name.clone(), credits),
            Err(_) => MovieCredits::missing(movie.display_name.clone()),
        })
        .collect())
}

fn avengers_catalog() -> Catalog {
    Catalog::new()
        .with_movie("Avengers", 24428)
        .with_movie("Iron Man", 1726)
        .with_actor("Robert Downey Jr.")
}

fn avengers_source() -> ScriptedSource {
    ScriptedSource::default()
        .with_cast(24428, &[("Robert Downey Jr.", "Tony Stark")])
        .with_cast(1726, &[("Robert Downey Jr.", "Tony Stark / Iron Man")])
}

fn new_cache() -> Arc<CreditsCache> {
    Arc::new(TtlCache::new(Duration::from_secs(3600)))
}

// ===== End-to-end =====

#[tokio::test(start_paused = true)]
async fn test_avengers_example_end_to_end() {
    let catalog = avengers_catalog();
    let source = Arc::new(avengers_source());

    let movies = collect(&catalog, source, new_cache(), FailurePolicy::FailFast)
        .await
        .expect("pipeline failed");

    let per_actor = MoviesPerActorReducer::new(catalog.actors.clone()).aggregate(&movies);
    assert_eq!(
        serde_json::to_value(&per_actor).unwrap(),
        serde_json::json!({ "Robert Downey Jr.": ["Avengers", "Iron Man"] })
    );

    let multi_role = ActorsWithMultipleCharactersReducer.aggregate(&movies);
    assert_eq!(
        multi_role.get("Robert Downey Jr."),
        Some(&vec![
            CharacterAppearance {
                movie: "Avengers".to_string(),
                character: "Tony Stark".to_string()
            },
            CharacterAppearance {
                movie: "Iron Man".to_string(),
                character: "Tony Stark / Iron Man".to_string()
            },
        ])
    );

    assert!(CharactersWithMultipleActorsReducer.aggregate(&movies).is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_completion_order_does_not_change_first_casing() {
    // The first catalogue movie finishes last
    let catalog = Catalog::new()
        .with_movie("Slow", 1)
        .with_movie("Medium", 2)
        .with_movie("Fast", 3)
        .with_actor("Chris Evans");
    let source = Arc::new(
        ScriptedSource::default()
            .with_cast(1, &[("Chris Evans", "Steve Rogers")])
            .with_cast(2, &[("CHRIS EVANS", "Johnny Storm")])
            .with_cast(3, &[("chris evans", "Lucas Lee")])
            .with_delay(1, 300)
            .with_delay(2, 200)
            .with_delay(3, 10),
    );

    let movies = collect(&catalog, source, new_cache(), FailurePolicy::FailFast)
        .await
        .unwrap();

    let titles: Vec<&str> = movies.iter().map(|m| m.title.as_str()).collect();
    assert_eq!(titles, vec!["Slow", "Medium", "Fast"]);

    let report = ActorsWithMultipleCharactersReducer.aggregate(&movies);
    assert_eq!(report.keys().collect::<Vec<_>>(), vec!["Chris Evans"]);

    let per_actor = MoviesPerActorReducer::new(catalog.actors.clone()).aggregate(&movies);
    assert_eq!(
        per_actor.get("Chris Evans"),
        Some(&vec!["Slow".to_string(), "Medium".to_string(), "Fast".to_string()])
    );
}

// ===== Failure policies =====

#[tokio::test(start_paused = true)]
async fn test_fail_fast_returns_no_report_when_one_lookup_fails() {
    let catalog = avengers_catalog().with_movie("Missing", 404);
    let source = Arc::new(avengers_source().with_failure(404));

    let result = collect(&catalog, source, new_cache(), FailurePolicy::FailFast).await;

    assert!(
        matches!(result, Err(SourceError::Rejected { status: 404, .. })),
        "got {:?}",
        result
    );
}

#[tokio::test(start_paused = true)]
async fn test_collect_partial_reports_the_rest() {
    let catalog = avengers_catalog().with_movie("Missing", 404);
    let source = Arc::new(avengers_source().with_failure(404));

    let movies = collect(&catalog, source, new_cache(), FailurePolicy::CollectPartial)
        .await
        .expect("collect-partial never fails");

    assert_eq!(movies.len(), 3);
    assert!(movies[2].credits.is_none());

    let per_actor = MoviesPerActorReducer::new(catalog.actors.clone()).aggregate(&movies);
    assert_eq!(
        per_actor.get("Robert Downey Jr."),
        Some(&vec!["Avengers".to_string(), "Iron Man".to_string()])
    );
}

// ===== Caching =====

#[tokio::test(start_paused = true)]
async fn test_second_run_is_served_from_cache() {
    let catalog = avengers_catalog();
    let source = Arc::new(avengers_source());
    let cache = new_cache();

    collect(&catalog, Arc::clone(&source), Arc::clone(&cache), FailurePolicy::FailFast)
        .await
        .unwrap();
    assert_eq!(source.calls(), 2);

    collect(&catalog, Arc::clone(&source), Arc::clone(&cache), FailurePolicy::FailFast)
        .await
        .unwrap();
    assert_eq!(source.calls(), 2, "second run should not reach the source");
}

#[tokio::test(start_paused = true)]
async fn test_failed_lookup_is_retried_next_run() {
    let catalog = avengers_catalog().with_movie("Missing", 404);
    let source = Arc::new(avengers_source().with_failure(404));
    let cache = new_cache();

    collect(&catalog, Arc::clone(&source), Arc::clone(&cache), FailurePolicy::CollectPartial)
        .await
        .unwrap();
    collect(&catalog, Arc::clone(&source), Arc::clone(&cache), FailurePolicy::CollectPartial)
        .await
        .unwrap();

    // Two cached hits, the failing movie fetched both times
    assert_eq!(source.calls(), 4);
    assert_eq!(cache.len(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_concurrent_reports_share_lookups() {
    let catalog = avengers_catalog();
    let source = Arc::new(avengers_source().with_delay(24428, 100).with_delay(1726, 100));
    let cache = new_cache();

    let (a, b) = tokio::join!(
        collect(&catalog, Arc::clone(&source), Arc::clone(&cache), FailurePolicy::FailFast),
        collect(&catalog, Arc::clone(&source), Arc::clone(&cache), FailurePolicy::CollectPartial),
    );

    assert!(a.is_ok() && b.is_ok());
    assert_eq!(source.calls(), 2, "each movie should be fetched once");
}
