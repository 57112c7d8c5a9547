//! # Report Orchestrator
//!
//! This module coordinates one report run end to end:
//! 1. Enumerate the catalogue movies in declared order
//! 2. Fan out one credits lookup per movie (bounded concurrency)
//! 3. Route every lookup through the shared cache (`movie_credits_<id>`)
//! 4. Apply the report's failure policy
//! 5. Restore catalogue order and hand the stream to the reducer
//!
//! The cache outlives every run, so repeated and concurrent reports share
//! lookups until their TTL elapses.

use std::sync::Arc;
use std::time::Instant;

use tracing::{error, info, instrument, warn};

use catalog::{Catalog, CreditsResult, TmdbId};
use pipeline::{
    ActorsWithMultipleCharactersReducer, ActorsWithMultipleCharactersReport, Aggregation,
    CharactersWithMultipleActorsReducer, CharactersWithMultipleActorsReport, FailurePolicy,
    FanOut, MovieCredits, MoviesPerActorReducer, MoviesPerActorReport, TtlCache,
};
use sources::{CreditsSource, SourceError};

/// Cache shared by every report: movie credits keyed by `movie_credits_<id>`
pub type CreditsCache = TtlCache<Arc<CreditsResult>, SourceError>;

/// Cache key of one movie's credits
pub fn credits_cache_key(movie_id: TmdbId) -> String {
    format!("movie_credits_{}", movie_id)
}

/// Failure policy of each report
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportPolicies {
    pub movies_per_actor: FailurePolicy,
    pub actors_with_multiple_characters: FailurePolicy,
    pub characters_with_multiple_actors: FailurePolicy,
}

impl Default for ReportPolicies {
    fn default() -> Self {
        Self {
            movies_per_actor: FailurePolicy::FailFast,
            actors_with_multiple_characters: FailurePolicy::CollectPartial,
            characters_with_multiple_actors: FailurePolicy::FailFast,
        }
    }
}

/// Produces the three cast reports over a fixed catalogue
#[derive(Clone)]
pub struct ReportOrchestrator {
    catalog: Arc<Catalog>,
    source: Arc<dyn CreditsSource>,
    cache: Arc<CreditsCache>,
    fan_out: FanOut,
    policies: ReportPolicies,
}

impl ReportOrchestrator {
    /// Create an orchestrator with the default concurrency limit and policies
    ///
    /// # Arguments
    /// * `catalog` - Movies and tracked actors, read-only for the process lifetime
    /// * `source` - Where credits come from on a cache miss
    /// * `cache` - Shared credits cache; its default TTL applies to every entry
    pub fn new(
        catalog: Arc<Catalog>,
        source: Arc<dyn CreditsSource>,
        cache: Arc<CreditsCache>,
    ) -> Self {
        Self {
            catalog,
            source,
            cache,
            fan_out: FanOut::default(),
            policies: ReportPolicies::default(),
        }
    }

    /// Maximum lookups in flight per report (0 behaves as 1)
    pub fn with_concurrency_limit(mut self, limit: usize) -> Self {
        self.fan_out = FanOut::new(limit);
        self
    }

    pub fn with_policies(mut self, policies: ReportPolicies) -> Self {
        self.policies = policies;
        self
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn cache(&self) -> &CreditsCache {
        &self.cache
    }

    pub fn policies(&self) -> ReportPolicies {
        self.policies
    }

    pub fn concurrency_limit(&self) -> usize {
        self.fan_out.concurrency_limit()
    }

    /// Tracked actor → movies they appear in, in configured actor order
    #[instrument(skip(self))]
    pub async fn movies_per_actor(&self) -> Result<MoviesPerActorReport, SourceError> {
        let reducer = MoviesPerActorReducer::new(self.catalog.actors.clone());
        self.run(&reducer, self.policies.movies_per_actor).await
    }

    /// Actors credited with two or more distinct characters
    #[instrument(skip(self))]
    pub async fn actors_with_multiple_characters(
        &self,
    ) -> Result<ActorsWithMultipleCharactersReport, SourceError> {
        self.run(
            &ActorsWithMultipleCharactersReducer,
            self.policies.actors_with_multiple_characters,
        )
        .await
    }

    /// Characters played by two or more distinct actors
    #[instrument(skip(self))]
    pub async fn characters_with_multiple_actors(
        &self,
    ) -> Result<CharactersWithMultipleActorsReport, SourceError> {
        self.run(
            &CharactersWithMultipleActorsReducer,
            self.policies.characters_with_multiple_actors,
        )
        .await
    }

    async fn run<A: Aggregation>(
        &self,
        aggregation: &A,
        policy: FailurePolicy,
    ) -> Result<A::Report, SourceError> {
        let start_time = Instant::now();
        info!(
            "Building {} over {} movies (policy: {}, concurrency: {})",
            aggregation.name(),
            self.catalog.movies.len(),
            policy,
            self.fan_out.concurrency_limit()
        );

        let movies = self.collect_credits(policy).await.inspect_err(|err| {
            error!("{} failed: {}", aggregation.name(), err);
        })?;

        let report = aggregation.aggregate(&movies);
        info!(
            "Built {} in {:.2?}",
            aggregation.name(),
            start_time.elapsed()
        );
        Ok(report)
    }

    /// Fetch every catalogue movie's credits, in catalogue order.
    ///
    /// Under `CollectPartial` a failed movie is logged and comes back with no
    /// credits; under `FailFast` the first failure is returned.
    async fn collect_credits(
        &self,
        policy: FailurePolicy,
    ) -> Result<Vec<MovieCredits>, SourceError> {
        let ids: Vec<TmdbId> = self
            .catalog
            .movies
            .iter()
            .map(|movie| movie.external_id)
            .collect();

        let outcomes = self
            .fan_out
            .run(ids, policy, |movie_id| {
                let source = Arc::clone(&self.source);
                let cache = Arc::clone(&self.cache);
                async move {
                    cache
                        .get_or_compute(&credits_cache_key(movie_id), None, || async move {
                            source.fetch_credits(movie_id).await.map(Arc::new)
                        })
                        .await
                }
            })
            .await?;

        let mut failed = 0;
        let movies: Vec<MovieCredits> = self
            .catalog
            .movies
            .iter()
            .zip(outcomes)
            .map(|(movie, outcome)| match outcome {
                Ok(credits) => MovieCredits::new(movie.display_name.clone(), credits),
                Err(err) => {
                    failed += 1;
                    warn!(
                        "Failed to fetch credits for \"{}\" (id {}): {}",
                        movie.display_name, movie.external_id, err
                    );
                    MovieCredits::missing(movie.display_name.clone())
                }
            })
            .collect();

        if failed > 0 {
            warn!(
                "{} of {} movie lookups failed, report covers the rest",
                failed,
                movies.len()
            );
        }
        Ok(movies)
    }
}
