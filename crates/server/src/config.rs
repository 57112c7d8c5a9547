//! Pipeline configuration shared by the server and the CLI.
//!
//! Every option is a flag that can also be set through the environment.
//! Validation that clap can express (required key, positive TTL, policy
//! names) happens at parse time; the rest happens in
//! [`PipelineArgs::build_orchestrator`].

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Args;
use thiserror::Error;

use catalog::{Catalog, CatalogError};
use pipeline::{DEFAULT_CONCURRENCY_LIMIT, FailurePolicy, TtlCache};
use sources::tmdb::TMDB_API_BASE;
use sources::{SourceError, TmdbCreditsSource};

use crate::orchestrator::{ReportOrchestrator, ReportPolicies};

/// Errors that prevent the pipeline from being assembled
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid catalogue: {0}")]
    Catalog(#[from] CatalogError),

    #[error("Invalid credits source configuration: {0}")]
    Source(#[from] SourceError),
}

/// Options every report run needs
#[derive(Debug, Clone, Args)]
pub struct PipelineArgs {
    /// TMDB API key
    #[arg(long, env = "TMDB_API_KEY", hide_env_values = true)]
    pub tmdb_api_key: String,

    /// Root of the TMDB v3 API
    #[arg(long, env = "TMDB_BASE_URL", default_value = TMDB_API_BASE)]
    pub tmdb_base_url: String,

    /// Deadline of each credits request, in seconds
    #[arg(long, env = "TMDB_TIMEOUT_SECS", default_value_t = 10)]
    pub tmdb_timeout_secs: u64,

    /// How long fetched credits stay cached, in seconds
    #[arg(
        long = "cache-ttl-secs",
        env = "CACHE_TTL",
        default_value_t = 3600,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub cache_ttl_secs: u64,

    /// Maximum credits lookups in flight (non-positive means 5)
    #[arg(
        long,
        env = "CONCURRENT_REQUESTS_LIMIT",
        default_value_t = DEFAULT_CONCURRENCY_LIMIT as i64,
        allow_negative_numbers = true
    )]
    pub concurrency_limit: i64,

    /// Catalogue of movies and tracked actors
    #[arg(long = "catalog", env = "CATALOG_PATH", default_value = "data/catalog.json")]
    pub catalog_path: PathBuf,

    /// Failure policy of the movies-per-actor report
    #[arg(long, env = "MOVIES_PER_ACTOR_POLICY", default_value_t = FailurePolicy::FailFast)]
    pub movies_per_actor_policy: FailurePolicy,

    /// Failure policy of the actors-with-multiple-characters report
    #[arg(
        long = "actors-policy",
        env = "ACTORS_WITH_MULTIPLE_CHARACTERS_POLICY",
        default_value_t = FailurePolicy::CollectPartial
    )]
    pub actors_with_multiple_characters_policy: FailurePolicy,

    /// Failure policy of the characters-with-multiple-actors report
    #[arg(
        long = "characters-policy",
        env = "CHARACTERS_WITH_MULTIPLE_ACTORS_POLICY",
        default_value_t = FailurePolicy::FailFast
    )]
    pub characters_with_multiple_actors_policy: FailurePolicy,
}

impl PipelineArgs {
    /// The configured limit, with non-positive values replaced by the default
    pub fn concurrency_limit(&self) -> usize {
        if self.concurrency_limit <= 0 {
            DEFAULT_CONCURRENCY_LIMIT
        } else {
            usize::try_from(self.concurrency_limit).unwrap_or(DEFAULT_CONCURRENCY_LIMIT)
        }
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }

    pub fn tmdb_timeout(&self) -> Duration {
        Duration::from_secs(self.tmdb_timeout_secs)
    }

    pub fn policies(&self) -> ReportPolicies {
        ReportPolicies {
            movies_per_actor: self.movies_per_actor_policy,
            actors_with_multiple_characters: self.actors_with_multiple_characters_policy,
            characters_with_multiple_actors: self.characters_with_multiple_actors_policy,
        }
    }

    pub fn build_source(&self) -> Result<TmdbCreditsSource, SourceError> {
        Ok(TmdbCreditsSource::new(self.tmdb_api_key.clone())?
            .with_base_url(self.tmdb_base_url.clone())
            .with_timeout(self.tmdb_timeout()))
    }

    /// Load the catalogue and wire source, cache and policies together
    pub fn build_orchestrator(&self) -> Result<ReportOrchestrator, ConfigError> {
        let source = self.build_source()?;
        let catalog = Catalog::load_from_file(&self.catalog_path)?;

        let cache = TtlCache::new(self.cache_ttl());
        Ok(ReportOrchestrator::new(Arc::new(catalog), Arc::new(source), Arc::new(cache))
            .with_concurrency_limit(self.concurrency_limit())
            .with_policies(self.policies()))
    }
}
