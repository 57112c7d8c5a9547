//! Fetch-aggregate-cache core of the cast reports.
//!
//! This crate provides:
//! - TtlCache, a cache-aside store with lazy expiry and single-flight misses
//! - FanOut, a bounded-concurrency executor with a configurable FailurePolicy
//! - The Aggregation trait and the three report reducers
//!
//! ## Architecture
//! A report is produced in stages:
//! 1. FanOut runs one lookup per catalogue movie, at most K at a time
//! 2. Each lookup goes through TtlCache before reaching the remote source
//! 3. Outcomes come back in catalogue order as `MovieCredits`
//! 4. A reducer folds them into an ordered report
//!
//! ## Example Usage
//! ```ignore
//! use pipeline::{FanOut, FailurePolicy, TtlCache};
//! use pipeline::aggregations::MoviesPerActorReducer;
//!
//! let cache = TtlCache::new(Duration::from_secs(3600));
//! let outcomes = FanOut::new(5)
//!     .run(ids, FailurePolicy::FailFast, |id| fetch(&cache, id))
//!     .await?;
//!
//! let report = MoviesPerActorReducer::new(actors).aggregate(&movies);
//! ```

pub mod aggregations;
pub mod cache;
pub mod fan_out;
pub mod report;
pub mod traits;
pub mod types;

// Re-export main types
pub use aggregations::{
    ActorsWithMultipleCharactersReducer, CharactersWithMultipleActorsReducer,
    MoviesPerActorReducer,
};
pub use cache::TtlCache;
pub use fan_out::{DEFAULT_CONCURRENCY_LIMIT, FailurePolicy, FanOut};
pub use report::{
    ActorAppearance, ActorsWithMultipleCharactersReport, CharacterAppearance,
    CharactersWithMultipleActorsReport, MoviesPerActorReport,
};
pub use traits::Aggregation;
pub use types::MovieCredits;
