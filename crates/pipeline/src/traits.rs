//! Core traits for the aggregation stage.
//!
//! This module defines the Aggregation trait that every report reducer
//! implements, so the orchestrator can run any of them over the same
//! per-movie stream.

use crate::types::MovieCredits;
use serde::Serialize;

/// A pure reducer from per-movie cast data to one report.
///
/// ## Design Note
/// - `Send + Sync` so reducers can live in shared application state
/// - The input slice is in catalogue order; reducers rely on that order to
///   pick the first-encountered casing of each name
/// - Reducers never fail: a movie without credits contributes nothing
pub trait Aggregation: Send + Sync {
    /// The report this reducer produces
    type Report: Serialize + Send + 'static;

    /// Returns the name of this report (for logging/debugging)
    fn name(&self) -> &str;

    /// Fold the movies, in the given order, into a report.
    fn aggregate(&self, movies: &[MovieCredits]) -> Self::Report;
}
