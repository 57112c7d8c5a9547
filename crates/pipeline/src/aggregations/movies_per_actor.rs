//! Which catalogue movies each tracked actor appears in.

use crate::report::MoviesPerActorReport;
use crate::traits::Aggregation;
use crate::types::MovieCredits;
use catalog::{TrackedActorName, fold_key};
use std::collections::HashSet;

/// Maps every tracked actor to the movies whose cast credits them.
///
/// ## Algorithm
/// 1. Start with one empty list per tracked actor, in configured order
/// 2. For each movie, fold its cast names into a set
/// 3. Append the movie label to every tracked actor whose folded name is in
///    that set
///
/// Actors who appear nowhere keep their empty list.
#[derive(Debug, Clone)]
pub struct MoviesPerActorReducer {
    actors: Vec<TrackedActorName>,
}

impl MoviesPerActorReducer {
    /// # Arguments
    /// * `actors` - Tracked actor names; their order becomes the report's key order
    pub fn new(actors: Vec<TrackedActorName>) -> Self {
        Self { actors }
    }
}

impl Aggregation for MoviesPerActorReducer {
    type Report = MoviesPerActorReport;

    fn name(&self) -> &str {
        "moviesPerActor"
    }

    fn aggregate(&self, movies: &[MovieCredits]) -> MoviesPerActorReport {
        let tracked: Vec<String> = self.actors.iter().map(|a| fold_key(a)).collect();
        let mut appearances: Vec<Vec<String>> = vec![Vec::new(); self.actors.len()];

        for movie in movies {
            let cast: HashSet<String> = movie.cast().iter().map(|m| fold_key(&m.name)).collect();
            if cast.is_empty() {
                continue;
            }
            for (slot, key) in tracked.iter().enumerate() {
                if cast.contains(key) {
                    appearances[slot].push(movie.title.clone());
                }
            }
        }

        self.actors.iter().cloned().zip(appearances).collect()
    }
}
