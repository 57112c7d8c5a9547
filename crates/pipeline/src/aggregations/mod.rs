//! Report reducers for the aggregation stage.
//!
//! Each reducer implements [`Aggregation`](crate::traits::Aggregation) and
//! turns the catalogue-ordered per-movie cast stream into one report.

mod grouping;

pub mod actors_with_multiple_characters;
pub mod characters_with_multiple_actors;
pub mod movies_per_actor;

// Re-export for convenience
pub use actors_with_multiple_characters::ActorsWithMultipleCharactersReducer;
pub use characters_with_multiple_actors::CharactersWithMultipleActorsReducer;
pub use movies_per_actor::MoviesPerActorReducer;
