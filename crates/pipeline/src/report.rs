//! Report shapes returned by the aggregation reducers.
//!
//! Reports are mappings whose key order carries meaning (configured actor
//! order, or first-encounter order), so they are `IndexMap`s and serialize
//! as a JSON object in that order.

use indexmap::IndexMap;
use serde::Serialize;

/// One role an actor played
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CharacterAppearance {
    pub movie: String,
    pub character: String,
}

/// One actor who played a character
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActorAppearance {
    pub movie: String,
    pub actor: String,
}

/// Tracked actor → movie labels, in configured actor order
pub type MoviesPerActorReport = IndexMap<String, Vec<String>>;

/// Actor label → every (movie, character) pair, for actors with 2+ distinct characters
pub type ActorsWithMultipleCharactersReport = IndexMap<String, Vec<CharacterAppearance>>;

/// Character label → every (movie, actor) pair, for characters with 2+ distinct actors
pub type CharactersWithMultipleActorsReport = IndexMap<String, Vec<ActorAppearance>>;
