//! Core domain types for the movie catalogue and remote cast data.
//!
//! - Type aliases for domain clarity (`TmdbId`)
//! - The immutable catalogue loaded once at start-up
//! - Cast data as decoded from the remote credits endpoint
//! - The case-folding rule used for actor and character identity

use serde::{Deserialize, Deserializer, Serialize};

// =============================================================================
// Type Aliases
// =============================================================================

/// External identifier of a movie in the remote credits API
pub type TmdbId = u32;

/// Name of an actor the movies-per-actor report tracks
pub type TrackedActorName = String;

// =============================================================================
// Catalogue Types
// =============================================================================

/// One movie of the fixed catalogue.
///
/// `display_name` is the label that appears in every report; `external_id`
/// is what the remote source is queried with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovieCatalogEntry {
    #[serde(rename = "name")]
    pub display_name: String,
    #[serde(rename = "id")]
    pub external_id: TmdbId,
}

impl MovieCatalogEntry {
    pub fn new(display_name: impl Into<String>, external_id: TmdbId) -> Self {
        Self {
            display_name: display_name.into(),
            external_id,
        }
    }
}

/// The read-only configuration every report runs over.
///
/// Both lists keep their declared order: movies are fed to the reducers in
/// this order and tracked actors become report keys in this order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    pub movies: Vec<MovieCatalogEntry>,
    pub actors: Vec<TrackedActorName>,
}

impl Catalog {
    /// Creates an empty catalogue
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style helper for tests and small programs
    pub fn with_movie(mut self, display_name: impl Into<String>, external_id: TmdbId) -> Self {
        self.movies.push(MovieCatalogEntry::new(display_name, external_id));
        self
    }

    /// Builder-style helper for tests and small programs
    pub fn with_actor(mut self, name: impl Into<String>) -> Self {
        self.actors.push(name.into());
        self
    }

    /// Returns (movie count, tracked actor count)
    pub fn counts(&self) -> (usize, usize) {
        (self.movies.len(), self.actors.len())
    }
}

// =============================================================================
// Remote Cast Types
// =============================================================================

/// A single credited cast member of one movie
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CastMember {
    pub name: String,
    /// Uncredited roles come back as `null`; they are kept as ""
    #[serde(default, deserialize_with = "null_as_empty")]
    pub character: String,
}

impl CastMember {
    pub fn new(name: impl Into<String>, character: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            character: character.into(),
        }
    }
}

/// The cast list of one movie. Crew and any other fields of the remote
/// payload are ignored during decoding.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreditsResult {
    #[serde(default)]
    pub cast: Vec<CastMember>,
}

impl CreditsResult {
    pub fn new(cast: Vec<CastMember>) -> Self {
        Self { cast }
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

// =============================================================================
// Identity
// =============================================================================

/// Case-insensitive identity key for actor and character names.
///
/// Grouping always happens on the folded key while the first-seen original
/// spelling is kept for display.
pub fn fold_key(name: &str) -> String {
    name.to_lowercase()
}
