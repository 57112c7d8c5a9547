//! Characters played by more than one distinct actor across the catalogue.

use super::grouping::FoldedGroups;
use crate::report::{ActorAppearance, CharactersWithMultipleActorsReport};
use crate::traits::Aggregation;
use crate::types::MovieCredits;

/// Groups every credit by case-folded character name and keeps the
/// characters whose credits span two or more distinct actor strings.
///
/// Mirror image of
/// [`ActorsWithMultipleCharactersReducer`](super::ActorsWithMultipleCharactersReducer).
#[derive(Debug, Clone, Copy, Default)]
pub struct CharactersWithMultipleActorsReducer;

impl Aggregation for CharactersWithMultipleActorsReducer {
    type Report = CharactersWithMultipleActorsReport;

    fn name(&self) -> &str {
        "charactersWithMultipleActors"
    }

    fn aggregate(&self, movies: &[MovieCredits]) -> CharactersWithMultipleActorsReport {
        let mut groups = FoldedGroups::new();

        for movie in movies {
            for member in movie.cast() {
                groups.push(
                    &member.character,
                    ActorAppearance {
                        movie: movie.title.clone(),
                        actor: member.name.clone(),
                    },
                );
            }
        }

        groups.into_report(|appearance| appearance.actor.as_str())
    }
}
