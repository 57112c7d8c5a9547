//! Actors who play more than one distinct character across the catalogue.

use super::grouping::FoldedGroups;
use crate::report::{ActorsWithMultipleCharactersReport, CharacterAppearance};
use crate::traits::Aggregation;
use crate::types::MovieCredits;

/// Groups every credit by case-folded actor name and keeps the actors whose
/// credits span two or more distinct character strings.
///
/// ## Algorithm
/// 1. For each movie in order, for each cast member in source order, append
///    `(movie, character)` under the folded actor name
/// 2. The first casing seen for an actor becomes its report label
/// 3. Emit actors with at least two distinct characters (exact comparison),
///    with all of their pairs
#[derive(Debug, Clone, Copy, Default)]
pub struct ActorsWithMultipleCharactersReducer;

impl Aggregation for ActorsWithMultipleCharactersReducer {
    type Report = ActorsWithMultipleCharactersReport;

    fn name(&self) -> &str {
        "actorsWithMultipleCharacters"
    }

    fn aggregate(&self, movies: &[MovieCredits]) -> ActorsWithMultipleCharactersReport {
        let mut groups = FoldedGroups::new();

        for movie in movies {
            for member in movie.cast() {
                groups.push(
                    &member.name,
                    CharacterAppearance {
                        movie: movie.title.clone(),
                        character: member.character.clone(),
                    },
                );
            }
        }

        groups.into_report(|appearance| appearance.character.as_str())
    }
}
