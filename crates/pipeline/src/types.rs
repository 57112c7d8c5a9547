//! The stream the reducers consume.

use catalog::CreditsResult;
use std::sync::Arc;

/// One movie's contribution to a report: its display label and, when the
/// lookup succeeded, its cast.
///
/// `credits` is `None` for a movie whose lookup failed under
/// `CollectPartial`; reducers skip it. The cast is shared with the cache so
/// concurrent reports over the same movies never copy it.
#[derive(Debug, Clone, PartialEq)]
pub struct MovieCredits {
    pub title: String,
    pub credits: Option<Arc<CreditsResult>>,
}

impl MovieCredits {
    pub fn new(title: impl Into<String>, credits: Arc<CreditsResult>) -> Self {
        Self {
            title: title.into(),
            credits: Some(credits),
        }
    }

    /// A movie whose cast could not be fetched
    pub fn missing(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            credits: None,
        }
    }

    /// Cast members in source order; empty when the lookup failed
    pub fn cast(&self) -> &[catalog::CastMember] {
        self.credits.as_deref().map(|c| c.cast.as_slice()).unwrap_or_default()
    }
}
