//! Failures of the remote credits source.
//!
//! The variants are `Clone` because a single in-flight lookup may be awaited
//! by several callers that all receive the same outcome.

use std::time::Duration;
use thiserror::Error;

/// Errors that can occur when fetching credits from the remote API
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SourceError {
    /// The source was constructed without credentials
    #[error("TMDB API key is required")]
    MissingApiKey,

    /// Movie ids start at 1; anything else never reaches the network
    #[error("Valid movie ID is required, got {0}")]
    InvalidMovieId(u32),

    /// Connect or transport failure
    #[error("Network error: Unable to reach TMDB API ({0})")]
    Unavailable(String),

    /// The API answered with a non-2xx status
    #[error("TMDB API error: {status} - {message}")]
    Rejected { status: u16, message: String },

    /// The call exceeded its deadline
    #[error("TMDB API request timed out after {0:?}")]
    Timeout(Duration),

    /// A 2xx response whose body is not a credits document
    #[error("Invalid response from TMDB API: {0}")]
    Decode(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejected_message_format() {
        let err = SourceError::Rejected {
            status: 401,
            message: "Invalid API key".to_string(),
        };
        assert_eq!(err.to_string(), "TMDB API error: 401 - Invalid API key");
    }
}
