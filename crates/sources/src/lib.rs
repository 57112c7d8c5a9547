//! # Sources Crate
//!
//! Remote sources of per-movie cast data.
//!
//! ## Components
//!
//! ### CreditsSource
//! The boundary every report pipeline fetches through: given a movie id,
//! return its cast list or fail with a [`SourceError`]. Retry and timeout
//! tuning live behind this trait, never in the callers.
//!
//! ### TmdbCreditsSource
//! The production implementation over the TMDB v3 REST API.
//!
//! ## Example Usage
//!
//! ```ignore
//! use sources::{CreditsSource, TmdbCreditsSource};
//!
//! let tmdb = TmdbCreditsSource::new(api_key)?;
//! let credits = tmdb.fetch_credits(1726).await?;
//! println!("{} cast members", credits.cast.len());
//! ```

// Public modules
pub mod error;
pub mod tmdb;

// Re-export commonly used types
pub use error::SourceError;
pub use tmdb::TmdbCreditsSource;

use async_trait::async_trait;
use catalog::{CreditsResult, TmdbId};

/// Anything that can produce the cast list of a movie.
///
/// ## Design Note
/// - `Send + Sync` so one source can be shared by every concurrent worker
/// - Errors are cloneable so a shared in-flight lookup can hand the same
///   failure to every waiter
#[async_trait]
pub trait CreditsSource: Send + Sync {
    /// Returns the name of this source (for logging/debugging)
    fn name(&self) -> &str;

    /// Fetch the credits of one movie.
    ///
    /// # Returns
    /// * `Ok(CreditsResult)` - The cast in the order the source returned it
    /// * `Err(SourceError)` - Unavailable, rejected, timed out or undecodable
    async fn fetch_credits(&self, movie_id: TmdbId) -> Result<CreditsResult, SourceError>;
}
