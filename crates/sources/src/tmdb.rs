//! TMDB credits source
//!
//! Fetches `GET /movie/{id}/credits` from The Movie Database and decodes
//! the cast list. Every failure is mapped onto [`SourceError`]:
//! - transport errors become `Unavailable`
//! - deadline overruns become `Timeout`
//! - non-2xx answers become `Rejected` with TMDB's `status_message`

use crate::error::SourceError;
use crate::CreditsSource;
use async_trait::async_trait;
use catalog::{CreditsResult, TmdbId};
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, instrument, warn};

pub const TMDB_API_BASE: &str = "https://api.themoviedb.org/3";

/// Deadline applied to every credits request unless configured otherwise
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Error body TMDB sends with non-2xx responses
#[derive(Debug, Deserialize)]
struct TmdbErrorBody {
    status_message: Option<String>,
}

/// Remote credits source backed by the TMDB REST API
#[derive(Debug, Clone)]
pub struct TmdbCreditsSource {
    api_key: String,
    base_url: String,
    client: Client,
    timeout: Duration,
}

impl TmdbCreditsSource {
    /// Create a source for the public TMDB API
    ///
    /// Fails with `MissingApiKey` when the key is empty.
    pub fn new(api_key: impl Into<String>) -> Result<Self, SourceError> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(SourceError::MissingApiKey);
        }

        Ok(Self {
            api_key,
            base_url: TMDB_API_BASE.to_string(),
            client: Client::new(),
            timeout: DEFAULT_TIMEOUT,
        })
    }

    /// Point the source at another API root (default: TMDB v3)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Configure the per-request deadline (default: 10s)
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn transport_error(&self, err: reqwest::Error) -> SourceError {
        if err.is_timeout() {
            SourceError::Timeout(self.timeout)
        } else if err.is_decode() {
            SourceError::Decode(err.without_url().to_string())
        } else {
            // The URL carries the api key, keep it out of messages
            SourceError::Unavailable(err.without_url().to_string())
        }
    }
}

#[async_trait]
impl CreditsSource for TmdbCreditsSource {
    fn name(&self) -> &str {
        "tmdb"
    }

    #[instrument(skip(self))]
    async fn fetch_credits(&self, movie_id: TmdbId) -> Result<CreditsResult, SourceError> {
        if movie_id == 0 {
            return Err(SourceError::InvalidMovieId(movie_id));
        }

        let url = format!("{}/movie/{}/credits", self.base_url, movie_id);
        debug!("TMDB request URL: {}", url);

        let response = self
            .client
            .get(&url)
            .query(&[("api_key", self.api_key.as_str())])
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<TmdbErrorBody>(&body)
                .ok()
                .and_then(|b| b.status_message)
                .unwrap_or_else(|| "Unknown error".to_string());
            warn!("TMDB rejected credits request for movie {}: {}", movie_id, status);
            return Err(SourceError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        let credits: CreditsResult = response
            .json()
            .await
            .map_err(|e| self.transport_error(e))?;

        debug!(
            "TMDB returned {} cast members for movie {}",
            credits.cast.len(),
            movie_id
        );
        Ok(credits)
    }
}
