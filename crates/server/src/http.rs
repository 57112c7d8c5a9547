//! HTTP boundary: routes, JSON error mapping and request logging.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::extract::State;
use axum::http::{Request, Response as HttpResponse, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{Value, json};
use tower_http::trace::TraceLayer;
use tracing::{Span, error, info, info_span};

use pipeline::{
    ActorsWithMultipleCharactersReport, CharactersWithMultipleActorsReport, MoviesPerActorReport,
};
use sources::SourceError;

use crate::orchestrator::ReportOrchestrator;

pub type AppResult<T> = Result<T, AppError>;

/// An error response: status plus a human-readable message
#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub message: String,
}

impl AppError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for AppError {}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let label = if self.status == StatusCode::INTERNAL_SERVER_ERROR {
            error!("Request failed: {}", self.message);
            "Internal Server Error"
        } else {
            "Error"
        };

        let body = Json(json!({
            "error": label,
            "message": self.message,
        }));

        (self.status, body).into_response()
    }
}

impl From<SourceError> for AppError {
    fn from(err: SourceError) -> Self {
        Self::internal(err.to_string())
    }
}

/// Build the application router over a shared orchestrator
pub fn router(orchestrator: Arc<ReportOrchestrator>) -> Router {
    Router::new()
        .route("/moviesPerActor", get(movies_per_actor))
        .route("/actorsWithMultipleCharacters", get(actors_with_multiple_characters))
        .route("/charactersWithMultipleActors", get(characters_with_multiple_actors))
        .route("/health", get(health))
        .fallback(not_found)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request<Body>| {
                    info_span!("request", method = %request.method(), uri = %request.uri())
                })
                .on_request(())
                .on_response(
                    |response: &HttpResponse<Body>, latency: Duration, _span: &Span| {
                        let status = response.status();
                        if status.is_client_error() || status.is_server_error() {
                            error!("{} - {}ms", status.as_u16(), latency.as_millis());
                        } else {
                            info!("{} - {}ms", status.as_u16(), latency.as_millis());
                        }
                    },
                ),
        )
        .with_state(orchestrator)
}

async fn movies_per_actor(
    State(orchestrator): State<Arc<ReportOrchestrator>>,
) -> AppResult<Json<MoviesPerActorReport>> {
    Ok(Json(orchestrator.movies_per_actor().await?))
}

async fn actors_with_multiple_characters(
    State(orchestrator): State<Arc<ReportOrchestrator>>,
) -> AppResult<Json<ActorsWithMultipleCharactersReport>> {
    Ok(Json(orchestrator.actors_with_multiple_characters().await?))
}

async fn characters_with_multiple_actors(
    State(orchestrator): State<Arc<ReportOrchestrator>>,
) -> AppResult<Json<CharactersWithMultipleActorsReport>> {
    Ok(Json(orchestrator.characters_with_multiple_actors().await?))
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

async fn not_found(uri: Uri) -> AppError {
    AppError::not_found(format!("Not Found - {}", uri.path()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orchestrator::CreditsCache;
    use async_trait::async_trait;
    use axum::body::to_bytes;
    use catalog::{CastMember, Catalog, CreditsResult, TmdbId};
    use sources::CreditsSource;
    use tower::ServiceExt;

    // ===== Test Fixtures =====

    struct StubSource {
        fail: bool,
    }

    #[async_trait]
    impl CreditsSource for StubSource {
        fn name(&self) -> &str {
            "stub"
        }

        async fn fetch_credits(&self, movie_id: TmdbId) -> Result<CreditsResult, SourceError> {
            if self.fail {
                return Err(SourceError::Rejected {
                    status: 401,
                    message: "Invalid API key".to_string(),
                });
            }
            let character = if movie_id == 24428 { "Tony Stark" } else { "Tony Stark / Iron Man" };
            Ok(CreditsResult::new(vec![CastMember::new("Robert Downey Jr.", character)]))
        }
    }

    fn app(fail: bool) -> Router {
        let catalog = Catalog::new()
            .with_movie("Avengers", 24428)
            .with_movie("Iron Man", 1726)
            .with_actor("Robert Downey Jr.")
            .with_actor("Chris Evans");
        let cache: CreditsCache = CreditsCache::new(Duration::from_secs(60));
        let orchestrator = ReportOrchestrator::new(
            Arc::new(catalog),
            Arc::new(StubSource { fail }),
            Arc::new(cache),
        );
        router(Arc::new(orchestrator))
    }

    async fn get_json(app: Router, path: &str) -> (StatusCode, Value) {
        let response = app
            .oneshot(Request::builder().uri(path).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    // ===== Routes =====

    #[tokio::test]
    async fn test_health() {
        let (status, body) = get_json(app(false), "/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "status": "ok" }));
    }

    #[tokio::test]
    async fn test_movies_per_actor_route() {
        let (status, body) = get_json(app(false), "/moviesPerActor").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({ "Robert Downey Jr.": ["Avengers", "Iron Man"], "Chris Evans": [] })
        );
    }

    #[tokio::test]
    async fn test_movies_per_actor_keeps_actor_order_in_body() {
        let response = app(false)
            .oneshot(Request::builder().uri("/moviesPerActor").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let text = String::from_utf8(bytes.to_vec()).unwrap();

        let rdj = text.find("Robert Downey Jr.").unwrap();
        let evans = text.find("Chris Evans").unwrap();
        assert!(rdj < evans, "keys out of order: {}", text);
    }

    #[tokio::test]
    async fn test_actors_with_multiple_characters_route() {
        let (status, body) = get_json(app(false), "/actorsWithMultipleCharacters").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({
                "Robert Downey Jr.": [
                    { "movie": "Avengers", "character": "Tony Stark" },
                    { "movie": "Iron Man", "character": "Tony Stark / Iron Man" }
                ]
            })
        );
    }

    #[tokio::test]
    async fn test_characters_with_multiple_actors_route() {
        let (status, body) = get_json(app(false), "/charactersWithMultipleActors").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({}));
    }

    // ===== Errors =====

    #[tokio::test]
    async fn test_fail_fast_report_maps_to_500() {
        let (status, body) = get_json(app(true), "/moviesPerActor").await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Internal Server Error");
        assert_eq!(body["message"], "TMDB API error: 401 - Invalid API key");
    }

    #[tokio::test]
    async fn test_collect_partial_report_still_succeeds() {
        let (status, body) = get_json(app(true), "/actorsWithMultipleCharacters").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({}));
    }

    #[tokio::test]
    async fn test_unknown_route_is_404() {
        let (status, body) = get_json(app(false), "/nope").await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, json!({ "error": "Error", "message": "Not Found - /nope" }));
    }
}
