use crate::error::{AppError, AppResult};
use crate::models::{ApiResponse, ResolvedUrl, ShortenRequest};
use axum::body::Bytes;
use axum::extract::{Path, Query, State};
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Json, Response};
use std::sync::Arc;
use validator::Validate;

use super::helpers::{decode_json, validate_target_url};
use super::types::ResolveQuery;
use super::AppState;

/// Create a short URL
pub async fn shorten_url(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> AppResult<impl IntoResponse> {
    let request: ShortenRequest = decode_json(&body)?;

    request
        .validate()
        .map_err(|_| AppError::MissingUrl("URL is required"))?;
    validate_target_url(&request.url, state.strict_url_validation)?;

    let code = state.links.create(&request.url).await?;

    Ok((StatusCode::CREATED, Json(ApiResponse::data(code))))
}

/// Resolve a short code: 301 to the destination, or JSON with `?json=true`
pub async fn resolve_url(
    State(state): State<Arc<AppState>>,
    Path(code): Path<String>,
    Query(query): Query<ResolveQuery>,
) -> AppResult<Response> {
    let url = state.links.read(&code).await?;

    if query.wants_json() {
        return Ok(Json(ApiResponse::data(ResolvedUrl { url })).into_response());
    }

    let location =
        HeaderValue::from_str(&url).map_err(|_| AppError::UnredirectableUrl { code, url })?;

    Ok((StatusCode::MOVED_PERMANENTLY, [(header::LOCATION, location)]).into_response())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::BasicAuth;
    use crate::config::CorsConfig;
    use crate::kv::{KvError, MemoryBackend};
    use crate::routes::create_router;
    use crate::services::link_store::{MockLinkRepository, StoreError};
    use axum_test::TestServer;
    use serde_json::json;
    use std::time::Duration;

    fn server(links: MockLinkRepository) -> TestServer {
        let state = Arc::new(AppState {
            links: Arc::new(links),
            backend: Arc::new(MemoryBackend::new()),
            basic_auth: BasicAuth::new("admin", "secret"),
            strict_url_validation: true,
        });
        TestServer::new(create_router(state, &CorsConfig::parse("*"), 16 * 1024)).unwrap()
    }

    #[tokio::test]
    async fn test_storage_failure_is_opaque_500() {
        let mut links = MockLinkRepository::new();
        links.expect_read().returning(|_| {
            Err(StoreError::Storage(KvError::Timeout(Duration::from_millis(5))))
        });

        let response = server(links).get("/api/abcdefgh").await;

        response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
        response.assert_json(&json!({ "error": "something went wrong" }));
    }

    #[tokio::test]
    async fn test_exhausted_codes_is_503() {
        let mut links = MockLinkRepository::new();
        links
            .expect_create()
            .returning(|_| Err(StoreError::ExhaustedRetries { attempts: 5 }));

        let response = server(links)
            .post("/api/shorten")
            .json(&json!({ "url": "https://example.com" }))
            .await;

        response.assert_status(StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn test_invalid_input_never_reaches_store() {
        let mut links = MockLinkRepository::new();
        links.expect_create().never();
        let server = server(links);

        server
            .post("/api/shorten")
            .json(&json!({ "url": "" }))
            .await
            .assert_status(StatusCode::BAD_REQUEST);
        server
            .post("/api/shorten")
            .json(&json!({ "url": "not a url" }))
            .await
            .assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_stored_url_unusable_as_location_is_422() {
        let mut links = MockLinkRepository::new();
        links
            .expect_read()
            .returning(|_| Ok("https://example.com/\nbroken".to_string()));
        let server = server(links);

        let response = server.get("/api/abcdefgh").await;
        response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
        response.assert_json(&json!({ "error": "url cannot be used as a redirect" }));

        server
            .get("/api/abcdefgh")
            .add_query_param("json", "true")
            .await
            .assert_json(&json!({ "data": { "url": "https://example.com/\nbroken" } }));
    }
}
