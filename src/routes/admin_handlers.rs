use crate::error::{AppError, AppResult};
use crate::models::{AllUrlsResponse, ApiResponse, UpdateUrlRequest};
use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json};
use std::sync::Arc;
use validator::Validate;

use super::helpers::{decode_json, validate_target_url};
use super::AppState;

/// List every code -> URL mapping (requires authentication)
pub async fn list_urls(State(state): State<Arc<AppState>>) -> AppResult<impl IntoResponse> {
    let urls = state.links.list().await?;
    tracing::debug!(count = urls.len(), "Listed short links");

    Ok(Json(ApiResponse::data(AllUrlsResponse { urls })))
}

/// Point an existing code at a new URL (requires authentication)
pub async fn update_url(
    State(state): State<Arc<AppState>>,
    Path(code): Path<String>,
    body: Bytes,
) -> AppResult<impl IntoResponse> {
    let request: UpdateUrlRequest = decode_json(&body)?;

    request
        .validate()
        .map_err(|_| AppError::MissingUrl("New URL is required"))?;
    validate_target_url(&request.new_url, state.strict_url_validation)?;

    let code = state.links.update(&code, &request.new_url).await?;

    Ok((StatusCode::CREATED, Json(ApiResponse::data(code))))
}

/// Delete a short URL (requires authentication)
pub async fn delete_url(
    State(state): State<Arc<AppState>>,
    Path(code): Path<String>,
) -> AppResult<impl IntoResponse> {
    state.links.delete(&code).await?;

    Ok(StatusCode::NO_CONTENT)
}
