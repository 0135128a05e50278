use crate::kv::KvError;
use crate::models::ApiResponse;
use crate::services::StoreError;
use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Json, Response},
};
use thiserror::Error;

/// Realm announced on 401 responses from the admin routes.
pub const AUTH_REALM: &str = "Restricted";

/// Main application error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("Key-value backend error: {0}")]
    Backend(#[from] KvError),

    #[error("Invalid request body: {0}")]
    InvalidBody(String),

    #[error("{0}")]
    MissingUrl(&'static str),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Stored URL for {code} cannot be sent as a Location header: {url:?}")]
    UnredirectableUrl { code: String, url: String },

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Environment variable missing: {0}")]
    MissingEnvVar(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AppError {
    /// Status code and client-facing message. Storage failures never leak
    /// their cause to the client.
    fn status_and_message(&self) -> (StatusCode, String) {
        match self {
            AppError::Store(StoreError::NotFound(_)) => {
                (StatusCode::NOT_FOUND, "url not found".to_string())
            }
            AppError::Store(StoreError::ExhaustedRetries { .. }) => (
                StatusCode::SERVICE_UNAVAILABLE,
                "could not allocate a short code".to_string(),
            ),
            AppError::InvalidBody(_) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "invalid request body".to_string(),
            ),
            AppError::MissingUrl(message) => (StatusCode::BAD_REQUEST, message.to_string()),
            AppError::InvalidUrl(_) => (StatusCode::BAD_REQUEST, "invalid URL".to_string()),
            AppError::UnredirectableUrl { .. } => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "url cannot be used as a redirect".to_string(),
            ),
            AppError::Unauthorized => (StatusCode::UNAUTHORIZED, "unauthorized".to_string()),
            _ => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "something went wrong".to_string(),
            ),
        }
    }
}

/// Convert AppError to HTTP response
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = self.status_and_message();

        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        } else if let AppError::UnredirectableUrl { .. } = self {
            tracing::warn!(error = %self, "Cannot redirect to stored URL");
        } else {
            tracing::debug!(error = %self, status = status.as_u16(), "Request rejected");
        }

        let mut response = (status, Json(ApiResponse::<()>::error(message))).into_response();

        if let AppError::Unauthorized = self {
            let challenge = format!("Basic realm=\"{}\"", AUTH_REALM);
            if let Ok(value) = HeaderValue::from_str(&challenge) {
                response.headers_mut().insert(header::WWW_AUTHENTICATE, value);
            }
        }

        response
    }
}

/// Result type alias for AppResult
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_not_found_maps_to_404() {
        let response = AppError::from(StoreError::NotFound("abc".to_string())).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_storage_error_maps_to_500() {
        let err = StoreError::Storage(KvError::Timeout(Duration::from_millis(5)));
        let response = AppError::from(err).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_exhausted_retries_maps_to_503() {
        let err = StoreError::ExhaustedRetries { attempts: 5 };
        let response = AppError::from(err).into_response();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[test]
    fn test_validation_statuses() {
        assert_eq!(
            AppError::InvalidBody("eof".to_string()).into_response().status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            AppError::MissingUrl("URL is required").into_response().status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::InvalidUrl("nope".to_string()).into_response().status(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_unredirectable_url_maps_to_422() {
        let err = AppError::UnredirectableUrl {
            code: "abc".to_string(),
            url: "https://a\nb".to_string(),
        };
        assert!(err.to_string().contains("abc"));
        assert_eq!(err.into_response().status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn test_unauthorized_carries_challenge() {
        let response = AppError::Unauthorized.into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            response.headers().get(header::WWW_AUTHENTICATE).unwrap(),
            "Basic realm=\"Restricted\""
        );
    }
}
