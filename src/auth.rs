use crate::config::AuthConfig;
use crate::error::{AppError, AppResult};
use crate::state::AppState;
use axum::{
    extract::{Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::Response,
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use std::sync::Arc;
use subtle::ConstantTimeEq;

/// HTTP Basic authentication against a single configured credential pair
#[derive(Clone)]
pub struct BasicAuth {
    username: String,
    password: String,
}

impl BasicAuth {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    pub fn from_config(config: &AuthConfig) -> Self {
        Self::new(config.username.clone(), config.password.clone())
    }

    /// Check an `Authorization` header value of the form `Basic base64(user:pass)`
    pub fn verify_header(&self, value: &str) -> AppResult<()> {
        let encoded = value
            .strip_prefix("Basic ")
            .ok_or(AppError::Unauthorized)?
            .trim();

        let decoded = STANDARD
            .decode(encoded)
            .map_err(|_| AppError::Unauthorized)?;
        let decoded = String::from_utf8(decoded).map_err(|_| AppError::Unauthorized)?;

        let (username, password) = decoded.split_once(':').ok_or(AppError::Unauthorized)?;

        // Both comparisons always run.
        let credentials_match = username.as_bytes().ct_eq(self.username.as_bytes())
            & password.as_bytes().ct_eq(self.password.as_bytes());

        if bool::from(credentials_match) {
            Ok(())
        } else {
            Err(AppError::Unauthorized)
        }
    }

    /// Check the `Authorization` header of a request
    pub fn verify(&self, headers: &HeaderMap) -> AppResult<()> {
        let value = headers
            .get(header::AUTHORIZATION)
            .ok_or(AppError::Unauthorized)?
            .to_str()
            .map_err(|_| AppError::Unauthorized)?;

        self.verify_header(value)
    }

    /// Header value a client would send for the given credentials
    pub fn encode(username: &str, password: &str) -> String {
        format!("Basic {}", STANDARD.encode(format!("{}:{}", username, password)))
    }
}

/// Middleware rejecting requests without valid admin credentials
pub async fn basic_auth_middleware(
    State(state): State<Arc<AppState>>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    if let Err(e) = state.basic_auth.verify(req.headers()) {
        tracing::warn!(path = %req.uri().path(), "Rejected admin request");
        return Err(e);
    }

    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn auth() -> BasicAuth {
        BasicAuth::new("admin", "s3cret")
    }

    #[test]
    fn test_valid_credentials() {
        let header = BasicAuth::encode("admin", "s3cret");
        assert!(auth().verify_header(&header).is_ok());
    }

    #[test]
    fn test_wrong_password() {
        let header = BasicAuth::encode("admin", "guess");
        assert!(matches!(auth().verify_header(&header), Err(AppError::Unauthorized)));
    }

    #[test]
    fn test_credentials_of_other_length_are_rejected() {
        let auth = auth();
        assert!(auth.verify_header(&BasicAuth::encode("admin", "s3cre")).is_err());
        assert!(auth.verify_header(&BasicAuth::encode("admin", "s3cret!")).is_err());
        assert!(auth.verify_header(&BasicAuth::encode("Admin", "s3cret")).is_err());
        assert!(auth.verify_header(&BasicAuth::encode("", "")).is_err());
    }

    #[test]
    fn test_password_may_contain_colon() {
        let auth = BasicAuth::new("admin", "a:b:c");
        assert!(auth.verify_header(&BasicAuth::encode("admin", "a:b:c")).is_ok());
    }

    #[test]
    fn test_malformed_headers() {
        let auth = auth();
        assert!(auth.verify_header("Bearer abc").is_err());
        assert!(auth.verify_header("Basic not_base64!!").is_err());
        // "adminpassword" without a separator
        assert!(auth.verify_header("Basic YWRtaW5wYXNzd29yZA==").is_err());
    }

    #[test]
    fn test_missing_header() {
        let headers = HeaderMap::new();
        assert!(matches!(auth().verify(&headers), Err(AppError::Unauthorized)));
    }

    #[test]
    fn test_verify_from_headers() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_str(&BasicAuth::encode("admin", "s3cret")).unwrap(),
        );
        assert!(auth().verify(&headers).is_ok());
    }
}
