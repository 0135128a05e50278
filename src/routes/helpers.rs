use crate::error::{AppError, AppResult};
use serde::de::DeserializeOwned;
use url::Url as UrlParser;

/// Decode a JSON request body whatever its `Content-Type`; only a body that
/// fails to decode is a 422.
pub(crate) fn decode_json<T: DeserializeOwned>(body: &[u8]) -> AppResult<T> {
    serde_json::from_slice(body).map_err(|e| AppError::InvalidBody(e.to_string()))
}

/// Syntax check for a destination URL.
///
/// Lenient mode accepts any non-empty string; strict mode requires an
/// absolute http(s) URL.
pub(crate) fn validate_target_url(raw: &str, strict: bool) -> AppResult<()> {
    if !strict {
        return Ok(());
    }

    let parsed = UrlParser::parse(raw).map_err(|e| AppError::InvalidUrl(e.to_string()))?;

    match parsed.scheme() {
        "http" | "https" => Ok(()),
        other => Err(AppError::InvalidUrl(format!("unsupported scheme '{}'", other))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ShortenRequest;

    #[test]
    fn test_decode_json_body() {
        let request: ShortenRequest = decode_json(br#"{"url":"https://example.com"}"#).unwrap();
        assert_eq!(request.url, "https://example.com");

        assert!(matches!(
            decode_json::<ShortenRequest>(b"{not json"),
            Err(AppError::InvalidBody(_))
        ));
        assert!(matches!(
            decode_json::<ShortenRequest>(b""),
            Err(AppError::InvalidBody(_))
        ));
    }

    #[test]
    fn test_strict_accepts_http_urls() {
        assert!(validate_target_url("https://example.com", true).is_ok());
        assert!(validate_target_url("http://localhost:3000", true).is_ok());
        assert!(validate_target_url("https://sub.domain.com/path?query=1", true).is_ok());
    }

    #[test]
    fn test_strict_rejects_other_urls() {
        assert!(validate_target_url("ftp://example.com", true).is_err());
        assert!(validate_target_url("example.com", true).is_err());
        assert!(validate_target_url("javascript:alert(1)", true).is_err());
        assert!(validate_target_url("http://", true).is_err());
    }

    #[test]
    fn test_lenient_accepts_anything() {
        assert!(validate_target_url("example.com", false).is_ok());
        assert!(validate_target_url("mailto:someone@example.com", false).is_ok());
    }
}
