use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use validator::Validate;

/// JSON envelope shared by every endpoint: `data` on success, `error` on failure.
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct ApiResponse<T> {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn data(data: T) -> Self {
        Self {
            data: Some(data),
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            data: None,
            error: Some(message.into()),
        }
    }
}

/// Request to create a short URL
#[derive(Debug, Deserialize, Validate)]
pub struct ShortenRequest {
    #[serde(default)]
    #[validate(length(min = 1, message = "URL is required"))]
    pub url: String,
}

/// Request to point an existing code at a new URL
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateUrlRequest {
    #[serde(default)]
    #[validate(length(min = 1, message = "New URL is required"))]
    pub new_url: String,
}

/// JSON form of a resolved short code
#[derive(Debug, Serialize, Deserialize)]
pub struct ResolvedUrl {
    pub url: String,
}

/// Every mapping in the collection
#[derive(Debug, Serialize, Deserialize)]
pub struct AllUrlsResponse {
    pub urls: HashMap<String, String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_envelope_omits_empty_fields() {
        let ok = serde_json::to_value(ApiResponse::data("abc12345")).unwrap();
        assert_eq!(ok, json!({ "data": "abc12345" }));

        let err = serde_json::to_value(ApiResponse::<()>::error("url not found")).unwrap();
        assert_eq!(err, json!({ "error": "url not found" }));
    }

    #[test]
    fn test_missing_url_field_fails_validation() {
        let request: ShortenRequest = serde_json::from_value(json!({})).unwrap();
        assert!(request.validate().is_err());

        let request: ShortenRequest =
            serde_json::from_value(json!({ "url": "https://example.com" })).unwrap();
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_update_request_field_name() {
        let request: UpdateUrlRequest =
            serde_json::from_value(json!({ "new_url": "https://new.com" })).unwrap();
        assert_eq!(request.new_url, "https://new.com");
        assert!(request.validate().is_ok());
    }
}
