use serde::{Deserialize, Serialize};

/// Query parameters accepted when resolving a code
#[derive(Debug, Default, Deserialize)]
pub struct ResolveQuery {
    /// `true` returns the URL as JSON instead of redirecting
    pub json: Option<String>,
}

impl ResolveQuery {
    pub fn wants_json(&self) -> bool {
        self.json.as_deref() == Some("true")
    }
}

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthCheckResponse {
    pub status: String,
    pub store: HealthStatus,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Individual health status
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    pub latency_ms: Option<u64>,
}
